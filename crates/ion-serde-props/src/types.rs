//! Column and Ion type model.
//!
//! - [`ColumnType`]: the declared table type of a column, parsed from Hive
//!   type strings (`int`, `decimal(10,2)`, `array<struct<a:int>>`, ...)
//! - [`IonType`]: the nested-format value types a column may be serialized as
//!
//! [`ColumnType::accepts_override`] holds the serialize-as compatibility
//! table.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use arrow_schema::{DataType, Field, Fields, TimeUnit, UnionFields, UnionMode};
use serde::{Deserialize, Serialize};

/// Maximum decimal precision accepted for `decimal(p,s)`.
pub const MAX_DECIMAL_PRECISION: u8 = 38;

/// Default precision and scale for a bare `decimal`.
pub const DEFAULT_DECIMAL: (u8, u8) = (10, 0);

/// Most members a `uniontype` may declare; Arrow union type ids are `i8`.
pub const MAX_UNION_MEMBERS: usize = 128;

/// Declared table type of a column.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ColumnType {
    /// `boolean`
    Boolean,
    /// `tinyint` (8-bit signed)
    TinyInt,
    /// `smallint` (16-bit signed)
    SmallInt,
    /// `int` (32-bit signed)
    Int,
    /// `bigint` (64-bit signed)
    BigInt,
    /// `float` (32-bit IEEE)
    Float,
    /// `double` (64-bit IEEE)
    Double,
    /// `decimal(precision, scale)`
    Decimal {
        /// Total number of digits.
        precision: u8,
        /// Digits after the decimal point.
        scale: u8,
    },
    /// `string`
    String,
    /// `char(n)`
    Char(u32),
    /// `varchar(n)`
    Varchar(u32),
    /// `binary`
    Binary,
    /// `date`
    Date,
    /// `timestamp`
    Timestamp,
    /// `array<T>`
    Array(Box<ColumnType>),
    /// `map<K,V>`
    Map(Box<ColumnType>, Box<ColumnType>),
    /// `struct<name:T,...>`
    Struct(Vec<(String, ColumnType)>),
    /// `uniontype<T,...>`
    Union(Vec<ColumnType>),
}

impl ColumnType {
    /// Returns `true` if values of this column may be serialized as `ion_type`.
    ///
    /// | Declared | Allowed |
    /// |---|---|
    /// | boolean | bool, string, symbol |
    /// | integers | int, decimal, float, string, symbol |
    /// | float, double | float, decimal, string, symbol |
    /// | decimal | decimal, float, string, symbol |
    /// | string, char, varchar | string, symbol, clob |
    /// | binary | blob, clob |
    /// | date, timestamp | timestamp, string, symbol |
    /// | array | list, sexp |
    /// | map, struct | struct |
    /// | uniontype | none |
    #[must_use]
    pub fn accepts_override(&self, ion_type: IonType) -> bool {
        use IonType as I;
        match self {
            Self::Boolean => matches!(ion_type, I::Bool | I::String | I::Symbol),
            Self::TinyInt | Self::SmallInt | Self::Int | Self::BigInt => matches!(
                ion_type,
                I::Int | I::Decimal | I::Float | I::String | I::Symbol
            ),
            Self::Float | Self::Double => {
                matches!(ion_type, I::Float | I::Decimal | I::String | I::Symbol)
            }
            Self::Decimal { .. } => {
                matches!(ion_type, I::Decimal | I::Float | I::String | I::Symbol)
            }
            Self::String | Self::Char(_) | Self::Varchar(_) => {
                matches!(ion_type, I::String | I::Symbol | I::Clob)
            }
            Self::Binary => matches!(ion_type, I::Blob | I::Clob),
            Self::Date | Self::Timestamp => {
                matches!(ion_type, I::Timestamp | I::String | I::Symbol)
            }
            Self::Array(_) => matches!(ion_type, I::List | I::Sexp),
            Self::Map(..) | Self::Struct(_) => ion_type == I::Struct,
            Self::Union(_) => false,
        }
    }

    /// Maps this type to the equivalent Arrow data type.
    ///
    /// Strings of every flavour become `Utf8`; timestamps keep nanosecond
    /// precision; unions become sparse Arrow unions with member names
    /// `field0..fieldN`.
    #[must_use]
    #[allow(clippy::cast_possible_wrap)]
    pub fn to_arrow(&self) -> DataType {
        match self {
            Self::Boolean => DataType::Boolean,
            Self::TinyInt => DataType::Int8,
            Self::SmallInt => DataType::Int16,
            Self::Int => DataType::Int32,
            Self::BigInt => DataType::Int64,
            Self::Float => DataType::Float32,
            Self::Double => DataType::Float64,
            // scale <= precision <= 38, so the cast cannot wrap
            Self::Decimal { precision, scale } => DataType::Decimal128(*precision, *scale as i8),
            Self::String | Self::Char(_) | Self::Varchar(_) => DataType::Utf8,
            Self::Binary => DataType::Binary,
            Self::Date => DataType::Date32,
            Self::Timestamp => DataType::Timestamp(TimeUnit::Nanosecond, None),
            Self::Array(inner) => DataType::List(Arc::new(Field::new("item", inner.to_arrow(), true))),
            Self::Map(key, value) => {
                let entries = Fields::from(vec![
                    Field::new("key", key.to_arrow(), false),
                    Field::new("value", value.to_arrow(), true),
                ]);
                DataType::Map(
                    Arc::new(Field::new("entries", DataType::Struct(entries), false)),
                    false,
                )
            }
            Self::Struct(fields) => DataType::Struct(
                fields
                    .iter()
                    .map(|(name, ty)| Field::new(name, ty.to_arrow(), true))
                    .collect::<Vec<_>>()
                    .into(),
            ),
            // members past MAX_UNION_MEMBERS have no type id and are left out
            Self::Union(members) => {
                let (ids, fields): (Vec<i8>, Vec<Field>) = members
                    .iter()
                    .enumerate()
                    .filter_map(|(i, ty)| {
                        let id = i8::try_from(i).ok()?;
                        Some((id, Field::new(format!("field{i}"), ty.to_arrow(), true)))
                    })
                    .unzip();
                DataType::Union(UnionFields::new(ids, fields), UnionMode::Sparse)
            }
        }
    }

    /// Parses a Hive column type list as found in `columns.types`.
    ///
    /// Types are separated by `:` or `,` at the top level, e.g.
    /// `int:string:struct<a:int,b:array<string>>`.
    ///
    /// # Errors
    ///
    /// Returns a message describing the first parse failure.
    pub fn parse_list(input: &str) -> Result<Vec<Self>, String> {
        let mut parser = TypeParser::new(input);
        let mut types = Vec::new();
        parser.skip_whitespace();
        if parser.at_end() {
            return Ok(types);
        }
        loop {
            types.push(parser.parse_type()?);
            parser.skip_whitespace();
            match parser.peek() {
                None => return Ok(types),
                Some(':' | ',') => parser.bump(),
                Some(c) => return Err(parser.error(&format!("expected ':' or ',', got '{c}'"))),
            }
        }
    }
}

impl FromStr for ColumnType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parser = TypeParser::new(s);
        let ty = parser.parse_type()?;
        parser.skip_whitespace();
        if let Some(c) = parser.peek() {
            return Err(parser.error(&format!("unexpected trailing '{c}'")));
        }
        Ok(ty)
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boolean => f.write_str("boolean"),
            Self::TinyInt => f.write_str("tinyint"),
            Self::SmallInt => f.write_str("smallint"),
            Self::Int => f.write_str("int"),
            Self::BigInt => f.write_str("bigint"),
            Self::Float => f.write_str("float"),
            Self::Double => f.write_str("double"),
            Self::Decimal { precision, scale } => write!(f, "decimal({precision},{scale})"),
            Self::String => f.write_str("string"),
            Self::Char(n) => write!(f, "char({n})"),
            Self::Varchar(n) => write!(f, "varchar({n})"),
            Self::Binary => f.write_str("binary"),
            Self::Date => f.write_str("date"),
            Self::Timestamp => f.write_str("timestamp"),
            Self::Array(inner) => write!(f, "array<{inner}>"),
            Self::Map(k, v) => write!(f, "map<{k},{v}>"),
            Self::Struct(fields) => {
                f.write_str("struct<")?;
                for (i, (name, ty)) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{name}:{ty}")?;
                }
                f.write_str(">")
            }
            Self::Union(members) => {
                f.write_str("uniontype<")?;
                for (i, ty) in members.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{ty}")?;
                }
                f.write_str(">")
            }
        }
    }
}

// ── Hive type parser ────────────────────────────────────────────────

struct TypeParser<'a> {
    input: &'a str,
    chars: Vec<char>,
    pos: usize,
}

impl<'a> TypeParser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.chars().collect(),
            pos: 0,
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) {
        self.pos += 1;
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    fn error(&self, message: &str) -> String {
        format!("{message} at position {} in '{}'", self.pos, self.input)
    }

    fn expect(&mut self, expected: char) -> Result<(), String> {
        self.skip_whitespace();
        match self.peek() {
            Some(c) if c == expected => {
                self.bump();
                Ok(())
            }
            Some(c) => Err(self.error(&format!("expected '{expected}', got '{c}'"))),
            None => Err(self.error(&format!("expected '{expected}', got end of input"))),
        }
    }

    fn identifier(&mut self) -> Result<String, String> {
        self.skip_whitespace();
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            self.pos += 1;
        }
        if start == self.pos {
            return Err(self.error("expected identifier"));
        }
        Ok(self.chars[start..self.pos].iter().collect())
    }

    fn number(&mut self) -> Result<u32, String> {
        self.skip_whitespace();
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.pos += 1;
        }
        let digits: String = self.chars[start..self.pos].iter().collect();
        digits
            .parse()
            .map_err(|_| self.error("expected unsigned integer"))
    }

    fn next_is(&mut self, c: char) -> bool {
        self.skip_whitespace();
        self.peek() == Some(c)
    }

    fn parse_type(&mut self) -> Result<ColumnType, String> {
        let name = self.identifier()?.to_ascii_lowercase();
        let ty = match name.as_str() {
            "boolean" => ColumnType::Boolean,
            "tinyint" => ColumnType::TinyInt,
            "smallint" => ColumnType::SmallInt,
            "int" | "integer" => ColumnType::Int,
            "bigint" => ColumnType::BigInt,
            "float" => ColumnType::Float,
            "double" => ColumnType::Double,
            "string" => ColumnType::String,
            "binary" => ColumnType::Binary,
            "date" => ColumnType::Date,
            "timestamp" => ColumnType::Timestamp,
            "decimal" | "numeric" => self.parse_decimal()?,
            "char" => ColumnType::Char(self.parse_length()?),
            "varchar" => ColumnType::Varchar(self.parse_length()?),
            "array" => {
                self.expect('<')?;
                let inner = self.parse_type()?;
                self.expect('>')?;
                ColumnType::Array(Box::new(inner))
            }
            "map" => {
                self.expect('<')?;
                let key = self.parse_type()?;
                self.expect(',')?;
                let value = self.parse_type()?;
                self.expect('>')?;
                ColumnType::Map(Box::new(key), Box::new(value))
            }
            "struct" => {
                self.expect('<')?;
                let mut fields = Vec::new();
                if !self.next_is('>') {
                    loop {
                        let field = self.identifier()?;
                        self.expect(':')?;
                        fields.push((field, self.parse_type()?));
                        if !self.next_is(',') {
                            break;
                        }
                        self.bump();
                    }
                }
                self.expect('>')?;
                ColumnType::Struct(fields)
            }
            "uniontype" => {
                self.expect('<')?;
                let mut members = vec![self.parse_type()?];
                while self.next_is(',') {
                    self.bump();
                    if members.len() == MAX_UNION_MEMBERS {
                        return Err(self.error(&format!(
                            "uniontype has more than {MAX_UNION_MEMBERS} members"
                        )));
                    }
                    members.push(self.parse_type()?);
                }
                self.expect('>')?;
                ColumnType::Union(members)
            }
            other => return Err(self.error(&format!("unknown type '{other}'"))),
        };
        Ok(ty)
    }

    fn parse_length(&mut self) -> Result<u32, String> {
        self.expect('(')?;
        let n = self.number()?;
        self.expect(')')?;
        if n == 0 {
            return Err(self.error("length must be positive"));
        }
        Ok(n)
    }

    fn parse_decimal(&mut self) -> Result<ColumnType, String> {
        let (mut precision, mut scale) = (u32::from(DEFAULT_DECIMAL.0), u32::from(DEFAULT_DECIMAL.1));
        if self.next_is('(') {
            self.bump();
            precision = self.number()?;
            scale = 0;
            if self.next_is(',') {
                self.bump();
                scale = self.number()?;
            }
            self.expect(')')?;
        }
        if precision == 0 || precision > u32::from(MAX_DECIMAL_PRECISION) {
            return Err(self.error(&format!(
                "decimal precision {precision} outside 1..={MAX_DECIMAL_PRECISION}"
            )));
        }
        if scale > precision {
            return Err(self.error(&format!(
                "decimal scale {scale} exceeds precision {precision}"
            )));
        }
        // both bounded by MAX_DECIMAL_PRECISION above
        Ok(ColumnType::Decimal {
            precision: u8::try_from(precision).unwrap_or(MAX_DECIMAL_PRECISION),
            scale: u8::try_from(scale).unwrap_or(MAX_DECIMAL_PRECISION),
        })
    }
}

// ── Ion types ───────────────────────────────────────────────────────

/// Nested-format value type a column can be serialized as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IonType {
    /// Untyped null.
    Null,
    /// Boolean.
    Bool,
    /// Arbitrary-size integer.
    Int,
    /// 64-bit binary float.
    Float,
    /// Arbitrary-precision decimal.
    Decimal,
    /// Timestamp with offset.
    Timestamp,
    /// Interned symbol.
    Symbol,
    /// Unicode string.
    String,
    /// Character large object.
    Clob,
    /// Binary large object.
    Blob,
    /// Ordered list.
    List,
    /// S-expression.
    Sexp,
    /// Struct (field-name to value).
    Struct,
}

str_enum!(IonType, lowercase_nodash, "unknown Ion type",
    Null => "null";
    Bool => "bool", "boolean";
    Int => "int", "integer";
    Float => "float";
    Decimal => "decimal";
    Timestamp => "timestamp";
    Symbol => "symbol";
    String => "string";
    Clob => "clob";
    Blob => "blob";
    List => "list";
    Sexp => "sexp";
    Struct => "struct"
);

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> ColumnType {
        s.parse().unwrap()
    }

    #[test]
    fn test_parse_primitives() {
        assert_eq!(parse("int"), ColumnType::Int);
        assert_eq!(parse(" BIGINT "), ColumnType::BigInt);
        assert_eq!(parse("string"), ColumnType::String);
        assert_eq!(parse("varchar(20)"), ColumnType::Varchar(20));
        assert_eq!(parse("char( 3 )"), ColumnType::Char(3));
        assert_eq!(
            parse("decimal"),
            ColumnType::Decimal {
                precision: 10,
                scale: 0
            }
        );
        assert_eq!(
            parse("decimal(12, 4)"),
            ColumnType::Decimal {
                precision: 12,
                scale: 4
            }
        );
    }

    #[test]
    fn test_parse_nested() {
        let ty = parse("struct<a:int,b:array<map<string,decimal(5,2)>>>");
        assert_eq!(
            ty,
            ColumnType::Struct(vec![
                ("a".into(), ColumnType::Int),
                (
                    "b".into(),
                    ColumnType::Array(Box::new(ColumnType::Map(
                        Box::new(ColumnType::String),
                        Box::new(ColumnType::Decimal {
                            precision: 5,
                            scale: 2
                        }),
                    )))
                ),
            ])
        );
        assert_eq!(
            parse("uniontype<int,string>"),
            ColumnType::Union(vec![ColumnType::Int, ColumnType::String])
        );
        assert_eq!(parse("struct<>"), ColumnType::Struct(vec![]));
    }

    #[test]
    fn test_parse_errors() {
        for bad in [
            "",
            "integerish",
            "array<int",
            "map<int>",
            "decimal(0)",
            "decimal(39,1)",
            "decimal(5,6)",
            "varchar(0)",
            "int int",
            "struct<a int>",
        ] {
            assert!(bad.parse::<ColumnType>().is_err(), "expected error for {bad:?}");
        }
    }

    #[test]
    fn test_display_is_canonical() {
        let text = "struct<id:bigint,tags:array<string>,m:map<string,uniontype<int,double>>,d:decimal(9,3)>";
        assert_eq!(parse(text).to_string(), text);
        assert_eq!(parse("INTEGER").to_string(), "int");
    }

    #[test]
    fn test_parse_list() {
        let types = ColumnType::parse_list("int:string:struct<a:int,b:string>,array<int>").unwrap();
        assert_eq!(types.len(), 4);
        assert_eq!(types[0], ColumnType::Int);
        assert_eq!(
            types[2],
            ColumnType::Struct(vec![
                ("a".into(), ColumnType::Int),
                ("b".into(), ColumnType::String)
            ])
        );
        assert_eq!(types[3], ColumnType::Array(Box::new(ColumnType::Int)));
        assert!(ColumnType::parse_list("").unwrap().is_empty());
        assert!(ColumnType::parse_list("int;string").is_err());
        assert!(ColumnType::parse_list("int:").is_err());
    }

    #[test]
    fn test_compatibility_table() {
        assert!(ColumnType::Int.accepts_override(IonType::String));
        assert!(ColumnType::BigInt.accepts_override(IonType::Decimal));
        assert!(!ColumnType::Int.accepts_override(IonType::Struct));
        assert!(ColumnType::Binary.accepts_override(IonType::Clob));
        assert!(!ColumnType::Binary.accepts_override(IonType::String));
        assert!(ColumnType::Array(Box::new(ColumnType::Int)).accepts_override(IonType::Sexp));
        assert!(!ColumnType::Struct(vec![]).accepts_override(IonType::Int));
        assert!(!ColumnType::Union(vec![ColumnType::Int]).accepts_override(IonType::Int));
        for ty in [ColumnType::Int, ColumnType::String, ColumnType::Timestamp] {
            assert!(!ty.accepts_override(IonType::Null));
        }
    }

    #[test]
    fn test_to_arrow() {
        assert_eq!(ColumnType::Int.to_arrow(), DataType::Int32);
        assert_eq!(ColumnType::Varchar(4).to_arrow(), DataType::Utf8);
        assert_eq!(
            ColumnType::Decimal {
                precision: 12,
                scale: 2
            }
            .to_arrow(),
            DataType::Decimal128(12, 2)
        );
        match parse("array<int>").to_arrow() {
            DataType::List(item) => assert_eq!(item.data_type(), &DataType::Int32),
            other => panic!("expected list, got {other:?}"),
        }
        match parse("map<string,int>").to_arrow() {
            DataType::Map(entries, sorted) => {
                assert!(!sorted);
                match entries.data_type() {
                    DataType::Struct(fields) => {
                        assert_eq!(fields[0].name(), "key");
                        assert!(!fields[0].is_nullable());
                        assert_eq!(fields[1].data_type(), &DataType::Int32);
                    }
                    other => panic!("expected struct entries, got {other:?}"),
                }
            }
            other => panic!("expected map, got {other:?}"),
        }
        match parse("uniontype<int,string>").to_arrow() {
            DataType::Union(fields, UnionMode::Sparse) => assert_eq!(fields.len(), 2),
            other => panic!("expected sparse union, got {other:?}"),
        }
    }

    #[test]
    fn test_ion_type_parse() {
        assert_eq!("STRING".parse::<IonType>(), Ok(IonType::String));
        assert_eq!(" boolean ".parse::<IonType>(), Ok(IonType::Bool));
        assert_eq!("sexp".parse::<IonType>(), Ok(IonType::Sexp));
        let err = "varchar".parse::<IonType>().unwrap_err();
        assert!(err.contains("unknown Ion type 'varchar'"));
        assert!(err.contains("symbol"));
        assert_eq!(IonType::Bool.to_string(), "bool");
    }

    fn union_of(members: usize) -> String {
        format!("uniontype<{}>", vec!["int"; members].join(","))
    }

    #[test]
    fn test_union_member_limit() {
        let widest = parse(&union_of(MAX_UNION_MEMBERS));
        match widest.to_arrow() {
            DataType::Union(fields, UnionMode::Sparse) => {
                assert_eq!(fields.len(), MAX_UNION_MEMBERS);
                assert_eq!(fields.iter().last().map(|(id, _)| id), Some(i8::MAX));
            }
            other => panic!("expected sparse union, got {other:?}"),
        }

        let err = union_of(MAX_UNION_MEMBERS + 1)
            .parse::<ColumnType>()
            .unwrap_err();
        assert!(err.contains("more than 128 members"), "{err}");
    }

    #[test]
    fn test_oversized_union_converts_without_overflow() {
        let wide = ColumnType::Union(vec![ColumnType::Int; MAX_UNION_MEMBERS + 3]);
        match wide.to_arrow() {
            DataType::Union(fields, _) => assert_eq!(fields.len(), MAX_UNION_MEMBERS),
            other => panic!("expected union, got {other:?}"),
        }
    }
}
