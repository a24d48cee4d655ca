//! Whether numeric overflow is fatal, per column.

use std::collections::HashMap;

use tracing::debug;

use crate::base::{parse_bool, BaseProperties};
use crate::config::{FAIL_ON_OVERFLOW_KEY, FAIL_ON_OVERFLOW_OPTION};
use crate::directive::Directive;
use crate::error::ConfigResult;
use crate::schema::TableSchema;

/// Resolved `ion.fail_on_overflow` plus `ion.<column>.fail_on_overflow`
/// overrides.
///
/// When the flag is off, values that do not fit the column type are
/// written as null instead of failing the record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailOnOverflowConfig {
    /// Declared name to index.
    exact: HashMap<String, usize>,
    /// Lower-cased name to index; `None` when several columns share it.
    folded: HashMap<String, Option<usize>>,
    directive: Directive<bool>,
}

impl FailOnOverflowConfig {
    /// Reads the global flag (falling back to `default`) and every column
    /// override.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::InvalidValue`](crate::ConfigError::InvalidValue) for
    ///   a non-boolean value
    /// - [`ConfigError::UnknownColumn`](crate::ConfigError::UnknownColumn)
    ///   for an override naming an undeclared column
    /// - [`ConfigError::ConflictingOverride`](crate::ConfigError::ConflictingOverride)
    ///   when two keys set one column differently
    pub fn from_properties(
        base: &BaseProperties<'_>,
        schema: &TableSchema,
        default: bool,
    ) -> ConfigResult<Self> {
        let global = base.bool_or(FAIL_ON_OVERFLOW_KEY, default)?;
        let directive = Directive::resolve(base, schema, FAIL_ON_OVERFLOW_OPTION, global, |o| {
            parse_bool(o.key, o.value)
        })?;
        debug!(
            default = global,
            overrides = directive.override_count(),
            "resolved fail_on_overflow"
        );
        let mut exact = HashMap::with_capacity(schema.len());
        let mut folded: HashMap<String, Option<usize>> = HashMap::with_capacity(schema.len());
        for (index, name) in schema.names().iter().enumerate() {
            exact.insert(name.clone(), index);
            folded
                .entry(name.to_ascii_lowercase())
                .and_modify(|slot| *slot = None)
                .or_insert(Some(index));
        }
        Ok(Self {
            exact,
            folded,
            directive,
        })
    }

    /// The global flag.
    #[must_use]
    pub fn default_value(&self) -> bool {
        *self.directive.default_value()
    }

    /// The effective flag for column `index`.
    #[must_use]
    pub fn for_index(&self, index: usize) -> bool {
        *self.directive.value_for(index)
    }

    /// The effective flag for `column`.
    ///
    /// Names resolve like override keys do. A name outside the schema gets
    /// the global flag.
    #[must_use]
    pub fn for_column(&self, column: &str) -> bool {
        self.exact
            .get(column)
            .copied()
            .or_else(|| {
                self.folded
                    .get(&column.to_ascii_lowercase())
                    .copied()
                    .flatten()
            })
            .map_or_else(|| self.default_value(), |index| self.for_index(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;
    use crate::source::PropertyMap;
    use crate::types::ColumnType;

    fn schema() -> TableSchema {
        TableSchema::try_new(
            vec!["id".into(), "payload".into()],
            vec![ColumnType::Int, ColumnType::Struct(vec![])],
        )
        .unwrap()
    }

    fn resolve(pairs: &[(&str, &str)]) -> ConfigResult<FailOnOverflowConfig> {
        let config: PropertyMap = pairs.iter().copied().collect();
        FailOnOverflowConfig::from_properties(&BaseProperties::new(&config), &schema(), true)
    }

    #[test]
    fn test_compiled_default() {
        let c = resolve(&[]).unwrap();
        assert!(c.for_column("id"));
        assert!(c.for_column("payload"));
    }

    #[test]
    fn test_column_override() {
        let c = resolve(&[("ion.id.fail_on_overflow", "false")]).unwrap();
        assert!(!c.for_column("id"));
        assert!(c.for_column("payload"));
        assert!(!c.for_index(0));
    }

    #[test]
    fn test_global_then_override() {
        let c = resolve(&[
            ("ion.fail_on_overflow", "false"),
            ("ion.payload.fail_on_overflow", "true"),
        ])
        .unwrap();
        assert!(!c.default_value());
        assert!(!c.for_column("id"));
        assert!(c.for_column("payload"));
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let c = resolve(&[("ion.id.fail_on_overflow", "false")]).unwrap();
        assert!(!c.for_column("ID"));
    }

    #[test]
    fn test_undeclared_lookup_gets_default() {
        let c = resolve(&[("ion.fail_on_overflow", "false")]).unwrap();
        assert!(!c.for_column("nope"));
    }

    #[test]
    fn test_lookup_with_case_variant_columns() {
        let schema = TableSchema::try_new(
            vec!["name".into(), "NAME".into(), "id".into()],
            vec![ColumnType::Int, ColumnType::Int, ColumnType::Int],
        )
        .unwrap();
        let config: PropertyMap = [
            ("ion.fail_on_overflow", "false"),
            ("ion.name.fail_on_overflow", "true"),
            ("ion.NAME.fail_on_overflow", "true"),
        ]
        .into_iter()
        .collect();
        let c = FailOnOverflowConfig::from_properties(&BaseProperties::new(&config), &schema, true)
            .unwrap();
        assert!(c.for_column("name"));
        assert!(c.for_column("NAME"));
        // matches two columns ignoring case, so the global flag applies
        assert!(!c.for_column("Name"));
        assert!(!c.for_column("ID"));
    }

    #[test]
    fn test_unknown_column_override() {
        let err = resolve(&[("ion.idd.fail_on_overflow", "false")]).unwrap_err();
        match err {
            ConfigError::UnknownColumn {
                column, suggestion, ..
            } => {
                assert_eq!(column, "idd");
                assert_eq!(suggestion.as_deref(), Some("id"));
            }
            other => panic!("expected UnknownColumn, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_global() {
        let err = resolve(&[("ion.fail_on_overflow", "sometimes")]).unwrap_err();
        assert_eq!(err.key(), Some("ion.fail_on_overflow"));
    }
}
