//! The resolved, read-only view a SerDe consults per record.

use arrow_schema::SchemaRef;
use ion_path_extract::{PathExtractor, PathExtractorBuilder};
use tracing::info;

use crate::base::BaseProperties;
use crate::config::{
    check_unrecognized_keys, EncodingConfig, ExtractorBuilder, FailOnOverflowConfig,
    IgnoreMalformedConfig, IonEncoding, KeyStrictness, PathExtractionConfig, PathRule,
    SerDeDefaults, SerializeAsConfig, SerializeNullConfig, SerializeNullStrategy,
    TimestampOffsetConfig, UNRECOGNIZED_KEYS_KEY,
};
use crate::error::ConfigResult;
use crate::schema::TableSchema;
use crate::source::RawConfiguration;
use crate::types::{ColumnType, IonType};

/// Typed, validated SerDe properties for one table.
///
/// Built once when the table is opened; every check happens during
/// construction, so no accessor can fail. The value is immutable and can be
/// shared across worker threads.
///
/// ```
/// use ion_serde_props::{ColumnType, IonType, PropertyMap, SerDeProperties};
///
/// let props: PropertyMap = [
///     ("ion.id.serialize_as", "string"),
///     ("ion.id.fail_on_overflow", "false"),
/// ]
/// .into_iter()
/// .collect();
///
/// let serde = SerDeProperties::new(
///     &props,
///     vec!["id".into(), "payload".into()],
///     vec![ColumnType::Int, ColumnType::Struct(vec![])],
/// )
/// .unwrap();
///
/// assert_eq!(serde.serialization_ion_type_for(0), Some(IonType::String));
/// assert!(!serde.fail_on_overflow_for("id"));
/// assert!(serde.fail_on_overflow_for("payload"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SerDeProperties<X = PathExtractor> {
    schema: TableSchema,
    encoding: EncodingConfig,
    serialize_null: SerializeNullConfig,
    timestamp_offset: TimestampOffsetConfig,
    fail_on_overflow: FailOnOverflowConfig,
    serialize_as: SerializeAsConfig,
    path_extraction: PathExtractionConfig<X>,
    ignore_malformed: IgnoreMalformedConfig,
    unrecognized_keys: Vec<String>,
}

impl SerDeProperties {
    /// Resolves `source` against the given columns with the compiled-in
    /// defaults and the bundled path extractor.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`](crate::ConfigError) any component
    /// raises.
    pub fn new(
        source: &dyn RawConfiguration,
        column_names: Vec<String>,
        column_types: Vec<ColumnType>,
    ) -> ConfigResult<Self> {
        Self::builder().build(source, column_names, column_types)
    }

    /// Resolves `source`, reading the columns from its `columns` and
    /// `columns.types` entries.
    ///
    /// # Errors
    ///
    /// As [`new`](Self::new), plus
    /// [`MissingConfig`](crate::ConfigError::MissingConfig) when either
    /// schema key is absent.
    pub fn from_table_properties(source: &dyn RawConfiguration) -> ConfigResult<Self> {
        Self::builder().build_from_table_properties(source)
    }

    /// A builder for custom defaults or a custom extractor.
    #[must_use]
    pub fn builder() -> SerDePropertiesBuilder<PathExtractorBuilder> {
        SerDePropertiesBuilder::new()
    }
}

impl<X> SerDeProperties<X> {
    /// Column names in declaration order.
    #[must_use]
    pub fn column_names(&self) -> &[String] {
        self.schema.names()
    }

    /// Column types in declaration order.
    #[must_use]
    pub fn column_types(&self) -> &[ColumnType] {
        self.schema.types()
    }

    /// The table schema.
    #[must_use]
    pub fn schema(&self) -> &TableSchema {
        &self.schema
    }

    /// The table schema as Arrow.
    #[must_use]
    pub fn arrow_schema(&self) -> SchemaRef {
        self.schema.to_arrow_schema()
    }

    /// Wire encoding for written records.
    #[must_use]
    pub fn encoding(&self) -> IonEncoding {
        self.encoding.encoding()
    }

    /// Offset applied to timestamps on write, in minutes.
    #[must_use]
    pub fn timestamp_offset_in_minutes(&self) -> i32 {
        self.timestamp_offset.minutes()
    }

    /// How null column values are written.
    #[must_use]
    pub fn serialize_null(&self) -> SerializeNullStrategy {
        self.serialize_null.strategy()
    }

    /// Whether overflow is fatal for `column`. Names the schema does not
    /// declare get the global flag.
    #[must_use]
    pub fn fail_on_overflow_for(&self, column: &str) -> bool {
        self.fail_on_overflow.for_column(column)
    }

    /// The Ion type override for column `index`, if any.
    #[must_use]
    pub fn serialization_ion_type_for(&self, index: usize) -> Option<IonType> {
        self.serialize_as.ion_type_for(index)
    }

    /// The built path extractor.
    #[must_use]
    pub fn path_extractor(&self) -> &X {
        self.path_extraction.extractor()
    }

    /// Whether path field names are matched case-sensitively.
    #[must_use]
    pub fn path_extractor_case_sensitivity(&self) -> bool {
        self.path_extraction.case_sensitive()
    }

    /// One path rule per column, in column order.
    #[must_use]
    pub fn path_rules(&self) -> &[PathRule] {
        self.path_extraction.rules()
    }

    /// Whether malformed records are skipped.
    #[must_use]
    pub fn ignore_malformed(&self) -> bool {
        self.ignore_malformed.ignore()
    }

    /// `ion.` keys no option recognized, sorted.
    #[must_use]
    pub fn unrecognized_keys(&self) -> &[String] {
        &self.unrecognized_keys
    }
}

/// Builds [`SerDeProperties`] with explicit defaults and extractor builder.
#[derive(Debug, Clone)]
pub struct SerDePropertiesBuilder<B> {
    defaults: SerDeDefaults,
    extractor_builder: B,
}

impl SerDePropertiesBuilder<PathExtractorBuilder> {
    /// Compiled-in defaults and the bundled path extractor.
    #[must_use]
    pub fn new() -> Self {
        Self {
            defaults: SerDeDefaults::default(),
            extractor_builder: PathExtractorBuilder::new(),
        }
    }
}

impl Default for SerDePropertiesBuilder<PathExtractorBuilder> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: ExtractorBuilder> SerDePropertiesBuilder<B> {
    /// Replaces the fallback values.
    #[must_use]
    pub fn defaults(mut self, defaults: SerDeDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    /// Replaces the extractor builder.
    #[must_use]
    pub fn extractor_builder<C: ExtractorBuilder>(self, builder: C) -> SerDePropertiesBuilder<C> {
        SerDePropertiesBuilder {
            defaults: self.defaults,
            extractor_builder: builder,
        }
    }

    /// Resolves `source` against the given columns.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`](crate::ConfigError) raised; no
    /// partially resolved value is produced.
    pub fn build(
        &self,
        source: &dyn RawConfiguration,
        column_names: Vec<String>,
        column_types: Vec<ColumnType>,
    ) -> ConfigResult<SerDeProperties<B::Extractor>> {
        let schema = TableSchema::try_new(column_names, column_types)?;
        self.build_with_schema(source, schema)
    }

    /// Resolves `source`, reading the schema from its `columns` and
    /// `columns.types` entries.
    ///
    /// # Errors
    ///
    /// As [`build`](Self::build), plus schema key errors.
    pub fn build_from_table_properties(
        &self,
        source: &dyn RawConfiguration,
    ) -> ConfigResult<SerDeProperties<B::Extractor>> {
        let schema = TableSchema::from_properties(&BaseProperties::new(source))?;
        self.build_with_schema(source, schema)
    }

    /// Resolves `source` against an existing schema.
    ///
    /// # Errors
    ///
    /// As [`build`](Self::build).
    pub fn build_with_schema(
        &self,
        source: &dyn RawConfiguration,
        schema: TableSchema,
    ) -> ConfigResult<SerDeProperties<B::Extractor>> {
        let d = &self.defaults;
        let base = BaseProperties::new(source);

        let encoding = EncodingConfig::from_properties(&base, d.encoding)?;
        let serialize_null = SerializeNullConfig::from_properties(&base, d.serialize_null)?;
        let timestamp_offset =
            TimestampOffsetConfig::from_properties(&base, d.timestamp_offset_minutes)?;
        let fail_on_overflow =
            FailOnOverflowConfig::from_properties(&base, &schema, d.fail_on_overflow)?;
        let serialize_as = SerializeAsConfig::from_properties(&base, &schema)?;
        let path_extraction = PathExtractionConfig::from_properties(
            &base,
            &schema,
            d.path_case_sensitive,
            &self.extractor_builder,
        )?;
        let ignore_malformed = IgnoreMalformedConfig::from_properties(&base, d.ignore_malformed)?;

        let strictness: KeyStrictness = base.enum_or(UNRECOGNIZED_KEYS_KEY, d.unrecognized_keys)?;
        let unrecognized_keys = check_unrecognized_keys(&base, strictness)?;

        info!(
            columns = schema.len(),
            encoding = %encoding.encoding(),
            "resolved SerDe properties"
        );
        Ok(SerDeProperties {
            schema,
            encoding,
            serialize_null,
            timestamp_offset,
            fail_on_overflow,
            serialize_as,
            path_extraction,
            ignore_malformed,
            unrecognized_keys,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;
    use crate::source::PropertyMap;

    fn make_config(pairs: &[(&str, &str)]) -> PropertyMap {
        pairs.iter().copied().collect()
    }

    fn columns() -> (Vec<String>, Vec<ColumnType>) {
        (
            vec!["id".into(), "payload".into()],
            vec![
                ColumnType::Int,
                ColumnType::Struct(vec![("a".into(), ColumnType::String)]),
            ],
        )
    }

    fn build(pairs: &[(&str, &str)]) -> ConfigResult<SerDeProperties> {
        let (names, types) = columns();
        SerDeProperties::new(&make_config(pairs), names, types)
    }

    #[test]
    fn test_defaults() {
        let p = build(&[]).unwrap();
        assert_eq!(p.column_names(), ["id", "payload"]);
        assert_eq!(p.encoding(), IonEncoding::Binary);
        assert_eq!(p.serialize_null(), SerializeNullStrategy::Omit);
        assert_eq!(p.timestamp_offset_in_minutes(), 0);
        assert!(p.fail_on_overflow_for("id"));
        assert_eq!(p.serialization_ion_type_for(0), None);
        assert!(p.path_extractor_case_sensitivity());
        assert!(!p.ignore_malformed());
        assert_eq!(p.path_extractor().len(), 2);
        assert!(p.unrecognized_keys().is_empty());
    }

    #[test]
    fn test_every_global_key() {
        let p = build(&[
            ("ion.encoding", "text"),
            ("ion.serialize_null", "untyped"),
            ("ion.timestamp.serialization_offset", "-480"),
            ("ion.fail_on_overflow", "false"),
            ("ion.path_extractor.case_sensitive", "false"),
            ("ion.ignore_malformed", "true"),
        ])
        .unwrap();
        assert_eq!(p.encoding(), IonEncoding::Text);
        assert_eq!(p.serialize_null(), SerializeNullStrategy::Untyped);
        assert_eq!(p.timestamp_offset_in_minutes(), -480);
        assert!(!p.fail_on_overflow_for("payload"));
        assert!(!p.path_extractor_case_sensitivity());
        assert!(p.ignore_malformed());
    }

    #[test]
    fn test_custom_defaults() {
        let (names, types) = columns();
        let defaults = SerDeDefaults {
            encoding: IonEncoding::Text,
            fail_on_overflow: false,
            ..SerDeDefaults::default()
        };
        let p = SerDeProperties::builder()
            .defaults(defaults)
            .build(&PropertyMap::new(), names, types)
            .unwrap();
        assert_eq!(p.encoding(), IonEncoding::Text);
        assert!(!p.fail_on_overflow_for("id"));
    }

    #[test]
    fn test_property_beats_custom_default() {
        let (names, types) = columns();
        let defaults = SerDeDefaults {
            encoding: IonEncoding::Text,
            ..SerDeDefaults::default()
        };
        let p = SerDeProperties::builder()
            .defaults(defaults)
            .build(&make_config(&[("ion.encoding", "binary")]), names, types)
            .unwrap();
        assert_eq!(p.encoding(), IonEncoding::Binary);
    }

    #[test]
    fn test_strictness_from_property() {
        let err = build(&[("ion.unrecognized_keys", "reject"), ("ion.encodng", "text")])
            .unwrap_err();
        assert!(matches!(err, ConfigError::UnrecognizedKey { ref key } if key == "ion.encodng"));

        let p = build(&[("ion.unrecognized_keys", "warn"), ("ion.encodng", "text")]).unwrap();
        assert_eq!(p.unrecognized_keys(), ["ion.encodng"]);
    }

    #[test]
    fn test_schema_mismatch() {
        let err = SerDeProperties::new(&PropertyMap::new(), vec!["a".into()], vec![]).unwrap_err();
        assert!(matches!(err, ConfigError::ColumnCountMismatch { .. }));
    }

    #[test]
    fn test_arrow_schema() {
        let p = build(&[]).unwrap();
        let schema = p.arrow_schema();
        assert_eq!(schema.fields().len(), 2);
        assert_eq!(schema.field(1).name(), "payload");
    }
}
