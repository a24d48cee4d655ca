//! Per-column Ion type overrides.

use tracing::debug;

use crate::base::{parse_enum, BaseProperties};
use crate::config::SERIALIZE_AS_OPTION;
use crate::directive::Directive;
use crate::error::{ConfigError, ConfigResult};
use crate::schema::TableSchema;
use crate::types::IonType;

/// Resolved `ion.<column>.serialize_as` overrides, indexed by column.
///
/// A column without an override is written with the serializer's default
/// mapping for its declared type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerializeAsConfig {
    by_index: Vec<Option<IonType>>,
}

impl SerializeAsConfig {
    /// Reads every override and checks it against the declared type.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::InvalidValue`] for an unknown Ion type name
    /// - [`ConfigError::UnknownColumn`] for an undeclared column
    /// - [`ConfigError::IncompatibleOverride`] when the declared type cannot
    ///   be written as the requested Ion type
    /// - [`ConfigError::ConflictingOverride`] when two keys disagree
    pub fn from_properties(base: &BaseProperties<'_>, schema: &TableSchema) -> ConfigResult<Self> {
        let directive = Directive::resolve(base, schema, SERIALIZE_AS_OPTION, None, |o| {
            let requested: IonType = parse_enum(o.key, o.value)?;
            let declared = &schema.types()[o.index];
            if !declared.accepts_override(requested) {
                return Err(ConfigError::IncompatibleOverride {
                    key: o.key.to_string(),
                    column: o.column.to_string(),
                    declared: declared.clone(),
                    requested,
                });
            }
            Ok(Some(requested))
        })?;

        let by_index: Vec<Option<IonType>> =
            (0..schema.len()).map(|i| *directive.value_for(i)).collect();
        debug!(
            overrides = directive.override_count(),
            "resolved serialize_as"
        );
        Ok(Self { by_index })
    }

    /// The override for column `index`. `None` for columns without one and
    /// for indexes past the end of the schema.
    #[must_use]
    pub fn ion_type_for(&self, index: usize) -> Option<IonType> {
        self.by_index.get(index).copied().flatten()
    }

    /// Number of columns carrying an override.
    #[must_use]
    pub fn override_count(&self) -> usize {
        self.by_index.iter().filter(|t| t.is_some()).count()
    }
}
