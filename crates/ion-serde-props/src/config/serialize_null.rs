//! How a null column value is written into the output struct.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::base::BaseProperties;
use crate::config::SERIALIZE_NULL_KEY;
use crate::error::ConfigResult;

/// Rendering of null column values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SerializeNullStrategy {
    /// The field is left out of the struct.
    #[default]
    Omit,
    /// The field is written as an untyped `null`.
    #[serde(alias = "untyped_null")]
    Untyped,
    /// The field is written as a null of the column's Ion type, e.g. `null.int`.
    #[serde(alias = "typed_null")]
    Typed,
}

str_enum!(SerializeNullStrategy, lowercase, "unknown null strategy",
    Omit => "omit";
    Untyped => "untyped", "untyped_null";
    Typed => "typed", "typed_null"
);

/// Resolved `ion.serialize_null`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SerializeNullConfig {
    strategy: SerializeNullStrategy,
}

impl SerializeNullConfig {
    /// Reads `ion.serialize_null`, falling back to `default`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`](crate::ConfigError::InvalidValue)
    /// for an unknown strategy.
    pub fn from_properties(
        base: &BaseProperties<'_>,
        default: SerializeNullStrategy,
    ) -> ConfigResult<Self> {
        let strategy = base.enum_or(SERIALIZE_NULL_KEY, default)?;
        debug!(%strategy, "resolved null strategy");
        Ok(Self { strategy })
    }

    /// The configured strategy.
    #[must_use]
    pub fn strategy(&self) -> SerializeNullStrategy {
        self.strategy
    }
}
