//! Wire encoding of serialized records.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::base::BaseProperties;
use crate::config::ENCODING_KEY;
use crate::error::ConfigResult;

/// How serialized records are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IonEncoding {
    /// Compact binary Ion.
    #[default]
    Binary,
    /// Human-readable text Ion.
    Text,
}

str_enum!(IonEncoding, lowercase, "unknown encoding",
    Binary => "binary";
    Text => "text"
);

/// Resolved `ion.encoding`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodingConfig {
    encoding: IonEncoding,
}

impl EncodingConfig {
    /// Reads `ion.encoding`, falling back to `default`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`](crate::ConfigError::InvalidValue)
    /// for anything other than `binary` or `text`.
    pub fn from_properties(base: &BaseProperties<'_>, default: IonEncoding) -> ConfigResult<Self> {
        let encoding = base.enum_or(ENCODING_KEY, default)?;
        debug!(%encoding, "resolved encoding");
        Ok(Self { encoding })
    }

    /// The configured encoding.
    #[must_use]
    pub fn encoding(&self) -> IonEncoding {
        self.encoding
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;
    use crate::source::PropertyMap;

    fn resolve(pairs: &[(&str, &str)]) -> ConfigResult<IonEncoding> {
        let config: PropertyMap = pairs.iter().copied().collect();
        EncodingConfig::from_properties(&BaseProperties::new(&config), IonEncoding::Binary)
            .map(|c| c.encoding())
    }

    #[test]
    fn test_default_when_absent() {
        assert_eq!(resolve(&[]).unwrap(), IonEncoding::Binary);
    }

    #[test]
    fn test_parse_case_insensitive() {
        assert_eq!(resolve(&[("ion.encoding", "TEXT")]).unwrap(), IonEncoding::Text);
        assert_eq!(resolve(&[("ion.encoding", " binary ")]).unwrap(), IonEncoding::Binary);
    }

    #[test]
    fn test_invalid_encoding() {
        let err = resolve(&[("ion.encoding", "json")]).unwrap_err();
        match err {
            ConfigError::InvalidValue {
                key,
                value,
                message,
            } => {
                assert_eq!(key, "ion.encoding");
                assert_eq!(value, "json");
                assert!(message.contains("binary, text"));
            }
            other => panic!("expected InvalidValue, got {other:?}"),
        }
    }

    #[test]
    fn test_display_round_trip() {
        assert_eq!(IonEncoding::Text.to_string(), "text");
        assert_eq!("binary".parse::<IonEncoding>().unwrap(), IonEncoding::Binary);
    }
}
