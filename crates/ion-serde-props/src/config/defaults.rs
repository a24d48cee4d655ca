//! Compiled-in fallbacks for every global option.
//!
//! [`SerDeDefaults`] is what a property falls back to when its key is
//! absent. Hosts that want different fallbacks (for example from a job-level
//! settings file) deserialize or build their own and pass it to
//! [`SerDeProperties::builder`](crate::SerDeProperties::builder).

use serde::{Deserialize, Serialize};

use super::encoding::IonEncoding;
use super::serialize_null::SerializeNullStrategy;

// ---------------------------------------------------------------------------
// KeyStrictness
// ---------------------------------------------------------------------------

/// Handling of `ion.` keys that no option recognizes.
///
/// Column-scoped keys with a known option and an undeclared column are
/// always an error; this only governs keys whose shape is not recognized
/// at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyStrictness {
    /// Unrecognized keys are skipped silently.
    #[default]
    Ignore,
    /// Each unrecognized key is logged at `warn`.
    Warn,
    /// The first unrecognized key fails construction.
    Reject,
}

str_enum!(KeyStrictness, lowercase, "unknown key strictness",
    Ignore => "ignore";
    Warn => "warn";
    Reject => "reject"
);

// ---------------------------------------------------------------------------
// SerDeDefaults
// ---------------------------------------------------------------------------

/// Fallback values for options whose key is absent.
///
/// Deserializes from a partial document; missing fields take the values
/// of [`SerDeDefaults::default`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SerDeDefaults {
    /// `ion.encoding`
    pub encoding: IonEncoding,
    /// `ion.serialize_null`
    pub serialize_null: SerializeNullStrategy,
    /// `ion.timestamp.serialization_offset`, minutes.
    pub timestamp_offset_minutes: i32,
    /// `ion.fail_on_overflow`
    pub fail_on_overflow: bool,
    /// `ion.path_extractor.case_sensitive`
    pub path_case_sensitive: bool,
    /// `ion.ignore_malformed`
    pub ignore_malformed: bool,
    /// `ion.unrecognized_keys`
    pub unrecognized_keys: KeyStrictness,
}

impl Default for SerDeDefaults {
    fn default() -> Self {
        Self {
            encoding: IonEncoding::Binary,
            serialize_null: SerializeNullStrategy::Omit,
            timestamp_offset_minutes: 0,
            fail_on_overflow: true,
            path_case_sensitive: true,
            ignore_malformed: false,
            unrecognized_keys: KeyStrictness::Ignore,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let d = SerDeDefaults::default();
        assert_eq!(d.encoding, IonEncoding::Binary);
        assert_eq!(d.serialize_null, SerializeNullStrategy::Omit);
        assert_eq!(d.timestamp_offset_minutes, 0);
        assert!(d.fail_on_overflow);
        assert!(d.path_case_sensitive);
        assert!(!d.ignore_malformed);
        assert_eq!(d.unrecognized_keys, KeyStrictness::Ignore);
    }

    #[test]
    fn test_deserialize_partial() {
        let d: SerDeDefaults = serde_json::from_str(
            r#"{"encoding": "text", "serialize_null": "typed_null", "fail_on_overflow": false}"#,
        )
        .unwrap();
        assert_eq!(d.encoding, IonEncoding::Text);
        assert_eq!(d.serialize_null, SerializeNullStrategy::Typed);
        assert!(!d.fail_on_overflow);
        assert!(d.path_case_sensitive);
        assert_eq!(d.unrecognized_keys, KeyStrictness::Ignore);
    }

    #[test]
    fn test_deserialize_empty() {
        let d: SerDeDefaults = serde_json::from_str("{}").unwrap();
        assert_eq!(d, SerDeDefaults::default());
    }

    #[test]
    fn test_strictness_parse() {
        assert_eq!("WARN".parse::<KeyStrictness>().unwrap(), KeyStrictness::Warn);
        assert!("loud".parse::<KeyStrictness>().is_err());
        assert_eq!(KeyStrictness::Reject.to_string(), "reject");
    }
}
