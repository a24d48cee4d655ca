//! Configuration components, one per option family.
//!
//! Each component reads its own slice of keys through
//! [`BaseProperties`] and validates it against the [`TableSchema`]
//! independently of the others.
//!
//! | Key | Component |
//! |---|---|
//! | `ion.encoding` | [`EncodingConfig`] |
//! | `ion.serialize_null` | [`SerializeNullConfig`] |
//! | `ion.timestamp.serialization_offset` | [`TimestampOffsetConfig`] |
//! | `ion.fail_on_overflow`, `ion.<column>.fail_on_overflow` | [`FailOnOverflowConfig`] |
//! | `ion.<column>.serialize_as` | [`SerializeAsConfig`] |
//! | `ion.<column>.path_extractor`, `ion.path_extractor.case_sensitive` | [`PathExtractionConfig`] |
//! | `ion.ignore_malformed` | [`IgnoreMalformedConfig`] |
//! | `ion.unrecognized_keys` | [`check_unrecognized_keys`] |
//!
//! [`TableSchema`]: crate::schema::TableSchema

pub mod defaults;
pub mod encoding;
pub mod fail_on_overflow;
pub mod ignore_malformed;
pub mod path_extraction;
pub mod serialize_as;
pub mod serialize_null;
pub mod timestamp_offset;

pub use defaults::{KeyStrictness, SerDeDefaults};
pub use encoding::{EncodingConfig, IonEncoding};
pub use fail_on_overflow::FailOnOverflowConfig;
pub use ignore_malformed::IgnoreMalformedConfig;
pub use path_extraction::{ExtractorBuilder, PathExtractionConfig, PathRule, RejectedRule};
pub use serialize_as::SerializeAsConfig;
pub use serialize_null::{SerializeNullConfig, SerializeNullStrategy};
pub use timestamp_offset::TimestampOffsetConfig;

use tracing::warn;

use crate::base::{split_column_key, BaseProperties};
use crate::error::{ConfigError, ConfigResult};

/// Global wire encoding.
pub const ENCODING_KEY: &str = "ion.encoding";
/// Global null strategy.
pub const SERIALIZE_NULL_KEY: &str = "ion.serialize_null";
/// Global timestamp offset in minutes.
pub const TIMESTAMP_OFFSET_KEY: &str = "ion.timestamp.serialization_offset";
/// Global fail-on-overflow flag.
pub const FAIL_ON_OVERFLOW_KEY: &str = "ion.fail_on_overflow";
/// Global path case-sensitivity flag.
pub const PATH_CASE_SENSITIVE_KEY: &str = "ion.path_extractor.case_sensitive";
/// Global ignore-malformed flag.
pub const IGNORE_MALFORMED_KEY: &str = "ion.ignore_malformed";
/// Strictness for unrecognized keys.
pub const UNRECOGNIZED_KEYS_KEY: &str = "ion.unrecognized_keys";

/// Suffix of per-column fail-on-overflow keys.
pub const FAIL_ON_OVERFLOW_OPTION: &str = "fail_on_overflow";
/// Suffix of per-column serialize-as keys.
pub const SERIALIZE_AS_OPTION: &str = "serialize_as";
/// Suffix of per-column path keys.
pub const PATH_EXTRACTOR_OPTION: &str = "path_extractor";

/// Every global key.
pub const GLOBAL_KEYS: &[&str] = &[
    ENCODING_KEY,
    SERIALIZE_NULL_KEY,
    TIMESTAMP_OFFSET_KEY,
    FAIL_ON_OVERFLOW_KEY,
    PATH_CASE_SENSITIVE_KEY,
    IGNORE_MALFORMED_KEY,
    UNRECOGNIZED_KEYS_KEY,
];

/// Every per-column option suffix.
pub const COLUMN_OPTIONS: &[&str] = &[
    FAIL_ON_OVERFLOW_OPTION,
    SERIALIZE_AS_OPTION,
    PATH_EXTRACTOR_OPTION,
];

/// Returns `true` if `key` is a global key or has a per-column option
/// suffix. Whether the column exists is not checked here.
#[must_use]
pub fn is_recognized_key(key: &str) -> bool {
    GLOBAL_KEYS.contains(&key)
        || split_column_key(key).is_some_and(|(_, option)| COLUMN_OPTIONS.contains(&option))
}

/// Applies `strictness` to every `ion.` key [`is_recognized_key`] rejects
/// and returns those keys, sorted.
///
/// # Errors
///
/// Returns [`ConfigError::UnrecognizedKey`] for the first such key under
/// [`KeyStrictness::Reject`].
pub fn check_unrecognized_keys(
    base: &BaseProperties<'_>,
    strictness: KeyStrictness,
) -> ConfigResult<Vec<String>> {
    let unrecognized: Vec<String> = base
        .namespaced_keys()
        .into_iter()
        .filter(|k| !is_recognized_key(k))
        .collect();

    match strictness {
        KeyStrictness::Ignore => {}
        KeyStrictness::Warn => {
            for key in &unrecognized {
                warn!(key = %key, "ignoring unrecognized property");
            }
        }
        KeyStrictness::Reject => {
            if let Some(key) = unrecognized.first() {
                return Err(ConfigError::UnrecognizedKey { key: key.clone() });
            }
        }
    }
    Ok(unrecognized)
}
