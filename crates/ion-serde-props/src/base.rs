//! Common property parsing: lookups, typed coercion and key namespacing.
//!
//! Global keys live directly under [`NAMESPACE`] (`ion.encoding`); per-column
//! keys put the column name between the namespace and an option suffix
//! (`ion.<column>.serialize_as`). [`BaseProperties::column_scoped`]
//! enumerates the configured keys for one suffix so callers can validate
//! every column they name.

use std::str::FromStr;

use crate::error::{ConfigError, ConfigResult};
use crate::source::RawConfiguration;
use crate::suggest::{resolve_column, ColumnResolveError};

/// Prefix shared by every SerDe property.
pub const NAMESPACE: &str = "ion.";

/// Splits a column-scoped key into `(column, option)`.
///
/// The option is the text after the last `.`, so column segments may
/// themselves contain dots.
#[must_use]
pub fn split_column_key(key: &str) -> Option<(&str, &str)> {
    let rest = key.strip_prefix(NAMESPACE)?;
    let (column, option) = rest.rsplit_once('.')?;
    (!column.is_empty() && !option.is_empty()).then_some((column, option))
}

/// A configured column-scoped key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnScopedKey {
    /// The full key.
    pub key: String,
    /// The column segment as written.
    pub column: String,
    /// The raw value.
    pub value: String,
}

/// Parses a boolean (`true`/`false`, case-insensitive).
///
/// # Errors
///
/// Returns [`ConfigError::InvalidValue`] for anything else.
pub fn parse_bool(key: &str, value: &str) -> ConfigResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ConfigError::invalid_value(
            key,
            value,
            "expected 'true' or 'false'",
        )),
    }
}

/// Parses a signed 32-bit integer.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidValue`] if `value` is not an integer.
pub fn parse_int(key: &str, value: &str) -> ConfigResult<i32> {
    value
        .trim()
        .parse()
        .map_err(|e| ConfigError::invalid_value(key, value, format!("expected an integer ({e})")))
}

/// Parses an enumerated value through its `FromStr` impl.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidValue`] carrying the enum's message.
pub fn parse_enum<E>(key: &str, value: &str) -> ConfigResult<E>
where
    E: FromStr<Err = String>,
{
    value
        .parse()
        .map_err(|message| ConfigError::invalid_value(key, value, message))
}

/// Splits a comma-separated list, trimming items and dropping empty ones.
#[must_use]
pub fn parse_string_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Typed view over a [`RawConfiguration`].
#[derive(Clone, Copy)]
pub struct BaseProperties<'a> {
    source: &'a dyn RawConfiguration,
}

impl std::fmt::Debug for BaseProperties<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BaseProperties")
            .field("keys", &self.source.keys())
            .finish()
    }
}

impl<'a> BaseProperties<'a> {
    /// Wraps a raw source.
    pub fn new(source: &'a dyn RawConfiguration) -> Self {
        Self { source }
    }

    /// Returns the value for `key`, if set.
    #[must_use]
    pub fn get_optional(&self, key: &str) -> Option<String> {
        self.source.get(key)
    }

    /// Returns the value for `key`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingConfig`] if the key is absent.
    pub fn get_required(&self, key: &str) -> ConfigResult<String> {
        self.source.get(key).ok_or_else(|| ConfigError::MissingConfig {
            key: key.to_string(),
        })
    }

    /// Boolean value for `key`, or `default` when absent.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if the value is not a boolean.
    pub fn bool_or(&self, key: &str, default: bool) -> ConfigResult<bool> {
        self.get_optional(key)
            .map_or(Ok(default), |v| parse_bool(key, &v))
    }

    /// Integer value for `key`, or `default` when absent.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if the value is not an integer.
    pub fn int_or(&self, key: &str, default: i32) -> ConfigResult<i32> {
        self.get_optional(key)
            .map_or(Ok(default), |v| parse_int(key, &v))
    }

    /// Enumerated value for `key`, or `default` when absent.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if the value is not a member.
    pub fn enum_or<E>(&self, key: &str, default: E) -> ConfigResult<E>
    where
        E: FromStr<Err = String>,
    {
        self.get_optional(key)
            .map_or(Ok(default), |v| parse_enum(key, &v))
    }

    /// Comma-separated list for `key`, if set.
    #[must_use]
    pub fn string_list(&self, key: &str) -> Option<Vec<String>> {
        self.get_optional(key).map(|v| parse_string_list(&v))
    }

    /// Every configured `ion.<column>.<option>` key, sorted by key.
    #[must_use]
    pub fn column_scoped(&self, option: &str) -> Vec<ColumnScopedKey> {
        let mut keys = self.source.keys();
        keys.sort();
        keys.dedup();
        keys.into_iter()
            .filter_map(|key| {
                let (column, opt) = split_column_key(&key)?;
                if opt != option {
                    return None;
                }
                let column = column.to_string();
                let value = self.source.get(&key)?;
                Some(ColumnScopedKey { key, column, value })
            })
            .collect()
    }

    /// Keys under [`NAMESPACE`], sorted.
    #[must_use]
    pub fn namespaced_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .source
            .keys()
            .into_iter()
            .filter(|k| k.starts_with(NAMESPACE))
            .collect();
        keys.sort();
        keys.dedup();
        keys
    }
}

/// Resolves the column segment of `key` against the declared names.
///
/// # Errors
///
/// Returns [`ConfigError::UnknownColumn`] carrying `value`. A near miss adds
/// a suggestion; a segment that matches several columns only when case is
/// ignored lists them as candidates.
pub fn resolve_key_column(
    key: &str,
    value: &str,
    column: &str,
    columns: &[&str],
) -> ConfigResult<usize> {
    resolve_column(column, columns).map_err(|e| {
        let (suggestion, candidates) = match e {
            ColumnResolveError::NotFound { suggestion } => (suggestion, Vec::new()),
            ColumnResolveError::Ambiguous { matches } => (None, matches),
        };
        ConfigError::UnknownColumn {
            key: key.to_string(),
            value: value.to_string(),
            column: column.to_string(),
            suggestion,
            candidates,
        }
    })
}
