//! Error types for SerDe property resolution.
//!
//! Every variant is raised at construction time; once a
//! [`SerDeProperties`](crate::SerDeProperties) exists, none of its queries
//! can fail.

use thiserror::Error;

use crate::types::{ColumnType, IonType};

/// Result alias for property resolution.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Boxed error from an external collaborator.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur while resolving SerDe properties.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required property is absent.
    #[error("missing required property '{key}'")]
    MissingConfig {
        /// The property key.
        key: String,
    },

    /// A property is present but its value cannot be coerced.
    #[error("invalid value '{value}' for property '{key}': {message}")]
    InvalidValue {
        /// The property key.
        key: String,
        /// The raw value as configured.
        value: String,
        /// What was wrong with the value.
        message: String,
    },

    /// A column-scoped property names a column that is not in the schema.
    ///
    /// A name that only matches several declared columns case-insensitively
    /// is not a declared column either; those columns are listed in
    /// `candidates`.
    #[error("property '{key}' = '{value}' refers to unknown column '{column}'{hint}",
        hint = unknown_column_hint(.suggestion.as_deref(), .candidates))]
    UnknownColumn {
        /// The property key.
        key: String,
        /// The raw value as configured.
        value: String,
        /// The column segment of the key.
        column: String,
        /// Closest declared column, if any is near enough.
        suggestion: Option<String>,
        /// Declared columns equal to `column` ignoring case, when there are
        /// several.
        candidates: Vec<String>,
    },

    /// A serialize-as override is not valid for the column's declared type.
    #[error("property '{key}': column '{column}' of type {declared} cannot be serialized as {requested}")]
    IncompatibleOverride {
        /// The property key.
        key: String,
        /// The column name.
        column: String,
        /// The declared column type.
        declared: ColumnType,
        /// The requested Ion type.
        requested: IonType,
    },

    /// More than one distinct path expression is bound to the same column.
    #[error("column '{column}' has more than one path expression ({})",
        assignments(.keys, .values))]
    DuplicatePath {
        /// The column name.
        column: String,
        /// Every key that bound a path to the column.
        keys: Vec<String>,
        /// The expression each key carried, parallel to `keys`.
        values: Vec<String>,
    },

    /// Two keys set different values for the same column-scoped option.
    #[error("column '{column}' has conflicting '{option}' values ({})",
        assignments(.keys, .values))]
    ConflictingOverride {
        /// The column name.
        column: String,
        /// The option suffix, e.g. `fail_on_overflow`.
        option: String,
        /// Every key that set the option for the column.
        keys: Vec<String>,
        /// The raw value each key carried, parallel to `keys`.
        values: Vec<String>,
    },

    /// A key in the `ion.` namespace is not recognized (strict mode only).
    #[error("unrecognized property '{key}'")]
    UnrecognizedKey {
        /// The property key.
        key: String,
    },

    /// Column name and type lists differ in length.
    #[error("schema has {names} column names but {types} column types")]
    ColumnCountMismatch {
        /// Number of names.
        names: usize,
        /// Number of types.
        types: usize,
    },

    /// A column name appears twice in the schema.
    #[error("duplicate column '{column}' in schema")]
    DuplicateColumn {
        /// The repeated name.
        column: String,
    },

    /// The path-extraction engine rejected a column's expression.
    #[error("invalid path expression '{expression}'{}: {source}",
        .column.as_deref().map_or_else(String::new, |c| format!(" for column '{c}'")))]
    PathSyntax {
        /// The column the rule feeds; `None` when the engine reported a
        /// rule that does not exist.
        column: Option<String>,
        /// The key the expression came from (`None` for implicit rules).
        key: Option<String>,
        /// The expression as configured.
        expression: String,
        /// The engine's error, unchanged.
        #[source]
        source: BoxError,
    },
}

impl ConfigError {
    /// Builds an [`InvalidValue`](Self::InvalidValue) error.
    pub fn invalid_value(
        key: impl Into<String>,
        value: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            key: key.into(),
            value: value.into(),
            message: message.into(),
        }
    }

    /// The property key this error is about, when there is one.
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::MissingConfig { key }
            | Self::InvalidValue { key, .. }
            | Self::UnknownColumn { key, .. }
            | Self::IncompatibleOverride { key, .. }
            | Self::UnrecognizedKey { key } => Some(key),
            Self::PathSyntax { key, .. } => key.as_deref(),
            Self::DuplicatePath { .. }
            | Self::ConflictingOverride { .. }
            | Self::ColumnCountMismatch { .. }
            | Self::DuplicateColumn { .. } => None,
        }
    }

    /// The column this error is about, when there is one.
    #[must_use]
    pub fn column(&self) -> Option<&str> {
        match self {
            Self::UnknownColumn { column, .. }
            | Self::IncompatibleOverride { column, .. }
            | Self::DuplicatePath { column, .. }
            | Self::ConflictingOverride { column, .. }
            | Self::DuplicateColumn { column } => Some(column),
            Self::PathSyntax { column, .. } => column.as_deref(),
            _ => None,
        }
    }
}

fn unknown_column_hint(suggestion: Option<&str>, candidates: &[String]) -> String {
    if !candidates.is_empty() {
        return format!(
            ". It matches several columns ignoring case ({}); use the exact name",
            candidates.join(", ")
        );
    }
    suggestion.map_or_else(String::new, |s| format!(". Did you mean '{s}'?"))
}

fn assignments(keys: &[String], values: &[String]) -> String {
    keys.iter()
        .zip(values)
        .map(|(k, v)| format!("{k} = '{v}'"))
        .collect::<Vec<_>>()
        .join(", ")
}
