//! Error types for search-path compilation.

use thiserror::Error;

/// Result alias for path operations.
pub type PathResult<T> = Result<T, PathError>;

/// Errors produced while compiling a search-path expression.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    /// The expression was empty or whitespace only.
    #[error("empty search path expression")]
    Empty,

    /// The expression does not follow the search-path grammar.
    #[error("invalid search path '{expression}' at position {position}: {message}")]
    Syntax {
        /// The expression as written.
        expression: String,
        /// Character offset where compilation stopped.
        position: usize,
        /// What the compiler expected.
        message: String,
    },
}

impl PathError {
    pub(crate) fn syntax(expression: &str, position: usize, message: impl Into<String>) -> Self {
        Self::Syntax {
            expression: expression.to_string(),
            position,
            message: message.into(),
        }
    }
}
