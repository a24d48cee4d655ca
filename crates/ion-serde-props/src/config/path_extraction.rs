//! Column path expressions and the extractor they are compiled into.
//!
//! Every column gets exactly one [`PathRule`]: the expression from
//! `ion.<column>.path_extractor` when configured, otherwise a rule matching
//! the top-level struct field named after the column. The rules are handed
//! to an [`ExtractorBuilder`]; this module never interprets the grammar.

use std::fmt;

use ion_path_extract::{PathError, PathExtractor, PathExtractorBuilder, SearchPath};
use tracing::debug;

use crate::base::BaseProperties;
use crate::config::{PATH_CASE_SENSITIVE_KEY, PATH_EXTRACTOR_OPTION};
use crate::directive::Directive;
use crate::error::{ConfigError, ConfigResult};
use crate::schema::TableSchema;

/// Where to find one column's value in an input document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathRule {
    /// The declared column the rule feeds.
    pub column: String,
    /// The search-path expression.
    pub expression: String,
    /// Whether field names must match exactly.
    pub case_sensitive: bool,
    /// The key the expression came from; `None` for the implicit rule.
    pub key: Option<String>,
}

impl PathRule {
    /// The rule used for a column without a configured expression.
    #[must_use]
    pub fn implicit(column: &str, case_sensitive: bool) -> Self {
        Self {
            column: column.to_string(),
            expression: SearchPath::top_level_field(column).to_string(),
            case_sensitive,
            key: None,
        }
    }

    /// Returns `true` when the expression came from a property.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.key.is_some()
    }
}

/// A rule the extractor builder refused, by position in the rule list.
#[derive(Debug)]
pub struct RejectedRule<E> {
    /// Index of the rejected rule.
    pub index: usize,
    /// The builder's error.
    pub source: E,
}

impl<E: fmt::Display> fmt::Display for RejectedRule<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rule {} rejected: {}", self.index, self.source)
    }
}

/// Compiles path rules into an extractor.
///
/// The extractor is opaque here; implementations own the grammar and the
/// matching algorithm.
pub trait ExtractorBuilder {
    /// The immutable extractor produced.
    type Extractor;
    /// Error for a malformed expression.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Builds an extractor from `rules`, in order.
    ///
    /// # Errors
    ///
    /// Returns the first rule the builder cannot compile.
    fn build(&self, rules: &[PathRule]) -> Result<Self::Extractor, RejectedRule<Self::Error>>;
}

impl ExtractorBuilder for PathExtractorBuilder {
    type Extractor = PathExtractor;
    type Error = PathError;

    fn build(&self, rules: &[PathRule]) -> Result<PathExtractor, RejectedRule<PathError>> {
        let mut builder = self.clone();
        for (index, rule) in rules.iter().enumerate() {
            builder = builder
                .with_search_path_case(&rule.column, &rule.expression, rule.case_sensitive)
                .map_err(|source| RejectedRule { index, source })?;
        }
        Ok(builder.build())
    }
}

/// Resolved path rules, the case-sensitivity flag and the built extractor.
#[derive(Debug, Clone, PartialEq)]
pub struct PathExtractionConfig<X = PathExtractor> {
    case_sensitive: bool,
    rules: Vec<PathRule>,
    extractor: X,
}

impl<X> PathExtractionConfig<X> {
    /// Resolves every column's rule and builds the extractor.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::InvalidValue`] for a non-boolean case flag
    /// - [`ConfigError::UnknownColumn`] for a path key naming an undeclared
    ///   column
    /// - [`ConfigError::DuplicatePath`] when one column gets two different
    ///   expressions
    /// - [`ConfigError::PathSyntax`] when the builder rejects an expression
    pub fn from_properties<B>(
        base: &BaseProperties<'_>,
        schema: &TableSchema,
        default_case_sensitive: bool,
        builder: &B,
    ) -> ConfigResult<Self>
    where
        B: ExtractorBuilder<Extractor = X>,
    {
        let case_sensitive = base.bool_or(PATH_CASE_SENSITIVE_KEY, default_case_sensitive)?;

        let mut keys: Vec<Option<String>> = vec![None; schema.len()];
        let directive = Directive::resolve(base, schema, PATH_EXTRACTOR_OPTION, None, |o| {
            keys[o.index] = Some(o.key.to_string());
            Ok(Some(o.value.trim().to_string()))
        })
        .map_err(|e| match e {
            ConfigError::ConflictingOverride {
                column,
                keys,
                values,
                ..
            } => ConfigError::DuplicatePath {
                column,
                keys,
                values,
            },
            other => other,
        })?;

        let rules: Vec<PathRule> = schema
            .names()
            .iter()
            .enumerate()
            .map(|(index, column)| match directive.value_for(index) {
                Some(expression) => PathRule {
                    column: column.clone(),
                    expression: expression.clone(),
                    case_sensitive,
                    key: keys[index].take(),
                },
                None => PathRule::implicit(column, case_sensitive),
            })
            .collect();

        let extractor = builder.build(&rules).map_err(|rejected| {
            let source = Box::new(rejected.source);
            match rules.get(rejected.index) {
                Some(rule) => ConfigError::PathSyntax {
                    column: Some(rule.column.clone()),
                    key: rule.key.clone(),
                    expression: rule.expression.clone(),
                    source,
                },
                None => ConfigError::PathSyntax {
                    column: None,
                    key: None,
                    expression: String::new(),
                    source,
                },
            }
        })?;

        debug!(
            case_sensitive,
            configured = directive.override_count(),
            rules = rules.len(),
            "resolved path extraction"
        );
        Ok(Self {
            case_sensitive,
            rules,
            extractor,
        })
    }

    /// Whether field names are matched case-sensitively.
    #[must_use]
    pub fn case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    /// One rule per column, in column order.
    #[must_use]
    pub fn rules(&self) -> &[PathRule] {
        &self.rules
    }

    /// The rule for column `index`.
    #[must_use]
    pub fn rule(&self, index: usize) -> Option<&PathRule> {
        self.rules.get(index)
    }

    /// The built extractor.
    #[must_use]
    pub fn extractor(&self) -> &X {
        &self.extractor
    }
}
