//! Path extractor: a frozen set of labelled search paths.
//!
//! The extractor is built once and then shared read-only by every reader
//! walking documents. Readers report their current [`Location`] and get back
//! the labels (typically output column names) whose search path matches it.

use tracing::debug;

use crate::error::PathResult;
use crate::path::{Location, SearchPath};

/// One labelled search path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPathEntry {
    label: String,
    path: SearchPath,
    case_sensitive: bool,
}

impl SearchPathEntry {
    /// The label the path was registered under.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The compiled path.
    #[must_use]
    pub fn path(&self) -> &SearchPath {
        &self.path
    }

    /// Whether field names are compared case-sensitively.
    #[must_use]
    pub fn is_case_sensitive(&self) -> bool {
        self.case_sensitive
    }
}

/// Builder for [`PathExtractor`].
///
/// Paths are matched case-sensitively unless
/// [`match_case_insensitive`](Self::match_case_insensitive) is set before
/// they are added.
#[derive(Debug, Clone, Default)]
pub struct PathExtractorBuilder {
    case_insensitive: bool,
    entries: Vec<SearchPathEntry>,
}

impl PathExtractorBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets case-insensitive field matching for paths added afterwards.
    #[must_use]
    pub fn match_case_insensitive(mut self, case_insensitive: bool) -> Self {
        self.case_insensitive = case_insensitive;
        self
    }

    /// Compiles and registers a search path under `label`.
    ///
    /// # Errors
    ///
    /// Returns the compilation error if `expression` is malformed.
    pub fn with_search_path(self, label: impl Into<String>, expression: &str) -> PathResult<Self> {
        let case_sensitive = !self.case_insensitive;
        self.with_search_path_case(label, expression, case_sensitive)
    }

    /// Compiles and registers a search path with an explicit case mode.
    ///
    /// # Errors
    ///
    /// Returns the compilation error if `expression` is malformed.
    pub fn with_search_path_case(
        self,
        label: impl Into<String>,
        expression: &str,
        case_sensitive: bool,
    ) -> PathResult<Self> {
        let path = SearchPath::compile(expression)?;
        Ok(self.with_compiled_path(label, path, case_sensitive))
    }

    /// Registers an already compiled path.
    #[must_use]
    pub fn with_compiled_path(
        mut self,
        label: impl Into<String>,
        path: SearchPath,
        case_sensitive: bool,
    ) -> Self {
        self.entries.push(SearchPathEntry {
            label: label.into(),
            path,
            case_sensitive,
        });
        self
    }

    /// Freezes the registered paths.
    #[must_use]
    pub fn build(self) -> PathExtractor {
        let max_depth = self
            .entries
            .iter()
            .map(|e| e.path.depth())
            .max()
            .unwrap_or(0);
        debug!(paths = self.entries.len(), max_depth, "built path extractor");
        PathExtractor {
            entries: self.entries,
            max_depth,
        }
    }
}

/// Immutable set of labelled search paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathExtractor {
    entries: Vec<SearchPathEntry>,
    max_depth: usize,
}

impl PathExtractor {
    /// Number of registered paths.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no path is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Deepest registered path; readers never need to descend further.
    #[must_use]
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// All entries in registration order.
    #[must_use]
    pub fn entries(&self) -> &[SearchPathEntry] {
        &self.entries
    }

    /// Looks up the entry registered under `label`.
    #[must_use]
    pub fn entry(&self, label: &str) -> Option<&SearchPathEntry> {
        self.entries.iter().find(|e| e.label == label)
    }

    /// Yields `(registration index, label)` for every path matching the
    /// document position.
    pub fn matching<'s, 'q>(
        &'s self,
        location: &'q [Location<'q>],
        annotations: &'q [&'q str],
    ) -> impl Iterator<Item = (usize, &'s str)> + 'q
    where
        's: 'q,
    {
        self.entries.iter().enumerate().filter_map(move |(i, e)| {
            e.path
                .matches(location, annotations, e.case_sensitive)
                .then_some((i, e.label.as_str()))
        })
    }

    /// Returns `true` if any path continues below `location`.
    #[must_use]
    pub fn should_descend(&self, location: &[Location<'_>], annotations: &[&str]) -> bool {
        location.len() < self.max_depth
            && self
                .entries
                .iter()
                .any(|e| e.path.leads_to(location, annotations, e.case_sensitive))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PathError;

    fn extractor() -> PathExtractor {
        PathExtractorBuilder::new()
            .with_search_path("id", "(id)")
            .unwrap()
            .with_search_path("city", "(address city)")
            .unwrap()
            .with_search_path("tags", "(tags *)")
            .unwrap()
            .build()
    }

    #[test]
    fn test_build_tracks_depth_and_order() {
        let ex = extractor();
        assert_eq!(ex.len(), 3);
        assert_eq!(ex.max_depth(), 2);
        let labels: Vec<&str> = ex.entries().iter().map(SearchPathEntry::label).collect();
        assert_eq!(labels, vec!["id", "city", "tags"]);
    }

    #[test]
    fn test_matching_returns_index_and_label() {
        let ex = extractor();
        let loc = [Location::Field("address"), Location::Field("city")];
        let hits: Vec<_> = ex.matching(&loc, &[]).collect();
        assert_eq!(hits, vec![(1, "city")]);

        let loc = [Location::Field("tags"), Location::Index(7)];
        let hits: Vec<_> = ex.matching(&loc, &[]).collect();
        assert_eq!(hits, vec![(2, "tags")]);
    }

    #[test]
    fn test_should_descend() {
        let ex = extractor();
        assert!(ex.should_descend(&[], &[]));
        assert!(ex.should_descend(&[Location::Field("address")], &[]));
        assert!(!ex.should_descend(&[Location::Field("id")], &[]));
        assert!(!ex.should_descend(
            &[Location::Field("address"), Location::Field("city")],
            &[]
        ));
    }

    #[test]
    fn test_case_insensitive_builder() {
        let ex = PathExtractorBuilder::new()
            .match_case_insensitive(true)
            .with_search_path("name", "(NAME)")
            .unwrap()
            .build();
        assert!(!ex.entry("name").unwrap().is_case_sensitive());
        let loc = [Location::Field("name")];
        assert_eq!(ex.matching(&loc, &[]).count(), 1);
    }

    #[test]
    fn test_malformed_path_rejected() {
        let err = PathExtractorBuilder::new()
            .with_search_path("bad", "(unclosed")
            .unwrap_err();
        assert!(matches!(err, PathError::Syntax { .. }));
    }

    #[test]
    fn test_empty_extractor() {
        let ex = PathExtractorBuilder::new().build();
        assert!(ex.is_empty());
        assert_eq!(ex.max_depth(), 0);
        assert!(!ex.should_descend(&[], &[]));
    }
}
