//! # Ion Path Extraction
//!
//! Compiles search-path expressions and freezes them into a
//! [`PathExtractor`] that maps positions in a nested document to the labels
//! (output columns) that want the value found there.
//!
//! ```
//! use ion_path_extract::{Location, PathExtractorBuilder};
//!
//! let extractor = PathExtractorBuilder::new()
//!     .with_search_path("city", "(address city)")
//!     .unwrap()
//!     .build();
//!
//! let here = [Location::Field("address"), Location::Field("city")];
//! let hits: Vec<_> = extractor.matching(&here, &[]).collect();
//! assert_eq!(hits, vec![(0, "city")]);
//! ```

#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod error;
pub mod extractor;
pub mod path;

pub use error::{PathError, PathResult};
pub use extractor::{PathExtractor, PathExtractorBuilder, SearchPathEntry};
pub use path::{Location, PathStep, SearchPath};
