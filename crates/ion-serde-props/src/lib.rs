//! # Ion SerDe Properties
//!
//! Resolves the flat, string-typed properties of an Ion-backed table into
//! validated per-column serialization directives.
//!
//! A table declares ordered columns (`columns`, `columns.types`) and may set
//! options under the `ion.` namespace, either globally (`ion.encoding`) or
//! for one column (`ion.<column>.serialize_as`). [`SerDeProperties`] reads
//! them all once, checks every column-scoped key against the schema and
//! every override against the column's declared type, and then answers the
//! serializer's questions without further failure.
//!
//! ## Module Overview
//!
//! - [`source`]: raw property sources ([`PropertyMap`], [`Layered`])
//! - [`base`]: lookups, typed coercion and key namespacing
//! - [`directive`]: global default plus per-column overrides
//! - [`config`]: one component per option family
//! - [`schema`] / [`types`]: the column schema and the Hive/Ion type model
//! - [`properties`]: the [`SerDeProperties`] façade
//! - [`error`]: [`ConfigError`]
//!
//! Path expressions are compiled by [`ion_path_extract`], reached through
//! the [`ExtractorBuilder`] trait so hosts can plug in their own engine.

#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

#[macro_use]
mod macros;

pub mod base;
pub mod config;
pub mod directive;
pub mod error;
pub mod properties;
pub mod schema;
pub mod source;
pub mod suggest;
pub mod types;

pub use base::BaseProperties;
pub use config::{
    ExtractorBuilder, IonEncoding, KeyStrictness, PathRule, RejectedRule, SerDeDefaults,
    SerializeNullStrategy,
};
pub use directive::Directive;
pub use error::{ConfigError, ConfigResult};
pub use properties::{SerDeProperties, SerDePropertiesBuilder};
pub use schema::TableSchema;
pub use source::{Layered, PropertyMap, RawConfiguration};
pub use types::{ColumnType, IonType};

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_properties_are_shareable() {
        assert_send_sync::<SerDeProperties>();
        assert_send_sync::<ConfigError>();
    }
}
