//! Ordered table schema: column names paired with declared types.

use std::collections::HashSet;
use std::sync::Arc;

use arrow_schema::{Field, Schema, SchemaRef};

use crate::base::BaseProperties;
use crate::error::{ConfigError, ConfigResult};
use crate::types::ColumnType;

/// Table property listing the column names.
pub const COLUMNS_KEY: &str = "columns";

/// Table property listing the column types.
pub const COLUMN_TYPES_KEY: &str = "columns.types";

/// Ordered column names and types. A column's index is its positional
/// identity; its name is what column-scoped keys refer to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    names: Vec<String>,
    types: Vec<ColumnType>,
}

impl TableSchema {
    /// Pairs `names` with `types`.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::ColumnCountMismatch`] if the lists differ in length
    /// - [`ConfigError::DuplicateColumn`] if a name repeats
    pub fn try_new(names: Vec<String>, types: Vec<ColumnType>) -> ConfigResult<Self> {
        if names.len() != types.len() {
            return Err(ConfigError::ColumnCountMismatch {
                names: names.len(),
                types: types.len(),
            });
        }
        let mut seen = HashSet::with_capacity(names.len());
        for name in &names {
            if !seen.insert(name.as_str()) {
                return Err(ConfigError::DuplicateColumn {
                    column: name.clone(),
                });
            }
        }
        Ok(Self { names, types })
    }

    /// Reads the schema from the `columns` and `columns.types` properties.
    ///
    /// # Errors
    ///
    /// [`ConfigError::MissingConfig`] if either key is absent,
    /// [`ConfigError::InvalidValue`] if the type list does not parse, plus
    /// anything [`try_new`](Self::try_new) rejects.
    pub fn from_properties(base: &BaseProperties<'_>) -> ConfigResult<Self> {
        let names = base.get_required(COLUMNS_KEY)?;
        let names = crate::base::parse_string_list(&names);
        let raw_types = base.get_required(COLUMN_TYPES_KEY)?;
        let types = ColumnType::parse_list(&raw_types)
            .map_err(|message| ConfigError::invalid_value(COLUMN_TYPES_KEY, &raw_types, message))?;
        Self::try_new(names, types)
    }

    /// Column names in declaration order.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Column types in declaration order.
    #[must_use]
    pub fn types(&self) -> &[ColumnType] {
        &self.types
    }

    /// Column names as borrowed slices.
    #[must_use]
    pub fn name_refs(&self) -> Vec<&str> {
        self.names.iter().map(String::as_str).collect()
    }

    /// Number of columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns `true` for a schema without columns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Index of the column named exactly `name`.
    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// Declared type of column `index`.
    #[must_use]
    pub fn column_type(&self, index: usize) -> Option<&ColumnType> {
        self.types.get(index)
    }

    /// Iterates `(name, type)` pairs in order.
    pub fn columns(&self) -> impl Iterator<Item = (&str, &ColumnType)> {
        self.names.iter().map(String::as_str).zip(self.types.iter())
    }

    /// Arrow schema with one nullable field per column.
    #[must_use]
    pub fn to_arrow_schema(&self) -> SchemaRef {
        let fields: Vec<Field> = self
            .columns()
            .map(|(name, ty)| Field::new(name, ty.to_arrow(), true))
            .collect();
        Arc::new(Schema::new(fields))
    }
}
