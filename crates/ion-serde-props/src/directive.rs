//! Per-column override falling back to a global default.
//!
//! Several options follow the same shape: one value for every column unless
//! `ion.<column>.<option>` says otherwise. [`Directive::resolve`] implements
//! that once: it enumerates the column-scoped keys, resolves each column
//! name against the schema, parses the value and rejects keys that give the
//! same column two different values.

use std::collections::BTreeMap;

use crate::base::{resolve_key_column, BaseProperties};
use crate::error::{ConfigError, ConfigResult};
use crate::schema::TableSchema;

/// One column-scoped key, resolved against the schema and handed to the
/// value parser.
#[derive(Debug, Clone, Copy)]
pub struct ColumnOverride<'a> {
    /// The full key.
    pub key: &'a str,
    /// The raw value.
    pub value: &'a str,
    /// The declared column name the key resolved to.
    pub column: &'a str,
    /// The column's index in the schema.
    pub index: usize,
}

/// A default value plus per-column overrides keyed by column index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive<T> {
    default: T,
    overrides: BTreeMap<usize, T>,
}

impl<T> Directive<T> {
    /// A directive with no overrides.
    pub fn uniform(default: T) -> Self {
        Self {
            default,
            overrides: BTreeMap::new(),
        }
    }

    /// The value applied to columns without an override.
    pub fn default_value(&self) -> &T {
        &self.default
    }

    /// The override for column `index`, if one was configured.
    pub fn override_for(&self, index: usize) -> Option<&T> {
        self.overrides.get(&index)
    }

    /// The effective value for column `index`.
    pub fn value_for(&self, index: usize) -> &T {
        self.overrides.get(&index).unwrap_or(&self.default)
    }

    /// Number of configured overrides.
    pub fn override_count(&self) -> usize {
        self.overrides.len()
    }

    /// Iterates `(column index, override)` in column order.
    pub fn overrides(&self) -> impl Iterator<Item = (usize, &T)> {
        self.overrides.iter().map(|(i, v)| (*i, v))
    }
}

impl<T: Clone + PartialEq> Directive<T> {
    /// Resolves `ion.<column>.<option>` keys on top of `default`.
    ///
    /// `parse` turns each key into a value and may reject it (for example an
    /// override that does not suit the column's type).
    ///
    /// # Errors
    ///
    /// - [`ConfigError::UnknownColumn`] when a key does not name exactly one
    ///   declared column
    /// - [`ConfigError::ConflictingOverride`] when two keys give the same
    ///   column different values; it lists every key with its raw value
    /// - whatever `parse` returns
    pub fn resolve<F>(
        base: &BaseProperties<'_>,
        schema: &TableSchema,
        option: &str,
        default: T,
        mut parse: F,
    ) -> ConfigResult<Self>
    where
        F: FnMut(&ColumnOverride<'_>) -> ConfigResult<T>,
    {
        let columns = schema.name_refs();
        let mut overrides: BTreeMap<usize, (T, Vec<String>, Vec<String>)> = BTreeMap::new();

        for scoped in base.column_scoped(option) {
            let index = resolve_key_column(&scoped.key, &scoped.value, &scoped.column, &columns)?;
            let value = parse(&ColumnOverride {
                key: &scoped.key,
                value: &scoped.value,
                column: columns[index],
                index,
            })?;

            match overrides.get_mut(&index) {
                Some((existing, keys, raw)) => {
                    keys.push(scoped.key);
                    raw.push(scoped.value);
                    if *existing != value {
                        return Err(ConfigError::ConflictingOverride {
                            column: columns[index].to_string(),
                            option: option.to_string(),
                            keys: std::mem::take(keys),
                            values: std::mem::take(raw),
                        });
                    }
                }
                None => {
                    overrides.insert(index, (value, vec![scoped.key], vec![scoped.value]));
                }
            }
        }

        Ok(Self {
            default,
            overrides: overrides.into_iter().map(|(i, (v, ..))| (i, v)).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::parse_bool;
    use crate::source::PropertyMap;
    use crate::types::ColumnType;

    fn schema() -> TableSchema {
        TableSchema::try_new(
            vec!["id".into(), "payload".into(), "ts".into()],
            vec![
                ColumnType::Int,
                ColumnType::Struct(vec![]),
                ColumnType::Timestamp,
            ],
        )
        .unwrap()
    }

    fn resolve(pairs: &[(&str, &str)]) -> ConfigResult<Directive<bool>> {
        let config: PropertyMap = pairs.iter().copied().collect();
        let base = BaseProperties::new(&config);
        Directive::resolve(&base, &schema(), "flag", true, |o| parse_bool(o.key, o.value))
    }

    #[test]
    fn test_default_applies_without_overrides() {
        let d = resolve(&[]).unwrap();
        assert_eq!(d.override_count(), 0);
        for i in 0..3 {
            assert!(*d.value_for(i));
            assert_eq!(d.override_for(i), None);
        }
    }

    #[test]
    fn test_override_applies_to_one_column() {
        let d = resolve(&[("ion.payload.flag", "false")]).unwrap();
        assert!(*d.value_for(0));
        assert!(!*d.value_for(1));
        assert_eq!(d.override_for(1), Some(&false));
        assert_eq!(d.overrides().collect::<Vec<_>>(), vec![(1, &false)]);
    }

    #[test]
    fn test_case_insensitive_column_segment() {
        let d = resolve(&[("ion.PAYLOAD.flag", "false")]).unwrap();
        assert!(!*d.value_for(1));
    }

    #[test]
    fn test_unknown_column() {
        let err = resolve(&[("ion.missing.flag", "false")]).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownColumn { ref column, .. } if column == "missing"));
    }

    #[test]
    fn test_same_value_twice_is_fine() {
        let d = resolve(&[("ion.ID.flag", "false"), ("ion.id.flag", "false")]).unwrap();
        assert!(!*d.value_for(0));
    }

    #[test]
    fn test_conflicting_values() {
        let err = resolve(&[("ion.ID.flag", "false"), ("ion.id.flag", "true")]).unwrap_err();
        match err {
            ConfigError::ConflictingOverride {
                column,
                option,
                keys,
                values,
            } => {
                assert_eq!(column, "id");
                assert_eq!(option, "flag");
                assert_eq!(keys, vec!["ion.ID.flag".to_string(), "ion.id.flag".to_string()]);
                assert_eq!(values, vec!["false".to_string(), "true".to_string()]);
            }
            other => panic!("expected ConflictingOverride, got {other:?}"),
        }
    }

    #[test]
    fn test_conflict_message_shows_values() {
        let err = resolve(&[("ion.ID.flag", "false"), ("ion.id.flag", "true")]).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("ion.ID.flag = 'false'"), "{msg}");
        assert!(msg.contains("ion.id.flag = 'true'"), "{msg}");
    }

    #[test]
    fn test_unknown_column_keeps_value() {
        let err = resolve(&[("ion.missing.flag", "false")]).unwrap_err();
        match err {
            ConfigError::UnknownColumn { key, value, .. } => {
                assert_eq!(key, "ion.missing.flag");
                assert_eq!(value, "false");
            }
            other => panic!("expected UnknownColumn, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_error_propagates() {
        let err = resolve(&[("ion.id.flag", "maybe")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }
}
