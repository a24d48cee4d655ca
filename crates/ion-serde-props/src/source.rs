//! Raw configuration sources.
//!
//! The resolver only needs two things from wherever properties come from:
//! a lookup by key and the list of keys present (so that misspelled
//! column-scoped keys can be flagged).

use std::collections::{BTreeMap, HashMap};

/// An untyped key/value property bag.
pub trait RawConfiguration {
    /// Returns the raw value for `key`, if set.
    fn get(&self, key: &str) -> Option<String>;

    /// Returns every key present in the source.
    fn keys(&self) -> Vec<String>;
}

impl<T: RawConfiguration + ?Sized> RawConfiguration for &T {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn keys(&self) -> Vec<String> {
        (**self).keys()
    }
}

impl RawConfiguration for HashMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).cloned()
    }

    fn keys(&self) -> Vec<String> {
        HashMap::keys(self).cloned().collect()
    }
}

impl RawConfiguration for BTreeMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        BTreeMap::get(self, key).cloned()
    }

    fn keys(&self) -> Vec<String> {
        BTreeMap::keys(self).cloned().collect()
    }
}

/// Ordered in-memory property map, typically the table's SerDe properties.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyMap {
    properties: BTreeMap<String, String>,
}

impl PropertyMap {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a map from existing properties.
    #[must_use]
    pub fn with_properties(properties: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            properties: properties.into_iter().collect(),
        }
    }

    /// Sets a property, replacing any previous value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.properties.insert(key.into(), value.into());
    }

    /// Borrowing lookup.
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    /// Number of properties.
    #[must_use]
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Returns `true` if no property is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

impl RawConfiguration for PropertyMap {
    fn get(&self, key: &str) -> Option<String> {
        self.properties.get(key).cloned()
    }

    fn keys(&self) -> Vec<String> {
        self.properties.keys().cloned().collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for PropertyMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            properties: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl From<HashMap<String, String>> for PropertyMap {
    fn from(map: HashMap<String, String>) -> Self {
        Self::with_properties(map)
    }
}

/// Two sources stacked: `primary` values win, `fallback` fills the gaps.
///
/// Used to overlay job-level configuration on table properties.
#[derive(Debug, Clone)]
pub struct Layered<A, B> {
    primary: A,
    fallback: B,
}

impl<A: RawConfiguration, B: RawConfiguration> Layered<A, B> {
    /// Stacks `primary` over `fallback`.
    pub fn new(primary: A, fallback: B) -> Self {
        Self { primary, fallback }
    }
}

impl<A: RawConfiguration, B: RawConfiguration> RawConfiguration for Layered<A, B> {
    fn get(&self, key: &str) -> Option<String> {
        self.primary.get(key).or_else(|| self.fallback.get(key))
    }

    fn keys(&self) -> Vec<String> {
        let mut keys = self.primary.keys();
        keys.extend(self.fallback.keys());
        keys.sort();
        keys.dedup();
        keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_map_basics() {
        let mut props = PropertyMap::new();
        assert!(props.is_empty());
        props.set("ion.encoding", "text");
        props.set("ion.encoding", "binary");
        assert_eq!(props.len(), 1);
        assert_eq!(props.get_str("ion.encoding"), Some("binary"));
        assert_eq!(RawConfiguration::get(&props, "missing"), None);
    }

    #[test]
    fn test_keys_are_sorted() {
        let props: PropertyMap = [("b", "1"), ("a", "2")].into_iter().collect();
        assert_eq!(props.keys(), vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_layered_primary_wins() {
        let job: PropertyMap = [("ion.encoding", "text")].into_iter().collect();
        let table: PropertyMap = [("ion.encoding", "binary"), ("ion.fail_on_overflow", "false")]
            .into_iter()
            .collect();
        let layered = Layered::new(&job, &table);
        assert_eq!(layered.get("ion.encoding").as_deref(), Some("text"));
        assert_eq!(layered.get("ion.fail_on_overflow").as_deref(), Some("false"));
        assert_eq!(
            layered.keys(),
            vec!["ion.encoding".to_string(), "ion.fail_on_overflow".to_string()]
        );
    }

    #[test]
    fn test_hash_map_source() {
        let mut map = HashMap::new();
        map.insert("k".to_string(), "v".to_string());
        assert_eq!(RawConfiguration::get(&map, "k").as_deref(), Some("v"));
        assert_eq!(RawConfiguration::keys(&map), vec!["k".to_string()]);
        let props = PropertyMap::from(map);
        assert_eq!(props.get_str("k"), Some("v"));
    }
}
