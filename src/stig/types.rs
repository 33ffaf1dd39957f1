//! Core mapping types for the VID/CCI/evidence join

use std::collections::HashMap;

/// An insertion-ordered map from an identifier to a list of identifiers
///
/// Keys keep the position of their first insertion. Re-inserting an existing
/// key replaces its list in place, the way a checklist that repeats an `id`
/// redefines the earlier entry instead of adding a second one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentifierMap {
    entries: Vec<(String, Vec<String>)>,
    index: HashMap<String, usize>,
}

/// VID → CCI identifiers, in document order
pub type FindingCciMap = IdentifierMap;

/// CCI identifier → evidence control indices for one revision
pub type CciEvidenceMap = IdentifierMap;

/// VID → evidence control indices, concatenated across the VID's CCIs
pub type FindingEvidenceMap = IdentifierMap;

impl IdentifierMap {
    /// Create an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `values` to `key`, returning the list it replaced
    pub fn insert(&mut self, key: impl Into<String>, values: Vec<String>) -> Option<Vec<String>> {
        let key = key.into();
        match self.index.get(&key) {
            Some(&pos) => Some(std::mem::replace(&mut self.entries[pos].1, values)),
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, values));
                None
            }
        }
    }

    /// Append `values` to the list for `key`, creating the entry if needed
    pub fn extend<'a>(&mut self, key: &str, values: impl IntoIterator<Item = &'a String>) {
        let pos = match self.index.get(key) {
            Some(&pos) => pos,
            None => {
                self.index.insert(key.to_string(), self.entries.len());
                self.entries.push((key.to_string(), Vec::new()));
                self.entries.len() - 1
            }
        };
        self.entries[pos].1.extend(values.into_iter().cloned());
    }

    /// Get the list bound to `key`
    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.index
            .get(key)
            .map(|&pos| self.entries[pos].1.as_slice())
    }

    /// Check whether `key` is present
    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Iterate entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Keys in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Number of keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map has no keys
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of values across all keys
    pub fn value_count(&self) -> usize {
        self.entries.iter().map(|(_, v)| v.len()).sum()
    }
}

impl<K: Into<String>> FromIterator<(K, Vec<String>)> for IdentifierMap {
    fn from_iter<I: IntoIterator<Item = (K, Vec<String>)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (key, values) in iter {
            map.insert(key, values);
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_insert_overwrites_in_place() {
        let mut map = IdentifierMap::new();
        assert!(map.insert("V-1", ids(&["CCI-A"])).is_none());
        assert!(map.insert("V-2", ids(&["CCI-B"])).is_none());

        let replaced = map.insert("V-1", ids(&["CCI-C"]));
        assert_eq!(replaced, Some(ids(&["CCI-A"])));

        assert_eq!(map.len(), 2);
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["V-1", "V-2"]);
        assert_eq!(map.get("V-1"), Some(ids(&["CCI-C"]).as_slice()));
    }

    #[test]
    fn test_extend_appends_and_keeps_duplicates() {
        let mut map = IdentifierMap::new();
        let first = ids(&["AC-2", "AC-3"]);
        let second = ids(&["AC-2"]);
        map.extend("V-1", &first);
        map.extend("V-1", &second);

        assert_eq!(map.get("V-1"), Some(ids(&["AC-2", "AC-3", "AC-2"]).as_slice()));
        assert_eq!(map.value_count(), 3);
    }

    #[test]
    fn test_empty_list_is_still_a_key() {
        let mut map = IdentifierMap::new();
        map.insert("V-2", Vec::new());
        assert!(map.contains_key("V-2"));
        assert_eq!(map.get("V-2"), Some(&[][..]));
        assert!(map.get("V-3").is_none());
    }

    #[test]
    fn test_from_iterator_applies_overwrite() {
        let map: IdentifierMap = vec![
            ("CCI-1", ids(&["AC-1"])),
            ("CCI-2", ids(&["AC-2"])),
            ("CCI-1", ids(&["AU-1"])),
        ]
        .into_iter()
        .collect();

        assert_eq!(map.len(), 2);
        assert_eq!(map.get("CCI-1"), Some(ids(&["AU-1"]).as_slice()));
    }
}
