//! Ordered tag map.

use serde::{Deserialize, Serialize};

/// Global metadata tags in insertion order.
///
/// Keys are unique; inserting an existing key replaces its value in place.
/// Iteration order is the order keys were first inserted, which keeps the
/// serialized metadata file reproducible.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tags {
    entries: Vec<(String, String)>,
}

impl Tags {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a tag. Returns the previous value, if any.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => Some(std::mem::replace(existing, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(key, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Tags {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut tags = Tags::new();
        for (key, value) in iter {
            tags.insert(key, value);
        }
        tags
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_insertion_order() {
        let tags: Tags = [("title", "x"), ("artist", "y"), ("album", "z")]
            .into_iter()
            .collect();
        let keys: Vec<&str> = tags.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["title", "artist", "album"]);
    }

    #[test]
    fn replace_keeps_position() {
        let mut tags = Tags::new();
        tags.insert("title", "old");
        tags.insert("artist", "someone");
        assert_eq!(tags.insert("title", "new"), Some("old".to_string()));
        assert_eq!(tags.len(), 2);
        assert_eq!(tags.iter().next(), Some(("title", "new")));
        assert_eq!(tags.get("artist"), Some("someone"));
        assert_eq!(tags.get("genre"), None);
    }
}
