use crate::domain::{reservation::Reservation, user::User, zone::Zone};
use std::collections::HashMap;

pub trait Keyed {
    fn key(&self) -> &str;
}

impl Keyed for User {
    fn key(&self) -> &str {
        self.id()
    }
}

impl Keyed for Zone {
    fn key(&self) -> &str {
        self.id()
    }
}

impl Keyed for Reservation {
    fn key(&self) -> &str {
        self.id()
    }
}

/// Insertion-ordered records with an index from id to the position of the
/// first record carrying that id. Duplicate ids are kept; lookups resolve to
/// the earliest one.
#[derive(Debug, Clone)]
pub struct Registry<T> {
    entries: Vec<T>,
    index: HashMap<String, usize>,
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<T: Keyed> Registry<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: Vec<T>) -> Self {
        let mut registry = Self {
            entries,
            index: HashMap::new(),
        };
        registry.reindex();
        registry
    }

    pub fn insert(&mut self, record: T) {
        let position = self.entries.len();
        self.index
            .entry(record.key().to_string())
            .or_insert(position);
        self.entries.push(record);
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.index.get(id).map(|&pos| &self.entries[pos])
    }

    /// Runs `change` on the first record with `id`. The index is rebuilt if
    /// the record comes back under a different key.
    pub fn modify<R>(&mut self, id: &str, change: impl FnOnce(&mut T) -> R) -> Option<R> {
        let pos = *self.index.get(id)?;
        let result = change(&mut self.entries[pos]);
        if self.entries[pos].key() != id {
            self.reindex();
        }
        Some(result)
    }

    /// Swaps the first record with `id` for `record`, returning the old one.
    pub fn replace(&mut self, id: &str, record: T) -> Option<T> {
        let pos = *self.index.get(id)?;
        let rekeyed = record.key() != id;
        let previous = std::mem::replace(&mut self.entries[pos], record);
        if rekeyed {
            self.reindex();
        }
        Some(previous)
    }

    pub fn remove(&mut self, id: &str) -> Option<T> {
        let pos = *self.index.get(id)?;
        let removed = self.entries.remove(pos);
        self.reindex();
        Some(removed)
    }

    pub fn entries(&self) -> &[T] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_entries(self) -> Vec<T> {
        self.entries
    }

    fn reindex(&mut self) {
        self.index.clear();
        for (pos, record) in self.entries.iter().enumerate() {
            self.index.entry(record.key().to_string()).or_insert(pos);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        id: String,
        label: &'static str,
    }

    impl Keyed for Item {
        fn key(&self) -> &str {
            &self.id
        }
    }

    fn item(id: &str, label: &'static str) -> Item {
        Item {
            id: id.to_string(),
            label,
        }
    }

    #[test]
    fn test_duplicates_resolve_to_first() {
        let mut registry = Registry::new();
        registry.insert(item("a", "first"));
        registry.insert(item("b", "other"));
        registry.insert(item("a", "second"));
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.get("a").unwrap().label, "first");

        assert_eq!(registry.remove("a").unwrap().label, "first");
        assert_eq!(registry.get("a").unwrap().label, "second");
        assert_eq!(registry.entries()[0].id, "b");
    }

    #[test]
    fn test_replace_with_new_key_reindexes() {
        let mut registry = Registry::from_entries(vec![item("a", "one"), item("b", "two")]);
        let old = registry.replace("a", item("c", "three")).unwrap();
        assert_eq!(old.label, "one");
        assert!(registry.get("a").is_none());
        assert_eq!(registry.get("c").unwrap().label, "three");
        assert_eq!(registry.entries()[0].id, "c");
        assert!(registry.replace("missing", item("x", "x")).is_none());
    }

    #[test]
    fn test_modify_that_changes_key_reindexes() {
        let mut registry = Registry::from_entries(vec![item("a", "one"), item("a", "two")]);
        assert_eq!(registry.modify("a", |record| record.label), Some("one"));

        registry.modify("a", |record| *record = item("z", "moved"));
        assert_eq!(registry.get("z").unwrap().label, "moved");
        assert_eq!(registry.get("a").unwrap().label, "two");
        assert!(registry.modify("missing", |_| ()).is_none());
    }

    #[test]
    fn test_remove_missing_is_none() {
        let mut registry: Registry<Item> = Registry::new();
        assert!(registry.remove("nope").is_none());
        assert!(registry.is_empty());
    }
}
