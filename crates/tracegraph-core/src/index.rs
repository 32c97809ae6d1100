//! Id-keyed lookup over node and edge lists

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use crate::model::{EdgeId, GraphEdge, GraphNode, NodeId};

/// Anything stored in the graph under a unique identifier.
pub trait Record {
    type Key: Eq + Hash + Clone + Debug;

    fn key(&self) -> &Self::Key;
}

impl Record for GraphNode {
    type Key = NodeId;

    fn key(&self) -> &NodeId {
        &self.id
    }
}

impl Record for GraphEdge {
    type Key = EdgeId;

    fn key(&self) -> &EdgeId {
        &self.id
    }
}

/// Borrowing lookup map over a slice. Later duplicates shadow earlier ones.
pub fn to_index<T: Record>(items: &[T]) -> HashMap<&T::Key, &T> {
    items.iter().map(|item| (item.key(), item)).collect()
}

/// Outcome of [`RecordIndex::upsert_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    Inserted,
    Merged,
}

/// An owned list plus a key → position map, kept consistent with each other.
///
/// Insertion order of the backing list is preserved.
#[derive(Debug, Clone)]
pub struct RecordIndex<T: Record> {
    items: Vec<T>,
    positions: HashMap<T::Key, usize>,
}

impl<T: Record> RecordIndex<T> {
    pub fn new() -> Self {
        RecordIndex {
            items: Vec::new(),
            positions: HashMap::new(),
        }
    }

    /// Index a list, keeping the first item for any repeated key.
    pub fn from_items(items: Vec<T>) -> Self {
        let mut index = RecordIndex::new();
        for item in items {
            index.insert(item);
        }
        index
    }

    /// Index a list, reporting the first repeated key instead of dropping it.
    pub fn try_from_items(items: Vec<T>) -> Result<Self, T::Key> {
        let mut index = RecordIndex::new();
        for item in items {
            let key = item.key().clone();
            if !index.insert(item) {
                return Err(key);
            }
        }
        Ok(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, key: &T::Key) -> bool {
        self.positions.contains_key(key)
    }

    pub fn get(&self, key: &T::Key) -> Option<&T> {
        self.positions.get(key).map(|&pos| &self.items[pos])
    }

    pub fn get_mut(&mut self, key: &T::Key) -> Option<&mut T> {
        let pos = self.positions.get(key).copied()?;
        self.items.get_mut(pos)
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// Append an item unless its key is already present. Returns whether it was added.
    pub fn insert(&mut self, item: T) -> bool {
        if self.positions.contains_key(item.key()) {
            return false;
        }
        self.positions.insert(item.key().clone(), self.items.len());
        self.items.push(item);
        true
    }

    /// Insert, or fold into the existing item with `merge(existing, incoming)`.
    pub fn upsert_with(&mut self, item: T, merge: impl FnOnce(&mut T, T)) -> Upsert {
        match self.positions.get(item.key()).copied() {
            Some(pos) => {
                merge(&mut self.items[pos], item);
                Upsert::Merged
            }
            None => {
                self.insert(item);
                Upsert::Inserted
            }
        }
    }

    /// Drop items failing the predicate and re-derive positions.
    pub fn retain(&mut self, keep: impl FnMut(&T) -> bool) {
        self.items.retain(keep);
        self.rebuild();
    }

    /// Re-derive the key map from the backing list.
    pub fn rebuild(&mut self) {
        self.positions.clear();
        for (pos, item) in self.items.iter().enumerate() {
            self.positions.entry(item.key().clone()).or_insert(pos);
        }
    }
}

impl<T: Record> Default for RecordIndex<T> {
    fn default() -> Self {
        Self::new()
    }
}
