//! Identifier-keyed record collection.

use super::record::Record;
use std::collections::HashMap;
use std::fmt;

/// Records of one type, keyed by identifier.
///
/// Iteration follows the row where each identifier first appeared. Replacing a
/// record keeps its position.
#[derive(Clone, PartialEq)]
pub struct RecordTable<R> {
    records: Vec<R>,
    index: HashMap<String, usize>,
}

// Only `records`: the index mirrors it and has no stable order.
impl<R: fmt::Debug> fmt::Debug for RecordTable<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordTable").field("records", &self.records).finish()
    }
}

impl<R> Default for RecordTable<R> {
    fn default() -> Self {
        RecordTable {
            records: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<R: Record> RecordTable<R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        RecordTable {
            records: Vec::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
        }
    }

    /// Inserts `record` under its identifier, returning the record it replaced.
    pub fn insert(&mut self, record: R) -> Option<R> {
        let existing = self.index.get(record.id()).copied();
        match existing {
            Some(slot) => Some(std::mem::replace(&mut self.records[slot], record)),
            None => {
                self.index.insert(record.id().to_owned(), self.records.len());
                self.records.push(record);
                None
            },
        }
    }

    /// Looks up a record by identifier.
    #[inline]
    pub fn get(&self, id: &str) -> Option<&R> {
        self.index.get(id).map(|&slot| &self.records[slot])
    }

    #[inline]
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// All records, in first-appearance order.
    #[inline]
    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, R> {
        self.records.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|record| record.id())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn into_records(self) -> Vec<R> {
        self.records
    }
}

impl<'a, R: Record> IntoIterator for &'a RecordTable<R> {
    type Item = &'a R;
    type IntoIter = std::slice::Iter<'a, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
