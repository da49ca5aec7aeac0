//! Per-item outcome ledger.

use crate::Error;
use std::collections::BTreeMap;

/// Outcome of every item of a batch, keyed by the item's input position.
///
/// Failures are recorded, not raised: one bad item never aborts the rest of the batch.
#[derive(Debug)]
pub struct BatchLedger<R> {
    entries: BTreeMap<usize, Result<R, Error>>,
}

impl<R> BatchLedger<R> {
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
    pub(crate) fn record(&mut self, index: usize, outcome: Result<R, Error>) -> &Result<R, Error> {
        self.entries.entry(index).or_insert(outcome)
    }
    pub fn len(&self) -> usize {
        self.entries.len()
    }
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
    pub fn get(&self, index: usize) -> Option<&Result<R, Error>> {
        self.entries.get(&index)
    }
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Result<R, Error>)> {
        self.entries.iter().map(|(i, r)| (*i, r))
    }
    pub fn successes(&self) -> impl Iterator<Item = (usize, &R)> {
        self.iter().filter_map(|(i, r)| r.as_ref().ok().map(|v| (i, v)))
    }
    pub fn failures(&self) -> impl Iterator<Item = (usize, &Error)> {
        self.iter().filter_map(|(i, r)| r.as_ref().err().map(|e| (i, e)))
    }
    pub fn success_count(&self) -> usize {
        self.successes().count()
    }
    pub fn failure_count(&self) -> usize {
        self.failures().count()
    }
    pub fn all_succeeded(&self) -> bool {
        self.entries.values().all(Result::is_ok)
    }
    pub fn into_map(self) -> BTreeMap<usize, Result<R, Error>> {
        self.entries
    }
}

impl<R> Default for BatchLedger<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> IntoIterator for BatchLedger<R> {
    type Item = (usize, Result<R, Error>);
    type IntoIter = std::collections::btree_map::IntoIter<usize, Result<R, Error>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
