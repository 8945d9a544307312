//! Bounded history of changed chunk sets.
//!
//! Every accepted snapshot records one entry, numbered by a query counter.
//! Incremental consumers keep the number of the next entry they have not
//! seen and ask for everything from there on.
//!
//! ```text
//! entries:   [q=5 {A}] [q=6 {B,C}] [q=7 {A}]     next_query = 8
//!
//! since 6  → {A,B,C}, query := 8
//! since 2  → too old, caller sends everything, query := 8
//! since 9  → {} (future), query unchanged
//! ```

use std::collections::{HashSet, VecDeque};
use std::hash::Hash;

/// Outcome of a history lookup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HistoryLookup<K: Eq + Hash> {
    /// Union of every change recorded at or after the requested query
    Changes(HashSet<K>),
    /// The requested query was already evicted
    TooOld,
    /// The requested query has not been recorded yet
    Future,
}

/// Ring buffer of `(query, changed keys)` entries.
#[derive(Clone, Debug)]
pub struct TransactionHistory<K: Eq + Hash + Clone> {
    max: usize,
    entries: VecDeque<(u64, HashSet<K>)>,
    next_query: u64,
}

impl<K: Eq + Hash + Clone> TransactionHistory<K> {
    /// Create a history keeping at most `max` entries (at least one).
    pub fn new(max: usize) -> Self {
        let max = max.max(1);
        Self {
            max,
            entries: VecDeque::with_capacity(max),
            next_query: 0,
        }
    }

    /// Record one transaction; returns its query number.
    pub fn push(&mut self, changed: HashSet<K>) -> u64 {
        let query = self.next_query;
        self.entries.push_back((query, changed));
        self.next_query += 1;
        while self.entries.len() > self.max {
            self.entries.pop_front();
        }
        query
    }

    /// Query number the next transaction will get.
    #[inline]
    pub fn next_query(&self) -> u64 {
        self.next_query
    }

    /// Oldest query still retained.
    #[inline]
    pub fn oldest_query(&self) -> u64 {
        self.entries.front().map_or(self.next_query, |(q, _)| *q)
    }

    /// Number of retained entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// No transaction recorded (or all evicted).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Changes since `query`.
    ///
    /// On `Changes` and `TooOld` the query is advanced to [`next_query`];
    /// on `Future` it is left unchanged.
    ///
    /// [`next_query`]: Self::next_query
    pub fn since(&self, query: &mut u64) -> HistoryLookup<K> {
        if *query >= self.next_query {
            // Caught up is reported as an empty change set
            if *query == self.next_query {
                return HistoryLookup::Changes(HashSet::new());
            }
            return HistoryLookup::Future;
        }

        if *query < self.oldest_query() {
            *query = self.next_query;
            return HistoryLookup::TooOld;
        }

        let mut changes = HashSet::new();
        for (_, keys) in self.entries.iter().filter(|(q, _)| *q >= *query) {
            changes.extend(keys.iter().cloned());
        }
        *query = self.next_query;
        HistoryLookup::Changes(changes)
    }

    /// Drop every entry; query numbering continues.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(keys: &[u32]) -> HashSet<u32> {
        keys.iter().copied().collect()
    }

    #[test]
    fn test_changes_since() {
        let mut history = TransactionHistory::new(4);
        history.push(set(&[1]));
        history.push(set(&[2, 3]));
        history.push(set(&[1]));

        let mut query = 1;
        assert_eq!(history.since(&mut query), HistoryLookup::Changes(set(&[1, 2, 3])));
        assert_eq!(query, 3);

        // Caught up
        assert_eq!(history.since(&mut query), HistoryLookup::Changes(set(&[])));
        assert_eq!(query, 3);
    }

    #[test]
    fn test_too_old() {
        let mut history = TransactionHistory::new(2);
        for i in 0..5 {
            history.push(set(&[i]));
        }
        assert_eq!(history.len(), 2);
        assert_eq!(history.oldest_query(), 3);

        let mut query = 1;
        assert_eq!(history.since(&mut query), HistoryLookup::TooOld);
        assert_eq!(query, 5);
    }

    #[test]
    fn test_future() {
        let mut history = TransactionHistory::new(2);
        history.push(set(&[7]));

        let mut query = 10;
        assert_eq!(history.since(&mut query), HistoryLookup::Future);
        assert_eq!(query, 10);
    }
}
