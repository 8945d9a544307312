//! Consumer-side storage.
//!
//! [`StorageCore`] is the handoff point for published snapshots. [`ChunkStore`]
//! is the stock implementation: it keeps the latest snapshot and records which
//! chunks changed between successive snapshots, so a consumer that renders or
//! plans incrementally only has to look at those chunks.

use std::collections::HashSet;
use std::sync::Arc;

use log::debug;

use super::history::{HistoryLookup, TransactionHistory};
use crate::config::StorageSection;
use crate::core::ChunkKey;
use crate::grid::VoxelSnapshot;

/// Receiver of published snapshots.
pub trait StorageCore {
    /// Take a reference to a newly published snapshot.
    fn accept(&mut self, snapshot: Arc<VoxelSnapshot>);
}

/// Latest snapshot plus a history of changed chunks.
pub struct ChunkStore {
    snapshot: Option<Arc<VoxelSnapshot>>,
    history: TransactionHistory<ChunkKey>,
}

impl ChunkStore {
    /// Create a store retaining `history_len` change sets.
    pub fn new(history_len: usize) -> Self {
        Self {
            snapshot: None,
            history: TransactionHistory::new(history_len),
        }
    }

    /// Create a store sized by the `[storage]` config section.
    pub fn from_config(config: &StorageSection) -> Self {
        Self::new(config.history_len)
    }

    /// Latest accepted snapshot.
    pub fn snapshot(&self) -> Option<&Arc<VoxelSnapshot>> {
        self.snapshot.as_ref()
    }

    /// Keys of every chunk with observed voxels in the latest snapshot.
    pub fn chunk_keys(&self) -> HashSet<ChunkKey> {
        self.snapshot
            .as_ref()
            .map(|s| s.chunk_keys().into_iter().collect())
            .unwrap_or_default()
    }

    /// Query number a fully caught-up consumer holds.
    pub fn query(&self) -> u64 {
        self.history.next_query()
    }

    /// Chunks changed since `query`, advancing it when the answer is known.
    ///
    /// - within history: union of recorded changes
    /// - older than history: every chunk key of the latest snapshot
    /// - ahead of history: empty, `query` unchanged
    pub fn updated_chunks_since(&self, query: &mut u64) -> HashSet<ChunkKey> {
        match self.history.since(query) {
            HistoryLookup::Changes(changes) => changes,
            HistoryLookup::TooOld => self.chunk_keys(),
            HistoryLookup::Future => HashSet::new(),
        }
    }

    /// Forget the snapshot and history. Query numbering continues.
    pub fn clear(&mut self) {
        self.snapshot = None;
        self.history.clear();
    }
}

impl Default for ChunkStore {
    fn default() -> Self {
        Self::from_config(&StorageSection::default())
    }
}

impl StorageCore for ChunkStore {
    fn accept(&mut self, snapshot: Arc<VoxelSnapshot>) {
        let changed: HashSet<ChunkKey> = match &self.snapshot {
            Some(previous) if Arc::ptr_eq(previous, &snapshot) => return,
            Some(previous) => snapshot.changed_chunks_since(previous).into_iter().collect(),
            None => snapshot.chunk_keys().into_iter().collect(),
        };

        debug!(
            "[ChunkStore] accepted v{} ({} chunks changed)",
            snapshot.version(),
            changed.len()
        );
        self.history.push(changed);
        self.snapshot = Some(snapshot);
    }
}
