//! Single-slot snapshot buffer.
//!
//! ```text
//! writer:  freeze ──► publish(v8) ──► slot = v8      (atomic pointer swap)
//! reader:  load() ──► Arc<v7> ... still v7 until dropped
//! ```
//!
//! The writer never waits for readers, and a reader's `Arc` stays valid and
//! unchanged for as long as it is held.

use std::sync::Arc;

use arc_swap::ArcSwapOption;

use crate::grid::VoxelSnapshot;

/// Holds the latest published snapshot, if any.
pub struct SnapshotBuffer {
    current: ArcSwapOption<VoxelSnapshot>,
}

impl Default for SnapshotBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotBuffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self {
            current: ArcSwapOption::empty(),
        }
    }

    /// Replace the current snapshot; returns the shared handle.
    pub fn publish(&self, snapshot: VoxelSnapshot) -> Arc<VoxelSnapshot> {
        let snapshot = Arc::new(snapshot);
        self.current.store(Some(Arc::clone(&snapshot)));
        snapshot
    }

    /// Latest snapshot, or `None` before the first publish.
    pub fn load(&self) -> Option<Arc<VoxelSnapshot>> {
        self.current.load_full()
    }

    /// Version of the latest snapshot (0 when empty).
    pub fn version(&self) -> u64 {
        let guard = self.current.load();
        (*guard).as_ref().map_or(0, |s| s.version())
    }

    /// A snapshot has been published.
    pub fn is_published(&self) -> bool {
        self.current.load().is_some()
    }

    /// Drop the current snapshot. Readers holding it keep their copy.
    pub fn clear(&self) {
        self.current.store(None);
    }
}
