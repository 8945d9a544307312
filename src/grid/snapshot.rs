//! Immutable, versioned view of the occupancy volume.
//!
//! A [`VoxelSnapshot`] is what consumers read. It shares chunk storage with
//! the working volume through `Arc`, and none of its chunks is ever written
//! after the snapshot is created.
//!
//! ```text
//! working volume:  [A ][B'][C ][D ]      B' = copy made on write
//!                    │       │   │
//! snapshot v7:     [A ][B ][C ][D ]
//! ```

use std::sync::Arc;

use super::chunk::{Chunk, Voxel, VoxelCounts, VoxelState};
use super::config::{LogOddsConfig, log_odds_to_probability};
use super::layout::GridLayout;
use crate::core::{ChunkKey, Point3, VoxelCoord};

/// Read-only occupancy volume at one version.
#[derive(Clone, Debug)]
pub struct VoxelSnapshot {
    version: u64,
    timestamp_ns: u64,
    layout: GridLayout,
    config: LogOddsConfig,
    chunks: Vec<Arc<Chunk>>,
}

impl VoxelSnapshot {
    pub(crate) fn new(
        version: u64,
        timestamp_ns: u64,
        layout: GridLayout,
        config: LogOddsConfig,
        chunks: Vec<Arc<Chunk>>,
    ) -> Self {
        Self {
            version,
            timestamp_ns,
            layout,
            config,
            chunks,
        }
    }

    /// Monotonically increasing publish counter (first snapshot is 1).
    #[inline]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Timestamp of the frame that produced this snapshot.
    #[inline]
    pub fn timestamp_ns(&self) -> u64 {
        self.timestamp_ns
    }

    /// Grid geometry.
    #[inline]
    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    /// Thresholds used for classification.
    #[inline]
    pub fn log_odds_config(&self) -> &LogOddsConfig {
        &self.config
    }

    // === Voxel Queries ===

    /// Voxel at an index, `None` outside the grid.
    pub fn voxel(&self, coord: VoxelCoord) -> Option<Voxel> {
        let (chunk, offset) = self.layout.locate(coord)?;
        Some(self.chunks[chunk].get(offset))
    }

    /// Voxel containing a world point.
    pub fn voxel_at(&self, point: Point3) -> Option<Voxel> {
        if !point.is_finite() {
            return None;
        }
        self.voxel(self.layout.world_to_voxel(point))
    }

    /// Fixed-point log-odds of a voxel.
    pub fn log_odds(&self, coord: VoxelCoord) -> Option<i16> {
        self.voxel(coord).map(|v| v.log_odds)
    }

    /// Occupancy probability of a voxel (0.5 when never observed).
    pub fn probability(&self, coord: VoxelCoord) -> Option<f32> {
        self.log_odds(coord).map(log_odds_to_probability)
    }

    /// Classify a voxel. Outside the grid is `Unknown`.
    pub fn state(&self, coord: VoxelCoord) -> VoxelState {
        self.voxel(coord)
            .map_or(VoxelState::Unknown, |v| v.state(&self.config))
    }

    /// Voxel is above the occupied threshold.
    #[inline]
    pub fn is_occupied(&self, coord: VoxelCoord) -> bool {
        self.state(coord) == VoxelState::Occupied
    }

    /// Voxel is below the free threshold.
    #[inline]
    pub fn is_free(&self, coord: VoxelCoord) -> bool {
        self.state(coord) == VoxelState::Free
    }

    /// Voxel has been observed at least once.
    #[inline]
    pub fn is_known(&self, coord: VoxelCoord) -> bool {
        self.voxel(coord).is_some_and(|v| v.observed)
    }

    /// Voxel counts by state.
    pub fn counts(&self) -> VoxelCounts {
        let mut counts = VoxelCounts::default();
        for chunk in self.chunks.iter().filter(|c| !c.is_pristine()) {
            for (_, voxel) in chunk.iter_observed() {
                match voxel.state(&self.config) {
                    VoxelState::Free => counts.free += 1,
                    VoxelState::Occupied => counts.occupied += 1,
                    VoxelState::Uncertain => counts.uncertain += 1,
                    VoxelState::Unknown => {}
                }
            }
        }
        counts.unknown = self.layout.voxel_count() - counts.known();
        counts
    }

    /// Iterate over occupied voxels.
    pub fn occupied_voxels(&self) -> impl Iterator<Item = (VoxelCoord, Voxel)> + '_ {
        self.chunks
            .iter()
            .enumerate()
            .filter(|(_, c)| !c.is_pristine())
            .flat_map(move |(index, chunk)| {
                let key = self.layout.chunk_key(index);
                chunk
                    .iter_observed()
                    .filter(move |(_, v)| v.state(&self.config) == VoxelState::Occupied)
                    .map(move |(offset, v)| (self.layout.voxel_of(key, offset), v))
            })
    }

    // === Chunk Queries ===

    /// Chunk by key.
    pub fn chunk(&self, key: ChunkKey) -> Option<&Chunk> {
        self.layout
            .chunk_index(key)
            .map(|index| self.chunks[index].as_ref())
    }

    /// Keys of chunks holding at least one observed voxel.
    pub fn chunk_keys(&self) -> Vec<ChunkKey> {
        self.chunks
            .iter()
            .enumerate()
            .filter(|(_, c)| !c.is_pristine())
            .map(|(index, _)| self.layout.chunk_key(index))
            .collect()
    }

    /// Chunks whose contents may differ from `older`.
    ///
    /// Compares chunk identity, so unchanged chunks cost one pointer compare.
    /// A snapshot with a different geometry yields every observed chunk.
    pub fn changed_chunks_since(&self, older: &VoxelSnapshot) -> Vec<ChunkKey> {
        if self.layout != older.layout {
            return self.chunk_keys();
        }
        self.chunks
            .iter()
            .zip(&older.chunks)
            .enumerate()
            .filter(|(_, (new, old))| !Arc::ptr_eq(new, old))
            .map(|(index, _)| self.layout.chunk_key(index))
            .collect()
    }
}
