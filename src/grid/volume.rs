//! Working voxel volume with copy-on-write chunks.
//!
//! Only the fusion engine writes here. Publishing a snapshot clones the chunk
//! `Arc`s, so the next write to a chunk still held by a snapshot copies it
//! first and the snapshot never observes the change.

use std::sync::Arc;

use super::chunk::{Chunk, Voxel};
use super::config::{GridConfig, LogOddsConfig};
use super::layout::GridLayout;
use super::snapshot::VoxelSnapshot;
use crate::core::VoxelCoord;

/// Mutable, chunked occupancy volume.
#[derive(Clone, Debug)]
pub struct VoxelVolume {
    layout: GridLayout,
    config: LogOddsConfig,
    chunks: Vec<Arc<Chunk>>,
}

impl VoxelVolume {
    /// Create an all-unknown volume.
    pub fn new(grid: &GridConfig, config: LogOddsConfig) -> Self {
        let layout = GridLayout::new(grid);
        let chunks = Self::pristine_chunks(&layout);
        Self {
            layout,
            config,
            chunks,
        }
    }

    // Every untouched chunk shares one allocation until first written.
    fn pristine_chunks(layout: &GridLayout) -> Vec<Arc<Chunk>> {
        let empty = Arc::new(Chunk::default());
        vec![empty; layout.chunk_count()]
    }

    /// Grid geometry.
    #[inline]
    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    /// Log-odds parameters.
    #[inline]
    pub fn config(&self) -> &LogOddsConfig {
        &self.config
    }

    /// Voxel at an index, `None` outside the grid.
    pub fn voxel(&self, coord: VoxelCoord) -> Option<Voxel> {
        let (chunk, offset) = self.layout.locate(coord)?;
        Some(self.chunks[chunk].get(offset))
    }

    /// Add a log-odds increment to one voxel.
    ///
    /// Returns the new value, or `None` if the voxel is outside the grid.
    pub fn apply(&mut self, coord: VoxelCoord, delta: i16) -> Option<i16> {
        let (chunk, offset) = self.layout.locate(coord)?;
        let chunk = Arc::make_mut(&mut self.chunks[chunk]);
        Some(chunk.update(offset, delta, &self.config))
    }

    /// Apply a hit observation.
    #[inline]
    pub fn apply_hit(&mut self, coord: VoxelCoord) -> Option<i16> {
        self.apply(coord, self.config.l_hit)
    }

    /// Apply a miss (free-space) observation.
    #[inline]
    pub fn apply_miss(&mut self, coord: VoxelCoord) -> Option<i16> {
        self.apply(coord, self.config.l_miss)
    }

    /// Number of chunks holding at least one observed voxel.
    pub fn touched_chunks(&self) -> usize {
        self.chunks.iter().filter(|c| !c.is_pristine()).count()
    }

    /// Freeze the current contents into an immutable snapshot.
    ///
    /// O(chunk count): only the chunk pointers are copied.
    pub fn freeze(&self, version: u64, timestamp_ns: u64) -> VoxelSnapshot {
        VoxelSnapshot::new(
            version,
            timestamp_ns,
            self.layout,
            self.config.clone(),
            self.chunks.clone(),
        )
    }

    /// Forget all observations.
    pub fn clear(&mut self) {
        self.chunks = Self::pristine_chunks(&self.layout);
    }
}
