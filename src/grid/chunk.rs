//! Chunk storage and per-voxel value types.
//!
//! Each chunk stores its voxel fields in separate arrays (SoA):
//!
//! ```text
//! log_odds: [L L L L L L L L L L L L L L L L|...]   4096 × i16
//! observed: [O O O O O O O O O O O O O O O O|...]   4096 × u8
//! ```
//!
//! Chunks are shared between the working volume and published snapshots
//! through `Arc`; the volume copies a chunk only when it writes to one that a
//! snapshot still holds.

use serde::{Deserialize, Serialize};

use super::config::LogOddsConfig;
use super::layout::CHUNK_VOLUME;

/// Occupancy state of one voxel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voxel {
    /// Fixed-point log-odds (value / 100), always within `[l_min, l_max]`.
    pub log_odds: i16,
    /// At least one hit or miss was applied to this voxel.
    pub observed: bool,
}

/// Classification of a voxel against the log-odds thresholds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum VoxelState {
    /// Never observed
    Unknown,
    /// Log-odds strictly below the free threshold
    Free,
    /// Log-odds strictly above the occupied threshold
    Occupied,
    /// Observed, but within `[free, occupied]` thresholds
    Uncertain,
}

impl Voxel {
    /// Classify against the given thresholds.
    #[inline]
    pub fn state(&self, config: &LogOddsConfig) -> VoxelState {
        if !self.observed {
            VoxelState::Unknown
        } else if self.log_odds > config.l_occupied_threshold {
            VoxelState::Occupied
        } else if self.log_odds < config.l_free_threshold {
            VoxelState::Free
        } else {
            VoxelState::Uncertain
        }
    }
}

/// Voxel counts by state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoxelCounts {
    /// Never observed
    pub unknown: usize,
    /// Free space
    pub free: usize,
    /// Occupied
    pub occupied: usize,
    /// Observed but undecided
    pub uncertain: usize,
}

impl VoxelCounts {
    /// Total observed voxels.
    pub fn known(&self) -> usize {
        self.free + self.occupied + self.uncertain
    }

    /// Total voxels.
    pub fn total(&self) -> usize {
        self.unknown + self.known()
    }
}

/// A cubic block of `CHUNK_SIZE³` voxels.
#[derive(Clone, Debug, PartialEq)]
pub struct Chunk {
    log_odds: Vec<i16>,
    observed: Vec<u8>,
    /// Number of voxels with `observed` set.
    observed_count: u32,
}

impl Default for Chunk {
    fn default() -> Self {
        Self {
            log_odds: vec![0; CHUNK_VOLUME],
            observed: vec![0; CHUNK_VOLUME],
            observed_count: 0,
        }
    }
}

impl Chunk {
    /// Voxel at an in-chunk offset.
    #[inline]
    pub fn get(&self, offset: usize) -> Voxel {
        Voxel {
            log_odds: self.log_odds[offset],
            observed: self.observed[offset] != 0,
        }
    }

    /// Add `delta` to the voxel's log-odds with clamping, marking it observed.
    ///
    /// Returns the new log-odds.
    #[inline]
    pub fn update(&mut self, offset: usize, delta: i16, config: &LogOddsConfig) -> i16 {
        let new = config.apply(self.log_odds[offset], delta);
        self.log_odds[offset] = new;
        if self.observed[offset] == 0 {
            self.observed[offset] = 1;
            self.observed_count += 1;
        }
        new
    }

    /// No voxel in this chunk has been observed.
    #[inline]
    pub fn is_pristine(&self) -> bool {
        self.observed_count == 0
    }

    /// Number of observed voxels.
    #[inline]
    pub fn observed_count(&self) -> u32 {
        self.observed_count
    }

    /// Raw log-odds slice.
    #[inline]
    pub fn log_odds(&self) -> &[i16] {
        &self.log_odds
    }

    /// Raw observed flags.
    #[inline]
    pub fn observed(&self) -> &[u8] {
        &self.observed
    }

    /// Iterate over (offset, voxel) pairs of observed voxels.
    pub fn iter_observed(&self) -> impl Iterator<Item = (usize, Voxel)> + '_ {
        self.observed
            .iter()
            .enumerate()
            .filter(|&(_, &o)| o != 0)
            .map(move |(i, _)| (i, self.get(i)))
    }
}
