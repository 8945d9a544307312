//! Default values for serde deserialization.

/// Change sets kept by a `ChunkStore`.
pub const HISTORY_LEN: usize = 32;

/// Upper bound on the adaptive storage-update interval.
pub const MAX_DROP_TRIGGER: u32 = 5;

/// Default configuration file, relative to the working directory.
pub const CONFIG_PATH: &str = "configs/vayu.toml";

pub fn voxel_size() -> f32 {
    0.1
}

pub fn dimensions() -> [u32; 3] {
    [100, 100, 100]
}

pub fn origin() -> [f32; 3] {
    [0.0, 0.0, 0.0]
}

pub fn range_min() -> f32 {
    0.0
}

pub fn range_max() -> f32 {
    20.0
}

pub fn mount_offset() -> [f32; 3] {
    [0.0, 0.0, 0.0]
}

pub fn history_len() -> usize {
    HISTORY_LEN
}

pub fn max_drop_trigger() -> u32 {
    MAX_DROP_TRIGGER
}

pub fn worker_name() -> String {
    "vayu-fusion".to_string()
}
