//! Error types for VayuGrid

use thiserror::Error;

/// Result type alias for frame integration
pub type Result<T> = std::result::Result<T, FrameError>;

/// Failure of a single `process_frame` call.
///
/// Every variant leaves the working grid and all published snapshots untouched.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FrameError {
    /// Orientation or origin could not be turned into a valid pose
    #[error("Invalid pose: {0}")]
    InvalidPose(String),

    /// Another frame is still being integrated
    #[error("Coordinator busy: a frame is already being processed")]
    Busy,

    /// Timestamp went backwards relative to the last accepted frame
    #[error("Out-of-order frame: timestamp {timestamp_ns} ns is older than {last_ns} ns")]
    OutOfOrder {
        /// Timestamp of the rejected frame
        timestamp_ns: u64,
        /// Timestamp of the last accepted frame
        last_ns: u64,
    },
}

/// Configuration loading and validation errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid TOML for `VayuConfig`
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// Values parsed but cannot describe a usable grid
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
