//! Snapshot publication and consumer storage.
//!
//! - [`SnapshotBuffer`]: the single slot the coordinator publishes into
//! - [`StorageCore`]: what `update_storage` hands snapshots to
//! - [`ChunkStore`]: a `StorageCore` tracking changed chunks per update

pub mod buffer;
pub mod core;
pub mod history;

pub use buffer::SnapshotBuffer;
pub use self::core::{ChunkStore, StorageCore};
pub use history::{HistoryLookup, TransactionHistory};
