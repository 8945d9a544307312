//! Integration coordinator: the single entry point for frames.
//!
//! ```text
//! caller ──process_frame──► try_lock(engine) ──► Pose::new ──► transform
//!                               │ Busy                           │
//!                               ▼                                ▼
//!                            Err(Busy)           FusionEngine::integrate
//!                                                                │
//!                                              freeze ──► SnapshotBuffer::publish
//!
//! consumer ──update_storage──► SnapshotBuffer::load ──► StorageCore::accept
//! ```
//!
//! At most one frame is integrated at a time. A frame arriving while another
//! is in flight is rejected immediately with [`FrameError::Busy`] instead of
//! queueing, so a slow frame never delays the ones after it.

mod state;
mod throttle;
mod worker;

use std::sync::{Arc, OnceLock};

use log::{debug, info, warn};
use parking_lot::Mutex;

use crate::config::VayuConfig;
use crate::core::{Frame, Point3, Pose, Quaternion};
use crate::error::{ConfigError, FrameError, Result};
use crate::geometry::transform_frame;
use crate::grid::{FusionEngine, GridLayout, MapConfig, VoxelSnapshot};
use crate::storage::{SnapshotBuffer, StorageCore};

use state::AtomicState;
pub use state::CoordinatorState;
pub use throttle::UpdateThrottle;
pub use worker::{FrameWorker, SubmitOutcome, WorkerStats};

/// Outcome of one successfully processed frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameReport {
    /// Timestamp the frame was integrated at
    pub timestamp_ns: u64,
    /// Version of the latest snapshot after this frame
    pub version: u64,
    /// Samples in the frame
    pub samples: usize,
    /// Samples skipped as invalid
    pub invalid_samples: usize,
    /// Valid points outside the grid (dropped with their rays)
    pub out_of_extent: usize,
    /// Voxels that received a hit
    pub hits: usize,
    /// Voxels that received a miss
    pub carved: usize,
    /// A new snapshot was published
    pub published: bool,
}

impl FrameReport {
    /// The frame changed nothing.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.hits == 0 && self.carved == 0
    }
}

/// Owns the working volume and the published snapshot.
pub struct Coordinator {
    config: MapConfig,
    layout: GridLayout,
    engine: Mutex<FusionEngine>,
    buffer: SnapshotBuffer,
    state: AtomicState,
}

impl Coordinator {
    /// Build a coordinator over an all-unknown grid.
    pub fn new(config: MapConfig) -> std::result::Result<Self, ConfigError> {
        config.validate()?;
        let engine = FusionEngine::new(&config.grid, config.log_odds.clone());
        let layout = *engine.layout();

        info!(
            "[Coordinator] grid {:?} voxels @ {:.3}m, origin ({:.2}, {:.2}, {:.2}), {} chunks",
            layout.dimensions(),
            layout.voxel_size(),
            layout.origin().x,
            layout.origin().y,
            layout.origin().z,
            layout.chunk_count()
        );

        Ok(Self {
            config,
            layout,
            engine: Mutex::new(engine),
            buffer: SnapshotBuffer::new(),
            state: AtomicState::default(),
        })
    }

    /// Configuration in use.
    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    /// Grid geometry.
    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    /// Current lifecycle state.
    pub fn state(&self) -> CoordinatorState {
        self.state.load()
    }

    /// Integrate one frame taken at `frame.timestamp_ns`.
    ///
    /// Fails fast with [`FrameError::Busy`] if another frame is in flight.
    /// On any error the grid and the published snapshot are unchanged.
    pub fn process_frame(
        &self,
        frame: &Frame,
        orientation: Quaternion,
        origin: Point3,
    ) -> Result<FrameReport> {
        self.process(frame, orientation, origin, frame.timestamp_ns)
    }

    /// Integrate one frame from raw telemetry arrays.
    ///
    /// `quaternion` is `[w, x, y, z]`, `origin` is `[x, y, z]`; `timestamp_ns`
    /// overrides the frame's own timestamp.
    pub fn process_raw(
        &self,
        frame: &Frame,
        quaternion: [f32; 4],
        origin: [f32; 3],
        timestamp_ns: u64,
    ) -> Result<FrameReport> {
        self.process(
            frame,
            Quaternion::from_wxyz(quaternion),
            Point3::from_array(origin),
            timestamp_ns,
        )
    }

    fn process(
        &self,
        frame: &Frame,
        orientation: Quaternion,
        origin: Point3,
        timestamp_ns: u64,
    ) -> Result<FrameReport> {
        let mut engine = self.engine.try_lock().ok_or(FrameError::Busy)?;
        self.state.store(CoordinatorState::Processing);

        let result = self.integrate(&mut engine, frame, orientation, origin, timestamp_ns);

        // Settle the state before another caller can take the engine
        self.state.store(if self.buffer.is_published() {
            CoordinatorState::Published
        } else {
            CoordinatorState::Idle
        });
        drop(engine);

        result
    }

    fn integrate(
        &self,
        engine: &mut FusionEngine,
        frame: &Frame,
        orientation: Quaternion,
        origin: Point3,
        timestamp_ns: u64,
    ) -> Result<FrameReport> {
        let pose = Pose::new(orientation, origin)?;
        engine.check_timestamp(timestamp_ns)?;

        let mut transformed = transform_frame(frame, &pose, &self.config.sensor, &self.layout);
        transformed.timestamp_ns = timestamp_ns;
        let stats = engine.integrate(&transformed);

        let mut report = FrameReport {
            timestamp_ns,
            version: engine.version(),
            samples: frame.len(),
            invalid_samples: transformed.invalid_samples,
            out_of_extent: stats.dropped,
            hits: stats.hits,
            carved: stats.carved,
            published: false,
        };

        if stats.is_empty() {
            warn!(
                "[Coordinator] empty frame at {} ns: {} samples, {} invalid, {} out of extent",
                timestamp_ns, report.samples, report.invalid_samples, report.out_of_extent
            );
            return Ok(report);
        }

        let snapshot = self.buffer.publish(engine.snapshot(timestamp_ns));
        report.version = snapshot.version();
        report.published = true;

        debug!(
            "[Coordinator] v{} @ {} ns: {} hits, {} carved, {} out of extent",
            report.version, timestamp_ns, report.hits, report.carved, report.out_of_extent
        );
        Ok(report)
    }

    /// Hand the latest snapshot to `core`.
    ///
    /// Returns `false` (and does nothing) before the first publish.
    pub fn update_storage(&self, core: &mut dyn StorageCore) -> bool {
        match self.buffer.load() {
            Some(snapshot) => {
                core.accept(snapshot);
                true
            }
            None => false,
        }
    }

    /// Latest published snapshot.
    pub fn latest_snapshot(&self) -> Option<Arc<VoxelSnapshot>> {
        self.buffer.load()
    }

    /// Clear the grid and drop the published snapshot.
    ///
    /// Waits for an in-flight frame to finish. Snapshots already handed out
    /// stay valid.
    pub fn reset(&self) {
        let mut engine = self.engine.lock();
        engine.reset();
        self.buffer.clear();
        self.state.store(CoordinatorState::Idle);
        info!("[Coordinator] reset");
    }
}

static SHARED: OnceLock<Arc<Coordinator>> = OnceLock::new();

/// Process-wide coordinator built from `configs/vayu.toml` (or defaults).
///
/// # Panics
///
/// If the configuration file exists but is unreadable or invalid: without a
/// valid grid there is nothing the process could integrate into.
pub fn shared_instance() -> Arc<Coordinator> {
    let coordinator = SHARED.get_or_init(|| {
        let config = match VayuConfig::load_default() {
            Ok(config) => config,
            Err(e) => panic!("VayuGrid configuration error: {}", e),
        };
        match Coordinator::new(config.to_map_config()) {
            Ok(coordinator) => Arc::new(coordinator),
            Err(e) => panic!("VayuGrid configuration error: {}", e),
        }
    });
    Arc::clone(coordinator)
}
