//! Background frame worker.
//!
//! Moves frame integration off the frame source's thread. The source calls
//! [`FrameWorker::submit`], which never blocks. At most one frame is in the
//! worker at a time: a frame offered while another is still being integrated
//! or stored is dropped and the [`UpdateThrottle`] is told, so a slow consumer
//! stretches the storage update interval instead of stalling frames. Nothing
//! waits in a queue behind the running frame.
//!
//! ```text
//! frame source ──submit──► permit free? ──► "vayu-fusion" thread
//!                  │ taken                    process_frame
//!                  ▼                          update_storage (when due)
//!               Dropped                       release permit
//! ```

use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::thread::{self, JoinHandle};

use crossbeam_channel::{Sender, TrySendError, bounded};
use log::{info, warn};
use parking_lot::Mutex;

use super::Coordinator;
use super::throttle::UpdateThrottle;
use crate::config::StorageSection;
use crate::core::{Frame, Point3, Quaternion};
use crate::storage::StorageCore;

/// Result of offering a frame to the worker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The frame will be processed; storage is updated afterwards if set.
    Queued {
        /// Storage update scheduled for this frame
        update_storage: bool,
    },
    /// The worker was busy; the frame was discarded.
    Dropped,
}

/// Worker counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WorkerStats {
    /// Frames handed to the worker
    pub queued: u64,
    /// Frames discarded at submit
    pub dropped: u64,
    /// Frames integrated successfully
    pub processed: u64,
    /// Frames rejected by the coordinator
    pub failed: u64,
    /// Storage updates performed
    pub storage_updates: u64,
}

#[derive(Default)]
struct Counters {
    queued: AtomicU64,
    dropped: AtomicU64,
    processed: AtomicU64,
    failed: AtomicU64,
    storage_updates: AtomicU64,
}

impl Counters {
    fn snapshot(&self) -> WorkerStats {
        WorkerStats {
            queued: self.queued.load(Ordering::Relaxed),
            dropped: self.dropped.load(Ordering::Relaxed),
            processed: self.processed.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            storage_updates: self.storage_updates.load(Ordering::Relaxed),
        }
    }
}

struct Job {
    frame: Frame,
    orientation: Quaternion,
    origin: Point3,
    update_storage: bool,
}

/// Handle to the background fusion thread.
pub struct FrameWorker {
    sender: Option<Sender<Job>>,
    handle: Option<JoinHandle<()>>,
    throttle: UpdateThrottle,
    counters: Arc<Counters>,
    /// Held from a successful submit until the worker finishes that frame
    in_flight: Arc<AtomicBool>,
}

impl FrameWorker {
    /// Spawn the worker thread.
    pub fn spawn<S>(
        coordinator: Arc<Coordinator>,
        storage: Arc<Mutex<S>>,
        config: &StorageSection,
    ) -> io::Result<Self>
    where
        S: StorageCore + Send + 'static,
    {
        let (sender, receiver) = bounded::<Job>(1);
        let counters = Arc::new(Counters::default());
        let thread_counters = Arc::clone(&counters);
        let in_flight = Arc::new(AtomicBool::new(false));
        let thread_in_flight = Arc::clone(&in_flight);

        let handle = thread::Builder::new()
            .name(config.worker_name.clone())
            .spawn(move || {
                info!("[FrameWorker] started");
                while let Ok(job) = receiver.recv() {
                    match coordinator.process_frame(&job.frame, job.orientation, job.origin) {
                        Ok(_) => {
                            thread_counters.processed.fetch_add(1, Ordering::Relaxed);
                            if job.update_storage {
                                let mut storage = storage.lock();
                                if coordinator.update_storage(&mut *storage) {
                                    thread_counters
                                        .storage_updates
                                        .fetch_add(1, Ordering::Relaxed);
                                }
                            }
                        }
                        Err(e) => {
                            thread_counters.failed.fetch_add(1, Ordering::Relaxed);
                            warn!(
                                "[FrameWorker] frame {} ns rejected: {}",
                                job.frame.timestamp_ns, e
                            );
                        }
                    }
                    thread_in_flight.store(false, Ordering::Release);
                }
                info!("[FrameWorker] stopped");
            })?;

        Ok(Self {
            sender: Some(sender),
            handle: Some(handle),
            throttle: UpdateThrottle::new(config.max_drop_trigger),
            counters,
            in_flight,
        })
    }

    /// Offer a frame without blocking.
    pub fn submit(
        &mut self,
        frame: Frame,
        orientation: Quaternion,
        origin: Point3,
    ) -> SubmitOutcome {
        let acquired = self.sender.is_some()
            && self
                .in_flight
                .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
                .is_ok();
        if !acquired {
            return self.drop_frame();
        }

        // Decide the storage update before the send so a dropped frame is
        // counted against the throttle exactly once.
        let mut throttle = self.throttle.clone();
        let update_storage = throttle.record(true);
        let job = Job {
            frame,
            orientation,
            origin,
            update_storage,
        };

        // The permit guarantees the slot is empty, so only a dead worker fails here
        let sent = match &self.sender {
            Some(sender) => match sender.try_send(job) {
                Ok(()) => true,
                Err(TrySendError::Full(_)) | Err(TrySendError::Disconnected(_)) => false,
            },
            None => false,
        };
        if !sent {
            self.in_flight.store(false, Ordering::Release);
            return self.drop_frame();
        }

        self.throttle = throttle;
        self.counters.queued.fetch_add(1, Ordering::Relaxed);
        SubmitOutcome::Queued { update_storage }
    }

    fn drop_frame(&mut self) -> SubmitOutcome {
        self.throttle.record(false);
        self.counters.dropped.fetch_add(1, Ordering::Relaxed);
        SubmitOutcome::Dropped
    }

    /// Whether a frame is being integrated or stored right now.
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Current counters.
    pub fn stats(&self) -> WorkerStats {
        self.counters.snapshot()
    }

    /// Storage update throttle state.
    pub fn throttle(&self) -> &UpdateThrottle {
        &self.throttle
    }

    /// Finish the frame in flight and join the thread.
    pub fn shutdown(&mut self) {
        // Closing the channel ends the worker loop after the pending job
        self.sender.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("[FrameWorker] worker thread panicked");
            }
        }
    }
}

impl Drop for FrameWorker {
    fn drop(&mut self) {
        self.shutdown();
    }
}
