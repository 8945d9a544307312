//! Adaptive storage-update throttle.
//!
//! Handing a snapshot to the consumer storage costs a diff over every chunk,
//! so under load it is done only every `trigger`-th frame. The trigger grows
//! whenever the worker keeps dropping frames:
//!
//! ```text
//! trigger = 1: update on every frame
//! > trigger-1 consecutive drops → trigger += 1 (up to max), misses reset
//! accepted frame → misses reset
//! ```
//!
//! The trigger never shrinks; a platform that was once overloaded keeps the
//! coarser update rate for the rest of the session.

/// Decides which accepted frames also update storage.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UpdateThrottle {
    trigger: u32,
    missed: u32,
    frame_count: u64,
    max_trigger: u32,
}

impl UpdateThrottle {
    /// Start updating on every frame, growing to at most `max_trigger`.
    pub fn new(max_trigger: u32) -> Self {
        Self {
            trigger: 1,
            missed: 0,
            frame_count: 0,
            max_trigger: max_trigger.max(1),
        }
    }

    /// Record one offered frame.
    ///
    /// Returns `true` when the frame was accepted and storage should be
    /// updated after it is processed.
    pub fn record(&mut self, accepted: bool) -> bool {
        let update_due = self.frame_count % u64::from(self.trigger) == 0;

        if accepted {
            self.missed = 0;
        } else {
            self.missed += 1;
            if self.missed > self.trigger - 1 && self.trigger < self.max_trigger {
                self.trigger += 1;
                self.missed = 0;
            }
        }

        self.frame_count += 1;
        accepted && update_due
    }

    /// Current update interval in frames.
    #[inline]
    pub fn trigger(&self) -> u32 {
        self.trigger
    }

    /// Consecutive dropped frames since the last accept or trigger change.
    #[inline]
    pub fn missed(&self) -> u32 {
        self.missed
    }

    /// Frames offered so far.
    #[inline]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}
