//! Observable coordinator state.

use std::sync::atomic::{AtomicU8, Ordering};

/// Lifecycle of the coordinator as seen by other threads.
///
/// ```text
///          process_frame            frame done
///   Idle ────────────────► Processing ─────────► Published
///    ▲                        ▲                     │
///    │ reset                  └──── process_frame ──┘
///    └──────────────────────────────────────────────┘
/// ```
///
/// A frame that publishes nothing returns to `Idle` if no snapshot exists yet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum CoordinatorState {
    /// Nothing published yet, or reset.
    Idle = 0,
    /// A frame is being integrated.
    Processing = 1,
    /// A snapshot is available and no frame is in flight.
    Published = 2,
}

impl CoordinatorState {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => Self::Processing,
            2 => Self::Published,
            _ => Self::Idle,
        }
    }
}

/// Lock-free cell holding a [`CoordinatorState`].
#[derive(Debug)]
pub(crate) struct AtomicState(AtomicU8);

impl AtomicState {
    pub fn new(state: CoordinatorState) -> Self {
        Self(AtomicU8::new(state as u8))
    }

    pub fn load(&self) -> CoordinatorState {
        CoordinatorState::from_u8(self.0.load(Ordering::Acquire))
    }

    pub fn store(&self, state: CoordinatorState) {
        self.0.store(state as u8, Ordering::Release);
    }
}

impl Default for AtomicState {
    fn default() -> Self {
        Self::new(CoordinatorState::Idle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip() {
        let state = AtomicState::default();
        assert_eq!(state.load(), CoordinatorState::Idle);

        for s in [
            CoordinatorState::Processing,
            CoordinatorState::Published,
            CoordinatorState::Idle,
        ] {
            state.store(s);
            assert_eq!(state.load(), s);
        }
    }
}
