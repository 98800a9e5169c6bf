//! Debounced autosave state machine.
//!
//! Every edit replaces the pending payload and pushes the deadline out to
//! `now + delay`. Only the newest payload is ever written; intermediate
//! edits are dropped. The caller owns the clock and polls `due(now)`.

use std::time::{Duration, Instant};

/// Quiet period between the last edit and the write.
pub const DEFAULT_AUTOSAVE_DELAY: Duration = Duration::from_millis(1_000);

#[derive(Debug, Clone, PartialEq)]
pub enum AutosaveState<P> {
    Idle,
    PendingWrite { deadline: Instant, payload: P },
}

#[derive(Debug, Clone)]
pub struct Autosave<P> {
    delay: Duration,
    state: AutosaveState<P>,
}

impl<P> Default for Autosave<P> {
    fn default() -> Self {
        Self::new(DEFAULT_AUTOSAVE_DELAY)
    }
}

impl<P> Autosave<P> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            state: AutosaveState::Idle,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn state(&self) -> &AutosaveState<P> {
        &self.state
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, AutosaveState::PendingWrite { .. })
    }

    pub fn deadline(&self) -> Option<Instant> {
        match &self.state {
            AutosaveState::PendingWrite { deadline, .. } => Some(*deadline),
            AutosaveState::Idle => None,
        }
    }

    /// Records an edit, superseding any payload still waiting.
    pub fn on_edit(&mut self, payload: P, now: Instant) {
        self.state = AutosaveState::PendingWrite {
            deadline: now + self.delay,
            payload,
        };
    }

    /// Takes the pending payload once its deadline has passed.
    pub fn due(&mut self, now: Instant) -> Option<P> {
        match self.deadline() {
            Some(deadline) if now >= deadline => self.flush(),
            _ => None,
        }
    }

    /// Takes the pending payload regardless of the deadline.
    pub fn flush(&mut self) -> Option<P> {
        match std::mem::replace(&mut self.state, AutosaveState::Idle) {
            AutosaveState::PendingWrite { payload, .. } => Some(payload),
            AutosaveState::Idle => None,
        }
    }

    /// Drops the pending payload without writing it.
    pub fn cancel(&mut self) {
        self.state = AutosaveState::Idle;
    }
}
