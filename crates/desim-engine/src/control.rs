//! # desim-engine::control
//!
//! Run control: the cooperative stop signal a host thread or a scheduled
//! action can use to end a run early, the run's own lifecycle state, and
//! the outcome/report types the dispatch loop produces when it stops.

use crate::errors::RunError;
use desim_types::time::SimTime;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A cloneable handle used to request that a run stop after the event
/// currently dispatching finishes. Checked once per dispatch-loop
/// iteration, before the next event is popped. Backed by an `Arc<AtomicBool>`
/// rather than `Rc<Cell<bool>>` (unlike the rest of the engine's internals)
/// so a host can hand a clone to a signal-handling thread even though the
/// dispatch loop itself is single-threaded.
#[derive(Clone, Default)]
pub struct StopToken(Arc<AtomicBool>);

impl StopToken {
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(false)))
    }

    pub fn request_stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_stop_requested(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// The run's own lifecycle state. A tagged enum rather than a hierarchy of
/// state subclasses, per the engine's general preference for sum types over
/// inheritance. `Paused` exists for API symmetry with hosts that want to
/// suspend a run between `step` calls; nothing inside `run`'s single
/// blocking loop observes it, since that loop has no suspension points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunState {
    #[default]
    Idle,
    Running,
    Paused,
    Terminated,
}

/// Why a run ended. Exactly one of these terminates the dispatch loop, and
/// termination conditions are evaluated in a fixed order each iteration:
/// queue emptiness, then duration, then a stop request, then dispatch.
#[derive(Debug)]
pub enum RunOutcome {
    /// The future-event set held no live events.
    QueueEmpty,
    /// The next due event would fire at or after the configured total
    /// duration; it was left unpopped.
    DurationReached,
    /// A `StopToken` was tripped by a scheduled action or a host thread.
    Cancelled,
    /// An action returned an error, or a scheduling call inside one did.
    Failed(RunError),
}

impl RunOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            RunOutcome::QueueEmpty => "QueueEmpty",
            RunOutcome::DurationReached => "DurationReached",
            RunOutcome::Cancelled => "Cancelled",
            RunOutcome::Failed(_) => "Failed",
        }
    }
}

/// The full result of a run: the outcome plus bookkeeping useful to callers
/// deciding whether the results are trustworthy.
#[derive(Debug)]
pub struct RunReport {
    pub outcome: RunOutcome,
    pub ended_at: SimTime,
    pub events_dispatched: u64,
    /// True when the run ended via `QueueEmpty` strictly before the
    /// configured total duration was reached — the model went idle early,
    /// which usually means measurement windows were only partially filled.
    pub quiescent_early: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stop_token_clones_share_state() {
        let token = StopToken::new();
        let clone = token.clone();
        assert!(!clone.is_stop_requested());
        token.request_stop();
        assert!(clone.is_stop_requested());
    }

    #[test]
    fn outcome_labels_are_stable() {
        assert_eq!(RunOutcome::QueueEmpty.label(), "QueueEmpty");
        assert_eq!(RunOutcome::DurationReached.label(), "DurationReached");
        assert_eq!(RunOutcome::Cancelled.label(), "Cancelled");
    }

    #[test]
    fn run_state_defaults_to_idle() {
        assert_eq!(RunState::default(), RunState::Idle);
    }
}
