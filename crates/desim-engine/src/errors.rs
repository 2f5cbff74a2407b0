//! # desim-engine::errors
//!
//! Error types specific to scheduling and run dispatch. `desim-types`
//! carries the errors shared with configuration loading; these are
//! engine-internal.

use desim_types::time::SimTime;
use thiserror::Error;

/// A programmer error raised by the scheduling API. Both variants are
/// fatal: they terminate the run that produced them.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulingError {
    #[error("scheduled time {requested} is before current time {now}")]
    BackInTime { now: SimTime, requested: SimTime },
    #[error("negative delay {delta} passed to schedule_after")]
    NegativeDelay { delta: i128 },
    #[error("scheduled time overflowed SimTime")]
    TimeOverflow,
}

/// The error an action returns to signal a model-logic failure. Wraps any
/// boxed `std::error::Error` so user code is not forced to adopt a
/// particular error-handling crate for its own action bodies.
#[derive(Error, Debug)]
#[error("action failed: {0}")]
pub struct ActionError(#[from] pub Box<dyn std::error::Error>);

impl ActionError {
    pub fn msg(message: impl Into<String>) -> Self {
        ActionError(Box::<dyn std::error::Error>::from(message.into()))
    }
}

pub type ActionResult = Result<(), ActionError>;

/// The first fatal error encountered during a run, surfaced with the
/// simulation time at which it occurred. The dispatcher does not attempt
/// recovery past this point — remaining events are discarded and partial
/// state is handed back to the caller.
#[derive(Error, Debug)]
pub enum RunError {
    #[error("at t={at}: {source}")]
    Scheduling {
        at: SimTime,
        #[source]
        source: SchedulingError,
    },
    #[error("at t={at}: {source}")]
    Action {
        at: SimTime,
        #[source]
        source: ActionError,
    },
}

impl RunError {
    pub fn at(&self) -> SimTime {
        match self {
            RunError::Scheduling { at, .. } => *at,
            RunError::Action { at, .. } => *at,
        }
    }
}
