//! Convenience re-exports for downstream crates.

pub use crate::clock::Clock;
pub use crate::control::{RunOutcome, RunReport, RunState, StopToken};
pub use crate::errors::{ActionError, ActionResult, RunError, SchedulingError};
pub use crate::event::{Event, EventHandle, EventKey};
pub use crate::fes::FutureEventSet;
pub use crate::observer::{ChannelHook, NullHook, Observation, ObservationHook};
pub use crate::rng::RngStreams;
pub use crate::runner::Runner;
pub use crate::scheduler::Scheduler;

pub use desim_types::config::RunConfig;
pub use desim_types::errors::ConfigError;
pub use desim_types::id::{EventId, Priority};
pub use desim_types::time::{SimDelay, SimTime};
