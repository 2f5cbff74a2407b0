//! # desim-engine::observer
//!
//! The observation hook: a side-channel the dispatch loop reports through,
//! entirely separate from the model's own state. Observers cannot affect
//! scheduling decisions; they only watch.

use desim_types::id::{EventId, Priority};
use desim_types::time::SimTime;

/// A single occurrence the dispatch loop reports to any attached observer.
#[derive(Debug, Clone)]
pub enum Observation {
    /// The dispatch loop is about to begin. Always the first observation
    /// delivered for a given `run` call.
    RunStarted { at: SimTime },
    /// An event was popped from the future-event set and its action is
    /// about to run.
    EventDispatched {
        id: EventId,
        at: SimTime,
        priority: Priority,
    },
    /// The warm-up period ended; measurements taken after this point count
    /// toward the first snap.
    WarmUpEnded { at: SimTime },
    /// A snap (measurement window) boundary was crossed.
    SnapBoundary { at: SimTime, snap_index: u32 },
    /// The run ended, successfully or not.
    RunFinished { at: SimTime, outcome: String },
}

/// Anything that wants to watch a run implements this. The dispatch loop
/// never blocks on delivery failing: a hook that drops observations (e.g.
/// a full bounded channel) does not slow or fail the simulation.
pub trait ObservationHook {
    fn observe(&mut self, observation: Observation);
}

/// An `ObservationHook` that never does anything. The default when no
/// observer is attached; lets the dispatch loop call `observe` uniformly
/// without branching on whether anyone is listening.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullHook;

impl ObservationHook for NullHook {
    fn observe(&mut self, _observation: Observation) {}
}

/// Forwards observations to a `crossbeam_channel::Sender`, decoupling the
/// dispatch loop from whatever consumes them (a logger, a TUI, a test
/// assertion). Send failures (the receiver was dropped) are swallowed: a
/// run must never fail because nothing is listening anymore.
pub struct ChannelHook {
    tx: crossbeam_channel::Sender<Observation>,
}

impl ChannelHook {
    pub fn new(tx: crossbeam_channel::Sender<Observation>) -> Self {
        Self { tx }
    }

    /// Convenience constructor returning both ends of an unbounded channel.
    pub fn unbounded() -> (Self, crossbeam_channel::Receiver<Observation>) {
        let (tx, rx) = crossbeam_channel::unbounded();
        (Self::new(tx), rx)
    }
}

impl ObservationHook for ChannelHook {
    fn observe(&mut self, observation: Observation) {
        let _ = self.tx.send(observation);
    }
}
