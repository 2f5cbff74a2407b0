//! # desim-engine::runner
//!
//! The dispatch loop (a.k.a. the run controller): repeatedly pops the next
//! due event from the future-event set, advances the clock to it, and runs
//! its action, until one of four termination conditions is met. Conditions
//! are checked in a fixed order every iteration so that, for example, a run
//! never dispatches an event past the configured duration just because
//! nothing asked it to stop first.

use crate::clock::Clock;
use crate::control::{RunOutcome, RunReport, RunState, StopToken};
use crate::errors::RunError;
use crate::event::EventHandle;
use crate::fes::FutureEventSet;
use crate::ids::IdGen;
use crate::observer::{NullHook, Observation, ObservationHook};
use crate::rng::RngStreams;
use crate::scheduler::Scheduler;
use desim_types::config::RunConfig;
use desim_types::errors::ConfigError;
use desim_types::id::Priority;
use desim_types::time::SimTime;
use tracing::{debug, info, trace, warn};

/// Owns the clock, the future-event set, the id and rng generators, and the
/// observation hook for one run. `S` is the caller's model state; the
/// runner never inspects it beyond handing it to action closures.
pub struct Runner<S> {
    clock: Clock,
    fes: FutureEventSet<S>,
    ids: IdGen,
    rng: RngStreams,
    stop: StopToken,
    hook: Box<dyn ObservationHook>,
    config: RunConfig,
    total_duration: SimTime,
    boundaries: Vec<SimTime>,
    next_boundary_idx: usize,
    events_dispatched: u64,
    state: RunState,
}

impl<S> Runner<S> {
    pub fn new(config: RunConfig) -> Result<Self, ConfigError> {
        Self::with_hook(config, Box::new(NullHook))
    }

    pub fn with_hook(
        config: RunConfig,
        hook: Box<dyn ObservationHook>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let total_duration = config.total_duration()?;
        let boundaries = boundary_schedule(&config);
        let rng = RngStreams::new(config.master_seed);
        Ok(Self {
            clock: Clock::new(),
            fes: FutureEventSet::new(),
            ids: IdGen::new(),
            rng,
            stop: StopToken::new(),
            hook,
            config,
            total_duration,
            boundaries,
            next_boundary_idx: 0,
            events_dispatched: 0,
            state: RunState::Idle,
        })
    }

    pub fn now(&self) -> SimTime {
        self.clock.now()
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Marks the run paused. Has no effect on an in-progress call to
    /// `run`, which blocks until termination with no suspension point;
    /// meaningful only between `run` calls or before the first one, for
    /// hosts that model "not currently scheduled to run" as a state.
    pub fn pause(&mut self) {
        if self.state == RunState::Running {
            self.state = RunState::Paused;
        }
    }

    pub fn resume(&mut self) {
        if self.state == RunState::Paused {
            self.state = RunState::Running;
        }
    }

    pub fn stop_token(&self) -> StopToken {
        self.stop.clone()
    }

    pub fn rng(&mut self) -> &mut RngStreams {
        &mut self.rng
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Schedules an event before the run starts (or between runs); actions
    /// schedule further events through the `Scheduler` handed to them.
    pub fn schedule_at<F>(
        &mut self,
        at: SimTime,
        priority: Priority,
        action: F,
    ) -> Result<EventHandle, crate::errors::SchedulingError>
    where
        F: FnMut(&mut S, &mut Scheduler<S>) -> crate::errors::ActionResult + 'static,
    {
        let mut scheduler = Scheduler::new(&mut self.fes, &mut self.ids, &mut self.rng, &self.stop, self.clock.now());
        scheduler.schedule_at(at, priority, action)
    }

    pub fn schedule_after<F>(
        &mut self,
        delay: desim_types::time::SimDelay,
        priority: Priority,
        action: F,
    ) -> Result<EventHandle, crate::errors::SchedulingError>
    where
        F: FnMut(&mut S, &mut Scheduler<S>) -> crate::errors::ActionResult + 'static,
    {
        let mut scheduler = Scheduler::new(&mut self.fes, &mut self.ids, &mut self.rng, &self.stop, self.clock.now());
        scheduler.schedule_after(delay, priority, action)
    }

    /// Runs the dispatch loop to completion against `state`, consuming
    /// events from the future-event set until one of the four termination
    /// conditions fires.
    pub fn run(&mut self, state: &mut S) -> RunReport {
        info!(
            total_duration = self.total_duration,
            master_seed = self.config.master_seed,
            "starting run"
        );
        self.state = RunState::Running;
        self.hook.observe(Observation::RunStarted { at: self.clock.now() });
        let outcome = loop {
            if self.fes.peek_next_due().is_none() {
                debug!(at = self.clock.now(), "future-event set is empty");
                break RunOutcome::QueueEmpty;
            }
            let next_due = self.fes.peek_next_due().expect("checked non-empty above");
            if next_due >= self.total_duration {
                debug!(at = self.clock.now(), next_due, "configured duration reached");
                break RunOutcome::DurationReached;
            }
            if self.stop.is_stop_requested() {
                debug!(at = self.clock.now(), "stop requested");
                break RunOutcome::Cancelled;
            }

            let event = self.fes.pop_min().expect("peeked an event above");
            self.clock.advance_to(event.due_at());
            self.cross_boundaries();

            let observation = Observation::EventDispatched {
                id: event.id(),
                at: event.due_at(),
                priority: event.priority(),
            };
            self.hook.observe(observation);
            trace!(id = event.id(), at = event.due_at(), "dispatching event");

            let at = event.due_at();
            let mut action = event.into_action();
            let mut scheduler = Scheduler::new(&mut self.fes, &mut self.ids, &mut self.rng, &self.stop, at);
            let result = action(state, &mut scheduler);
            let scheduling_error = scheduler.take_pending_error();
            self.events_dispatched += 1;

            if let Some(source) = scheduling_error {
                warn!(at, error = %source, "scheduling call inside action failed, ending run");
                break RunOutcome::Failed(RunError::Scheduling { at, source });
            }
            if let Err(source) = result {
                warn!(at, error = %source, "action failed, ending run");
                break RunOutcome::Failed(RunError::Action { at, source });
            }
        };

        self.state = RunState::Terminated;
        let ended_at = self.clock.now();
        let quiescent_early =
            matches!(outcome, RunOutcome::QueueEmpty) && ended_at < self.total_duration;
        info!(
            outcome = outcome.label(),
            ended_at,
            events_dispatched = self.events_dispatched,
            quiescent_early,
            "run finished"
        );
        self.hook.observe(Observation::RunFinished {
            at: ended_at,
            outcome: outcome.label().to_string(),
        });

        RunReport {
            outcome,
            ended_at,
            events_dispatched: self.events_dispatched,
            quiescent_early,
        }
    }

    /// Notifies the observation hook of every warm-up/snap boundary at or
    /// before the clock's current time that has not yet been announced.
    /// Called right after advancing the clock and before dispatching the
    /// event that landed on or past a boundary, so an event exactly at a
    /// boundary is counted as happening after it.
    fn cross_boundaries(&mut self) {
        while self.next_boundary_idx < self.boundaries.len()
            && self.boundaries[self.next_boundary_idx] <= self.clock.now()
        {
            let at = self.boundaries[self.next_boundary_idx];
            if self.next_boundary_idx == 0 {
                debug!(at, "warm-up ended");
                self.hook.observe(Observation::WarmUpEnded { at });
            } else {
                let snap_index = self.next_boundary_idx as u32;
                debug!(at, snap_index, "snap boundary crossed");
                self.hook.observe(Observation::SnapBoundary { at, snap_index });
            }
            self.next_boundary_idx += 1;
        }
    }
}

/// Builds the ordered list of boundary times: warm-up end, then each snap
/// end, in absolute simulation time.
fn boundary_schedule(config: &RunConfig) -> Vec<SimTime> {
    let mut boundaries = Vec::with_capacity(config.snap_count as usize + 1);
    boundaries.push(config.warm_up_duration);
    let mut at = config.warm_up_duration;
    for _ in 0..config.snap_count {
        at += config.snap_duration;
        boundaries.push(at);
    }
    boundaries
}
