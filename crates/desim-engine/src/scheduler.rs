//! # desim-engine::scheduler
//!
//! The `Scheduler` is the only handle action closures get to the engine: it
//! lets them read the current time, draw from named RNG streams, and
//! schedule or cancel future events. It borrows the `Runner`'s internals
//! for the duration of a single dispatch, so nothing outside an action body
//! can hold one past the event that received it.

use crate::control::StopToken;
use crate::errors::SchedulingError;
use crate::event::{Action, Event, EventHandle, EventKey};
use crate::fes::FutureEventSet;
use crate::ids::IdGen;
use crate::rng::RngStreams;
use desim_types::time::{SimDelay, SimTime};
use rand_chacha::ChaCha20Rng;

pub struct Scheduler<'a, S> {
    fes: &'a mut FutureEventSet<S>,
    ids: &'a mut IdGen,
    rng: &'a mut RngStreams,
    stop: &'a StopToken,
    now: SimTime,
    pending_error: Option<SchedulingError>,
}

impl<'a, S> Scheduler<'a, S> {
    pub(crate) fn new(
        fes: &'a mut FutureEventSet<S>,
        ids: &'a mut IdGen,
        rng: &'a mut RngStreams,
        stop: &'a StopToken,
        now: SimTime,
    ) -> Self {
        Self { fes, ids, rng, stop, now, pending_error: None }
    }

    /// Takes the first scheduling error raised by this scheduler, if any.
    /// Called by the dispatch loop after an action returns, so a scheduling
    /// mistake inside an action body fails the run even if the action
    /// itself didn't propagate the `Result` it got back.
    pub(crate) fn take_pending_error(&mut self) -> Option<SchedulingError> {
        self.pending_error.take()
    }

    /// The current simulation time, as of the start of the event currently
    /// being dispatched.
    pub fn now(&self) -> SimTime {
        self.now
    }

    /// Requests that the run stop after the current event finishes, the
    /// same effect as tripping the `Runner`'s `StopToken` from outside.
    pub fn request_stop(&self) {
        self.stop.request_stop();
    }

    /// The named RNG stream, seeded deterministically from the run's
    /// master seed on first access.
    pub fn rng(&mut self, name: &str) -> &mut ChaCha20Rng {
        self.rng.stream(name)
    }

    /// Schedules `action` to run at absolute time `at`. `at` must be
    /// `>= now()`; scheduling into the past is a programmer error, reported
    /// rather than panicked on so the run can fail cleanly.
    pub fn schedule_at<F>(
        &mut self,
        at: SimTime,
        priority: desim_types::id::Priority,
        action: F,
    ) -> Result<EventHandle, SchedulingError>
    where
        F: FnMut(&mut S, &mut Scheduler<S>) -> crate::errors::ActionResult + 'static,
    {
        if at < self.now {
            let err = SchedulingError::BackInTime {
                now: self.now,
                requested: at,
            };
            self.pending_error.get_or_insert(err);
            return Err(err);
        }
        let key = EventKey {
            due_at: at,
            priority,
            id: self.ids.next_event_id(),
        };
        let boxed: Action<S> = Box::new(action);
        let (event, handle) = Event::new(key, boxed);
        self.fes.insert(event);
        Ok(handle)
    }

    /// Schedules `action` to run `delay` simulation-time units from now.
    /// `delay` must be non-negative; a negative `delay` is rejected
    /// unconditionally, even when it would not carry the due time before
    /// `now()`.
    pub fn schedule_after<F>(
        &mut self,
        delay: SimDelay,
        priority: desim_types::id::Priority,
        action: F,
    ) -> Result<EventHandle, SchedulingError>
    where
        F: FnMut(&mut S, &mut Scheduler<S>) -> crate::errors::ActionResult + 'static,
    {
        if delay < 0 {
            let err = SchedulingError::NegativeDelay { delta: delay };
            self.pending_error.get_or_insert(err);
            return Err(err);
        }
        let at = match desim_types::time::checked_add_delay(self.now, delay) {
            Ok(at) => at,
            Err(_) => {
                let err = SchedulingError::TimeOverflow;
                self.pending_error.get_or_insert(err);
                return Err(err);
            }
        };
        self.schedule_at(at, priority, action)
    }

    /// Cancels a previously scheduled event. A no-op if the event has
    /// already fired or was already cancelled.
    pub fn cancel(&mut self, handle: &EventHandle) {
        handle.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn harness() -> (FutureEventSet<()>, IdGen, RngStreams, StopToken) {
        (FutureEventSet::new(), IdGen::new(), RngStreams::new(1), StopToken::new())
    }

    #[test]
    fn schedule_at_rejects_the_past() {
        let (mut fes, mut ids, mut rng, stop) = harness();
        let mut sched: Scheduler<()> = Scheduler::new(&mut fes, &mut ids, &mut rng, &stop, 10);
        let err = sched.schedule_at(5, 0, |_, _| Ok(())).unwrap_err();
        assert_eq!(err, SchedulingError::BackInTime { now: 10, requested: 5 });
    }

    #[test]
    fn schedule_after_computes_absolute_time() {
        let (mut fes, mut ids, mut rng, stop) = harness();
        let mut sched: Scheduler<()> = Scheduler::new(&mut fes, &mut ids, &mut rng, &stop, 10);
        sched.schedule_after(5, 0, |_, _| Ok(())).unwrap();
        assert_eq!(fes.peek_next_due(), Some(15));
    }

    #[test]
    fn schedule_after_rejects_any_negative_delay() {
        let (mut fes, mut ids, mut rng, stop) = harness();
        let mut sched: Scheduler<()> = Scheduler::new(&mut fes, &mut ids, &mut rng, &stop, 10);
        let err = sched.schedule_after(-4, 0, |_, _| Ok(())).unwrap_err();
        assert_eq!(err, SchedulingError::NegativeDelay { delta: -4 });
        assert!(fes.peek_next_due().is_none());
    }

    #[test]
    fn schedule_after_rejects_delay_before_epoch() {
        let (mut fes, mut ids, mut rng, stop) = harness();
        let mut sched: Scheduler<()> = Scheduler::new(&mut fes, &mut ids, &mut rng, &stop, 10);
        let err = sched.schedule_after(-11, 0, |_, _| Ok(())).unwrap_err();
        assert_eq!(err, SchedulingError::NegativeDelay { delta: -11 });
    }

    #[test]
    fn schedule_errors_are_recorded_as_pending() {
        let (mut fes, mut ids, mut rng, stop) = harness();
        let mut sched: Scheduler<()> = Scheduler::new(&mut fes, &mut ids, &mut rng, &stop, 10);
        assert!(sched.schedule_at(5, 0, |_, _| Ok(())).is_err());
        assert_eq!(
            sched.take_pending_error(),
            Some(SchedulingError::BackInTime { now: 10, requested: 5 })
        );
        assert_eq!(sched.take_pending_error(), None);
    }

    #[test]
    fn cancel_via_scheduler_marks_event_dead() {
        let (mut fes, mut ids, mut rng, stop) = harness();
        let flag = Rc::new(Cell::new(false));
        let flag_clone = Rc::clone(&flag);
        let handle = {
            let mut sched: Scheduler<()> = Scheduler::new(&mut fes, &mut ids, &mut rng, &stop, 0);
            sched
                .schedule_at(1, 0, move |_, _| {
                    flag_clone.set(true);
                    Ok(())
                })
                .unwrap()
        };
        let mut sched: Scheduler<()> = Scheduler::new(&mut fes, &mut ids, &mut rng, &stop, 0);
        sched.cancel(&handle);
        assert!(fes.peek_next_due().is_none());
        assert!(!flag.get());
    }

    #[test]
    fn rng_stream_is_reachable_from_the_scheduler() {
        use rand::Rng;
        let (mut fes, mut ids, mut rng, stop) = harness();
        let mut sched: Scheduler<()> = Scheduler::new(&mut fes, &mut ids, &mut rng, &stop, 0);
        let draw: u32 = sched.rng("arrivals").gen();
        let _ = draw;
    }

    #[test]
    fn request_stop_trips_the_shared_token() {
        let (mut fes, mut ids, mut rng, stop) = harness();
        let sched: Scheduler<()> = Scheduler::new(&mut fes, &mut ids, &mut rng, &stop, 0);
        assert!(!stop.is_stop_requested());
        sched.request_stop();
        assert!(stop.is_stop_requested());
    }
}
