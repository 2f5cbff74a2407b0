//! # desim-engine::clock
//!
//! The simulation clock: a single monotonically non-decreasing value of
//! simulation time. Only the `Runner`'s dispatch loop ever advances it.

use desim_types::time::SimTime;

#[derive(Debug, Clone, Copy)]
pub struct Clock {
    now: SimTime,
}

impl Clock {
    pub fn new() -> Self {
        Self { now: desim_types::time::SIM_EPOCH }
    }

    /// The current simulation time.
    pub fn now(&self) -> SimTime {
        self.now
    }

    /// Moves the clock forward to `t`. Panics if `t < now`: the only caller
    /// is the dispatch loop, which only ever advances to the `due_at` of an
    /// event popped from a `FutureEventSet` that itself never admits an
    /// event with `due_at < now` — so tripping this assertion means that
    /// invariant has already been broken elsewhere, not a recoverable
    /// runtime condition.
    pub fn advance_to(&mut self, t: SimTime) {
        assert!(
            t >= self.now,
            "clock cannot move backwards: now={} requested={}",
            self.now,
            t
        );
        self.now = t;
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_epoch() {
        assert_eq!(Clock::new().now(), 0);
    }

    #[test]
    fn advances_forward() {
        let mut clock = Clock::new();
        clock.advance_to(10);
        assert_eq!(clock.now(), 10);
        clock.advance_to(10);
        assert_eq!(clock.now(), 10);
    }

    #[test]
    #[should_panic(expected = "clock cannot move backwards")]
    fn panics_on_backwards_advance() {
        let mut clock = Clock::new();
        clock.advance_to(10);
        clock.advance_to(5);
    }
}
