//! # desim-cli::demo_model
//!
//! A minimal single-server queue, used by the `run` subcommand to exercise
//! the engine end to end against a loaded configuration. Interarrival and
//! service times are drawn from the engine's own named RNG streams, so the
//! same configuration always reproduces the same trajectory.

use desim_engine::prelude::*;

#[derive(Debug, Default)]
pub struct QueueState {
    pub waiting: u32,
    pub busy: bool,
    pub arrivals: u32,
    pub completions: u32,
}

const MEAN_INTERARRIVAL_NS: u128 = 500_000_000;
const MEAN_SERVICE_NS: u128 = 400_000_000;

fn sample_exponential(rng: &mut impl rand::Rng, mean_ns: u128) -> u128 {
    let u: f64 = rng.gen_range(f64::EPSILON..1.0);
    (-(mean_ns as f64) * u.ln()).max(1.0) as u128
}

pub fn schedule_first_arrival(runner: &mut Runner<QueueState>) {
    runner
        .schedule_at(0, 0, |state: &mut QueueState, sched: &mut Scheduler<QueueState>| {
            on_arrival(state, sched);
            Ok(())
        })
        .unwrap();
}

fn on_arrival(state: &mut QueueState, sched: &mut Scheduler<QueueState>) {
    state.arrivals += 1;
    schedule_next_arrival(sched);
    if state.busy {
        state.waiting += 1;
    } else {
        state.busy = true;
        schedule_departure(sched);
    }
}

fn schedule_next_arrival(sched: &mut Scheduler<QueueState>) {
    let delay = sample_exponential(sched.rng("arrivals"), MEAN_INTERARRIVAL_NS);
    sched
        .schedule_after(delay as i128, 0, |state: &mut QueueState, sched| {
            on_arrival(state, sched);
            Ok(())
        })
        .unwrap();
}

fn schedule_departure(sched: &mut Scheduler<QueueState>) {
    let delay = sample_exponential(sched.rng("service"), MEAN_SERVICE_NS);
    sched
        .schedule_after(delay as i128, 1, |state: &mut QueueState, sched| {
            state.completions += 1;
            if state.waiting > 0 {
                state.waiting -= 1;
                schedule_departure(sched);
            } else {
                state.busy = false;
            }
            Ok(())
        })
        .unwrap();
}
