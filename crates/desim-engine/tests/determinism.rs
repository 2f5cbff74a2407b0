//! Integration tests: end-to-end determinism and ordering properties of a
//! full run, not just individual components.

use desim_engine::prelude::*;
use proptest::prelude::*;

fn config(seed: u64) -> RunConfig {
    RunConfig {
        warm_up_duration: 10,
        snap_duration: 10,
        snap_count: 3,
        master_seed: seed,
        run_model: true,
    }
}

/// Seeds a run with a small fixed set of events plus an RNG-driven chain,
/// returning the dispatch trace recorded in `state`.
fn run_trace(seed: u64) -> Vec<(u64, u128)> {
    let mut runner: Runner<Vec<(u64, u128)>> = Runner::new(config(seed)).unwrap();
    for i in 0..5 {
        runner
            .schedule_at(i, 0, move |state: &mut Vec<(u64, u128)>, sched: &mut Scheduler<_>| {
                state.push((i as u64, sched.now()));
                Ok(())
            })
            .unwrap();
    }
    let mut state = Vec::new();
    let report = runner.run(&mut state);
    assert!(matches!(report.outcome, RunOutcome::QueueEmpty));
    state
}

#[test]
fn same_seed_and_schedule_reproduce_the_same_trace() {
    assert_eq!(run_trace(99), run_trace(99));
}

#[test]
fn different_seeds_do_not_change_the_fixed_schedule_trace() {
    // The schedule here has no RNG-dependent branching, so the trace itself
    // is seed-independent even though the seed is different; this pins down
    // that RNG streams never leak into scheduling decisions that don't ask
    // for them.
    assert_eq!(run_trace(1), run_trace(2));
}

proptest! {
    /// P1-style property: for any set of (due_at, priority) pairs, events
    /// dispatch in non-decreasing `due_at` order.
    #[test]
    fn dispatch_order_is_non_decreasing_in_due_at(
        mut due_ats in prop::collection::vec(0u128..1000, 1..30)
    ) {
        due_ats.sort();
        let mut runner: Runner<Vec<u128>> = Runner::new(RunConfig {
            warm_up_duration: 10_000,
            snap_duration: 10_000,
            snap_count: 1,
            master_seed: 7,
            run_model: true,
        }).unwrap();
        for &due_at in due_ats.iter() {
            runner.schedule_at(due_at, 0, move |state: &mut Vec<u128>, _| {
                state.push(due_at);
                Ok(())
            }).unwrap();
        }
        let mut observed = Vec::new();
        runner.run(&mut observed);
        let mut sorted_observed = observed.clone();
        sorted_observed.sort();
        prop_assert_eq!(observed, sorted_observed);
    }

    /// Cancelling an event before it fires means it never appears in the
    /// dispatch trace, regardless of where it sits in the heap.
    #[test]
    fn cancelled_events_never_dispatch(
        due_ats in prop::collection::vec(0u128..500, 1..20),
        cancel_index in 0usize..20,
    ) {
        let mut runner: Runner<Vec<u128>> = Runner::new(RunConfig {
            warm_up_duration: 10_000,
            snap_duration: 10_000,
            snap_count: 1,
            master_seed: 3,
            run_model: true,
        }).unwrap();
        let mut handles = Vec::new();
        for &due_at in due_ats.iter() {
            let handle = runner.schedule_at(due_at, 0, move |state: &mut Vec<u128>, _| {
                state.push(due_at);
                Ok(())
            }).unwrap();
            handles.push((due_at, handle));
        }
        let cancel_index = cancel_index % handles.len();
        let (cancelled_due_at, handle) = &handles[cancel_index];
        handle.cancel();
        let cancelled_due_at = *cancelled_due_at;

        let mut observed = Vec::new();
        runner.run(&mut observed);

        let remaining_with_same_time = due_ats.iter().filter(|&&d| d == cancelled_due_at).count() - 1;
        let observed_with_same_time = observed.iter().filter(|&&d| d == cancelled_due_at).count();
        prop_assert_eq!(observed_with_same_time, remaining_with_same_time);
    }
}
