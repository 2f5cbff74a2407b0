//! # desim-cli::commands::run
//!
//! Implements the `run` subcommand: loads a configuration, runs the
//! built-in demo queue model against it, and prints a summary.

use crate::args::RunOpts;
use crate::demo_model::{self, QueueState};
use anyhow::Result;
use desim_engine::observer::{ChannelHook, Observation};
use desim_engine::runner::Runner;
use desim_types::config::RunConfig;

pub fn exec(opts: RunOpts) -> Result<()> {
    let mut config = RunConfig::load_from_path(&opts.config)?;
    if let Some(seed) = opts.seed {
        config.master_seed = seed;
    }

    tracing::info!(
        master_seed = config.master_seed,
        warm_up_duration = config.warm_up_duration,
        snap_duration = config.snap_duration,
        snap_count = config.snap_count,
        "loaded run configuration"
    );

    if !config.run_model {
        println!("run_model is false; validating configuration only");
        config.validate()?;
        return Ok(());
    }

    let (hook, observations) = ChannelHook::unbounded();
    let mut runner: Runner<QueueState> = Runner::with_hook(config, Box::new(hook))?;
    demo_model::schedule_first_arrival(&mut runner);

    let mut state = QueueState::default();
    let report = runner.run(&mut state);

    for observation in observations.try_iter() {
        if let Observation::SnapBoundary { at, snap_index } = observation {
            tracing::debug!(at, snap_index, "snap boundary reached");
        }
    }

    println!("outcome: {}", report.outcome.label());
    println!("ended_at: {}", report.ended_at);
    println!("events_dispatched: {}", report.events_dispatched);
    println!("quiescent_early: {}", report.quiescent_early);
    println!("arrivals: {}", state.arrivals);
    println!("completions: {}", state.completions);
    println!("still waiting: {}", state.waiting);

    if let desim_engine::control::RunOutcome::Failed(err) = report.outcome {
        return Err(anyhow::anyhow!("{err}"));
    }

    Ok(())
}
