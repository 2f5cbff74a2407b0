//! # desim-cli::commands::validate
//!
//! Implements the `validate` subcommand: loads a run configuration and
//! checks it, without dispatching any events.

use anyhow::Result;
use desim_types::config::RunConfig;
use std::path::PathBuf;

pub fn exec(config_path: PathBuf) -> Result<()> {
    let config = RunConfig::load_from_path(&config_path)?;
    let total_duration = config.total_duration()?;

    println!("config '{}' is valid", config_path.display());
    println!("  warm_up_duration: {}", config.warm_up_duration);
    println!("  snap_duration:    {}", config.snap_duration);
    println!("  snap_count:       {}", config.snap_count);
    println!("  total_duration:   {}", total_duration);
    println!("  master_seed:      {}", config.master_seed);

    Ok(())
}
