//! # desim-cli::args
//!
//! Command-line argument structure, via `clap`'s derive macros.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(long, global = true, default_value = "human")]
    pub log: LogFormat,

    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a simulation from a run configuration file.
    Run(RunOpts),
    /// Validate a run configuration file without dispatching any events.
    Validate {
        #[arg(value_name = "CONFIG_PATH")]
        config: PathBuf,
    },
}

#[derive(clap::Args, Debug)]
pub struct RunOpts {
    /// Path to the run configuration file (TOML or YAML).
    #[arg(short, long)]
    pub config: PathBuf,

    /// Override the master RNG seed from the configuration file.
    #[arg(long)]
    pub seed: Option<u64>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Human,
    Json,
}
