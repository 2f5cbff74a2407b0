//! # desim-cli
//!
//! The command-line entry point for running and validating desim
//! simulation configurations.

#![forbid(unsafe_code)]

use crate::args::{Cli, Command};
use anyhow::Result;
use clap::Parser;

mod args;
mod commands;
mod demo_model;
mod logging;

fn main() -> Result<()> {
    let args = Cli::parse();
    logging::init(args.log, args.log_file.as_deref());

    match args.command {
        Command::Run(opts) => commands::run::exec(opts),
        Command::Validate { config } => commands::validate::exec(config),
    }
}
