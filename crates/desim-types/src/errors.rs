//! # desim-types::errors
//!
//! Error types shared across the workspace. Using `thiserror` keeps these
//! descriptive without hand-rolling `Display` impls.

use crate::time::SimTime;
use thiserror::Error;

/// An error in simulation-time arithmetic.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeError {
    #[error("simulation time overflow: {base} + {offset}")]
    Overflow { base: SimTime, offset: SimTime },
    #[error("simulation time underflow: {base} - {offset}")]
    Underflow { base: SimTime, offset: SimTime },
}

/// An error constructing or loading a `RunConfig`.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error reading config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("unsupported config file extension: {0:?}")]
    UnsupportedExtension(Option<String>),
    #[error("invalid config: {field} must be {constraint}, got {value}")]
    Invalid {
        field: &'static str,
        constraint: &'static str,
        value: String,
    },
    #[error("invalid config: snap_duration * snap_count + warm_up_duration overflows SimTime")]
    DurationOverflow,
}
