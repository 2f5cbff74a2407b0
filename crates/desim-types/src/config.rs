//! # desim-types::config
//!
//! The typed configuration record a host passes to the `Runner`. Loading
//! this from a file (TOML/YAML) is the CLI's job, not the engine's — the
//! engine only ever sees an already-validated `RunConfig`.

use crate::errors::ConfigError;
use crate::time::SimTime;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Parameters governing one simulation run: warm-up length, the
/// measurement-snap partitioning of the post-warm-up interval, the master
/// RNG seed, and whether the model should actually be run or merely
/// validated.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RunConfig {
    /// Length of the initial interval during which statistics are
    /// discarded. Must be strictly positive.
    #[serde(deserialize_with = "crate::time::deserialize_sim_time")]
    pub warm_up_duration: SimTime,
    /// Length of each measurement window after warm-up. Must be strictly
    /// positive.
    #[serde(deserialize_with = "crate::time::deserialize_sim_time")]
    pub snap_duration: SimTime,
    /// Number of measurement windows. Must be strictly positive.
    pub snap_count: u32,
    /// Seed for the master RNG stream registry.
    pub master_seed: u64,
    /// If false, the run should be validated only; the model must not be
    /// dispatched.
    #[serde(default = "default_run_model")]
    pub run_model: bool,
}

fn default_run_model() -> bool {
    true
}

impl RunConfig {
    /// Loads and validates a `RunConfig` from a TOML or YAML file, chosen by
    /// the file's extension. This is the only place a config file's
    /// extension is inspected; callers never need to branch on format
    /// themselves.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let extension = path.extension().and_then(|ext| ext.to_str());
        let config: RunConfig = match extension {
            Some("toml") => toml::from_str(&content)?,
            Some("yaml") | Some("yml") => serde_yaml::from_str(&content)?,
            other => return Err(ConfigError::UnsupportedExtension(other.map(str::to_string))),
        };
        config.validate()?;
        Ok(config)
    }

    /// The simulated instant at which the run terminates by duration,
    /// i.e. `warm_up_duration + snap_duration * snap_count`.
    pub fn total_duration(&self) -> Result<SimTime, ConfigError> {
        let snap_span = self
            .snap_duration
            .checked_mul(self.snap_count as u128)
            .ok_or(ConfigError::DurationOverflow)?;
        self.warm_up_duration
            .checked_add(snap_span)
            .ok_or(ConfigError::DurationOverflow)
    }

    /// Eagerly validates the configuration. Called once, at `Runner`
    /// construction, rather than lazily on first field access — "fail fast
    /// on bad config" is a stronger contract than deferred failure.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.warm_up_duration == 0 {
            return Err(ConfigError::Invalid {
                field: "warm_up_duration",
                constraint: "> 0",
                value: self.warm_up_duration.to_string(),
            });
        }
        if self.snap_duration == 0 {
            return Err(ConfigError::Invalid {
                field: "snap_duration",
                constraint: "> 0",
                value: self.snap_duration.to_string(),
            });
        }
        if self.snap_count == 0 {
            return Err(ConfigError::Invalid {
                field: "snap_count",
                constraint: "> 0",
                value: self.snap_count.to_string(),
            });
        }
        self.total_duration()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::from_secs;

    fn valid() -> RunConfig {
        RunConfig {
            warm_up_duration: from_secs(1),
            snap_duration: from_secs(10),
            snap_count: 3,
            master_seed: 42,
            run_model: true,
        }
    }

    #[test]
    fn accepts_a_sane_config() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn rejects_zero_warm_up() {
        let mut cfg = valid();
        cfg.warm_up_duration = 0;
        assert!(matches!(cfg.validate(), Err(ConfigError::Invalid { field: "warm_up_duration", .. })));
    }

    #[test]
    fn rejects_zero_snap_count() {
        let mut cfg = valid();
        cfg.snap_count = 0;
        assert!(matches!(cfg.validate(), Err(ConfigError::Invalid { field: "snap_count", .. })));
    }

    #[test]
    fn rejects_overflowing_duration() {
        let mut cfg = valid();
        cfg.snap_duration = SimTime::MAX / 2;
        cfg.snap_count = 10;
        assert!(matches!(cfg.validate(), Err(ConfigError::DurationOverflow)));
    }

    #[test]
    fn total_duration_sums_warm_up_and_snaps() {
        let cfg = valid();
        assert_eq!(cfg.total_duration().unwrap(), from_secs(1) + from_secs(30));
    }

    #[test]
    fn loads_a_valid_toml_config_file() {
        let dir = std::env::temp_dir().join("desim-types-config-test-toml");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("run.toml");
        std::fs::write(
            &path,
            "warm_up_duration = 1000\nsnap_duration = 2000\nsnap_count = 5\nmaster_seed = 9\n",
        )
        .unwrap();

        let config = RunConfig::load_from_path(&path).unwrap();
        assert_eq!(config.warm_up_duration, 1000);
        assert_eq!(config.snap_count, 5);
        assert!(config.run_model);
    }

    #[test]
    fn rejects_an_unsupported_extension() {
        let dir = std::env::temp_dir().join("desim-types-config-test-bad-ext");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("run.ini");
        std::fs::write(&path, "").unwrap();

        assert!(matches!(
            RunConfig::load_from_path(&path),
            Err(ConfigError::UnsupportedExtension(_))
        ));
    }
}
