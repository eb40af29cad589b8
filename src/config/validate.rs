// src/config/validate.rs

use std::time::Duration;

use crate::config::model::{parse_duration, ConfigFile, RawConfigFile};
use crate::errors::{Result, StepwiseError};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::StepwiseError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_runner(&raw)?;
        let resolve_timeout = validate_container(&raw)?;
        Ok(ConfigFile::new_unchecked(
            raw.runner,
            raw.container,
            resolve_timeout,
        ))
    }
}

fn validate_runner(cfg: &RawConfigFile) -> Result<()> {
    if cfg.runner.max_parallel_scenarios == Some(0) {
        return Err(StepwiseError::ConfigError(
            "[runner].max_parallel_scenarios must be >= 1 (got 0)".to_string(),
        ));
    }
    Ok(())
}

fn validate_container(cfg: &RawConfigFile) -> Result<Duration> {
    let timeout = parse_duration(&cfg.container.resolve_timeout).map_err(|e| {
        StepwiseError::ConfigError(format!("invalid [container].resolve_timeout: {e}"))
    })?;

    if timeout.is_zero() {
        return Err(StepwiseError::ConfigError(
            "[container].resolve_timeout must be greater than zero".to_string(),
        ));
    }

    Ok(timeout)
}
