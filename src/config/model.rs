// src/config/model.rs

use std::time::Duration;

use serde::Deserialize;

use crate::types::LogLevel;

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [runner]
/// max_parallel_scenarios = 8
/// log_level = "debug"
///
/// [container]
/// resolve_timeout = "5s"
/// ```
///
/// All sections are optional and have reasonable defaults. This is the raw,
/// unvalidated form; convert it with `ConfigFile::try_from`.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawConfigFile {
    /// Execution behaviour from `[runner]`.
    #[serde(default)]
    pub runner: RunnerSection,

    /// Dependency container behaviour from `[container]`.
    #[serde(default)]
    pub container: ContainerSection,
}

/// Validated configuration.
///
/// Only constructed through `TryFrom<RawConfigFile>` (or [`ConfigFile::default`]),
/// so durations are already parsed and limits are known to be sane.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    runner: RunnerSection,
    container: ContainerSection,
    resolve_timeout: Duration,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(
        runner: RunnerSection,
        container: ContainerSection,
        resolve_timeout: Duration,
    ) -> Self {
        Self {
            runner,
            container,
            resolve_timeout,
        }
    }

    pub fn runner(&self) -> &RunnerSection {
        &self.runner
    }

    pub fn container(&self) -> &ContainerSection {
        &self.container
    }

    /// Upper bound on how long a shared slot waits for its construction guard.
    pub fn resolve_timeout(&self) -> Duration {
        self.resolve_timeout
    }

    /// Maximum number of scenarios executing at once; `None` is unbounded.
    pub fn max_parallel_scenarios(&self) -> Option<usize> {
        self.runner.max_parallel_scenarios
    }

    pub fn log_level(&self) -> Option<LogLevel> {
        self.runner.log_level
    }
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self::new_unchecked(
            RunnerSection::default(),
            ContainerSection::default(),
            DEFAULT_RESOLVE_TIMEOUT,
        )
    }
}

/// `[runner]` section.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RunnerSection {
    /// Cap on concurrently executing scenarios. Absent means every scenario
    /// is started as soon as its group fans out.
    #[serde(default)]
    pub max_parallel_scenarios: Option<usize>,

    /// Preferred log level; `STEPWISE_LOG` is consulted when absent.
    #[serde(default)]
    pub log_level: Option<LogLevel>,
}

/// `[container]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ContainerSection {
    /// Duration string (e.g. `"5s"`, `"250ms"`) bounding the wait on a shared
    /// slot's construction guard before a circular dependency is reported.
    #[serde(default = "default_resolve_timeout")]
    pub resolve_timeout: String,
}

pub(crate) const DEFAULT_RESOLVE_TIMEOUT: Duration = Duration::from_secs(5);

fn default_resolve_timeout() -> String {
    "5s".to_string()
}

impl Default for ContainerSection {
    fn default() -> Self {
        Self {
            resolve_timeout: default_resolve_timeout(),
        }
    }
}

/// Parse strings like `"250ms"`, `"5s"`, `"2m"` or `"1h"`.
pub fn parse_duration(s: &str) -> Result<Duration, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty duration string".to_string());
    }

    let idx = s
        .chars()
        .position(|c| !c.is_ascii_digit())
        .ok_or_else(|| "duration missing unit suffix".to_string())?;

    let (num_part, unit_part) = s.split_at(idx);
    let value: u64 = num_part
        .parse()
        .map_err(|e| format!("invalid duration number '{}': {}", num_part, e))?;
    let unit = unit_part.trim().to_lowercase();

    match unit.as_str() {
        "ms" => Ok(Duration::from_millis(value)),
        "s" => Ok(Duration::from_secs(value)),
        "m" => Ok(Duration::from_secs(value * 60)),
        "h" => Ok(Duration::from_secs(value * 60 * 60)),
        _ => Err(format!(
            "unsupported duration unit '{}'; expected ms, s, m, or h",
            unit
        )),
    }
}
