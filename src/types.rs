// src/types.rs

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// Outcome of a step, scenario, feature or whole run.
///
/// `NotRun` is the initial state of anything that has not executed yet; the
/// other four are terminal. Aggregation picks the most severe status present:
/// `Failed > Ignored > Bypassed > Passed > NotRun`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ExecutionStatus {
    #[default]
    NotRun,
    Passed,
    Bypassed,
    Failed,
    Ignored,
}

impl ExecutionStatus {
    /// Rank used for aggregation; higher is more severe.
    pub fn severity(self) -> u8 {
        match self {
            ExecutionStatus::NotRun => 0,
            ExecutionStatus::Passed => 1,
            ExecutionStatus::Bypassed => 2,
            ExecutionStatus::Ignored => 3,
            ExecutionStatus::Failed => 4,
        }
    }

    /// The more severe of `self` and `other`.
    pub fn max_severity(self, other: ExecutionStatus) -> ExecutionStatus {
        if other.severity() > self.severity() {
            other
        } else {
            self
        }
    }

    /// Aggregate child statuses. An empty collection is `NotRun`.
    pub fn aggregate<I>(statuses: I) -> ExecutionStatus
    where
        I: IntoIterator<Item = ExecutionStatus>,
    {
        statuses
            .into_iter()
            .fold(ExecutionStatus::NotRun, ExecutionStatus::max_severity)
    }

    pub fn is_terminal(self) -> bool {
        self != ExecutionStatus::NotRun
    }
}

impl fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ExecutionStatus::NotRun => "notrun",
            ExecutionStatus::Passed => "passed",
            ExecutionStatus::Bypassed => "bypassed",
            ExecutionStatus::Failed => "failed",
            ExecutionStatus::Ignored => "ignored",
        };
        f.write_str(s)
    }
}

impl FromStr for ExecutionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "notrun" | "not_run" => Ok(ExecutionStatus::NotRun),
            "passed" => Ok(ExecutionStatus::Passed),
            "bypassed" => Ok(ExecutionStatus::Bypassed),
            "failed" => Ok(ExecutionStatus::Failed),
            "ignored" => Ok(ExecutionStatus::Ignored),
            other => Err(format!("invalid execution status: {other}")),
        }
    }
}

/// Log level accepted in `[runner].log_level` and by [`crate::logging::init_logging`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "error" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            other => Err(format!(
                "invalid log level: {other} (expected error, warn, info, debug or trace)"
            )),
        }
    }
}

impl From<LogLevel> for tracing::Level {
    fn from(lvl: LogLevel) -> Self {
        match lvl {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}
