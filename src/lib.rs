// src/lib.rs

pub mod clock;
pub mod config;
pub mod container;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod metadata;
pub mod notify;
pub mod results;
pub mod runner;
pub mod scenario;
pub mod types;

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::loader::{default_config_path, load_and_validate};
use crate::config::model::ConfigFile;
use crate::logging::init_logging;
use crate::notify::TracingNotifier;

pub use crate::container::{Container, ContainerConfigurator, InstanceScope, LifetimeScope};
pub use crate::errors::StepwiseError;
pub use crate::exec::{ScenarioContext, StepContext, StepExecutor};
pub use crate::notify::ProgressNotifier;
pub use crate::results::{FeatureResult, ScenarioResult, StepResult, TestRunResult};
pub use crate::runner::{Runner, RunnerBuilder};
pub use crate::scenario::{Feature, Fixture, FixtureDescriptor, ScenarioCase, ScenarioMethod, StepError};
pub use crate::types::ExecutionStatus;

/// High-level entry point for a host runner.
///
/// This wires together:
/// - config loading (`Stepwise.toml` by default; built-in defaults if absent)
/// - logging
/// - a runner reporting progress through `tracing`
/// - Ctrl-C handling (cancels scenarios that have not started yet)
pub async fn run(config_path: Option<&Path>, cases: Vec<ScenarioCase>) -> Result<TestRunResult> {
    let path = config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(default_config_path);
    let cfg = if path.exists() {
        load_and_validate(&path)?
    } else {
        debug!(path = %path.display(), "no config file found; using defaults");
        ConfigFile::default()
    };

    if let Err(e) = init_logging(cfg.log_level()) {
        debug!(error = %e, "logging already initialised");
    }

    let runner = Runner::builder()
        .with_config(cfg)
        .with_notifier(Arc::new(TracingNotifier))
        .build()?;

    // Ctrl-C → cooperative cancellation.
    let cancel = CancellationToken::new();
    let ctrl_c = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "failed to listen for Ctrl+C");
                return;
            }
            info!("Ctrl+C received; cancelling scenarios that have not started");
            cancel.cancel();
        })
    };

    let result = runner.execute(cases, cancel).await;
    ctrl_c.abort();

    let result = result?;
    runner.dispose()?;
    Ok(result)
}
