// src/runner.rs

//! Wiring of configuration, container, notifiers and step executor into a
//! ready-to-use [`Runner`].

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::clock::{Clock, MonotonicClock};
use crate::config::ConfigFile;
use crate::container::{Container, ContainerConfigurator, ContainerOptions};
use crate::engine::{Orchestrator, ScenarioExecutor};
use crate::errors::Result;
use crate::exec::{SequentialStepExecutor, StepExecutor};
use crate::metadata::{DeclaredMetadataProvider, MetadataProvider};
use crate::notify::{CompositeNotifier, NoopNotifier, ProgressNotifier};
use crate::results::TestRunResult;
use crate::scenario::ScenarioCase;

type Configure = Box<dyn FnOnce(&mut ContainerConfigurator) + Send>;

/// Builder for [`Runner`]. Every collaborator has a default.
pub struct RunnerBuilder {
    config: ConfigFile,
    container: Option<Container>,
    registrations: Vec<Configure>,
    notifiers: Vec<Arc<dyn ProgressNotifier>>,
    step_executor: Arc<dyn StepExecutor>,
    metadata: Arc<dyn MetadataProvider>,
    clock: Arc<dyn Clock>,
}

impl RunnerBuilder {
    pub fn new() -> Self {
        Self {
            config: ConfigFile::default(),
            container: None,
            registrations: Vec::new(),
            notifiers: Vec::new(),
            step_executor: Arc::new(SequentialStepExecutor),
            metadata: Arc::new(DeclaredMetadataProvider),
            clock: Arc::new(MonotonicClock::new()),
        }
    }

    pub fn with_config(mut self, config: ConfigFile) -> Self {
        self.config = config;
        self
    }

    /// Use an existing root container instead of building one. Registrations
    /// added with [`RunnerBuilder::register`] are then ignored.
    pub fn with_container(mut self, container: Container) -> Self {
        self.container = Some(container);
        self
    }

    /// Add global registrations to the root container the runner builds.
    pub fn register<F>(mut self, configure: F) -> Self
    where
        F: FnOnce(&mut ContainerConfigurator) + Send + 'static,
    {
        self.registrations.push(Box::new(configure));
        self
    }

    /// Add a notifier. Several notifiers receive every event in the order
    /// they were added.
    pub fn with_notifier(mut self, notifier: Arc<dyn ProgressNotifier>) -> Self {
        self.notifiers.push(notifier);
        self
    }

    pub fn with_step_executor(mut self, executor: Arc<dyn StepExecutor>) -> Self {
        self.step_executor = executor;
        self
    }

    pub fn with_metadata(mut self, metadata: Arc<dyn MetadataProvider>) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn build(self) -> Result<Runner> {
        let container = match self.container {
            Some(container) => container,
            None => {
                let registrations = self.registrations;
                Container::new(ContainerOptions::from(&self.config), move |c| {
                    for configure in registrations {
                        configure(c);
                    }
                })?
            }
        };

        let notifier: Arc<dyn ProgressNotifier> = match self.notifiers.len() {
            0 => Arc::new(NoopNotifier),
            1 => Arc::clone(&self.notifiers[0]),
            _ => Arc::new(CompositeNotifier::new(self.notifiers)),
        };

        debug!(
            max_parallel_scenarios = ?self.config.max_parallel_scenarios(),
            resolve_timeout = ?self.config.resolve_timeout(),
            "building runner"
        );

        let scenarios = ScenarioExecutor::new(
            container.clone(),
            self.step_executor,
            notifier,
            self.metadata,
            self.clock,
            self.config.max_parallel_scenarios(),
        );

        Ok(Runner {
            config: self.config,
            container,
            orchestrator: Orchestrator::new(scenarios),
        })
    }
}

impl Default for RunnerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Executes scenario cases against one root container.
pub struct Runner {
    config: ConfigFile,
    container: Container,
    orchestrator: Orchestrator,
}

impl Runner {
    pub fn builder() -> RunnerBuilder {
        RunnerBuilder::new()
    }

    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    /// Root container; every scenario scope is opened under it.
    pub fn container(&self) -> &Container {
        &self.container
    }

    pub async fn execute(&self, cases: Vec<ScenarioCase>, cancel: CancellationToken) -> Result<TestRunResult> {
        self.orchestrator.execute(cases, cancel).await
    }

    /// Dispose the root container. Call once all runs are finished.
    pub fn dispose(&self) -> Result<()> {
        self.container.dispose()
    }
}
