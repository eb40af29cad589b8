// src/exec/context.rs

use std::sync::Arc;

use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::Span;

use crate::clock::{Clock, EventTime};
use crate::container::{Container, Injectable, LifetimeScope};
use crate::errors::Result;
use crate::metadata::{MetadataProvider, ScenarioInfo, StepInfo};
use crate::notify::ProgressNotifier;
use crate::scenario::{Fixture, ScenarioCase};

/// Everything a step executor needs for one scenario case.
///
/// Built by the engine right before the steps run and dropped right after;
/// dropping it closes the scenario's correlation span.
pub struct ScenarioContext {
    info: Arc<ScenarioInfo>,
    case: ScenarioCase,
    fixture: Arc<dyn Fixture>,
    scope: Container,
    notifier: Arc<dyn ProgressNotifier>,
    metadata: Arc<dyn MetadataProvider>,
    clock: Arc<dyn Clock>,
    cancel: CancellationToken,
    started: EventTime,
    span: Span,
}

impl ScenarioContext {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        info: Arc<ScenarioInfo>,
        case: ScenarioCase,
        fixture: Arc<dyn Fixture>,
        scope: Container,
        notifier: Arc<dyn ProgressNotifier>,
        metadata: Arc<dyn MetadataProvider>,
        clock: Arc<dyn Clock>,
        cancel: CancellationToken,
        started: EventTime,
    ) -> Self {
        let span = tracing::info_span!(
            "scenario",
            feature = %info.feature.name,
            scenario = %info.name,
            correlation_id = info.correlation_id.as_deref().unwrap_or(""),
        );
        Self {
            info,
            case,
            fixture,
            scope,
            notifier,
            metadata,
            clock,
            cancel,
            started,
            span,
        }
    }

    pub fn info(&self) -> &Arc<ScenarioInfo> {
        &self.info
    }

    pub fn case(&self) -> &ScenarioCase {
        &self.case
    }

    pub fn fixture(&self) -> &Arc<dyn Fixture> {
        &self.fixture
    }

    /// The scenario-level container scope.
    pub fn scope(&self) -> &Container {
        &self.scope
    }

    pub fn notifier(&self) -> &Arc<dyn ProgressNotifier> {
        &self.notifier
    }

    pub fn metadata(&self) -> &Arc<dyn MetadataProvider> {
        &self.metadata
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    pub fn correlation_id(&self) -> Option<&str> {
        self.info.correlation_id.as_deref()
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// When the scenario started, as reported to the notifier.
    pub fn started(&self) -> EventTime {
        self.started
    }

    /// Span every event of this scenario should be recorded under.
    pub fn span(&self) -> &Span {
        &self.span
    }

    /// Context handed to one step body.
    pub fn step_context(&self, step: Arc<StepInfo>) -> StepContext {
        StepContext {
            scenario: Arc::clone(&self.info),
            step,
            fixture: Arc::clone(&self.fixture),
            scope: self.scope.clone(),
            notifier: Arc::clone(&self.notifier),
            cancel: self.cancel.clone(),
            comments: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

/// Owned context passed to a step body.
///
/// Cheap to clone; clones share the comment buffer.
#[derive(Clone)]
pub struct StepContext {
    scenario: Arc<ScenarioInfo>,
    step: Arc<StepInfo>,
    fixture: Arc<dyn Fixture>,
    scope: Container,
    notifier: Arc<dyn ProgressNotifier>,
    cancel: CancellationToken,
    comments: Arc<Mutex<Vec<String>>>,
}

impl StepContext {
    pub fn scenario(&self) -> &ScenarioInfo {
        &self.scenario
    }

    pub fn step(&self) -> &StepInfo {
        &self.step
    }

    /// Attach a comment to the running step and report it immediately.
    pub fn comment(&self, text: impl Into<String>) {
        let text = text.into();
        self.notifier
            .on_step_commented(&self.scenario, &self.step, &text);
        self.comments.lock().push(text);
    }

    /// Value of a bound scenario argument.
    pub fn argument(&self, name: &str) -> Option<&str> {
        self.scenario
            .arguments
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    /// The scenario's fixture, if it is a `T`.
    pub fn fixture<T: Fixture>(&self) -> Option<&T> {
        self.fixture.downcast_ref::<T>()
    }

    pub fn resolve<T>(&self) -> Result<Arc<T>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.scope.resolve::<T>()
    }

    pub fn create<T: Injectable>(&self) -> Result<Arc<T>> {
        self.scope.create::<T>()
    }

    pub fn container(&self) -> &Container {
        &self.scope
    }

    /// Open a `Local` scope under the scenario scope. The caller disposes it.
    pub fn begin_local_scope(&self) -> Result<Container> {
        self.scope.begin_scope(LifetimeScope::Local)
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Comments recorded so far by this step.
    pub fn comments(&self) -> Vec<String> {
        self.comments.lock().clone()
    }
}
