// src/engine/scenario_executor.rs

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::clock::{Clock, EventTime};
use crate::container::{Container, LifetimeScope};
use crate::engine::classify::{classify, panic_message, ScenarioOutcome};
use crate::errors::StepwiseError;
use crate::exec::{ScenarioContext, StepExecutor};
use crate::metadata::{FeatureInfo, MetadataProvider, ScenarioInfo};
use crate::notify::ProgressNotifier;
use crate::results::ScenarioResult;
use crate::scenario::{Fixture, ScenarioCase};

/// Detail recorded on cases that never started because the run was cancelled.
pub const CANCELLED_DETAIL: &str = "run cancelled";

/// Runs one scenario case end to end: scope, fixture, steps, classification
/// and teardown.
pub struct ScenarioExecutor {
    container: Container,
    step_executor: Arc<dyn StepExecutor>,
    notifier: Arc<dyn ProgressNotifier>,
    metadata: Arc<dyn MetadataProvider>,
    clock: Arc<dyn Clock>,
    limiter: Option<Arc<Semaphore>>,
}

impl ScenarioExecutor {
    pub fn new(
        container: Container,
        step_executor: Arc<dyn StepExecutor>,
        notifier: Arc<dyn ProgressNotifier>,
        metadata: Arc<dyn MetadataProvider>,
        clock: Arc<dyn Clock>,
        max_parallel: Option<usize>,
    ) -> Self {
        Self {
            container,
            step_executor,
            notifier,
            metadata,
            clock,
            limiter: max_parallel.map(|n| Arc::new(Semaphore::new(n))),
        }
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

    pub fn container(&self) -> &Container {
        &self.container
    }

    /// Execute `case`. Never fails: every problem ends up in the result.
    ///
    /// A case that has not started when `cancel` fires comes back `NotRun`
    /// without emitting any scenario events.
    pub async fn execute(
        &self,
        feature: &Arc<FeatureInfo>,
        case: ScenarioCase,
        cancel: &CancellationToken,
    ) -> ScenarioResult {
        let info = Arc::new(self.metadata.scenario_info(feature, &case));
        if cancel.is_cancelled() {
            return ScenarioResult::not_run(info, CANCELLED_DETAIL);
        }

        let _permit = match &self.limiter {
            Some(limiter) => {
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => return ScenarioResult::not_run(info, CANCELLED_DETAIL),
                    permit = Arc::clone(limiter).acquire_owned() => match permit {
                        Ok(permit) => Some(permit),
                        Err(_) => return ScenarioResult::not_run(info, "scenario limiter closed"),
                    },
                }
            }
            None => None,
        };
        if cancel.is_cancelled() {
            return ScenarioResult::not_run(info, CANCELLED_DETAIL);
        }

        let started = self.clock.now();
        self.notifier.on_scenario_starting(&info);
        debug!(scenario = %info.name, "scenario started");

        if case.requires_runtime_arguments {
            let err = StepwiseError::Unsupported(format!(
                "scenario '{}' requires arguments resolved at execution time",
                info.name
            ));
            return self.finish_early(info, err.into(), started);
        }

        let scope = match self.container.begin_scope(LifetimeScope::Scenario) {
            Ok(scope) => scope,
            Err(err) => return self.finish_early(info, err.into(), started),
        };

        let fixture = match case.fixture.create(&scope.resolver()) {
            Ok(fixture) => fixture,
            Err(err) => {
                let err = err.context(format!("failed to create fixture '{}'", case.fixture_key()));
                let result = self.finish_early(info, err, started);
                dispose_scope(&scope, &result);
                return result;
            }
        };

        let ctx = ScenarioContext::new(
            Arc::clone(&info),
            case,
            Arc::clone(&fixture),
            scope.clone(),
            Arc::clone(&self.notifier),
            Arc::clone(&self.metadata),
            Arc::clone(&self.clock),
            cancel.clone(),
            started,
        );

        let mut result = ScenarioResult::new(Arc::clone(&info));
        let outcome = AssertUnwindSafe(self.step_executor.execute_scenario(&ctx, &mut result))
            .catch_unwind()
            .await;
        let outcome = match outcome {
            Ok(Ok(())) => ScenarioOutcome::Completed,
            Ok(Err(err)) => ScenarioOutcome::Errored(err),
            Err(payload) => ScenarioOutcome::Panicked(panic_message(payload.as_ref())),
        };

        let mut result = classify(result, outcome, self.clock.now() - started);

        // Teardown order: correlation context, fixture, notification, scope.
        drop(ctx);
        if let Err(err) = dispose_fixture(fixture.as_ref()) {
            warn!(scenario = %info.name, error = %format!("{err:#}"), "fixture disposal failed");
            result.record_teardown_failure(err);
        }
        self.notifier.on_scenario_finished(&result);
        dispose_scope(&scope, &result);

        result
    }

    /// Failure before any step ran: seal as failed and report it.
    fn finish_early(&self, info: Arc<ScenarioInfo>, err: anyhow::Error, started: EventTime) -> ScenarioResult {
        let result = ScenarioResult::failed_from(info, err, self.clock.now() - started);
        self.notifier.on_scenario_finished(&result);
        result
    }
}

fn dispose_fixture(fixture: &dyn Fixture) -> anyhow::Result<()> {
    match std::panic::catch_unwind(AssertUnwindSafe(|| fixture.dispose())) {
        Ok(outcome) => outcome,
        Err(payload) => Err(anyhow::anyhow!(
            "fixture disposal panicked: {}",
            panic_message(payload.as_ref())
        )),
    }
}

/// Scope teardown happens after the result was reported, so failures are
/// only logged.
fn dispose_scope(scope: &Container, result: &ScenarioResult) {
    if let Err(err) = scope.dispose() {
        warn!(scenario = %result.info().name, error = %err, "scenario scope disposal failed");
    }
}
