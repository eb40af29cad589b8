// src/exec/sequential.rs

use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::pin::Pin;
use std::sync::Arc;

use anyhow::anyhow;
use futures::FutureExt;
use tracing::{debug, Instrument};

use crate::engine::classify::panic_message;
use crate::exec::backend::StepExecutor;
use crate::exec::context::ScenarioContext;
use crate::metadata::StepInfo;
use crate::results::{ScenarioResult, StepResult};
use crate::scenario::{StepDefinition, StepError};
use crate::types::ExecutionStatus;

/// Runs a scenario's steps in declaration order.
///
/// A bypassed step does not stop the scenario. An ignored, failed or
/// panicking step does; the steps after it are recorded as `NotRun`.
/// Cancellation is checked between steps, never inside one.
#[derive(Debug, Clone, Copy, Default)]
pub struct SequentialStepExecutor;

impl StepExecutor for SequentialStepExecutor {
    fn execute_scenario<'a>(
        &'a self,
        ctx: &'a ScenarioContext,
        result: &'a mut ScenarioResult,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send + 'a>> {
        let span = ctx.span().clone();
        Box::pin(
            async move {
                let steps = ctx.case().method.steps();
                let total = steps.len();
                let mut stopped = false;

                for (index, step) in steps.iter().enumerate() {
                    let info = Arc::new(ctx.metadata().step_info(index + 1, total, step));

                    if stopped || ctx.is_cancelled() {
                        let mut skipped = StepResult::not_run(info);
                        if !stopped {
                            skipped.status_details = Some("run cancelled".to_string());
                        }
                        result.record_step(skipped);
                        continue;
                    }

                    let step_result = run_step(ctx, step, info).await;
                    stopped = matches!(
                        step_result.status,
                        ExecutionStatus::Failed | ExecutionStatus::Ignored
                    );
                    result.record_step(step_result);
                }

                let time = ctx.clock().now() - ctx.started();
                result.seal_from_steps(time);
                Ok(())
            }
            .instrument(span),
        )
    }
}

async fn run_step(
    ctx: &ScenarioContext,
    step: &StepDefinition,
    info: Arc<StepInfo>,
) -> StepResult {
    ctx.notifier().on_step_starting(ctx.info(), &info);

    let start = ctx.clock().now();
    let step_ctx = ctx.step_context(Arc::clone(&info));
    let outcome = AssertUnwindSafe(step.invoke(step_ctx.clone()))
        .catch_unwind()
        .await;
    let time = ctx.clock().now() - start;

    let (status, status_details, exception) = match outcome {
        Ok(Ok(())) => (ExecutionStatus::Passed, None, None),
        Ok(Err(StepError::Bypass(reason))) => (ExecutionStatus::Bypassed, Some(reason), None),
        Ok(Err(StepError::Ignore(reason))) => (ExecutionStatus::Ignored, Some(reason), None),
        Ok(Err(StepError::Failure(err))) => {
            (ExecutionStatus::Failed, Some(format!("{err:#}")), Some(Arc::new(err)))
        }
        Err(panic) => {
            let message = panic_message(panic.as_ref());
            let err = anyhow!("step panicked: {message}");
            (ExecutionStatus::Failed, Some(err.to_string()), Some(Arc::new(err)))
        }
    };

    debug!(step = %info.name, status = %status, "step completed");

    let result = StepResult {
        info,
        status,
        status_details,
        exception,
        time: Some(time),
        comments: step_ctx.comments(),
    };
    ctx.notifier().on_step_finished(ctx.info(), &result);
    result
}
