use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};

use stepwise::exec::{ScenarioContext, StepExecutor};
use stepwise::metadata::StepInfo;
use stepwise::results::{ScenarioResult, StepResult};
use stepwise::types::ExecutionStatus;

/// What the scripted executor does with every scenario it is given.
#[derive(Debug, Clone)]
pub enum Script {
    /// Seal the result with `status`, then return normally.
    Seal(ExecutionStatus),
    /// Seal the result with `status`, then return an error anyway.
    SealThenFail(ExecutionStatus, &'static str),
    /// Seal the result with `status`, then panic.
    SealThenPanic(ExecutionStatus, &'static str),
    /// Record one passed step, then return an error without sealing.
    FailBeforeSeal(&'static str),
    /// Panic without touching the result.
    Panic(&'static str),
    /// Record one step with `status` and leave the result unsealed.
    LeaveUnsealed(ExecutionStatus),
}

/// `StepExecutor` that ignores the declared steps and follows a script.
#[derive(Debug, Clone)]
pub struct ScriptedStepExecutor {
    script: Script,
}

impl ScriptedStepExecutor {
    pub fn new(script: Script) -> Self {
        Self { script }
    }
}

fn synthetic_step(status: ExecutionStatus) -> StepResult {
    let mut step = StepResult::not_run(Arc::new(StepInfo::new(1, 1, "scripted step")));
    step.status = status;
    step
}

impl StepExecutor for ScriptedStepExecutor {
    fn execute_scenario<'a>(
        &'a self,
        ctx: &'a ScenarioContext,
        result: &'a mut ScenarioResult,
    ) -> BoxFuture<'a, anyhow::Result<()>> {
        async move {
            let time = ctx.clock().now() - ctx.started();
            match self.script.clone() {
                Script::Seal(status) => {
                    result.seal(status, None, time);
                    Ok(())
                }
                Script::SealThenFail(status, message) => {
                    result.seal(status, None, time);
                    Err(anyhow::anyhow!(message))
                }
                Script::SealThenPanic(status, message) => {
                    result.seal(status, None, time);
                    panic!("{message}");
                }
                Script::FailBeforeSeal(message) => {
                    result.record_step(synthetic_step(ExecutionStatus::Passed));
                    Err(anyhow::anyhow!(message))
                }
                Script::Panic(message) => panic!("{message}"),
                Script::LeaveUnsealed(status) => {
                    result.record_step(synthetic_step(status));
                    Ok(())
                }
            }
        }
        .boxed()
    }
}
