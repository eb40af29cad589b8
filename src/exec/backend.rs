// src/exec/backend.rs

//! Pluggable step execution abstraction.
//!
//! The engine never runs step bodies itself. It prepares a
//! [`ScenarioContext`], hands it to a `StepExecutor` along with the
//! scenario's result, and classifies whatever comes back.
//!
//! - [`SequentialStepExecutor`](crate::exec::SequentialStepExecutor) is the
//!   default implementation.
//! - Tests can provide their own `StepExecutor` that, for example, seals the
//!   result and then fails, or panics outright.

use std::future::Future;
use std::pin::Pin;

use crate::exec::context::ScenarioContext;
use crate::results::ScenarioResult;

/// Trait abstracting how the steps of one scenario are executed.
pub trait StepExecutor: Send + Sync {
    /// Run the scenario's steps, recording each into `result`.
    ///
    /// The implementation is free to:
    /// - seal `result` itself (its outcome is then final)
    /// - leave it unsealed (the engine seals it from the recorded steps)
    /// - return an error or panic (the engine synthesises a failure if the
    ///   result was not sealed yet)
    fn execute_scenario<'a>(
        &'a self,
        ctx: &'a ScenarioContext,
        result: &'a mut ScenarioResult,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send + 'a>>;
}
