// src/engine/classify.rs

//! Pure outcome classification for one scenario.
//!
//! The step layer is authoritative once it has sealed a result. Anything
//! that escapes before that point replaces the result with a synthesised
//! failure that keeps the step history recorded so far.

use std::any::Any;

use anyhow::anyhow;
use tracing::warn;

use crate::clock::ExecutionTime;
use crate::results::ScenarioResult;

/// How the step executor call ended.
#[derive(Debug)]
pub enum ScenarioOutcome {
    Completed,
    Errored(anyhow::Error),
    Panicked(String),
}

/// Decide the final result of a scenario from what the step executor left
/// behind and how the call ended.
pub fn classify(mut result: ScenarioResult, outcome: ScenarioOutcome, time: ExecutionTime) -> ScenarioResult {
    let error = match outcome {
        ScenarioOutcome::Completed => {
            if !result.is_sealed() {
                result.seal_from_steps(time);
            }
            return result;
        }
        ScenarioOutcome::Errored(err) => err,
        ScenarioOutcome::Panicked(message) => anyhow!("scenario panicked: {message}"),
    };

    if result.is_sealed() {
        warn!(
            scenario = %result.info().name,
            status = %result.status(),
            error = %format!("{error:#}"),
            "failure escaped after the result was sealed; keeping sealed result"
        );
        return result;
    }

    let info = std::sync::Arc::clone(result.info());
    ScenarioResult::failed_from(info, error, time).with_steps(result.into_steps())
}

/// Best-effort text of a panic payload.
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
