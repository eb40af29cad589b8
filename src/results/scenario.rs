// src/results/scenario.rs

use std::sync::Arc;

use tracing::warn;

use crate::clock::ExecutionTime;
use crate::metadata::{ScenarioInfo, StepInfo};
use crate::types::ExecutionStatus;

/// Outcome of one step.
#[derive(Debug, Clone)]
pub struct StepResult {
    pub info: Arc<StepInfo>,
    pub status: ExecutionStatus,
    pub status_details: Option<String>,
    pub exception: Option<Arc<anyhow::Error>>,
    pub time: Option<ExecutionTime>,
    pub comments: Vec<String>,
}

impl StepResult {
    /// A step that never started.
    pub fn not_run(info: Arc<StepInfo>) -> Self {
        Self {
            info,
            status: ExecutionStatus::NotRun,
            status_details: None,
            exception: None,
            time: None,
            comments: Vec::new(),
        }
    }
}

/// Outcome of one scenario case.
///
/// Starts as `NotRun` and is sealed exactly once, either by the step layer or
/// by the engine when a failure escapes before the step layer sealed it.
#[derive(Debug, Clone)]
pub struct ScenarioResult {
    info: Arc<ScenarioInfo>,
    status: ExecutionStatus,
    status_details: Option<String>,
    exception: Option<Arc<anyhow::Error>>,
    steps: Vec<StepResult>,
    time: Option<ExecutionTime>,
    sealed: bool,
}

impl ScenarioResult {
    pub fn new(info: Arc<ScenarioInfo>) -> Self {
        Self {
            info,
            status: ExecutionStatus::NotRun,
            status_details: None,
            exception: None,
            steps: Vec::new(),
            time: None,
            sealed: false,
        }
    }

    /// Synthesise a sealed `Failed` result, recording `error` as both the
    /// exception and the status detail.
    pub fn failed_from(info: Arc<ScenarioInfo>, error: anyhow::Error, time: ExecutionTime) -> Self {
        let mut result = Self::new(info);
        result.status = ExecutionStatus::Failed;
        result.status_details = Some(format!("{error:#}"));
        result.exception = Some(Arc::new(error));
        result.time = Some(time);
        result.sealed = true;
        result
    }

    /// An unsealed `NotRun` result carrying an explanation.
    pub fn not_run(info: Arc<ScenarioInfo>, details: impl Into<String>) -> Self {
        let mut result = Self::new(info);
        result.status_details = Some(details.into());
        result
    }

    pub fn info(&self) -> &Arc<ScenarioInfo> {
        &self.info
    }

    pub fn status(&self) -> ExecutionStatus {
        self.status
    }

    pub fn status_details(&self) -> Option<&str> {
        self.status_details.as_deref()
    }

    pub fn exception(&self) -> Option<&anyhow::Error> {
        self.exception.as_deref()
    }

    pub fn steps(&self) -> &[StepResult] {
        &self.steps
    }

    pub fn time(&self) -> Option<ExecutionTime> {
        self.time
    }

    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    /// Append a finished step. Ignored once the result is sealed.
    pub fn record_step(&mut self, step: StepResult) {
        if self.sealed {
            warn!(
                scenario = %self.info.name,
                step = %step.info.name,
                "step recorded after scenario result was sealed; ignoring"
            );
            return;
        }
        self.steps.push(step);
    }

    /// Seal with an explicit status. Returns `false` (and changes nothing) if
    /// the result was already sealed.
    pub fn seal(
        &mut self,
        status: ExecutionStatus,
        details: Option<String>,
        time: ExecutionTime,
    ) -> bool {
        if self.sealed {
            warn!(
                scenario = %self.info.name,
                current = %self.status,
                requested = %status,
                "scenario result already sealed; keeping the first outcome"
            );
            return false;
        }
        self.status = status;
        self.status_details = details;
        self.time = Some(time);
        self.sealed = true;
        true
    }

    /// Seal with the aggregate of the recorded step statuses. A scenario
    /// without steps stays `NotRun`.
    pub fn seal_from_steps(&mut self, time: ExecutionTime) -> bool {
        if self.sealed {
            warn!(
                scenario = %self.info.name,
                current = %self.status,
                "scenario result already sealed; not re-aggregating steps"
            );
            return false;
        }

        let status = ExecutionStatus::aggregate(self.steps.iter().map(|s| s.status));

        let details: Vec<String> = self
            .steps
            .iter()
            .filter_map(|s| {
                s.status_details
                    .as_ref()
                    .map(|d| format!("Step {}: {}", s.info.number, d))
            })
            .collect();
        let details = if details.is_empty() {
            None
        } else {
            Some(details.join("\n"))
        };

        self.exception = self
            .steps
            .iter()
            .find(|s| s.status == ExecutionStatus::Failed)
            .and_then(|s| s.exception.clone());

        self.seal(status, details, time)
    }

    /// Carry step history over from another result (used when a failure
    /// result is synthesised after some steps already ran).
    pub fn with_steps(mut self, steps: Vec<StepResult>) -> Self {
        self.steps = steps;
        self
    }

    pub(crate) fn into_steps(self) -> Vec<StepResult> {
        self.steps
    }

    /// A teardown failure (fixture disposal) happened after the outcome was
    /// decided. It only ever makes the result more severe.
    pub(crate) fn record_teardown_failure(&mut self, error: anyhow::Error) {
        let detail = format!("teardown failed: {error:#}");
        self.status_details = Some(match self.status_details.take() {
            Some(existing) => format!("{existing}\n{detail}"),
            None => detail,
        });
        if self.status != ExecutionStatus::Failed {
            self.status = ExecutionStatus::Failed;
            self.exception = Some(Arc::new(error));
        }
        self.sealed = true;
    }
}
