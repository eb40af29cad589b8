// src/notify/tracing_notifier.rs

//! Progress reporting through `tracing` events.
//!
//! Run and feature boundaries log at `info`, scenarios at `info` when they
//! finish and `debug` when they start, steps at `debug`/`trace`. Failed
//! scenarios are logged at `warn` with their status detail.

use tracing::{debug, info, trace, warn};

use crate::clock::EventTime;
use crate::metadata::{FeatureInfo, ScenarioInfo, StepInfo};
use crate::notify::ProgressNotifier;
use crate::results::{FeatureResult, ScenarioResult, StepResult, TestRunResult};
use crate::scenario::ScenarioMethod;
use crate::types::ExecutionStatus;

#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl ProgressNotifier for TracingNotifier {
    fn on_run_starting(&self, time: EventTime, scenario_count: usize) {
        info!(scenarios = scenario_count, at = %time.at(), "run starting");
    }

    fn on_run_finished(&self, result: &TestRunResult) {
        let counts = result.counts();
        info!(
            status = %result.status(),
            passed = counts.passed,
            bypassed = counts.bypassed,
            failed = counts.failed,
            ignored = counts.ignored,
            not_run = counts.not_run,
            duration = ?result.duration(),
            "run finished"
        );
    }

    fn on_feature_starting(&self, feature: &FeatureInfo) {
        info!(feature = %feature.name, "feature starting");
    }

    fn on_feature_finished(&self, result: &FeatureResult) {
        info!(
            feature = %result.info().name,
            status = %result.status(),
            scenarios = result.scenarios().len(),
            "feature finished"
        );
    }

    fn on_scenario_group_starting(&self, feature: &FeatureInfo, method: &ScenarioMethod, case_count: usize) {
        debug!(feature = %feature.name, scenario = %method.name(), cases = case_count, "scenario group starting");
    }

    fn on_scenario_group_finished(
        &self,
        feature: &FeatureInfo,
        method: &ScenarioMethod,
        status: ExecutionStatus,
    ) {
        debug!(feature = %feature.name, scenario = %method.name(), status = %status, "scenario group finished");
    }

    fn on_scenario_starting(&self, scenario: &ScenarioInfo) {
        debug!(
            feature = %scenario.feature.name,
            scenario = %scenario.name,
            correlation_id = ?scenario.correlation_id,
            "scenario starting"
        );
    }

    fn on_scenario_finished(&self, result: &ScenarioResult) {
        let info = result.info();
        if result.status() == ExecutionStatus::Failed {
            warn!(
                feature = %info.feature.name,
                scenario = %info.name,
                details = result.status_details().unwrap_or(""),
                "scenario failed"
            );
        } else {
            info!(
                feature = %info.feature.name,
                scenario = %info.name,
                status = %result.status(),
                "scenario finished"
            );
        }
    }

    fn on_step_starting(&self, scenario: &ScenarioInfo, step: &StepInfo) {
        trace!(scenario = %scenario.name, step = %step.name, number = step.number, total = step.total, "step starting");
    }

    fn on_step_finished(&self, scenario: &ScenarioInfo, result: &StepResult) {
        debug!(
            scenario = %scenario.name,
            step = %result.info.name,
            status = %result.status,
            details = ?result.status_details,
            "step finished"
        );
    }

    fn on_step_commented(&self, scenario: &ScenarioInfo, step: &StepInfo, comment: &str) {
        info!(scenario = %scenario.name, step = %step.name, "{comment}");
    }
}
