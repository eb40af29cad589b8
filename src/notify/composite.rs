// src/notify/composite.rs

use std::sync::Arc;

use crate::clock::EventTime;
use crate::metadata::{FeatureInfo, ScenarioInfo, StepInfo};
use crate::notify::ProgressNotifier;
use crate::results::{FeatureResult, ScenarioResult, StepResult, TestRunResult};
use crate::scenario::ScenarioMethod;
use crate::types::ExecutionStatus;

/// Forwards every event to each inner notifier, in registration order.
#[derive(Clone, Default)]
pub struct CompositeNotifier {
    inner: Vec<Arc<dyn ProgressNotifier>>,
}

impl CompositeNotifier {
    pub fn new(inner: Vec<Arc<dyn ProgressNotifier>>) -> Self {
        Self { inner }
    }

    pub fn push(&mut self, notifier: Arc<dyn ProgressNotifier>) {
        self.inner.push(notifier);
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    fn each(&self, f: impl Fn(&dyn ProgressNotifier)) {
        for n in &self.inner {
            f(n.as_ref());
        }
    }
}

impl ProgressNotifier for CompositeNotifier {
    fn on_run_starting(&self, time: EventTime, scenario_count: usize) {
        self.each(|n| n.on_run_starting(time, scenario_count));
    }

    fn on_run_finished(&self, result: &TestRunResult) {
        self.each(|n| n.on_run_finished(result));
    }

    fn on_feature_starting(&self, feature: &FeatureInfo) {
        self.each(|n| n.on_feature_starting(feature));
    }

    fn on_feature_finished(&self, result: &FeatureResult) {
        self.each(|n| n.on_feature_finished(result));
    }

    fn on_scenario_group_starting(&self, feature: &FeatureInfo, method: &ScenarioMethod, case_count: usize) {
        self.each(|n| n.on_scenario_group_starting(feature, method, case_count));
    }

    fn on_scenario_group_finished(
        &self,
        feature: &FeatureInfo,
        method: &ScenarioMethod,
        status: ExecutionStatus,
    ) {
        self.each(|n| n.on_scenario_group_finished(feature, method, status));
    }

    fn on_scenario_starting(&self, scenario: &ScenarioInfo) {
        self.each(|n| n.on_scenario_starting(scenario));
    }

    fn on_scenario_finished(&self, result: &ScenarioResult) {
        self.each(|n| n.on_scenario_finished(result));
    }

    fn on_step_starting(&self, scenario: &ScenarioInfo, step: &StepInfo) {
        self.each(|n| n.on_step_starting(scenario, step));
    }

    fn on_step_finished(&self, scenario: &ScenarioInfo, result: &StepResult) {
        self.each(|n| n.on_step_finished(scenario, result));
    }

    fn on_step_commented(&self, scenario: &ScenarioInfo, step: &StepInfo, comment: &str) {
        self.each(|n| n.on_step_commented(scenario, step, comment));
    }
}
