// src/notify/mod.rs

//! Progress notification.
//!
//! The engine reports every lifecycle transition to a [`ProgressNotifier`].
//! Within one scenario the order is fixed: scenario starting, then each
//! step's starting/commented/finished events, then scenario finished.
//! Events of different scenarios may interleave arbitrarily.
//!
//! - [`tracing_notifier`] logs progress through `tracing`.
//! - [`composite`] fans events out to several notifiers.

pub mod composite;
pub mod tracing_notifier;

use crate::clock::EventTime;
use crate::metadata::{FeatureInfo, ScenarioInfo, StepInfo};
use crate::results::{FeatureResult, ScenarioResult, StepResult, TestRunResult};
use crate::scenario::ScenarioMethod;
use crate::types::ExecutionStatus;

pub use composite::CompositeNotifier;
pub use tracing_notifier::TracingNotifier;

/// Observer of run progress. Every method defaults to doing nothing.
///
/// Implementations are called concurrently from many scenario tasks and
/// must not block for long.
pub trait ProgressNotifier: Send + Sync {
    fn on_run_starting(&self, _time: EventTime, _scenario_count: usize) {}

    fn on_run_finished(&self, _result: &TestRunResult) {}

    fn on_feature_starting(&self, _feature: &FeatureInfo) {}

    fn on_feature_finished(&self, _result: &FeatureResult) {}

    fn on_scenario_group_starting(
        &self,
        _feature: &FeatureInfo,
        _method: &ScenarioMethod,
        _case_count: usize,
    ) {
    }

    fn on_scenario_group_finished(
        &self,
        _feature: &FeatureInfo,
        _method: &ScenarioMethod,
        _status: ExecutionStatus,
    ) {
    }

    fn on_scenario_starting(&self, _scenario: &ScenarioInfo) {}

    fn on_scenario_finished(&self, _result: &ScenarioResult) {}

    fn on_step_starting(&self, _scenario: &ScenarioInfo, _step: &StepInfo) {}

    fn on_step_finished(&self, _scenario: &ScenarioInfo, _result: &StepResult) {}

    fn on_step_commented(&self, _scenario: &ScenarioInfo, _step: &StepInfo, _comment: &str) {}
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

impl ProgressNotifier for NoopNotifier {}
