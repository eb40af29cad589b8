use std::sync::Mutex;

use stepwise::clock::EventTime;
use stepwise::metadata::{FeatureInfo, ScenarioInfo, StepInfo};
use stepwise::notify::ProgressNotifier;
use stepwise::results::{FeatureResult, ScenarioResult, StepResult, TestRunResult};
use stepwise::scenario::ScenarioMethod;
use stepwise::types::ExecutionStatus;

/// One notification, flattened to names and statuses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    RunStarting { scenarios: usize },
    RunFinished { status: ExecutionStatus },
    FeatureStarting { feature: String },
    FeatureFinished { feature: String, status: ExecutionStatus },
    GroupStarting { feature: String, method: String, cases: usize },
    GroupFinished { feature: String, method: String, status: ExecutionStatus },
    ScenarioStarting { scenario: String },
    ScenarioFinished { scenario: String, status: ExecutionStatus },
    StepStarting { scenario: String, step: usize },
    StepFinished { scenario: String, step: usize, status: ExecutionStatus },
    StepCommented { scenario: String, step: usize, comment: String },
}

impl Event {
    /// Scenario this event belongs to, if it is a scenario or step event.
    pub fn scenario(&self) -> Option<&str> {
        match self {
            Event::ScenarioStarting { scenario }
            | Event::ScenarioFinished { scenario, .. }
            | Event::StepStarting { scenario, .. }
            | Event::StepFinished { scenario, .. }
            | Event::StepCommented { scenario, .. } => Some(scenario),
            _ => None,
        }
    }
}

/// Notifier that records every event in arrival order.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    events: Mutex<Vec<Event>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    /// Events of one scenario, in the order they arrived.
    pub fn scenario_events(&self, scenario: &str) -> Vec<Event> {
        self.events()
            .into_iter()
            .filter(|e| e.scenario() == Some(scenario))
            .collect()
    }

    pub fn count(&self, pred: impl Fn(&Event) -> bool) -> usize {
        self.events().iter().filter(|e| pred(e)).count()
    }

    fn push(&self, event: Event) {
        self.events.lock().unwrap().push(event);
    }
}

impl ProgressNotifier for RecordingNotifier {
    fn on_run_starting(&self, _time: EventTime, scenario_count: usize) {
        self.push(Event::RunStarting {
            scenarios: scenario_count,
        });
    }

    fn on_run_finished(&self, result: &TestRunResult) {
        self.push(Event::RunFinished {
            status: result.status(),
        });
    }

    fn on_feature_starting(&self, feature: &FeatureInfo) {
        self.push(Event::FeatureStarting {
            feature: feature.name.clone(),
        });
    }

    fn on_feature_finished(&self, result: &FeatureResult) {
        self.push(Event::FeatureFinished {
            feature: result.info().name.clone(),
            status: result.status(),
        });
    }

    fn on_scenario_group_starting(&self, feature: &FeatureInfo, method: &ScenarioMethod, case_count: usize) {
        self.push(Event::GroupStarting {
            feature: feature.name.clone(),
            method: method.key().to_string(),
            cases: case_count,
        });
    }

    fn on_scenario_group_finished(&self, feature: &FeatureInfo, method: &ScenarioMethod, status: ExecutionStatus) {
        self.push(Event::GroupFinished {
            feature: feature.name.clone(),
            method: method.key().to_string(),
            status,
        });
    }

    fn on_scenario_starting(&self, scenario: &ScenarioInfo) {
        self.push(Event::ScenarioStarting {
            scenario: scenario.name.clone(),
        });
    }

    fn on_scenario_finished(&self, result: &ScenarioResult) {
        self.push(Event::ScenarioFinished {
            scenario: result.info().name.clone(),
            status: result.status(),
        });
    }

    fn on_step_starting(&self, scenario: &ScenarioInfo, step: &StepInfo) {
        self.push(Event::StepStarting {
            scenario: scenario.name.clone(),
            step: step.number,
        });
    }

    fn on_step_finished(&self, scenario: &ScenarioInfo, result: &StepResult) {
        self.push(Event::StepFinished {
            scenario: scenario.name.clone(),
            step: result.info.number,
            status: result.status,
        });
    }

    fn on_step_commented(&self, scenario: &ScenarioInfo, step: &StepInfo, comment: &str) {
        self.push(Event::StepCommented {
            scenario: scenario.name.clone(),
            step: step.number,
            comment: comment.to_string(),
        });
    }
}
