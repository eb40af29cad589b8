// src/results/aggregate.rs

use std::ops::AddAssign;
use std::sync::Arc;
use std::time::Duration;

use crate::clock::ExecutionTime;
use crate::metadata::FeatureInfo;
use crate::results::scenario::ScenarioResult;
use crate::types::ExecutionStatus;

/// Number of scenarios per status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatusCounts {
    pub passed: usize,
    pub bypassed: usize,
    pub failed: usize,
    pub ignored: usize,
    pub not_run: usize,
}

impl StatusCounts {
    pub fn from_statuses<I>(statuses: I) -> Self
    where
        I: IntoIterator<Item = ExecutionStatus>,
    {
        let mut counts = Self::default();
        for status in statuses {
            counts.add(status);
        }
        counts
    }

    pub fn add(&mut self, status: ExecutionStatus) {
        match status {
            ExecutionStatus::Passed => self.passed += 1,
            ExecutionStatus::Bypassed => self.bypassed += 1,
            ExecutionStatus::Failed => self.failed += 1,
            ExecutionStatus::Ignored => self.ignored += 1,
            ExecutionStatus::NotRun => self.not_run += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.passed + self.bypassed + self.failed + self.ignored + self.not_run
    }
}

impl AddAssign for StatusCounts {
    fn add_assign(&mut self, rhs: Self) {
        self.passed += rhs.passed;
        self.bypassed += rhs.bypassed;
        self.failed += rhs.failed;
        self.ignored += rhs.ignored;
        self.not_run += rhs.not_run;
    }
}

/// All scenario results of one feature. Immutable once built.
#[derive(Debug, Clone)]
pub struct FeatureResult {
    info: Arc<FeatureInfo>,
    scenarios: Vec<ScenarioResult>,
    time: ExecutionTime,
}

impl FeatureResult {
    pub fn new(info: Arc<FeatureInfo>, scenarios: Vec<ScenarioResult>, time: ExecutionTime) -> Self {
        Self {
            info,
            scenarios,
            time,
        }
    }

    pub fn info(&self) -> &Arc<FeatureInfo> {
        &self.info
    }

    pub fn scenarios(&self) -> &[ScenarioResult] {
        &self.scenarios
    }

    pub fn time(&self) -> ExecutionTime {
        self.time
    }

    pub fn status(&self) -> ExecutionStatus {
        ExecutionStatus::aggregate(self.scenarios.iter().map(|s| s.status()))
    }

    pub fn counts(&self) -> StatusCounts {
        StatusCounts::from_statuses(self.scenarios.iter().map(|s| s.status()))
    }
}

/// Result of a whole run: the contract report formatters and host adapters consume.
#[derive(Debug, Clone)]
pub struct TestRunResult {
    features: Vec<FeatureResult>,
    time: ExecutionTime,
}

impl TestRunResult {
    pub fn new(features: Vec<FeatureResult>, time: ExecutionTime) -> Self {
        Self { features, time }
    }

    pub fn features(&self) -> &[FeatureResult] {
        &self.features
    }

    pub fn time(&self) -> ExecutionTime {
        self.time
    }

    pub fn duration(&self) -> Duration {
        self.time.duration
    }

    pub fn status(&self) -> ExecutionStatus {
        ExecutionStatus::aggregate(self.features.iter().map(|f| f.status()))
    }

    pub fn counts(&self) -> StatusCounts {
        let mut counts = StatusCounts::default();
        for f in &self.features {
            counts += f.counts();
        }
        counts
    }

    pub fn per_feature_counts(&self) -> Vec<(Arc<FeatureInfo>, StatusCounts)> {
        self.features
            .iter()
            .map(|f| (Arc::clone(f.info()), f.counts()))
            .collect()
    }

    pub fn scenario_count(&self) -> usize {
        self.features.iter().map(|f| f.scenarios().len()).sum()
    }

    pub fn scenarios(&self) -> impl Iterator<Item = &ScenarioResult> {
        self.features.iter().flat_map(|f| f.scenarios().iter())
    }

    /// Find a scenario by its display name.
    pub fn scenario(&self, name: &str) -> Option<&ScenarioResult> {
        self.scenarios().find(|s| s.info().name == name)
    }
}
