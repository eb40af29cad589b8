// src/scenario/feature.rs

use std::sync::Arc;

use crate::scenario::case::{Argument, ScenarioCase};
use crate::scenario::fixture::FixtureDescriptor;
use crate::scenario::method::ScenarioMethod;

/// Declares the scenarios of one fixture and expands them into cases.
///
/// ```ignore
/// let cases = Feature::new(FixtureDescriptor::new("atm", |_| Ok(Atm::default())))
///     .scenario(ScenarioMethod::new("check_balance").step("read", |_| async { Ok(()) }))
///     .parameterized(withdraw, vec![vec![Argument::new("amount", 20)]])
///     .into_cases();
/// ```
#[derive(Debug, Clone)]
pub struct Feature {
    fixture: Arc<FixtureDescriptor>,
    cases: Vec<ScenarioCase>,
}

impl Feature {
    pub fn new(fixture: FixtureDescriptor) -> Self {
        Self {
            fixture: Arc::new(fixture),
            cases: Vec::new(),
        }
    }

    pub fn fixture(&self) -> &Arc<FixtureDescriptor> {
        &self.fixture
    }

    pub fn scenario(mut self, method: ScenarioMethod) -> Self {
        let case = ScenarioCase::new(Arc::clone(&self.fixture), Arc::new(method));
        self.cases.push(case);
        self
    }

    /// One case per argument row, all sharing the same method identity.
    pub fn parameterized(mut self, method: ScenarioMethod, rows: Vec<Vec<Argument>>) -> Self {
        let method = Arc::new(method);
        for row in rows {
            let case = ScenarioCase::new(Arc::clone(&self.fixture), Arc::clone(&method))
                .with_arguments(row);
            self.cases.push(case);
        }
        self
    }

    pub fn with_case(mut self, case: ScenarioCase) -> Self {
        self.cases.push(case);
        self
    }

    pub fn into_cases(self) -> Vec<ScenarioCase> {
        self.cases
    }
}
