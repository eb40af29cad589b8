// src/scenario/method.rs

use std::future::Future;

use crate::exec::StepContext;
use crate::scenario::step::{StepDefinition, StepError};

/// A scenario "method": its identity within the fixture plus its ordered steps.
///
/// Cases of the same method with different argument sets form one scenario
/// group.
#[derive(Debug, Clone)]
pub struct ScenarioMethod {
    key: String,
    name: String,
    description: Option<String>,
    labels: Vec<String>,
    categories: Vec<String>,
    steps: Vec<StepDefinition>,
}

impl ScenarioMethod {
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            name: humanize(&key),
            key,
            description: None,
            labels: Vec::new(),
            categories: Vec::new(),
            steps: Vec::new(),
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn described(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.labels.push(label.into());
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.categories.push(category.into());
        self
    }

    pub fn step<F, Fut>(mut self, name: impl Into<String>, body: F) -> Self
    where
        F: Fn(StepContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), StepError>> + Send + 'static,
    {
        self.steps.push(StepDefinition::new(name, body));
        self
    }

    pub fn with_step(mut self, step: StepDefinition) -> Self {
        self.steps.push(step);
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn steps(&self) -> &[StepDefinition] {
        &self.steps
    }
}

/// `withdraw_cash` -> `withdraw cash`.
fn humanize(key: &str) -> String {
    key.replace('_', " ")
}
