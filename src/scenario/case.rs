// src/scenario/case.rs

use std::fmt;
use std::sync::Arc;

use crate::scenario::fixture::FixtureDescriptor;
use crate::scenario::method::ScenarioMethod;

/// One bound argument of a parameterised scenario.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Argument {
    pub name: String,
    pub value: String,
}

impl Argument {
    pub fn new(name: impl Into<String>, value: impl fmt::Display) -> Self {
        Self {
            name: name.into(),
            value: value.to_string(),
        }
    }
}

impl fmt::Display for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.value)
    }
}

/// Identifies one runnable scenario.
#[derive(Debug, Clone)]
pub struct ScenarioCase {
    pub fixture: Arc<FixtureDescriptor>,
    pub method: Arc<ScenarioMethod>,
    pub arguments: Vec<Argument>,
    /// Host runner's own identity for this case, carried through untouched.
    pub correlation_id: Option<String>,
    /// Arguments must be resolved when the case runs rather than at
    /// discovery. Not supported: such cases fail without running any step.
    pub requires_runtime_arguments: bool,
}

impl ScenarioCase {
    pub fn new(fixture: Arc<FixtureDescriptor>, method: Arc<ScenarioMethod>) -> Self {
        Self {
            fixture,
            method,
            arguments: Vec::new(),
            correlation_id: None,
            requires_runtime_arguments: false,
        }
    }

    pub fn with_argument(mut self, name: impl Into<String>, value: impl fmt::Display) -> Self {
        self.arguments.push(Argument::new(name, value));
        self
    }

    pub fn with_arguments(mut self, arguments: Vec<Argument>) -> Self {
        self.arguments = arguments;
        self
    }

    pub fn with_correlation_id(mut self, id: impl Into<String>) -> Self {
        self.correlation_id = Some(id.into());
        self
    }

    pub fn with_runtime_arguments(mut self) -> Self {
        self.requires_runtime_arguments = true;
        self
    }

    pub fn fixture_key(&self) -> &str {
        self.fixture.key()
    }

    pub fn method_key(&self) -> &str {
        self.method.key()
    }
}
