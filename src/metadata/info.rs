// src/metadata/info.rs

use std::sync::Arc;

use crate::scenario::Argument;

/// Descriptive, immutable record of a feature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureInfo {
    /// Fixture key the feature was derived from.
    pub key: String,
    pub name: String,
    pub description: Option<String>,
    pub labels: Vec<String>,
    pub categories: Vec<String>,
}

/// Descriptive, immutable record of one scenario case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioInfo {
    pub feature: Arc<FeatureInfo>,
    /// Method identity; shared by every case of a parameterised scenario.
    pub method_key: String,
    /// Display name, including rendered arguments for parameterised cases.
    pub name: String,
    pub description: Option<String>,
    pub labels: Vec<String>,
    pub categories: Vec<String>,
    pub arguments: Vec<Argument>,
    pub correlation_id: Option<String>,
}

/// Descriptive record of one step within a scenario.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepInfo {
    /// 1-based position.
    pub number: usize,
    pub total: usize,
    pub name: String,
}

impl StepInfo {
    pub fn new(number: usize, total: usize, name: impl Into<String>) -> Self {
        Self {
            number,
            total,
            name: name.into(),
        }
    }
}
