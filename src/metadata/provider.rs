// src/metadata/provider.rs

use std::sync::Arc;

use crate::metadata::info::{FeatureInfo, ScenarioInfo, StepInfo};
use crate::scenario::{FixtureDescriptor, ScenarioCase, StepDefinition};

/// Turns declarations into the immutable info records the engine and
/// notifiers consume.
pub trait MetadataProvider: Send + Sync {
    fn feature_info(&self, fixture: &FixtureDescriptor) -> FeatureInfo;

    fn scenario_info(&self, feature: &Arc<FeatureInfo>, case: &ScenarioCase) -> ScenarioInfo;

    fn step_info(&self, number: usize, total: usize, step: &StepDefinition) -> StepInfo {
        StepInfo::new(number, total, step.name())
    }
}

/// Reads everything straight from the declared fixtures and methods.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeclaredMetadataProvider;

impl MetadataProvider for DeclaredMetadataProvider {
    fn feature_info(&self, fixture: &FixtureDescriptor) -> FeatureInfo {
        FeatureInfo {
            key: fixture.key().to_string(),
            name: fixture.name().to_string(),
            description: fixture.description().map(str::to_string),
            labels: fixture.labels().to_vec(),
            categories: fixture.categories().to_vec(),
        }
    }

    fn scenario_info(&self, feature: &Arc<FeatureInfo>, case: &ScenarioCase) -> ScenarioInfo {
        let method = &case.method;

        // Scenario categories inherit the feature's.
        let mut categories = feature.categories.clone();
        for c in method.categories() {
            if !categories.contains(c) {
                categories.push(c.clone());
            }
        }

        ScenarioInfo {
            feature: Arc::clone(feature),
            method_key: method.key().to_string(),
            name: scenario_display_name(method.name(), &case.arguments),
            description: method.description().map(str::to_string),
            labels: method.labels().to_vec(),
            categories,
            arguments: case.arguments.clone(),
            correlation_id: case.correlation_id.clone(),
        }
    }
}

fn scenario_display_name(name: &str, arguments: &[crate::scenario::Argument]) -> String {
    if arguments.is_empty() {
        return name.to_string();
    }
    let rendered: Vec<String> = arguments.iter().map(|a| a.to_string()).collect();
    format!("{} [{}]", name, rendered.join(", "))
}
