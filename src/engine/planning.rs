// src/engine/planning.rs

//! Pure grouping of scenario cases into features and scenario groups.
//!
//! Cases sharing a fixture key form one feature; within a feature, cases
//! sharing a method key form one scenario group. Both levels keep the order
//! in which keys first appear in the input.

use std::collections::HashMap;
use std::sync::Arc;

use crate::errors::{Result, StepwiseError};
use crate::scenario::{FixtureDescriptor, ScenarioCase, ScenarioMethod};

/// Cases of one scenario method.
#[derive(Debug, Clone)]
pub struct GroupPlan {
    pub method: Arc<ScenarioMethod>,
    pub cases: Vec<ScenarioCase>,
}

/// Cases of one fixture, split by method.
#[derive(Debug, Clone)]
pub struct FeaturePlan {
    pub fixture: Arc<FixtureDescriptor>,
    pub groups: Vec<GroupPlan>,
}

impl FeaturePlan {
    pub fn case_count(&self) -> usize {
        self.groups.iter().map(|g| g.cases.len()).sum()
    }

    pub fn cases(&self) -> impl Iterator<Item = &ScenarioCase> {
        self.groups.iter().flat_map(|g| g.cases.iter())
    }
}

/// Group `cases` by fixture, then by method.
///
/// Two different fixture descriptors under one key, or two different methods
/// under one key within a fixture, make the grouping ambiguous and are
/// rejected before anything runs.
pub fn plan_features(cases: Vec<ScenarioCase>) -> Result<Vec<FeaturePlan>> {
    let mut features: Vec<FeaturePlan> = Vec::new();
    let mut feature_index: HashMap<String, usize> = HashMap::new();
    let mut group_index: HashMap<(usize, String), usize> = HashMap::new();

    for case in cases {
        let fi = match feature_index.get(case.fixture_key()) {
            Some(&fi) => {
                if !Arc::ptr_eq(&features[fi].fixture, &case.fixture) {
                    return Err(StepwiseError::ConfigError(format!(
                        "fixture key '{}' is used by two different fixture descriptors",
                        case.fixture_key()
                    )));
                }
                fi
            }
            None => {
                features.push(FeaturePlan {
                    fixture: Arc::clone(&case.fixture),
                    groups: Vec::new(),
                });
                let fi = features.len() - 1;
                feature_index.insert(case.fixture_key().to_string(), fi);
                fi
            }
        };

        let feature = &mut features[fi];
        let key = (fi, case.method_key().to_string());
        match group_index.get(&key) {
            Some(&gi) => {
                let group = &mut feature.groups[gi];
                if !Arc::ptr_eq(&group.method, &case.method) {
                    return Err(StepwiseError::ConfigError(format!(
                        "scenario key '{}' in fixture '{}' is used by two different methods",
                        case.method_key(),
                        case.fixture_key()
                    )));
                }
                group.cases.push(case);
            }
            None => {
                feature.groups.push(GroupPlan {
                    method: Arc::clone(&case.method),
                    cases: vec![case],
                });
                group_index.insert(key, feature.groups.len() - 1);
            }
        }
    }

    Ok(features)
}
