// src/results/mod.rs

//! Step, scenario, feature and run results, plus status counting.

pub mod aggregate;
pub mod scenario;

pub use aggregate::{FeatureResult, StatusCounts, TestRunResult};
pub use scenario::{ScenarioResult, StepResult};
