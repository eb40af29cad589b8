// src/engine/mod.rs

//! Orchestration engine for stepwise.
//!
//! This module ties together:
//! - grouping of cases into features and scenario groups
//! - the concurrent run → feature → group → scenario pipeline
//! - per-scenario execution and outcome classification
//!
//! The pure parts live in [`planning`] and [`classify`]; the async shell is
//! implemented in [`pipeline`] and [`scenario_executor`].

pub mod classify;
pub mod pipeline;
pub mod planning;
pub mod scenario_executor;

pub use classify::{classify, panic_message, ScenarioOutcome};
pub use pipeline::Orchestrator;
pub use planning::{plan_features, FeaturePlan, GroupPlan};
pub use scenario_executor::{ScenarioExecutor, CANCELLED_DETAIL};
