// src/scenario/mod.rs

//! Declared scenarios: fixtures, scenario methods, steps and runnable cases.
//!
//! - [`fixture`] describes the fixture "type" a feature is built around.
//! - [`method`] is a scenario's identity plus its ordered steps.
//! - [`step`] holds step definitions and the ways a step can end.
//! - [`case`] is one runnable (method, arguments) pair.
//! - [`feature`] expands declarations into cases.

pub mod case;
pub mod feature;
pub mod fixture;
pub mod method;
pub mod step;

pub use case::{Argument, ScenarioCase};
pub use feature::Feature;
pub use fixture::{AsAny, Fixture, FixtureDescriptor};
pub use method::ScenarioMethod;
pub use step::{StepBody, StepDefinition, StepError};
