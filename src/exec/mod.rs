// src/exec/mod.rs

//! Step execution layer.
//!
//! The engine hands each scenario to a [`StepExecutor`] together with an
//! explicit [`ScenarioContext`]; the executor runs the steps and records
//! their results.
//!
//! - [`backend`] provides the `StepExecutor` trait that the engine talks to,
//!   and which tests can replace with a scripted implementation.
//! - [`context`] holds the per-scenario and per-step contexts.
//! - [`sequential`] is the default executor: steps run one after another.

pub mod backend;
pub mod context;
pub mod sequential;

pub use backend::StepExecutor;
pub use context::{ScenarioContext, StepContext};
pub use sequential::SequentialStepExecutor;
