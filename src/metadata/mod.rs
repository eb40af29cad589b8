// src/metadata/mod.rs

//! Feature / scenario / step descriptive records and the provider seam that
//! produces them.

pub mod info;
pub mod provider;

pub use info::{FeatureInfo, ScenarioInfo, StepInfo};
pub use provider::{DeclaredMetadataProvider, MetadataProvider};
