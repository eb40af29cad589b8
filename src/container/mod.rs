// src/container/mod.rs

//! Scoped dependency container.
//!
//! A [`Container`] is one node of a scope tree. The root sits at
//! [`LifetimeScope::Global`]; the engine opens a `Scenario` scope per
//! scenario case and steps may nest `Local` scopes below it.
//!
//! Resolution walks from the current scope towards the root and uses the
//! nearest slot registered under the requested type. Shared slots
//! (`Single`, `Scenario`) build their instance once under a guard with a
//! bounded wait; a wait that times out is reported as a circular dependency.
//! Cycles inside a single resolution chain are detected immediately from the
//! resolver's path.
//!
//! Each scope releases the instances it created, oldest first, when it is
//! disposed. Disposing a child never touches its parent.

pub mod descriptor;
pub mod disposal;
pub mod lifetime;
pub mod registration;
pub mod resolver;
pub mod scope;
pub mod slot;

use std::time::Duration;

use crate::config::ConfigFile;

pub use descriptor::{DependencyDescriptor, TypeKey};
pub use disposal::Dispose;
pub use lifetime::{InstanceScope, LifetimeScope};
pub use registration::{ContainerConfigurator, RegistrationBuilder};
pub use resolver::{Injectable, Resolver};
pub use scope::Container;
pub use slot::Slot;

/// Tunables for a container tree. Child scopes inherit the root's options.
#[derive(Debug, Clone)]
pub struct ContainerOptions {
    /// Bounded wait on a shared slot's construction guard.
    pub resolve_timeout: Duration,
}

impl Default for ContainerOptions {
    fn default() -> Self {
        Self {
            resolve_timeout: crate::config::model::DEFAULT_RESOLVE_TIMEOUT,
        }
    }
}

impl From<&ConfigFile> for ContainerOptions {
    fn from(cfg: &ConfigFile) -> Self {
        Self {
            resolve_timeout: cfg.resolve_timeout(),
        }
    }
}
