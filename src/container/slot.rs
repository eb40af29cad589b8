// src/container/slot.rs

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use parking_lot::Mutex;
use tracing::trace;

use crate::container::descriptor::{DependencyDescriptor, Instance};
use crate::container::resolver::Resolver;
use crate::errors::{Result, StepwiseError};

/// Per-scope holder for one descriptor's instance.
///
/// Cached scopes use double-checked initialisation: a lock-free read of the
/// cell, then the guard (bounded wait), a second read, and construction.
pub struct Slot {
    descriptor: Arc<DependencyDescriptor>,
    instance: OnceLock<Instance>,
    guard: Mutex<()>,
}

impl Slot {
    pub(crate) fn new(descriptor: Arc<DependencyDescriptor>) -> Self {
        Self {
            descriptor,
            instance: OnceLock::new(),
            guard: Mutex::new(()),
        }
    }

    pub fn descriptor(&self) -> &DependencyDescriptor {
        &self.descriptor
    }

    /// Whether a cached instance already exists.
    pub fn is_initialized(&self) -> bool {
        self.instance.get().is_some()
    }

    /// Return the slot's instance, building it through `resolver` if needed.
    /// `on_created` sees every freshly built instance exactly once, while
    /// the guard is still held.
    pub(crate) fn get_or_create(
        &self,
        resolver: &Resolver<'_>,
        timeout: Duration,
        on_created: impl FnOnce(&Instance),
    ) -> Result<Instance> {
        if !self.descriptor.instance_scope.is_cached() {
            let instance = self.construct(resolver)?;
            on_created(&instance);
            return Ok(instance);
        }

        if let Some(instance) = self.instance.get() {
            return Ok(Arc::clone(instance));
        }

        let Some(_guard) = self.guard.try_lock_for(timeout) else {
            return Err(StepwiseError::CircularDependency(format!(
                "{} (construction guard not acquired within {:?})",
                self.descriptor.key.name(),
                timeout
            )));
        };

        if let Some(instance) = self.instance.get() {
            return Ok(Arc::clone(instance));
        }

        let instance = self.construct(resolver)?;
        on_created(&instance);
        // Only ever set while holding the guard.
        let _ = self.instance.set(Arc::clone(&instance));
        Ok(instance)
    }

    fn construct(&self, resolver: &Resolver<'_>) -> Result<Instance> {
        let name = self.descriptor.key.name();
        trace!(type_name = name, scope = ?self.descriptor.instance_scope, "constructing instance");
        (self.descriptor.factory)(resolver).map_err(|e| StepwiseError::from_factory(name, e))
    }
}

impl std::fmt::Debug for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Slot")
            .field("descriptor", &self.descriptor)
            .field("initialized", &self.is_initialized())
            .finish()
    }
}
