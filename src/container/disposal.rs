// src/container/disposal.rs

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::container::descriptor::{Disposer, Instance};
use crate::errors::StepwiseError;

/// Disposal contract for container-managed instances.
pub trait Dispose: Send + Sync {
    fn dispose(&self) -> anyhow::Result<()>;
}

/// Adapt a typed disposal function to the type-erased form stored on a
/// descriptor.
pub(crate) fn disposer_for<T, F>(dispose: F) -> Disposer
where
    T: Send + Sync + 'static,
    F: Fn(&T) -> anyhow::Result<()> + Send + Sync + 'static,
{
    Arc::new(move |instance: &Instance| match (**instance).downcast_ref::<T>() {
        Some(value) => dispose(value),
        None => Ok(()),
    })
}

struct Tracked {
    type_name: &'static str,
    instance: Instance,
    disposer: Disposer,
}

/// Instances a scope created and must release, in creation order.
#[derive(Default)]
pub(crate) struct DisposalQueue {
    entries: Mutex<Vec<Tracked>>,
}

impl DisposalQueue {
    pub(crate) fn push(&self, type_name: &'static str, instance: Instance, disposer: Disposer) {
        self.entries.lock().push(Tracked {
            type_name,
            instance,
            disposer,
        });
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Dispose everything queued so far, oldest first. Failures are collected
    /// and never stop the drain.
    pub(crate) fn drain(&self) -> Vec<StepwiseError> {
        let entries = std::mem::take(&mut *self.entries.lock());
        let mut failures = Vec::new();

        for tracked in entries {
            debug!(type_name = tracked.type_name, "disposing instance");
            if let Err(source) = (tracked.disposer)(&tracked.instance) {
                warn!(type_name = tracked.type_name, error = %source, "instance disposal failed");
                failures.push(StepwiseError::Disposal {
                    type_name: tracked.type_name.to_string(),
                    source,
                });
            }
        }

        failures
    }
}
