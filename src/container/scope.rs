// src/container/scope.rs

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::container::descriptor::{DependencyDescriptor, Disposer, Instance, TypeKey};
use crate::container::disposal::DisposalQueue;
use crate::container::lifetime::LifetimeScope;
use crate::container::registration::ContainerConfigurator;
use crate::container::resolver::{Injectable, Resolver};
use crate::container::slot::Slot;
use crate::container::ContainerOptions;
use crate::errors::{Result, StepwiseError};

/// One node of the scope tree. Children hold their parent for lookup
/// fallback only.
pub(crate) struct ScopeNode {
    pub(crate) level: LifetimeScope,
    pub(crate) parent: Option<Arc<ScopeNode>>,
    pub(crate) options: ContainerOptions,
    /// Descriptors a child of this scope must index itself.
    inheritable: Vec<Arc<DependencyDescriptor>>,
    slots: HashMap<TypeKey, Arc<Slot>>,
    /// Registered here but restricted to a level this scope is not.
    pending: HashMap<TypeKey, LifetimeScope>,
    disposal: DisposalQueue,
    disposed: AtomicBool,
}

impl ScopeNode {
    fn build(
        level: LifetimeScope,
        parent: Option<Arc<ScopeNode>>,
        options: ContainerOptions,
        own: Vec<DependencyDescriptor>,
    ) -> Result<Arc<ScopeNode>> {
        let mut own_keys = HashSet::new();
        for descriptor in &own {
            for key in descriptor.exposed_types() {
                if !own_keys.insert(key) {
                    return Err(StepwiseError::DuplicateRegistration(key.name().to_string()));
                }
            }
        }

        // Inherited first so own registrations overwrite them key by key.
        let visible: Vec<Arc<DependencyDescriptor>> = parent
            .iter()
            .flat_map(|p| p.inheritable.iter().cloned())
            .chain(own.into_iter().map(Arc::new))
            .collect();

        let mut active: HashMap<TypeKey, Arc<DependencyDescriptor>> = HashMap::new();
        let mut pending = HashMap::new();
        for descriptor in &visible {
            for key in descriptor.exposed_types() {
                if descriptor.is_active_at(level) {
                    pending.remove(&key);
                    active.insert(key, Arc::clone(descriptor));
                } else if let Some(restriction) = descriptor.lifetime {
                    active.remove(&key);
                    pending.insert(key, restriction);
                }
            }
        }

        // One slot per descriptor, indexed under each key it still owns.
        let mut by_descriptor: HashMap<*const DependencyDescriptor, Arc<Slot>> = HashMap::new();
        let slots = active
            .into_iter()
            .map(|(key, descriptor)| {
                let slot = by_descriptor
                    .entry(Arc::as_ptr(&descriptor))
                    .or_insert_with(|| Arc::new(Slot::new(Arc::clone(&descriptor))));
                (key, Arc::clone(slot))
            })
            .collect::<HashMap<_, _>>();

        let inheritable = visible
            .into_iter()
            .filter(|d| d.flows_into_child_of(level))
            .collect();

        debug!(
            level = %level,
            slots = slots.len(),
            pending = pending.len(),
            "container scope created"
        );

        Ok(Arc::new(ScopeNode {
            level,
            parent,
            options,
            inheritable,
            slots,
            pending,
            disposal: DisposalQueue::default(),
            disposed: AtomicBool::new(false),
        }))
    }

    pub(crate) fn slot(&self, key: &TypeKey) -> Option<&Arc<Slot>> {
        self.slots.get(key)
    }

    pub(crate) fn pending_restriction(&self, key: &TypeKey) -> Option<LifetimeScope> {
        self.pending.get(key).copied()
    }

    pub(crate) fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::Acquire)
    }

    pub(crate) fn ensure_live(&self) -> Result<()> {
        if self.is_disposed() {
            return Err(StepwiseError::Disposed);
        }
        Ok(())
    }

    pub(crate) fn track(&self, type_name: &'static str, instance: &Instance, disposer: &Disposer) {
        self.disposal
            .push(type_name, Arc::clone(instance), Arc::clone(disposer));
    }

    fn dispose(&self) -> Result<()> {
        if self.disposed.swap(true, Ordering::AcqRel) {
            return Ok(());
        }
        debug!(level = %self.level, tracked = self.disposal.len(), "disposing container scope");
        StepwiseError::collect(self.disposal.drain())
    }
}

impl Drop for ScopeNode {
    fn drop(&mut self) {
        if !self.is_disposed() && self.disposal.len() > 0 {
            warn!(
                level = %self.level,
                tracked = self.disposal.len(),
                "container scope dropped without dispose; tracked instances were not released"
            );
        }
    }
}

/// Handle to one scope of the dependency container.
///
/// Cloning is cheap and yields another handle to the same scope. The root
/// scope is always at [`LifetimeScope::Global`].
#[derive(Clone)]
pub struct Container {
    node: Arc<ScopeNode>,
}

impl Container {
    /// Build the root scope from the registrations made by `configure`.
    pub fn new<F>(options: ContainerOptions, configure: F) -> Result<Container>
    where
        F: FnOnce(&mut ContainerConfigurator),
    {
        let mut configurator = ContainerConfigurator::default();
        configure(&mut configurator);
        let node = ScopeNode::build(
            LifetimeScope::Global,
            None,
            options,
            configurator.into_descriptors(),
        )?;
        Ok(Container { node })
    }

    pub(crate) fn from_node(node: Arc<ScopeNode>) -> Container {
        Container { node }
    }

    /// Open a nested scope at `level` with no registrations of its own.
    pub fn begin_scope(&self, level: LifetimeScope) -> Result<Container> {
        self.begin_scope_with(level, |_| {})
    }

    /// Open a nested scope at `level`; `configure` adds registrations that
    /// only this scope and its descendants see.
    pub fn begin_scope_with<F>(&self, level: LifetimeScope, configure: F) -> Result<Container>
    where
        F: FnOnce(&mut ContainerConfigurator),
    {
        self.node.ensure_live()?;
        if level == LifetimeScope::Global {
            return Err(StepwiseError::InvalidScope(
                "the global level is reserved for the root container".to_string(),
            ));
        }

        let mut configurator = ContainerConfigurator::default();
        configure(&mut configurator);
        let node = ScopeNode::build(
            level,
            Some(Arc::clone(&self.node)),
            self.node.options.clone(),
            configurator.into_descriptors(),
        )?;
        Ok(Container { node })
    }

    /// Resolve a registered type (or alias). The container itself resolves
    /// as `Container`.
    pub fn resolve<T>(&self) -> Result<Arc<T>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.resolver().resolve::<T>()
    }

    /// Resolve `T`, constructing it implicitly when nothing is registered.
    pub fn create<T: Injectable>(&self) -> Result<Arc<T>> {
        self.resolver().create::<T>()
    }

    /// Resolver rooted at this scope, for factory-style construction.
    pub fn resolver(&self) -> Resolver<'_> {
        Resolver::new(&self.node)
    }

    pub fn level(&self) -> LifetimeScope {
        self.node.level
    }

    pub fn is_disposed(&self) -> bool {
        self.node.is_disposed()
    }

    /// Release every instance this scope created, oldest first. Idempotent.
    /// Parent scopes are left untouched.
    pub fn dispose(&self) -> Result<()> {
        self.node.dispose()
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("level", &self.node.level)
            .field("slots", &self.node.slots.len())
            .field("disposed", &self.node.is_disposed())
            .finish()
    }
}
