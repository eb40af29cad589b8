// src/container/descriptor.rs

//! Registration records.

use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::container::lifetime::{InstanceScope, LifetimeScope};
use crate::container::resolver::Resolver;

/// Identity of a resolvable type. Compared by `TypeId`; the name is kept for
/// diagnostics only.
#[derive(Clone, Copy)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
}

impl TypeKey {
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// A constructed instance: an `Arc<T>` of the registered concrete type.
pub(crate) type Instance = Arc<dyn Any + Send + Sync>;

pub(crate) type Factory = Arc<dyn Fn(&Resolver<'_>) -> anyhow::Result<Instance> + Send + Sync>;

/// Turns the concrete instance into a boxed `Arc<U>` for one exposed type `U`.
pub(crate) type Projection = Arc<dyn Fn(&Instance) -> Option<Box<dyn Any + Send + Sync>> + Send + Sync>;

pub(crate) type Disposer = Arc<dyn Fn(&Instance) -> anyhow::Result<()> + Send + Sync>;

/// Everything the container knows about one registration.
#[derive(Clone)]
pub struct DependencyDescriptor {
    pub(crate) key: TypeKey,
    pub(crate) factory: Factory,
    /// Types the instance may be requested as; always includes `key` itself.
    pub(crate) exposed: Vec<(TypeKey, Projection)>,
    pub(crate) instance_scope: InstanceScope,
    pub(crate) lifetime: Option<LifetimeScope>,
    pub(crate) disposer: Option<Disposer>,
    pub(crate) externally_owned: bool,
}

impl DependencyDescriptor {
    pub(crate) fn new<T: Send + Sync + 'static>(instance_scope: InstanceScope, factory: Factory) -> Self {
        let key = TypeKey::of::<T>();
        Self {
            key,
            factory,
            exposed: vec![(key, project_as::<T, T>(|t| t))],
            instance_scope,
            lifetime: instance_scope.implied_lifetime(),
            disposer: None,
            externally_owned: false,
        }
    }

    pub fn key(&self) -> TypeKey {
        self.key
    }

    pub fn instance_scope(&self) -> InstanceScope {
        self.instance_scope
    }

    /// Deepest scope level at which the registration becomes active, if restricted.
    pub fn lifetime(&self) -> Option<LifetimeScope> {
        self.lifetime
    }

    pub fn exposed_types(&self) -> impl Iterator<Item = TypeKey> + '_ {
        self.exposed.iter().map(|(k, _)| *k)
    }

    pub fn is_externally_owned(&self) -> bool {
        self.externally_owned
    }

    /// Whether instances built from this descriptor go on a disposal queue.
    pub(crate) fn is_tracked(&self) -> bool {
        self.disposer.is_some() && !self.externally_owned
    }

    /// Whether a slot for this descriptor belongs in a scope at `level`.
    pub(crate) fn is_active_at(&self, level: LifetimeScope) -> bool {
        match self.lifetime {
            None => true,
            Some(restriction) => restriction == level,
        }
    }

    /// Whether a child of a scope at `parent_level` must see this descriptor
    /// in its own visible set (and so may build its own slot for it).
    ///
    /// Unrestricted per-scope registrations always flow down. Anything
    /// restricted flows down only until the restriction is reached; once the
    /// anchoring scope holds a slot, nested scopes fall back to it.
    pub(crate) fn flows_into_child_of(&self, parent_level: LifetimeScope) -> bool {
        match self.lifetime {
            Some(restriction) => restriction != parent_level,
            None => self.instance_scope.is_per_scope(),
        }
    }
}

impl fmt::Debug for DependencyDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DependencyDescriptor")
            .field("key", &self.key)
            .field("exposed", &self.exposed.iter().map(|(k, _)| k).collect::<Vec<_>>())
            .field("instance_scope", &self.instance_scope)
            .field("lifetime", &self.lifetime)
            .field("externally_owned", &self.externally_owned)
            .finish_non_exhaustive()
    }
}

/// Projection exposing a concrete `T` instance as `Arc<U>`.
pub(crate) fn project_as<T, U>(map: impl Fn(Arc<T>) -> Arc<U> + Send + Sync + 'static) -> Projection
where
    T: Send + Sync + 'static,
    U: ?Sized + Send + Sync + 'static,
{
    Arc::new(move |instance: &Instance| {
        let concrete = Arc::clone(instance).downcast::<T>().ok()?;
        let boxed: Box<dyn Any + Send + Sync> = Box::new(map(concrete));
        Some(boxed)
    })
}
