// src/container/resolver.rs

use std::any::Any;
use std::sync::Arc;

use tracing::trace;

use crate::container::descriptor::{Instance, TypeKey};
use crate::container::disposal::disposer_for;
use crate::container::lifetime::LifetimeScope;
use crate::container::scope::{Container, ScopeNode};
use crate::container::slot::Slot;
use crate::errors::{Result, StepwiseError};

/// A type the container can build without a registration.
///
/// `construct` receives a resolver for the requesting scope and pulls its
/// own dependencies from it.
pub trait Injectable: Sized + Send + Sync + 'static {
    fn construct(resolver: &Resolver<'_>) -> anyhow::Result<Self>;

    /// Disposal hook for implicitly constructed instances. When present, the
    /// requesting scope releases the instance on teardown.
    fn disposer() -> Option<fn(&Self) -> anyhow::Result<()>> {
        None
    }
}

/// One link of the chain of types currently being constructed.
struct PathLink<'a> {
    key: TypeKey,
    parent: Option<&'a PathLink<'a>>,
}

impl PathLink<'_> {
    fn contains(&self, key: TypeKey) -> bool {
        let mut link = Some(self);
        while let Some(l) = link {
            if l.key == key {
                return true;
            }
            link = l.parent;
        }
        false
    }

    /// `A -> B -> C`, outermost first.
    fn render(&self, closing: TypeKey) -> String {
        let mut names = vec![closing.name()];
        let mut link = Some(self);
        while let Some(l) = link {
            names.push(l.key.name());
            link = l.parent;
        }
        names.reverse();
        names.join(" -> ")
    }
}

enum Lookup<'a> {
    Slot(&'a Arc<ScopeNode>, Arc<Slot>),
    Pending(LifetimeScope),
    Missing,
}

/// Resolution handle passed to factories.
///
/// Carries the chain of types under construction so a cycle within one
/// resolution is reported at once instead of waiting on a slot guard.
pub struct Resolver<'a> {
    node: &'a Arc<ScopeNode>,
    path: Option<&'a PathLink<'a>>,
}

impl<'a> Resolver<'a> {
    pub(crate) fn new(node: &'a Arc<ScopeNode>) -> Self {
        Self { node, path: None }
    }

    /// Handle to the scope this resolver works in.
    pub fn container(&self) -> Container {
        Container::from_node(Arc::clone(self.node))
    }

    pub fn resolve<T>(&self) -> Result<Arc<T>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.node.ensure_live()?;
        let key = TypeKey::of::<T>();

        if key == TypeKey::of::<Container>() {
            let handle: Box<dyn Any> = Box::new(Arc::new(self.container()));
            return handle
                .downcast::<Arc<T>>()
                .map(|b| *b)
                .map_err(|_| StepwiseError::UnregisteredDependency(key.name().to_string()));
        }

        match self.lookup(key) {
            Lookup::Slot(owner, slot) => {
                let instance = self.resolve_slot(owner, &slot)?;
                project::<T>(&slot, key, &instance)
            }
            Lookup::Pending(required) => Err(StepwiseError::ScopeMismatch {
                type_name: key.name().to_string(),
                required: required.to_string(),
                current: self.node.level.to_string(),
            }),
            Lookup::Missing => Err(StepwiseError::UnregisteredDependency(
                key.name().to_string(),
            )),
        }
    }

    /// Resolve `T` if registered, otherwise construct it through
    /// [`Injectable::construct`]. Implicit instances with a disposer are
    /// released by the scope that asked for them.
    pub fn create<T: Injectable>(&self) -> Result<Arc<T>> {
        self.node.ensure_live()?;
        let key = TypeKey::of::<T>();
        if !matches!(self.lookup(key), Lookup::Missing) {
            return self.resolve::<T>();
        }

        self.check_cycle(key)?;
        let link = PathLink {
            key,
            parent: self.path,
        };
        let inner = Resolver {
            node: self.node,
            path: Some(&link),
        };

        trace!(type_name = key.name(), "constructing unregistered type");
        let value = T::construct(&inner).map_err(|e| StepwiseError::from_factory(key.name(), e))?;
        let instance = Arc::new(value);

        if let Some(dispose) = T::disposer() {
            let erased: Instance = Arc::clone(&instance) as Instance;
            self.node
                .track(key.name(), &erased, &disposer_for::<T, _>(dispose));
        }
        Ok(instance)
    }

    fn lookup(&self, key: TypeKey) -> Lookup<'a> {
        let mut node = self.node;
        loop {
            if let Some(slot) = node.slot(&key) {
                return Lookup::Slot(node, Arc::clone(slot));
            }
            if let Some(required) = node.pending_restriction(&key) {
                return Lookup::Pending(required);
            }
            match &node.parent {
                Some(parent) => node = parent,
                None => return Lookup::Missing,
            }
        }
    }

    fn check_cycle(&self, key: TypeKey) -> Result<()> {
        match self.path {
            Some(path) if path.contains(key) => {
                Err(StepwiseError::CircularDependency(path.render(key)))
            }
            _ => Ok(()),
        }
    }

    /// Build or fetch through `slot`, using the scope that owns the slot so
    /// shared instances only ever see dependencies visible at their level.
    fn resolve_slot(&self, owner: &Arc<ScopeNode>, slot: &Slot) -> Result<Instance> {
        let descriptor = slot.descriptor();
        self.check_cycle(descriptor.key)?;
        owner.ensure_live()?;

        let link = PathLink {
            key: descriptor.key,
            parent: self.path,
        };
        let inner = Resolver {
            node: owner,
            path: Some(&link),
        };

        slot.get_or_create(&inner, owner.options.resolve_timeout, |instance| {
            if let Some(disposer) = descriptor.disposer.as_ref().filter(|_| descriptor.is_tracked()) {
                owner.track(descriptor.key.name(), instance, disposer);
            }
        })
    }
}

/// Convert a slot's instance to the requested exposed type.
fn project<T>(slot: &Slot, key: TypeKey, instance: &Instance) -> Result<Arc<T>>
where
    T: ?Sized + Send + Sync + 'static,
{
    let descriptor = slot.descriptor();
    descriptor
        .exposed
        .iter()
        .find(|(k, _)| *k == key)
        .and_then(|(_, projection)| projection(instance))
        .and_then(|boxed| boxed.downcast::<Arc<T>>().ok())
        .map(|arc| *arc)
        .ok_or_else(|| {
            StepwiseError::Other(anyhow::anyhow!(
                "registration of '{}' cannot produce '{}'",
                descriptor.key.name(),
                key.name()
            ))
        })
}
