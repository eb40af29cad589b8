// src/container/registration.rs

use std::marker::PhantomData;
use std::sync::Arc;

use crate::container::descriptor::{project_as, DependencyDescriptor, Instance, TypeKey};
use crate::container::disposal::{disposer_for, Dispose};
use crate::container::lifetime::{InstanceScope, LifetimeScope};
use crate::container::resolver::{Injectable, Resolver};

/// Collects the registrations of one scope.
#[derive(Default)]
pub struct ContainerConfigurator {
    descriptors: Vec<DependencyDescriptor>,
}

impl ContainerConfigurator {
    /// Register `T`, built by `factory` according to `scope`.
    pub fn register<T, F>(&mut self, scope: InstanceScope, factory: F) -> RegistrationBuilder<'_, T>
    where
        T: Send + Sync + 'static,
        F: Fn(&Resolver<'_>) -> anyhow::Result<T> + Send + Sync + 'static,
    {
        let factory = Arc::new(move |r: &Resolver<'_>| -> anyhow::Result<Instance> {
            let instance: Instance = Arc::new(factory(r)?);
            Ok(instance)
        });
        self.push(DependencyDescriptor::new::<T>(scope, factory))
    }

    /// Register an already-built instance. The container hands it out but
    /// never disposes it.
    pub fn register_instance<T>(&mut self, instance: Arc<T>) -> RegistrationBuilder<'_, T>
    where
        T: Send + Sync + 'static,
    {
        let factory = Arc::new(move |_: &Resolver<'_>| -> anyhow::Result<Instance> {
            let instance: Instance = Arc::clone(&instance) as Instance;
            Ok(instance)
        });
        let mut descriptor = DependencyDescriptor::new::<T>(InstanceScope::Single, factory);
        descriptor.externally_owned = true;
        self.push(descriptor)
    }

    /// Register an [`Injectable`] type, picking up its disposal hook.
    pub fn register_injectable<T: Injectable>(&mut self, scope: InstanceScope) -> RegistrationBuilder<'_, T> {
        let builder = self.register::<T, _>(scope, T::construct);
        match T::disposer() {
            Some(dispose) => builder.disposed_with(dispose),
            None => builder,
        }
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    pub(crate) fn into_descriptors(self) -> Vec<DependencyDescriptor> {
        self.descriptors
    }

    fn push<T>(&mut self, descriptor: DependencyDescriptor) -> RegistrationBuilder<'_, T> {
        self.descriptors.push(descriptor);
        let index = self.descriptors.len() - 1;
        RegistrationBuilder {
            descriptor: &mut self.descriptors[index],
            _marker: PhantomData,
        }
    }
}

/// Refines the registration that was just added.
pub struct RegistrationBuilder<'a, T> {
    descriptor: &'a mut DependencyDescriptor,
    _marker: PhantomData<fn() -> T>,
}

impl<T> RegistrationBuilder<'_, T>
where
    T: Send + Sync + 'static,
{
    /// Also expose the instance as `U`, usually a trait object:
    /// `.as_alias::<dyn Store>(|s| s)`.
    pub fn as_alias<U>(self, map: impl Fn(Arc<T>) -> Arc<U> + Send + Sync + 'static) -> Self
    where
        U: ?Sized + Send + Sync + 'static,
    {
        let key = TypeKey::of::<U>();
        self.descriptor.exposed.retain(|(k, _)| *k != key);
        self.descriptor.exposed.push((key, project_as::<T, U>(map)));
        self
    }

    /// Only create slots in scopes at `level`; shallower scopes report a
    /// scope mismatch instead of building the instance.
    pub fn restricted_to(self, level: LifetimeScope) -> Self {
        self.descriptor.lifetime = Some(level);
        self
    }

    /// Hand instances out without ever disposing them.
    pub fn externally_owned(self) -> Self {
        self.descriptor.externally_owned = true;
        self
    }

    pub fn disposed_with(self, dispose: impl Fn(&T) -> anyhow::Result<()> + Send + Sync + 'static) -> Self {
        self.descriptor.disposer = Some(disposer_for::<T, _>(dispose));
        self
    }

    pub fn descriptor(&self) -> &DependencyDescriptor {
        self.descriptor
    }
}

impl<T> RegistrationBuilder<'_, T>
where
    T: Dispose + 'static,
{
    /// Dispose instances through their [`Dispose`] impl.
    pub fn disposable(self) -> Self {
        self.disposed_with(|value: &T| value.dispose())
    }
}
