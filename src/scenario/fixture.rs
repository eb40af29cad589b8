// src/scenario/fixture.rs

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::container::Resolver;

/// Object instance on which a scenario's steps execute.
///
/// One fixture is created per scenario case, through the scenario's own
/// dependency scope, and disposed once the scenario has finished.
pub trait Fixture: AsAny + Send + Sync {
    /// Release resources held by the fixture. Called exactly once, after the
    /// steps have run and before "scenario finished" is reported.
    fn dispose(&self) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Downcasting support for trait objects.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl dyn Fixture {
    pub fn downcast_ref<T: Fixture>(&self) -> Option<&T> {
        let any: &dyn Any = AsAny::as_any(self);
        any.downcast_ref::<T>()
    }
}

pub type FixtureFactory =
    Arc<dyn Fn(&Resolver<'_>) -> anyhow::Result<Arc<dyn Fixture>> + Send + Sync>;

/// Describes one fixture "type": the unit scenarios are grouped into features by.
#[derive(Clone)]
pub struct FixtureDescriptor {
    key: String,
    name: String,
    description: Option<String>,
    labels: Vec<String>,
    categories: Vec<String>,
    factory: FixtureFactory,
}

impl FixtureDescriptor {
    /// Create a descriptor identified by `key`; the feature name defaults to the key.
    pub fn new<T, F>(key: impl Into<String>, factory: F) -> Self
    where
        T: Fixture,
        F: Fn(&Resolver<'_>) -> anyhow::Result<T> + Send + Sync + 'static,
    {
        let key = key.into();
        Self {
            name: key.clone(),
            key,
            description: None,
            labels: Vec::new(),
            categories: Vec::new(),
            factory: Arc::new(move |r| {
                let fixture: Arc<dyn Fixture> = Arc::new(factory(r)?);
                Ok(fixture)
            }),
        }
    }

    /// Descriptor keyed by the Rust type name of `T`.
    pub fn of<T, F>(factory: F) -> Self
    where
        T: Fixture,
        F: Fn(&Resolver<'_>) -> anyhow::Result<T> + Send + Sync + 'static,
    {
        Self::new(std::any::type_name::<T>(), factory)
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn described(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.labels.push(label.into());
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.categories.push(category.into());
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn create(&self, resolver: &Resolver<'_>) -> anyhow::Result<Arc<dyn Fixture>> {
        (self.factory)(resolver)
    }
}

impl fmt::Debug for FixtureDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FixtureDescriptor")
            .field("key", &self.key)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}
