// src/container/lifetime.rs

use std::fmt;

/// How widely one constructed instance is shared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InstanceScope {
    /// New instance on every resolution.
    Transient,
    /// One instance per scope; every nested scope builds its own.
    Local,
    /// One instance in the scope holding the registration, shared with all
    /// scopes nested under it.
    Single,
    /// One instance per scenario-level scope, shared with scopes nested
    /// under that scenario.
    Scenario,
}

impl InstanceScope {
    /// Whether the slot caches the instance it built.
    pub fn is_cached(self) -> bool {
        !matches!(self, InstanceScope::Transient)
    }

    /// Whether every nested scope needs its own slot for this registration.
    pub fn is_per_scope(self) -> bool {
        matches!(self, InstanceScope::Transient | InstanceScope::Local)
    }

    /// Lifetime restriction implied by the instance scope itself.
    pub fn implied_lifetime(self) -> Option<LifetimeScope> {
        match self {
            InstanceScope::Scenario => Some(LifetimeScope::Scenario),
            _ => None,
        }
    }
}

/// Named nesting level of a container scope.
///
/// The root container is always `Global`; scenario execution opens a
/// `Scenario` scope under it and steps may open `Local` scopes below that.
/// `Named` levels allow hosts to add their own anchors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifetimeScope {
    Global,
    Scenario,
    Local,
    Named(&'static str),
}

impl fmt::Display for LifetimeScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LifetimeScope::Global => f.write_str("global"),
            LifetimeScope::Scenario => f.write_str("scenario"),
            LifetimeScope::Local => f.write_str("local"),
            LifetimeScope::Named(name) => f.write_str(name),
        }
    }
}
