// src/errors.rs

//! Crate-wide error type and result alias.
//!
//! User-supplied callbacks (factories, step bodies, disposers) return
//! `anyhow::Result`; everything the engine and container raise themselves is
//! a [`StepwiseError`].

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StepwiseError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Type '{0}' is registered more than once in the same scope")]
    DuplicateRegistration(String),

    #[error("Type '{0}' is not registered and cannot be constructed implicitly")]
    UnregisteredDependency(String),

    #[error("Type '{type_name}' is only resolvable within a {required} scope (current scope: {current})")]
    ScopeMismatch {
        type_name: String,
        required: String,
        current: String,
    },

    #[error("Circular dependency detected while resolving '{0}'")]
    CircularDependency(String),

    #[error("Invalid scope: {0}")]
    InvalidScope(String),

    #[error("Scope has already been disposed")]
    Disposed,

    #[error("Failed to construct '{type_name}': {source}")]
    Construction {
        type_name: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Failed to dispose '{type_name}': {source}")]
    Disposal {
        type_name: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Unsupported: {0}")]
    Unsupported(String),

    #[error("{} errors occurred: {}", .0.len(), join_messages(.0))]
    Aggregate(Vec<StepwiseError>),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

fn join_messages(errors: &[StepwiseError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

impl StepwiseError {
    /// Wrap an error returned by a user factory. Container errors raised by a
    /// nested resolution pass through unchanged so their kind stays visible.
    pub(crate) fn from_factory(type_name: &str, err: anyhow::Error) -> Self {
        match err.downcast::<StepwiseError>() {
            Ok(inner) => inner,
            Err(source) => StepwiseError::Construction {
                type_name: type_name.to_string(),
                source,
            },
        }
    }

    /// Collapse a list of collected failures: none is `Ok`, one is returned
    /// as-is, several become an [`StepwiseError::Aggregate`].
    pub fn collect(mut errors: Vec<StepwiseError>) -> Result<()> {
        match errors.len() {
            0 => Ok(()),
            1 => Err(errors.remove(0)),
            _ => Err(StepwiseError::Aggregate(errors)),
        }
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, StepwiseError>;
