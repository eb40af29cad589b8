// src/scenario/step.rs

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;

use crate::exec::StepContext;

/// How a step body can end other than by passing.
///
/// Any error convertible into `anyhow::Error` becomes a [`StepError::Failure`],
/// so step bodies can use `?` freely.
pub enum StepError {
    /// Stop the current step but keep the scenario non-failing.
    Bypass(String),
    /// Exclude the scenario from pass/fail accounting; remaining steps do not run.
    Ignore(String),
    /// Anything else.
    Failure(anyhow::Error),
}

impl StepError {
    pub fn bypass(reason: impl Into<String>) -> Self {
        StepError::Bypass(reason.into())
    }

    pub fn ignore(reason: impl Into<String>) -> Self {
        StepError::Ignore(reason.into())
    }
}

impl<E> From<E> for StepError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        StepError::Failure(err.into())
    }
}

impl fmt::Debug for StepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepError::Bypass(r) => f.debug_tuple("Bypass").field(r).finish(),
            StepError::Ignore(r) => f.debug_tuple("Ignore").field(r).finish(),
            StepError::Failure(e) => f.debug_tuple("Failure").field(e).finish(),
        }
    }
}

impl fmt::Display for StepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepError::Bypass(r) => write!(f, "step bypassed: {r}"),
            StepError::Ignore(r) => write!(f, "step ignored: {r}"),
            StepError::Failure(e) => write!(f, "{e:#}"),
        }
    }
}

pub type StepBody =
    Arc<dyn Fn(StepContext) -> BoxFuture<'static, Result<(), StepError>> + Send + Sync>;

/// One named step of a scenario method.
#[derive(Clone)]
pub struct StepDefinition {
    name: String,
    body: StepBody,
}

impl StepDefinition {
    pub fn new<F, Fut>(name: impl Into<String>, body: F) -> Self
    where
        F: Fn(StepContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), StepError>> + Send + 'static,
    {
        Self {
            name: name.into(),
            body: Arc::new(move |ctx| Box::pin(body(ctx))),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn invoke(&self, ctx: StepContext) -> BoxFuture<'static, Result<(), StepError>> {
        (self.body)(ctx)
    }
}

impl fmt::Debug for StepDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepDefinition")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}
