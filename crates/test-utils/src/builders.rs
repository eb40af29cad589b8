#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use stepwise::clock::mock::ManualClock;
use stepwise::config::{ConfigFile, RawConfigFile};
use stepwise::exec::StepContext;
use stepwise::scenario::{Fixture, FixtureDescriptor, ScenarioCase, ScenarioMethod, StepError};

/// Fixture with no state.
#[derive(Debug, Default)]
pub struct EmptyFixture;

impl Fixture for EmptyFixture {}

/// Fixture whose disposal always fails.
#[derive(Debug, Default)]
pub struct FailingDisposeFixture;

impl Fixture for FailingDisposeFixture {
    fn dispose(&self) -> anyhow::Result<()> {
        anyhow::bail!("fixture teardown exploded")
    }
}

/// Descriptor for [`EmptyFixture`] under `key`.
pub fn empty_fixture(key: &str) -> Arc<FixtureDescriptor> {
    Arc::new(FixtureDescriptor::new(key, |_| Ok(EmptyFixture)))
}

/// What a scripted step does when invoked.
#[derive(Debug, Clone)]
pub enum StepScript {
    Pass,
    Bypass(&'static str),
    Ignore(&'static str),
    Fail(&'static str),
    Panic(&'static str),
    Sleep(Duration),
    Comment(&'static str),
}

/// Builder for a [`ScenarioMethod`] made of scripted steps.
pub struct MethodBuilder {
    method: ScenarioMethod,
    counter: usize,
}

impl MethodBuilder {
    pub fn new(key: &str) -> Self {
        Self {
            method: ScenarioMethod::new(key),
            counter: 0,
        }
    }

    pub fn step(mut self, script: StepScript) -> Self {
        self.counter += 1;
        let name = format!("step {} ({:?})", self.counter, script);
        self.method = self.method.step(name, move |ctx: StepContext| {
            let script = script.clone();
            async move { run_script(&ctx, script).await }
        });
        self
    }

    pub fn passing(self, n: usize) -> Self {
        (0..n).fold(self, |b, _| b.step(StepScript::Pass))
    }

    pub fn build(self) -> Arc<ScenarioMethod> {
        Arc::new(self.method)
    }
}

async fn run_script(ctx: &StepContext, script: StepScript) -> Result<(), StepError> {
    match script {
        StepScript::Pass => Ok(()),
        StepScript::Bypass(reason) => Err(StepError::bypass(reason)),
        StepScript::Ignore(reason) => Err(StepError::ignore(reason)),
        StepScript::Fail(message) => Err(anyhow::anyhow!(message).into()),
        StepScript::Panic(message) => panic!("{message}"),
        StepScript::Sleep(d) => {
            tokio::time::sleep(d).await;
            Ok(())
        }
        StepScript::Comment(text) => {
            ctx.comment(text);
            Ok(())
        }
    }
}

/// One case of `method` on `fixture`.
pub fn case(fixture: &Arc<FixtureDescriptor>, method: &Arc<ScenarioMethod>) -> ScenarioCase {
    ScenarioCase::new(Arc::clone(fixture), Arc::clone(method))
}

/// Validated config with the given parallelism cap and resolve timeout.
pub fn config(max_parallel: Option<usize>, resolve_timeout: &str) -> ConfigFile {
    let mut raw = RawConfigFile::default();
    raw.runner.max_parallel_scenarios = max_parallel;
    raw.container.resolve_timeout = resolve_timeout.to_string();
    ConfigFile::try_from(raw).expect("Failed to build valid config from builder")
}

/// Clock starting at the Unix epoch that never moves on its own.
pub fn manual_clock() -> Arc<ManualClock> {
    Arc::new(ManualClock::default())
}
