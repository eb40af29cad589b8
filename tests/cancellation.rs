// tests/cancellation.rs

use std::error::Error;
use std::sync::Arc;

use stepwise::engine::CANCELLED_DETAIL;
use stepwise::exec::StepContext;
use stepwise::notify::ProgressNotifier;
use stepwise::scenario::{ScenarioMethod, StepError};
use stepwise::types::ExecutionStatus;
use stepwise::Runner;
use stepwise_test_utils::builders::{case, config, empty_fixture, MethodBuilder};
use stepwise_test_utils::recording_notifier::{Event, RecordingNotifier};
use stepwise_test_utils::{init_tracing, with_timeout};
use tokio_util::sync::CancellationToken;

type TestResult = Result<(), Box<dyn Error>>;

#[tokio::test]
async fn cancelled_before_start_reports_every_case_as_not_run() -> TestResult {
    init_tracing();

    let fixture = empty_fixture("cancelled");
    let first = MethodBuilder::new("first").passing(1).build();
    let second = MethodBuilder::new("second").passing(1).build();

    let notifier = Arc::new(RecordingNotifier::new());
    let runner = Runner::builder()
        .with_notifier(Arc::clone(&notifier) as Arc<dyn ProgressNotifier>)
        .build()?;

    let cancel = CancellationToken::new();
    cancel.cancel();
    let result = runner
        .execute(
            vec![case(&fixture, &first), case(&fixture, &second), case(&fixture, &first).with_argument("n", 2)],
            cancel,
        )
        .await?;

    assert_eq!(result.scenario_count(), 3);
    assert_eq!(result.counts().not_run, 3);
    assert_eq!(result.status(), ExecutionStatus::NotRun);
    assert!(result
        .scenarios()
        .all(|s| s.status_details() == Some(CANCELLED_DETAIL)));

    assert_eq!(
        notifier.count(|e| matches!(e, Event::ScenarioStarting { .. } | Event::ScenarioFinished { .. })),
        0
    );
    assert_eq!(notifier.count(|e| matches!(e, Event::FeatureFinished { .. })), 1);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn cancellation_during_a_run_skips_scenarios_not_yet_started() -> TestResult {
    init_tracing();

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    let method = Arc::new(
        ScenarioMethod::new("stops_the_run")
            .step("cancel", move |_ctx: StepContext| {
                let trigger = trigger.clone();
                async move {
                    trigger.cancel();
                    Ok::<(), StepError>(())
                }
            })
            .step("after cancel", |_ctx: StepContext| async { Ok::<(), StepError>(()) }),
    );
    let fixture = empty_fixture("limited");

    let cases = (0..3)
        .map(|i| case(&fixture, &method).with_argument("n", i))
        .collect();

    let runner = Runner::builder().with_config(config(Some(1), "5s")).build()?;
    let result = with_timeout(runner.execute(cases, cancel)).await?;

    let counts = result.counts();
    assert_eq!(counts.total(), 3);
    assert_eq!(counts.passed, 1);
    assert_eq!(counts.not_run, 2);

    let started = result
        .scenarios()
        .find(|s| s.status() == ExecutionStatus::Passed)
        .expect("one scenario ran");
    assert_eq!(started.steps()[0].status, ExecutionStatus::Passed);
    assert_eq!(started.steps()[1].status, ExecutionStatus::NotRun);
    assert_eq!(started.steps()[1].status_details.as_deref(), Some(CANCELLED_DETAIL));
    Ok(())
}
