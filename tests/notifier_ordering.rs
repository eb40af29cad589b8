// tests/notifier_ordering.rs

use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use stepwise::notify::{CompositeNotifier, ProgressNotifier};
use stepwise::types::ExecutionStatus;
use stepwise::Runner;
use stepwise_test_utils::builders::{case, empty_fixture, MethodBuilder, StepScript};
use stepwise_test_utils::recording_notifier::{Event, RecordingNotifier};
use stepwise_test_utils::{init_tracing, with_timeout};
use tokio_util::sync::CancellationToken;

type TestResult = Result<(), Box<dyn Error>>;

/// Within one scenario: start, then step events in order, then finish.
fn assert_scenario_stream(events: &[Event], scenario: &str, steps: usize) {
    assert_eq!(
        events.first(),
        Some(&Event::ScenarioStarting {
            scenario: scenario.to_string()
        }),
        "stream of {scenario}: {events:?}"
    );
    assert!(
        matches!(events.last(), Some(Event::ScenarioFinished { .. })),
        "stream of {scenario}: {events:?}"
    );

    let mut expected_step = 1;
    let mut open = false;
    for event in &events[1..events.len() - 1] {
        match event {
            Event::StepStarting { step, .. } => {
                assert!(!open, "step started while another was open: {events:?}");
                assert_eq!(*step, expected_step);
                open = true;
            }
            Event::StepCommented { step, .. } => {
                assert!(open);
                assert_eq!(*step, expected_step);
            }
            Event::StepFinished { step, .. } => {
                assert!(open);
                assert_eq!(*step, expected_step);
                open = false;
                expected_step += 1;
            }
            other => panic!("unexpected event inside scenario stream: {other:?}"),
        }
    }
    assert_eq!(expected_step - 1, steps);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn per_scenario_event_order_holds_under_concurrency() -> TestResult {
    init_tracing();

    let fixture_a = empty_fixture("alpha");
    let fixture_b = empty_fixture("beta");

    let mut cases = Vec::new();
    for i in 0..6 {
        let method = MethodBuilder::new(&format!("scenario_{i}"))
            .step(StepScript::Sleep(Duration::from_millis(5 * (i % 3))))
            .step(StepScript::Comment("halfway"))
            .step(StepScript::Pass)
            .build();
        let fixture = if i % 2 == 0 { &fixture_a } else { &fixture_b };
        cases.push(case(fixture, &method));
    }

    let notifier = Arc::new(RecordingNotifier::new());
    let runner = Runner::builder()
        .with_notifier(Arc::clone(&notifier) as Arc<dyn ProgressNotifier>)
        .build()?;
    let result = with_timeout(runner.execute(cases, CancellationToken::new())).await?;
    assert_eq!(result.counts().passed, 6);

    for i in 0..6 {
        let name = format!("scenario {i}");
        assert_scenario_stream(&notifier.scenario_events(&name), &name, 3);
    }

    let events = notifier.events();
    assert_eq!(events.first(), Some(&Event::RunStarting { scenarios: 6 }));
    assert_eq!(
        events.last(),
        Some(&Event::RunFinished {
            status: ExecutionStatus::Passed
        })
    );

    // A feature brackets all of its scenarios.
    for feature in ["alpha", "beta"] {
        let start = events
            .iter()
            .position(|e| *e == Event::FeatureStarting { feature: feature.into() })
            .expect("feature start");
        let finish = events
            .iter()
            .position(|e| matches!(e, Event::FeatureFinished { feature: f, .. } if f == feature))
            .expect("feature finish");
        assert!(start < finish);
    }
    Ok(())
}

#[tokio::test]
async fn comments_reach_notifier_and_step_result() -> TestResult {
    init_tracing();

    let fixture = empty_fixture("notes");
    let method = MethodBuilder::new("commented")
        .step(StepScript::Comment("first note"))
        .build();

    let notifier = Arc::new(RecordingNotifier::new());
    let runner = Runner::builder()
        .with_notifier(Arc::clone(&notifier) as Arc<dyn ProgressNotifier>)
        .build()?;
    let result = runner
        .execute(vec![case(&fixture, &method)], CancellationToken::new())
        .await?;

    let scenario = result.scenario("commented").expect("scenario present");
    assert_eq!(scenario.steps()[0].comments, vec!["first note".to_string()]);
    assert!(notifier.events().contains(&Event::StepCommented {
        scenario: "commented".into(),
        step: 1,
        comment: "first note".into(),
    }));
    Ok(())
}

#[tokio::test]
async fn composite_forwards_to_every_notifier_in_order() -> TestResult {
    init_tracing();

    let first = Arc::new(RecordingNotifier::new());
    let second = Arc::new(RecordingNotifier::new());

    let fixture = empty_fixture("fanout");
    let method = MethodBuilder::new("single").passing(1).build();

    let runner = Runner::builder()
        .with_notifier(Arc::clone(&first) as Arc<dyn ProgressNotifier>)
        .with_notifier(Arc::clone(&second) as Arc<dyn ProgressNotifier>)
        .build()?;
    runner
        .execute(vec![case(&fixture, &method)], CancellationToken::new())
        .await?;

    assert!(!first.events().is_empty());
    assert_eq!(first.events(), second.events());

    let composite = CompositeNotifier::new(vec![first.clone() as Arc<dyn ProgressNotifier>]);
    assert_eq!(composite.len(), 1);
    Ok(())
}
