// tests/run_status_counts.rs

use std::error::Error;
use std::sync::Arc;

use stepwise::notify::ProgressNotifier;
use stepwise::scenario::{Argument, Feature, FixtureDescriptor, ScenarioMethod, StepError};
use stepwise::types::ExecutionStatus;
use stepwise::{Runner, StepwiseError};
use stepwise_test_utils::builders::{case, empty_fixture, EmptyFixture, MethodBuilder, StepScript};
use stepwise_test_utils::recording_notifier::{Event, RecordingNotifier};
use stepwise_test_utils::{init_tracing, with_timeout};
use tokio_util::sync::CancellationToken;

type TestResult = Result<(), Box<dyn Error>>;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn counts_match_input_and_statuses_aggregate_per_level() -> TestResult {
    init_tracing();

    let accounts = empty_fixture("accounts");
    let payments = empty_fixture("payments");

    let pass = MethodBuilder::new("opens_account").passing(2).build();
    let bypass = MethodBuilder::new("reads_statement")
        .step(StepScript::Pass)
        .step(StepScript::Bypass("statement service offline"))
        .build();
    let fail = MethodBuilder::new("rejects_overdraft")
        .step(StepScript::Fail("balance went negative"))
        .build();
    let ignore = MethodBuilder::new("legacy_transfer")
        .step(StepScript::Ignore("not applicable"))
        .build();

    let cases = vec![
        case(&accounts, &pass),
        case(&accounts, &bypass),
        case(&payments, &fail),
        case(&payments, &ignore),
        case(&accounts, &pass).with_argument("currency", "EUR"),
    ];

    let runner = Runner::builder().build()?;
    let result = with_timeout(runner.execute(cases, CancellationToken::new())).await?;

    assert_eq!(result.scenario_count(), 5);
    let counts = result.counts();
    assert_eq!(counts.total(), 5);
    assert_eq!(counts.passed, 2);
    assert_eq!(counts.bypassed, 1);
    assert_eq!(counts.failed, 1);
    assert_eq!(counts.ignored, 1);
    assert_eq!(counts.not_run, 0);

    // Features keep the order in which their fixtures first appeared.
    let names: Vec<_> = result.features().iter().map(|f| f.info().name.clone()).collect();
    assert_eq!(names, vec!["accounts", "payments"]);

    assert_eq!(result.features()[0].status(), ExecutionStatus::Bypassed);
    assert_eq!(result.features()[1].status(), ExecutionStatus::Failed);
    assert_eq!(result.status(), ExecutionStatus::Failed);

    let per_feature = result.per_feature_counts();
    assert_eq!(per_feature[0].1.total(), 3);
    assert_eq!(per_feature[1].1.total(), 2);

    Ok(())
}

#[tokio::test]
async fn ignored_outranks_bypassed_but_not_failed() -> TestResult {
    init_tracing();

    let fixture = empty_fixture("ranking");
    let bypass = MethodBuilder::new("bypassed").step(StepScript::Bypass("skip")).build();
    let ignore = MethodBuilder::new("ignored").step(StepScript::Ignore("n/a")).build();

    let runner = Runner::builder().build()?;
    let result = runner
        .execute(vec![case(&fixture, &bypass), case(&fixture, &ignore)], CancellationToken::new())
        .await?;

    assert_eq!(result.status(), ExecutionStatus::Ignored);
    Ok(())
}

#[tokio::test]
async fn empty_run_is_not_run() -> TestResult {
    init_tracing();

    let notifier = Arc::new(RecordingNotifier::new());
    let runner = Runner::builder()
        .with_notifier(Arc::clone(&notifier) as Arc<dyn ProgressNotifier>)
        .build()?;

    let result = runner.execute(Vec::new(), CancellationToken::new()).await?;

    assert_eq!(result.scenario_count(), 0);
    assert!(result.features().is_empty());
    assert_eq!(result.status(), ExecutionStatus::NotRun);
    assert_eq!(
        notifier.events(),
        vec![
            Event::RunStarting { scenarios: 0 },
            Event::RunFinished {
                status: ExecutionStatus::NotRun
            },
        ]
    );
    Ok(())
}

#[tokio::test]
async fn parameterized_cases_form_one_group() -> TestResult {
    init_tracing();

    let withdraw = ScenarioMethod::new("withdraw_cash").step("dispense", |ctx| async move {
        let amount: u32 = ctx.argument("amount").unwrap_or("0").parse()?;
        if amount > 100 {
            return Err(anyhow::anyhow!("amount {amount} exceeds the daily limit").into());
        }
        Ok::<(), StepError>(())
    });

    let cases = Feature::new(FixtureDescriptor::new("atm", |_| Ok(EmptyFixture)))
        .parameterized(
            withdraw,
            vec![
                vec![Argument::new("amount", 20)],
                vec![Argument::new("amount", 50)],
                vec![Argument::new("amount", 500)],
            ],
        )
        .into_cases();

    let notifier = Arc::new(RecordingNotifier::new());
    let runner = Runner::builder()
        .with_notifier(Arc::clone(&notifier) as Arc<dyn ProgressNotifier>)
        .build()?;
    let result = runner.execute(cases, CancellationToken::new()).await?;

    assert_eq!(result.scenario_count(), 3);
    assert_eq!(result.counts().passed, 2);
    assert_eq!(result.counts().failed, 1);

    let failed = result
        .scenario("withdraw cash [amount: 500]")
        .expect("parameterised case should be named after its arguments");
    assert_eq!(failed.status(), ExecutionStatus::Failed);
    assert!(failed.status_details().unwrap_or("").contains("daily limit"));

    let groups: Vec<_> = notifier
        .events()
        .into_iter()
        .filter(|e| matches!(e, Event::GroupStarting { .. } | Event::GroupFinished { .. }))
        .collect();
    assert_eq!(
        groups,
        vec![
            Event::GroupStarting {
                feature: "atm".into(),
                method: "withdraw_cash".into(),
                cases: 3
            },
            Event::GroupFinished {
                feature: "atm".into(),
                method: "withdraw_cash".into(),
                status: ExecutionStatus::Failed
            },
        ]
    );
    Ok(())
}

#[tokio::test]
async fn conflicting_fixture_keys_fail_before_anything_runs() -> TestResult {
    init_tracing();

    let first = empty_fixture("shared-key");
    let second = empty_fixture("shared-key");
    let method = MethodBuilder::new("anything").passing(1).build();

    let notifier = Arc::new(RecordingNotifier::new());
    let runner = Runner::builder()
        .with_notifier(Arc::clone(&notifier) as Arc<dyn ProgressNotifier>)
        .build()?;

    let err = runner
        .execute(vec![case(&first, &method), case(&second, &method)], CancellationToken::new())
        .await
        .expect_err("two descriptors under one key must be rejected");

    assert!(matches!(err, StepwiseError::ConfigError(_)), "got {err:?}");
    assert!(notifier.events().is_empty());
    Ok(())
}
