// tests/clock.rs

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use stepwise::clock::mock::ManualClock;
use stepwise::clock::{Clock, EventTime, ExecutionTime, MonotonicClock};
use stepwise::exec::StepContext;
use stepwise::scenario::{ScenarioMethod, StepError};
use stepwise::Runner;
use stepwise_test_utils::builders::{case, empty_fixture};
use tokio_util::sync::CancellationToken;

#[test]
fn execution_time_is_order_insensitive() {
    let start = DateTime::<Utc>::UNIX_EPOCH;
    let early = EventTime::new(start, Duration::from_millis(100));
    let late = EventTime::new(start, Duration::from_millis(350));

    let forward = ExecutionTime::between(early, late);
    let backward = ExecutionTime::between(late, early);

    assert_eq!(forward, backward);
    assert_eq!(forward.duration, Duration::from_millis(250));
    assert_eq!(forward.start, start + TimeDelta::milliseconds(100));
    assert_eq!(forward.end(), start + TimeDelta::milliseconds(350));
    assert_eq!(late - early, forward);
}

#[test]
fn manual_clock_only_moves_when_told() {
    let clock = ManualClock::default();
    let t0 = clock.now();
    clock.advance(Duration::from_secs(2));
    let t1 = clock.now();

    assert_eq!(t1.offset - t0.offset, Duration::from_secs(2));
    clock.set(Duration::from_millis(10));
    assert_eq!(clock.now().offset, Duration::from_millis(10));
}

#[test]
fn monotonic_clock_never_goes_backwards() {
    let clock = MonotonicClock::new();
    let a = clock.now();
    let b = clock.now();
    assert!(b.offset >= a.offset);
    assert_eq!(a.start, b.start);
}

#[tokio::test]
async fn scenario_and_run_times_come_from_the_injected_clock() -> Result<(), Box<dyn std::error::Error>> {
    let clock = Arc::new(ManualClock::default());
    let ticking = Arc::clone(&clock);
    let method = Arc::new(ScenarioMethod::new("takes_time").step("wait", move |_ctx: StepContext| {
        let clock = Arc::clone(&ticking);
        async move {
            clock.advance(Duration::from_secs(3));
            Ok::<(), StepError>(())
        }
    }));
    let fixture = empty_fixture("timed");

    let runner = Runner::builder()
        .with_clock(Arc::clone(&clock) as Arc<dyn Clock>)
        .build()?;
    let result = runner
        .execute(vec![case(&fixture, &method)], CancellationToken::new())
        .await?;

    let scenario = result.scenario("takes time").expect("scenario present");
    assert_eq!(scenario.steps()[0].time.map(|t| t.duration), Some(Duration::from_secs(3)));
    assert_eq!(scenario.time().map(|t| t.duration), Some(Duration::from_secs(3)));
    assert_eq!(result.duration(), Duration::from_secs(3));
    assert_eq!(result.time().start, DateTime::<Utc>::UNIX_EPOCH);
    Ok(())
}
