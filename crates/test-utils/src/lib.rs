pub mod builders;
pub mod recording_notifier;
pub mod scripted_executor;

use std::future::Future;
use std::sync::Once;
use std::time::Duration;

use tracing_subscriber::{fmt, EnvFilter};

static INIT: Once = Once::new();

/// Install a test-writer subscriber once per test binary.
///
/// Output is captured by the harness and shown only for failing tests.
/// `RUST_LOG` overrides the default of `stepwise=info`, e.g.
/// `RUST_LOG=stepwise::container=trace`.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("stepwise=info"));

        // A subscriber installed by another harness is fine to keep.
        let _ = fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .try_init();
    });
}

/// Default bound for a whole run in integration tests.
pub const RUN_TIMEOUT: Duration = Duration::from_secs(5);

/// Await `f`, failing the test if it takes longer than [`RUN_TIMEOUT`].
pub async fn with_timeout<F, T>(f: F) -> T
where
    F: Future<Output = T>,
{
    with_timeout_of(RUN_TIMEOUT, f).await
}

/// Await `f`, failing the test if it takes longer than `limit`. A hang here
/// usually means a scenario never released its parallelism permit or a
/// container slot guard.
pub async fn with_timeout_of<F, T>(limit: Duration, f: F) -> T
where
    F: Future<Output = T>,
{
    match tokio::time::timeout(limit, f).await {
        Ok(value) => value,
        Err(_) => panic!("run did not finish within {limit:?}"),
    }
}
