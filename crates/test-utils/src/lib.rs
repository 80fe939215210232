//! Shared fixtures for the integration tests.

pub mod builders;
pub mod filters;
pub mod tasks;

use std::sync::Once;
use std::time::Duration;

use logflow::logging::{LOG_ENV, build_filter};
use tracing_subscriber::fmt;

static INIT: Once = Once::new();

/// Install a test subscriber once per test binary.
///
/// Honors `LOGFLOW_LOG` like the binary does. Output goes through the test
/// writer, so it only shows for failing tests or with `--nocapture`.
pub fn init_tracing() {
    INIT.call_once(|| {
        let env = std::env::var(LOG_ENV).ok();
        // Another harness may already have installed one.
        let _ = fmt()
            .with_env_filter(build_filter(None, env.as_deref()))
            .with_test_writer()
            .with_target(true)
            .try_init();
    });
}

/// Await `f`, failing the test if it takes longer than five seconds.
pub async fn with_timeout<F, T>(f: F) -> T
where
    F: std::future::Future<Output = T>,
{
    tokio::time::timeout(Duration::from_secs(5), f)
        .await
        .expect("test timed out after 5 seconds")
}
