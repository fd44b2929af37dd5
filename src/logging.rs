//! Tracing initialization.
//!
//! Two output modes:
//! - **JSON mode** (`json = true`): one JSON object per event, for log
//!   aggregation on validator hosts.
//! - **Pretty mode** (`json = false`): human-readable output for local replay.
//!
//! `RUST_LOG` wins over the configured filter when it is set.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Initialize the global tracing subscriber.
///
/// # Arguments
///
/// * `json` - Emit JSON lines instead of pretty output
/// * `filter` - `EnvFilter` directive used when `RUST_LOG` is unset
///
/// Returns an error if a global subscriber is already installed.
pub fn init_tracing(json: bool, filter: &str) -> Result<(), tracing_subscriber::util::TryInitError> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));
    let registry = tracing_subscriber::registry().with(env_filter);

    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_target(true))
            .try_init()
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().pretty().with_target(true))
            .try_init()
    }
}
