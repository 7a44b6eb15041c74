//! Logging setup
//!
//! The SDK only emits `tracing` events; embedders that already install a
//! subscriber can skip this module. [`init_tracing`] is a convenience for
//! binaries and tests.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Default directive when neither `RUST_LOG` nor a filter is supplied.
pub const DEFAULT_FILTER: &str = "webex_infra=info,webex_core=info";

/// Install a global subscriber with an [`EnvFilter`] and fmt or JSON output.
///
/// `RUST_LOG` wins over `filter`; an unparsable `filter` falls back to
/// [`DEFAULT_FILTER`]. Returns `false` when a global subscriber was already
/// installed, in which case nothing changes.
pub fn init_tracing(filter: &str, json: bool) -> bool {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(filter))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let json_layer = json.then(|| fmt::layer().json().with_target(true));
    let text_layer = (!json).then(|| fmt::layer().with_target(true));

    let installed =
        tracing_subscriber::registry().with(env_filter).with(json_layer).with(text_layer).try_init();

    match installed {
        Ok(()) => {
            tracing::debug!(json, "Tracing subscriber installed");
            true
        }
        Err(_) => false,
    }
}
