//! Tracing subscriber setup for the binary.

use std::sync::Once;

use tracing_error::ErrorLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::formatter::TickFormatter;

/// Used when `RUST_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "warn,pacman_engine=info";

static INIT: Once = Once::new();

/// Installs the global subscriber. Later calls are no-ops.
pub fn setup_logging() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
        let installed = tracing_subscriber::registry()
            .with(fmt::layer().event_format(TickFormatter))
            .with(filter)
            .with(ErrorLayer::default())
            .try_init();

        if let Err(error) = installed {
            eprintln!("Could not install tracing subscriber: {error}");
        }
    });
}
