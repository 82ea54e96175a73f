//! Logging and tracing utilities

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber
///
/// Filtering follows `RUST_LOG` and defaults to `info`. Output goes to
/// stderr, since stdout carries MCP protocol frames.
pub fn init_tracing() {
    init_tracing_with_default("info");
}

/// Initialize the tracing subscriber with a fallback filter directive
pub fn init_tracing_with_default(default_directive: &str) {
    let _ = tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_directive)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}
