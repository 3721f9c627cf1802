// src/logging.rs
// =============================================================================
// Installs the tracing subscriber used by both binaries.
//
// Logs always go to stderr: the CLI keeps stdout for its progress narrative,
// and the MCP server uses stdout for the protocol itself.
//
// RUST_LOG overrides the default filter, e.g. RUST_LOG=raindrop_guardian=debug
// =============================================================================

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter when RUST_LOG is not set.
pub const DEFAULT_FILTER: &str = "raindrop_guardian=info";

/// Sets up logging once per process. Calling it twice is a no-op.
pub fn init(default_filter: &str) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init();
}
