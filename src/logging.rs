// Logging initialization via `tracing` / `tracing-subscriber`.

use tracing_subscriber::{fmt, EnvFilter};

/// Initialize the subscriber. The level comes from `RUST_LOG` and defaults
/// to `info`, e.g. `RUST_LOG=ngezi_report=debug` for more detail.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).with_target(false).init();
}
