//! Tracing initialization for pipeline hosts.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize tracing with an env-driven filter.
///
/// `RUST_LOG` wins when set; otherwise pipeline crates log at `info`.
/// Safe to call more than once; later calls are no-ops.
pub fn init_tracing() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("rallycut=info"));

    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(env_filter)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        init_tracing();
        init_tracing();
    }
}
