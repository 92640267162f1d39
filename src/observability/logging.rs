//! Structured logging.
//!
//! # Responsibilities
//! - Install the global tracing subscriber
//! - Resolve the log filter from `RUST_LOG` or a default directive

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default directive when `RUST_LOG` is unset.
pub const DEFAULT_DIRECTIVE: &str = "gateway_audit=info";

/// Install the global subscriber. Logs go to stderr so reports on stdout stay
/// machine-readable.
///
/// Calling this twice is harmless: the second call leaves the first
/// subscriber in place.
pub fn init_logging(default_directive: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();

    if installed.is_err() {
        tracing::debug!("Tracing subscriber already installed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_twice_is_harmless() {
        init_logging(DEFAULT_DIRECTIVE);
        init_logging("debug");
        tracing::info!("still logging");
    }
}
