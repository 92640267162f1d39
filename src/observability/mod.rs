//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! parser / audit / codec
//!     → tracing events (debug: extractor fallbacks, fired rules;
//!                       info: audit summary, codec sizes)
//!     → logging.rs subscriber (EnvFilter + fmt layer)
//!     → stderr
//! ```
//!
//! # Design Decisions
//! - The library only emits events; installing a subscriber is up to the binary
//! - `RUST_LOG` overrides the default directive

pub mod logging;

pub use logging::init_logging;
