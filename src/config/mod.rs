//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (JSON/TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (structural checks)
//!     → ServiceConfig::normalize (inherit service defaults)
//!     → ServiceConfig (immutable, handed to parser / audit)
//!
//! settings file (TOML)
//!     → loader.rs
//!     → AuditSettings (exclusions, severities)
//! ```
//!
//! # Design Decisions
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from structural checks
//! - Extension sections stay loosely typed (`serde_json::Value`)

pub mod loader;
pub mod schema;
pub mod settings;
pub mod validation;

pub use loader::{from_json_str, load_config, load_settings, ConfigError};
pub use schema::{
    AsyncAgentConfig, BackendConfig, ClientTlsConfig, EndpointConfig, ExtraConfig, ServiceConfig,
    TlsConfig,
};
pub use settings::AuditSettings;
pub use validation::ValidationError;
