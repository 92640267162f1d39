//! Gateway configuration auditing library.
//!
//! Projects a declarative gateway configuration into a small numeric
//! snapshot, evaluates best-practice rules against it, and provides a compact
//! binary encoding of the snapshot for storage or shipping to analytics.

pub mod audit;
pub mod codec;
pub mod config;
pub mod observability;
pub mod parser;
pub mod snapshot;

pub use audit::{audit, audit_file, audit_snapshot, AuditResult, Recommendation, Severity};
pub use codec::{decode, encode, CodecError};
pub use config::{AuditSettings, ConfigError, ServiceConfig};
pub use parser::parse;
pub use snapshot::Service;
