//! Best-practice audit of gateway configurations.
//!
//! # Data Flow
//! ```text
//! ServiceConfig
//!     → parser::parse → Service snapshot
//!     → rules.rs (static registry, one predicate per rule)
//!     → engine.rs (exclusion + severity filter, dotted-ID ordering)
//!     → AuditResult { recommendations, stats }
//! ```
//!
//! # Design Decisions
//! - Rules see only the snapshot, never the raw configuration
//! - Each rule fires at most once per audit
//! - Output order depends on rule IDs only, not on registry order

pub mod engine;
pub mod rules;
pub mod severity;

pub use engine::{audit, audit_file, audit_snapshot, compare_rule_ids, AuditResult, Recommendation};
pub use rules::{find_rule, rules, Rule};
pub use severity::{Severity, UnknownSeverity};
