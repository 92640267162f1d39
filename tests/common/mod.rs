//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::path::PathBuf;

use gateway_audit::config::{load_config, ServiceConfig};
use gateway_audit::AuditResult;

/// Path of a file under `tests/fixtures`.
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Load, validate and normalize a fixture configuration.
pub fn load_fixture(name: &str) -> ServiceConfig {
    load_config(&fixture_path(name)).unwrap()
}

/// Fired rule IDs, in report order.
pub fn rule_ids(result: &AuditResult) -> Vec<String> {
    result.recommendations.iter().map(|r| r.rule.clone()).collect()
}

/// The rules the `example1.json` fixture triggers with every severity enabled.
pub const EXAMPLE1_ALL: &[&str] = &[
    "1.1.1", "1.1.2", "2.1.3", "2.1.7", "2.1.8", "2.1.9", "2.2.1", "2.2.2", "2.2.3", "2.2.4",
    "2.3.1", "3.1.1", "3.1.3", "3.3.1", "3.3.2", "3.3.3", "3.3.4", "4.1.1", "4.1.3", "4.3.1",
    "5.1.1", "5.1.2", "5.1.3", "5.1.4", "5.1.5", "5.1.6", "5.1.7", "7.1.3", "7.1.7", "7.3.1",
];
