//! Rule evaluation, filtering and ordering.

use std::cmp::Ordering;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::{load_config, AuditSettings, ConfigError, ServiceConfig};
use crate::parser::parse;
use crate::snapshot::Service;

use super::rules::rules;
use super::Severity;

/// One fired rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub rule: String,
    pub severity: Severity,
    pub message: String,
}

/// Outcome of an audit: ordered recommendations plus the snapshot they were
/// computed from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditResult {
    pub recommendations: Vec<Recommendation>,
    pub stats: Service,
}

impl AuditResult {
    /// IDs of the fired rules, in report order.
    pub fn rule_ids(&self) -> Vec<&str> {
        self.recommendations.iter().map(|r| r.rule.as_str()).collect()
    }
}

/// Compare dotted rule IDs segment by segment as integers.
///
/// A prefix sorts first ("2.1" < "2.1.3"). Segments that are not integers
/// compare as text.
pub fn compare_rule_ids(a: &str, b: &str) -> Ordering {
    let mut left = a.split('.');
    let mut right = b.split('.');
    loop {
        match (left.next(), right.next()) {
            (Some(x), Some(y)) => {
                let ordering = match (x.parse::<u64>(), y.parse::<u64>()) {
                    (Ok(x), Ok(y)) => x.cmp(&y),
                    _ => x.cmp(y),
                };
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (None, None) => return Ordering::Equal,
        }
    }
}

/// Evaluate every allowed rule against a snapshot.
pub fn audit_snapshot(service: &Service, settings: &AuditSettings) -> Vec<Recommendation> {
    let mut fired: Vec<_> = rules()
        .iter()
        .filter(|rule| settings.allows(rule.id, rule.severity))
        .filter(|rule| rule.fires(service))
        .collect();
    fired.sort_by(|a, b| compare_rule_ids(a.id, b.id));

    fired
        .into_iter()
        .map(|rule| {
            tracing::debug!(rule = rule.id, severity = %rule.severity, "Rule fired");
            Recommendation {
                rule: rule.id.to_string(),
                severity: rule.severity,
                message: rule.message.to_string(),
            }
        })
        .collect()
}

/// Audit a loaded configuration.
///
/// # Preconditions
/// `config` should be normalized, as [`load_config`] and
/// [`from_json_str`](crate::config::from_json_str) leave it. See [`parse`].
pub fn audit(config: &ServiceConfig, settings: &AuditSettings) -> AuditResult {
    let stats = parse(config);
    let recommendations = audit_snapshot(&stats, settings);

    tracing::info!(
        recommendations = recommendations.len(),
        excluded = settings.exclude.len(),
        "Audit complete"
    );
    AuditResult {
        recommendations,
        stats,
    }
}

/// Load, validate and audit a configuration file.
pub fn audit_file(path: impl AsRef<Path>, settings: &AuditSettings) -> Result<AuditResult, ConfigError> {
    let config = load_config(path.as_ref())?;
    Ok(audit(&config, settings))
}
