//! Audit run settings.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::audit::Severity;

/// Filters applied to an audit run.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct AuditSettings {
    /// Rule IDs never reported (exact dotted form, e.g. "2.1.3").
    pub exclude: BTreeSet<String>,

    /// Severities reported. Rules with any other severity are skipped.
    pub severities: BTreeSet<Severity>,
}

impl Default for AuditSettings {
    fn default() -> Self {
        Self {
            exclude: BTreeSet::new(),
            severities: Severity::ALL.into_iter().collect(),
        }
    }
}

impl AuditSettings {
    /// Settings reporting only the given severities.
    pub fn with_severities(severities: impl IntoIterator<Item = Severity>) -> Self {
        Self {
            exclude: BTreeSet::new(),
            severities: severities.into_iter().collect(),
        }
    }

    /// Add rule IDs to the exclusion set.
    pub fn excluding<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude.extend(ids.into_iter().map(Into::into));
        self
    }

    /// Whether a rule with this ID and severity takes part in the run.
    pub fn allows(&self, id: &str, severity: Severity) -> bool {
        self.severities.contains(&severity) && !self.exclude.contains(id)
    }
}
