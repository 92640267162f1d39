//! Recommendation severity levels.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How urgent a recommendation is. Ordered from most to least urgent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

impl Severity {
    pub const ALL: [Severity; 4] = [Self::Critical, Self::High, Self::Medium, Self::Low];

    /// Upper-case label used in reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Critical => "CRITICAL",
            Self::High => "HIGH",
            Self::Medium => "MEDIUM",
            Self::Low => "LOW",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// A severity label that matches no level.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown severity: {0:?} (expected critical, high, medium or low)")]
pub struct UnknownSeverity(pub String);

impl FromStr for Severity {
    type Err = UnknownSeverity;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownSeverity(s.to_string()))
    }
}

impl TryFrom<String> for Severity {
    type Error = UnknownSeverity;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Severity> for String {
    fn from(severity: Severity) -> Self {
        severity.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("critical".parse::<Severity>(), Ok(Severity::Critical));
        assert_eq!("High".parse::<Severity>(), Ok(Severity::High));
        assert_eq!(" LOW ".parse::<Severity>(), Ok(Severity::Low));
        assert!("urgent".parse::<Severity>().is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(Severity::Medium.to_string(), "MEDIUM");
    }

    #[test]
    fn test_serde_uses_labels() {
        assert_eq!(serde_json::to_string(&Severity::High).unwrap(), r#""HIGH""#);
        let parsed: Vec<Severity> = serde_json::from_str(r#"["low", "CRITICAL"]"#).unwrap();
        assert_eq!(parsed, vec![Severity::Low, Severity::Critical]);
        assert!(serde_json::from_str::<Severity>(r#""nope""#).is_err());
    }

    #[test]
    fn test_ordering_most_urgent_first() {
        let mut levels = vec![Severity::Low, Severity::Critical, Severity::Medium, Severity::High];
        levels.sort();
        assert_eq!(levels, Severity::ALL.to_vec());
    }
}
