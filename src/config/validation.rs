//! Structural validation of a loaded configuration.
//!
//! # Responsibilities
//! - Reject documents the gateway itself would refuse to start with
//! - Report every problem found, not just the first
//!
//! # Design Decisions
//! - Only structural checks live here; best practices belong to the audit
//!   rules, which never reject a configuration
//! - Validation is a pure function: `&ServiceConfig → Result<(), Vec<ValidationError>>`

use thiserror::Error;

use crate::config::schema::ServiceConfig;

/// The only configuration format version accepted.
pub const SUPPORTED_VERSION: u32 = 3;

/// A single structural problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("unsupported configuration version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("endpoint #{index} has an empty path")]
    EmptyEndpointPath { index: usize },

    #[error("endpoint path {path:?} must start with '/'")]
    RelativeEndpointPath { path: String },
}

/// Validate a configuration, collecting all errors.
pub fn validate_config(config: &ServiceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.version != SUPPORTED_VERSION {
        errors.push(ValidationError::UnsupportedVersion {
            found: config.version,
            expected: SUPPORTED_VERSION,
        });
    }

    for (index, endpoint) in config.endpoints.iter().enumerate() {
        if endpoint.endpoint.is_empty() {
            errors.push(ValidationError::EmptyEndpointPath { index });
        } else if !endpoint.endpoint.starts_with('/') {
            errors.push(ValidationError::RelativeEndpointPath {
                path: endpoint.endpoint.clone(),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::EndpointConfig;

    #[test]
    fn test_valid_config() {
        let config = ServiceConfig {
            version: 3,
            endpoints: vec![EndpointConfig {
                endpoint: "/users".into(),
                ..Default::default()
            }],
            ..Default::default()
        };
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let config = ServiceConfig {
            version: 2,
            endpoints: vec![
                EndpointConfig::default(),
                EndpointConfig {
                    endpoint: "users".into(),
                    ..Default::default()
                },
            ],
            ..Default::default()
        };
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert_eq!(
            errors[0],
            ValidationError::UnsupportedVersion { found: 2, expected: 3 }
        );
        assert_eq!(errors[1], ValidationError::EmptyEndpointPath { index: 0 });
        assert!(errors[2].to_string().contains("users"));
    }
}
