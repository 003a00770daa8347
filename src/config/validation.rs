//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic and type coercion)
//! - Validate value ranges (listen port must be bindable)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: Config → Result<(), Vec<ValidationError>>
//! - Runs after defaults are applied, before config is accepted into the store

use thiserror::Error;

use crate::config::schema::Config;

/// A single semantic problem with a decoded configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {reason}")]
pub struct ValidationError {
    /// Dotted path of the offending key.
    pub field: &'static str,
    pub reason: String,
}

impl ValidationError {
    fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

/// Check a decoded configuration.
pub fn validate_config(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.port == 0 {
        errors.push(ValidationError::new(
            "port",
            "must be set to a value between 1 and 65535",
        ));
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

    #[test]
    fn test_valid_config_passes() {
        let config = Config {
            port: 8080,
            ..Config::default()
        };
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_missing_port_rejected() {
        let errors = validate_config(&Config::default()).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "port");
        assert!(errors[0].to_string().starts_with("port: "));
    }

    #[test]
    fn test_database_fields_not_required() {
        let config = Config {
            port: 1,
            ..Config::default()
        };
        assert!(config.database.host.is_empty());
        assert!(validate_config(&config).is_ok());
    }
}
