//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check that every primary and alias is a usable host name
//! - Validate value ranges (intervals > 0, thresholds > 0)
//! - Detect duplicate primaries
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: FailoverConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;
use thiserror::Error;
use url::Host;

use crate::config::schema::FailoverConfig;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("domain #{index} has an empty primary name")]
    EmptyPrimary { index: usize },

    #[error("'{name}' is not a valid host name")]
    InvalidHost { name: String },

    #[error("primary '{0}' is configured more than once")]
    DuplicatePrimary(String),

    #[error("health.{field} must be greater than zero")]
    ZeroValue { field: &'static str },

    #[error("admin.api_key must not be empty while the admin API is enabled")]
    EmptyApiKey,

    #[error("{field} '{value}' is not a valid socket address")]
    InvalidAddress { field: &'static str, value: String },
}

fn check_host(name: &str, errors: &mut Vec<ValidationError>) {
    if Host::parse(name).is_err() || name.contains(['/', ':', ' ']) {
        errors.push(ValidationError::InvalidHost { name: name.to_string() });
    }
}

/// Validate a parsed configuration.
pub fn validate_config(config: &FailoverConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let mut primaries = HashSet::new();

    for (index, domain) in config.domains.iter().enumerate() {
        let primary = domain.primary.trim();
        if primary.is_empty() {
            errors.push(ValidationError::EmptyPrimary { index });
        } else {
            check_host(primary, &mut errors);
            if !primaries.insert(primary) {
                errors.push(ValidationError::DuplicatePrimary(primary.to_string()));
            }
        }

        // Blank aliases are dropped by the directory, so they are not errors.
        for alias in domain.aliases.iter().map(|a| a.trim()).filter(|a| !a.is_empty()) {
            check_host(alias, &mut errors);
        }
    }

    let health = &config.health;
    if health.interval_secs == 0 {
        errors.push(ValidationError::ZeroValue { field: "interval_secs" });
    }
    if health.timeout_secs == 0 {
        errors.push(ValidationError::ZeroValue { field: "timeout_secs" });
    }
    if health.offline_after_failures == 0 {
        errors.push(ValidationError::ZeroValue { field: "offline_after_failures" });
    }
    if health.max_concurrent_probes == 0 {
        errors.push(ValidationError::ZeroValue { field: "max_concurrent_probes" });
    }

    if config.admin.enabled && config.admin.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "admin.bind_address",
            value: config.admin.bind_address.clone(),
        });
    }
    if config.admin.enabled && config.admin.api_key.trim().is_empty() {
        errors.push(ValidationError::EmptyApiKey);
    }
    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
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
    use crate::config::schema::DomainConfig;

    fn domain(primary: &str, aliases: &[&str]) -> DomainConfig {
        DomainConfig {
            primary: primary.to_string(),
            aliases: aliases.iter().map(|a| a.to_string()).collect(),
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&FailoverConfig::default()).is_ok());
    }

    #[test]
    fn test_valid_domains() {
        let mut config = FailoverConfig::default();
        config.domains.push(domain("example.com", &["m1.example.com", "10.0.0.1"]));
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = FailoverConfig::default();
        config.domains.push(domain("example.com", &["bad host"]));
        config.domains.push(domain("example.com", &[]));
        config.domains.push(domain("  ", &[]));
        config.health.timeout_secs = 0;
        config.admin.bind_address = "nowhere".to_string();

        let errors = validate_config(&config).unwrap_err();
        assert!(errors.contains(&ValidationError::InvalidHost { name: "bad host".into() }));
        assert!(errors.contains(&ValidationError::DuplicatePrimary("example.com".into())));
        assert!(errors.contains(&ValidationError::EmptyPrimary { index: 2 }));
        assert!(errors.contains(&ValidationError::ZeroValue { field: "timeout_secs" }));
        assert!(errors.iter().any(|e| matches!(e, ValidationError::InvalidAddress { .. })));
        assert_eq!(errors.len(), 5);
    }

    #[test]
    fn test_enabled_admin_needs_api_key() {
        let mut config = FailoverConfig::default();
        config.admin.api_key = "   ".to_string();
        assert_eq!(validate_config(&config).unwrap_err(), vec![ValidationError::EmptyApiKey]);

        config.admin.enabled = false;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_blank_aliases_are_ignored() {
        let mut config = FailoverConfig::default();
        config.domains.push(domain("example.com", &["", "  ", "m1.example.com"]));
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_disabled_admin_address_not_checked() {
        let mut config = FailoverConfig::default();
        config.admin.enabled = false;
        config.admin.bind_address = String::new();
        assert!(validate_config(&config).is_ok());
    }
}
