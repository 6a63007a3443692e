//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::directory::SweepPolicy;

/// Root configuration for the failover daemon.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct FailoverConfig {
    /// Primary domains and their aliases, one directory each.
    pub domains: Vec<DomainConfig>,

    /// Health sweep settings.
    pub health: HealthSweepConfig,

    /// Admin API settings.
    pub admin: AdminConfig,

    /// Logging and metrics settings.
    pub observability: ObservabilityConfig,
}

/// A primary domain with its failover aliases.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct DomainConfig {
    /// Preferred endpoint name.
    pub primary: String,

    /// Alternate endpoint names.
    #[serde(default)]
    pub aliases: Vec<String>,
}

/// Which reachability probe the sweep uses.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProbeKind {
    Http,
    Tcp,
    Dns,
}

/// Health sweep configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HealthSweepConfig {
    /// Run the periodic sweep.
    pub enabled: bool,

    /// Sweep interval in seconds.
    pub interval_secs: u64,

    /// Per-probe timeout in seconds.
    pub timeout_secs: u64,

    /// Probe adapter.
    pub probe: ProbeKind,

    /// URL scheme for HTTP probes.
    pub scheme: String,

    /// Path requested by HTTP probes.
    pub path: String,

    /// Port for TCP probes.
    pub port: u16,

    /// Consecutive probe failures before an alias goes offline.
    pub offline_after_failures: u32,

    /// Aliases with more failures than this are evicted instead of probed.
    pub eviction_threshold: u32,

    /// Upper bound on probes in flight per directory.
    pub max_concurrent_probes: usize,
}

impl Default for HealthSweepConfig {
    fn default() -> Self {
        let policy = SweepPolicy::default();
        Self {
            enabled: true,
            interval_secs: 60,
            timeout_secs: 5,
            probe: ProbeKind::Http,
            scheme: "https".to_string(),
            path: "/".to_string(),
            port: 443,
            offline_after_failures: policy.offline_after_failures,
            eviction_threshold: policy.eviction_threshold,
            max_concurrent_probes: policy.max_concurrent_probes,
        }
    }
}

impl HealthSweepConfig {
    /// Sweep policy handed to every directory.
    pub fn policy(&self) -> SweepPolicy {
        SweepPolicy {
            offline_after_failures: self.offline_after_failures,
            eviction_threshold: self.eviction_threshold,
            max_concurrent_probes: self.max_concurrent_probes,
        }
    }
}

/// Admin API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AdminConfig {
    pub enabled: bool,

    /// Bind address (e.g., "127.0.0.1:8081").
    pub bind_address: String,

    /// Bearer token required on every admin request.
    pub api_key: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            bind_address: "127.0.0.1:8081".to_string(),
            api_key: "admin-secret-key".to_string(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Filter used when `RUST_LOG` is not set.
    pub log_level: String,

    pub log_format: LogFormat,

    /// Expose Prometheus metrics.
    pub metrics_enabled: bool,

    /// Metrics listener address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "domain_failover=info,tower_http=info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config: FailoverConfig = toml::from_str(
            r#"
            [[domains]]
            primary = "example.com"
            "#,
        )
        .unwrap();

        assert_eq!(config.domains.len(), 1);
        assert!(config.domains[0].aliases.is_empty());
        assert_eq!(config.health.probe, ProbeKind::Http);
        assert_eq!(config.health.eviction_threshold, 3);
        assert_eq!(config.observability.log_format, LogFormat::Pretty);
    }

    #[test]
    fn test_full_config() {
        let config: FailoverConfig = toml::from_str(
            r#"
            [[domains]]
            primary = "example.com"
            aliases = ["m1.example.com", "m2.example.com"]

            [health]
            interval_secs = 30
            probe = "tcp"
            port = 8443
            offline_after_failures = 1

            [admin]
            enabled = false

            [observability]
            log_format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(config.domains[0].aliases, vec!["m1.example.com", "m2.example.com"]);
        assert_eq!(config.health.interval_secs, 30);
        assert_eq!(config.health.probe, ProbeKind::Tcp);
        assert_eq!(config.health.port, 8443);
        assert_eq!(config.health.policy().offline_after_failures, 1);
        assert_eq!(config.health.policy().eviction_threshold, 3);
        assert!(!config.admin.enabled);
        assert_eq!(config.observability.log_format, LogFormat::Json);
    }
}
