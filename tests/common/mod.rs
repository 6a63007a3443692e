//! Shared utilities for integration tests.

use std::sync::Arc;
use domain_failover::config::DomainConfig;
use domain_failover::directory::{DirectoryRegistry, FailoverDirectory, SweepPolicy};
use domain_failover::probe::FixedProbe;

/// A directory whose probes are answered by `probe`.
#[allow(dead_code)]
pub fn directory(primary: &str, aliases: &[&str], probe: Arc<FixedProbe>) -> FailoverDirectory {
    FailoverDirectory::new(primary, aliases.iter().copied(), probe).unwrap()
}

#[allow(dead_code)]
pub fn domain(primary: &str, aliases: &[&str]) -> DomainConfig {
    DomainConfig {
        primary: primary.to_string(),
        aliases: aliases.iter().map(|a| a.to_string()).collect(),
    }
}

#[allow(dead_code)]
pub fn registry(domains: &[DomainConfig], probe: Arc<FixedProbe>) -> Arc<DirectoryRegistry> {
    Arc::new(DirectoryRegistry::from_config(domains, probe, SweepPolicy::default()).unwrap())
}

/// Push an alias's failure count up by probing it against a dead probe.
#[allow(dead_code)]
pub async fn force_failures(directory: &FailoverDirectory, alias: &str, n: usize) {
    let down = FixedProbe::unreachable();
    let record = directory.current_records().get(alias).cloned().unwrap();
    for _ in 0..n {
        record.probe(&down, directory.policy().offline_after_failures).await;
    }
}
