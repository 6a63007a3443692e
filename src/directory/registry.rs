//! Directories for every configured primary domain.

use std::sync::Arc;
use dashmap::DashMap;
use futures_util::future::join_all;

use crate::config::DomainConfig;
use crate::directory::failover::{DirectoryError, FailoverDirectory, SweepPolicy};
use crate::directory::status::{DomainStatus, SweepReport};
use crate::probe::ReachabilityProbe;

/// Concurrent map from primary name to its directory.
#[derive(Debug)]
pub struct DirectoryRegistry {
    directories: DashMap<String, Arc<FailoverDirectory>>,
    probe: Arc<dyn ReachabilityProbe>,
    policy: SweepPolicy,
}

impl DirectoryRegistry {
    pub fn new(probe: Arc<dyn ReachabilityProbe>, policy: SweepPolicy) -> Self {
        Self {
            directories: DashMap::new(),
            probe,
            policy,
        }
    }

    /// Build a registry holding one directory per configured domain.
    pub fn from_config(
        domains: &[DomainConfig],
        probe: Arc<dyn ReachabilityProbe>,
        policy: SweepPolicy,
    ) -> Result<Self, DirectoryError> {
        let registry = Self::new(probe, policy);
        for domain in domains {
            registry.insert(domain)?;
        }
        Ok(registry)
    }

    fn insert(&self, domain: &DomainConfig) -> Result<Arc<FailoverDirectory>, DirectoryError> {
        let directory = Arc::new(
            FailoverDirectory::new(domain.primary.as_str(), &domain.aliases, self.probe.clone())?
                .with_policy(self.policy),
        );
        self.directories
            .insert(directory.primary_name().to_string(), directory.clone());
        tracing::info!(primary = %directory.primary_name(), aliases = directory.current_records().len(), "Directory registered");
        Ok(directory)
    }

    pub fn get(&self, primary: &str) -> Option<Arc<FailoverDirectory>> {
        self.directories.get(primary).map(|d| d.value().clone())
    }

    pub fn len(&self) -> usize {
        self.directories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.directories.is_empty()
    }

    /// Primary names, sorted.
    pub fn primaries(&self) -> Vec<String> {
        let mut names: Vec<String> = self.directories.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    fn all(&self) -> Vec<Arc<FailoverDirectory>> {
        self.directories.iter().map(|e| e.value().clone()).collect()
    }

    /// Reconcile against a reloaded domain list.
    ///
    /// Known primaries get their alias lists updated (learned health kept),
    /// new primaries get a directory, and primaries no longer listed are
    /// dropped.
    pub fn apply(&self, domains: &[DomainConfig]) -> Result<(), DirectoryError> {
        for domain in domains {
            match self.get(domain.primary.trim()) {
                Some(directory) => {
                    directory.update_alias_set(&domain.aliases);
                }
                None => {
                    self.insert(domain)?;
                }
            }
        }

        let wanted: Vec<&str> = domains.iter().map(|d| d.primary.trim()).collect();
        self.directories.retain(|primary, _| {
            let keep = wanted.contains(&primary.as_str());
            if !keep {
                tracing::info!(primary = %primary, "Directory removed from configuration");
            }
            keep
        });
        Ok(())
    }

    /// Sweep every directory concurrently.
    pub async fn sweep_all(&self) -> Vec<SweepReport> {
        let directories = self.all();
        let mut reports = join_all(directories.iter().map(|d| d.check_statuses())).await;
        reports.sort_by(|a, b| a.primary.cmp(&b.primary));
        reports
    }

    /// Status of every directory, sorted by primary.
    pub fn statuses(&self) -> Vec<DomainStatus> {
        let mut statuses: Vec<DomainStatus> = self.all().iter().map(|d| d.status()).collect();
        statuses.sort_by(|a, b| a.primary.cmp(&b.primary));
        statuses
    }
}
