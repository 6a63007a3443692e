//! The failover directory: one primary name, a set of aliases, and the
//! "which name right now" decision.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use arc_swap::ArcSwap;
use futures_util::stream::{self, StreamExt};
use rand::seq::SliceRandom;
use thiserror::Error;

use crate::directory::record::AliasRecord;
use crate::directory::snapshot::AliasSnapshot;
use crate::directory::status::{AliasStatus, DomainStatus, SweepReport};
use crate::observability::metrics;
use crate::probe::{ProbeOutcome, ReachabilityProbe};

/// Errors raised when building a directory.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DirectoryError {
    #[error("primary domain name must not be empty")]
    EmptyPrimary,
}

/// Thresholds applied by the health sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepPolicy {
    /// Consecutive probe failures before an alias goes offline.
    pub offline_after_failures: u32,
    /// Aliases with more failures than this are evicted, not probed.
    pub eviction_threshold: u32,
    /// Probes in flight at once within one sweep.
    pub max_concurrent_probes: usize,
}

impl Default for SweepPolicy {
    fn default() -> Self {
        Self {
            offline_after_failures: 2,
            eviction_threshold: 3,
            max_concurrent_probes: 8,
        }
    }
}

/// Tracks one primary domain and its aliases.
///
/// Readers (`domain_name_to_use`, `current_records`, `status`) load an
/// immutable snapshot and never block. Writers that replace the snapshot
/// (`update_alias_set` and the eviction step of `check_statuses`) serialize on
/// `write_lock` and re-read the latest snapshot inside it.
#[derive(Debug)]
pub struct FailoverDirectory {
    primary: Arc<str>,
    primary_online: AtomicBool,
    records: ArcSwap<AliasSnapshot>,
    write_lock: Mutex<()>,
    probe: Arc<dyn ReachabilityProbe>,
    policy: SweepPolicy,
}

impl FailoverDirectory {
    /// Create a directory with the primary online and every initial alias
    /// online with zero failures. Duplicate aliases keep their first position.
    pub fn new<I, S>(
        primary: impl Into<String>,
        aliases: I,
        probe: Arc<dyn ReachabilityProbe>,
    ) -> Result<Self, DirectoryError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let primary = primary.into();
        let primary = primary.trim();
        if primary.is_empty() {
            return Err(DirectoryError::EmptyPrimary);
        }
        let primary: Arc<str> = Arc::from(primary);

        let records = clean_names(aliases)
            .into_iter()
            .map(|alias| Arc::new(AliasRecord::new(alias, primary.clone())));
        let snapshot = AliasSnapshot::from_records(records);

        tracing::debug!(primary = %primary, aliases = snapshot.len(), "Failover directory created");
        metrics::record_primary_online(&primary, true);

        Ok(Self {
            primary,
            primary_online: AtomicBool::new(true),
            records: ArcSwap::from_pointee(snapshot),
            write_lock: Mutex::new(()),
            probe,
            policy: SweepPolicy::default(),
        })
    }

    pub fn with_policy(mut self, policy: SweepPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn primary_name(&self) -> &str {
        &self.primary
    }

    pub fn is_primary_online(&self) -> bool {
        self.primary_online.load(Ordering::Acquire)
    }

    pub fn policy(&self) -> SweepPolicy {
        self.policy
    }

    /// The live alias snapshot.
    pub fn current_records(&self) -> Arc<AliasSnapshot> {
        self.records.load_full()
    }

    fn lock(&self) -> MutexGuard<'_, ()> {
        self.write_lock.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Reconcile the alias set against a fresh list of names.
    ///
    /// Known aliases keep their learned state, new ones start online, missing
    /// ones are dropped. The result is shuffled so load spreads over healthy
    /// aliases. An empty list is ignored. Returns whether a new snapshot was
    /// published.
    pub fn update_alias_set<I, S>(&self, names: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names = clean_names(names);
        if names.is_empty() {
            tracing::debug!(primary = %self.primary, "Ignoring empty alias update");
            return false;
        }

        let _guard = self.lock();
        let current = self.records.load();

        let mut carried = 0usize;
        let mut next: Vec<Arc<AliasRecord>> = names
            .into_iter()
            .map(|name| match current.get(&name) {
                Some(existing) => {
                    carried += 1;
                    existing.clone()
                }
                None => Arc::new(AliasRecord::new(name, self.primary.clone())),
            })
            .collect();
        next.shuffle(&mut rand::thread_rng());

        let dropped = current.len() - carried;
        let added = next.len() - carried;
        let snapshot = AliasSnapshot::from_records(next);
        for record in current.iter().filter(|r| !snapshot.contains(r.alias_name())) {
            metrics::record_alias_departed(&self.primary, record.alias_name());
        }
        self.records.store(Arc::new(snapshot));

        tracing::info!(primary = %self.primary, carried, added, dropped, "Alias set updated");
        true
    }

    /// Record that a request against `name` failed.
    ///
    /// The primary is flagged offline; an alias is marked offline until its
    /// next successful probe. Unknown names are ignored.
    pub fn mark_domain_offline(&self, name: &str) {
        if name == &*self.primary {
            if self.primary_online.swap(false, Ordering::AcqRel) {
                tracing::warn!(primary = %self.primary, "Primary domain marked offline");
                metrics::record_primary_online(&self.primary, false);
            }
            metrics::record_marked_offline(&self.primary, name);
            return;
        }

        let snapshot = self.records.load();
        match snapshot.get(name) {
            Some(record) => {
                record.mark_offline();
                tracing::warn!(primary = %self.primary, alias = %name, "Alias marked offline by caller");
                metrics::record_alias_online(&self.primary, name, false);
                metrics::record_marked_offline(&self.primary, name);
            }
            None => {
                tracing::debug!(primary = %self.primary, name = %name, "Offline report for unknown domain ignored");
            }
        }
    }

    /// The name callers should use right now.
    ///
    /// The primary while it is trusted; otherwise the first online alias in
    /// snapshot order; otherwise the primary again. Never touches the network.
    pub fn domain_name_to_use(&self) -> String {
        self.name_to_use(&self.records.load())
    }

    fn name_to_use(&self, snapshot: &AliasSnapshot) -> String {
        if self.is_primary_online() {
            return self.primary.to_string();
        }

        match snapshot.first_online() {
            Some(record) => record.alias_name().to_string(),
            None => self.primary.to_string(),
        }
    }

    /// Periodic health sweep.
    ///
    /// Probes every alias within the eviction threshold and removes the rest
    /// in one swap once all probes are done. When there are no aliases left it
    /// resets the directory, which puts the primary back in service.
    pub async fn check_statuses(&self) -> SweepReport {
        let mut report = SweepReport {
            primary: self.primary.to_string(),
            ..SweepReport::default()
        };

        let snapshot = self.records.load_full();
        if snapshot.is_empty() {
            self.reset();
            report.reset = true;
            metrics::record_sweep(&self.primary, &report);
            return report;
        }

        let threshold = self.policy.eviction_threshold;
        let (to_probe, to_evict): (Vec<_>, Vec<_>) = snapshot
            .iter()
            .cloned()
            .partition(|r| r.failed_attempts() <= threshold);

        let probe = self.probe.as_ref();
        let offline_after = self.policy.offline_after_failures;
        let outcomes: Vec<(Arc<AliasRecord>, ProbeOutcome)> = stream::iter(to_probe)
            .map(move |record| async move {
                let outcome = record.probe(probe, offline_after).await;
                (record, outcome)
            })
            .buffer_unordered(self.policy.max_concurrent_probes.max(1))
            .collect()
            .await;

        for (record, outcome) in outcomes {
            let alias = record.alias_name().to_string();
            metrics::record_alias_online(&self.primary, &alias, record.is_online());
            match outcome {
                ProbeOutcome::Reachable => report.reachable.push(alias),
                ProbeOutcome::Unreachable => report.unreachable.push(alias),
            }
        }

        if !to_evict.is_empty() {
            let _guard = self.lock();
            let current = self.records.load();
            self.records.store(Arc::new(current.without(&to_evict)));

            for record in &to_evict {
                tracing::warn!(
                    primary = %self.primary,
                    alias = %record.alias_name(),
                    failures = record.failed_attempts(),
                    "Alias evicted after exhausting retries"
                );
                metrics::record_alias_departed(&self.primary, record.alias_name());
                report.evicted.push(record.alias_name().to_string());
            }
        }

        metrics::record_sweep(&self.primary, &report);
        report
    }

    /// Trust the primary again and clear every alias.
    fn reset(&self) {
        self.primary_online.store(true, Ordering::Release);
        for record in self.records.load().iter() {
            record.reset();
        }
        tracing::info!(primary = %self.primary, "No aliases left, primary domain back in service");
        metrics::record_primary_online(&self.primary, true);
    }

    pub fn status(&self) -> DomainStatus {
        let snapshot = self.records.load();
        DomainStatus {
            primary: self.primary.to_string(),
            primary_online: self.is_primary_online(),
            domain_in_use: self.name_to_use(&snapshot),
            aliases: snapshot.iter().map(|r| AliasStatus::from(r.as_ref())).collect(),
        }
    }
}

/// Trimmed, non-empty names with duplicates removed, first occurrence kept.
fn clean_names<I, S>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    names
        .into_iter()
        .map(|n| n.as_ref().trim().to_string())
        .filter(|n| !n.is_empty() && seen.insert(n.clone()))
        .collect()
}
