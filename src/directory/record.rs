//! Per-alias health record.
//!
//! # State Transitions
//! ```text
//! Online → Offline: probe failures reach offline_after_failures,
//!                   or a caller reports a failed request
//! Offline → Online: next successful probe, or a directory reset
//! ```
//!
//! All fields are atomics so a sweep can probe a record while request
//! handlers mark it offline. `state` is last-write-wins; failure increments
//! use `fetch_add` and are never lost.

use std::sync::atomic::{AtomicU32, AtomicU64, AtomicU8, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use serde::{Deserialize, Serialize};

use crate::probe::{ProbeOutcome, ReachabilityProbe};

/// Liveness state of an alias.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AliasState {
    Online = 0,
    Offline = 1,
}

impl From<u8> for AliasState {
    fn from(val: u8) -> Self {
        match val {
            1 => AliasState::Offline,
            _ => AliasState::Online,
        }
    }
}

/// One alias endpoint and what has been learned about it.
#[derive(Debug)]
pub struct AliasRecord {
    alias: String,
    primary: Arc<str>,
    state: AtomicU8,
    failed_attempts: AtomicU32,
    /// Unix millis of the last completed probe, 0 when never probed.
    last_probed_ms: AtomicU64,
}

impl AliasRecord {
    /// A fresh record starts online with no failures.
    pub fn new(alias: impl Into<String>, primary: Arc<str>) -> Self {
        Self {
            alias: alias.into(),
            primary,
            state: AtomicU8::new(AliasState::Online as u8),
            failed_attempts: AtomicU32::new(0),
            last_probed_ms: AtomicU64::new(0),
        }
    }

    pub fn alias_name(&self) -> &str {
        &self.alias
    }

    /// Primary domain this alias stands in for.
    pub fn owner_primary(&self) -> &str {
        &self.primary
    }

    pub fn state(&self) -> AliasState {
        AliasState::from(self.state.load(Ordering::Acquire))
    }

    pub fn is_online(&self) -> bool {
        self.state() == AliasState::Online
    }

    pub fn failed_attempts(&self) -> u32 {
        self.failed_attempts.load(Ordering::Acquire)
    }

    pub fn last_probed_unix_ms(&self) -> Option<u64> {
        match self.last_probed_ms.load(Ordering::Relaxed) {
            0 => None,
            ms => Some(ms),
        }
    }

    /// Check the alias through `prober` and record the outcome.
    ///
    /// Success brings the alias back online with a clean slate. Failure bumps
    /// the counter and takes the alias offline once the new count reaches
    /// `offline_after_failures`.
    pub async fn probe(&self, prober: &dyn ReachabilityProbe, offline_after_failures: u32) -> ProbeOutcome {
        let outcome = prober.probe(&self.alias).await;
        self.record_outcome(outcome, offline_after_failures);
        outcome
    }

    fn record_outcome(&self, outcome: ProbeOutcome, offline_after_failures: u32) {
        self.last_probed_ms.store(now_unix_ms(), Ordering::Relaxed);

        match outcome {
            ProbeOutcome::Reachable => {
                let previous = self.failed_attempts.swap(0, Ordering::AcqRel);
                let was = self.state.swap(AliasState::Online as u8, Ordering::AcqRel);
                if was != AliasState::Online as u8 {
                    tracing::info!(alias = %self.alias, primary = %self.primary, previous_failures = previous, "Alias back online");
                }
            }
            ProbeOutcome::Unreachable => {
                let failures = self.failed_attempts.fetch_add(1, Ordering::AcqRel) + 1;
                if failures >= offline_after_failures {
                    let was = self.state.swap(AliasState::Offline as u8, Ordering::AcqRel);
                    if was != AliasState::Offline as u8 {
                        tracing::warn!(alias = %self.alias, primary = %self.primary, failures, "Alias marked offline after failed probes");
                    }
                } else {
                    tracing::debug!(alias = %self.alias, failures, "Alias probe failed");
                }
            }
        }
    }

    /// Stop offering this alias until a probe succeeds. The failure counter is
    /// left alone.
    pub fn mark_offline(&self) {
        self.state.store(AliasState::Offline as u8, Ordering::Release);
    }

    /// Back to online with zero failures.
    pub fn reset(&self) {
        self.failed_attempts.store(0, Ordering::Release);
        self.state.store(AliasState::Online as u8, Ordering::Release);
    }
}

impl PartialEq for AliasRecord {
    fn eq(&self, other: &Self) -> bool {
        self.alias == other.alias
    }
}

impl Eq for AliasRecord {}

fn now_unix_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(1)
        .max(1)
}
