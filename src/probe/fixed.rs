//! In-memory probe with scripted answers.

use dashmap::DashMap;
use futures_util::future::{self, BoxFuture, FutureExt};
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::probe::{ProbeOutcome, ReachabilityProbe};

/// Answers probes from a table instead of the network.
///
/// Names without an entry get the default outcome. Every call is counted per
/// name so callers can assert which endpoints a sweep actually touched.
#[derive(Debug)]
pub struct FixedProbe {
    default: ProbeOutcome,
    answers: DashMap<String, ProbeOutcome>,
    calls: DashMap<String, usize>,
    total_calls: AtomicUsize,
}

impl FixedProbe {
    pub fn new(default: ProbeOutcome) -> Self {
        Self {
            default,
            answers: DashMap::new(),
            calls: DashMap::new(),
            total_calls: AtomicUsize::new(0),
        }
    }

    /// A probe that reports every name reachable.
    pub fn reachable() -> Self {
        Self::new(ProbeOutcome::Reachable)
    }

    /// A probe that reports every name unreachable.
    pub fn unreachable() -> Self {
        Self::new(ProbeOutcome::Unreachable)
    }

    /// Override the answer for one name.
    pub fn set(&self, name: &str, outcome: ProbeOutcome) {
        self.answers.insert(name.to_string(), outcome);
    }

    /// Number of times `name` has been probed.
    pub fn calls_for(&self, name: &str) -> usize {
        self.calls.get(name).map(|c| *c).unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.total_calls.load(Ordering::Relaxed)
    }

    fn answer(&self, name: &str) -> ProbeOutcome {
        *self.calls.entry(name.to_string()).or_insert(0) += 1;
        self.total_calls.fetch_add(1, Ordering::Relaxed);
        self.answers.get(name).map(|o| *o).unwrap_or(self.default)
    }
}

impl ReachabilityProbe for FixedProbe {
    fn probe<'a>(&'a self, name: &'a str) -> BoxFuture<'a, ProbeOutcome> {
        future::ready(self.answer(name)).boxed()
    }
}
