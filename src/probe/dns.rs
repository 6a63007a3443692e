//! Name-resolution reachability probe.

use std::time::Duration;
use futures_util::future::{BoxFuture, FutureExt};
use tokio::net::lookup_host;
use tokio::time;

use crate::probe::{ProbeOutcome, ReachabilityProbe};

/// Reachable iff the name resolves to at least one address.
#[derive(Debug, Clone)]
pub struct DnsProbe {
    timeout: Duration,
}

impl DnsProbe {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    async fn check(&self, name: &str) -> ProbeOutcome {
        match time::timeout(self.timeout, lookup_host((name, 0))).await {
            Ok(Ok(mut addrs)) => {
                let resolved = addrs.next().is_some();
                if !resolved {
                    tracing::warn!(name = %name, "Health probe failed: no addresses");
                }
                ProbeOutcome::from(resolved)
            }
            Ok(Err(e)) => {
                tracing::warn!(name = %name, error = %e, "Health probe failed: resolution error");
                ProbeOutcome::Unreachable
            }
            Err(_) => {
                tracing::warn!(name = %name, "Health probe failed: timeout");
                ProbeOutcome::Unreachable
            }
        }
    }
}

impl ReachabilityProbe for DnsProbe {
    fn probe<'a>(&'a self, name: &'a str) -> BoxFuture<'a, ProbeOutcome> {
        self.check(name).boxed()
    }
}
