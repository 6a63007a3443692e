//! Reachability probing.
//!
//! # Data Flow
//! ```text
//! Health sweep
//!     → AliasRecord::probe
//!     → ReachabilityProbe::probe(name)
//!         - http.rs (HEAD request)
//!         - tcp.rs (socket connect)
//!         - dns.rs (name resolution)
//!         - fixed.rs (in-memory answers)
//!     → ProbeOutcome recorded on the alias record
//! ```
//!
//! # Design Decisions
//! - Probes never return errors: every failure mode is `Unreachable`
//! - Each adapter owns its own timeout; the directory sets no deadlines
//! - Futures are boxed so probes can live behind `Arc<dyn ReachabilityProbe>`

pub mod dns;
pub mod fixed;
pub mod http;
pub mod tcp;

use std::sync::Arc;
use std::time::Duration;
use futures_util::future::BoxFuture;
use thiserror::Error;

use crate::config::{HealthSweepConfig, ProbeKind};

pub use dns::DnsProbe;
pub use fixed::FixedProbe;
pub use http::HttpProbe;
pub use tcp::TcpProbe;

/// Result of probing a single endpoint name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeOutcome {
    Reachable,
    Unreachable,
}

impl ProbeOutcome {
    pub fn is_reachable(self) -> bool {
        self == ProbeOutcome::Reachable
    }
}

impl From<bool> for ProbeOutcome {
    fn from(reachable: bool) -> Self {
        if reachable {
            ProbeOutcome::Reachable
        } else {
            ProbeOutcome::Unreachable
        }
    }
}

/// Liveness check against an endpoint name.
pub trait ReachabilityProbe: Send + Sync + std::fmt::Debug {
    fn probe<'a>(&'a self, name: &'a str) -> BoxFuture<'a, ProbeOutcome>;
}

/// Errors raised while constructing a probe adapter.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Build the probe adapter selected by the health configuration.
pub fn from_config(config: &HealthSweepConfig) -> Result<Arc<dyn ReachabilityProbe>, ProbeError> {
    let timeout = Duration::from_secs(config.timeout_secs);

    let probe: Arc<dyn ReachabilityProbe> = match config.probe {
        ProbeKind::Http => Arc::new(HttpProbe::new(&config.scheme, &config.path, timeout)?),
        ProbeKind::Tcp => Arc::new(TcpProbe::new(config.port, timeout)),
        ProbeKind::Dns => Arc::new(DnsProbe::new(timeout)),
    };

    tracing::debug!(kind = ?config.probe, timeout_secs = config.timeout_secs, "Reachability probe configured");
    Ok(probe)
}
