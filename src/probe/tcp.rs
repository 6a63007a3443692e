//! Socket-connect reachability probe.

use std::time::Duration;
use futures_util::future::{BoxFuture, FutureExt};
use tokio::net::TcpStream;
use tokio::time;

use crate::probe::{ProbeOutcome, ReachabilityProbe};

/// Reachable iff a TCP connection to `(name, port)` completes before the timeout.
#[derive(Debug, Clone)]
pub struct TcpProbe {
    port: u16,
    timeout: Duration,
}

impl TcpProbe {
    pub fn new(port: u16, timeout: Duration) -> Self {
        Self { port, timeout }
    }

    async fn check(&self, name: &str) -> ProbeOutcome {
        match time::timeout(self.timeout, TcpStream::connect((name, self.port))).await {
            Ok(Ok(_stream)) => ProbeOutcome::Reachable,
            Ok(Err(e)) => {
                tracing::warn!(name = %name, port = self.port, error = %e, "Health probe failed: connect error");
                ProbeOutcome::Unreachable
            }
            Err(_) => {
                tracing::warn!(name = %name, port = self.port, "Health probe failed: timeout");
                ProbeOutcome::Unreachable
            }
        }
    }
}

impl ReachabilityProbe for TcpProbe {
    fn probe<'a>(&'a self, name: &'a str) -> BoxFuture<'a, ProbeOutcome> {
        self.check(name).boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn test_connect_to_listener() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let probe = TcpProbe::new(port, Duration::from_secs(2));
        assert_eq!(probe.probe("127.0.0.1").await, ProbeOutcome::Reachable);
    }

    #[tokio::test]
    async fn test_closed_port() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let probe = TcpProbe::new(port, Duration::from_secs(2));
        assert_eq!(probe.probe("127.0.0.1").await, ProbeOutcome::Unreachable);
    }
}
