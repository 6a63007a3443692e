//! HTTP HEAD reachability probe.

use std::time::Duration;
use futures_util::future::{BoxFuture, FutureExt};
use reqwest::Client;
use url::Url;

use crate::probe::{ProbeError, ProbeOutcome, ReachabilityProbe};

/// Probes `{scheme}://{name}{path}` with a HEAD request.
///
/// Any response below 500 counts as reachable: the host answered, even if it
/// does not like the path. Connection errors, timeouts and 5xx do not.
#[derive(Debug)]
pub struct HttpProbe {
    client: Client,
    scheme: String,
    path: String,
}

impl HttpProbe {
    pub fn new(scheme: &str, path: &str, timeout: Duration) -> Result<Self, ProbeError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent("domain-failover-probe")
            .no_proxy()
            .build()?;

        let path = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{}", path)
        };

        Ok(Self {
            client,
            scheme: scheme.to_string(),
            path,
        })
    }

    /// URL probed for a given endpoint name.
    pub fn target(&self, name: &str) -> Option<Url> {
        Url::parse(&format!("{}://{}{}", self.scheme, name, self.path)).ok()
    }

    async fn check(&self, name: &str) -> ProbeOutcome {
        let Some(url) = self.target(name) else {
            tracing::warn!(name = %name, "Health probe skipped: not a valid URL host");
            return ProbeOutcome::Unreachable;
        };

        match self.client.head(url).send().await {
            Ok(response) => {
                let status = response.status();
                if status.is_server_error() {
                    tracing::warn!(name = %name, status = %status, "Health probe failed: server error");
                    ProbeOutcome::Unreachable
                } else {
                    ProbeOutcome::Reachable
                }
            }
            Err(e) if e.is_timeout() => {
                tracing::warn!(name = %name, "Health probe failed: timeout");
                ProbeOutcome::Unreachable
            }
            Err(e) => {
                tracing::warn!(name = %name, error = %e, "Health probe failed: connection error");
                ProbeOutcome::Unreachable
            }
        }
    }
}

impl ReachabilityProbe for HttpProbe {
    fn probe<'a>(&'a self, name: &'a str) -> BoxFuture<'a, ProbeOutcome> {
        self.check(name).boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    async fn serve_once(status_line: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            if let Ok((mut socket, _)) = listener.accept().await {
                let mut buf = [0u8; 1024];
                let _ = socket.read(&mut buf).await;
                let response = format!("HTTP/1.1 {}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n", status_line);
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });
        addr.to_string()
    }

    #[test]
    fn test_target_normalizes_path() {
        let probe = HttpProbe::new("https", "health", Duration::from_secs(1)).unwrap();
        let url = probe.target("m1.example.com").unwrap();
        assert_eq!(url.as_str(), "https://m1.example.com/health");
    }

    #[tokio::test]
    async fn test_client_error_counts_as_reachable() {
        let host = serve_once("404 Not Found").await;
        let probe = HttpProbe::new("http", "/", Duration::from_secs(2)).unwrap();
        assert_eq!(probe.probe(&host).await, ProbeOutcome::Reachable);
    }

    #[tokio::test]
    async fn test_server_error_is_unreachable() {
        let host = serve_once("503 Service Unavailable").await;
        let probe = HttpProbe::new("http", "/", Duration::from_secs(2)).unwrap();
        assert_eq!(probe.probe(&host).await, ProbeOutcome::Unreachable);
    }

    #[tokio::test]
    async fn test_refused_connection_is_unreachable() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let host = listener.local_addr().unwrap().to_string();
        drop(listener);

        let probe = HttpProbe::new("http", "/", Duration::from_secs(2)).unwrap();
        assert_eq!(probe.probe(&host).await, ProbeOutcome::Unreachable);
    }
}
