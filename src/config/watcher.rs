//! Configuration file watcher for hot reload.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use notify::{Watcher, RecursiveMode, Event, RecommendedWatcher, Config};
use tokio::sync::{broadcast, mpsc};
use crate::config::loader::load_config;
use crate::config::schema::FailoverConfig;
use crate::directory::DirectoryRegistry;

/// A watcher that monitors the configuration file for changes.
pub struct ConfigWatcher {
    path: PathBuf,
    update_tx: mpsc::UnboundedSender<FailoverConfig>,
}

impl ConfigWatcher {
    /// Create a new ConfigWatcher.
    ///
    /// Returns the watcher and a receiver for validated configuration updates.
    pub fn new(path: &Path) -> (Self, mpsc::UnboundedReceiver<FailoverConfig>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();

        (Self {
            path: path.to_path_buf(),
            update_tx,
        }, update_rx)
    }

    /// Start watching the file. The returned watcher must be kept alive.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let tx = self.update_tx.clone();
        let path = self.path.clone();

        let mut watcher = RecommendedWatcher::new(move |res: notify::Result<Event>| {
            match res {
                Ok(event) => {
                    if event.kind.is_modify() || event.kind.is_create() {
                        tracing::info!(path = ?path, "Config file change detected, reloading");
                        match load_config(&path) {
                            Ok(new_config) => {
                                let _ = tx.send(new_config);
                            }
                            Err(e) => {
                                tracing::error!(error = %e, "Failed to reload config. Keeping current alias lists.");
                            }
                        }
                    }
                }
                Err(e) => tracing::error!(error = ?e, "Watch error"),
            }
        }, Config::default().with_poll_interval(Duration::from_secs(2)))?;

        watcher.watch(&self.path, RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?self.path, "Config watcher started");
        Ok(watcher)
    }
}

/// Apply reloaded configurations to the registry until shutdown.
///
/// Only `[[domains]]` is reconciled live; health, admin and observability
/// settings take effect on restart.
pub async fn apply_updates(
    registry: Arc<DirectoryRegistry>,
    mut updates: mpsc::UnboundedReceiver<FailoverConfig>,
    mut shutdown: broadcast::Receiver<()>,
) {
    loop {
        tokio::select! {
            update = updates.recv() => {
                let Some(config) = update else {
                    tracing::debug!("Config update channel closed");
                    break;
                };
                match registry.apply(&config.domains) {
                    Ok(()) => tracing::info!(domains = registry.len(), "Reloaded domain configuration applied"),
                    Err(e) => tracing::error!(error = %e, "Failed to apply reloaded configuration"),
                }
            }
            _ = shutdown.recv() => {
                tracing::info!("Config reload loop received shutdown signal, exiting loop");
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DomainConfig;
    use crate::directory::SweepPolicy;
    use crate::lifecycle::Shutdown;
    use crate::probe::FixedProbe;

    fn config(aliases: &[&str]) -> FailoverConfig {
        FailoverConfig {
            domains: vec![DomainConfig {
                primary: "example.com".into(),
                aliases: aliases.iter().map(|a| a.to_string()).collect(),
            }],
            ..FailoverConfig::default()
        }
    }

    #[tokio::test]
    async fn test_apply_updates_until_channel_closes() {
        let registry = Arc::new(
            DirectoryRegistry::from_config(
                &config(&["m1.example.com"]).domains,
                Arc::new(FixedProbe::reachable()),
                SweepPolicy::default(),
            )
            .unwrap(),
        );
        let (tx, rx) = mpsc::unbounded_channel();
        let shutdown = Shutdown::new();

        tx.send(config(&["m2.example.com"])).unwrap();
        drop(tx);
        apply_updates(registry.clone(), rx, shutdown.subscribe()).await;

        let directory = registry.get("example.com").unwrap();
        assert_eq!(directory.current_records().names(), vec!["m2.example.com"]);
    }

    #[tokio::test]
    async fn test_apply_updates_stops_on_shutdown() {
        let registry = Arc::new(DirectoryRegistry::new(Arc::new(FixedProbe::reachable()), SweepPolicy::default()));
        let (_tx, rx) = mpsc::unbounded_channel();
        let shutdown = Shutdown::new();

        let handle = tokio::spawn(apply_updates(registry, rx, shutdown.subscribe()));
        shutdown.trigger();
        handle.await.unwrap();
    }
}
