//! Periodic health sweep.
//!
//! # Responsibilities
//! - Sweep every directory on a fixed interval
//! - Log what each sweep changed

use std::sync::Arc;
use std::time::Duration;
use tokio::time::{self, MissedTickBehavior};
use tokio::sync::broadcast;

use crate::config::HealthSweepConfig;
use crate::directory::{DirectoryRegistry, SweepReport};

pub struct HealthSweeper {
    registry: Arc<DirectoryRegistry>,
    config: HealthSweepConfig,
}

impl HealthSweeper {
    pub fn new(registry: Arc<DirectoryRegistry>, config: HealthSweepConfig) -> Self {
        Self { registry, config }
    }

    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        if !self.config.enabled {
            tracing::info!("Health sweeps disabled");
            return;
        }

        tracing::info!(
            interval = self.config.interval_secs,
            probe = ?self.config.probe,
            "Health sweeper starting"
        );

        let interval = Duration::from_secs(self.config.interval_secs);
        let mut ticker = time::interval(interval);
        // A slow sweep delays the next one instead of queueing a burst.
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    // Shutdown abandons a sweep in flight; evictions only land after every probe returns.
                    tokio::select! {
                        _ = self.sweep_once() => {}
                        _ = shutdown.recv() => {
                            tracing::info!("Health sweeper received shutdown signal, abandoning sweep in progress");
                            break;
                        }
                    }
                }
                _ = shutdown.recv() => {
                    tracing::info!("Health sweeper received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }

    /// Run one sweep across all directories.
    pub async fn sweep_once(&self) -> Vec<SweepReport> {
        let reports = self.registry.sweep_all().await;
        for report in &reports {
            log_report(report);
        }
        reports
    }
}

fn log_report(report: &SweepReport) {
    if report.reset {
        tracing::info!(primary = %report.primary, "Sweep found no aliases, directory reset");
        return;
    }

    if report.unreachable.is_empty() && report.evicted.is_empty() {
        tracing::debug!(primary = %report.primary, probed = report.probed(), "Sweep complete, all aliases reachable");
    } else {
        tracing::info!(
            primary = %report.primary,
            probed = report.probed(),
            unreachable = ?report.unreachable,
            evicted = ?report.evicted,
            "Sweep complete"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DomainConfig;
    use crate::directory::SweepPolicy;
    use crate::lifecycle::Shutdown;
    use crate::probe::{FixedProbe, ProbeOutcome, ReachabilityProbe};
    use futures_util::future::{BoxFuture, FutureExt};
    use tokio::sync::Notify;

    /// Never answers; signals once a check has started.
    #[derive(Debug, Default)]
    struct StalledProbe {
        started: Notify,
    }

    impl ReachabilityProbe for StalledProbe {
        fn probe<'a>(&'a self, _name: &'a str) -> BoxFuture<'a, ProbeOutcome> {
            async move {
                self.started.notify_one();
                std::future::pending::<ProbeOutcome>().await
            }
            .boxed()
        }
    }

    fn registry(probe: Arc<dyn ReachabilityProbe>) -> Arc<DirectoryRegistry> {
        let domains = vec![DomainConfig {
            primary: "example.com".into(),
            aliases: vec!["m1.example.com".into()],
        }];
        Arc::new(DirectoryRegistry::from_config(&domains, probe, SweepPolicy::default()).unwrap())
    }

    #[tokio::test]
    async fn test_sweep_once() {
        let probe = Arc::new(FixedProbe::unreachable());
        let sweeper = HealthSweeper::new(registry(probe.clone()), HealthSweepConfig::default());

        let reports = sweeper.sweep_once().await;
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].unreachable, vec!["m1.example.com"]);
        assert_eq!(probe.calls_for("m1.example.com"), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_sweeps_until_shutdown() {
        let probe = Arc::new(FixedProbe::reachable());
        let mut config = HealthSweepConfig::default();
        config.interval_secs = 10;

        let shutdown = Shutdown::new();
        let sweeper = HealthSweeper::new(registry(probe.clone()), config);
        let handle = tokio::spawn(sweeper.run(shutdown.subscribe()));

        // Ticks at 0s, 10s and 20s.
        time::sleep(Duration::from_secs(25)).await;
        shutdown.trigger();
        handle.await.unwrap();

        assert_eq!(probe.calls_for("m1.example.com"), 3);
    }

    #[tokio::test]
    async fn test_disabled_returns_immediately() {
        let probe = Arc::new(FixedProbe::reachable());
        let mut config = HealthSweepConfig::default();
        config.enabled = false;

        let shutdown = Shutdown::new();
        HealthSweeper::new(registry(probe.clone()), config)
            .run(shutdown.subscribe())
            .await;
        assert_eq!(probe.total_calls(), 0);
    }

    #[tokio::test]
    async fn test_shutdown_interrupts_stalled_sweep() {
        let probe = Arc::new(StalledProbe::default());
        let registry = registry(probe.clone());
        let shutdown = Shutdown::new();
        let handle = tokio::spawn(HealthSweeper::new(registry.clone(), HealthSweepConfig::default()).run(shutdown.subscribe()));

        probe.started.notified().await;
        shutdown.trigger();

        time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("sweeper did not stop")
            .unwrap();
        let d = registry.get("example.com").unwrap();
        assert_eq!(d.current_records().names(), vec!["m1.example.com"]);
    }
}
