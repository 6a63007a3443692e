//! Domain failover daemon.
//!
//! ```text
//!                  ┌──────────────────────────────────────────────────┐
//!   config file ──▶│ loader ─▶ registry ◀── watcher (alias updates)   │
//!                  │              │                                   │
//!                  │              ├─▶ sweeper ─▶ probes (http/tcp/dns)│
//!                  │              │                                   │
//!   admin client ─▶│ admin API ───┘   resolve / offline / aliases     │
//!                  └──────────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use clap::Parser;
use tokio::net::TcpListener;

use domain_failover::admin::{self, AdminState};
use domain_failover::config::loader::load_config;
use domain_failover::config::watcher::{apply_updates, ConfigWatcher};
use domain_failover::directory::DirectoryRegistry;
use domain_failover::health::sweeper::HealthSweeper;
use domain_failover::lifecycle::{signals, Shutdown};
use domain_failover::observability::{logging, metrics};
use domain_failover::probe;

#[derive(Parser)]
#[command(name = "domain-failover")]
#[command(about = "Primary/alias domain failover directory", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "failover.toml")]
    config: PathBuf,

    /// Do not watch the configuration file for alias changes.
    #[arg(long)]
    no_watch: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(&cli.config)?;

    logging::init_logging(&config.observability)?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        config = ?cli.config,
        domains = config.domains.len(),
        "domain-failover starting"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let probe = probe::from_config(&config.health)?;
    let registry = Arc::new(DirectoryRegistry::from_config(
        &config.domains,
        probe,
        config.health.policy(),
    )?);

    let shutdown = Shutdown::new();
    let mut tasks = Vec::new();

    let sweeper = HealthSweeper::new(registry.clone(), config.health.clone());
    tasks.push(tokio::spawn(sweeper.run(shutdown.subscribe())));

    // Dropping the watcher stops it, so it lives until main returns.
    let _watcher = if cli.no_watch {
        None
    } else {
        let (watcher, updates) = ConfigWatcher::new(&cli.config);
        let watcher = watcher.run()?;
        tasks.push(tokio::spawn(apply_updates(registry.clone(), updates, shutdown.subscribe())));
        Some(watcher)
    };

    if config.admin.enabled {
        let listener = TcpListener::bind(&config.admin.bind_address).await?;
        let state = AdminState::new(registry.clone(), &config.admin.api_key);
        let admin_shutdown = shutdown.clone();
        tasks.push(tokio::spawn(async move {
            if let Err(e) = admin::serve(listener, state, admin_shutdown).await {
                tracing::error!(error = %e, "Admin API stopped");
            }
        }));
    }

    signals::shutdown_signal().await;
    tracing::info!(tasks = shutdown.receiver_count(), "Shutting down");
    shutdown.trigger();

    for task in tasks {
        let _ = task.await;
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
