//! Metrics collection and exposition.
//!
//! # Metrics
//! - `failover_primary_online` (gauge): 1=trusted, 0=marked offline
//! - `failover_alias_online` (gauge): 1=online, 0=offline, per alias
//! - `failover_domain_marked_offline_total` (counter): caller-reported failures
//! - `failover_probe_total` (counter): probes by outcome
//! - `failover_alias_evicted_total` (counter)
//! - `failover_sweeps_total` (counter)
//! - `failover_directory_resets_total` (counter)
//!
//! An alias that leaves the directory, by eviction or by an alias update that
//! drops it, has its `failover_alias_online` series set to 0. The exporter
//! keeps that series until the process restarts.

use std::net::SocketAddr;
use metrics::{counter, gauge};
use metrics_exporter_prometheus::PrometheusBuilder;

use crate::directory::SweepReport;

/// Install the Prometheus recorder and its HTTP listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

fn flag(value: bool) -> f64 {
    if value { 1.0 } else { 0.0 }
}

pub fn record_primary_online(primary: &str, online: bool) {
    gauge!("failover_primary_online", "primary" => primary.to_string()).set(flag(online));
}

pub fn record_alias_online(primary: &str, alias: &str, online: bool) {
    gauge!(
        "failover_alias_online",
        "primary" => primary.to_string(),
        "alias" => alias.to_string()
    )
    .set(flag(online));
}

/// Zero the online gauge of an alias that is no longer in the directory.
pub fn record_alias_departed(primary: &str, alias: &str) {
    record_alias_online(primary, alias, false);
}

pub fn record_marked_offline(primary: &str, name: &str) {
    counter!(
        "failover_domain_marked_offline_total",
        "primary" => primary.to_string(),
        "domain" => name.to_string()
    )
    .increment(1);
}

pub fn record_sweep(primary: &str, report: &SweepReport) {
    counter!("failover_sweeps_total", "primary" => primary.to_string()).increment(1);

    if report.reset {
        counter!("failover_directory_resets_total", "primary" => primary.to_string()).increment(1);
    }

    counter!("failover_probe_total", "primary" => primary.to_string(), "outcome" => "reachable")
        .increment(report.reachable.len() as u64);
    counter!("failover_probe_total", "primary" => primary.to_string(), "outcome" => "unreachable")
        .increment(report.unreachable.len() as u64);

    for alias in &report.evicted {
        counter!(
            "failover_alias_evicted_total",
            "primary" => primary.to_string(),
            "alias" => alias.clone()
        )
        .increment(1);
    }
}
