//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Directories, sweeper, admin API produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, gauges)
//!
//! Consumers:
//!     → stdout (pretty or JSON)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Structured key/value fields on every event (primary, alias)
//! - Metric calls are no-ops until a recorder is installed, so the library
//!   can record unconditionally

pub mod logging;
pub mod metrics;
