//! Health sweep scheduling.
//!
//! # Data Flow
//! ```text
//! Periodic timer (sweeper.rs)
//!     → DirectoryRegistry::sweep_all
//!     → FailoverDirectory::check_statuses per primary
//!     → probe / evict / reset
//! ```
//!
//! # Design Decisions
//! - The directories own no timers; this module is the only scheduler
//! - Sweeps never run on a request path
//! - Caller-reported failures (mark_domain_offline) act immediately,
//!   independent of the sweep cycle

pub mod sweeper;
