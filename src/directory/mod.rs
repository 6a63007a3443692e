//! Domain failover directory.
//!
//! # Data Flow
//! ```text
//! Request layer:
//!     domain_name_to_use() → primary, or first online alias
//!     request fails → mark_domain_offline(name)
//!
//! Configuration feed:
//!     update_alias_set(names)
//!     → carry over known records, create new ones, drop missing
//!     → shuffle → atomic snapshot swap
//!
//! Scheduler:
//!     check_statuses()
//!     → probe aliases within the eviction threshold (record.rs)
//!     → evict the rest in one swap
//!     → empty directory: reset, primary back in service
//! ```
//!
//! # Design Decisions
//! - Snapshots are immutable and published through `ArcSwap`; reads never lock
//! - One mutex per directory serializes snapshot replacement
//! - Record health lives in atomics so it can change without a new snapshot
//! - No usable alias still yields the primary name, never nothing

pub mod failover;
pub mod record;
pub mod registry;
pub mod snapshot;
pub mod status;

pub use failover::{DirectoryError, FailoverDirectory, SweepPolicy};
pub use record::{AliasRecord, AliasState};
pub use registry::DirectoryRegistry;
pub use snapshot::AliasSnapshot;
pub use status::{AliasStatus, DomainStatus, SweepReport};
