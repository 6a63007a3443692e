//! Domain failover directory.
//!
//! Tracks a primary endpoint name and a changing set of aliases, learns which
//! of them are reachable, and answers "which name should I use right now?"
//! without blocking on the network.

pub mod config;
pub mod directory;
pub mod probe;
pub mod health;
pub mod lifecycle;
pub mod observability;
pub mod admin;

pub use config::schema::FailoverConfig;
pub use directory::{DirectoryRegistry, FailoverDirectory};
pub use lifecycle::Shutdown;
pub use probe::ReachabilityProbe;
