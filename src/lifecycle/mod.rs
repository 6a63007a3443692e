//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → shutdown requested
//!
//! Shutdown (shutdown.rs):
//!     trigger() → sweeper, config reload loop, admin API all exit
//! ```

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
