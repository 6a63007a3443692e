//! Serializable views of directory state.

use serde::{Deserialize, Serialize};

use crate::directory::record::{AliasRecord, AliasState};

/// Point-in-time status of one directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainStatus {
    pub primary: String,
    pub primary_online: bool,
    /// What `domain_name_to_use` answered when the status was taken.
    pub domain_in_use: String,
    /// Aliases in failover preference order.
    pub aliases: Vec<AliasStatus>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasStatus {
    pub alias: String,
    pub state: AliasState,
    pub failed_attempts: u32,
    pub last_probed_unix_ms: Option<u64>,
}

impl From<&AliasRecord> for AliasStatus {
    fn from(record: &AliasRecord) -> Self {
        Self {
            alias: record.alias_name().to_string(),
            state: record.state(),
            failed_attempts: record.failed_attempts(),
            last_probed_unix_ms: record.last_probed_unix_ms(),
        }
    }
}

/// What a single health sweep did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepReport {
    pub primary: String,
    /// Aliases that answered their probe.
    pub reachable: Vec<String>,
    /// Aliases whose probe failed.
    pub unreachable: Vec<String>,
    /// Aliases removed for exceeding the eviction threshold.
    pub evicted: Vec<String>,
    /// The alias set was empty and the directory reset itself.
    pub reset: bool,
}

impl SweepReport {
    pub fn probed(&self) -> usize {
        self.reachable.len() + self.unreachable.len()
    }
}
