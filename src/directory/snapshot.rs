//! Immutable, ordered alias snapshot with keyed lookup.

use std::collections::HashMap;
use std::sync::Arc;

use crate::directory::record::AliasRecord;

/// A point-in-time view of a directory's aliases.
///
/// `order` is the failover preference order. `index` maps alias names to the
/// same records, so a snapshot never holds two records for one name.
#[derive(Debug, Default)]
pub struct AliasSnapshot {
    order: Vec<Arc<AliasRecord>>,
    index: HashMap<String, Arc<AliasRecord>>,
}

impl AliasSnapshot {
    /// Build a snapshot, keeping the first record seen for each alias name.
    pub fn from_records(records: impl IntoIterator<Item = Arc<AliasRecord>>) -> Self {
        let mut order = Vec::new();
        let mut index = HashMap::new();

        for record in records {
            if index.contains_key(record.alias_name()) {
                continue;
            }
            index.insert(record.alias_name().to_string(), record.clone());
            order.push(record);
        }

        Self { order, index }
    }

    pub fn get(&self, alias: &str) -> Option<&Arc<AliasRecord>> {
        self.index.get(alias)
    }

    pub fn contains(&self, alias: &str) -> bool {
        self.index.contains_key(alias)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Arc<AliasRecord>> {
        self.order.iter()
    }

    pub fn records(&self) -> &[Arc<AliasRecord>] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Alias names in preference order.
    pub fn names(&self) -> Vec<&str> {
        self.order.iter().map(|r| r.alias_name()).collect()
    }

    /// First online alias in preference order.
    pub fn first_online(&self) -> Option<&Arc<AliasRecord>> {
        self.order.iter().find(|r| r.is_online())
    }

    /// A copy of this snapshot without the given records.
    ///
    /// Removal is by record identity, not name, so a record re-created by a
    /// concurrent alias update is not removed by mistake.
    pub fn without(&self, evicted: &[Arc<AliasRecord>]) -> Self {
        Self::from_records(
            self.order
                .iter()
                .filter(|r| !evicted.iter().any(|e| Arc::ptr_eq(e, *r)))
                .cloned(),
        )
    }
}

impl<'a> IntoIterator for &'a AliasSnapshot {
    type Item = &'a Arc<AliasRecord>;
    type IntoIter = std::slice::Iter<'a, Arc<AliasRecord>>;

    fn into_iter(self) -> Self::IntoIter {
        self.order.iter()
    }
}
