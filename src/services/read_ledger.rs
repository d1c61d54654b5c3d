//! Persistent record of acknowledged notification ids.

use super::store::{KeyValueStore, StoreError};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, warn};

/// Storage key of the read-id set.
pub const READ_NOTIFICATIONS_KEY: &str = "read_notifications";

/// The set of notification ids the operator has dismissed.
///
/// Ids are only ever added. Every change bumps a generation counter; the
/// stored value is the whole set as a JSON array of strings, rewritten by a
/// [`LedgerWrite`] taken after the change.
pub struct ReadLedger {
    store: Arc<dyn KeyValueStore>,
    ids: BTreeSet<String>,
    generation: u64,
}

/// A pending overwrite of the stored set, detached from the ledger so it
/// can run off the caller's lock.
pub struct LedgerWrite {
    store: Arc<dyn KeyValueStore>,
    encoded: String,
    generation: u64,
}

impl LedgerWrite {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Blocking write to the underlying store.
    pub fn write(self) -> Result<(), StoreError> {
        self.store.set(READ_NOTIFICATIONS_KEY, &self.encoded)
    }
}

impl ReadLedger {
    /// Load the ledger. A missing, unreadable or corrupt entry yields an
    /// empty set.
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let ids = match store.get(READ_NOTIFICATIONS_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<String>>(&raw) {
                Ok(ids) => ids.into_iter().collect(),
                Err(e) => {
                    warn!("Ignoring corrupt read-notification state: {}", e);
                    BTreeSet::new()
                }
            },
            Ok(None) => BTreeSet::new(),
            Err(e) => {
                warn!("Failed to load read-notification state: {}", e);
                BTreeSet::new()
            }
        };

        debug!("Loaded {} read notification ids", ids.len());
        Self {
            store,
            ids,
            generation: 0,
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn ids(&self) -> &BTreeSet<String> {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Add one id in memory. Returns whether the id was new.
    pub fn mark(&mut self, id: &str) -> bool {
        self.generation += 1;
        self.ids.insert(id.to_string())
    }

    /// Add many ids in memory. Returns how many were new.
    pub fn mark_all<'a, I>(&mut self, ids: I) -> usize
    where
        I: IntoIterator<Item = &'a str>,
    {
        let before = self.ids.len();
        self.ids.extend(ids.into_iter().map(str::to_string));
        self.generation += 1;
        self.ids.len() - before
    }

    /// Snapshot the current set for writing.
    pub fn pending_write(&self) -> Result<LedgerWrite, StoreError> {
        Ok(LedgerWrite {
            store: self.store.clone(),
            encoded: serde_json::to_string(&self.ids)?,
            generation: self.generation,
        })
    }

    /// Overwrite the stored set with the in-memory one, synchronously.
    pub fn persist(&self) -> Result<(), StoreError> {
        self.pending_write()?.write()
    }
}
