//! Per-table mutual exclusion for load-modify-save cycles
//!
//! Every write loads the whole table file, changes it in memory and writes it
//! back. Two writers interleaving those steps lose one update, so each table
//! gets its own lock and a cycle holds it from load to save.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use log::debug;
use tokio::sync::{Mutex, OwnedMutexGuard};

use super::schema::TableKind;

/// One async mutex per table
#[derive(Debug, Clone)]
pub struct TableLocks {
    locks: Arc<HashMap<TableKind, Arc<Mutex<()>>>>,
    waits: Arc<AtomicU64>,
}

impl TableLocks {
    pub fn new() -> Self {
        let locks = TableKind::ALL
            .into_iter()
            .map(|kind| (kind, Arc::new(Mutex::new(()))))
            .collect();

        Self {
            locks: Arc::new(locks),
            waits: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Acquire the lock for a table. Waits if another cycle holds it.
    /// The guard releases the lock when dropped.
    pub async fn acquire(&self, kind: TableKind) -> OwnedMutexGuard<()> {
        let lock = self.lock_for(kind);

        let guard = match lock.clone().try_lock_owned() {
            Ok(guard) => guard,
            Err(_) => {
                let waits = self.waits.fetch_add(1, Ordering::Relaxed) + 1;
                debug!("Table lock: waiting for {} ({} contended acquisitions)", kind, waits);
                lock.lock_owned().await
            }
        };

        debug!("Table lock: acquired {}", kind);
        guard
    }

    /// Try to acquire without waiting
    #[cfg(test)]
    pub fn try_acquire(&self, kind: TableKind) -> Option<OwnedMutexGuard<()>> {
        self.lock_for(kind).try_lock_owned().ok()
    }

    fn lock_for(&self, kind: TableKind) -> Arc<Mutex<()>> {
        // Every TableKind is inserted in new()
        self.locks
            .get(&kind)
            .cloned()
            .unwrap_or_else(|| Arc::new(Mutex::new(())))
    }
}

impl Default for TableLocks {
    fn default() -> Self {
        Self::new()
    }
}
