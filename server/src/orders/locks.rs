//! Per-table write leases
//!
//! Every mutation of an order (and its table/cart) runs while holding the
//! lease for that table, so concurrent submissions for the same table
//! serialize instead of racing the one-active-order invariant. Leases are
//! created lazily and kept for the life of the process; a restaurant has a
//! bounded number of tables.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

#[derive(Clone, Default)]
pub struct TableLocks {
    locks: Arc<DashMap<String, Arc<Mutex<()>>>>,
}

impl TableLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the lease for a table key, waiting for any holder to finish
    pub async fn acquire(&self, key: &str) -> OwnedMutexGuard<()> {
        let lock = self
            .locks
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        lock.lock_owned().await
    }
}
