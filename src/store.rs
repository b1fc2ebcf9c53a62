//! In-memory price store shared between the refresh loop and readers
//!
//! One mutex guards both the record table and the connectivity state so the
//! two cannot go observably out of sync. Every critical section is a handful
//! of in-memory field copies; no method performs I/O or awaits anything while
//! holding the lock, and no accessor returns a reference into the guarded
//! data - readers always get owned snapshots.

use std::collections::{HashMap, HashSet};

use tokio::sync::Mutex;

use crate::{
    catalog,
    error::StoreError,
    types::{CoinRecord, ConnectivityState, PriceUpdate},
};

/// Everything under the single exclusion domain
struct StoreInner {
    /// Records in catalog order; membership fixed at construction
    records: Vec<CoinRecord>,
    connectivity: ConnectivityState,
}

/// Shared store for coin records and connectivity state
pub struct PriceStore {
    inner: Mutex<StoreInner>,
}

impl PriceStore {
    /// Creates a store populated from the catalog, prices unfetched
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(StoreInner {
                records: catalog::CATALOG.iter().map(CoinRecord::new).collect(),
                connectivity: ConnectivityState::default(),
            }),
        }
    }

    /// Returns a point-in-time copy of every record, in catalog order
    pub async fn snapshot(&self) -> Vec<CoinRecord> {
        let inner = self.inner.lock().await;
        inner.records.clone()
    }

    /// Returns a point-in-time copy of the watched records, in catalog order
    pub async fn watched_snapshot(&self) -> Vec<CoinRecord> {
        let inner = self.inner.lock().await;
        inner
            .records
            .iter()
            .filter(|r| r.watched)
            .cloned()
            .collect()
    }

    /// Returns the ids currently marked watched, in catalog order
    ///
    /// This is what gets handed to the watchlist file; collecting ids inside
    /// the critical section keeps the save itself outside the lock.
    pub async fn watched_ids(&self) -> Vec<String> {
        let inner = self.inner.lock().await;
        inner
            .records
            .iter()
            .filter(|r| r.watched)
            .map(|r| r.id.clone())
            .collect()
    }

    /// Sets the watched flag for exactly one coin
    ///
    /// # Errors
    /// Returns `StoreError::NotFound` if the id is not in the catalog; the
    /// store is left unchanged in that case.
    pub async fn set_watched(&self, id: &str, watched: bool) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().await;
        match inner.records.iter_mut().find(|r| r.id == id) {
            Some(record) => {
                record.watched = watched;
                Ok(())
            }
            None => Err(StoreError::not_found(id)),
        }
    }

    /// Marks every record whose id appears in the persisted set
    ///
    /// Startup-only bulk initialization from the watchlist file. Ids that are
    /// no longer in the catalog are ignored.
    pub async fn init_watchlist(&self, ids: &HashSet<String>) {
        let mut inner = self.inner.lock().await;
        for record in inner.records.iter_mut() {
            if ids.contains(&record.id) {
                record.watched = true;
            }
        }
    }

    /// Applies a batch of price updates atomically
    ///
    /// For each id present in both the store and the batch, overwrites the
    /// price and/or change where the update carries a value. Ids not in the
    /// catalog are silently ignored - the API may return unknown or
    /// deprecated coins. The whole batch applies inside one critical
    /// section, so a concurrent snapshot sees either all of it or none.
    pub async fn apply_price_updates(&self, updates: HashMap<String, PriceUpdate>) {
        let mut inner = self.inner.lock().await;
        for record in inner.records.iter_mut() {
            if let Some(update) = updates.get(&record.id) {
                if let Some(price) = update.price {
                    record.price = price;
                }
                if let Some(change) = update.change_24h {
                    record.change_24h = change;
                }
            }
        }
    }

    /// Returns a copy of the current connectivity state
    pub async fn connectivity(&self) -> ConnectivityState {
        let inner = self.inner.lock().await;
        inner.connectivity.clone()
    }

    /// Records a successful fetch cycle, refreshing the timestamp
    pub async fn set_connected(&self, last_update: String) {
        let mut inner = self.inner.lock().await;
        inner.connectivity.connected = true;
        inner.connectivity.last_update = last_update;
    }

    /// Records a failed fetch cycle; the last-update timestamp is untouched
    pub async fn set_disconnected(&self) {
        let mut inner = self.inner.lock().await;
        inner.connectivity.connected = false;
    }
}

impl Default for PriceStore {
    fn default() -> Self {
        Self::new()
    }
}
