//! Background refresh loop and the public tracker facade
//!
//! `CoinTracker` owns the shared price store, the price provider and the
//! watchlist file, and drives the periodic fetch loop on a background task.
//! The foreground (a UI or any other consumer) talks only to this facade:
//! copy-out snapshots, watchlist toggles and a manual refresh trigger.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::Local;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::{
    catalog,
    constants::{LAST_UPDATE_FORMAT, REFRESH_INTERVAL_SECS},
    error::{FetchError, StoreError},
    provider::PriceProvider,
    providers::CoinGeckoProvider,
    store::PriceStore,
    types::{CoinRecord, ConnectivityState},
    watchlist::WatchlistStore,
};

/// Coin price tracker with a background refresh loop
///
/// Construct once and share by handle; the store's internal lock is the only
/// synchronization between the refresh task and foreground callers.
pub struct CoinTracker {
    store: Arc<PriceStore>,
    provider: Arc<dyn PriceProvider>,
    watchlist: Arc<WatchlistStore>,
    shutdown_tx: watch::Sender<bool>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl CoinTracker {
    /// Creates a tracker with the given provider and watchlist storage
    pub fn new(provider: Arc<dyn PriceProvider>, watchlist: WatchlistStore) -> Self {
        let (shutdown_tx, _) = watch::channel(false);
        Self {
            store: Arc::new(PriceStore::new()),
            provider,
            watchlist: Arc::new(watchlist),
            shutdown_tx,
            task: Mutex::new(None),
        }
    }

    /// Creates a tracker against the production CoinGecko API with the
    /// watchlist under the platform data directory
    pub fn with_defaults() -> Result<Self, FetchError> {
        let provider = Arc::new(CoinGeckoProvider::new()?);
        let watchlist = match WatchlistStore::new() {
            Ok(watchlist) => watchlist,
            Err(e) => {
                // Degrade to a local path rather than refusing to start
                warn!(error = %e, "No platform data directory, using ./data");
                WatchlistStore::with_path(
                    std::path::PathBuf::from("data").join(crate::constants::WATCHLIST_FILE_NAME),
                )
            }
        };
        Ok(Self::new(provider, watchlist))
    }

    /// Loads the persisted watchlist and starts the background refresh loop
    ///
    /// The loop performs one fetch cycle immediately, then refetches every
    /// 30 seconds until `shutdown` is called. Calling `start` twice is a
    /// no-op.
    pub async fn start(&self) {
        {
            let task = self.task.lock().unwrap();
            if task.is_some() {
                debug!("Tracker already started");
                return;
            }
        }

        match self.watchlist.load().await {
            Ok(ids) => self.store.init_watchlist(&ids).await,
            Err(e) => {
                warn!(error = %e, "Failed to load watchlist, starting empty");
                self.store.init_watchlist(&HashSet::new()).await;
            }
        }

        let store = self.store.clone();
        let provider = self.provider.clone();
        let mut shutdown_rx = self.shutdown_tx.subscribe();

        let handle = tokio::spawn(async move {
            info!(
                refresh_interval_secs = REFRESH_INTERVAL_SECS,
                provider = provider.provider_name(),
                "Starting price refresh loop"
            );

            // Initial fetch before the first wait
            Self::fetch_cycle(&provider, &store).await;

            loop {
                // The wait is interruptible: a shutdown signal aborts it
                // promptly instead of running out the full interval.
                tokio::select! {
                    _ = sleep(Duration::from_secs(REFRESH_INTERVAL_SECS)) => {
                        Self::fetch_cycle(&provider, &store).await;
                    }
                    _ = shutdown_rx.changed() => {
                        info!("Price refresh loop stopping");
                        break;
                    }
                }
            }
        });

        *self.task.lock().unwrap() = Some(handle);
    }

    /// Runs one fetch cycle: request prices for the whole catalog and apply
    /// the result, or flip connectivity to disconnected on failure
    ///
    /// Fetch errors are terminal only to this one cycle; the loop survives
    /// any number of consecutive failures.
    async fn fetch_cycle(provider: &Arc<dyn PriceProvider>, store: &Arc<PriceStore>) {
        // Catalog ids are immutable, no store lock needed here
        let ids = catalog::ids();

        match provider.fetch_prices(&ids).await {
            Ok(updates) => {
                let count = updates.len();
                store.apply_price_updates(updates).await;
                let now = Local::now().format(LAST_UPDATE_FORMAT).to_string();
                store.set_connected(now.clone()).await;
                debug!(count, last_update = %now, "Prices updated");
            }
            Err(e) => {
                warn!(error = %e, "Price fetch failed");
                store.set_disconnected().await;
            }
        }
    }

    /// Forces an immediate fetch cycle on the caller's task
    ///
    /// Uses the same code path as the periodic loop; a cycle concurrently in
    /// flight is fine, the store serializes the writes (last writer wins).
    /// This performs network I/O and may block for up to the request timeout.
    pub async fn refresh_now(&self) {
        Self::fetch_cycle(&self.provider, &self.store).await;
    }

    /// Returns a consistent copy of every coin record, in catalog order
    pub async fn snapshot(&self) -> Vec<CoinRecord> {
        self.store.snapshot().await
    }

    /// Returns a consistent copy of the watched coin records
    pub async fn watched_snapshot(&self) -> Vec<CoinRecord> {
        self.store.watched_snapshot().await
    }

    /// Returns the current connectivity state
    pub async fn connectivity(&self) -> ConnectivityState {
        self.store.connectivity().await
    }

    /// Adds or removes a coin from the watchlist and saves it
    ///
    /// The save runs after the store lock is released. A save failure is
    /// logged and the in-memory flag is kept; only an unknown id is an
    /// error.
    ///
    /// # Errors
    /// Returns `StoreError::NotFound` if the id is not in the catalog.
    pub async fn set_watched(&self, id: &str, watched: bool) -> Result<(), StoreError> {
        self.store.set_watched(id, watched).await?;

        let ids = self.store.watched_ids().await;
        if let Err(e) = self.watchlist.save(&ids).await {
            warn!(error = %e, id, "Failed to save watchlist, keeping in-memory state");
        }
        Ok(())
    }

    /// Stops the background loop and saves the watchlist one final time
    ///
    /// Blocks until the loop has actually terminated; a loop mid-wait wakes
    /// up well within a second. Safe to call more than once.
    pub async fn shutdown(&self) {
        let _ = self.shutdown_tx.send(true);

        let handle = self.task.lock().unwrap().take();
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                warn!(error = %e, "Refresh task ended abnormally");
            }

            let ids = self.store.watched_ids().await;
            if let Err(e) = self.watchlist.save(&ids).await {
                warn!(error = %e, "Failed to save watchlist on shutdown");
            }
            info!("Tracker shut down");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::mock::MockProvider;
    use crate::types::PriceUpdate;
    use std::collections::HashMap;
    use std::time::Instant;
    use tempfile::tempdir;

    fn btc_update(price: f64, change: f64) -> HashMap<String, PriceUpdate> {
        let mut updates = HashMap::new();
        updates.insert("bitcoin".to_string(), PriceUpdate::new(price, change));
        updates
    }

    fn tracker_in(dir: &tempfile::TempDir, provider: MockProvider) -> CoinTracker {
        CoinTracker::new(
            Arc::new(provider),
            WatchlistStore::with_path(dir.path().join("watchlist.json")),
        )
    }

    #[tokio::test]
    async fn refresh_now_applies_partial_response() {
        let dir = tempdir().unwrap();
        let tracker = tracker_in(&dir, MockProvider::always(btc_update(50000.0, 2.5)));

        tracker.refresh_now().await;

        let snapshot = tracker.snapshot().await;
        let btc = snapshot.iter().find(|r| r.id == "bitcoin").unwrap();
        assert_eq!(btc.price, 50000.0);
        assert_eq!(btc.change_24h, 2.5);

        // Ethereum was absent from the response and stays unfetched
        let eth = snapshot.iter().find(|r| r.id == "ethereum").unwrap();
        assert_eq!(eth.price, 0.0);
        assert_eq!(eth.change_24h, 0.0);

        let state = tracker.connectivity().await;
        assert!(state.connected);
        assert!(!state.last_update.is_empty());
    }

    #[tokio::test]
    async fn failed_cycle_flips_connectivity_and_keeps_prices() {
        let dir = tempdir().unwrap();
        let tracker = tracker_in(
            &dir,
            MockProvider::sequence(vec![
                Ok(btc_update(50000.0, 2.5)),
                Err(FetchError::InvalidResponse("boom".to_string())),
                Ok(btc_update(51000.0, 3.0)),
            ]),
        );

        tracker.refresh_now().await;
        let after_success = tracker.connectivity().await;
        assert!(after_success.connected);

        tracker.refresh_now().await;
        let snapshot = tracker.snapshot().await;
        let btc = snapshot.iter().find(|r| r.id == "bitcoin").unwrap();
        assert_eq!(btc.price, 50000.0);
        let state = tracker.connectivity().await;
        assert!(!state.connected);
        // Timestamp survives the failure
        assert_eq!(state.last_update, after_success.last_update);

        tracker.refresh_now().await;
        let snapshot = tracker.snapshot().await;
        let btc = snapshot.iter().find(|r| r.id == "bitcoin").unwrap();
        assert_eq!(btc.price, 51000.0);
        assert!(tracker.connectivity().await.connected);
    }

    #[tokio::test]
    async fn start_fetches_immediately() {
        let dir = tempdir().unwrap();
        let tracker = tracker_in(&dir, MockProvider::always(btc_update(50000.0, 2.5)));

        tracker.start().await;
        // The initial cycle runs before the first 30s wait
        tokio::time::sleep(Duration::from_millis(100)).await;

        let snapshot = tracker.snapshot().await;
        let btc = snapshot.iter().find(|r| r.id == "bitcoin").unwrap();
        assert_eq!(btc.price, 50000.0);

        tracker.shutdown().await;
    }

    #[tokio::test]
    async fn set_watched_persists_and_reloads() {
        let dir = tempdir().unwrap();

        {
            let tracker = tracker_in(&dir, MockProvider::always(HashMap::new()));
            tracker.set_watched("bitcoin", true).await.unwrap();
            tracker.set_watched("solana", true).await.unwrap();
            tracker.set_watched("solana", false).await.unwrap();

            let watched = tracker.watched_snapshot().await;
            assert_eq!(watched.len(), 1);
            assert_eq!(watched[0].id, "bitcoin");
        }

        // A fresh tracker over the same file restores the flags on start
        let tracker = tracker_in(&dir, MockProvider::always(HashMap::new()));
        tracker.start().await;
        let watched = tracker.watched_snapshot().await;
        assert_eq!(watched.len(), 1);
        assert_eq!(watched[0].id, "bitcoin");
        tracker.shutdown().await;
    }

    #[tokio::test]
    async fn set_watched_unknown_id_is_not_found() {
        let dir = tempdir().unwrap();
        let tracker = tracker_in(&dir, MockProvider::always(HashMap::new()));

        let err = tracker.set_watched("doge9999", true).await.unwrap_err();
        assert_eq!(err, StoreError::not_found("doge9999"));
        assert!(tracker.watched_snapshot().await.is_empty());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn shutdown_mid_wait_is_prompt() {
        let dir = tempdir().unwrap();
        let tracker = tracker_in(&dir, MockProvider::always(btc_update(50000.0, 2.5)));

        tracker.start().await;
        // Let the loop get past the initial fetch and into the 30s wait
        tokio::time::sleep(Duration::from_millis(100)).await;

        let started = Instant::now();
        tracker.shutdown().await;
        assert!(started.elapsed() < Duration::from_secs(1));

        // Second shutdown is a no-op
        tracker.shutdown().await;
    }
}
