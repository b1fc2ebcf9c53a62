//! # Coin Tracker
//!
//! Tracks a fixed catalog of cryptocurrencies: a background loop fetches live
//! USD prices and 24-hour change from CoinGecko every 30 seconds, the user
//! marks coins as watched, and the watchlist survives restarts on disk.
//!
//! The heart of the crate is the pair of [`store::PriceStore`] and
//! [`tracker::CoinTracker`]: one mutex-guarded record table mutated by the
//! refresh loop and read concurrently by any number of consumers, with the
//! lock never held across network or file I/O. Readers always receive owned
//! snapshots, never references into the shared table.
//!
//! ## Usage
//!
//! ```no_run
//! use coin_tracker::CoinTracker;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let tracker = CoinTracker::with_defaults()?;
//! tracker.start().await;
//!
//! // Read a consistent snapshot at any time
//! for coin in tracker.snapshot().await {
//!     println!("{} ({}): ${:.2} [{:+.2}%]", coin.name, coin.symbol, coin.price, coin.change_24h);
//! }
//!
//! // Watchlist toggles persist across restarts
//! tracker.set_watched("bitcoin", true).await?;
//!
//! // Stops the refresh loop and saves the watchlist
//! tracker.shutdown().await;
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! CoinTracker::start()
//!     |
//! Background task (fetch on start, then every 30s, interruptible wait)
//!     |
//! PriceProvider (CoinGecko simple/price)
//!     |
//! PriceStore (records + connectivity under one lock)
//!     |
//! Your code (snapshot, watched_snapshot, connectivity, set_watched, refresh_now)
//! ```
//!
//! Fetch failures never crash the loop; they flip the connectivity state to
//! disconnected until the next successful cycle.

pub mod catalog;
pub mod constants;
pub mod error;
pub mod provider;
pub mod providers;
pub mod store;
pub mod tracker;
pub mod types;
pub mod watchlist;

// Re-export commonly used types
pub use error::{FetchError, StoreError, WatchlistError};
pub use tracker::CoinTracker;
pub use types::{CoinRecord, ConnectivityState, PriceUpdate};
