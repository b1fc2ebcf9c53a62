//! Types for the coin tracker

use serde::{Deserialize, Serialize};

use crate::catalog::CoinInfo;

/// Market data for a single tracked coin
///
/// Records are created once at startup from the catalog; afterwards only
/// `price`, `change_24h` and `watched` mutate. Snapshots hand out owned
/// copies of these, never references into the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinRecord {
    /// CoinGecko ID (e.g. "bitcoin"); unique and immutable
    pub id: String,
    /// Trading symbol (e.g. "BTC")
    pub symbol: String,
    /// Display name (e.g. "Bitcoin")
    pub name: String,
    /// Current price in USD; 0.0 means never fetched
    pub price: f64,
    /// 24-hour percentage change (signed)
    pub change_24h: f64,
    /// Whether the coin is on the user's watchlist
    pub watched: bool,
}

impl CoinRecord {
    /// Creates a fresh record for a catalog entry, prices unfetched
    pub fn new(info: &CoinInfo) -> Self {
        Self {
            id: info.id.to_string(),
            symbol: info.symbol.to_string(),
            name: info.name.to_string(),
            price: 0.0,
            change_24h: 0.0,
            watched: false,
        }
    }
}

/// A partial price update for one coin, parsed from one API response entry
///
/// The API may omit either field per coin; `None` leaves the stored value
/// untouched rather than zeroing it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PriceUpdate {
    /// New USD price, if present in the response
    pub price: Option<f64>,
    /// New 24-hour change percentage, if present in the response
    pub change_24h: Option<f64>,
}

impl PriceUpdate {
    /// Creates an update carrying both fields
    pub fn new(price: f64, change_24h: f64) -> Self {
        Self {
            price: Some(price),
            change_24h: Some(change_24h),
        }
    }
}

/// Health of the connection to the market data API
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConnectivityState {
    /// True if the most recent fetch cycle succeeded
    pub connected: bool,
    /// Local time of day of the last successful update, formatted %H:%M:%S;
    /// empty until the first success, untouched by failures
    pub last_update: String,
}
