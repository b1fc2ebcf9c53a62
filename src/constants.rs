//! Constants for the coin tracker
//!
//! All configuration is centralized here. No runtime configuration file is
//! used - the tracker operates with these compile-time constants.

/// How often the background loop fetches prices (in seconds)
pub const REFRESH_INTERVAL_SECS: u64 = 30;

/// HTTP request timeout when fetching prices (in seconds)
pub const REQUEST_TIMEOUT_SECS: u64 = 5;

/// CoinGecko API base URL
pub const COINGECKO_API_URL: &str = "https://api.coingecko.com";

/// CoinGecko API endpoint for simple price queries
pub const COINGECKO_SIMPLE_PRICE_ENDPOINT: &str = "/api/v3/simple/price";

/// User agent for HTTP requests
pub const USER_AGENT: &str = "coin-tracker/0.1.0";

/// File name of the persisted watchlist, under the platform data directory
pub const WATCHLIST_FILE_NAME: &str = "watchlist.json";

/// Format of the connectivity timestamp (local time of day)
pub const LAST_UPDATE_FORMAT: &str = "%H:%M:%S";
