//! Error types for the coin tracker

use thiserror::Error;

/// Errors that can occur when fetching prices from the market data API
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network request failed (connection failure or timeout)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// API returned a non-success status code
    #[error("API returned HTTP {status}: {body}")]
    Api { status: u16, body: String },

    /// Response body could not be parsed
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Errors that can occur when accessing the price store
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The coin id is not part of the catalog
    #[error("Unknown coin id: {id}")]
    NotFound { id: String },
}

impl StoreError {
    /// Creates a NotFound error
    pub fn not_found(id: &str) -> Self {
        Self::NotFound { id: id.to_string() }
    }
}

/// Errors that can occur when loading or saving the watchlist file
#[derive(Debug, Error)]
pub enum WatchlistError {
    /// Reading or writing the file failed
    #[error("Watchlist I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The file exists but does not contain a JSON array of strings
    #[error("Malformed watchlist file: {0}")]
    Malformed(#[from] serde_json::Error),

    /// No platform data directory could be determined
    #[error("Could not determine a data directory for the watchlist")]
    NoDataDir,
}
