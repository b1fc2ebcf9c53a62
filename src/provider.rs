//! Provider abstraction for fetching market prices from external APIs

use std::collections::HashMap;

use async_trait::async_trait;

use crate::{error::FetchError, types::PriceUpdate};

/// Trait for market price providers
///
/// A provider turns "fetch now" into one request against an external API and
/// a parsed result. Implementations hold no mutable state and perform no
/// retries of their own; they are a pure request/response boundary.
#[async_trait]
pub trait PriceProvider: Send + Sync {
    /// Fetches current USD price and 24h change for the given coin ids
    ///
    /// # Arguments
    /// * `ids` - Coin ids to fetch, requested in a single call
    ///
    /// # Returns
    /// A map from coin id to its update. Ids the API did not answer for are
    /// simply absent; a coin missing one of the two fields carries `None`
    /// for that field. Errors are returned, never panicked.
    async fn fetch_prices(
        &self,
        ids: &[&str],
    ) -> Result<HashMap<String, PriceUpdate>, FetchError>;

    /// Returns the name of this provider
    fn provider_name(&self) -> &'static str;
}
