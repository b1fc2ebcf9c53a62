//! CoinGecko price provider implementation

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::{
    constants::{COINGECKO_API_URL, COINGECKO_SIMPLE_PRICE_ENDPOINT, REQUEST_TIMEOUT_SECS, USER_AGENT},
    error::FetchError,
    provider::PriceProvider,
    types::PriceUpdate,
};

/// CoinGecko API response for simple price queries
///
/// The response is an object keyed by coin id; either field may be absent
/// per coin.
#[derive(Debug, Deserialize)]
struct CoinGeckoResponse {
    #[serde(flatten)]
    prices: HashMap<String, CoinGeckoPriceData>,
}

#[derive(Debug, Deserialize)]
struct CoinGeckoPriceData {
    usd: Option<f64>,
    usd_24h_change: Option<f64>,
}

/// CoinGecko price provider
pub struct CoinGeckoProvider {
    client: Client,
    base_url: String,
}

impl CoinGeckoProvider {
    /// Creates a provider against the production CoinGecko API
    pub fn new() -> Result<Self, FetchError> {
        Self::with_base_url(COINGECKO_API_URL)
    }

    /// Creates a provider against an alternate base URL (used by tests)
    pub fn with_base_url(base_url: &str) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()
            .map_err(FetchError::Network)?;

        Ok(Self {
            client,
            base_url: base_url.to_string(),
        })
    }

    /// Builds the simple-price URL for the given coin ids
    fn build_url(&self, ids: &[&str]) -> String {
        format!(
            "{}{}?ids={}&vs_currencies=usd&include_24hr_change=true",
            self.base_url,
            COINGECKO_SIMPLE_PRICE_ENDPOINT,
            ids.join(",")
        )
    }
}

#[async_trait]
impl PriceProvider for CoinGeckoProvider {
    async fn fetch_prices(
        &self,
        ids: &[&str],
    ) -> Result<HashMap<String, PriceUpdate>, FetchError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let url = self.build_url(ids);
        debug!(url = %url, "Fetching prices from CoinGecko");

        let response = self.client.get(&url).send().await.map_err(FetchError::Network)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Api {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        let body = response.text().await.map_err(FetchError::Network)?;
        let parsed: CoinGeckoResponse = serde_json::from_str(&body)
            .map_err(|e| FetchError::InvalidResponse(format!("Failed to parse response: {e}")))?;

        let updates: HashMap<String, PriceUpdate> = parsed
            .prices
            .into_iter()
            .map(|(id, data)| {
                (
                    id,
                    PriceUpdate {
                        price: data.usd,
                        change_24h: data.usd_24h_change,
                    },
                )
            })
            .collect();

        debug!(count = updates.len(), "Fetched prices from CoinGecko");
        Ok(updates)
    }

    fn provider_name(&self) -> &'static str {
        "coingecko"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_joins_ids_and_requests_usd_with_change() {
        let provider = CoinGeckoProvider::with_base_url("http://localhost:1234").unwrap();
        let url = provider.build_url(&["bitcoin", "ethereum"]);
        assert_eq!(
            url,
            "http://localhost:1234/api/v3/simple/price?ids=bitcoin,ethereum&vs_currencies=usd&include_24hr_change=true"
        );
    }

    #[test]
    fn response_tolerates_missing_fields() {
        let body = r#"{
            "bitcoin": {"usd": 50000.0, "usd_24h_change": 2.5},
            "ethereum": {"usd": 3000.0},
            "tether": {}
        }"#;
        let parsed: CoinGeckoResponse = serde_json::from_str(body).unwrap();

        let btc = &parsed.prices["bitcoin"];
        assert_eq!(btc.usd, Some(50000.0));
        assert_eq!(btc.usd_24h_change, Some(2.5));

        let eth = &parsed.prices["ethereum"];
        assert_eq!(eth.usd, Some(3000.0));
        assert_eq!(eth.usd_24h_change, None);

        assert_eq!(parsed.prices["tether"].usd, None);
    }
}
