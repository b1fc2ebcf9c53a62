//! Concrete price provider implementations

pub mod coingecko;

pub use coingecko::CoinGeckoProvider;
