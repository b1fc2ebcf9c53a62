//! The fixed catalog of tracked coins
//!
//! Catalog membership never changes at runtime: records are created once at
//! startup and only their price/change/watched fields mutate. Because the
//! identities are immutable, they can be read without taking any lock.

/// Identity of a tracked coin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoinInfo {
    /// CoinGecko ID (e.g. "bitcoin")
    pub id: &'static str,
    /// Trading symbol (e.g. "BTC")
    pub symbol: &'static str,
    /// Display name (e.g. "Bitcoin")
    pub name: &'static str,
}

/// The 20 tracked cryptocurrencies, in display order
pub const CATALOG: &[CoinInfo] = &[
    CoinInfo { id: "bitcoin", symbol: "BTC", name: "Bitcoin" },
    CoinInfo { id: "ethereum", symbol: "ETH", name: "Ethereum" },
    CoinInfo { id: "tether", symbol: "USDT", name: "Tether" },
    CoinInfo { id: "binancecoin", symbol: "BNB", name: "BNB" },
    CoinInfo { id: "solana", symbol: "SOL", name: "Solana" },
    CoinInfo { id: "ripple", symbol: "XRP", name: "XRP" },
    CoinInfo { id: "usd-coin", symbol: "USDC", name: "USD Coin" },
    CoinInfo { id: "cardano", symbol: "ADA", name: "Cardano" },
    CoinInfo { id: "dogecoin", symbol: "DOGE", name: "Dogecoin" },
    CoinInfo { id: "tron", symbol: "TRX", name: "TRON" },
    CoinInfo { id: "avalanche-2", symbol: "AVAX", name: "Avalanche" },
    CoinInfo { id: "polkadot", symbol: "DOT", name: "Polkadot" },
    CoinInfo { id: "chainlink", symbol: "LINK", name: "Chainlink" },
    CoinInfo { id: "shiba-inu", symbol: "SHIB", name: "Shiba Inu" },
    CoinInfo { id: "bitcoin-cash", symbol: "BCH", name: "Bitcoin Cash" },
    CoinInfo { id: "litecoin", symbol: "LTC", name: "Litecoin" },
    CoinInfo { id: "polygon", symbol: "MATIC", name: "Polygon" },
    CoinInfo { id: "uniswap", symbol: "UNI", name: "Uniswap" },
    CoinInfo { id: "stellar", symbol: "XLM", name: "Stellar" },
    CoinInfo { id: "monero", symbol: "XMR", name: "Monero" },
];

/// Returns the catalog ids in display order
pub fn ids() -> Vec<&'static str> {
    CATALOG.iter().map(|c| c.id).collect()
}

/// Checks whether an id belongs to the catalog
pub fn contains(id: &str) -> bool {
    CATALOG.iter().any(|c| c.id == id)
}
