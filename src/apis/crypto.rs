use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::build_url;
use crate::{
    json::{decode, missing_fields},
    transport::Transport,
    FetchError, RequestExecutor, Result,
};

const DEFAULT_BASE_URL: &str = "https://api.coinpaprika.com/v1";

/// Friendly coin names and their CoinPaprika ticker ids.
pub const COIN_ALIASES: &[(&str, &str)] = &[
    ("bitcoin", "btc-bitcoin"),
    ("ethereum", "eth-ethereum"),
    ("dogecoin", "doge-dogecoin"),
    ("cardano", "ada-cardano"),
    ("solana", "sol-solana"),
    ("ripple", "xrp-xrp"),
];

/// Paths a ticker must carry before it is trusted.
const REQUIRED_TICKER_FIELDS: &[&str] = &["quotes.USD.price", "quotes.USD.percent_change_24h"];

/// Maps a friendly name to its ticker id; unknown names pass through
/// lowercased, so raw ids like `"btc-bitcoin"` keep working.
pub fn coin_id(name: &str) -> String {
    let name = name.trim().to_lowercase();
    COIN_ALIASES
        .iter()
        .find(|(alias, _)| *alias == name)
        .map(|(_, id)| (*id).to_owned())
        .unwrap_or(name)
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UsdQuote {
    pub price: f64,
    pub percent_change_24h: f64,
    #[serde(default)]
    pub volume_24h: Option<f64>,
    #[serde(default)]
    pub market_cap: Option<f64>,
    #[serde(default)]
    pub percent_change_1h: Option<f64>,
    #[serde(default)]
    pub percent_change_7d: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Quotes {
    #[serde(rename = "USD")]
    pub usd: UsdQuote,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Ticker {
    pub id: String,
    pub name: String,
    pub symbol: String,
    #[serde(default)]
    pub rank: u32,
    pub quotes: Quotes,
}

impl Ticker {
    pub fn usd(&self) -> &UsdQuote {
        &self.quotes.usd
    }
}

/// Client for the CoinPaprika ticker API.
#[derive(Debug)]
pub struct CoinPaprika<'a, T> {
    executor: &'a RequestExecutor<T>,
    base_url: String,
}

impl<'a, T: Transport> CoinPaprika<'a, T> {
    pub fn new(executor: &'a RequestExecutor<T>) -> Self {
        Self {
            executor,
            base_url: DEFAULT_BASE_URL.to_owned(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Fetches one ticker by friendly name or raw id.
    pub async fn ticker(&self, coin: &str) -> Result<Ticker> {
        let id = coin_id(coin);
        if id.is_empty() {
            return Err(FetchError::Validation("coin name is empty".to_owned()));
        }
        let url = build_url(&self.base_url, &format!("tickers/{id}"), &[])?;
        let value = self.executor.get(&url).await.into_result()?;
        validate_ticker(&value)?;
        decode(value)
    }

    /// Fetches several tickers one after another. A coin that fails keeps
    /// its own error; the others are still fetched.
    pub async fn compare(&self, coins: &[&str]) -> Vec<(String, Result<Ticker>)> {
        let mut results = Vec::with_capacity(coins.len());
        for coin in coins {
            let ticker = self.ticker(coin).await;
            results.push((coin.trim().to_lowercase(), ticker));
        }
        results
    }

    /// Returns the `limit` highest-ranked tickers.
    pub async fn top(&self, limit: usize) -> Result<Vec<Ticker>> {
        let url = build_url(&self.base_url, "tickers", &[("limit", limit.to_string())])?;
        let mut tickers: Vec<Ticker> = self.executor.get_json(&url).await?;
        tickers.sort_by_key(|ticker| ticker.rank);
        tickers.truncate(limit);
        Ok(tickers)
    }
}

/// Rejects ticker payloads that lack the USD quote fields.
pub(crate) fn validate_ticker(value: &Value) -> Result<()> {
    let missing = missing_fields(value, REQUIRED_TICKER_FIELDS);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(FetchError::Validation(format!(
            "ticker is missing {}",
            missing.join(", ")
        )))
    }
}
