//! Application state management

use crate::config::DashboardConfig;
use crate::error::Result;
use dashmap::DashMap;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One row of the scraped market listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ticker {
    pub symbol: String,
    pub name: String,
}

/// Application state shared across commands, REST handlers and the scheduler
pub struct AppState {
    /// Upstream HTTP client
    pub http: reqwest::Client,

    /// Resolved configuration
    pub config: DashboardConfig,

    /// Most-active listing in page order, as last scraped
    tickers: RwLock<Vec<Ticker>>,

    /// Symbol lookup over the listing
    ticker_index: DashMap<String, Ticker>,
}

impl AppState {
    /// Create new application state
    pub fn new() -> Result<Self> {
        let config = DashboardConfig::from_env();

        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            http,
            config,
            tickers: RwLock::new(Vec::new()),
            ticker_index: DashMap::new(),
        })
    }

    /// Replace the cached listing. Page order is preserved; the index is
    /// rebuilt for symbol lookups.
    pub fn store_tickers(&self, tickers: Vec<Ticker>) {
        self.ticker_index.clear();
        for ticker in &tickers {
            self.ticker_index
                .insert(ticker.symbol.clone(), ticker.clone());
        }
        let count = tickers.len();
        *self.tickers.write() = tickers;

        tracing::info!("Stored {} tickers in the listing cache", count);
    }

    /// Current listing in page order
    pub fn tickers(&self) -> Vec<Ticker> {
        self.tickers.read().clone()
    }

    /// Number of cached listing rows
    pub fn ticker_count(&self) -> usize {
        self.tickers.read().len()
    }

    /// Look up a listing row by symbol
    pub fn get_ticker(&self, symbol: &str) -> Option<Ticker> {
        self.ticker_index.get(symbol).map(|r| r.clone())
    }

    /// Whether a symbol appears in the cached listing
    pub fn has_ticker(&self, symbol: &str) -> bool {
        self.ticker_index.contains_key(symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ticker(symbol: &str, name: &str) -> Ticker {
        Ticker {
            symbol: symbol.to_string(),
            name: name.to_string(),
        }
    }

    #[test]
    fn test_store_and_lookup() {
        let state = AppState::new().unwrap();
        state.store_tickers(vec![ticker("AAPL", "Apple Inc."), ticker("NVDA", "NVIDIA")]);

        assert_eq!(state.ticker_count(), 2);
        assert!(state.has_ticker("AAPL"));
        assert!(!state.has_ticker("TSLA"));
        assert_eq!(state.get_ticker("NVDA").unwrap().name, "NVIDIA");
    }

    #[test]
    fn test_store_preserves_page_order() {
        let state = AppState::new().unwrap();
        state.store_tickers(vec![
            ticker("NVDA", "NVIDIA"),
            ticker("AAPL", "Apple Inc."),
            ticker("NVDA", "NVIDIA"),
        ]);

        let symbols: Vec<String> = state.tickers().into_iter().map(|t| t.symbol).collect();
        // order and duplicates come straight from the page
        assert_eq!(symbols, vec!["NVDA", "AAPL", "NVDA"]);
    }

    #[test]
    fn test_store_replaces_previous_listing() {
        let state = AppState::new().unwrap();
        state.store_tickers(vec![ticker("AAPL", "Apple Inc.")]);
        state.store_tickers(vec![ticker("MSFT", "Microsoft")]);

        assert_eq!(state.ticker_count(), 1);
        assert!(!state.has_ticker("AAPL"));
        assert!(state.has_ticker("MSFT"));
    }
}
