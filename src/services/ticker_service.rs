//! Ticker Service
//!
//! Loads and serves the most-active ticker listing.
//! Called by both Tauri commands and REST API.

use crate::error::Result;
use crate::scrape::listing;
use crate::state::{AppState, Ticker};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Listing result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TickerResult {
    pub success: bool,
    pub count: usize,
    pub tickers: Vec<Ticker>,
}

/// Ticker service for business logic
pub struct TickerService;

impl TickerService {
    /// Scrape the listing and replace the cached copy.
    ///
    /// Used once at startup and by every refresh after that. Callers
    /// decide what a failure means; the startup path logs it and keeps
    /// the empty listing.
    pub async fn load(state: &AppState) -> Result<TickerResult> {
        let tickers = listing::fetch_most_active(&state.http, &state.config).await?;
        info!("Scraped {} tickers from the most-active listing", tickers.len());

        state.store_tickers(tickers.clone());

        Ok(TickerResult {
            success: true,
            count: tickers.len(),
            tickers,
        })
    }

    /// Re-scrape on demand
    pub async fn refresh(state: &AppState) -> Result<TickerResult> {
        info!("TickerService::refresh");
        Self::load(state).await
    }

    /// Cached listing, page order
    pub fn list(state: &AppState) -> TickerResult {
        let tickers = state.tickers();
        TickerResult {
            success: true,
            count: tickers.len(),
            tickers,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_reflects_state() {
        let state = AppState::new().unwrap();
        state.store_tickers(vec![Ticker {
            symbol: "AAPL".to_string(),
            name: "Apple Inc.".to_string(),
        }]);

        let result = TickerService::list(&state);
        assert!(result.success);
        assert_eq!(result.count, 1);
        assert_eq!(result.tickers[0].symbol, "AAPL");
    }

    #[test]
    fn test_list_empty_before_first_load() {
        let state = AppState::new().unwrap();
        let result = TickerService::list(&state);
        assert!(result.success);
        assert_eq!(result.count, 0);
    }
}
