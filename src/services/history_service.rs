//! History Service
//!
//! Validates a symbol/date-range request and turns the scraped history
//! table into candles. Called by both Tauri commands and REST API.

use crate::error::{AppError, Result};
use crate::scrape::history;
use crate::state::AppState;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Historical candle data. Numeric fields are missing where the scraped
/// cell did not coerce.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandleData {
    pub date: String,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub adj_close: Option<f64>,
    pub volume: Option<i64>,
}

/// History result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryResult {
    pub success: bool,
    pub symbol: String,
    pub start_date: String,
    pub end_date: String,
    pub candles: Vec<CandleData>,
}

/// History service for business logic
pub struct HistoryService;

impl HistoryService {
    /// Get historical OHLCV data for a symbol between two ISO dates
    /// (inclusive start, exclusive end-of-day, as the upstream page
    /// interprets the timestamps).
    pub async fn get_history(
        state: &AppState,
        symbol: &str,
        start_date: &str,
        end_date: &str,
    ) -> Result<HistoryResult> {
        info!(
            "HistoryService::get_history - {} {} to {}",
            symbol, start_date, end_date
        );

        let symbol = normalize_symbol(symbol)?;
        let (period1, period2) = parse_range(start_date, end_date)?;

        // free-form symbols outside the listing are allowed
        if state.ticker_count() > 0 && !state.has_ticker(&symbol) {
            debug!("Symbol {} is not in the cached listing", symbol);
        }

        let rows =
            history::fetch_price_history(&state.http, &state.config, &symbol, period1, period2)
                .await?;

        let candles: Vec<CandleData> = rows
            .into_iter()
            .map(|r| CandleData {
                date: r.date.format("%Y-%m-%d").to_string(),
                open: r.open,
                high: r.high,
                low: r.low,
                close: r.close,
                adj_close: r.adj_close,
                volume: r.volume,
            })
            .collect();

        Ok(HistoryResult {
            success: true,
            symbol,
            start_date: start_date.to_string(),
            end_date: end_date.to_string(),
            candles,
        })
    }
}

fn normalize_symbol(symbol: &str) -> Result<String> {
    let trimmed = symbol.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation("Symbol must not be empty".to_string()));
    }
    Ok(trimmed.to_ascii_uppercase())
}

/// ISO dates to the Unix-timestamp pair the history page expects
fn parse_range(start_date: &str, end_date: &str) -> Result<(i64, i64)> {
    let start = parse_iso_date(start_date)?;
    let end = parse_iso_date(end_date)?;

    if end < start {
        return Err(AppError::Validation(format!(
            "End date {} is before start date {}",
            end_date, start_date
        )));
    }

    Ok((to_timestamp(start), to_timestamp(end)))
}

fn parse_iso_date(date: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .map_err(|e| AppError::Validation(format!("Invalid date {:?}: {}", date, e)))
}

fn to_timestamp(date: NaiveDate) -> i64 {
    // midnight always exists
    date.and_hms_opt(0, 0, 0).unwrap().and_utc().timestamp()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_empty_symbol_is_rejected() {
        let state = AppState::new().unwrap();
        let err = HistoryService::get_history(&state, "  ", "2020-01-01", "2020-02-01")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_inverted_range_is_rejected() {
        let state = AppState::new().unwrap();
        let err = HistoryService::get_history(&state, "AAPL", "2021-01-01", "2020-01-01")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_malformed_date_is_rejected() {
        let state = AppState::new().unwrap();
        let err = HistoryService::get_history(&state, "AAPL", "01/01/2020", "2020-02-01")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_parse_range_timestamps() {
        let (p1, p2) = parse_range("2020-01-01", "2020-01-02").unwrap();
        assert_eq!(p1, 1_577_836_800);
        assert_eq!(p2, p1 + 86_400);
    }

    #[test]
    fn test_normalize_symbol_uppercases() {
        assert_eq!(normalize_symbol(" aapl ").unwrap(), "AAPL");
    }
}
