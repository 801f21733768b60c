//! Chart Service
//!
//! Reshapes a history result into the x/y columns the line chart draws.
//! Called by both Tauri commands and REST API.

use crate::error::Result;
use crate::services::history_service::{HistoryResult, HistoryService};
use crate::state::AppState;
use serde::{Deserialize, Serialize};

/// Line chart series: dates on x, adjusted close on y. Missing values
/// stay in place so the chart renders gaps instead of shifting points.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartSeries {
    pub title: String,
    pub symbol: String,
    pub x: Vec<String>,
    pub y: Vec<Option<f64>>,
}

/// Chart service for business logic
pub struct ChartService;

impl ChartService {
    /// Fetch history and shape it for the chart
    pub async fn get_chart_series(
        state: &AppState,
        symbol: &str,
        start_date: &str,
        end_date: &str,
    ) -> Result<ChartSeries> {
        let history = HistoryService::get_history(state, symbol, start_date, end_date).await?;
        Ok(Self::line_series(&history))
    }

    /// History rows to chart columns
    pub fn line_series(history: &HistoryResult) -> ChartSeries {
        let (x, y) = history
            .candles
            .iter()
            .map(|c| (c.date.clone(), c.adj_close))
            .unzip();

        ChartSeries {
            title: format!("Stock Prices: {}", history.symbol),
            symbol: history.symbol.clone(),
            x,
            y,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::history_service::CandleData;

    fn candle(date: &str, adj_close: Option<f64>) -> CandleData {
        CandleData {
            date: date.to_string(),
            open: Some(1.0),
            high: Some(2.0),
            low: Some(0.5),
            close: Some(1.5),
            adj_close,
            volume: Some(100),
        }
    }

    #[test]
    fn test_line_series_title_carries_symbol() {
        let history = HistoryResult {
            success: true,
            symbol: "AAPL".to_string(),
            start_date: "2020-01-01".to_string(),
            end_date: "2020-01-31".to_string(),
            candles: vec![candle("2020-01-02", Some(72.88))],
        };

        let series = ChartService::line_series(&history);
        assert_eq!(series.title, "Stock Prices: AAPL");
        assert_eq!(series.symbol, "AAPL");
    }

    #[test]
    fn test_line_series_keeps_gaps_in_place() {
        let history = HistoryResult {
            success: true,
            symbol: "AAPL".to_string(),
            start_date: "2020-01-01".to_string(),
            end_date: "2020-01-31".to_string(),
            candles: vec![
                candle("2020-01-02", Some(72.88)),
                candle("2020-01-03", None),
                candle("2020-01-06", Some(73.45)),
            ],
        };

        let series = ChartService::line_series(&history);
        assert_eq!(series.x.len(), 3);
        assert_eq!(series.y, vec![Some(72.88), None, Some(73.45)]);
    }

    #[test]
    fn test_line_series_empty_history() {
        let history = HistoryResult {
            success: true,
            symbol: "AAPL".to_string(),
            start_date: "2020-01-01".to_string(),
            end_date: "2020-01-02".to_string(),
            candles: vec![],
        };

        let series = ChartService::line_series(&history);
        assert!(series.x.is_empty());
        assert!(series.y.is_empty());
    }
}
