//! Price history and chart commands

use crate::error::Result;
use crate::services::{ChartSeries, ChartService, HistoryResult, HistoryService};
use crate::state::AppState;
use serde::Deserialize;
use tauri::State;

#[derive(Debug, Deserialize)]
pub struct HistoryRequest {
    pub symbol: String,
    pub start_date: String, // ISO date
    pub end_date: String,   // ISO date
}

/// Get scraped price history for a symbol and date range
#[tauri::command]
pub async fn get_price_history(
    state: State<'_, AppState>,
    request: HistoryRequest,
) -> Result<HistoryResult> {
    HistoryService::get_history(
        &state,
        &request.symbol,
        &request.start_date,
        &request.end_date,
    )
    .await
}

/// Get the chart-ready line series for a symbol and date range
#[tauri::command]
pub async fn get_chart_series(
    state: State<'_, AppState>,
    request: HistoryRequest,
) -> Result<ChartSeries> {
    ChartService::get_chart_series(
        &state,
        &request.symbol,
        &request.start_date,
        &request.end_date,
    )
    .await
}
