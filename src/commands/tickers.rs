//! Ticker listing commands

use crate::error::Result;
use crate::services::{TickerResult, TickerService};
use crate::state::AppState;
use tauri::State;

/// Get the cached most-active listing
#[tauri::command]
pub async fn get_tickers(state: State<'_, AppState>) -> Result<TickerResult> {
    Ok(TickerService::list(&state))
}

/// Re-scrape the most-active listing
#[tauri::command]
pub async fn refresh_tickers(state: State<'_, AppState>) -> Result<TickerResult> {
    tracing::info!("Refreshing ticker listing on request");
    TickerService::refresh(&state).await
}
