//! Dashboard page and REST API endpoint handlers

use crate::error::AppError;
use crate::server::types::{ApiResponse, Empty, HistoryQuery};
use crate::services::{ChartSeries, ChartService, HistoryResult, HistoryService, TickerResult, TickerService};
use crate::state::AppState;
use axum::{
    extract::{Query, State as AxumState},
    http::StatusCode,
    response::{Html, IntoResponse},
    Json,
};
use std::sync::Arc;
use tauri::{AppHandle, Manager};
use tracing::{error, warn};

/// Shared state for API handlers
pub struct ServerState {
    pub app_handle: AppHandle,
}

impl ServerState {
    pub fn new(app_handle: AppHandle) -> Self {
        Self { app_handle }
    }

    /// Get AppState from Tauri
    fn get_app_state(&self) -> Option<tauri::State<'_, AppState>> {
        self.app_handle.try_state::<AppState>()
    }
}

/// HTTP status for an application error
fn error_status(err: &AppError) -> StatusCode {
    match err {
        AppError::Validation(_) => StatusCode::BAD_REQUEST,
        AppError::NotFound(_) => StatusCode::NOT_FOUND,
        // the upstream page failed us, not the caller
        AppError::Http(_) | AppError::Scrape(_) => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn state_unavailable<T: serde::Serialize>() -> (StatusCode, Json<ApiResponse<T>>) {
    error!("AppState not available");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiResponse::error("Internal error: AppState not available")),
    )
}

// ============================================================================
// Dashboard UI
// ============================================================================

/// The chart layout the webview renders - GET /
pub async fn dashboard_page() -> Html<&'static str> {
    Html(include_str!("../../ui/index.html"))
}

// ============================================================================
// Health Check
// ============================================================================

/// Health check endpoint - GET /health
pub async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::<Empty>::success_with_message(
        "Stock Market Dashboard API is running",
    ))
}

// ============================================================================
// Tickers
// ============================================================================

/// Cached most-active listing - GET /api/v1/tickers
pub async fn get_tickers(
    AxumState(state): AxumState<Arc<ServerState>>,
) -> (StatusCode, Json<ApiResponse<TickerResult>>) {
    let Some(app_state) = state.get_app_state() else {
        return state_unavailable();
    };

    let result = TickerService::list(&app_state);
    (StatusCode::OK, Json(ApiResponse::success_with_data(result)))
}

/// Re-scrape the listing - POST /api/v1/tickers/refresh
pub async fn refresh_tickers(
    AxumState(state): AxumState<Arc<ServerState>>,
) -> (StatusCode, Json<ApiResponse<TickerResult>>) {
    let Some(app_state) = state.get_app_state() else {
        return state_unavailable();
    };

    match TickerService::refresh(&app_state).await {
        Ok(result) => (StatusCode::OK, Json(ApiResponse::success_with_data(result))),
        Err(e) => {
            warn!("Listing refresh failed: {}", e);
            (error_status(&e), Json(ApiResponse::error(&e.to_string())))
        }
    }
}

// ============================================================================
// History / Chart
// ============================================================================

/// Scraped price history - GET /api/v1/history?symbol=..&start=..&end=..
pub async fn get_history(
    AxumState(state): AxumState<Arc<ServerState>>,
    Query(query): Query<HistoryQuery>,
) -> (StatusCode, Json<ApiResponse<HistoryResult>>) {
    let Some(app_state) = state.get_app_state() else {
        return state_unavailable();
    };

    let (symbol, start, end) = resolve_query(&app_state, query);
    match HistoryService::get_history(&app_state, &symbol, &start, &end).await {
        Ok(result) => (StatusCode::OK, Json(ApiResponse::success_with_data(result))),
        Err(e) => {
            warn!("History fetch failed for {}: {}", symbol, e);
            (error_status(&e), Json(ApiResponse::error(&e.to_string())))
        }
    }
}

/// Chart-ready line series - GET /api/v1/chart?symbol=..&start=..&end=..
pub async fn get_chart(
    AxumState(state): AxumState<Arc<ServerState>>,
    Query(query): Query<HistoryQuery>,
) -> (StatusCode, Json<ApiResponse<ChartSeries>>) {
    let Some(app_state) = state.get_app_state() else {
        return state_unavailable();
    };

    let (symbol, start, end) = resolve_query(&app_state, query);
    match ChartService::get_chart_series(&app_state, &symbol, &start, &end).await {
        Ok(series) => (StatusCode::OK, Json(ApiResponse::success_with_data(series))),
        Err(e) => {
            warn!("Chart fetch failed for {}: {}", symbol, e);
            (error_status(&e), Json(ApiResponse::error(&e.to_string())))
        }
    }
}

/// Fill missing query fields from the configured defaults; the end date
/// defaults to today.
fn resolve_query(app_state: &AppState, query: HistoryQuery) -> (String, String, String) {
    let config = &app_state.config;
    let symbol = query
        .symbol
        .unwrap_or_else(|| config.default_symbol.clone());
    let start = query
        .start
        .unwrap_or_else(|| config.default_start_date.clone());
    let end = query
        .end
        .unwrap_or_else(|| chrono::Utc::now().date_naive().format("%Y-%m-%d").to_string());
    (symbol, start, end)
}
