//! Application-level commands

use crate::error::{AppError, Result};
use crate::state::AppState;
use tauri::{AppHandle, State};
use tauri_plugin_shell::ShellExt;

/// URL of the local dashboard server
#[tauri::command]
pub async fn get_dashboard_url(state: State<'_, AppState>) -> Result<String> {
    Ok(state.config.dashboard_url())
}

/// Open the upstream page for a symbol (or the listing page) in the
/// system browser
#[tauri::command]
pub async fn open_source_page(
    app: AppHandle,
    state: State<'_, AppState>,
    symbol: Option<String>,
) -> Result<()> {
    let url = match symbol.as_deref() {
        Some(symbol) if !symbol.trim().is_empty() => format!(
            "{}/{}/",
            state.config.history_base_url.trim_end_matches('/'),
            urlencoding::encode(symbol.trim())
        ),
        _ => state.config.listing_url.clone(),
    };

    tracing::info!("Opening {} in the system browser", url);

    app.shell()
        .open(&url, None)
        .map_err(|e| AppError::Internal(format!("Failed to open {}: {}", url, e)))
}
