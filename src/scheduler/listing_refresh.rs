//! Background listing refresh
//!
//! The most-active listing is intraday-volatile, so the startup snapshot
//! goes stale. A background task re-scrapes it on a fixed interval and
//! emits `tickers_refreshed` so an open UI can reload its selector. A
//! failed cycle is logged and skipped; the previous listing stays cached.

use crate::services::TickerService;
use crate::state::AppState;
use std::time::Duration;
use tauri::{AppHandle, Emitter, Manager};
use tracing::{info, warn};

/// Periodic listing refresh scheduler
pub struct ListingRefreshScheduler {
    app_handle: AppHandle,
}

impl ListingRefreshScheduler {
    /// Create a new scheduler
    pub fn new(app_handle: AppHandle) -> Self {
        Self { app_handle }
    }

    /// Start the refresh loop
    pub fn start(self) {
        let handle = self.app_handle;
        tauri::async_runtime::spawn(async move {
            let interval = {
                let state = handle.state::<AppState>();
                Duration::from_secs(state.config.refresh_interval_secs)
            };
            info!(
                "Listing refresh scheduler started, interval {}s",
                interval.as_secs()
            );

            loop {
                tokio::time::sleep(interval).await;

                let count = {
                    let state = handle.state::<AppState>();
                    match TickerService::refresh(&state).await {
                        Ok(result) => Some(result.count),
                        Err(e) => {
                            warn!("Scheduled listing refresh failed: {}", e);
                            None
                        }
                    }
                };

                if let Some(count) = count {
                    info!("Scheduled listing refresh stored {} tickers", count);
                    if let Err(e) = handle.emit("tickers_refreshed", count) {
                        warn!("Failed to emit tickers_refreshed: {}", e);
                    }
                }
            }
        });
    }
}
