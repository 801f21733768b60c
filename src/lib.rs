//! Stock Market Dashboard
//!
//! A desktop dashboard that scrapes market listings and historical price
//! tables from a public finance website and renders a selectable line
//! chart in a webview window. The chart layout is served by a local HTTP
//! server and loaded by the native window.

pub mod commands;
pub mod config;
pub mod error;
pub mod scheduler;
pub mod scrape;
pub mod server;
pub mod services;
pub mod state;

use scheduler::ListingRefreshScheduler;
use server::DashboardServer;
use services::TickerService;
use state::AppState;
use tauri::Manager;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize and run the Tauri application
#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    // Initialize tracing/logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stockdash_desktop=debug,tauri=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Stock Market Dashboard...");

    tauri::Builder::default()
        .plugin(tauri_plugin_shell::init())
        .setup(|app| {
            // Initialize application state
            let app_state = AppState::new()?;
            let config = app_state.config.clone();
            app.manage(app_state);

            // Bind the dashboard server before the window loads its URL
            let mut dashboard_server = DashboardServer::new(app.handle().clone());
            tauri::async_runtime::block_on(dashboard_server.start(&config))?;
            // keep the server alive for the lifetime of the app
            app.manage(dashboard_server);

            // Fetch the ticker listing once at startup. A failure leaves
            // the listing empty; the UI accepts free-form symbols.
            let handle = app.handle().clone();
            tauri::async_runtime::spawn(async move {
                let state = handle.state::<AppState>();
                match TickerService::load(&state).await {
                    Ok(result) => {
                        tracing::info!("Startup listing loaded: {} tickers", result.count)
                    }
                    Err(e) => tracing::error!(
                        "Failed to load the ticker listing, starting empty: {}",
                        e
                    ),
                }
            });

            // Periodic listing refresh
            let scheduler = ListingRefreshScheduler::new(app.handle().clone());
            scheduler.start();

            // Main window over the local server
            let url = config.dashboard_url().parse::<tauri::Url>()?;
            tauri::WebviewWindowBuilder::new(app, "main", tauri::WebviewUrl::External(url))
                .title("Stock Market Dashboard")
                .inner_size(1200.0, 800.0)
                .build()?;

            tracing::info!("Application state initialized");
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            // Ticker commands
            commands::tickers::get_tickers,
            commands::tickers::refresh_tickers,
            // History commands
            commands::history::get_price_history,
            commands::history::get_chart_series,
            // App commands
            commands::app::get_dashboard_url,
            commands::app::open_source_page,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
