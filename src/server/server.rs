//! Local HTTP server for the dashboard
//!
//! Serves the chart layout the webview window loads, plus the JSON API it
//! draws from:
//! - GET /               dashboard page
//! - GET /health         health check
//! - GET /api/v1/tickers cached most-active listing
//! - POST /api/v1/tickers/refresh
//! - GET /api/v1/history scraped price history
//! - GET /api/v1/chart   chart-ready line series

use crate::config::DashboardConfig;
use crate::error::{AppError, Result};
use crate::server::handlers::{self, ServerState};
use crate::server::rate_limiter::{rate_limit_middleware, RateLimiterState};
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tauri::AppHandle;
use tokio::sync::oneshot;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

/// Requests per second for endpoints served from memory
const GENERAL_RATE: u32 = 100;
/// Requests per second for endpoints that scrape the upstream site
const SCRAPE_RATE: u32 = 2;

/// Dashboard server manager
pub struct DashboardServer {
    app_handle: AppHandle,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl DashboardServer {
    /// Create a new server
    pub fn new(app_handle: AppHandle) -> Self {
        Self {
            app_handle,
            shutdown_tx: None,
        }
    }

    /// Bind the listener and spawn the serve task. Returns once the port
    /// is bound, so the window can load the URL immediately after.
    pub async fn start(&mut self, config: &DashboardConfig) -> Result<()> {
        let addr: SocketAddr = config
            .server_addr()
            .parse()
            .map_err(|e| AppError::Config(format!("Invalid server address: {}", e)))?;

        let rate_limiter = Arc::new(RateLimiterState::new(GENERAL_RATE, SCRAPE_RATE));
        let state = Arc::new(ServerState::new(self.app_handle.clone()));

        // allow all for the local webview
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        let app = Router::new()
            .route("/", get(handlers::dashboard_page))
            .route("/health", get(handlers::health_check))
            .route("/api/v1/tickers", get(handlers::get_tickers))
            .route("/api/v1/tickers/refresh", post(handlers::refresh_tickers))
            .route("/api/v1/history", get(handlers::get_history))
            .route("/api/v1/chart", get(handlers::get_chart))
            .with_state(state)
            .layer(middleware::from_fn_with_state(
                rate_limiter.clone(),
                rate_limit_middleware,
            ))
            .layer(cors)
            .layer(TraceLayer::new_for_http());

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        self.shutdown_tx = Some(shutdown_tx);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| AppError::Server(format!("Failed to bind to {}: {}", addr, e)))?;

        info!("Dashboard server listening on http://{}", addr);

        tokio::spawn(async move {
            let server = axum::serve(listener, app).with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
                info!("Dashboard server shutting down");
            });

            if let Err(e) = server.await {
                error!("Dashboard server error: {}", e);
            }
        });

        info!("=== Endpoints ===");
        info!("  GET  http://{}/", addr);
        info!("  GET  http://{}/health", addr);
        info!("  GET  http://{}/api/v1/tickers", addr);
        info!("  POST http://{}/api/v1/tickers/refresh", addr);
        info!("  GET  http://{}/api/v1/history", addr);
        info!("  GET  http://{}/api/v1/chart", addr);

        Ok(())
    }

    /// Stop the server
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
            info!("Dashboard server stop signal sent");
        }
    }

    /// Check if server is running
    pub fn is_running(&self) -> bool {
        self.shutdown_tx.is_some()
    }
}

impl Drop for DashboardServer {
    fn drop(&mut self) {
        self.stop();
    }
}
