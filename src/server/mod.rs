//! Dashboard server module
//!
//! The local HTTP server the webview window points at. It serves the
//! chart layout itself and the JSON API the layout fetches from, with
//! CORS, request tracing and scrape-aware rate limiting.

pub mod handlers;
mod rate_limiter;
mod server;
mod types;

pub use server::DashboardServer;
pub use types::{ApiResponse, Empty, HistoryQuery};
