//! Services Layer
//!
//! Business logic shared between Tauri IPC commands and REST API handlers.
//!
//! # Architecture
//!
//! ```text
//! Webview UI   --> Tauri Commands ──┐
//!                                   ├──> Services --> Scrape layer
//! Local server --> REST API ────────┘
//! ```
//!
//! # Services
//!
//! - `TickerService` - most-active listing load/refresh
//! - `HistoryService` - price history retrieval
//! - `ChartService` - history-to-chart-series shaping

pub mod chart_service;
pub mod history_service;
pub mod ticker_service;

// Re-export commonly used types and services
pub use chart_service::{ChartService, ChartSeries};
pub use history_service::{CandleData, HistoryResult, HistoryService};
pub use ticker_service::{TickerResult, TickerService};
