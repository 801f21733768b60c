//! Dashboard configuration
//!
//! Built-in defaults overridable through `STOCKDASH_*` environment
//! variables. Nothing is persisted; the configuration is resolved once at
//! startup.

use crate::error::Result;
use serde::Serialize;
use url::Url;

/// Browser-like User-Agent. The finance site serves an error page to the
/// default HTTP client UA.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8050;
const DEFAULT_LISTING_URL: &str = "https://finance.yahoo.com/markets/stocks/most-active/";
const DEFAULT_LISTING_COUNT: u32 = 100;
const DEFAULT_HISTORY_BASE_URL: &str = "https://finance.yahoo.com/quote";
const DEFAULT_SYMBOL: &str = "AAPL";
const DEFAULT_START_DATE: &str = "2020-01-01";
const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 900;

/// Runtime configuration for the dashboard
#[derive(Debug, Clone, Serialize)]
pub struct DashboardConfig {
    /// Local server bind host
    pub host: String,
    /// Local server bind port
    pub port: u16,
    /// Most-active listing page URL
    pub listing_url: String,
    /// Number of listing rows requested
    pub listing_count: u32,
    /// Base URL for per-symbol history pages
    pub history_base_url: String,
    /// User-Agent sent on upstream requests
    pub user_agent: String,
    /// Symbol pre-selected in the UI
    pub default_symbol: String,
    /// Start date pre-selected in the UI (ISO)
    pub default_start_date: String,
    /// Interval between background listing refreshes
    pub refresh_interval_secs: u64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            listing_url: DEFAULT_LISTING_URL.to_string(),
            listing_count: DEFAULT_LISTING_COUNT,
            history_base_url: DEFAULT_HISTORY_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            default_symbol: DEFAULT_SYMBOL.to_string(),
            default_start_date: DEFAULT_START_DATE.to_string(),
            refresh_interval_secs: DEFAULT_REFRESH_INTERVAL_SECS,
        }
    }
}

impl DashboardConfig {
    /// Resolve configuration from the environment over the defaults.
    /// Unparseable values fall back to the default with a warning.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            host: env_string("STOCKDASH_HOST", defaults.host),
            port: env_parsed("STOCKDASH_PORT", defaults.port),
            listing_url: env_string("STOCKDASH_LISTING_URL", defaults.listing_url),
            listing_count: env_parsed("STOCKDASH_LISTING_COUNT", defaults.listing_count),
            history_base_url: env_string("STOCKDASH_HISTORY_BASE_URL", defaults.history_base_url),
            user_agent: env_string("STOCKDASH_USER_AGENT", defaults.user_agent),
            default_symbol: env_string("STOCKDASH_DEFAULT_SYMBOL", defaults.default_symbol),
            default_start_date: env_string("STOCKDASH_DEFAULT_START_DATE", defaults.default_start_date),
            refresh_interval_secs: env_parsed(
                "STOCKDASH_REFRESH_INTERVAL_SECS",
                defaults.refresh_interval_secs,
            ),
        }
    }

    /// Bind address for the local server
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// URL the webview window loads
    pub fn dashboard_url(&self) -> String {
        format!("http://{}:{}/", self.host, self.port)
    }

    /// Full listing page URL with pagination parameters
    pub fn listing_page_url(&self) -> Result<Url> {
        let mut url = Url::parse(&self.listing_url)?;
        url.query_pairs_mut()
            .append_pair("start", "0")
            .append_pair("count", &self.listing_count.to_string());
        Ok(url)
    }

    /// History page URL for a symbol and a Unix-timestamp range
    pub fn history_page_url(&self, symbol: &str, period1: i64, period2: i64) -> Result<Url> {
        let mut url = Url::parse(&format!(
            "{}/{}/history/",
            self.history_base_url.trim_end_matches('/'),
            urlencoding::encode(symbol)
        ))?;
        url.query_pairs_mut()
            .append_pair("period1", &period1.to_string())
            .append_pair("period2", &period2.to_string());
        Ok(url)
    }
}

fn env_string(key: &str, default: String) -> String {
    match std::env::var(key) {
        Ok(v) if !v.trim().is_empty() => v,
        _ => default,
    }
}

fn env_parsed<T: std::str::FromStr>(key: &str, default: T) -> T {
    match std::env::var(key) {
        Ok(v) => v.parse().unwrap_or_else(|_| {
            tracing::warn!("Ignoring unparseable {}={:?}", key, v);
            default
        }),
        Err(_) => default,
    }
}
