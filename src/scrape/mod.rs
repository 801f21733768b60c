//! Scrape Layer
//!
//! The two upstream round trips the dashboard performs, plus the HTML
//! table extraction they share. Each submodule owns a single page:
//!
//! - `listing` - the most-active markets page (ticker listing)
//! - `history` - the per-symbol price history page
//! - `html` - tolerant table extraction helpers used by both
//!
//! The table layout of both pages is an undocumented, unversioned
//! contract; the extraction is tolerant of markup noise but a structural
//! change (missing table, missing columns) surfaces as a scrape error.

pub mod history;
pub mod html;
pub mod listing;

pub use history::{PriceRow, HISTORY_COLUMNS};
