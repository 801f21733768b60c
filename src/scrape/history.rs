//! Price history scrape
//!
//! One GET against the per-symbol history page. Columns are mapped
//! positionally as Date / Open / High / Low / Close / Adj Close / Volume,
//! the layout the page has carried for years; a narrower table means the
//! layout drifted and is reported as a scrape error rather than charted
//! wrong.
//!
//! Numeric cells coerce to `None` when they do not parse, the same
//! silent-missing semantics the chart consumes. Dividend and split event
//! rows span fewer cells and are dropped.

use crate::config::DashboardConfig;
use crate::error::{AppError, Result};
use crate::scrape::html;
use chrono::NaiveDate;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Columns of the history table, in page order
pub const HISTORY_COLUMNS: usize = 7;

const DATE_FORMATS: [&str; 2] = ["%b %d, %Y", "%Y-%m-%d"];

/// One parsed row of the price history table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRow {
    pub date: NaiveDate,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub adj_close: Option<f64>,
    pub volume: Option<i64>,
}

/// Fetch and parse the price history table for a symbol over a
/// Unix-timestamp range
pub async fn fetch_price_history(
    client: &Client,
    config: &DashboardConfig,
    symbol: &str,
    period1: i64,
    period2: i64,
) -> Result<Vec<PriceRow>> {
    let url = config.history_page_url(symbol, period1, period2)?;
    debug!("Fetching price history from {}", url);

    let body = client
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;

    parse_history(&body)
}

/// Parse the history page body into rows sorted ascending by date
pub fn parse_history(body: &str) -> Result<Vec<PriceRow>> {
    let table = html::first_table(body)
        .ok_or_else(|| AppError::Scrape("no table found in the history page".to_string()))?;

    let rows = html::extract_rows(table);
    let header = rows
        .first()
        .ok_or_else(|| AppError::Scrape("history table has no rows".to_string()))?;

    if header.len() < HISTORY_COLUMNS {
        return Err(AppError::Scrape(format!(
            "unexpected history table layout: {} columns, expected {}",
            header.len(),
            HISTORY_COLUMNS
        )));
    }

    let mut parsed: Vec<PriceRow> = rows
        .iter()
        .skip(1)
        .filter_map(|cells| parse_row(cells))
        .collect();

    parsed.sort_by_key(|row| row.date);
    Ok(parsed)
}

/// One table row to one candle. Event rows (dividends, splits) span fewer
/// cells than the price columns and yield `None`.
fn parse_row(cells: &[String]) -> Option<PriceRow> {
    if cells.len() < HISTORY_COLUMNS {
        return None;
    }

    let date = parse_date(&cells[0])?;

    Some(PriceRow {
        date,
        open: coerce_f64(&cells[1]),
        high: coerce_f64(&cells[2]),
        low: coerce_f64(&cells[3]),
        close: coerce_f64(&cells[4]),
        adj_close: coerce_f64(&cells[5]),
        volume: coerce_i64(&cells[6]),
    })
}

fn parse_date(cell: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(cell.trim(), fmt).ok())
}

/// Numeric coercion: thousands separators stripped, anything that still
/// does not parse becomes a missing value.
pub(crate) fn coerce_f64(cell: &str) -> Option<f64> {
    let cleaned = cell.trim().replace(',', "");
    if cleaned.is_empty() || cleaned == "-" {
        return None;
    }
    cleaned.parse().ok()
}

pub(crate) fn coerce_i64(cell: &str) -> Option<i64> {
    let cleaned = cell.trim().replace(',', "");
    if cleaned.is_empty() || cleaned == "-" {
        return None;
    }
    cleaned.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const HISTORY_PAGE: &str = r#"
        <html><body>
        <table class="history-table">
          <thead>
            <tr>
              <th>Date</th><th>Open</th><th>High</th><th>Low</th>
              <th>Close</th><th>Adj Close</th><th>Volume</th>
            </tr>
          </thead>
          <tbody>
            <tr><td>Jan 8, 2024</td><td>182.09</td><td>185.60</td><td>181.50</td><td>185.56</td><td>184.95</td><td>59,144,500</td></tr>
            <tr><td>Jan 5, 2024</td><td>181.99</td><td>182.76</td><td>180.17</td><td>181.18</td><td>180.58</td><td>62,303,300</td></tr>
            <tr><td>Feb 9, 2024</td><td colspan="6">0.24 Dividend</td></tr>
            <tr><td>Jan 9, 2024</td><td>183.92</td><td>185.15</td><td>182.73</td><td>185.14</td><td>-</td><td>-</td></tr>
          </tbody>
        </table>
        </body></html>"#;

    #[test]
    fn test_parse_history_sorted_ascending() {
        let rows = parse_history(HISTORY_PAGE).unwrap();
        assert_eq!(rows.len(), 3);
        let dates: Vec<String> = rows.iter().map(|r| r.date.to_string()).collect();
        assert_eq!(dates, vec!["2024-01-05", "2024-01-08", "2024-01-09"]);
    }

    #[test]
    fn test_parse_history_values() {
        let rows = parse_history(HISTORY_PAGE).unwrap();
        let first = &rows[0];
        assert_eq!(first.open, Some(181.99));
        assert_eq!(first.adj_close, Some(180.58));
        assert_eq!(first.volume, Some(62_303_300));
    }

    #[test]
    fn test_event_rows_are_dropped() {
        let rows = parse_history(HISTORY_PAGE).unwrap();
        assert!(rows.iter().all(|r| r.date != NaiveDate::from_ymd_opt(2024, 2, 9).unwrap()));
    }

    #[test]
    fn test_missing_cells_coerce_to_none() {
        let rows = parse_history(HISTORY_PAGE).unwrap();
        let last = &rows[2];
        assert_eq!(last.close, Some(185.14));
        assert_eq!(last.adj_close, None);
        assert_eq!(last.volume, None);
    }

    #[test]
    fn test_narrow_table_is_layout_drift() {
        let body = r#"<table>
            <tr><th>Date</th><th>Close</th></tr>
            <tr><td>Jan 5, 2024</td><td>181.18</td></tr>
        </table>"#;
        let err = parse_history(body).unwrap_err();
        assert!(err.to_string().contains("unexpected history table layout"));
    }

    #[test]
    fn test_coerce_f64() {
        assert_eq!(coerce_f64("1,234.50"), Some(1234.5));
        assert_eq!(coerce_f64(" 181.99 "), Some(181.99));
        assert_eq!(coerce_f64("-"), None);
        assert_eq!(coerce_f64(""), None);
        assert_eq!(coerce_f64("N/A"), None);
        assert_eq!(coerce_f64("0.24 Dividend"), None);
    }

    #[test]
    fn test_coerce_i64() {
        assert_eq!(coerce_i64("59,144,500"), Some(59_144_500));
        assert_eq!(coerce_i64("-"), None);
        assert_eq!(coerce_i64("12.5"), None);
    }

    #[test]
    fn test_parse_date_formats() {
        assert_eq!(
            parse_date("Jan 5, 2024"),
            NaiveDate::from_ymd_opt(2024, 1, 5)
        );
        assert_eq!(
            parse_date("2024-01-05"),
            NaiveDate::from_ymd_opt(2024, 1, 5)
        );
        assert_eq!(parse_date("0.24 Dividend"), None);
    }
}
