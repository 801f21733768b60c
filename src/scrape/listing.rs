//! Most-active listing scrape
//!
//! One GET against the markets listing page; the first table carries the
//! listing with a `Symbol` column (located by header, since the page adds
//! and reorders the quote columns freely). Page order is preserved and
//! nothing is deduplicated.

use crate::config::DashboardConfig;
use crate::error::{AppError, Result};
use crate::scrape::html;
use crate::state::Ticker;
use reqwest::Client;
use tracing::debug;

/// Fetch and parse the most-active ticker listing
pub async fn fetch_most_active(client: &Client, config: &DashboardConfig) -> Result<Vec<Ticker>> {
    let url = config.listing_page_url()?;
    debug!("Fetching ticker listing from {}", url);

    let body = client
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;

    parse_listing(&body)
}

/// Parse the listing page body into tickers
pub fn parse_listing(body: &str) -> Result<Vec<Ticker>> {
    let table = html::first_table(body)
        .ok_or_else(|| AppError::Scrape("no table found in the listing page".to_string()))?;

    let rows = html::extract_rows(table);
    let header = rows
        .first()
        .ok_or_else(|| AppError::Scrape("listing table has no rows".to_string()))?;

    let symbol_col = find_column(header, "Symbol")
        .ok_or_else(|| AppError::Scrape("listing table has no Symbol column".to_string()))?;
    let name_col = find_column(header, "Name");

    let mut tickers = Vec::new();
    for row in rows.iter().skip(1) {
        let Some(cell) = row.get(symbol_col) else {
            continue;
        };
        // the symbol cell may also carry the company name; the symbol is
        // the first token
        let Some(symbol) = cell.split_whitespace().next() else {
            continue;
        };

        let name = match name_col.and_then(|i| row.get(i)) {
            Some(name) => name.clone(),
            None => cell
                .split_whitespace()
                .skip(1)
                .collect::<Vec<_>>()
                .join(" "),
        };

        tickers.push(Ticker {
            symbol: symbol.to_string(),
            name,
        });
    }

    Ok(tickers)
}

fn find_column(header: &[String], label: &str) -> Option<usize> {
    header
        .iter()
        .position(|cell| cell.eq_ignore_ascii_case(label))
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING_PAGE: &str = r#"
        <html><body>
        <table class="markets-table">
          <thead>
            <tr><th>Symbol</th><th>Name</th><th>Price</th><th>Change</th><th>Volume</th></tr>
          </thead>
          <tbody>
            <tr><td><a href="/quote/NVDA/">NVDA</a></td><td>NVIDIA Corporation</td><td>132.52</td><td>+1.25</td><td>245,120,000</td></tr>
            <tr><td>AAPL</td><td>Apple Inc.</td><td>226.10</td><td>-0.44</td><td>51,004,100</td></tr>
            <tr><td>NVDA</td><td>NVIDIA Corporation</td><td>132.52</td><td>+1.25</td><td>245,120,000</td></tr>
          </tbody>
        </table>
        </body></html>"#;

    #[test]
    fn test_parse_listing() {
        let tickers = parse_listing(LISTING_PAGE).unwrap();
        assert_eq!(tickers.len(), 3);
        assert_eq!(tickers[0].symbol, "NVDA");
        assert_eq!(tickers[0].name, "NVIDIA Corporation");
        assert_eq!(tickers[1].symbol, "AAPL");
    }

    #[test]
    fn test_parse_listing_keeps_page_order_and_duplicates() {
        let tickers = parse_listing(LISTING_PAGE).unwrap();
        let symbols: Vec<&str> = tickers.iter().map(|t| t.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["NVDA", "AAPL", "NVDA"]);
    }

    #[test]
    fn test_parse_listing_symbol_cell_with_embedded_name() {
        let body = r#"<table>
            <tr><th>Symbol</th><th>Price</th></tr>
            <tr><td>NVDA NVIDIA Corporation</td><td>132.52</td></tr>
        </table>"#;
        let tickers = parse_listing(body).unwrap();
        assert_eq!(tickers[0].symbol, "NVDA");
        assert_eq!(tickers[0].name, "NVIDIA Corporation");
    }

    #[test]
    fn test_parse_listing_missing_symbol_column() {
        let body = "<table><tr><th>Price</th></tr><tr><td>1.00</td></tr></table>";
        let err = parse_listing(body).unwrap_err();
        assert!(err.to_string().contains("Symbol column"));
    }

    #[test]
    fn test_parse_listing_no_table() {
        let err = parse_listing("<html><body></body></html>").unwrap_err();
        assert!(matches!(err, crate::error::AppError::Scrape(_)));
    }
}
