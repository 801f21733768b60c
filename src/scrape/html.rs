//! Tolerant HTML table extraction
//!
//! The upstream pages are scraped, not served as an API, so the extraction
//! here scans for known blocks (`<table>`, `<tr>`, `<th>`/`<td>`) rather
//! than parsing a full DOM. Tag detection is case-insensitive and ignores
//! attributes; cell text is tag-stripped, entity-decoded and
//! whitespace-collapsed.

/// Case-insensitive substring search from a byte offset.
///
/// The needle is ASCII, so a match can never start inside a multi-byte
/// sequence and the returned index is always a char boundary.
fn find_ci(haystack: &str, needle: &str, from: usize) -> Option<usize> {
    let h = haystack.as_bytes();
    let n = needle.as_bytes();
    if n.is_empty() || from >= h.len() || h.len() < n.len() {
        return None;
    }
    (from..=h.len() - n.len()).find(|&i| h[i..i + n.len()].eq_ignore_ascii_case(n))
}

/// Find an opening tag, skipping lookalikes (`<th` must not match `<thead`).
///
/// Returns `(tag_start, content_start)` where `content_start` is the index
/// just past the closing `>` of the opening tag.
fn find_tag_open(s: &str, tag: &str, from: usize) -> Option<(usize, usize)> {
    let pat = format!("<{tag}");
    let mut at = from;
    while let Some(pos) = find_ci(s, &pat, at) {
        let after = pos + pat.len();
        let boundary = match s.as_bytes().get(after) {
            Some(b) => *b == b'>' || *b == b'/' || b.is_ascii_whitespace(),
            None => false,
        };
        if boundary {
            let gt = find_ci(s, ">", after)?;
            return Some((pos, gt + 1));
        }
        at = after;
    }
    None
}

/// Content of the first `<table>` block in the document, if any.
pub fn first_table(html: &str) -> Option<&str> {
    let (_, content_start) = find_tag_open(html, "table", 0)?;
    let end = find_ci(html, "</table", content_start)?;
    Some(&html[content_start..end])
}

/// All rows of a table block as normalized cell text, `<th>` and `<td>`
/// alike, in document order.
pub fn extract_rows(table: &str) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut at = 0;
    while let Some((_, row_start)) = find_tag_open(table, "tr", at) {
        let row_end = find_ci(table, "</tr", row_start).unwrap_or(table.len());
        rows.push(extract_cells(&table[row_start..row_end]));
        at = row_end + 1;
    }
    rows
}

fn extract_cells(row: &str) -> Vec<String> {
    let mut cells = Vec::new();
    let mut at = 0;
    loop {
        let th = find_tag_open(row, "th", at);
        let td = find_tag_open(row, "td", at);
        let (tag, open) = match (th, td) {
            (Some(a), Some(b)) => {
                if a.0 < b.0 {
                    ("th", a)
                } else {
                    ("td", b)
                }
            }
            (Some(a), None) => ("th", a),
            (None, Some(b)) => ("td", b),
            (None, None) => break,
        };

        let content_start = open.1;
        // tolerate unclosed cells: stop at the next cell or the row end
        let content_end = match find_ci(row, &format!("</{tag}"), content_start) {
            Some(pos) => pos,
            None => {
                let next_th = find_tag_open(row, "th", content_start).map(|(p, _)| p);
                let next_td = find_tag_open(row, "td", content_start).map(|(p, _)| p);
                match (next_th, next_td) {
                    (Some(a), Some(b)) => a.min(b),
                    (Some(a), None) => a,
                    (None, Some(b)) => b,
                    (None, None) => row.len(),
                }
            }
        };

        cells.push(normalize_text(&strip_tags(&row[content_start..content_end])));
        at = content_end;
    }
    cells
}

/// Drop every tag, keeping a space where one stood so adjacent elements
/// do not merge into a single token.
pub fn strip_tags(fragment: &str) -> String {
    let mut out = String::with_capacity(fragment.len());
    let mut in_tag = false;
    for ch in fragment.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => {
                in_tag = false;
                out.push(' ');
            }
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    out
}

/// Decode the entities that actually occur in these pages and collapse
/// whitespace runs. `&amp;` is decoded last so `&amp;lt;` stays `&lt;`.
pub fn normalize_text(text: &str) -> String {
    let decoded = text
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&amp;", "&");
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_table_with_attributes() {
        let html = r#"<html><body><div><TABLE class="W(100%)" data-test="x">
            <tr><td>a</td></tr></TABLE></div></body></html>"#;
        let table = first_table(html).unwrap();
        assert!(table.contains("<tr>"));
        assert!(!table.contains("TABLE"));
    }

    #[test]
    fn test_no_table() {
        assert!(first_table("<html><body><p>nothing here</p></body></html>").is_none());
    }

    #[test]
    fn test_extract_rows_header_and_data() {
        let table = r#"
            <thead><tr><th>Symbol</th><th>Name</th></tr></thead>
            <tbody>
              <tr><td><a href="/quote/NVDA">NVDA</a></td><td>NVIDIA Corporation</td></tr>
              <tr><td>AAPL</td><td>Apple&nbsp;Inc.</td></tr>
            </tbody>"#;
        let rows = extract_rows(table);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0], vec!["Symbol", "Name"]);
        assert_eq!(rows[1], vec!["NVDA", "NVIDIA Corporation"]);
        assert_eq!(rows[2], vec!["AAPL", "Apple Inc."]);
    }

    #[test]
    fn test_th_does_not_match_thead() {
        let table = "<thead><tr><th>Date</th></tr></thead>";
        let rows = extract_rows(table);
        assert_eq!(rows, vec![vec!["Date".to_string()]]);
    }

    #[test]
    fn test_unclosed_cells() {
        let table = "<tr><td>1,234.50<td>56</tr>";
        let rows = extract_rows(table);
        assert_eq!(rows, vec![vec!["1,234.50".to_string(), "56".to_string()]]);
    }

    #[test]
    fn test_strip_tags_keeps_token_boundaries() {
        let stripped = strip_tags("<span>Jan 5,</span><span>2024</span>");
        assert_eq!(normalize_text(&stripped), "Jan 5, 2024");
    }

    #[test]
    fn test_normalize_entities() {
        assert_eq!(normalize_text("AT&amp;T   Inc."), "AT&T Inc.");
        assert_eq!(normalize_text("&amp;lt;"), "&lt;");
    }
}
