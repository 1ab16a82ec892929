//! Naive CSV parsing
//!
//! Splits on newlines and commas only. Quoted fields and embedded commas are
//! not interpreted: `"a,b"` is two cells, quotes included.

use sqlpad_core::TableData;
use tracing::warn;

/// Parse CSV text whose first non-blank line is the header line.
///
/// Blank lines, leading ones included, are dropped. Every cell is trimmed.
/// A data line with a different cell count than the header is padded with
/// empty cells or truncated so that each row lines up with the headers.
pub fn parse_csv(text: &str) -> TableData {
    let mut lines = text
        .split('\n')
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty());

    let headers: Vec<String> = match lines.next() {
        Some((_, line)) => split_line(line),
        None => return TableData::empty(),
    };
    let width = headers.len();

    let rows = lines
        .map(|(idx, line)| {
            let mut cells = split_line(line);
            if cells.len() != width {
                warn!(
                    line = idx + 1,
                    expected = width,
                    found = cells.len(),
                    "CSV row does not match header width"
                );
                cells.resize(width, String::new());
            }
            cells
        })
        .collect();

    TableData::new(headers, rows)
}

fn split_line(line: &str) -> Vec<String> {
    line.split(',').map(|cell| cell.trim().to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_headers_and_rows() {
        let table = parse_csv("ProductID, ProductName ,Price\n1,Widget,9.99\n2, Gadget ,19.99");

        assert_eq!(table.headers(), ["ProductID", "ProductName", "Price"]);
        assert_eq!(table.num_rows(), 2);
        assert_eq!(table.rows()[1], ["2", "Gadget", "19.99"]);
    }

    #[test]
    fn test_blank_lines_are_dropped() {
        let table = parse_csv("a,b\n\n1,2\n   \n3,4\n");
        assert_eq!(table.num_rows(), 2);
        assert_eq!(table.rows()[1], ["3", "4"]);
    }

    #[test]
    fn test_crlf_line_endings() {
        let table = parse_csv("a,b\r\n1,2\r\n\r\n");
        assert_eq!(table.headers(), ["a", "b"]);
        assert_eq!(table.rows(), [vec!["1".to_string(), "2".to_string()]]);
    }

    #[test]
    fn test_quotes_are_not_interpreted() {
        let table = parse_csv("id,name,extra\n1,\"Smith, John\"");
        assert_eq!(table.rows()[0], ["1", "\"Smith", "John\""]);
    }

    #[test]
    fn test_ragged_rows_are_fitted_to_headers() {
        let table = parse_csv("a,b,c\n1,2\n1,2,3,4");
        assert_eq!(table.rows()[0], ["1", "2", ""]);
        assert_eq!(table.rows()[1], ["1", "2", "3"]);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(parse_csv(""), TableData::empty());
        assert_eq!(parse_csv("\n  \r\n\n"), TableData::empty());
    }

    #[test]
    fn test_leading_blank_lines_are_skipped() {
        let table = parse_csv("\n   \nid,name\n1,Widget\n2,Gadget");

        assert_eq!(table.headers(), ["id", "name"]);
        assert_eq!(table.num_rows(), 2);
        assert_eq!(table.rows()[0], ["1", "Widget"]);
    }

    #[test]
    fn test_header_only() {
        let table = parse_csv("a,b\n");
        assert_eq!(table.num_columns(), 2);
        assert!(table.is_empty());
    }
}
