pub mod options;
pub mod page;
pub mod resolve;
pub mod search;
pub mod years;

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use std::sync::Arc;

/// Unwrap a session document, naming the missing file in the error
pub fn require<T>(document: Option<Arc<T>>, path: &str) -> Result<Arc<T>> {
    document.ok_or_else(|| anyhow!("{} is unavailable", path))
}

/// Validate a season year given as a 4-digit string
///
/// Returns the trimmed year. Anything chrono cannot read as a calendar
/// year, or that is not exactly four digits, is rejected.
pub fn parse_year(year: &str) -> Result<String> {
    let year = year.trim();
    if year.len() != 4 || !year.chars().all(|c| c.is_ascii_digit()) {
        return Err(anyhow!("Invalid year '{}'. Use YYYY", year));
    }
    NaiveDate::parse_from_str(&format!("{}-01-01", year), "%Y-%m-%d")
        .with_context(|| format!("Invalid year '{}'. Use YYYY", year))?;
    Ok(year.to_string())
}

/// Split a `--row` value (`"k1|k2|k3"`) into its keys
pub fn parse_row(row: &str) -> Vec<String> {
    row.split('|').map(|k| k.trim().to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_year() {
        assert_eq!(parse_year(" 2024 ").unwrap(), "2024");
        assert!(parse_year("24").is_err());
        assert!(parse_year("20x4").is_err());
    }

    #[test]
    fn test_parse_row() {
        assert_eq!(parse_row("Jane Doe | vs. |RedHawks"), vec!["Jane Doe", "vs.", "RedHawks"]);
        assert_eq!(parse_row("Al Smith||Jane Doe"), vec!["Al Smith", "", "Jane Doe"]);
    }

    #[test]
    fn test_require_names_missing_document() {
        let missing: Option<Arc<String>> = None;
        let err = require(missing, "assets/nav.json").unwrap_err();
        assert_eq!(err.to_string(), "assets/nav.json is unavailable");
    }
}
