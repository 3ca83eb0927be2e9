use anyhow::{Context, Result};

use crate::commands::require;
use crate::navigation::NAV_PATH;
use crate::session::Session;
use crate::years::{YearSelector, LOOKUP_PATH};

/// One line listing the selector's years, newest first, current one starred
pub fn format_year_selector(selector: &YearSelector) -> String {
    let years: Vec<String> = selector
        .options
        .iter()
        .enumerate()
        .map(|(i, option)| {
            if selector.current == Some(i) {
                format!("{}*", option.year)
            } else {
                option.year.clone()
            }
        })
        .collect();
    format!("Years: {}\n", years.join(" "))
}

pub async fn run(session: &Session, page_id: &str) -> Result<()> {
    let nav = require(session.nav().await, NAV_PATH)?;
    let target = nav
        .find_page(page_id)
        .with_context(|| format!("No loadable page '{}'", page_id))?;
    let lookup = require(session.year_lookup().await, LOOKUP_PATH)?;

    match lookup.selector_for(&target) {
        Some(selector) => {
            print!("{}", format_year_selector(&selector));
            for option in &selector.options {
                println!("  {}  {}", option.year, option.path);
            }
        }
        None => println!("No historical years for {}", target.title),
    }
    Ok(())
}
