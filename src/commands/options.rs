use anyhow::{bail, Result};

use crate::commands::parse_year;
use crate::formatting::{format_header, indent};
use crate::matchups::{DropdownOptions, OptionRole};
use crate::session::Session;

/// List a dropdown's values, by team group when requested and available
pub fn format_options(year: &str, role: OptionRole, options: &DropdownOptions, grouped: bool) -> String {
    let mut output = format_header(&format!("{} {}", year, role), true);
    match options.preferred_groups().filter(|_| grouped) {
        Some(groups) => {
            for group in groups {
                output.push_str(&format!("{} ({})\n", group.label, group.options.len()));
                output.push_str(&indent(&group.options.join("\n"), 2));
                output.push('\n');
            }
        }
        None => {
            for value in &options.flat {
                output.push_str(value);
                output.push('\n');
            }
        }
    }
    output
}

pub async fn run(session: &Session, year: Option<String>, role: OptionRole, grouped: bool) -> Result<()> {
    let resolver = session.options().await;
    let years = resolver.years();
    let year = match year {
        Some(year) => parse_year(&year)?,
        None => match years.first() {
            Some(newest) => newest.clone(),
            None => bail!("No matchup years available"),
        },
    };
    if !years.contains(&year) {
        bail!("No matchup data for {}. Available: {}", year, years.join(", "));
    }
    let options = resolver.get_dropdown_options(&year, role);
    print!("{}", format_options(&year, role, &options, grouped));
    Ok(())
}
