use anyhow::{anyhow, bail, Result};

use crate::commands::{parse_row, parse_year, require};
use crate::formatting::{format_header, indent};
use crate::matchups::tool::fetch_ticket;
use crate::matchups::{FormStatus, MatchupForm, MatchupMode, MatchupTool, ResolvedRow, Update, INDEX_PATH};
use crate::session::Session;

/// Summarise a form's complete rows and what they resolved to
pub fn format_resolution(form: &MatchupForm, status: FormStatus, resolved: &[ResolvedRow]) -> String {
    let mut output = String::new();
    let year = form.year().unwrap_or("-");
    output.push_str(&format_header(&format!("{} {}", form.mode().title(), year), false));
    for request in form.requests() {
        let path = resolved
            .iter()
            .find(|r| r.row == request.row)
            .map_or("(none)", |r| r.path.as_str());
        output.push_str(&format!("{} -> {}\n", request.keys.join(" | "), path));
    }
    let status = match status {
        FormStatus::Unselected => "nothing selected",
        FormStatus::PartiallySelected => "selection incomplete",
        FormStatus::Resolved => "resolved",
        FormStatus::Unresolved => "no fragment for this selection",
    };
    output.push_str(&format!("Status: {}\n", status));
    output
}

/// Keys per row: positional keys for single-row modes, `--row` values otherwise
fn rows_for(mode: MatchupMode, keys: Vec<String>, rows: &[String]) -> Result<Vec<Vec<String>>> {
    let rows: Vec<Vec<String>> = if rows.is_empty() {
        vec![keys]
    } else {
        rows.iter().map(|r| parse_row(r)).collect()
    };
    if rows.len() > mode.row_count() {
        bail!("{} takes at most {} row(s)", mode, mode.row_count());
    }
    let width = mode.row_layout().len();
    if let Some(row) = rows.iter().find(|r| r.len() != width && !r.iter().all(String::is_empty)) {
        bail!("{} needs {} keys per row, got {}", mode, width, row.len());
    }
    Ok(rows)
}

pub async fn run(
    session: &Session,
    mode: MatchupMode,
    year: &str,
    keys: Vec<String>,
    rows: Vec<String>,
    render: bool,
) -> Result<()> {
    let year = parse_year(year)?;
    let index = require(session.index().await, INDEX_PATH)?;
    let options = session.options().await;
    let mut tool = MatchupTool::new(mode, &options);

    if tool.form().year() != Some(year.as_str()) && tool.set_year(&year, &options, Some(&index)) == Update::Rejected {
        bail!("No matchup data for {}", year);
    }

    let mut update = Update::Cleared;
    for (row, row_keys) in rows_for(mode, keys, &rows)?.into_iter().enumerate() {
        for (position, key) in row_keys.iter().enumerate() {
            if key.is_empty() {
                continue;
            }
            update = tool.set_key(row, position, Some(key), Some(&index));
            if update == Update::Rejected {
                let slot = mode.row_layout()[position];
                return Err(anyhow!("'{}' is not a {} option for {}", key, slot.label, year));
            }
        }
    }

    let resolved = match &update {
        Update::Render(ticket) => ticket.rows.clone(),
        _ => Vec::new(),
    };
    print!("{}", format_resolution(tool.form(), tool.status(), &resolved));

    if let (true, Update::Render(ticket)) = (render, update) {
        let rendered = fetch_ticket(session.cache(), &ticket).await;
        if tool.commit(ticket.generation, rendered).is_some() {
            for matchup in tool.rendered() {
                println!();
                print!("{}", format_header(&matchup.path, false));
                println!("{}", indent(&matchup.fragment.text(), 2));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{create_mock_index, create_mock_lists};
    use crate::matchups::OptionsResolver;
    use std::sync::Arc;

    #[test]
    fn test_format_resolution() {
        let index = create_mock_index();
        let options = OptionsResolver::new(Some(Arc::new(create_mock_lists())), Some(Arc::new(index.clone())));
        let mut tool = MatchupTool::new(MatchupMode::SpVs2, &options);
        for (position, key) in ["Jane Doe", "vs.", "RedHawks"].iter().enumerate() {
            tool.set_key(0, position, Some(key), Some(&index));
        }
        let mut update = Update::Cleared;
        for (position, key) in ["Carl Ortiz", "vs.", "Mariners"].iter().enumerate() {
            update = tool.set_key(1, position, Some(key), Some(&index));
        }
        let Update::Render(ticket) = update else {
            panic!("expected a render");
        };

        let text = format_resolution(tool.form(), tool.status(), &ticket.rows);
        assert!(text.starts_with("SP vs Team (x2) 2024\n"));
        assert!(text.contains("Jane Doe | vs. | RedHawks -> frags/sp2_001.html\n"));
        assert!(text.contains("Carl Ortiz | vs. | Mariners -> (none)\n"));
        assert!(text.ends_with("Status: resolved\n"));
    }

    #[test]
    fn test_rows_for_single_and_multi_row_modes() {
        let keys = vec!["Jane Doe".to_string(), "vs.".to_string(), "RedHawks".to_string()];
        assert_eq!(rows_for(MatchupMode::SpVsTeam, keys.clone(), &[]).unwrap(), vec![keys]);

        let rows = vec!["Al Smith|vs.|Jane Doe".to_string(), "||".to_string()];
        assert_eq!(rows_for(MatchupMode::MultiHitter, Vec::new(), &rows).unwrap().len(), 2);

        assert!(rows_for(MatchupMode::SpVsTeam, Vec::new(), &rows).is_err());
        assert!(rows_for(MatchupMode::RpInning, vec!["Rob Reyes".to_string()], &[]).is_err());
    }
}
