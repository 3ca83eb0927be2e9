use anyhow::{bail, Context, Result};

use crate::commands::years::format_year_selector;
use crate::formatting::format_header;
use crate::fragment::Script;
use crate::loader::{load_into, ContentRoot, LoadedPage, RecordingScriptHost};
use crate::navigation::default_page_id;
use crate::session::Session;

/// Render a loaded page as text, optionally listing its revived scripts
pub fn format_page(page: &LoadedPage, scripts: Option<&[Script]>) -> String {
    let mut output = String::new();
    let title = if page.title.is_empty() { &page.page_id } else { &page.title };
    output.push_str(&format_header(title, true));
    if let Some(selector) = &page.year_selector {
        output.push_str(&format_year_selector(selector));
    }
    output.push('\n');
    output.push_str(&page.text());
    output.push('\n');

    if page.hosts_matchups {
        output.push_str("\nThis page hosts the matchup tool; use `mlbdash resolve` to query it.\n");
    }

    if let Some(scripts) = scripts {
        output.push_str(&format!("\n{}", format_header(&format!("Scripts ({})", scripts.len()), false)));
        for (i, script) in scripts.iter().enumerate() {
            output.push_str(&format!("{:>2}. {}\n", i + 1, script.summary()));
        }
    }
    output
}

pub async fn run(session: &Session, page_id: Option<String>, show_scripts: bool) -> Result<()> {
    let page_id = default_page_id(page_id.as_deref(), session.store(), session.default_page());
    let mut root = ContentRoot::new();
    let mut host = RecordingScriptHost::default();

    if !load_into(session, &mut root, &page_id, &mut host).await {
        bail!("Page '{}' could not be loaded", page_id);
    }
    let page = root
        .loaded()
        .with_context(|| format!("Page '{}' was superseded", page_id))?;
    let scripts = show_scripts.then_some(host.revived.as_slice());
    print!("{}", format_page(page, scripts));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dev::mock_site::MockSite;
    use crate::store::MemoryStore;
    use std::sync::Arc;

    async fn loaded(page_id: &str) -> (LoadedPage, Vec<Script>) {
        let session = Session::new(Arc::new(MockSite::new()), Arc::new(MemoryStore::new()));
        let mut root = ContentRoot::new();
        let mut host = RecordingScriptHost::default();
        assert!(load_into(&session, &mut root, page_id, &mut host).await);
        (root.loaded().unwrap().clone(), host.revived)
    }

    #[tokio::test]
    async fn test_format_player_page_with_scripts() {
        let (page, scripts) = loaded("p_jane_doe").await;
        let text = format_page(&page, Some(&scripts));
        assert!(text.starts_with("Jane Doe\n════════\nYears: 2024* 2023 2022\n"));
        assert!(text.contains("ERA 2.91 WHIP 1.02"));
        assert!(text.contains("Scripts (1)"));
        assert!(text.contains(" 1. text/javascript inline"));
    }

    #[tokio::test]
    async fn test_format_matchups_page_mentions_tool() {
        let (page, _) = loaded("matchups").await;
        let text = format_page(&page, None);
        assert!(text.contains("hosts the matchup tool"));
        assert!(!text.contains("Scripts"));
    }
}
