use anyhow::Result;

use crate::commands::require;
use crate::navigation::{Role, NAV_PATH};
use crate::search::{Filters, ListRow, SidebarRow, SidebarView};
use crate::session::Session;

fn fold_marker(collapsed: bool) -> &'static str {
    if collapsed {
        "▸"
    } else {
        "▾"
    }
}

/// Status markers appended to a player name
pub fn player_flags(minors: bool, hurt: bool, susp: bool) -> String {
    let mut flags = String::new();
    for (set, flag) in [(minors, " [minors]"), (hurt, " [inj]"), (susp, " [susp]")] {
        if set {
            flags.push_str(flag);
        }
    }
    flags
}

/// Text and nesting depth of one sidebar row
pub fn sidebar_line(view: &SidebarView, row: SidebarRow) -> (usize, String) {
    let divisions = view.divisions();
    match row {
        SidebarRow::Division { division } => {
            let d = &divisions[division];
            (0, format!("{} {}", fold_marker(d.collapsed), d.name))
        }
        SidebarRow::Team { division, team } => {
            let t = &divisions[division].teams[team];
            (1, format!("{} {}", fold_marker(t.collapsed), t.name))
        }
        SidebarRow::Tabs { division, team } => {
            let active = divisions[division].teams[team].active_role;
            let tabs: Vec<String> = Role::all()
                .iter()
                .map(|role| {
                    if *role == active {
                        format!("[{}]", role.title())
                    } else {
                        format!(" {} ", role.title())
                    }
                })
                .collect();
            (2, tabs.join(" "))
        }
        SidebarRow::Role { division, team, role } => {
            (2, format!("{}:", divisions[division].teams[team].roles[role].role.title()))
        }
        SidebarRow::Label { division, team, role, row } | SidebarRow::Player { division, team, role, row } => {
            match &divisions[division].teams[team].roles[role].rows[row] {
                ListRow::Label { label, .. } => (2, format!("-- {} --", label)),
                ListRow::Player(p) => (3, format!("{}{}", p.name, player_flags(p.is_minors, p.is_hurt, p.is_susp))),
            }
        }
    }
}

/// Render the whole sidebar as an indented outline
pub fn format_sidebar(view: &SidebarView) -> String {
    let rows = view.rows();
    if rows.is_empty() {
        return "No players match.\n".to_string();
    }
    let mut output = String::new();
    for row in rows {
        let (depth, text) = sidebar_line(view, row);
        output.push_str(&"  ".repeat(depth));
        output.push_str(&text);
        output.push('\n');
    }
    output
}

pub async fn run(session: &Session, query: Option<String>, filters: Filters) -> Result<()> {
    let nav = require(session.nav().await, NAV_PATH)?;
    let store = session.store();
    let mut view = SidebarView::new(&nav, store);
    view.set_filters(filters, store);
    view.apply_search_and_filters(query.as_deref().unwrap_or(""), store);
    print!("{}", format_sidebar(&view));
    Ok(())
}
