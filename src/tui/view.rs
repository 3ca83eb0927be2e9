//! Drawing: every widget is a projection of `AppState`

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::state::{AppState, Focus, MatchupPanel, PANEL_FIXED_FIELDS};
use crate::commands::search::sidebar_line;
use crate::config::ThemeConfig;
use crate::formatting::fit_label;
use crate::loader::{ContentState, LoadedPage, LOADING_TEXT};
use crate::matchups::FormStatus;
use crate::navigation::page_hash;

/// Sidebar width including borders
const SIDEBAR_WIDTH: u16 = 34;

pub fn render(f: &mut Frame, state: &AppState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(3), Constraint::Length(1)])
        .split(f.area());
    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(10)])
        .split(rows[1]);

    render_header(f, rows[0], state);
    render_sidebar(f, body[0], state);
    render_content(f, body[1], state);
    render_status_bar(f, rows[2], state);
}

fn focus_style(focused: bool, theme: &ThemeConfig) -> Style {
    if focused {
        Style::default().fg(theme.selection_fg).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

fn render_header(f: &mut Frame, area: Rect, state: &AppState) {
    let theme = &state.config.theme;
    let mut spans = vec![Span::styled("mlbdash", Style::default().fg(theme.heading_fg).add_modifier(Modifier::BOLD))];
    if let Some(nav) = &state.nav {
        for (i, page) in nav.pages.iter().enumerate().take(9) {
            let style = if state.content.active_page() == Some(page.id.as_str()) {
                Style::default().fg(theme.selection_fg)
            } else {
                Style::default()
            };
            spans.push(Span::raw("  "));
            spans.push(Span::styled(format!("{} {}", i + 1, page.title), style));
        }
    }
    if state.search.editing || !state.search.query.is_empty() {
        let cursor = if state.search.editing { "_" } else { "" };
        spans.push(Span::raw("  │ "));
        spans.push(Span::styled(format!("/{}{}", state.search.query, cursor), Style::default().fg(theme.selection_fg)));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Visible sidebar lines for a pane of `height` rows and `width` columns
pub fn sidebar_lines(state: &AppState, height: usize, width: usize) -> Vec<Line<'static>> {
    let Some(view) = &state.sidebar else {
        return Vec::new();
    };
    let rows = view.rows();
    if rows.is_empty() {
        return vec![Line::styled("No players match.", Style::default().fg(Color::DarkGray))];
    }
    let offset = state.sidebar_cursor.saturating_sub(height.saturating_sub(1));
    let focused = state.focus == Focus::Sidebar && !state.search.editing;

    rows.iter()
        .enumerate()
        .skip(offset)
        .take(height)
        .map(|(i, row)| {
            let (depth, text) = sidebar_line(view, *row);
            let label = fit_label(&format!("{}{}", "  ".repeat(depth), text), width);
            if i == state.sidebar_cursor {
                Line::styled(label, focus_style(focused, &state.config.theme).add_modifier(Modifier::REVERSED))
            } else if depth == 0 {
                Line::styled(label, Style::default().fg(state.config.theme.heading_fg))
            } else {
                Line::raw(label)
            }
        })
        .collect()
}

fn render_sidebar(f: &mut Frame, area: Rect, state: &AppState) {
    let title = if state.search.query.is_empty() {
        " Players ".to_string()
    } else {
        format!(" Search: {} ", state.search.query)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(focus_style(state.focus == Focus::Sidebar, &state.config.theme));
    let inner = block.inner(area);
    let lines = sidebar_lines(state, inner.height as usize, inner.width as usize);
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn year_line(page: &LoadedPage, theme: &ThemeConfig) -> Option<Line<'static>> {
    let selector = page.year_selector.as_ref()?;
    let mut spans = vec![Span::raw("Years:")];
    for (i, option) in selector.options.iter().enumerate() {
        spans.push(Span::raw(" "));
        if selector.current == Some(i) {
            spans.push(Span::styled(
                format!("[{}]", option.year),
                Style::default().fg(theme.selection_fg).add_modifier(Modifier::BOLD),
            ));
        } else {
            spans.push(Span::raw(option.year.clone()));
        }
    }
    Some(Line::from(spans))
}

fn panel_lines(panel: &MatchupPanel, focused: bool, theme: &ThemeConfig) -> Vec<Line<'static>> {
    let form = panel.tool.form();
    let field_style = |field: usize| {
        if focused && panel.field == field {
            Style::default().fg(theme.selection_fg).add_modifier(Modifier::REVERSED)
        } else {
            Style::default()
        }
    };
    let mut lines = vec![
        Line::raw(""),
        Line::styled("── Matchups ──", Style::default().fg(theme.heading_fg)),
        Line::from(vec![Span::raw("Mode: "), Span::styled(form.mode().title(), field_style(0))]),
        Line::from(vec![
            Span::raw("Year: "),
            Span::styled(form.year().unwrap_or("-").to_string(), field_style(1)),
        ]),
    ];
    let row_count = form.mode().row_count();
    for (i, dropdown) in form.fields().iter().enumerate() {
        let value = dropdown.value.clone().unwrap_or_else(|| "-".to_string());
        lines.push(Line::from(vec![
            Span::raw(format!("{}: ", dropdown.label(row_count))),
            Span::styled(value, field_style(PANEL_FIXED_FIELDS + i)),
        ]));
    }
    let status = match panel.tool.status() {
        FormStatus::Unselected => "choose a matchup",
        FormStatus::PartiallySelected => "selection incomplete",
        FormStatus::Resolved => "resolved",
        FormStatus::Unresolved => "no data for this selection",
    };
    lines.push(Line::styled(format!("Status: {}", status), Style::default().fg(Color::DarkGray)));

    for rendered in panel.tool.rendered() {
        lines.push(Line::raw(""));
        lines.push(Line::styled(rendered.path.clone(), Style::default().fg(theme.heading_fg)));
        lines.extend(rendered.fragment.text().lines().map(|l| Line::raw(format!("  {}", l))));
    }
    lines
}

/// Content pane text for the current state
pub fn content_lines(state: &AppState) -> Vec<Line<'static>> {
    let theme = &state.config.theme;
    match state.content.state() {
        ContentState::Empty => Vec::new(),
        ContentState::Loading { .. } => vec![Line::styled(LOADING_TEXT, Style::default().fg(Color::DarkGray))],
        ContentState::Loaded(page) => {
            let mut lines = Vec::new();
            if let Some(line) = year_line(page, theme) {
                lines.push(line);
                lines.push(Line::raw(""));
            }
            lines.extend(page.text().lines().map(|l| Line::raw(l.to_string())));
            if let Some(panel) = &state.matchups {
                lines.extend(panel_lines(panel, state.focus == Focus::Matchups, theme));
            }
            lines
        }
    }
}

fn render_content(f: &mut Frame, area: Rect, state: &AppState) {
    let title = match state.content.state() {
        ContentState::Loaded(page) if !page.title.is_empty() => format!(" {} ", page.title),
        ContentState::Loaded(page) => format!(" {} ", page.page_id),
        ContentState::Loading { page_id } => format!(" {} ", page_id),
        ContentState::Empty => String::new(),
    };
    let focused = matches!(state.focus, Focus::Content | Focus::Matchups);
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(focus_style(focused, &state.config.theme));
    let paragraph = Paragraph::new(content_lines(state))
        .block(block)
        .scroll((state.content_scroll, 0));
    f.render_widget(paragraph, area);
}

/// Right-hand status text: page hash, cache counters and load time
pub fn status_summary(state: &AppState) -> String {
    let mut parts = Vec::new();
    if let Some(page_id) = state.content.active_page() {
        parts.push(page_hash(page_id));
    }
    if let Some(cache) = state.cache {
        parts.push(format!("cache {}/{}", cache.entries, cache.fetches));
    }
    if state.revived_scripts > 0 {
        parts.push(format!("scripts {}", state.revived_scripts));
    }
    if let Some(loaded_at) = state.loaded_at {
        parts.push(format!("loaded {}", loaded_at.format(&state.config.time_format)));
    }
    parts.join(" │ ")
}

fn render_status_bar(f: &mut Frame, area: Rect, state: &AppState) {
    let help_style = Style::default().fg(Color::DarkGray);
    let left = match &state.status {
        Some(message) => Span::styled(message.clone(), Style::default().fg(Color::Red)),
        None if state.search.editing => Span::styled("Enter Keep │ Esc Clear", help_style),
        None => Span::styled("Tab Focus │ / Search │ m Minors │ h Hurt │ [ ] Year │ q Quit", help_style),
    };
    let right = status_summary(state);
    let padding = (area.width as usize).saturating_sub(left.content.chars().count() + right.chars().count());
    let line = Line::from(vec![left, Span::raw(" ".repeat(padding)), Span::styled(right, help_style)]);
    f.render_widget(Paragraph::new(line), area);
}
