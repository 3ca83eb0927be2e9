/// Keyboard event to action mapping
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::trace;

use super::action::Action;
use super::state::{AppState, Focus};

/// Lines moved by PageUp/PageDown in the content pane
const PAGE_STEP: i32 = 10;

/// Keys while the search box is being edited
fn handle_search_keys(key_code: KeyCode) -> Option<Action> {
    match key_code {
        KeyCode::Esc => Some(Action::SearchCancel),
        KeyCode::Enter => Some(Action::SearchSubmit),
        KeyCode::Backspace => Some(Action::SearchBackspace),
        KeyCode::Char(c) => Some(Action::SearchInput(c)),
        _ => None,
    }
}

/// Handle global keys that work regardless of focus
fn handle_global_keys(key_code: KeyCode) -> Option<Action> {
    match key_code {
        KeyCode::Char('q') | KeyCode::Char('Q') => Some(Action::Quit),
        KeyCode::Char('/') => Some(Action::StartSearch),
        KeyCode::Tab => Some(Action::FocusNext),
        KeyCode::Char(c @ '1'..='9') => c.to_digit(10).map(|n| Action::OpenStaticPage(n as usize - 1)),
        _ => None,
    }
}

fn handle_sidebar_keys(key_code: KeyCode) -> Option<Action> {
    match key_code {
        KeyCode::Up | KeyCode::Char('k') => Some(Action::SidebarMove(-1)),
        KeyCode::Down | KeyCode::Char('j') => Some(Action::SidebarMove(1)),
        KeyCode::PageUp => Some(Action::SidebarMove(-(PAGE_STEP as isize))),
        KeyCode::PageDown => Some(Action::SidebarMove(PAGE_STEP as isize)),
        KeyCode::Enter | KeyCode::Char(' ') => Some(Action::SidebarActivate),
        KeyCode::Left | KeyCode::Right => Some(Action::SidebarSwitchTab),
        KeyCode::Char('m') => Some(Action::ToggleHideMinors),
        KeyCode::Char('h') => Some(Action::ToggleHideHurt),
        KeyCode::Esc => Some(Action::SearchCancel),
        _ => None,
    }
}

fn handle_content_keys(key_code: KeyCode) -> Option<Action> {
    match key_code {
        KeyCode::Up | KeyCode::Char('k') => Some(Action::ScrollContent(-1)),
        KeyCode::Down | KeyCode::Char('j') => Some(Action::ScrollContent(1)),
        KeyCode::PageUp => Some(Action::ScrollContent(-PAGE_STEP)),
        KeyCode::PageDown => Some(Action::ScrollContent(PAGE_STEP)),
        KeyCode::Char('[') => Some(Action::StepYear(1)),
        KeyCode::Char(']') => Some(Action::StepYear(-1)),
        _ => None,
    }
}

fn handle_matchup_keys(key_code: KeyCode) -> Option<Action> {
    match key_code {
        KeyCode::Left | KeyCode::Char('h') => Some(Action::MatchupField(-1)),
        KeyCode::Right | KeyCode::Char('l') => Some(Action::MatchupField(1)),
        KeyCode::Up | KeyCode::Char('k') => Some(Action::MatchupValue(-1)),
        KeyCode::Down | KeyCode::Char('j') => Some(Action::MatchupValue(1)),
        KeyCode::Backspace | KeyCode::Delete => Some(Action::MatchupClear),
        _ => None,
    }
}

/// Convert a key event into an action for the current state
pub fn key_to_action(key: KeyEvent, state: &AppState) -> Option<Action> {
    trace!("KEY: {:?} (focus {:?})", key.code, state.focus);

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Action::Quit);
    }
    if state.search.editing {
        return handle_search_keys(key.code);
    }
    if let Some(action) = handle_global_keys(key.code) {
        return Some(action);
    }
    match state.focus {
        Focus::Sidebar => handle_sidebar_keys(key.code),
        Focus::Content => handle_content_keys(key.code),
        Focus::Matchups => handle_matchup_keys(key.code),
    }
}
