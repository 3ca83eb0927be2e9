use tracing::debug;

use super::content::open_page;
use crate::search::{Filters, SidebarRow, SidebarView};
use crate::store::KeyValueStore;
use crate::tui::action::Action;
use crate::tui::effects::{DataEffects, Effect};
use crate::tui::state::{AppState, Focus};

/// Handle sidebar navigation, search and filter actions
pub fn reduce_sidebar(
    state: AppState,
    action: &Action,
    effects: &DataEffects,
) -> Result<(AppState, Effect), AppState> {
    let store = effects.session().store();
    match action {
        Action::SidebarMove(delta) => {
            let mut new_state = state;
            let last = new_state.sidebar_rows().len().saturating_sub(1) as isize;
            new_state.sidebar_cursor = (new_state.sidebar_cursor as isize + delta).clamp(0, last) as usize;
            Ok((new_state, Effect::None))
        }
        Action::SidebarActivate => Ok(activate_row(state, effects)),
        Action::SidebarSwitchTab => Ok(switch_tab(state, store)),
        Action::ToggleHideMinors => Ok(update_filters(state, store, |f| f.hide_minors = !f.hide_minors)),
        Action::ToggleHideHurt => Ok(update_filters(state, store, |f| f.hide_hurt = !f.hide_hurt)),
        Action::StartSearch => {
            let mut new_state = state;
            new_state.search.editing = true;
            new_state.focus = Focus::Sidebar;
            Ok((new_state, Effect::None))
        }
        Action::SearchInput(c) => Ok(edit_query(state, store, |q| q.push(*c))),
        Action::SearchBackspace => Ok(edit_query(state, store, |q| {
            q.pop();
        })),
        Action::SearchSubmit => {
            let mut new_state = state;
            new_state.search.editing = false;
            Ok((new_state, Effect::None))
        }
        Action::SearchCancel => {
            let mut new_state = state;
            new_state.search.editing = false;
            Ok(edit_query(new_state, store, String::clear))
        }
        _ => Err(state),
    }
}

fn with_view(state: &mut AppState, apply: impl FnOnce(&mut SidebarView)) {
    if let Some(view) = state.sidebar.as_mut() {
        apply(view);
    }
    state.clamp_cursor();
}

fn edit_query(state: AppState, store: &dyn KeyValueStore, edit: impl FnOnce(&mut String)) -> (AppState, Effect) {
    let mut new_state = state;
    edit(&mut new_state.search.query);
    let query = new_state.search.query.clone();
    with_view(&mut new_state, |view| view.apply_search_and_filters(&query, store));
    new_state.sidebar_cursor = 0;
    (new_state, Effect::None)
}

fn update_filters(state: AppState, store: &dyn KeyValueStore, change: impl FnOnce(&mut Filters)) -> (AppState, Effect) {
    let mut new_state = state;
    with_view(&mut new_state, |view| {
        let mut filters = view.filters();
        change(&mut filters);
        debug!("SIDEBAR: filters {:?}", filters);
        view.set_filters(filters, store);
    });
    (new_state, Effect::None)
}

/// Division and team indices of the team a row belongs to
fn team_of(row: SidebarRow) -> Option<(usize, usize)> {
    match row {
        SidebarRow::Division { .. } => None,
        SidebarRow::Team { division, team }
        | SidebarRow::Tabs { division, team }
        | SidebarRow::Role { division, team, .. }
        | SidebarRow::Label { division, team, .. }
        | SidebarRow::Player { division, team, .. } => Some((division, team)),
    }
}

fn switch_tab(state: AppState, store: &dyn KeyValueStore) -> (AppState, Effect) {
    let mut new_state = state;
    let searching = new_state.sidebar.as_ref().is_some_and(SidebarView::is_searching);
    if !searching {
        if let Some((division, team)) = new_state.cursor_row().and_then(team_of) {
            with_view(&mut new_state, |view| {
                let team = &view.divisions()[division].teams[team];
                let (id, role) = (team.id.clone(), team.active_role.toggle());
                view.set_team_role_tab(&id, role, store);
            });
        }
    }
    (new_state, Effect::None)
}

fn activate_row(state: AppState, effects: &DataEffects) -> (AppState, Effect) {
    let store = effects.session().store();
    let mut new_state = state;
    let (Some(row), Some(view)) = (new_state.cursor_row(), new_state.sidebar.as_ref()) else {
        return (new_state, Effect::None);
    };
    match row {
        SidebarRow::Division { division } => {
            let id = view.divisions()[division].id.clone();
            with_view(&mut new_state, |view| view.toggle_division(&id, store));
        }
        SidebarRow::Team { division, team } => {
            let id = view.divisions()[division].teams[team].id.clone();
            with_view(&mut new_state, |view| view.toggle_team(&id, store));
        }
        SidebarRow::Tabs { .. } => return switch_tab(new_state, store),
        SidebarRow::Player { .. } => {
            if let Some(page) = view.player_at(row).map(|p| p.page.clone()) {
                return open_page(new_state, &page, effects);
            }
        }
        SidebarRow::Role { .. } | SidebarRow::Label { .. } => {}
    }
    (new_state, Effect::None)
}
