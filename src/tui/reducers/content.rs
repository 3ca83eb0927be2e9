use chrono::Local;
use tracing::debug;

use crate::cache::CacheStats;
use crate::loader::{revive, LoadedPage, TracingScriptHost};
use crate::navigation::{default_page_id, NAV_PATH};
use crate::search::SidebarView;
use crate::tui::action::{Action, Documents};
use crate::tui::effects::{DataEffects, Effect};
use crate::tui::state::{AppState, Focus, MatchupPanel};

/// Handle document, page and content pane actions
///
/// Returns Ok((new_state, effect)) if the action was handled,
/// or Err(state) to pass ownership back to the caller.
pub fn reduce_content(
    state: AppState,
    action: &Action,
    effects: &DataEffects,
) -> Result<(AppState, Effect), AppState> {
    match action {
        Action::DocumentsLoaded(documents) => Ok(handle_documents_loaded(state, documents.clone(), effects)),
        Action::OpenPage(page_id) => Ok(open_page(state, page_id, effects)),
        Action::OpenStaticPage(n) => {
            let page_id = state
                .nav
                .as_ref()
                .and_then(|nav| nav.pages.get(*n))
                .map(|page| page.id.clone());
            match page_id {
                Some(page_id) => Ok(open_page(state, &page_id, effects)),
                None => Ok((state, Effect::None)),
            }
        }
        Action::PageLoaded { generation, page, cache } => {
            Ok(handle_page_loaded(state, *generation, page.clone(), *cache, effects))
        }
        Action::Prefetched(page_id) => {
            debug!("PREFETCH: siblings of {} warmed", page_id);
            Ok((state, Effect::None))
        }
        Action::ScrollContent(delta) => {
            let mut new_state = state;
            let scroll = i32::from(new_state.content_scroll) + delta;
            new_state.content_scroll = scroll.clamp(0, i32::from(u16::MAX)) as u16;
            Ok((new_state, Effect::None))
        }
        Action::StepYear(step) => Ok(step_year(state, *step, effects)),
        _ => Err(state),
    }
}

fn handle_documents_loaded(state: AppState, documents: Documents, effects: &DataEffects) -> (AppState, Effect) {
    let mut new_state = state;
    let session = effects.session();
    new_state.index = documents.index;
    new_state.options = Some(documents.options);

    let Some(nav) = documents.nav else {
        new_state.status = Some(format!("{} is unavailable", NAV_PATH));
        return (new_state, Effect::None);
    };
    new_state.sidebar = Some(SidebarView::new(&nav, session.store()));
    new_state.nav = Some(nav);

    let page_id = default_page_id(None, session.store(), session.default_page());
    debug!("DOCUMENTS: loaded, starting on {}", page_id);
    (new_state, Effect::Action(Action::OpenPage(page_id)))
}

/// Activate a page and start loading it
pub fn open_page(state: AppState, page_id: &str, effects: &DataEffects) -> (AppState, Effect) {
    let mut new_state = state;
    let Some(nav) = new_state.nav.clone() else {
        return (new_state, Effect::None);
    };
    match new_state.content.activate(&nav, effects.session().store(), page_id) {
        Some(ticket) => {
            new_state.matchups = None;
            new_state.content_scroll = 0;
            new_state.status = None;
            if new_state.focus == Focus::Matchups {
                new_state.focus = Focus::Content;
            }
            (new_state, effects.load_page(ticket))
        }
        None => {
            new_state.status = Some(format!("No page '{}'", page_id));
            (new_state, Effect::None)
        }
    }
}

fn handle_page_loaded(
    state: AppState,
    generation: u64,
    page: Option<Box<LoadedPage>>,
    cache: CacheStats,
    effects: &DataEffects,
) -> (AppState, Effect) {
    let mut new_state = state;
    new_state.cache = Some(cache);
    let failed = page.is_none();

    let Some(scripts) = new_state.content.commit(generation, page.map(|p| *p)) else {
        if failed && generation == new_state.content.generation() {
            new_state.status = Some("Page unavailable".to_string());
        }
        return (new_state, Effect::None);
    };

    let mut host = TracingScriptHost::default();
    revive(&mut host, &scripts);
    new_state.revived_scripts += host.revived;
    new_state.loaded_at = Some(Local::now());

    let Some(page) = new_state.content.loaded() else {
        return (new_state, Effect::None);
    };
    let page_id = page.page_id.clone();
    new_state.matchups = match (page.hosts_matchups, &new_state.options) {
        (true, Some(options)) => Some(MatchupPanel::new(options)),
        _ => None,
    };
    (new_state, effects.prefetch(page_id))
}

fn step_year(state: AppState, step: isize, effects: &DataEffects) -> (AppState, Effect) {
    let mut new_state = state;
    let option = new_state
        .content
        .loaded()
        .and_then(|page| page.year_selector.as_ref())
        .and_then(|selector| {
            // Off-list file: stepping forward reaches the first option
            let current = selector.current.map_or(-1, |i| i as isize);
            let target = usize::try_from(current + step).ok()?;
            if Some(target) == selector.current {
                return None;
            }
            selector.options.get(target).cloned()
        });
    let Some(option) = option else {
        return (new_state, Effect::None);
    };
    match new_state.content.select_year(&option) {
        Some(ticket) => {
            new_state.matchups = None;
            new_state.content_scroll = 0;
            (new_state, effects.load_page(ticket))
        }
        None => (new_state, Effect::None),
    }
}
