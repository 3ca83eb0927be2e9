use tracing::debug;

use super::action::Action;
use super::effects::{DataEffects, Effect};
use super::reducers::{reduce_content, reduce_matchups, reduce_sidebar};
use super::state::{AppState, Focus};

/// State reducer
///
/// Takes the current state and an action, returns the new state and an
/// effect. Store writes for collapse flags and the active page happen here;
/// every fetch is returned as an `Effect` to run elsewhere.
///
/// Ownership is passed through the sub-reducer chain:
/// - Each sub-reducer returns Ok((state, effect)) if it handled the action
/// - Or Err(state) to pass ownership back for the next reducer to try
pub fn reduce(state: AppState, action: Action, effects: &DataEffects) -> (AppState, Effect) {
    let state = match reduce_sidebar(state, &action, effects) {
        Ok(result) => return result,
        Err(state) => state,
    };

    let state = match reduce_content(state, &action, effects) {
        Ok(result) => return result,
        Err(state) => state,
    };

    let state = match reduce_matchups(state, &action, effects) {
        Ok(result) => return result,
        Err(state) => state,
    };

    match action {
        Action::Init => (state, effects.load_documents()),
        Action::FocusNext => {
            let mut new_state = state;
            new_state.focus = match new_state.focus {
                Focus::Sidebar => Focus::Content,
                Focus::Content if new_state.matchups.is_some() => Focus::Matchups,
                Focus::Content | Focus::Matchups => Focus::Sidebar,
            };
            debug!("FOCUS: {:?}", new_state.focus);
            (new_state, Effect::None)
        }
        _ => (state, Effect::None),
    }
}
