//! Shared helpers for terminal UI tests

use std::collections::VecDeque;
use std::sync::Arc;

use ratatui::buffer::Buffer;

use super::action::Action;
use super::effects::{DataEffects, Effect};
use super::reducer::reduce;
use super::state::AppState;
use crate::dev::mock_site::MockSite;
use crate::session::Session;
use crate::store::MemoryStore;

/// Constant for general rendering width
pub const RENDER_WIDTH: u16 = 100;

pub fn test_effects_with(site: Arc<MockSite>) -> Arc<DataEffects> {
    let session = Session::new(site, Arc::new(MemoryStore::new()));
    Arc::new(DataEffects::new(Arc::new(session)))
}

/// Effects over the default mock site and a fresh in-memory store
pub fn test_effects() -> Arc<DataEffects> {
    test_effects_with(Arc::new(MockSite::new()))
}

/// Run an effect to completion, collecting the actions it produces
pub async fn run_effect(effect: Effect) -> Option<Action> {
    match effect {
        Effect::None => None,
        Effect::Action(action) => Some(action),
        Effect::Async(future) => Some(future.await),
    }
}

/// Dispatch `action` and every follow-up action until no effects remain
pub async fn settle(state: AppState, action: Action, effects: &DataEffects) -> AppState {
    let mut queue = VecDeque::from([action]);
    let mut state = state;
    while let Some(action) = queue.pop_front() {
        let (new_state, effect) = reduce(state, action, effects);
        state = new_state;
        queue.extend(run_effect(effect).await);
    }
    state
}

/// State after startup: documents loaded and the home page shown
pub async fn loaded_state() -> (AppState, Arc<DataEffects>) {
    let effects = test_effects();
    let state = settle(AppState::default(), Action::Init, &effects).await;
    (state, effects)
}

/// Helper to extract lines from buffer
pub fn buffer_lines(buf: &Buffer) -> Vec<String> {
    let area = buf.area();
    (0..area.height)
        .map(|y| {
            (0..area.width)
                .map(|x| buf[(x, y)].symbol())
                .collect::<String>()
                .trim_end()
                .to_string()
        })
        .collect()
}
