use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::trace;

use super::action::Action;
use super::effects::{DataEffects, Effect};
use super::reducer::reduce;
use super::state::AppState;

/// Action loop: owns the state, runs the reducer and executes effects
pub struct Runtime {
    state: AppState,

    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,

    effect_tx: mpsc::UnboundedSender<Effect>,

    data_effects: Arc<DataEffects>,
}

impl Runtime {
    /// Create a new runtime with initial state and data effects handler
    pub fn new(initial_state: AppState, data_effects: Arc<DataEffects>) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let (effect_tx, mut effect_rx) = mpsc::unbounded_channel();

        // Spawn effect executor task
        let action_tx_clone = action_tx.clone();
        tokio::spawn(async move {
            Self::run_effect_executor(&mut effect_rx, action_tx_clone).await;
        });

        Self {
            state: initial_state,
            action_tx,
            action_rx,
            effect_tx,
            data_effects,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Dispatch an action to be processed by the reducer
    pub fn dispatch(&mut self, action: Action) {
        trace!("ACTION: Dispatching {:?}", action);

        // Take ownership temporarily using mem::take pattern (no clone!)
        let state = std::mem::take(&mut self.state);
        let (new_state, effect) = reduce(state, action, &self.data_effects);
        self.state = new_state;

        if !matches!(effect, Effect::None) {
            let _ = self.effect_tx.send(effect);
        }
    }

    /// Process all pending actions in the queue
    ///
    /// Returns the number of actions processed
    pub fn process_actions(&mut self) -> usize {
        let mut count = 0;
        while let Ok(action) = self.action_rx.try_recv() {
            self.dispatch(action);
            count += 1;
        }
        count
    }

    /// Get a sender for dispatching actions from external sources
    pub fn action_sender(&self) -> mpsc::UnboundedSender<Action> {
        self.action_tx.clone()
    }

    /// Execute effects as they come in; completions feed back as actions
    async fn run_effect_executor(
        effect_rx: &mut mpsc::UnboundedReceiver<Effect>,
        action_tx: mpsc::UnboundedSender<Action>,
    ) {
        while let Some(effect) = effect_rx.recv().await {
            Self::process_effect_async(effect, &action_tx);
        }
    }

    fn process_effect_async(effect: Effect, action_tx: &mpsc::UnboundedSender<Action>) {
        match effect {
            Effect::None => {}
            Effect::Action(action) => {
                let _ = action_tx.send(action);
            }
            Effect::Async(future) => {
                let action_tx = action_tx.clone();
                tokio::spawn(async move {
                    let action = future.await;
                    let _ = action_tx.send(action);
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::testing::test_effects;
    use std::time::Duration;

    async fn wait_for(runtime: &mut Runtime, done: impl Fn(&AppState) -> bool) {
        for _ in 0..200 {
            runtime.process_actions();
            if done(runtime.state()) {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("runtime did not settle");
    }

    #[tokio::test]
    async fn test_init_loads_documents_and_home_page() {
        let mut runtime = Runtime::new(AppState::default(), test_effects());
        runtime.dispatch(Action::Init);
        wait_for(&mut runtime, |s| s.content.loaded().is_some()).await;

        assert!(runtime.state().sidebar.is_some());
        assert_eq!(runtime.state().content.loaded().unwrap().page_id, "home");
    }

    #[tokio::test]
    async fn test_newer_load_wins_over_older_one() {
        let mut runtime = Runtime::new(AppState::default(), test_effects());
        runtime.dispatch(Action::Init);
        wait_for(&mut runtime, |s| s.content.loaded().is_some()).await;

        runtime.dispatch(Action::OpenPage("p_jane_doe".into()));
        runtime.dispatch(Action::OpenPage("p_finn_lowe".into()));
        wait_for(&mut runtime, |s| {
            s.content.loaded().map_or(false, |p| p.page_id == "p_finn_lowe")
        })
        .await;
        // Let the older completion arrive and be dropped
        tokio::time::sleep(Duration::from_millis(20)).await;
        runtime.process_actions();
        assert_eq!(runtime.state().content.loaded().unwrap().page_id, "p_finn_lowe");
    }

    #[tokio::test]
    async fn test_action_sender_feeds_the_queue() {
        let mut runtime = Runtime::new(AppState::default(), test_effects());
        runtime.action_sender().send(Action::FocusNext).unwrap();
        assert_eq!(runtime.process_actions(), 1);
        assert_eq!(runtime.state().focus, crate::tui::state::Focus::Content);
    }
}
