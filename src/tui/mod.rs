pub mod action;
pub mod effects;
pub mod keys;
pub mod reducer;
pub mod reducers;
pub mod runtime;
pub mod state;
pub mod view;

#[cfg(test)]
pub mod testing;

pub use action::Action;
pub use effects::{DataEffects, Effect};
pub use keys::key_to_action;
pub use reducer::reduce;
pub use runtime::Runtime;
pub use state::AppState;

use std::io;
use std::sync::Arc;
use std::time::Duration;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    Terminal,
};
use crate::config::Config;
use crate::session::Session;

/// Main entry point for TUI mode
pub async fn run(session: Arc<Session>, config: Config) -> Result<(), io::Error> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    tracing::info!("TUI: browsing {}", session.site().describe());
    let data_effects = Arc::new(DataEffects::new(session));
    let mut runtime = Runtime::new(AppState::new(config), data_effects);

    // Load documents, then the start page
    runtime.dispatch(Action::Init);

    let result = event_loop(&mut terminal, &mut runtime);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    runtime: &mut Runtime,
) -> Result<(), io::Error> {
    loop {
        // Process any actions from effects FIRST (so data loads trigger re-render)
        let actions_processed = runtime.process_actions();
        if actions_processed > 0 {
            tracing::debug!("LOOP: Processed {} actions", actions_processed);
        }

        terminal.draw(|f| view::render(f, runtime.state()))?;

        if actions_processed > 0 {
            continue;
        }

        // Poll for keyboard events
        if !event::poll(Duration::from_millis(100))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        let Some(action) = key_to_action(key, runtime.state()) else {
            continue;
        };
        if matches!(action, Action::Quit) {
            tracing::debug!("ACTION: Quitting application");
            return Ok(());
        }
        runtime.dispatch(action);
    }
}
