use tracing::debug;

use crate::loader::{revive, TracingScriptHost};
use crate::matchups::{FragmentIndex, OptionsResolver, Update};
use crate::tui::action::Action;
use crate::tui::effects::{DataEffects, Effect};
use crate::tui::state::{AppState, MatchupPanel};

/// Handle matchup form edits and rendered results
pub fn reduce_matchups(
    state: AppState,
    action: &Action,
    effects: &DataEffects,
) -> Result<(AppState, Effect), AppState> {
    match action {
        Action::MatchupField(step) => {
            let mut new_state = state;
            if let Some(panel) = new_state.matchups.as_mut() {
                panel.field = wrap(panel.field, *step, panel.field_count());
            }
            Ok((new_state, Effect::None))
        }
        Action::MatchupValue(step) => Ok(edit(state, effects, |panel, options, index| {
            step_value(panel, options, index, *step)
        })),
        Action::MatchupClear => Ok(edit(state, effects, |panel, _, index| match panel.dropdown() {
            Some(field) => panel.tool.set_field(field, None, index),
            None => Update::Rejected,
        })),
        Action::MatchupsRendered { generation, rendered } => {
            let mut new_state = state;
            let scripts = new_state
                .matchups
                .as_mut()
                .and_then(|panel| panel.tool.commit(*generation, rendered.clone()));
            if let Some(scripts) = scripts {
                let mut host = TracingScriptHost::default();
                revive(&mut host, &scripts);
                new_state.revived_scripts += host.revived;
            }
            Ok((new_state, Effect::None))
        }
        _ => Err(state),
    }
}

fn wrap(position: usize, step: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    (position as isize + step).rem_euclid(len as isize) as usize
}

/// Apply a form change and turn its outcome into an effect
fn edit<F>(state: AppState, effects: &DataEffects, change: F) -> (AppState, Effect)
where
    F: FnOnce(&mut MatchupPanel, &OptionsResolver, Option<&FragmentIndex>) -> Update,
{
    let mut new_state = state;
    let (Some(panel), Some(options)) = (new_state.matchups.as_mut(), new_state.options.as_ref()) else {
        return (new_state, Effect::None);
    };
    let update = change(panel, options, new_state.index.as_deref());

    match update {
        Update::Render(ticket) => {
            debug!("MATCHUPS: rendering {} row(s)", ticket.rows.len());
            (new_state, effects.render_matchups(ticket))
        }
        Update::Cleared => (new_state, Effect::None),
        Update::Rejected => {
            new_state.status = Some("No such option".to_string());
            (new_state, Effect::None)
        }
    }
}

/// Cycle the focused field's value; dropdowns cycle through "unset" as well
fn step_value(
    panel: &mut MatchupPanel,
    options: &OptionsResolver,
    index: Option<&FragmentIndex>,
    step: isize,
) -> Update {
    let form = panel.tool.form();
    match panel.field {
        0 => {
            let mode = if step > 0 { form.mode().next() } else { form.mode().prev() };
            panel.tool.set_mode(mode, options, index)
        }
        1 => {
            let years = form.years();
            if years.is_empty() {
                return Update::Rejected;
            }
            let position = form
                .year()
                .and_then(|y| years.iter().position(|v| v == y))
                .unwrap_or(0);
            let year = years[wrap(position, step, years.len())].clone();
            panel.tool.set_year(&year, options, index)
        }
        _ => {
            let Some(field) = panel.dropdown() else {
                return Update::Rejected;
            };
            let Some(dropdown) = form.field(field) else {
                return Update::Rejected;
            };
            let values = dropdown.options.values();
            let position = dropdown
                .value
                .as_deref()
                .and_then(|v| values.iter().position(|o| *o == v))
                .map_or(0, |p| p + 1);
            let next = wrap(position, step, values.len() + 1);
            let value = next.checked_sub(1).map(|i| values[i].to_string());
            panel.tool.set_field(field, value.as_deref(), index)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matchups::{FormStatus, MatchupMode};
    use crate::tui::testing::{loaded_state, settle};

    async fn matchups_state() -> (AppState, std::sync::Arc<DataEffects>) {
        let (state, effects) = loaded_state().await;
        let state = settle(state, Action::OpenPage("matchups".into()), &effects).await;
        (state, effects)
    }

    #[test]
    fn test_wrap() {
        assert_eq!(wrap(0, -1, 3), 2);
        assert_eq!(wrap(2, 1, 3), 0);
        assert_eq!(wrap(0, 1, 0), 0);
    }

    #[tokio::test]
    async fn test_matchups_page_hosts_panel() {
        let (state, _) = matchups_state().await;
        let panel = state.matchups.as_ref().unwrap();
        assert_eq!(panel.tool.form().mode(), MatchupMode::SpVsTeam);
        assert_eq!(panel.tool.form().year(), Some("2024"));
        assert_eq!(panel.field_count(), 5);
    }

    #[tokio::test]
    async fn test_cycling_values_renders_fragment() {
        let (mut state, effects) = matchups_state().await;
        // Pitchers list Carl Ortiz (Mariners) first; sides list "@" first
        let steps = [
            Action::MatchupField(2),
            Action::MatchupValue(2),
            Action::MatchupField(1),
            Action::MatchupValue(2),
            Action::MatchupField(1),
            Action::MatchupValue(-1),
        ];
        for action in steps {
            state = settle(state, action, &effects).await;
        }
        let tool = &state.matchups.as_ref().unwrap().tool;
        let keys: Vec<Option<&str>> = tool.form().fields().iter().map(|f| f.value.as_deref()).collect();
        assert_eq!(keys, vec![Some("Jane Doe"), Some("vs."), Some("RedHawks")]);
        assert_eq!(tool.status(), FormStatus::Resolved);
        assert_eq!(tool.rendered().len(), 1);
        assert_eq!(tool.rendered()[0].path, "frag_001.html");
    }

    #[tokio::test]
    async fn test_clear_empties_results() {
        let (mut state, effects) = matchups_state().await;
        for action in [
            Action::MatchupField(2),
            Action::MatchupValue(2),
            Action::MatchupField(1),
            Action::MatchupValue(2),
            Action::MatchupField(1),
            Action::MatchupValue(-1),
            Action::MatchupClear,
        ] {
            state = settle(state, action, &effects).await;
        }
        let tool = &state.matchups.as_ref().unwrap().tool;
        assert_eq!(tool.status(), FormStatus::PartiallySelected);
        assert!(tool.rendered().is_empty());
    }

    #[tokio::test]
    async fn test_mode_cycles_backwards_from_first() {
        let (mut state, effects) = matchups_state().await;
        for action in [Action::MatchupField(-1), Action::MatchupField(-4), Action::MatchupValue(-1)] {
            state = settle(state, action, &effects).await;
        }
        let panel = state.matchups.as_ref().unwrap();
        assert_eq!(panel.tool.form().mode(), MatchupMode::RpInning);
        assert_eq!(panel.field, 0);
    }
}
