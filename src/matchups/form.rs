use tracing::debug;

use super::index::FragmentIndex;
use super::mode::{KeyKind, KeySlot, MatchupMode, Side};
use super::options::{DropdownOptions, OptionRole, OptionsResolver};

/// Where the form stands for the active mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormStatus {
    Unselected,
    PartiallySelected,
    /// Complete, and at least one row resolved to a fragment
    Resolved,
    /// Complete, but nothing resolved; renders nothing
    Unresolved,
}

impl FormStatus {
    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Resolved | Self::Unresolved)
    }
}

/// One dropdown of the form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dropdown {
    pub row: usize,
    pub slot: KeySlot,
    pub options: DropdownOptions,
    pub value: Option<String>,
}

impl Dropdown {
    pub fn label(&self, row_count: usize) -> String {
        if row_count > 1 {
            format!("{} {}", self.slot.label, self.row + 1)
        } else {
            self.slot.label.to_string()
        }
    }
}

/// A complete row ready to resolve
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveRequest {
    pub row: usize,
    pub keys: Vec<String>,
}

/// Row that resolved to a fragment path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRow {
    pub row: usize,
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    pub status: FormStatus,
    pub resolved: Vec<ResolvedRow>,
}

/// Selection state for one matchup mode
///
/// Owns the year and every dependent dropdown; changing the mode or the
/// year rebuilds the dropdowns with fresh option lists and no values.
#[derive(Debug, Clone)]
pub struct MatchupForm {
    mode: MatchupMode,
    years: Vec<String>,
    year: Option<String>,
    fields: Vec<Dropdown>,
}

impl MatchupForm {
    /// Build a form for `mode`, selecting the newest available year
    pub fn new(mode: MatchupMode, options: &OptionsResolver) -> Self {
        let years = options.years();
        let year = years.first().cloned();
        let mut form = Self {
            mode,
            years,
            year,
            fields: Vec::new(),
        };
        form.rebuild_fields(options);
        form
    }

    pub fn mode(&self) -> MatchupMode {
        self.mode
    }

    pub fn year(&self) -> Option<&str> {
        self.year.as_deref()
    }

    pub fn years(&self) -> &[String] {
        &self.years
    }

    pub fn fields(&self) -> &[Dropdown] {
        &self.fields
    }

    pub fn field(&self, index: usize) -> Option<&Dropdown> {
        self.fields.get(index)
    }

    pub fn set_mode(&mut self, mode: MatchupMode, options: &OptionsResolver) {
        debug!("FORM: mode {} -> {}", self.mode, mode);
        self.mode = mode;
        self.rebuild_fields(options);
    }

    /// Switch year; unknown years are rejected and leave the form untouched
    pub fn set_year(&mut self, year: &str, options: &OptionsResolver) -> bool {
        if !self.years.iter().any(|y| y == year) {
            return false;
        }
        debug!("FORM: year {:?} -> {}", self.year, year);
        self.year = Some(year.to_string());
        self.rebuild_fields(options);
        true
    }

    /// Set or clear one dropdown; values outside its option list are rejected
    pub fn set_value(&mut self, field: usize, value: Option<&str>) -> bool {
        let Some(dropdown) = self.fields.get_mut(field) else {
            return false;
        };
        match value.map(str::trim).filter(|v| !v.is_empty()) {
            Some(v) if dropdown.options.contains(v) => {
                dropdown.value = Some(v.to_string());
                true
            }
            Some(_) => false,
            None => {
                dropdown.value = None;
                true
            }
        }
    }

    /// Set a dropdown by row and position within the row's key layout
    pub fn set_key(&mut self, row: usize, position: usize, value: Option<&str>) -> bool {
        let width = self.mode.row_layout().len();
        if row >= self.mode.row_count() || position >= width {
            return false;
        }
        self.set_value(row * width + position, value)
    }

    fn rebuild_fields(&mut self, options: &OptionsResolver) {
        let year = self.year.clone().unwrap_or_default();
        let layout = self.mode.row_layout();
        let mut fields = Vec::with_capacity(layout.len() * self.mode.row_count());
        for row in 0..self.mode.row_count() {
            for slot in layout {
                let list = match slot.kind {
                    KeyKind::Pitcher => options.get_dropdown_options(&year, OptionRole::Pitchers),
                    KeyKind::Hitter => options.get_dropdown_options(&year, OptionRole::Hitters),
                    KeyKind::Team => options.get_dropdown_options(&year, OptionRole::Teams),
                    KeyKind::Side => {
                        let sides: Vec<&str> = Side::all().iter().map(Side::key).collect();
                        DropdownOptions::fixed(&sides)
                    }
                };
                fields.push(Dropdown {
                    row,
                    slot: *slot,
                    options: list,
                    value: None,
                });
            }
        }
        self.fields = fields;
    }

    /// Per row, the chosen keys in layout order
    fn rows(&self) -> Vec<Vec<Option<&str>>> {
        let width = self.mode.row_layout().len();
        self.fields
            .chunks(width)
            .map(|row| row.iter().map(|f| f.value.as_deref()).collect())
            .collect()
    }

    /// Rows with every key chosen
    pub fn requests(&self) -> Vec<ResolveRequest> {
        self.rows()
            .into_iter()
            .enumerate()
            .filter_map(|(row, keys)| {
                let keys: Option<Vec<String>> =
                    keys.into_iter().map(|k| k.map(str::to_string)).collect();
                keys.map(|keys| ResolveRequest { row, keys })
            })
            .collect()
    }

    /// Completeness alone, without consulting the index
    pub fn selection_status(&self) -> FormStatus {
        let rows = self.rows();
        let any_chosen = rows.iter().flatten().any(Option::is_some);
        if !any_chosen {
            return FormStatus::Unselected;
        }
        let complete_rows = rows.iter().filter(|r| r.iter().all(Option::is_some)).count();
        let complete = if self.mode.requires_all_rows() {
            complete_rows == rows.len()
        } else {
            complete_rows > 0
        };
        if complete {
            // Resolution decides between the two complete states
            FormStatus::Unresolved
        } else {
            FormStatus::PartiallySelected
        }
    }

    /// Evaluate the selection, resolving complete rows against the index
    pub fn evaluate(&self, index: Option<&FragmentIndex>) -> Evaluation {
        let status = self.selection_status();
        if !status.is_complete() {
            return Evaluation { status, resolved: Vec::new() };
        }
        let (Some(index), Some(year)) = (index, self.year()) else {
            return Evaluation { status: FormStatus::Unresolved, resolved: Vec::new() };
        };

        let resolved: Vec<ResolvedRow> = self
            .requests()
            .into_iter()
            .filter_map(|req| {
                let path = index.resolve(self.mode, year, &req.keys[..])?;
                Some(ResolvedRow { row: req.row, path: path.to_string() })
            })
            .collect();

        let status = if resolved.is_empty() {
            FormStatus::Unresolved
        } else {
            FormStatus::Resolved
        };
        debug!("FORM: {} {} -> {:?} ({} fragment(s))", self.mode, year, status, resolved.len());
        Evaluation { status, resolved }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{create_mock_index, create_mock_lists};
    use std::sync::Arc;

    fn options() -> OptionsResolver {
        OptionsResolver::new(
            Some(Arc::new(create_mock_lists())),
            Some(Arc::new(create_mock_index())),
        )
    }

    fn fill(form: &mut MatchupForm, row: usize, keys: &[&str]) {
        for (position, key) in keys.iter().enumerate() {
            assert!(form.set_key(row, position, Some(key)), "rejected {}", key);
        }
    }

    #[test]
    fn test_new_form_selects_newest_year_and_is_unselected() {
        let form = MatchupForm::new(MatchupMode::SpVsTeam, &options());
        assert_eq!(form.year(), Some("2024"));
        assert_eq!(form.fields().len(), 3);
        assert_eq!(form.selection_status(), FormStatus::Unselected);
    }

    #[test]
    fn test_sp_vs_team_state_progression() {
        let index = create_mock_index();
        let mut form = MatchupForm::new(MatchupMode::SpVsTeam, &options());

        form.set_key(0, 0, Some("Jane Doe"));
        assert_eq!(form.evaluate(Some(&index)).status, FormStatus::PartiallySelected);

        fill(&mut form, 0, &["Jane Doe", "vs.", "RedHawks"]);
        let eval = form.evaluate(Some(&index));
        assert_eq!(eval.status, FormStatus::Resolved);
        assert_eq!(eval.resolved, vec![ResolvedRow { row: 0, path: "frag_001.html".into() }]);

        form.set_key(0, 2, Some("Mariners"));
        form.set_key(0, 1, Some("vs."));
        assert_eq!(form.evaluate(Some(&index)).status, FormStatus::Unresolved);
    }

    #[test]
    fn test_values_outside_option_list_are_rejected() {
        let mut form = MatchupForm::new(MatchupMode::SpVsTeam, &options());
        assert!(!form.set_key(0, 1, Some("home")));
        assert!(!form.set_key(0, 2, Some("BlueJays")));
        assert!(!form.set_key(3, 0, Some("Jane Doe")));
        assert_eq!(form.selection_status(), FormStatus::Unselected);
    }

    #[test]
    fn test_year_change_resets_dropdowns_and_rederives_options() {
        let mut form = MatchupForm::new(MatchupMode::SpVsTeam, &options());
        fill(&mut form, 0, &["Jane Doe", "vs.", "RedHawks"]);

        assert!(form.set_year("2023", &options()));
        assert_eq!(form.selection_status(), FormStatus::Unselected);
        assert_eq!(form.fields()[2].options.flat, vec!["BlueSox", "Mariners"]);
        assert!(!form.set_year("1999", &options()));
        assert_eq!(form.year(), Some("2023"));
    }

    #[test]
    fn test_mode_change_resets_dropdowns() {
        let mut form = MatchupForm::new(MatchupMode::SpVsTeam, &options());
        fill(&mut form, 0, &["Jane Doe", "vs.", "RedHawks"]);

        form.set_mode(MatchupMode::RpInning, &options());
        assert_eq!(form.fields().len(), 4);
        assert!(form.fields().iter().all(|f| f.value.is_none()));
        assert_eq!(form.year(), Some("2024"));
    }

    #[test]
    fn test_sp_vs_2_needs_both_rows() {
        let index = create_mock_index();
        let mut form = MatchupForm::new(MatchupMode::SpVs2, &options());
        fill(&mut form, 0, &["Jane Doe", "vs.", "RedHawks"]);
        assert_eq!(form.evaluate(Some(&index)).status, FormStatus::PartiallySelected);

        fill(&mut form, 1, &["Carl Ortiz", "@", "RedHawks"]);
        let eval = form.evaluate(Some(&index));
        assert_eq!(eval.status, FormStatus::Resolved);
        assert_eq!(eval.resolved.len(), 2);
        assert_eq!(eval.resolved[1].path, "frags/sp2_003.html");
    }

    #[test]
    fn test_sp_vs_2_renders_the_row_that_resolves() {
        let index = create_mock_index();
        let mut form = MatchupForm::new(MatchupMode::SpVs2, &options());
        fill(&mut form, 0, &["Jane Doe", "vs.", "RedHawks"]);
        fill(&mut form, 1, &["Carl Ortiz", "vs.", "Mariners"]);

        let eval = form.evaluate(Some(&index));
        assert_eq!(eval.status, FormStatus::Resolved);
        assert_eq!(eval.resolved, vec![ResolvedRow { row: 0, path: "frags/sp2_001.html".into() }]);
    }

    #[test]
    fn test_multi_hitter_skips_incomplete_rows() {
        let index = create_mock_index();
        let mut form = MatchupForm::new(MatchupMode::MultiHitter, &options());
        assert_eq!(form.fields().len(), 15);

        form.set_key(0, 0, Some("Al Smith"));
        assert_eq!(form.evaluate(Some(&index)).status, FormStatus::PartiallySelected);

        fill(&mut form, 2, &["Cy Young", "@", "Carl Ortiz"]);
        let eval = form.evaluate(Some(&index));
        assert_eq!(eval.status, FormStatus::Resolved);
        assert_eq!(eval.resolved, vec![ResolvedRow { row: 2, path: "frags/mh_002.html".into() }]);
    }

    #[test]
    fn test_rp_inning_resolves_in_batting_order() {
        let index = create_mock_index();
        let mut form = MatchupForm::new(MatchupMode::RpInning, &options());
        fill(&mut form, 0, &["Rob Reyes", "Al Smith", "Bob Zant", "Cy Young"]);
        assert_eq!(form.evaluate(Some(&index)).resolved[0].path, "frags/rp_001.html");

        fill(&mut form, 0, &["Rob Reyes", "Bob Zant", "Al Smith", "Cy Young"]);
        assert_eq!(form.evaluate(Some(&index)).status, FormStatus::Unresolved);
    }

    #[test]
    fn test_missing_index_is_unresolved_not_an_error() {
        let mut form = MatchupForm::new(MatchupMode::SpVsTeam, &options());
        fill(&mut form, 0, &["Jane Doe", "vs.", "RedHawks"]);
        let eval = form.evaluate(None);
        assert_eq!(eval.status, FormStatus::Unresolved);
        assert!(eval.resolved.is_empty());
    }

    #[test]
    fn test_clearing_a_value() {
        let mut form = MatchupForm::new(MatchupMode::HitterVsPitcher, &options());
        fill(&mut form, 0, &["Al Smith", "vs.", "Jane Doe"]);
        assert!(form.set_key(0, 0, None));
        assert_eq!(form.selection_status(), FormStatus::PartiallySelected);
        assert!(form.requests().is_empty());
    }

    #[test]
    fn test_labels() {
        let form = MatchupForm::new(MatchupMode::SpVs2, &options());
        assert_eq!(form.fields()[3].label(2), "Pitcher 2");
        let single = MatchupForm::new(MatchupMode::RpInning, &options());
        assert_eq!(single.fields()[1].label(1), "Batter 1");
    }
}
