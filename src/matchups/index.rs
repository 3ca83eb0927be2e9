use std::collections::{BTreeMap, BTreeSet};

use serde::Deserialize;
use serde_json::Value;

use super::mode::MatchupMode;

/// Nested fragment-path index: `modes[mode].fragments[year][key..] -> path`
///
/// Mode entries are kept by their raw identifier so an index carrying modes
/// this build does not know about still loads.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FragmentIndex {
    #[serde(default)]
    pub modes: BTreeMap<String, ModeFragments>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModeFragments {
    #[serde(default)]
    pub fragments: BTreeMap<String, Value>,
}

impl FragmentIndex {
    /// Subtree for one mode and year
    pub fn year_tree(&self, mode: MatchupMode, year: &str) -> Option<&Value> {
        self.modes.get(mode.id())?.fragments.get(year)
    }

    /// Resolve a key tuple to a fragment path
    ///
    /// Absent is the normal outcome for an incomplete or inconsistent
    /// selection: any empty key, missing key, or a path of the wrong depth.
    pub fn resolve<S: AsRef<str>>(&self, mode: MatchupMode, year: &str, keys: &[S]) -> Option<&str> {
        if year.is_empty() || keys.is_empty() {
            return None;
        }
        let mut node = self.year_tree(mode, year)?;
        for key in keys {
            let key = key.as_ref();
            if key.is_empty() {
                return None;
            }
            node = node.as_object()?.get(key)?;
        }
        node.as_str().filter(|path| !path.is_empty())
    }

    /// Years present under any mode, newest first
    pub fn years(&self) -> Vec<String> {
        let years: BTreeSet<&String> = self
            .modes
            .values()
            .flat_map(|m| m.fragments.keys())
            .collect();
        years.into_iter().rev().cloned().collect()
    }

    /// Visit every complete key path below `modes[mode].fragments[year]`
    pub fn walk_paths<F>(&self, mode: MatchupMode, year: &str, mut visit: F)
    where
        F: FnMut(&[&str], &str),
    {
        if let Some(tree) = self.year_tree(mode, year) {
            let mut keys = Vec::new();
            walk(tree, &mut keys, &mut visit);
        }
    }
}

fn walk<'a, F>(node: &'a Value, keys: &mut Vec<&'a str>, visit: &mut F)
where
    F: FnMut(&[&str], &str),
{
    match node {
        Value::String(path) => visit(keys, path),
        Value::Object(map) => {
            for (key, child) in map {
                keys.push(key.as_str());
                walk(child, keys, visit);
                keys.pop();
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::create_mock_index;

    #[test]
    fn test_resolve_returns_stored_path() {
        let index = create_mock_index();
        assert_eq!(
            index.resolve(MatchupMode::SpVsTeam, "2024", &["Jane Doe", "vs.", "RedHawks"]),
            Some("frag_001.html")
        );
        assert_eq!(
            index.resolve(
                MatchupMode::RpInning,
                "2024",
                &["Rob Reyes", "Al Smith", "Bob Zant", "Cy Young"]
            ),
            Some("frags/rp_001.html")
        );
    }

    #[test]
    fn test_every_stored_tuple_resolves_and_altered_tuples_do_not() {
        let index = create_mock_index();
        for mode in MatchupMode::all() {
            for year in index.years() {
                let mut stored = Vec::new();
                index.walk_paths(mode, &year, |keys, path| {
                    stored.push((keys.iter().map(|k| k.to_string()).collect::<Vec<_>>(), path.to_string()));
                });
                for (keys, path) in stored {
                    assert_eq!(index.resolve(mode, &year, &keys[..]), Some(path.as_str()));
                    for i in 0..keys.len() {
                        let mut altered = keys.clone();
                        altered[i] = format!("{}-nope", altered[i]);
                        assert_eq!(index.resolve(mode, &year, &altered[..]), None);
                    }
                }
            }
        }
    }

    #[test]
    fn test_absent_team_is_absent() {
        let index = create_mock_index();
        assert_eq!(
            index.resolve(MatchupMode::SpVsTeam, "2024", &["Jane Doe", "vs.", "BlueJays"]),
            None
        );
    }

    #[test]
    fn test_rp_inning_batting_order_matters() {
        let index = create_mock_index();
        assert_eq!(
            index.resolve(
                MatchupMode::RpInning,
                "2024",
                &["Rob Reyes", "Bob Zant", "Al Smith", "Cy Young"]
            ),
            None
        );
    }

    #[test]
    fn test_wrong_depth_and_empty_keys_are_absent() {
        let index = create_mock_index();
        assert_eq!(index.resolve(MatchupMode::SpVsTeam, "2024", &["Jane Doe", "vs."]), None);
        assert_eq!(
            index.resolve(MatchupMode::SpVsTeam, "2024", &["Jane Doe", "vs.", "RedHawks", "extra"]),
            None
        );
        assert_eq!(index.resolve(MatchupMode::SpVsTeam, "2024", &["Jane Doe", "", "RedHawks"]), None);
        assert_eq!(index.resolve(MatchupMode::SpVsTeam, "", &["Jane Doe", "vs.", "RedHawks"]), None);
        let no_keys: [&str; 0] = [];
        assert_eq!(index.resolve(MatchupMode::SpVsTeam, "2024", &no_keys), None);
    }

    #[test]
    fn test_unknown_year_and_empty_index() {
        let index = create_mock_index();
        assert_eq!(index.resolve(MatchupMode::SpVsTeam, "1999", &["Jane Doe", "vs.", "RedHawks"]), None);
        let empty = FragmentIndex::default();
        assert_eq!(empty.resolve(MatchupMode::SpVsTeam, "2024", &["Jane Doe", "vs.", "RedHawks"]), None);
    }

    #[test]
    fn test_unknown_modes_are_tolerated() {
        let index: FragmentIndex = serde_json::from_str(
            r#"{"modes": {"future_mode": {"fragments": {"2030": {"a": "x.html"}}},
                          "sp_vs_team": {"fragments": {"2024": {"P": {"@": {"T": "p.html"}}}}}}}"#,
        )
        .unwrap();
        assert_eq!(index.resolve(MatchupMode::SpVsTeam, "2024", &["P", "@", "T"]), Some("p.html"));
        assert_eq!(index.years(), vec!["2030".to_string(), "2024".to_string()]);
    }

    #[test]
    fn test_years_newest_first() {
        let index = create_mock_index();
        assert_eq!(index.years(), vec!["2024".to_string(), "2023".to_string()]);
    }
}
