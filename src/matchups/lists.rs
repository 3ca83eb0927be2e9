use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use serde::Deserialize;

/// Label of the group holding names with no known team
pub const OTHER_GROUP: &str = "Other";

/// Precomputed dropdown pack (`matchups_lists.json`)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MatchupLists {
    #[serde(default)]
    pub years: Vec<String>,
    #[serde(default)]
    pub by_year: BTreeMap<String, YearLists>,
}

/// Option lists for one year
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct YearLists {
    #[serde(default)]
    pub hitters: Vec<String>,
    #[serde(default)]
    pub pitchers: Vec<String>,
    #[serde(default)]
    pub teams: Vec<String>,
    #[serde(default)]
    pub hitters_by_team: Vec<OptionGroup>,
    #[serde(default)]
    pub pitchers_by_team: Vec<OptionGroup>,
}

/// A labelled option group (team name and its members)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OptionGroup {
    pub label: String,
    #[serde(default)]
    pub options: Vec<String>,
}

impl OptionGroup {
    pub fn new(label: impl Into<String>, options: Vec<String>) -> Self {
        Self { label: label.into(), options }
    }
}

/// Last whitespace-delimited token, lower-cased
fn last_name_key(name: &str) -> String {
    name.split_whitespace().last().unwrap_or("").to_lowercase()
}

/// Ordering for person names: last name, then full name, case-insensitively
pub fn compare_names(a: &str, b: &str) -> Ordering {
    last_name_key(a)
        .cmp(&last_name_key(b))
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
        .then_with(|| a.cmp(b))
}

/// Deduplicate, drop blanks, and sort by [`compare_names`]
pub fn sort_names<I, S>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let unique: BTreeSet<String> = names
        .into_iter()
        .map(|n| n.as_ref().trim().to_string())
        .filter(|n| !n.is_empty())
        .collect();
    let mut sorted: Vec<String> = unique.into_iter().collect();
    sorted.sort_by(|a, b| compare_names(a, b));
    sorted
}

/// Deduplicate, drop blanks, plain lexicographic order
pub fn sort_teams<I, S>(teams: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    teams
        .into_iter()
        .map(|t| t.as_ref().trim().to_string())
        .filter(|t| !t.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Build option groups from (name, team) associations
///
/// Groups are ordered by label with "Other" last; members sorted by name.
pub fn group_by_team<'a, I>(entries: I) -> Vec<OptionGroup>
where
    I: IntoIterator<Item = (&'a str, Option<&'a str>)>,
{
    let mut groups: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    let mut other: Vec<&str> = Vec::new();
    for (name, team) in entries {
        match team.map(str::trim).filter(|t| !t.is_empty() && *t != OTHER_GROUP) {
            Some(team) => groups.entry(team).or_default().push(name),
            None => other.push(name),
        }
    }

    let mut result: Vec<OptionGroup> = groups
        .into_iter()
        .map(|(label, names)| OptionGroup::new(label, sort_names(names)))
        .collect();
    if !other.is_empty() {
        result.push(OptionGroup::new(OTHER_GROUP, sort_names(other)));
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_names_by_last_name() {
        let sorted = sort_names(["Bob Zant", "Al Smith", "Cy Young"]);
        assert_eq!(sorted, vec!["Al Smith", "Cy Young", "Bob Zant"]);
    }

    #[test]
    fn test_sort_names_is_stable_under_reordering() {
        let a = sort_names(["Cy Young", "Bob Zant", "Al Smith", "dee smith"]);
        let b = sort_names(["dee smith", "Al Smith", "Cy Young", "Bob Zant"]);
        assert_eq!(a, b);
        assert_eq!(a, vec!["Al Smith", "dee smith", "Cy Young", "Bob Zant"]);
    }

    #[test]
    fn test_sort_names_case_insensitive_last_name() {
        let sorted = sort_names(["Ann adams", "Zed Baker", "Bo Adams"]);
        assert_eq!(sorted, vec!["Ann adams", "Bo Adams", "Zed Baker"]);
    }

    #[test]
    fn test_sort_names_dedupes_and_drops_blanks() {
        let sorted = sort_names(["Al Smith", " ", "Al Smith ", "Madonna"]);
        assert_eq!(sorted, vec!["Madonna", "Al Smith"]);
    }

    #[test]
    fn test_sort_teams_lexicographic() {
        assert_eq!(
            sort_teams(["RedHawks", "BlueSox", "Mariners", "BlueSox"]),
            vec!["BlueSox", "Mariners", "RedHawks"]
        );
    }

    #[test]
    fn test_group_by_team_puts_other_last() {
        let groups = group_by_team([
            ("Jane Doe", Some("RedHawks")),
            ("Carl Ortiz", Some("Mariners")),
            ("Rob Reyes", None),
            ("Ann Best", Some("RedHawks")),
        ]);
        assert_eq!(
            groups,
            vec![
                OptionGroup::new("Mariners", vec!["Carl Ortiz".to_string()]),
                OptionGroup::new("RedHawks", vec!["Ann Best".to_string(), "Jane Doe".to_string()]),
                OptionGroup::new(OTHER_GROUP, vec!["Rob Reyes".to_string()]),
            ]
        );
    }

    #[test]
    fn test_pack_deserializes_with_missing_fields() {
        let lists: MatchupLists = serde_json::from_str(
            r#"{"years": ["2024"], "by_year": {"2024": {"hitters": ["Al Smith"],
                "hitters_by_team": [{"label": "RedHawks", "options": ["Al Smith"]}]}}}"#,
        )
        .unwrap();
        let year = &lists.by_year["2024"];
        assert_eq!(year.hitters, vec!["Al Smith"]);
        assert!(year.pitchers.is_empty());
        assert_eq!(year.hitters_by_team[0].label, "RedHawks");
    }
}
