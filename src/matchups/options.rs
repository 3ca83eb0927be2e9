use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

use cached::{Cached, UnboundCache};
use tracing::debug;

use super::index::FragmentIndex;
use super::lists::{group_by_team, sort_names, sort_teams, MatchupLists, OptionGroup, YearLists};
use super::mode::MatchupMode;

/// Which list a dropdown draws from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionRole {
    Hitters,
    Pitchers,
    Teams,
}

impl OptionRole {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Hitters => "hitters",
            Self::Pitchers => "pitchers",
            Self::Teams => "teams",
        }
    }
}

impl fmt::Display for OptionRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OptionRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "hitters" | "batters" => Ok(Self::Hitters),
            "pitchers" => Ok(Self::Pitchers),
            "teams" => Ok(Self::Teams),
            other => Err(format!("Unknown option role '{}'", other)),
        }
    }
}

/// Values a dropdown may offer: the flat list and, when known, a team-grouped one
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DropdownOptions {
    pub flat: Vec<String>,
    pub grouped: Option<Vec<OptionGroup>>,
}

impl DropdownOptions {
    pub fn flat(values: Vec<String>) -> Self {
        Self { flat: values, grouped: None }
    }

    /// Literal values, e.g. the side markers
    pub fn fixed(values: &[&str]) -> Self {
        Self::flat(values.iter().map(|v| v.to_string()).collect())
    }

    pub fn is_empty(&self) -> bool {
        self.flat.is_empty() && self.grouped.as_ref().map_or(true, |g| g.iter().all(|g| g.options.is_empty()))
    }

    /// Grouped variant when available, preferred over the flat list
    pub fn preferred_groups(&self) -> Option<&[OptionGroup]> {
        self.grouped.as_deref().filter(|g| !g.is_empty())
    }

    /// Every selectable value in display order
    pub fn values(&self) -> Vec<&str> {
        match self.preferred_groups() {
            Some(groups) => groups
                .iter()
                .flat_map(|g| g.options.iter().map(String::as_str))
                .collect(),
            None => self.flat.iter().map(String::as_str).collect(),
        }
    }

    pub fn contains(&self, value: &str) -> bool {
        self.flat.iter().any(|v| v == value)
            || self
                .grouped
                .iter()
                .flatten()
                .any(|g| g.options.iter().any(|v| v == value))
    }

    fn from_year_lists(lists: &YearLists, role: OptionRole) -> Self {
        let non_empty = |groups: &Vec<OptionGroup>| (!groups.is_empty()).then(|| groups.clone());
        match role {
            OptionRole::Hitters => Self {
                flat: lists.hitters.clone(),
                grouped: non_empty(&lists.hitters_by_team),
            },
            OptionRole::Pitchers => Self {
                flat: lists.pitchers.clone(),
                grouped: non_empty(&lists.pitchers_by_team),
            },
            OptionRole::Teams => Self::flat(lists.teams.clone()),
        }
    }
}

/// A provider of per-year dropdown lists
pub trait OptionsSource: Send + Sync {
    fn name(&self) -> &'static str;

    /// Lists for a year, or None when this source knows nothing about it
    fn year_lists(&self, year: &str) -> Option<Arc<YearLists>>;

    /// Years this source can answer for
    fn years(&self) -> Vec<String>;
}

/// Fast path: the generated `matchups_lists.json` pack
pub struct PrecomputedListsSource {
    years: Vec<String>,
    by_year: BTreeMap<String, Arc<YearLists>>,
}

impl PrecomputedListsSource {
    pub fn new(lists: Arc<MatchupLists>) -> Self {
        let by_year = lists
            .by_year
            .iter()
            .map(|(year, year_lists)| (year.clone(), Arc::new(year_lists.clone())))
            .collect();
        Self {
            years: lists.years.clone(),
            by_year,
        }
    }
}

impl OptionsSource for PrecomputedListsSource {
    fn name(&self) -> &'static str {
        "precomputed"
    }

    fn year_lists(&self, year: &str) -> Option<Arc<YearLists>> {
        self.by_year.get(year).cloned()
    }

    fn years(&self) -> Vec<String> {
        let mut years = self.years.clone();
        years.extend(self.by_year.keys().cloned());
        years
    }
}

/// Slow path: a full scan of the fragment index, memoized per year
pub struct DerivedFromIndexSource {
    index: Arc<FragmentIndex>,
    memo: Mutex<UnboundCache<String, Arc<YearLists>>>,
}

impl DerivedFromIndexSource {
    pub fn new(index: Arc<FragmentIndex>) -> Self {
        Self {
            index,
            memo: Mutex::new(UnboundCache::new()),
        }
    }
}

impl OptionsSource for DerivedFromIndexSource {
    fn name(&self) -> &'static str {
        "derived"
    }

    fn year_lists(&self, year: &str) -> Option<Arc<YearLists>> {
        if !self.index.years().iter().any(|y| y == year) {
            return None;
        }
        let Ok(mut memo) = self.memo.lock() else {
            return Some(Arc::new(derive_year_lists(&self.index, year)));
        };
        let lists = memo.cache_get_or_set_with(year.to_string(), || {
            debug!("OPTIONS: deriving dropdown lists for {} from the fragment index", year);
            Arc::new(derive_year_lists(&self.index, year))
        });
        Some(lists.clone())
    }

    fn years(&self) -> Vec<String> {
        self.index.years()
    }
}

/// Scan every relevant mode of one year and collect names, teams and team groupings
pub fn derive_year_lists(index: &FragmentIndex, year: &str) -> YearLists {
    let mut hitters: BTreeSet<String> = BTreeSet::new();
    let mut pitchers: BTreeSet<String> = BTreeSet::new();
    let mut teams: BTreeSet<String> = BTreeSet::new();
    let mut pitcher_team: BTreeMap<String, String> = BTreeMap::new();

    for mode in [MatchupMode::SpVsTeam, MatchupMode::SpVs2] {
        index.walk_paths(mode, year, |keys, _| {
            if let [pitcher, _side, team] = keys {
                pitchers.insert(pitcher.to_string());
                teams.insert(team.to_string());
                let entry = pitcher_team.entry(pitcher.to_string()).or_insert_with(|| team.to_string());
                if *team < entry.as_str() {
                    *entry = team.to_string();
                }
            }
        });
    }

    index.walk_paths(MatchupMode::HitterVsPitcher, year, |keys, _| {
        if let [hitter, _side, pitcher] = keys {
            hitters.insert(hitter.to_string());
            pitchers.insert(pitcher.to_string());
        }
    });

    index.walk_paths(MatchupMode::RpInning, year, |keys, _| {
        if let [reliever, batters @ ..] = keys {
            pitchers.insert(reliever.to_string());
            hitters.extend(batters.iter().map(|b| b.to_string()));
        }
    });

    let pitchers_by_team = if pitcher_team.is_empty() {
        Vec::new()
    } else {
        group_by_team(
            pitchers
                .iter()
                .map(|p| (p.as_str(), pitcher_team.get(p).map(String::as_str))),
        )
    };

    YearLists {
        hitters: sort_names(&hitters),
        pitchers: sort_names(&pitchers),
        teams: sort_teams(&teams),
        // Hitters never carry a team key in the index
        hitters_by_team: Vec::new(),
        pitchers_by_team,
    }
}

/// Dropdown options for a year, preferring the precomputed pack
pub struct OptionsResolver {
    sources: Vec<Arc<dyn OptionsSource>>,
}

impl fmt::Debug for OptionsResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.sources.iter().map(|s| s.name()).collect();
        f.debug_struct("OptionsResolver").field("sources", &names).finish()
    }
}

impl OptionsResolver {
    /// Build from whatever documents loaded; either may be unavailable
    pub fn new(lists: Option<Arc<MatchupLists>>, index: Option<Arc<FragmentIndex>>) -> Self {
        let mut sources: Vec<Arc<dyn OptionsSource>> = Vec::new();
        if let Some(lists) = lists {
            sources.push(Arc::new(PrecomputedListsSource::new(lists)));
        }
        if let Some(index) = index {
            sources.push(Arc::new(DerivedFromIndexSource::new(index)));
        }
        Self { sources }
    }

    pub fn from_sources(sources: Vec<Arc<dyn OptionsSource>>) -> Self {
        Self { sources }
    }

    /// Lists for a year from the first source that has it
    pub fn year_lists(&self, year: &str) -> Option<Arc<YearLists>> {
        self.sources.iter().find_map(|source| {
            let lists = source.year_lists(year)?;
            debug!("OPTIONS: lists for {} from {} source", year, source.name());
            Some(lists)
        })
    }

    pub fn get_dropdown_options(&self, year: &str, role: OptionRole) -> DropdownOptions {
        match self.year_lists(year) {
            Some(lists) => DropdownOptions::from_year_lists(&lists, role),
            None => DropdownOptions::default(),
        }
    }

    /// Years offered by any source, newest first
    pub fn years(&self) -> Vec<String> {
        let years: BTreeSet<String> = self
            .sources
            .iter()
            .flat_map(|s| s.years())
            .filter(|y| !y.trim().is_empty())
            .collect();
        years.into_iter().rev().collect()
    }
}
