//! Historical year selector for player pages

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::navigation::{PageTarget, Role};

/// Site-relative location of the year lookup
pub const LOOKUP_PATH: &str = "assets/year_page_lookup.json";

/// `year -> role -> person_key -> fragment path`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct YearPageLookup {
    pub years: BTreeMap<String, BTreeMap<String, BTreeMap<String, String>>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearOption {
    pub year: String,
    pub path: String,
}

/// Year choices for one player page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearSelector {
    pub page_id: String,
    /// Newest first
    pub options: Vec<YearOption>,
    /// Option whose fragment is the page's own file, if any
    pub current: Option<usize>,
}

impl YearSelector {
    pub fn option(&self, year: &str) -> Option<&YearOption> {
        self.options.iter().find(|o| o.year == year)
    }
}

impl YearPageLookup {
    pub fn path_for(&self, year: &str, role: Role, person_key: &str) -> Option<&str> {
        self.years
            .get(year)?
            .get(role.key())?
            .get(person_key)
            .map(String::as_str)
            .filter(|p| !p.trim().is_empty())
    }

    /// Every year with a fragment for `(role, person_key)`, newest first
    pub fn year_options(&self, role: Role, person_key: &str) -> Vec<YearOption> {
        self.years
            .keys()
            .rev()
            .filter_map(|year| {
                let path = self.path_for(year, role, person_key)?;
                Some(YearOption {
                    year: year.clone(),
                    path: path.to_string(),
                })
            })
            .collect()
    }

    /// Selector for a page, or None for non-player pages and players without history
    pub fn selector_for(&self, target: &PageTarget) -> Option<YearSelector> {
        let person = target.person.as_ref()?;
        let key = person.person_key.as_deref().filter(|k| !k.is_empty())?;
        let options = self.year_options(person.role, key);
        if options.is_empty() {
            return None;
        }
        let current = options.iter().position(|o| o.path == target.file);
        Some(YearSelector {
            page_id: target.id.clone(),
            options,
            current,
        })
    }
}
