//! Sidebar navigation manifest and page-id resolution

use serde::Deserialize;
use std::fmt;

use crate::store::{read_active_page, KeyValueStore};

/// Site-relative location of the navigation manifest
pub const NAV_PATH: &str = "assets/nav.json";

/// Role list a player belongs to within a team
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Batters,
    Pitchers,
}

impl Role {
    pub fn all() -> [Self; 2] {
        [Self::Batters, Self::Pitchers]
    }

    /// Key used by the manifest and the year lookup
    pub fn key(&self) -> &'static str {
        match self {
            Self::Batters => "batters",
            Self::Pitchers => "pitchers",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Batters => "Batters",
            Self::Pitchers => "Pitchers",
        }
    }

    pub fn toggle(&self) -> Self {
        match self {
            Self::Batters => Self::Pitchers,
            Self::Pitchers => Self::Batters,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NavManifest {
    #[serde(default)]
    pub pages: Vec<StaticPage>,
    #[serde(default)]
    pub divisions: Vec<Division>,
}

/// Top-level page outside the player tree (home, key, matchups)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StaticPage {
    pub id: String,
    #[serde(default)]
    pub file: String,
    #[serde(default)]
    pub title: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Division {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub teams: Vec<TeamEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TeamEntry {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub roles: Vec<RoleList>,
}

impl TeamEntry {
    pub fn role_list(&self, role: Role) -> Option<&RoleList> {
        self.roles.iter().find(|r| r.role == role)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RoleList {
    pub role: Role,
    #[serde(default)]
    pub items: Vec<NavItem>,
}

impl RoleList {
    pub fn players(&self) -> impl Iterator<Item = &PlayerEntry> {
        self.items.iter().filter_map(NavItem::player)
    }
}

/// Entry of a role list: a player link or a sub-role heading
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum NavItem {
    Player(PlayerEntry),
    Label { label: String },
}

impl NavItem {
    pub fn player(&self) -> Option<&PlayerEntry> {
        match self {
            Self::Player(p) => Some(p),
            Self::Label { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PlayerEntry {
    pub page: String,
    #[serde(default)]
    pub file: String,
    pub name: String,
    #[serde(default)]
    pub person_key: Option<String>,
    #[serde(default)]
    pub is_minors: bool,
    #[serde(default)]
    pub is_hurt: bool,
    #[serde(default)]
    pub is_susp: bool,
}

/// Where a player sits in the tree
#[derive(Debug, Clone, Copy)]
pub struct PlayerSlot<'a> {
    pub division: &'a Division,
    pub team: &'a TeamEntry,
    pub role: Role,
    pub entry: &'a PlayerEntry,
}

/// A loadable page resolved from the manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageTarget {
    pub id: String,
    pub file: String,
    pub title: String,
    pub person: Option<PersonRef>,
}

/// Player context of a page target, used by the year selector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonRef {
    pub role: Role,
    pub person_key: Option<String>,
    pub team: String,
}

impl PageTarget {
    fn for_player(slot: &PlayerSlot<'_>) -> Self {
        Self {
            id: slot.entry.page.clone(),
            file: slot.entry.file.clone(),
            title: slot.entry.name.clone(),
            person: Some(PersonRef {
                role: slot.role,
                person_key: slot.entry.person_key.clone(),
                team: slot.team.name.clone(),
            }),
        }
    }
}

impl NavManifest {
    /// Every player entry in tree order
    pub fn players(&self) -> impl Iterator<Item = PlayerSlot<'_>> {
        self.divisions.iter().flat_map(|division| {
            division.teams.iter().flat_map(move |team| {
                team.roles.iter().flat_map(move |list| {
                    list.players().map(move |entry| PlayerSlot {
                        division,
                        team,
                        role: list.role,
                        entry,
                    })
                })
            })
        })
    }

    /// Look up a page id; unknown ids and entries without a file yield None
    pub fn find_page(&self, page_id: &str) -> Option<PageTarget> {
        let target = self
            .pages
            .iter()
            .find(|p| p.id == page_id)
            .map(|p| PageTarget {
                id: p.id.clone(),
                file: p.file.clone(),
                title: p.title.clone(),
                person: None,
            })
            .or_else(|| {
                self.players()
                    .find(|slot| slot.entry.page == page_id)
                    .map(|slot| PageTarget::for_player(&slot))
            })?;
        (!target.file.trim().is_empty()).then_some(target)
    }

    /// Up to `count` loadable player pages following `page_id` in its role list
    pub fn siblings_after(&self, page_id: &str, count: usize) -> Vec<PageTarget> {
        for division in &self.divisions {
            for team in &division.teams {
                for list in &team.roles {
                    let players: Vec<&PlayerEntry> = list.players().collect();
                    let Some(pos) = players.iter().position(|p| p.page == page_id) else {
                        continue;
                    };
                    return players[pos + 1..]
                        .iter()
                        .copied()
                        .take(count)
                        .filter(|p| !p.file.trim().is_empty())
                        .map(|entry| {
                            PageTarget::for_player(&PlayerSlot {
                                division,
                                team,
                                role: list.role,
                                entry,
                            })
                        })
                        .collect();
                }
            }
        }
        Vec::new()
    }

    pub fn team(&self, team_id: &str) -> Option<&TeamEntry> {
        self.divisions
            .iter()
            .flat_map(|d| d.teams.iter())
            .find(|t| t.id == team_id)
    }
}

/// Page to show at startup: URL fragment, then the persisted page, then `fallback`
pub fn default_page_id(hash: Option<&str>, store: &dyn KeyValueStore, fallback: &str) -> String {
    let raw = hash.map(|h| h.strip_prefix('#').unwrap_or(h)).unwrap_or("");
    if !raw.is_empty() {
        return match urlencoding::decode(raw) {
            Ok(decoded) => decoded.into_owned(),
            Err(_) => raw.to_string(),
        };
    }
    read_active_page(store).unwrap_or_else(|| fallback.to_string())
}

/// URL fragment addressing a page
pub fn page_hash(page_id: &str) -> String {
    format!("#{}", urlencoding::encode(page_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::create_mock_nav;
    use crate::store::{write_active_page, MemoryStore};

    #[test]
    fn test_manifest_items_parse_as_players_and_labels() {
        let nav = create_mock_nav();
        let red_hawks = nav.team("RedHawks").unwrap();
        let batters = red_hawks.role_list(Role::Batters).unwrap();
        assert_eq!(batters.items[0], NavItem::Label { label: "Catchers".to_string() });
        let first = batters.items[1].player().unwrap();
        assert_eq!(first.name, "Al Smith");
        assert!(first.is_minors);
        assert!(!first.is_hurt);
    }

    #[test]
    fn test_find_page_static_and_player() {
        let nav = create_mock_nav();
        let home = nav.find_page("home").unwrap();
        assert_eq!(home.file, "pages/home.html");
        assert!(home.person.is_none());

        let jane = nav.find_page("p_jane_doe").unwrap();
        assert_eq!(jane.title, "Jane Doe");
        let person = jane.person.unwrap();
        assert_eq!(person.role, Role::Pitchers);
        assert_eq!(person.person_key.as_deref(), Some("jane_doe"));
        assert_eq!(person.team, "RedHawks");
    }

    #[test]
    fn test_unknown_page_and_missing_file_do_nothing() {
        let nav = create_mock_nav();
        assert!(nav.find_page("p_nobody").is_none());
        assert!(nav.find_page("p_gus_hale").is_none());
    }

    #[test]
    fn test_siblings_skip_labels_and_stop_at_list_end() {
        let nav = create_mock_nav();
        let ids: Vec<String> = nav.siblings_after("p_al_smith", 2).into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec!["p_bob_zant", "p_cy_young"]);
        assert!(nav.siblings_after("p_cy_young", 2).is_empty());
        assert!(nav.siblings_after("home", 2).is_empty());
    }

    #[test]
    fn test_players_in_tree_order() {
        let nav = create_mock_nav();
        let names: Vec<&str> = nav.players().map(|s| s.entry.name.as_str()).collect();
        assert_eq!(names.first(), Some(&"Al Smith"));
        assert_eq!(names.last(), Some(&"Finn Lowe"));
    }

    #[test]
    fn test_default_page_id_precedence() {
        let store = MemoryStore::new();
        assert_eq!(default_page_id(None, &store, "home"), "home");

        write_active_page(&store, "p_jane_doe");
        assert_eq!(default_page_id(None, &store, "home"), "p_jane_doe");
        assert_eq!(default_page_id(Some("#"), &store, "home"), "p_jane_doe");
        assert_eq!(default_page_id(Some("#p_al%20smith"), &store, "home"), "p_al smith");
        assert_eq!(default_page_id(Some("key"), &store, "home"), "key");
    }

    #[test]
    fn test_default_page_id_with_unavailable_store() {
        let store = MemoryStore::unavailable();
        assert_eq!(default_page_id(Some(""), &store, "home"), "home");
    }

    #[test]
    fn test_page_hash_round_trip() {
        let store = MemoryStore::new();
        let hash = page_hash("p_al smith");
        assert_eq!(hash, "#p_al%20smith");
        assert_eq!(default_page_id(Some(&hash), &store, "home"), "p_al smith");
    }
}
