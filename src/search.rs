//! Sidebar view-model: search, filters, collapse state and role tabs
//!
//! The view holds every piece of sidebar UI state; the terminal renders a
//! projection of it (see [`SidebarView::rows`]) and never reads state back
//! from what it drew.

use tracing::debug;

use crate::navigation::{NavItem, NavManifest, Role};
use crate::store::{read_collapsed, write_collapsed, EntityKind, KeyValueStore};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Filters {
    pub hide_minors: bool,
    /// Hides injured and suspended players
    pub hide_hurt: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerRow {
    pub page: String,
    pub name: String,
    name_key: String,
    pub is_minors: bool,
    pub is_hurt: bool,
    pub is_susp: bool,
    pub visible: bool,
}

impl PlayerRow {
    fn matches(&self, query: &str, filters: Filters) -> bool {
        if !query.is_empty() && !self.name_key.contains(query) {
            return false;
        }
        if filters.hide_minors && self.is_minors {
            return false;
        }
        if filters.hide_hurt && (self.is_hurt || self.is_susp) {
            return false;
        }
        true
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListRow {
    Label { label: String, visible: bool },
    Player(PlayerRow),
}

impl ListRow {
    pub fn is_visible(&self) -> bool {
        match self {
            Self::Label { visible, .. } => *visible,
            Self::Player(p) => p.visible,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleView {
    pub role: Role,
    pub visible: bool,
    pub rows: Vec<ListRow>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamView {
    pub id: String,
    pub name: String,
    pub collapsed: bool,
    pub visible: bool,
    pub active_role: Role,
    prev_collapsed: Option<bool>,
    pub roles: Vec<RoleView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DivisionView {
    pub id: String,
    pub name: String,
    pub collapsed: bool,
    pub visible: bool,
    prev_collapsed: Option<bool>,
    pub teams: Vec<TeamView>,
}

/// One drawable line of the sidebar, addressed by indices into the view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SidebarRow {
    Division { division: usize },
    Team { division: usize, team: usize },
    /// Role tab strip, shown outside search
    Tabs { division: usize, team: usize },
    /// Role heading, shown during search when every list is open
    Role { division: usize, team: usize, role: usize },
    Label { division: usize, team: usize, role: usize, row: usize },
    Player { division: usize, team: usize, role: usize, row: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidebarView {
    divisions: Vec<DivisionView>,
    query: String,
    searching: bool,
    filters: Filters,
}

impl SidebarView {
    /// Build the view from the manifest with persisted collapse state
    pub fn new(nav: &NavManifest, store: &dyn KeyValueStore) -> Self {
        let divisions = nav
            .divisions
            .iter()
            .map(|division| DivisionView {
                id: division.id.clone(),
                name: division.name.clone(),
                collapsed: read_collapsed(store, EntityKind::Division, &division.id),
                visible: true,
                prev_collapsed: None,
                teams: division
                    .teams
                    .iter()
                    .map(|team| TeamView {
                        id: team.id.clone(),
                        name: team.name.clone(),
                        collapsed: read_collapsed(store, EntityKind::Team, &team.id),
                        visible: true,
                        active_role: Role::Batters,
                        prev_collapsed: None,
                        roles: team
                            .roles
                            .iter()
                            .map(|list| RoleView {
                                role: list.role,
                                visible: true,
                                rows: list.items.iter().map(list_row).collect(),
                            })
                            .collect(),
                    })
                    .collect(),
            })
            .collect();

        let mut view = Self {
            divisions,
            query: String::new(),
            searching: false,
            filters: Filters::default(),
        };
        view.refresh_visibility();
        view
    }

    pub fn divisions(&self) -> &[DivisionView] {
        &self.divisions
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn is_searching(&self) -> bool {
        self.searching
    }

    pub fn filters(&self) -> Filters {
        self.filters
    }

    pub fn team(&self, team_id: &str) -> Option<&TeamView> {
        self.divisions
            .iter()
            .flat_map(|d| d.teams.iter())
            .find(|t| t.id == team_id)
    }

    pub fn division(&self, division_id: &str) -> Option<&DivisionView> {
        self.divisions.iter().find(|d| d.id == division_id)
    }

    fn team_mut(&mut self, team_id: &str) -> Option<&mut TeamView> {
        self.divisions
            .iter_mut()
            .flat_map(|d| d.teams.iter_mut())
            .find(|t| t.id == team_id)
    }

    /// Apply a search query with the current filters
    ///
    /// A non-empty query opens every team and division, remembering their
    /// prior state; clearing it restores that state, or the persisted one
    /// when nothing was remembered.
    pub fn apply_search_and_filters(&mut self, query: &str, store: &dyn KeyValueStore) {
        let query = query.trim().to_lowercase();
        let searching = !query.is_empty();
        let was_searching = self.searching;
        self.searching = searching;

        if searching && !was_searching {
            self.enter_search_mode();
        } else if !searching && was_searching {
            self.leave_search_mode(store);
        }
        self.query = query;
        self.refresh_visibility();
    }

    pub fn set_filters(&mut self, filters: Filters, store: &dyn KeyValueStore) {
        self.filters = filters;
        let query = self.query.clone();
        self.apply_search_and_filters(&query, store);
    }

    fn enter_search_mode(&mut self) {
        debug!("SIDEBAR: entering search mode");
        for division in &mut self.divisions {
            division.prev_collapsed.get_or_insert(division.collapsed);
            division.collapsed = false;
            for team in &mut division.teams {
                team.prev_collapsed.get_or_insert(team.collapsed);
                team.collapsed = false;
            }
        }
    }

    fn leave_search_mode(&mut self, store: &dyn KeyValueStore) {
        debug!("SIDEBAR: leaving search mode");
        for division in &mut self.divisions {
            division.collapsed = division
                .prev_collapsed
                .take()
                .unwrap_or_else(|| read_collapsed(store, EntityKind::Division, &division.id));
            for team in &mut division.teams {
                team.collapsed = team
                    .prev_collapsed
                    .take()
                    .unwrap_or_else(|| read_collapsed(store, EntityKind::Team, &team.id));
            }
        }
    }

    fn refresh_visibility(&mut self) {
        let query = self.query.as_str();
        let filters = self.filters;
        let searching = self.searching;

        for division in &mut self.divisions {
            for team in &mut division.teams {
                let mut any_visible_in_team = false;
                for list in &mut team.roles {
                    for row in &mut list.rows {
                        if let ListRow::Player(player) = row {
                            player.visible = player.matches(query, filters);
                            any_visible_in_team |= player.visible;
                        }
                    }
                }
                for list in &mut team.roles {
                    let hidden_by_tab = !searching && list.role != team.active_role;
                    cleanup_role_list(list, hidden_by_tab);
                }
                team.visible = any_visible_in_team;
            }
            division.visible = division.teams.iter().any(|t| t.visible);
        }
    }

    /// Persist and apply a team's collapse flag
    ///
    /// Expanding a team outside search resets it to the batters tab.
    pub fn set_team_collapsed(&mut self, team_id: &str, collapsed: bool, store: &dyn KeyValueStore) {
        let searching = self.searching;
        let Some(team) = self.team_mut(team_id) else {
            return;
        };
        write_collapsed(store, EntityKind::Team, team_id, collapsed);
        team.collapsed = collapsed;
        if !collapsed && !searching {
            self.set_team_role_tab(team_id, Role::Batters, store);
        }
    }

    pub fn toggle_team(&mut self, team_id: &str, store: &dyn KeyValueStore) {
        if let Some(collapsed) = self.team(team_id).map(|t| t.collapsed) {
            self.set_team_collapsed(team_id, !collapsed, store);
        }
    }

    pub fn set_division_collapsed(&mut self, division_id: &str, collapsed: bool, store: &dyn KeyValueStore) {
        let Some(division) = self.divisions.iter_mut().find(|d| d.id == division_id) else {
            return;
        };
        write_collapsed(store, EntityKind::Division, division_id, collapsed);
        division.collapsed = collapsed;
    }

    pub fn toggle_division(&mut self, division_id: &str, store: &dyn KeyValueStore) {
        if let Some(collapsed) = self.division(division_id).map(|d| d.collapsed) {
            self.set_division_collapsed(division_id, !collapsed, store);
        }
    }

    /// Switch a team's role tab and re-apply the current search
    pub fn set_team_role_tab(&mut self, team_id: &str, role: Role, store: &dyn KeyValueStore) {
        let Some(team) = self.team_mut(team_id) else {
            return;
        };
        team.active_role = role;
        let query = self.query.clone();
        self.apply_search_and_filters(&query, store);
    }

    /// Drawable rows in order, honouring visibility, collapse and tabs
    pub fn rows(&self) -> Vec<SidebarRow> {
        let mut rows = Vec::new();
        for (d, division) in self.divisions.iter().enumerate() {
            if !division.visible {
                continue;
            }
            rows.push(SidebarRow::Division { division: d });
            if division.collapsed {
                continue;
            }
            for (t, team) in division.teams.iter().enumerate() {
                if !team.visible {
                    continue;
                }
                rows.push(SidebarRow::Team { division: d, team: t });
                if team.collapsed {
                    continue;
                }
                if !self.searching {
                    rows.push(SidebarRow::Tabs { division: d, team: t });
                }
                for (r, list) in team.roles.iter().enumerate() {
                    if !list.visible {
                        continue;
                    }
                    if self.searching {
                        rows.push(SidebarRow::Role { division: d, team: t, role: r });
                    }
                    for (i, row) in list.rows.iter().enumerate() {
                        if !row.is_visible() {
                            continue;
                        }
                        rows.push(match row {
                            ListRow::Label { .. } => SidebarRow::Label { division: d, team: t, role: r, row: i },
                            ListRow::Player(_) => SidebarRow::Player { division: d, team: t, role: r, row: i },
                        });
                    }
                }
            }
        }
        rows
    }

    /// Player behind a drawable row, if it is a player row
    pub fn player_at(&self, row: SidebarRow) -> Option<&PlayerRow> {
        let SidebarRow::Player { division, team, role, row } = row else {
            return None;
        };
        match self.divisions.get(division)?.teams.get(team)?.roles.get(role)?.rows.get(row)? {
            ListRow::Player(player) => Some(player),
            ListRow::Label { .. } => None,
        }
    }

    /// Visible player names, in tree order
    pub fn visible_players(&self) -> Vec<&PlayerRow> {
        self.divisions
            .iter()
            .filter(|d| d.visible)
            .flat_map(|d| d.teams.iter().filter(|t| t.visible))
            .flat_map(|t| t.roles.iter().filter(|r| r.visible))
            .flat_map(|r| r.rows.iter())
            .filter_map(|row| match row {
                ListRow::Player(p) if p.visible => Some(p),
                _ => None,
            })
            .collect()
    }
}

fn list_row(item: &NavItem) -> ListRow {
    match item {
        NavItem::Label { label } => ListRow::Label {
            label: label.clone(),
            visible: true,
        },
        NavItem::Player(entry) => ListRow::Player(PlayerRow {
            page: entry.page.clone(),
            name: entry.name.clone(),
            name_key: entry.name.to_lowercase(),
            is_minors: entry.is_minors,
            is_hurt: entry.is_hurt,
            is_susp: entry.is_susp,
            visible: true,
        }),
    }
}

/// Show a role list only when it has a visible player, and each sub-label
/// only when its section does
fn cleanup_role_list(list: &mut RoleView, hidden_by_tab: bool) {
    if hidden_by_tab {
        list.visible = false;
        return;
    }
    let any_player_visible = list
        .rows
        .iter()
        .any(|row| matches!(row, ListRow::Player(p) if p.visible));
    list.visible = any_player_visible;

    for i in 0..list.rows.len() {
        if !matches!(list.rows[i], ListRow::Label { .. }) {
            continue;
        }
        let section_visible = list.rows[i + 1..]
            .iter()
            .take_while(|row| !matches!(row, ListRow::Label { .. }))
            .any(ListRow::is_visible);
        if let ListRow::Label { visible, .. } = &mut list.rows[i] {
            *visible = any_player_visible && section_visible;
        }
    }
}
