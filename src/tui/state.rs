use std::sync::Arc;

use chrono::{DateTime, Local};

use crate::cache::CacheStats;
use crate::config::Config;
use crate::loader::ContentRoot;
use crate::matchups::{FragmentIndex, MatchupMode, MatchupTool, OptionsResolver};
use crate::navigation::NavManifest;
use crate::search::{SidebarRow, SidebarView};

/// Pane receiving navigation keys
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Focus {
    #[default]
    Sidebar,
    Content,
    Matchups,
}

#[derive(Debug, Clone, Default)]
pub struct SearchInput {
    /// Keys go to the query instead of the panes
    pub editing: bool,
    pub query: String,
}

/// Matchup tool hosted by the loaded page
#[derive(Debug, Clone)]
pub struct MatchupPanel {
    pub tool: MatchupTool,
    /// 0 is the mode, 1 the year, then one per dropdown
    pub field: usize,
}

/// Leading fields of the panel before the dropdowns
pub const PANEL_FIXED_FIELDS: usize = 2;

impl MatchupPanel {
    pub fn new(options: &OptionsResolver) -> Self {
        Self {
            tool: MatchupTool::new(MatchupMode::SpVsTeam, options),
            field: 0,
        }
    }

    pub fn field_count(&self) -> usize {
        PANEL_FIXED_FIELDS + self.tool.form().fields().len()
    }

    pub fn dropdown(&self) -> Option<usize> {
        self.field.checked_sub(PANEL_FIXED_FIELDS)
    }
}

#[derive(Debug, Default)]
pub struct AppState {
    pub config: Config,
    pub focus: Focus,

    pub nav: Option<Arc<NavManifest>>,
    pub index: Option<Arc<FragmentIndex>>,
    pub options: Option<Arc<OptionsResolver>>,

    pub sidebar: Option<SidebarView>,
    pub sidebar_cursor: usize,
    pub search: SearchInput,

    pub content: ContentRoot,
    pub content_scroll: u16,
    pub matchups: Option<MatchupPanel>,

    pub status: Option<String>,
    pub loaded_at: Option<DateTime<Local>>,
    pub cache: Option<CacheStats>,
    pub revived_scripts: usize,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Drawable sidebar rows; empty until the manifest loads
    pub fn sidebar_rows(&self) -> Vec<SidebarRow> {
        self.sidebar.as_ref().map(SidebarView::rows).unwrap_or_default()
    }

    pub fn cursor_row(&self) -> Option<SidebarRow> {
        self.sidebar_rows().get(self.sidebar_cursor).copied()
    }

    /// Keep the cursor on an existing row after the tree changed shape
    pub fn clamp_cursor(&mut self) {
        let count = self.sidebar_rows().len();
        self.sidebar_cursor = self.sidebar_cursor.min(count.saturating_sub(1));
    }
}
