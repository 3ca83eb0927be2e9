use std::sync::Arc;

use crate::cache::CacheStats;
use crate::loader::LoadedPage;
use crate::matchups::{FragmentIndex, OptionsResolver, RenderedMatchup};
use crate::navigation::NavManifest;

/// Session documents the browser needs before it can show anything
#[derive(Clone)]
pub struct Documents {
    pub nav: Option<Arc<NavManifest>>,
    pub index: Option<Arc<FragmentIndex>>,
    pub options: Arc<OptionsResolver>,
}

impl std::fmt::Debug for Documents {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Documents")
            .field("nav", &self.nav.is_some())
            .field("index", &self.index.is_some())
            .finish()
    }
}

/// Global actions
///
/// All state changes happen through actions, dispatched from key events or
/// from completed effects.
#[derive(Debug, Clone)]
pub enum Action {
    Quit,
    Init,
    DocumentsLoaded(Documents),

    FocusNext,

    // Sidebar
    SidebarMove(isize),
    SidebarActivate,
    SidebarSwitchTab,
    ToggleHideMinors,
    ToggleHideHurt,

    // Search box
    StartSearch,
    SearchInput(char),
    SearchBackspace,
    SearchSubmit,
    SearchCancel,

    // Content pane
    OpenPage(String),
    OpenStaticPage(usize),
    PageLoaded {
        generation: u64,
        page: Option<Box<LoadedPage>>,
        cache: CacheStats,
    },
    Prefetched(String),
    ScrollContent(i32),
    /// Step through the year selector; positive steps go back in time
    StepYear(isize),

    // Matchup tool
    MatchupField(isize),
    MatchupValue(isize),
    MatchupClear,
    MatchupsRendered {
        generation: u64,
        rendered: Vec<RenderedMatchup>,
    },
}
