//! Content pane loading: page activation, fragment injection and script revival

use tracing::{debug, info};

use crate::fragment::{Fragment, Script};
use crate::matchups::TOOL_MARKER;
use crate::navigation::{NavManifest, PageTarget};
use crate::session::Session;
use crate::store::{write_active_page, KeyValueStore};
use crate::years::{YearOption, YearSelector};

/// Placeholder shown while a page loads
pub const LOADING_TEXT: &str = "Loading…";

/// A page fragment placed in the content pane
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedPage {
    pub page_id: String,
    pub file: String,
    pub title: String,
    pub fragment: Fragment,
    pub year_selector: Option<YearSelector>,
    /// The markup hosts the matchup tool
    pub hosts_matchups: bool,
}

impl LoadedPage {
    pub fn text(&self) -> String {
        self.fragment.text()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ContentState {
    #[default]
    Empty,
    Loading {
        page_id: String,
    },
    Loaded(Box<LoadedPage>),
}

/// Work order for one load of the content pane
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    pub generation: u64,
    pub target: PageTarget,
}

/// The content pane and its load generation
#[derive(Debug, Default)]
pub struct ContentRoot {
    state: ContentState,
    generation: u64,
    committed: bool,
    active_page: Option<String>,
}

impl ContentRoot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ContentState {
        &self.state
    }

    pub fn loaded(&self) -> Option<&LoadedPage> {
        match &self.state {
            ContentState::Loaded(page) => Some(page.as_ref()),
            _ => None,
        }
    }

    pub fn active_page(&self) -> Option<&str> {
        self.active_page.as_deref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Activate a page by id: mark it active, persist it, and start loading
    ///
    /// Unknown ids and entries without a file leave everything untouched.
    pub fn activate(&mut self, nav: &NavManifest, store: &dyn KeyValueStore, page_id: &str) -> Option<LoadTicket> {
        let Some(target) = nav.find_page(page_id) else {
            debug!("LOADER: no loadable page {}", page_id);
            return None;
        };
        write_active_page(store, &target.id);
        Some(self.begin_load(target))
    }

    /// Load another year's fragment under the page's own id
    pub fn select_year(&mut self, option: &YearOption) -> Option<LoadTicket> {
        let page = self.loaded()?;
        let selector = page.year_selector.as_ref()?;
        if selector.option(&option.year).is_none() {
            return None;
        }
        let target = PageTarget {
            id: page.page_id.clone(),
            file: option.path.clone(),
            title: page.title.clone(),
            person: None,
        };
        Some(self.begin_load(target))
    }

    /// Clear the pane to the loading state and take a new generation
    pub fn begin_load(&mut self, target: PageTarget) -> LoadTicket {
        self.generation += 1;
        self.committed = false;
        self.active_page = Some(target.id.clone());
        self.state = ContentState::Loading {
            page_id: target.id.clone(),
        };
        LoadTicket {
            generation: self.generation,
            target,
        }
    }

    /// Inject a completed load
    ///
    /// Returns the scripts to revive the first time the current generation
    /// commits. Stale or repeated commits return None; a failed load leaves
    /// the pane empty.
    pub fn commit(&mut self, generation: u64, outcome: Option<LoadedPage>) -> Option<Vec<Script>> {
        if generation != self.generation || self.committed {
            debug!(
                "LOADER: dropping load for generation {} (current {})",
                generation, self.generation
            );
            return None;
        }
        self.committed = true;
        match outcome {
            Some(mut page) => {
                let scripts = std::mem::take(&mut page.fragment.scripts);
                self.state = ContentState::Loaded(Box::new(page));
                Some(scripts)
            }
            None => {
                self.state = ContentState::Empty;
                None
            }
        }
    }
}

/// Receiver of revived scripts
pub trait ScriptHost {
    fn run(&mut self, script: &Script);
}

/// Logs every revived script; no script engine is embedded
#[derive(Debug, Default)]
pub struct TracingScriptHost {
    pub revived: usize,
}

impl ScriptHost for TracingScriptHost {
    fn run(&mut self, script: &Script) {
        self.revived += 1;
        info!("SCRIPT: revived {}", script.summary());
    }
}

/// Keeps revived scripts in order
#[derive(Debug, Default)]
pub struct RecordingScriptHost {
    pub revived: Vec<Script>,
}

impl ScriptHost for RecordingScriptHost {
    fn run(&mut self, script: &Script) {
        self.revived.push(script.clone());
    }
}

/// Hand scripts to the host in order
pub fn revive(host: &mut dyn ScriptHost, scripts: &[Script]) {
    for script in scripts {
        host.run(script);
    }
}

/// Fetch (or reuse) the fragment for a ticket and post-process it
///
/// Post-processing attaches the year selector for player pages and flags
/// markup hosting the matchup tool. Failures yield None.
pub async fn fetch_page(session: &Session, target: &PageTarget) -> Option<LoadedPage> {
    let text = match session.cache().get_or_fetch(&target.file).await {
        Ok(text) => text,
        Err(e) => {
            debug!("LOADER: {} unavailable: {}", target.file, e);
            return None;
        }
    };
    let fragment = Fragment::parse(&text);
    let hosts_matchups = fragment.contains_marker(TOOL_MARKER);

    let person_target = match &target.person {
        Some(_) => Some(target.clone()),
        None => session.nav().await.and_then(|nav| {
            nav.find_page(&target.id)
                .filter(|t| t.person.is_some())
                .map(|t| PageTarget { file: target.file.clone(), ..t })
        }),
    };
    let year_selector = match (person_target, session.year_lookup().await) {
        (Some(t), Some(lookup)) => lookup.selector_for(&t),
        _ => None,
    };

    Some(LoadedPage {
        page_id: target.id.clone(),
        file: target.file.clone(),
        title: target.title.clone(),
        fragment,
        year_selector,
        hosts_matchups,
    })
}

/// Activate, load, commit and revive in one go, without prefetching
pub async fn load_into(
    session: &Session,
    root: &mut ContentRoot,
    page_id: &str,
    host: &mut dyn ScriptHost,
) -> bool {
    let Some(nav) = session.nav().await else {
        return false;
    };
    let Some(ticket) = root.activate(&nav, session.store(), page_id) else {
        return false;
    };
    let outcome = fetch_page(session, &ticket.target).await;
    let loaded = outcome.is_some();
    if let Some(scripts) = root.commit(ticket.generation, outcome) {
        revive(host, &scripts);
    }
    loaded
}
