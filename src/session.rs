//! Session context: the site, the page cache, the durable store and the
//! lazily loaded documents, shared as `Arc<Session>` for one browsing session

use std::sync::Arc;

use serde::de::DeserializeOwned;
use tokio::sync::OnceCell;
use tracing::{debug, warn};

use crate::cache::PageCache;
use crate::config::{Config, DEFAULT_PAGE_ID, DEFAULT_PREFETCH_AHEAD};
use crate::error::SiteError;
use crate::matchups::{FragmentIndex, MatchupLists, OptionsResolver, INDEX_PATH, LISTS_PATH};
use crate::navigation::{NavManifest, NAV_PATH};
use crate::site::{fetch_json, open_site, SiteSource};
use crate::store::{FileStore, KeyValueStore, MemoryStore};
use crate::years::{YearPageLookup, LOOKUP_PATH};

/// A document loaded at most once; a failed load stays unavailable
type Document<T> = OnceCell<Option<Arc<T>>>;

pub struct Session {
    site: Arc<dyn SiteSource>,
    cache: PageCache,
    store: Arc<dyn KeyValueStore>,
    index: Document<FragmentIndex>,
    lists: Document<MatchupLists>,
    lookup: Document<YearPageLookup>,
    nav: Document<NavManifest>,
    options: OnceCell<Arc<OptionsResolver>>,
    prefetch_ahead: usize,
    default_page: String,
}

impl Session {
    pub fn new(site: Arc<dyn SiteSource>, store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            cache: PageCache::new(site.clone()),
            site,
            store,
            index: OnceCell::new(),
            lists: OnceCell::new(),
            lookup: OnceCell::new(),
            nav: OnceCell::new(),
            options: OnceCell::new(),
            prefetch_ahead: DEFAULT_PREFETCH_AHEAD,
            default_page: DEFAULT_PAGE_ID.to_string(),
        }
    }

    pub fn with_prefetch_ahead(mut self, count: usize) -> Self {
        self.prefetch_ahead = count;
        self
    }

    pub fn with_default_page(mut self, page_id: &str) -> Self {
        self.default_page = page_id.to_string();
        self
    }

    /// Build a session from the effective configuration
    pub fn from_config(config: &Config) -> Result<Arc<Self>, SiteError> {
        let site = open_site(&config.site_root)?;
        let store: Arc<dyn KeyValueStore> = match config.state_path() {
            Some(path) => Arc::new(FileStore::open(path)),
            None => {
                debug!("SESSION: no state directory, collapse state lives in memory");
                Arc::new(MemoryStore::new())
            }
        };
        let session = Self::new(site, store)
            .with_prefetch_ahead(config.prefetch_ahead)
            .with_default_page(&config.default_page);
        Ok(Arc::new(session))
    }

    pub fn site(&self) -> &Arc<dyn SiteSource> {
        &self.site
    }

    pub fn cache(&self) -> &PageCache {
        &self.cache
    }

    pub fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }

    pub fn prefetch_ahead(&self) -> usize {
        self.prefetch_ahead
    }

    pub fn default_page(&self) -> &str {
        &self.default_page
    }

    async fn document<T>(&self, cell: &Document<T>, path: &str) -> Option<Arc<T>>
    where
        T: DeserializeOwned + Send + Sync,
    {
        cell.get_or_init(|| async {
            match fetch_json::<T>(self.site.as_ref(), path).await {
                Ok(doc) => {
                    debug!("SESSION: loaded {}", path);
                    Some(Arc::new(doc))
                }
                Err(e) if e.is_missing() => {
                    debug!("SESSION: {} not present, feature unavailable", path);
                    None
                }
                Err(e) => {
                    warn!("SESSION: {} unavailable for this session: {}", path, e);
                    None
                }
            }
        })
        .await
        .clone()
    }

    pub async fn index(&self) -> Option<Arc<FragmentIndex>> {
        self.document(&self.index, INDEX_PATH).await
    }

    pub async fn lists(&self) -> Option<Arc<MatchupLists>> {
        self.document(&self.lists, LISTS_PATH).await
    }

    pub async fn year_lookup(&self) -> Option<Arc<YearPageLookup>> {
        self.document(&self.lookup, LOOKUP_PATH).await
    }

    pub async fn nav(&self) -> Option<Arc<NavManifest>> {
        self.document(&self.nav, NAV_PATH).await
    }

    /// Dropdown resolver over whichever matchup documents loaded
    pub async fn options(&self) -> Arc<OptionsResolver> {
        self.options
            .get_or_init(|| async {
                let (lists, index) = tokio::join!(self.lists(), self.index());
                Arc::new(OptionsResolver::new(lists, index))
            })
            .await
            .clone()
    }

    /// Warm the cache with the pages following `page_id` in its role list
    pub async fn prefetch_siblings(&self, page_id: &str) {
        let Some(nav) = self.nav().await else {
            return;
        };
        let files: Vec<String> = nav
            .siblings_after(page_id, self.prefetch_ahead)
            .into_iter()
            .map(|t| t.file)
            .collect();
        if !files.is_empty() {
            debug!("SESSION: prefetching {:?}", files);
            self.cache.prefetch(&files).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dev::mock_site::MockSite;
    use crate::loader::RecordingScriptHost;
    use crate::matchups::{MatchupMode, MatchupTool, Update};
    use crate::matchups::tool::fetch_ticket;

    fn session_with(site: Arc<MockSite>) -> Session {
        Session::new(site, Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn test_documents_load_at_most_once() {
        let site = Arc::new(MockSite::new());
        let session = session_with(site.clone());

        assert!(session.index().await.is_some());
        assert!(session.index().await.is_some());
        session.options().await;
        assert_eq!(site.fetch_count(INDEX_PATH), 1);
        assert_eq!(site.fetch_count(LISTS_PATH), 1);
    }

    #[tokio::test]
    async fn test_failed_document_stays_unavailable() {
        let site = Arc::new(MockSite::new().with_failure(LISTS_PATH));
        let session = session_with(site.clone());

        assert!(session.lists().await.is_none());
        assert!(session.lists().await.is_none());
        assert_eq!(site.fetch_count(LISTS_PATH), 1);

        // Options fall back to the index scan
        let options = session.options().await;
        assert_eq!(options.years(), vec!["2024".to_string(), "2023".to_string()]);
    }

    #[tokio::test]
    async fn test_malformed_document_is_unavailable() {
        let site = Arc::new(MockSite::new().with_file(LOOKUP_PATH, "{ nope"));
        let session = session_with(site);
        assert!(session.year_lookup().await.is_none());
    }

    #[tokio::test]
    async fn test_end_to_end_matchup_renders_frag_001_once() {
        let site = Arc::new(MockSite::new());
        let session = session_with(site.clone());
        let index = session.index().await.unwrap();
        let options = session.options().await;
        let mut tool = MatchupTool::new(MatchupMode::SpVsTeam, &options);
        let mut host = RecordingScriptHost::default();

        let mut update = Update::Cleared;
        for (position, key) in ["Jane Doe", "vs.", "RedHawks"].iter().enumerate() {
            update = tool.set_key(0, position, Some(key), Some(&index));
        }
        let Update::Render(ticket) = update else {
            panic!("expected a render");
        };
        let rendered = fetch_ticket(session.cache(), &ticket).await;
        if let Some(scripts) = tool.commit(ticket.generation, rendered.clone()) {
            crate::loader::revive(&mut host, &scripts);
        }
        if let Some(scripts) = tool.commit(ticket.generation, rendered) {
            crate::loader::revive(&mut host, &scripts);
        }

        assert_eq!(site.fetch_count("frag_001.html"), 1);
        assert_eq!(tool.rendered().len(), 1);
        assert!(tool.rendered()[0].fragment.markup.contains("Jane Doe vs. RedHawks"));
        assert_eq!(host.revived.len(), 1);
        assert!(host.revived[0].text.contains("Plotly.newPlot"));
    }

    #[tokio::test]
    async fn test_end_to_end_bluejays_fetches_nothing() {
        let site = Arc::new(MockSite::new());
        let session = session_with(site.clone());
        let index = session.index().await.unwrap();
        let options = session.options().await;
        let mut tool = MatchupTool::new(MatchupMode::SpVsTeam, &options);
        let fetched_before = site.total_fetches();

        tool.set_key(0, 0, Some("Jane Doe"), Some(&index));
        tool.set_key(0, 1, Some("vs."), Some(&index));
        assert_eq!(tool.set_key(0, 2, Some("BlueJays"), Some(&index)), Update::Rejected);
        assert_eq!(index.resolve(MatchupMode::SpVsTeam, "2024", &["Jane Doe", "vs.", "BlueJays"]), None);

        assert_eq!(site.total_fetches(), fetched_before);
        assert!(tool.rendered().is_empty());
    }

    #[tokio::test]
    async fn test_prefetch_warms_next_two_siblings() {
        let site = Arc::new(MockSite::new());
        let session = session_with(site.clone());

        session.prefetch_siblings("p_al_smith").await;
        assert!(session.cache().contains("pages/bob_zant.html").await);
        assert!(session.cache().contains("pages/cy_young.html").await);
        assert_eq!(site.fetch_count("pages/jane_doe.html"), 0);
    }

    #[tokio::test]
    async fn test_prefetch_count_is_configurable() {
        let site = Arc::new(MockSite::new());
        let session = session_with(site.clone()).with_prefetch_ahead(1);

        session.prefetch_siblings("p_al_smith").await;
        assert!(session.cache().contains("pages/bob_zant.html").await);
        assert_eq!(site.fetch_count("pages/cy_young.html"), 0);
    }
}
