/// In-memory static site for development and testing
use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Mutex;
use std::time::Duration;
use tracing::info;

use crate::error::SiteError;
use crate::fixtures;
use crate::site::{normalize_path, SiteSource};

/// Mock site that serves fixture files instead of reading disk or network
#[derive(Default)]
pub struct MockSite {
    files: BTreeMap<String, String>,
    failing: BTreeSet<String>,
    latency: Option<Duration>,
    fetches: Mutex<BTreeMap<String, usize>>,
}

impl MockSite {
    /// Create a mock site populated with the fixture files
    pub fn new() -> Self {
        info!("Creating MockSite for development mode");
        let mut site = Self::empty();
        for (path, body) in fixtures::mock_site_files() {
            site.files.insert(path, body);
        }
        site
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: &str, body: &str) -> Self {
        self.files.insert(normalize_path(path).to_string(), body.to_string());
        self
    }

    pub fn without_file(mut self, path: &str) -> Self {
        self.files.remove(normalize_path(path));
        self
    }

    /// Make fetches of `path` fail with HTTP 500
    pub fn with_failure(mut self, path: &str) -> Self {
        self.failing.insert(normalize_path(path).to_string());
        self
    }

    /// Delay every fetch, so concurrent requests overlap
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Number of fetches issued for `path`, including failed ones
    pub fn fetch_count(&self, path: &str) -> usize {
        self.fetches
            .lock()
            .map(|f| f.get(normalize_path(path)).copied().unwrap_or(0))
            .unwrap_or(0)
    }

    pub fn total_fetches(&self) -> usize {
        self.fetches.lock().map(|f| f.values().sum()).unwrap_or(0)
    }
}

#[async_trait]
impl SiteSource for MockSite {
    async fn fetch_text(&self, path: &str) -> Result<String, SiteError> {
        let path = normalize_path(path);
        if let Ok(mut fetches) = self.fetches.lock() {
            *fetches.entry(path.to_string()).or_insert(0) += 1;
        }
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        if self.failing.contains(path) {
            info!("MockSite: Failing fetch of {}", path);
            return Err(SiteError::Status {
                path: path.to_string(),
                status: 500,
            });
        }
        match self.files.get(path) {
            Some(body) => {
                info!("MockSite: Returning mock file {}", path);
                Ok(body.clone())
            }
            None => Err(SiteError::NotFound {
                path: path.to_string(),
            }),
        }
    }

    fn describe(&self) -> String {
        format!("mock site ({} files)", self.files.len())
    }
}
