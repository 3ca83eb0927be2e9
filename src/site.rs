/// Access to the generated static site, abstracting over a local directory,
/// a web server, and the in-memory mock used by tests
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

use crate::error::SiteError;

/// Trait for static site readers, implemented by LocalSite, HttpSite and MockSite
#[async_trait]
pub trait SiteSource: Send + Sync {
    /// Read a file, addressed by its site-relative path, as text
    async fn fetch_text(&self, path: &str) -> Result<String, SiteError>;

    /// Human readable description of where files come from
    fn describe(&self) -> String;
}

/// Normalize a site-relative path: no leading `./` or `/`
pub fn normalize_path(path: &str) -> &str {
    let path = path.trim();
    let path = path.strip_prefix("./").unwrap_or(path);
    path.trim_start_matches('/')
}

/// Site served from a directory on disk
pub struct LocalSite {
    root: PathBuf,
}

impl LocalSite {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl SiteSource for LocalSite {
    async fn fetch_text(&self, path: &str) -> Result<String, SiteError> {
        let rel = normalize_path(path);
        let full = self.root.join(rel);
        debug!("SITE: reading {}", full.display());
        match tokio::fs::read_to_string(&full).await {
            Ok(text) => Ok(text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(SiteError::NotFound { path: rel.to_string() })
            }
            Err(source) => Err(SiteError::Io { path: rel.to_string(), source }),
        }
    }

    fn describe(&self) -> String {
        self.root.display().to_string()
    }
}

/// Site served over HTTP from a base URL
pub struct HttpSite {
    client: reqwest::Client,
    base: String,
}

impl HttpSite {
    pub fn new(base: &str) -> Result<Self, SiteError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            base: base.trim_end_matches('/').to_string(),
        })
    }

    fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.base, normalize_path(path))
    }
}

#[async_trait]
impl SiteSource for HttpSite {
    async fn fetch_text(&self, path: &str) -> Result<String, SiteError> {
        let url = self.url_for(path);
        debug!("SITE: GET {}", url);
        let resp = self.client.get(&url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(SiteError::Status {
                path: normalize_path(path).to_string(),
                status: status.as_u16(),
            });
        }
        Ok(resp.text().await?)
    }

    fn describe(&self) -> String {
        self.base.clone()
    }
}

/// Pick the site implementation for a configured root
pub fn open_site(root: &str) -> Result<Arc<dyn SiteSource>, SiteError> {
    if root.starts_with("http://") || root.starts_with("https://") {
        Ok(Arc::new(HttpSite::new(root)?))
    } else {
        Ok(Arc::new(LocalSite::new(root)))
    }
}

/// Fetch a file and decode it as JSON
pub async fn fetch_json<T: serde::de::DeserializeOwned>(
    site: &dyn SiteSource,
    path: &str,
) -> Result<T, SiteError> {
    let text = site.fetch_text(path).await?;
    serde_json::from_str(&text).map_err(|source| SiteError::Json {
        path: normalize_path(path).to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn temp_site_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("pages")).unwrap();
        dir
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path("./pages/a.html"), "pages/a.html");
        assert_eq!(normalize_path("/pages/a.html"), "pages/a.html");
        assert_eq!(normalize_path(" pages/a.html "), "pages/a.html");
    }

    #[test]
    fn test_http_url_joining() {
        let site = HttpSite::new("https://example.org/dash/").unwrap();
        assert_eq!(site.url_for("./assets/nav.json"), "https://example.org/dash/assets/nav.json");
    }

    #[tokio::test]
    async fn test_local_site_reads_file() {
        let dir = temp_site_dir();
        std::fs::write(dir.path().join("pages/p1.html"), "<p>hi</p>").unwrap();

        let site = LocalSite::new(dir.path());
        assert_eq!(site.fetch_text("pages/p1.html").await.unwrap(), "<p>hi</p>");
    }

    #[tokio::test]
    async fn test_local_site_missing_file_is_not_found() {
        let dir = temp_site_dir();
        let site = LocalSite::new(dir.path());

        let err = site.fetch_text("pages/nope.html").await.unwrap_err();
        assert!(err.is_missing());
    }

    #[tokio::test]
    async fn test_fetch_json_reports_malformed_documents() {
        let dir = temp_site_dir();
        std::fs::write(dir.path().join("bad.json"), "{ not json").unwrap();
        let site = LocalSite::new(dir.path());

        let result: Result<serde_json::Value, _> = fetch_json(&site, "bad.json").await;
        assert!(matches!(result, Err(SiteError::Json { .. })));
    }

    #[test]
    fn test_open_site_picks_implementation() {
        assert_eq!(open_site("docs").unwrap().describe(), "docs");
        assert_eq!(
            open_site("https://example.org/dash").unwrap().describe(),
            "https://example.org/dash"
        );
    }
}
