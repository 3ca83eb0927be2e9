//! Durable key-value store for UI state (collapse flags, last active page)
//!
//! Storage is best effort: every helper here falls back to the default value
//! when the store cannot be read, and drops writes it cannot persist.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::debug;

use crate::error::StoreError;

/// Key holding the id of the last page loaded into the content pane
pub const ACTIVE_PAGE_KEY: &str = "mlb_dash_active_page";

const TEAM_KEY_PREFIX: &str = "mlb_dash_team_open__";
const DIVISION_KEY_PREFIX: &str = "mlb_dash_div_open__";

pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// In-process store; `unavailable()` builds one that fails every call
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<BTreeMap<String, String>>,
    unavailable: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn unavailable() -> Self {
        Self {
            values: Mutex::new(BTreeMap::new()),
            unavailable: true,
        }
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        if self.unavailable {
            return Err(StoreError::Unavailable);
        }
        let values = self.values.lock().map_err(|_| StoreError::Unavailable)?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        if self.unavailable {
            return Err(StoreError::Unavailable);
        }
        let mut values = self.values.lock().map_err(|_| StoreError::Unavailable)?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// JSON object of string keys to string values, rewritten on every set
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    values: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
    /// Open the store at `path`; a missing or malformed file starts empty
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = match Self::load(&path) {
            Ok(values) => values,
            Err(e) => {
                debug!("STORE: starting empty, could not load {}: {}", path.display(), e);
                BTreeMap::new()
            }
        };
        Self {
            path,
            values: Mutex::new(values),
        }
    }

    fn load(path: &Path) -> Result<BTreeMap<String, String>, StoreError> {
        if !path.exists() {
            return Ok(BTreeMap::new());
        }
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let values = self.values.lock().map_err(|_| StoreError::Unavailable)?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut values = self.values.lock().map_err(|_| StoreError::Unavailable)?;
        values.insert(key.to_string(), value.to_string());
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(&*values)?)?;
        Ok(())
    }
}

/// Collapsible sidebar entities and their defaults
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Team,
    Division,
}

impl EntityKind {
    /// Teams start collapsed, divisions start open
    pub fn default_collapsed(&self) -> bool {
        matches!(self, Self::Team)
    }

    fn key_prefix(&self) -> &'static str {
        match self {
            Self::Team => TEAM_KEY_PREFIX,
            Self::Division => DIVISION_KEY_PREFIX,
        }
    }
}

pub fn storage_key(kind: EntityKind, id: &str) -> String {
    format!("{}{}", kind.key_prefix(), id)
}

/// Persisted collapse flag, or the entity's default when unknown or unreadable
pub fn read_collapsed(store: &dyn KeyValueStore, kind: EntityKind, id: &str) -> bool {
    match store.get(&storage_key(kind, id)) {
        Ok(Some(v)) if v == "1" => true,
        Ok(Some(v)) if v == "0" => false,
        Ok(_) => kind.default_collapsed(),
        Err(e) => {
            debug!("STORE: read of {:?} {} failed: {}", kind, id, e);
            kind.default_collapsed()
        }
    }
}

pub fn write_collapsed(store: &dyn KeyValueStore, kind: EntityKind, id: &str, collapsed: bool) {
    let value = if collapsed { "1" } else { "0" };
    if let Err(e) = store.set(&storage_key(kind, id), value) {
        debug!("STORE: write of {:?} {} failed: {}", kind, id, e);
    }
}

pub fn read_active_page(store: &dyn KeyValueStore) -> Option<String> {
    match store.get(ACTIVE_PAGE_KEY) {
        Ok(page) => page.filter(|p| !p.trim().is_empty()),
        Err(e) => {
            debug!("STORE: active page unreadable: {}", e);
            None
        }
    }
}

pub fn write_active_page(store: &dyn KeyValueStore, page_id: &str) {
    if let Err(e) = store.set(ACTIVE_PAGE_KEY, page_id) {
        debug!("STORE: could not persist active page {}: {}", page_id, e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_storage_keys() {
        assert_eq!(storage_key(EntityKind::Team, "RedHawks"), "mlb_dash_team_open__RedHawks");
        assert_eq!(storage_key(EntityKind::Division, "al_west"), "mlb_dash_div_open__al_west");
    }

    #[test]
    fn test_collapse_flag_round_trip() {
        let store = MemoryStore::new();
        write_collapsed(&store, EntityKind::Team, "RedHawks", false);
        assert_eq!(store.get("mlb_dash_team_open__RedHawks").unwrap().as_deref(), Some("0"));
        assert!(!read_collapsed(&store, EntityKind::Team, "RedHawks"));

        write_collapsed(&store, EntityKind::Team, "RedHawks", true);
        assert_eq!(store.get("mlb_dash_team_open__RedHawks").unwrap().as_deref(), Some("1"));
        assert!(read_collapsed(&store, EntityKind::Team, "RedHawks"));
    }

    #[test]
    fn test_defaults_when_unset() {
        let store = MemoryStore::new();
        assert!(read_collapsed(&store, EntityKind::Team, "Mariners"));
        assert!(!read_collapsed(&store, EntityKind::Division, "al_west"));
    }

    #[test]
    fn test_unexpected_values_fall_back_to_default() {
        let store = MemoryStore::new();
        store.set("mlb_dash_div_open__al_west", "yes").unwrap();
        assert!(!read_collapsed(&store, EntityKind::Division, "al_west"));
    }

    #[test]
    fn test_unavailable_store_is_silent() {
        let store = MemoryStore::unavailable();
        write_collapsed(&store, EntityKind::Division, "al_west", true);
        assert!(!read_collapsed(&store, EntityKind::Division, "al_west"));
        assert!(read_collapsed(&store, EntityKind::Team, "RedHawks"));
        write_active_page(&store, "p_jane_doe");
        assert_eq!(read_active_page(&store), None);
    }

    #[test]
    fn test_file_store_persists_across_opens() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/state.json");

        let store = FileStore::open(&path);
        write_collapsed(&store, EntityKind::Team, "RedHawks", false);
        write_active_page(&store, "p_jane_doe");

        let reopened = FileStore::open(&path);
        assert!(!read_collapsed(&reopened, EntityKind::Team, "RedHawks"));
        assert_eq!(read_active_page(&reopened).as_deref(), Some("p_jane_doe"));
    }

    #[test]
    fn test_file_store_ignores_malformed_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, "not json").unwrap();

        let store = FileStore::open(&path);
        assert_eq!(store.get(ACTIVE_PAGE_KEY).unwrap(), None);
        assert_eq!(store.path(), path.as_path());
    }
}
