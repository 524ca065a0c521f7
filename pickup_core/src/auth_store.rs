use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Credential fields for one provider, e.g. `{"api_key": "..."}`.
pub type AuthDetails = HashMap<String, String>;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("persist error: {0}")]
    Persist(String),
}

pub trait AuthStore: Send + Sync {
    fn load(&self, provider: &str) -> Option<AuthDetails>;
    fn save(&self, provider: &str, auth: &AuthDetails) -> Result<(), StoreError>;
    fn remove(&self, provider: &str) -> Result<bool, StoreError>;
    fn list_providers(&self) -> Vec<String>;
}

/// A simple in-memory store, mainly for testing.
pub struct MemoryAuthStore {
    map: std::sync::Mutex<HashMap<String, AuthDetails>>,
}

impl MemoryAuthStore {
    pub fn new() -> Self {
        Self {
            map: std::sync::Mutex::new(HashMap::new()),
        }
    }

    /// Convenience constructor holding a single `api_key` for `provider`.
    pub fn with_api_key(provider: &str, key: &str) -> Self {
        let store = Self::new();
        if let Ok(mut map) = store.map.lock() {
            let mut auth = AuthDetails::new();
            auth.insert("api_key".to_string(), key.to_string());
            map.insert(provider.to_string(), auth);
        }
        store
    }
}

impl Default for MemoryAuthStore {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthStore for MemoryAuthStore {
    fn load(&self, provider: &str) -> Option<AuthDetails> {
        self.map.lock().ok()?.get(provider).cloned()
    }
    fn save(&self, provider: &str, auth: &AuthDetails) -> Result<(), StoreError> {
        self.map
            .lock()
            .map_err(|e| StoreError::Persist(format!("lock poisoned: {}", e)))?
            .insert(provider.to_string(), auth.clone());
        Ok(())
    }
    fn remove(&self, provider: &str) -> Result<bool, StoreError> {
        Ok(self
            .map
            .lock()
            .map_err(|e| StoreError::Persist(format!("lock poisoned: {}", e)))?
            .remove(provider)
            .is_some())
    }
    fn list_providers(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .map
            .lock()
            .map(|m| m.keys().cloned().collect())
            .unwrap_or_default();
        names.sort();
        names
    }
}

/// A file-backed JSON store at `~/.config/pickup/auth.json` (Unix)
/// or `%APPDATA%/pickup/auth.json` (Windows).
pub struct FileAuthStore {
    path: PathBuf,
}

impl FileAuthStore {
    pub fn new_default() -> Self {
        Self {
            path: crate::config::config_dir().join("auth.json"),
        }
    }

    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn config_path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> HashMap<String, AuthDetails> {
        match std::fs::read_to_string(&self.path) {
            Ok(s) => serde_json::from_str(&s).unwrap_or_default(),
            Err(_) => HashMap::new(),
        }
    }

    fn write_map(&self, map: &HashMap<String, AuthDetails>) -> Result<(), StoreError> {
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir).map_err(|e| StoreError::Unavailable(e.to_string()))?;
        }
        let s = serde_json::to_string_pretty(map)
            .map_err(|e| StoreError::Persist(format!("serde: {}", e)))?;
        std::fs::write(&self.path, &s).map_err(|e| StoreError::Persist(e.to_string()))?;

        // Owner read/write only
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o600);
            std::fs::set_permissions(&self.path, perms)
                .map_err(|e| StoreError::Persist(format!("chmod: {}", e)))?;
        }

        Ok(())
    }
}

impl Default for FileAuthStore {
    fn default() -> Self {
        Self::new_default()
    }
}

impl AuthStore for FileAuthStore {
    fn load(&self, provider: &str) -> Option<AuthDetails> {
        self.read_map().get(provider).cloned()
    }

    fn save(&self, provider: &str, auth: &AuthDetails) -> Result<(), StoreError> {
        let mut map = self.read_map();
        map.insert(provider.to_string(), auth.clone());
        self.write_map(&map)
    }

    fn remove(&self, provider: &str) -> Result<bool, StoreError> {
        let mut map = self.read_map();
        let existed = map.remove(provider).is_some();
        if existed {
            self.write_map(&map)?;
        }
        Ok(existed)
    }

    fn list_providers(&self) -> Vec<String> {
        let mut names: Vec<String> = self.read_map().into_keys().collect();
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_store_round_trips_and_removes() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileAuthStore::new(dir.path().join("nested").join("auth.json"));

        let mut auth = AuthDetails::new();
        auth.insert("api_key".into(), "abc123".into());
        store.save("newsapi", &auth).unwrap();

        assert_eq!(
            store.load("newsapi").and_then(|a| a.get("api_key").cloned()),
            Some("abc123".to_string())
        );
        assert_eq!(store.list_providers(), vec!["newsapi".to_string()]);

        assert!(store.remove("newsapi").unwrap());
        assert!(!store.remove("newsapi").unwrap());
        assert!(store.load("newsapi").is_none());
    }

    #[cfg(unix)]
    #[test]
    fn file_store_restricts_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let store = FileAuthStore::new(dir.path().join("auth.json"));
        store.save("newsapi-ai", &AuthDetails::new()).unwrap();

        let mode = std::fs::metadata(store.config_path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn memory_store_with_api_key() {
        let store = MemoryAuthStore::with_api_key("newsapi", "k");
        assert_eq!(store.list_providers(), vec!["newsapi".to_string()]);
        assert!(store.load("newsapi-ai").is_none());
    }
}
