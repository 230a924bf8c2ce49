//! Durable access-token persistence.
//!
//! The store is deliberately dumb: one opaque string under one key, no
//! validation. Storage failures must degrade to "no token" - losing
//! persistence reads as logged out, it never takes the application down.

use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::warn;

/// File name of the persisted token, mirroring the single storage key the
/// application owns.
const TOKEN_KEY: &str = "accessToken";

/// Persistence contract for the single access token.
///
/// `save` and `clear` swallow storage failures (logged, not raised); a
/// failed `read` reports `None`.
pub trait TokenStore: Send + Sync {
    /// Persist the token, replacing any previous value.
    fn save(&self, token: &str);

    /// Read the persisted token, if any.
    fn read(&self) -> Option<String>;

    /// Remove the persisted token.
    fn clear(&self);
}

/// Token store backed by a single file in the application data directory.
pub struct FileTokenStore {
    dir: PathBuf,
}

impl FileTokenStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn token_path(&self) -> PathBuf {
        self.dir.join(TOKEN_KEY)
    }
}

impl TokenStore for FileTokenStore {
    fn save(&self, token: &str) {
        if let Err(e) = std::fs::create_dir_all(&self.dir) {
            warn!(error = %e, "Failed to create token storage directory");
            return;
        }
        if let Err(e) = std::fs::write(self.token_path(), token) {
            warn!(error = %e, "Failed to persist access token");
        }
    }

    fn read(&self) -> Option<String> {
        let path = self.token_path();
        if !path.exists() {
            return None;
        }
        match std::fs::read_to_string(&path) {
            Ok(token) if token.is_empty() => None,
            Ok(token) => Some(token),
            Err(e) => {
                warn!(error = %e, "Failed to read persisted access token");
                None
            }
        }
    }

    fn clear(&self) {
        let path = self.token_path();
        if path.exists() {
            if let Err(e) = std::fs::remove_file(&path) {
                warn!(error = %e, "Failed to remove persisted access token");
            }
        }
    }
}

/// In-memory token store for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn cell(&self) -> MutexGuard<'_, Option<String>> {
        self.token.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl TokenStore for MemoryTokenStore {
    fn save(&self, token: &str) {
        *self.cell() = Some(token.to_string());
    }

    fn read(&self) -> Option<String> {
        self.cell().clone()
    }

    fn clear(&self) {
        *self.cell() = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path());

        assert_eq!(store.read(), None);

        store.save("abc.def.ghi");
        assert_eq!(store.read().as_deref(), Some("abc.def.ghi"));

        store.save("replaced");
        assert_eq!(store.read().as_deref(), Some("replaced"));

        store.clear();
        assert_eq!(store.read(), None);
    }

    #[test]
    fn file_store_creates_directory_on_save() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().join("nested").join("deep"));

        store.save("tok");
        assert_eq!(store.read().as_deref(), Some("tok"));
    }

    #[test]
    fn file_store_treats_empty_file_as_absent() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(TOKEN_KEY), "").unwrap();

        let store = FileTokenStore::new(dir.path());
        assert_eq!(store.read(), None);
    }

    #[test]
    fn file_store_clear_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path());

        store.clear();
        store.clear();
        assert_eq!(store.read(), None);
    }

    #[test]
    fn memory_store_roundtrip() {
        let store = MemoryTokenStore::new();

        assert_eq!(store.read(), None);
        store.save("tok");
        assert_eq!(store.read().as_deref(), Some("tok"));
        store.clear();
        assert_eq!(store.read(), None);
    }
}
