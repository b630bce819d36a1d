//! Persisted authentication snapshot and its freshness policy.

use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::SESSION_FRESHNESS;
use crate::error::Result;

/// A captured browser cookie, in the storage-state file shape.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Cookie {
    pub name: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Unix seconds; negative or absent means a session cookie.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires: Option<f64>,
    #[serde(default)]
    pub http_only: bool,
    #[serde(default)]
    pub secure: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub same_site: Option<String>,
}

/// One `localStorage` entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StorageEntry {
    pub name: String,
    pub value: String,
}

/// `localStorage` contents for one origin.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OriginState {
    pub origin: String,
    #[serde(default)]
    pub local_storage: Vec<StorageEntry>,
}

/// Serialized authenticated browser state, reusable across test runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    #[serde(default)]
    pub cookies: Vec<Cookie>,
    #[serde(default)]
    pub origins: Vec<OriginState>,
}

impl SessionSnapshot {
    /// A snapshot with no cookies never represents a logged-in session.
    pub fn has_cookies(&self) -> bool {
        !self.cookies.is_empty()
    }
}

/// On-disk store for a single [`SessionSnapshot`].
///
/// Concurrent test workers may race on the file; every save is one complete
/// `fs::write`, so the converged state is always a whole, valid snapshot
/// (last writer wins).
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
    freshness: Duration,
}

impl SessionStore {
    /// Store with the default 12-hour freshness window.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_freshness(path, SESSION_FRESHNESS)
    }

    /// Store with an explicit freshness window.
    pub fn with_freshness(path: impl Into<PathBuf>, freshness: Duration) -> Self {
        Self {
            path: path.into(),
            freshness,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the snapshot. Missing or unparseable files are `None`; a
    /// corrupt store routes the caller to re-establishment, it is never
    /// fatal.
    pub fn load(&self) -> Option<SessionSnapshot> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return None,
            Err(err) => {
                warn!(target: "golive::session", path = %self.path.display(), %err, "session file unreadable");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(snapshot) => Some(snapshot),
            Err(err) => {
                warn!(target: "golive::session", path = %self.path.display(), %err, "session file corrupt, ignoring");
                None
            }
        }
    }

    /// Wall-clock age of the stored snapshot, from file mtime.
    pub fn age(&self) -> Option<Duration> {
        let modified = std::fs::metadata(&self.path).ok()?.modified().ok()?;
        SystemTime::now().duration_since(modified).ok()
    }

    /// Whether the stored snapshot may be reused without revalidation:
    /// present, parseable, at least one cookie, and younger than the
    /// freshness window.
    pub fn usable(&self) -> bool {
        let Some(snapshot) = self.load() else {
            return false;
        };
        if !snapshot.has_cookies() {
            debug!(target: "golive::session", "stored session has no cookies");
            return false;
        }
        match self.age() {
            Some(age) if age < self.freshness => {
                debug!(
                    target: "golive::session",
                    age_hours = age.as_secs_f64() / 3600.0,
                    "reusing existing session snapshot"
                );
                true
            }
            Some(age) => {
                debug!(
                    target: "golive::session",
                    age_hours = age.as_secs_f64() / 3600.0,
                    "session snapshot is stale"
                );
                false
            }
            None => false,
        }
    }

    /// Overwrites the store with a freshly captured snapshot.
    pub fn save(&self, snapshot: &SessionSnapshot) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(snapshot)?)?;
        debug!(
            target: "golive::session",
            path = %self.path.display(),
            cookies = snapshot.cookies.len(),
            "session snapshot saved"
        );
        Ok(())
    }

    /// Removes the snapshot file if present.
    pub fn clear(&self) -> Result<bool> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn snapshot_with_cookie() -> SessionSnapshot {
        SessionSnapshot {
            cookies: vec![Cookie {
                name: "session".into(),
                value: "token".into(),
                domain: Some(".example.com".into()),
                path: Some("/".into()),
                expires: Some(-1.0),
                http_only: true,
                secure: true,
                same_site: Some("Lax".into()),
            }],
            origins: vec![],
        }
    }

    #[test]
    fn load_returns_none_for_missing_file() {
        let temp = TempDir::new().unwrap();
        let store = SessionStore::new(temp.path().join("auth.json"));
        assert!(store.load().is_none());
        assert!(!store.usable());
    }

    #[test]
    fn load_returns_none_for_invalid_json() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("auth.json");
        std::fs::write(&path, "{ not json").unwrap();

        let store = SessionStore::new(&path);
        assert!(store.load().is_none());
        assert!(!store.usable());
    }

    #[test]
    fn save_then_load_round_trips() {
        let temp = TempDir::new().unwrap();
        let store = SessionStore::new(temp.path().join("nested/auth.json"));
        let snapshot = snapshot_with_cookie();

        store.save(&snapshot).unwrap();
        assert_eq!(store.load().unwrap(), snapshot);
        assert!(store.usable());
    }

    #[test]
    fn zero_cookie_snapshot_is_not_usable() {
        let temp = TempDir::new().unwrap();
        let store = SessionStore::new(temp.path().join("auth.json"));
        store.save(&SessionSnapshot::default()).unwrap();

        assert!(store.load().is_some());
        assert!(!store.usable());
    }

    #[test]
    fn snapshot_older_than_window_is_stale() {
        let temp = TempDir::new().unwrap();
        // Zero-width window: any existing file is already stale.
        let store = SessionStore::with_freshness(temp.path().join("auth.json"), Duration::ZERO);
        store.save(&snapshot_with_cookie()).unwrap();

        assert!(store.load().is_some());
        assert!(!store.usable());
    }

    #[test]
    fn clear_reports_whether_file_existed() {
        let temp = TempDir::new().unwrap();
        let store = SessionStore::new(temp.path().join("auth.json"));
        assert!(!store.clear().unwrap());

        store.save(&snapshot_with_cookie()).unwrap();
        assert!(store.clear().unwrap());
        assert!(store.load().is_none());
    }

    #[test]
    fn accepts_storage_state_file_shape() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("auth.json");
        std::fs::write(
            &path,
            r#"{
  "cookies": [
    {
      "name": "session",
      "value": "token",
      "domain": ".example.com",
      "path": "/",
      "expires": -1.0,
      "httpOnly": true,
      "secure": true,
      "sameSite": "Lax"
    }
  ],
  "origins": [
    { "origin": "https://ngage.ngenux.app", "localStorage": [{ "name": "k", "value": "v" }] }
  ]
}"#,
        )
        .unwrap();

        let snapshot = SessionStore::new(&path).load().unwrap();
        assert_eq!(snapshot.cookies.len(), 1);
        assert!(snapshot.cookies[0].http_only);
        assert_eq!(snapshot.origins[0].local_storage[0].name, "k");
    }
}
