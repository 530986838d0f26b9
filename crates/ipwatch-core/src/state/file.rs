// # File State Store
//
// File-based implementation of StateStore.
//
// ## Layout
//
// One JSON document per datum inside the state directory, so the long-lived
// credential profile, the mutable notification settings and the per-run
// state each have their own file and format version:
//
// - `state.json`    — last attempted IP
// - `profile.json`  — credential profile
// - `settings.json` — notification settings
//
// ## Crash Safety
//
// Writes go to a temporary file in the same directory and are renamed over
// the target, so a crash leaves either the old or the new document, never a
// partial one. A document that exists but fails to parse is reported as
// `Error::CorruptState`; recovery policy (treat as first run) belongs to
// the reconciler, not the store.

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::Error;
use crate::profile::CredentialProfile;
use crate::traits::notifier::NotificationSettings;
use crate::traits::state_store::{RunState, StateStore};

/// Document format version, for future migration if the layout changes
const FORMAT_VERSION: &str = "1.0";

const STATE_FILE: &str = "state.json";
const PROFILE_FILE: &str = "profile.json";
const SETTINGS_FILE: &str = "settings.json";

/// Versioned on-disk envelope shared by all three documents
#[derive(Debug, serde::Serialize, serde::Deserialize)]
struct Document<T> {
    version: String,
    #[serde(flatten)]
    payload: T,
}

/// File-based state store with atomic writes
///
/// # Example
///
/// ```rust,no_run
/// use ipwatch_core::FileStore;
/// use ipwatch_core::traits::{RunState, StateStore};
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = FileStore::new("/var/lib/ipwatch").await?;
///
///     let state = store.load_state().await?;
///     assert_eq!(state.last_ip, None);
///
///     store.save_state(&RunState::attempted("1.2.3.4".parse()?)).await?;
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `dir`, creating the directory if needed
    pub async fn new<P: AsRef<Path>>(dir: P) -> Result<Self, Error> {
        let dir = dir.as_ref().to_path_buf();

        if !dir.exists() {
            fs::create_dir_all(&dir).await.map_err(|e| {
                Error::config(format!(
                    "failed to create state directory {}: {}",
                    dir.display(),
                    e
                ))
            })?;
        }

        Ok(Self { dir })
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    /// Load one document, `None` when the file does not exist
    async fn load_doc<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>, Error> {
        let path = self.path(name);
        if !path.exists() {
            tracing::debug!("document does not exist: {}", path.display());
            return Ok(None);
        }

        let content = fs::read_to_string(&path).await.map_err(|e| {
            Error::state_store(format!("failed to read {}: {}", path.display(), e))
        })?;

        let doc: Document<T> = serde_json::from_str(&content).map_err(|e| {
            Error::corrupt_state(format!("failed to parse {}: {}", path.display(), e))
        })?;

        if doc.version != FORMAT_VERSION {
            tracing::warn!(
                "document version mismatch in {}: expected {}, got {}; loading anyway",
                path.display(),
                FORMAT_VERSION,
                doc.version
            );
        }

        Ok(Some(doc.payload))
    }

    /// Write one document atomically (write to temp, then rename)
    async fn write_doc<T: Serialize>(&self, name: &str, payload: &T) -> Result<(), Error> {
        let path = self.path(name);
        let doc = Document {
            version: FORMAT_VERSION.to_string(),
            payload,
        };

        let json = serde_json::to_string_pretty(&doc)
            .map_err(|e| Error::state_store(format!("failed to serialize {}: {}", name, e)))?;

        let mut temp_path = path.clone();
        temp_path.set_extension("tmp");
        {
            let mut file = fs::File::create(&temp_path).await.map_err(|e| {
                Error::state_store(format!(
                    "failed to create temp file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;

            file.write_all(json.as_bytes()).await.map_err(|e| {
                Error::state_store(format!(
                    "failed to write temp file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;

            file.flush().await.map_err(|e| {
                Error::state_store(format!(
                    "failed to flush temp file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;
        }

        fs::rename(&temp_path, &path).await.map_err(|e| {
            Error::state_store(format!(
                "failed to rename {} to {}: {}",
                temp_path.display(),
                path.display(),
                e
            ))
        })?;

        tracing::trace!("document written: {}", path.display());
        Ok(())
    }
}

#[async_trait]
impl StateStore for FileStore {
    async fn load_state(&self) -> Result<RunState, Error> {
        Ok(self.load_doc(STATE_FILE).await?.unwrap_or_default())
    }

    async fn save_state(&self, state: &RunState) -> Result<(), Error> {
        self.write_doc(STATE_FILE, state).await
    }

    async fn load_profile(&self) -> Result<Option<CredentialProfile>, Error> {
        self.load_doc(PROFILE_FILE).await
    }

    async fn save_profile(&self, profile: &CredentialProfile) -> Result<(), Error> {
        self.write_doc(PROFILE_FILE, profile).await
    }

    async fn delete_profile(&self) -> Result<(), Error> {
        let path = self.path(PROFILE_FILE);
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::state_store(format!(
                "failed to delete {}: {}",
                path.display(),
                e
            ))),
        }
    }

    async fn load_settings(&self) -> Result<NotificationSettings, Error> {
        Ok(self.load_doc(SETTINGS_FILE).await?.unwrap_or_default())
    }

    async fn save_settings(&self, settings: &NotificationSettings) -> Result<(), Error> {
        self.write_doc(SETTINGS_FILE, settings).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn state_roundtrip_and_first_run_sentinel() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path()).await.unwrap();

        // First run: explicit empty state, not an error
        let state = store.load_state().await.unwrap();
        assert_eq!(state.last_ip, None);

        let ip: std::net::IpAddr = "1.2.3.4".parse().unwrap();
        store.save_state(&RunState::attempted(ip)).await.unwrap();

        // A fresh instance sees the persisted document
        let store2 = FileStore::new(dir.path()).await.unwrap();
        let state = store2.load_state().await.unwrap();
        assert_eq!(state.last_ip, Some(ip));
        assert!(state.updated_at.is_some());
    }

    #[tokio::test]
    async fn corrupt_state_is_a_distinct_error() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path()).await.unwrap();

        fs::write(dir.path().join(STATE_FILE), b"not json at all")
            .await
            .unwrap();

        let err = store.load_state().await.unwrap_err();
        assert!(matches!(err, Error::CorruptState(_)), "got: {:?}", err);
    }

    #[tokio::test]
    async fn profile_roundtrip_and_delete() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path()).await.unwrap();

        assert!(store.load_profile().await.unwrap().is_none());

        let profile =
            CredentialProfile::new("example.com", "user", "secret", "domains.google.com").unwrap();
        store.save_profile(&profile).await.unwrap();
        assert_eq!(store.load_profile().await.unwrap(), Some(profile));

        store.delete_profile().await.unwrap();
        assert!(store.load_profile().await.unwrap().is_none());

        // Deleting again is not an error
        store.delete_profile().await.unwrap();
    }

    #[tokio::test]
    async fn settings_default_when_absent() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path()).await.unwrap();

        let settings = store.load_settings().await.unwrap();
        assert_eq!(settings, NotificationSettings::default());

        let settings = NotificationSettings {
            preference: crate::NotificationPreference::ErrorsOnly,
            recipient: Some("owner@example.com".to_string()),
        };
        store.save_settings(&settings).await.unwrap();
        assert_eq!(store.load_settings().await.unwrap(), settings);
    }

    #[tokio::test]
    async fn repeated_writes_leave_a_consistent_document() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path()).await.unwrap();

        for i in 0..10 {
            let ip: std::net::IpAddr = format!("1.2.3.{}", i).parse().unwrap();
            store.save_state(&RunState::attempted(ip)).await.unwrap();
        }

        let store2 = FileStore::new(dir.path()).await.unwrap();
        let state = store2.load_state().await.unwrap();
        assert_eq!(state.last_ip, Some("1.2.3.9".parse().unwrap()));
    }
}
