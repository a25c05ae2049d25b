use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ProviderError, ProviderResult};

/// States of one provider's acquisition lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LifecycleState {
    Idle,
    VerifyingAuth,
    Dispatching,
    AwaitingCompletion,
    Parsing,
    Done,
    Failed,
}

impl std::fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Idle => "idle",
            Self::VerifyingAuth => "verifying-auth",
            Self::Dispatching => "dispatching",
            Self::AwaitingCompletion => "awaiting-completion",
            Self::Parsing => "parsing",
            Self::Done => "done",
            Self::Failed => "failed",
        };
        write!(f, "{s}")
    }
}

/// Persisted lifecycle record for one provider.
///
/// Saved after every transition so an export pending for days survives
/// application shutdown and the engine can resume polling on restart.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcquisitionState {
    pub provider: String,
    pub state: LifecycleState,
    /// When the export request was filed, if it has been.
    pub dispatched_at: Option<DateTime<Utc>>,
    /// Message of the error that moved the lifecycle to `Failed`.
    pub last_error: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl AcquisitionState {
    pub fn idle(provider: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            state: LifecycleState::Idle,
            dispatched_at: None,
            last_error: None,
            updated_at: Utc::now(),
        }
    }
}

/// Storage for per-provider lifecycle records.
pub trait LifecycleStore: Send + Sync {
    /// Load the persisted record for a provider, if one exists.
    fn load(&self, provider: &str) -> ProviderResult<Option<AcquisitionState>>;

    /// Persist a record, replacing any previous one for the same provider.
    fn save(&self, state: &AcquisitionState) -> ProviderResult<()>;
}

/// Lifecycle records in memory, for tests and embedding.
#[derive(Default)]
pub struct InMemoryLifecycleStore {
    states: RwLock<HashMap<String, AcquisitionState>>,
}

impl InMemoryLifecycleStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LifecycleStore for InMemoryLifecycleStore {
    fn load(&self, provider: &str) -> ProviderResult<Option<AcquisitionState>> {
        Ok(self
            .states
            .read()
            .expect("lifecycle lock poisoned")
            .get(provider)
            .cloned())
    }

    fn save(&self, state: &AcquisitionState) -> ProviderResult<()> {
        self.states
            .write()
            .expect("lifecycle lock poisoned")
            .insert(state.provider.clone(), state.clone());
        Ok(())
    }
}

/// Lifecycle records as one JSON file per provider, replaced atomically.
pub struct FileLifecycleStore {
    root: PathBuf,
}

impl FileLifecycleStore {
    /// Open (creating if needed) a lifecycle directory.
    pub fn open(root: impl Into<PathBuf>) -> ProviderResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    fn state_path(&self, provider: &str) -> PathBuf {
        self.root.join(format!("{provider}.json"))
    }
}

impl LifecycleStore for FileLifecycleStore {
    fn load(&self, provider: &str) -> ProviderResult<Option<AcquisitionState>> {
        let path = self.state_path(provider);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let state = serde_json::from_slice(&bytes).map_err(|e| ProviderError::MalformedState {
            provider: provider.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Some(state))
    }

    fn save(&self, state: &AcquisitionState) -> ProviderResult<()> {
        let bytes =
            serde_json::to_vec_pretty(state).map_err(|e| ProviderError::MalformedState {
                provider: state.provider.clone(),
                reason: e.to_string(),
            })?;
        let mut tmp = tempfile::NamedTempFile::new_in(&self.root)?;
        tmp.write_all(&bytes)?;
        tmp.as_file().sync_all()?;
        tmp.persist(self.state_path(&state.provider))
            .map_err(|e| ProviderError::Io(e.error))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_roundtrip() {
        let store = InMemoryLifecycleStore::new();
        assert!(store.load("spotify").unwrap().is_none());

        let mut state = AcquisitionState::idle("spotify");
        state.state = LifecycleState::AwaitingCompletion;
        store.save(&state).unwrap();

        let loaded = store.load("spotify").unwrap().unwrap();
        assert_eq!(loaded.state, LifecycleState::AwaitingCompletion);
    }

    #[test]
    fn file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = AcquisitionState::idle("spotify");
        state.state = LifecycleState::AwaitingCompletion;
        state.dispatched_at = Some(Utc::now());

        {
            let store = FileLifecycleStore::open(dir.path()).unwrap();
            store.save(&state).unwrap();
        }

        let store = FileLifecycleStore::open(dir.path()).unwrap();
        let loaded = store.load("spotify").unwrap().unwrap();
        assert_eq!(loaded, state);
    }

    #[test]
    fn file_store_missing_provider_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileLifecycleStore::open(dir.path()).unwrap();
        assert!(store.load("github").unwrap().is_none());
    }

    #[test]
    fn file_store_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileLifecycleStore::open(dir.path()).unwrap();
        fs::write(dir.path().join("spotify.json"), b"{broken").unwrap();
        assert!(matches!(
            store.load("spotify"),
            Err(ProviderError::MalformedState { .. })
        ));
    }

    #[test]
    fn save_replaces_previous_record() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileLifecycleStore::open(dir.path()).unwrap();

        let mut state = AcquisitionState::idle("spotify");
        store.save(&state).unwrap();
        state.state = LifecycleState::Done;
        store.save(&state).unwrap();

        let loaded = store.load("spotify").unwrap().unwrap();
        assert_eq!(loaded.state, LifecycleState::Done);
    }
}
