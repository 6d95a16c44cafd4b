//! Local persistence.
//!
//! Saves the last configuration, the roster and the feedback settings
//! between launches. The game engine never touches a store; the owning
//! layer loads once at startup and saves after roster or config edits.
//!
//! Saved blobs carry a format version and a SHA-256 checksum over the
//! bincode encoding of their payload. A blob that fails either check is
//! reported as an error, never half-loaded.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Serialize, Deserialize};
use tracing::{debug, warn};

use crate::core::hash::hash_with_domain;
use crate::game::config::GameConfig;
use crate::game::roster::Roster;

/// Current save format.
pub const SAVE_FORMAT_VERSION: u32 = 1;

/// Default save file name.
pub const DEFAULT_SAVE_FILE: &str = "undercover2-save.json";

const CHECKSUM_DOMAIN: &[u8] = b"UNDERCOVER_SAVE_V1";

/// Persistence errors.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// File system error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Save file is not valid JSON for this format.
    #[error("Invalid save file: {0}")]
    Json(#[from] serde_json::Error),

    /// Payload could not be encoded for the checksum.
    #[error("Encoding error: {0}")]
    Encode(#[from] bincode::Error),

    /// Stored checksum does not match the payload.
    #[error("Checksum mismatch (expected {expected}, found {found})")]
    ChecksumMismatch {
        /// Checksum recomputed from the payload.
        expected: String,
        /// Checksum stored in the blob.
        found: String,
    },

    /// Blob written by an unknown format version.
    #[error("Unsupported save format version {0}")]
    UnsupportedVersion(u32),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Sound and vibration toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackSettings {
    /// Play sound cues.
    pub sound: bool,
    /// Vibrate on cues.
    pub vibration: bool,
}

impl Default for FeedbackSettings {
    fn default() -> Self {
        Self {
            sound: true,
            vibration: true,
        }
    }
}

/// What gets written to the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedState {
    /// Save format version.
    pub version: u32,
    /// When the blob was written.
    pub saved_at: DateTime<Utc>,
    /// Last used configuration.
    pub config: GameConfig,
    /// Players seated at the table.
    pub roster: Roster,
    /// Feedback toggles.
    pub settings: FeedbackSettings,
    /// Hex SHA-256 over the encoded payload.
    pub checksum: String,
}

impl SavedState {
    /// Build a blob stamped now, with its checksum.
    pub fn new(
        config: GameConfig,
        roster: Roster,
        settings: FeedbackSettings,
    ) -> StorageResult<Self> {
        let mut state = Self {
            version: SAVE_FORMAT_VERSION,
            saved_at: Utc::now(),
            config,
            roster,
            settings,
            checksum: String::new(),
        };
        state.checksum = state.compute_checksum()?;
        Ok(state)
    }

    /// Checksum of version, config, roster and settings.
    pub fn compute_checksum(&self) -> StorageResult<String> {
        let payload =
            bincode::serialize(&(self.version, &self.config, &self.roster, &self.settings))?;
        Ok(hex::encode(hash_with_domain(CHECKSUM_DOMAIN, &payload)))
    }

    /// Check version and checksum.
    pub fn verify(&self) -> StorageResult<()> {
        if self.version != SAVE_FORMAT_VERSION {
            return Err(StorageError::UnsupportedVersion(self.version));
        }

        let expected = self.compute_checksum()?;
        if expected != self.checksum {
            return Err(StorageError::ChecksumMismatch {
                expected,
                found: self.checksum.clone(),
            });
        }
        Ok(())
    }
}

/// A key/value blob store holding one `SavedState`.
pub trait Store {
    /// Read the saved state. `Ok(None)` when nothing was saved.
    fn load(&self) -> StorageResult<Option<SavedState>>;

    /// Replace the saved state.
    fn save(&mut self, state: &SavedState) -> StorageResult<()>;

    /// Forget the saved state.
    fn clear(&mut self) -> StorageResult<()>;
}

/// In-memory store, for tests and hosts without a file system.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slot: Option<SavedState>,
}

impl MemoryStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for MemoryStore {
    fn load(&self) -> StorageResult<Option<SavedState>> {
        match &self.slot {
            Some(state) => {
                state.verify()?;
                Ok(Some(state.clone()))
            }
            None => Ok(None),
        }
    }

    fn save(&mut self, state: &SavedState) -> StorageResult<()> {
        self.slot = Some(state.clone());
        Ok(())
    }

    fn clear(&mut self) -> StorageResult<()> {
        self.slot = None;
        Ok(())
    }
}

/// JSON file on disk.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Store backed by `path`. The file is created on first save.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store under `dir` with the default file name.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(DEFAULT_SAVE_FILE))
    }

    /// Backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Store for JsonFileStore {
    fn load(&self) -> StorageResult<Option<SavedState>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let state: SavedState = serde_json::from_str(&raw)?;
        if let Err(e) = state.verify() {
            warn!("Rejecting save file {}: {}", self.path.display(), e);
            return Err(e);
        }

        debug!("Loaded save from {} ({})", self.path.display(), state.saved_at);
        Ok(Some(state))
    }

    fn save(&mut self, state: &SavedState) -> StorageResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string_pretty(state)?;
        fs::write(&self.path, json)?;
        debug!("Saved {} players to {}", state.roster.len(), self.path.display());
        Ok(())
    }

    fn clear(&mut self) -> StorageResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::config::RoleOptions;

    fn sample() -> SavedState {
        let mut roster = Roster::new();
        roster.add("Alice").unwrap();
        roster.add("Bob").unwrap();
        roster.add("Chloé").unwrap();

        let mut config = GameConfig::with_players(roster.seeds().to_vec());
        config.roles = RoleOptions {
            enable_oracle: true,
            ..RoleOptions::default()
        };

        let settings = FeedbackSettings {
            sound: false,
            vibration: true,
        };
        SavedState::new(config, roster, settings).unwrap()
    }

    #[test]
    fn test_memory_store() {
        let mut store = MemoryStore::new();
        assert!(store.load().unwrap().is_none());

        let state = sample();
        store.save(&state).unwrap();
        assert_eq!(store.load().unwrap(), Some(state));

        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_file_store() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::in_dir(dir.path());
        assert!(store.load().unwrap().is_none());

        let state = sample();
        store.save(&state).unwrap();
        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded, state);
        assert!(loaded.config.roles.enable_oracle);
        assert_eq!(Roster::from_seeds(loaded.config.players.clone()), loaded.roster);

        store.clear().unwrap();
        assert!(!store.path().exists());
        store.clear().unwrap();
    }

    #[test]
    fn test_tampered_file_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::new(dir.path().join("nested").join("save.json"));
        store.save(&sample()).unwrap();

        let raw = fs::read_to_string(store.path()).unwrap();
        fs::write(store.path(), raw.replace("Alice", "Mallory")).unwrap();

        assert!(matches!(store.load(), Err(StorageError::ChecksumMismatch { .. })));
    }

    #[test]
    fn test_corrupt_file_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::in_dir(dir.path());
        fs::write(store.path(), "{ not json").unwrap();

        assert!(matches!(store.load(), Err(StorageError::Json(_))));
    }

    #[test]
    fn test_unknown_version_rejected() {
        let mut state = sample();
        state.version = 99;
        assert!(matches!(state.verify(), Err(StorageError::UnsupportedVersion(99))));
    }

    #[test]
    fn test_checksum_ignores_timestamp() {
        let mut state = sample();
        state.saved_at = DateTime::<Utc>::default();
        assert!(state.verify().is_ok());
    }
}
