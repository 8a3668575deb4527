//! Census persistence: the snapshot file and the autosave debounce.
//!
//! The persistence collaborator stores the census as one JSON blob whose
//! shape is exactly the in-memory shape (see [`crate::census::Snapshot`]).
//! On startup the application asks the store for a saved census and falls
//! back to seed data when there is none; after mutations it saves again
//! once the [`Autosave`] quiescence window has elapsed.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::census::{PatientCensus, Snapshot};

/// Default quiescence window before an autosave fires.
pub const DEFAULT_AUTOSAVE: Duration = Duration::from_secs(5);

/// Errors that can occur while loading or saving the census.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to create data directory: {0}")]
    DirCreation(std::io::Error),
    #[error("failed to read census file: {0}")]
    FileRead(std::io::Error),
    #[error("failed to write census file: {0}")]
    FileWrite(std::io::Error),
    #[error("failed to serialise census: {0}")]
    Serialization(serde_json::Error),
    #[error("failed to deserialise census: {0}")]
    Deserialization(serde_json::Error),
}

/// File-backed census storage.
#[derive(Clone, Debug)]
pub struct CensusStore {
    path: PathBuf,
}

impl CensusStore {
    /// A store writing to an explicit path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        CensusStore { path: path.into() }
    }

    /// A store at the configured location.
    ///
    /// Reads `ROUNDS_DATA_FILE`, defaulting to `patient_data/census.json`
    /// under the working directory.
    pub fn from_env() -> Self {
        let path =
            std::env::var("ROUNDS_DATA_FILE").unwrap_or_else(|_| "patient_data/census.json".into());
        CensusStore::new(path)
    }

    /// Where this store reads and writes.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the saved census.
    ///
    /// # Returns
    ///
    /// `Ok(None)` when nothing has been saved yet; the caller decides on
    /// the fallback (normally the seed data).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the file exists but cannot be read or
    /// parsed.
    pub fn load(&self) -> Result<Option<PatientCensus>, StoreError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&self.path).map_err(StoreError::FileRead)?;
        let snapshot: Snapshot =
            serde_json::from_str(&contents).map_err(StoreError::Deserialization)?;
        Ok(Some(PatientCensus::from_snapshot(snapshot)))
    }

    /// Saves a consistent snapshot of the census, creating parent
    /// directories as needed.
    pub fn save(&self, census: &PatientCensus) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(StoreError::DirCreation)?;
            }
        }
        let json = serde_json::to_string_pretty(&census.to_snapshot())
            .map_err(StoreError::Serialization)?;
        fs::write(&self.path, json).map_err(StoreError::FileWrite)?;
        tracing::debug!("saved census to {}", self.path.display());
        Ok(())
    }
}

/// Cooperative autosave debounce.
///
/// Mirrors the single-threaded event model: every mutation restarts the
/// quiescence window, and the owner polls [`Autosave::take_due`] from its
/// event loop. No timers or threads of its own.
#[derive(Clone, Copy, Debug)]
pub struct Autosave {
    delay: Duration,
    pending_since: Option<Instant>,
}

impl Autosave {
    pub fn new(delay: Duration) -> Self {
        Autosave {
            delay,
            pending_since: None,
        }
    }

    /// Notes a census mutation at `now`, restarting the window.
    pub fn record_change(&mut self, now: Instant) {
        self.pending_since = Some(now);
    }

    /// True while a save is owed but the window has not elapsed.
    pub fn is_pending(&self) -> bool {
        self.pending_since.is_some()
    }

    /// Reports whether the quiescence window has elapsed, clearing the
    /// pending state when it has. The caller performs the actual save.
    pub fn take_due(&mut self, now: Instant) -> bool {
        match self.pending_since {
            Some(since) if now.duration_since(since) >= self.delay => {
                self.pending_since = None;
                true
            }
            _ => false,
        }
    }
}

impl Default for Autosave {
    fn default() -> Self {
        Autosave::new(DEFAULT_AUTOSAVE)
    }
}
