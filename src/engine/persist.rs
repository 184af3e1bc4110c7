use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::state::{PlayerState, Snapshot};
use crate::error::PersistenceError;

pub const DEFAULT_SLOT: &str = "dungeonWalkerSave";

/// A single named save slot.
pub trait SaveStore {
    fn write(&mut self, raw: &str) -> Result<(), PersistenceError>;

    /// `Ok(None)` when nothing has been saved yet.
    fn read(&self) -> Result<Option<String>, PersistenceError>;
}

/// Slot kept in memory. Used by the browser binding, which hands the raw
/// snapshot to the page for storage.
#[derive(Debug, Default, Clone)]
pub struct MemorySaveStore {
    slot: Option<String>,
    writes: usize,
}

impl MemorySaveStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_contents(raw: impl Into<String>) -> Self {
        MemorySaveStore {
            slot: Some(raw.into()),
            writes: 0,
        }
    }

    pub fn contents(&self) -> Option<&str> {
        self.slot.as_deref()
    }

    pub fn write_count(&self) -> usize {
        self.writes
    }
}

impl SaveStore for MemorySaveStore {
    fn write(&mut self, raw: &str) -> Result<(), PersistenceError> {
        self.slot = Some(raw.to_string());
        self.writes += 1;
        Ok(())
    }

    fn read(&self) -> Result<Option<String>, PersistenceError> {
        Ok(self.slot.clone())
    }
}

/// Slot backed by one JSON file, replaced atomically on every write.
#[derive(Debug, Clone)]
pub struct FileSaveStore {
    path: PathBuf,
}

impl FileSaveStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileSaveStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SaveStore for FileSaveStore {
    fn write(&mut self, raw: &str) -> Result<(), PersistenceError> {
        write_text_atomic(&self.path, raw).map_err(|source| PersistenceError::Io {
            path: self.path.clone(),
            source,
        })
    }

    fn read(&self) -> Result<Option<String>, PersistenceError> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => Ok(Some(raw)),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(PersistenceError::Io {
                path: self.path.clone(),
                source,
            }),
        }
    }
}

fn write_text_atomic(path: &Path, text: &str) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let tmp_path = temp_path_for(path);
    fs::write(&tmp_path, text)?;
    if let Err(error) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(error);
    }
    Ok(())
}

fn temp_path_for(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(DEFAULT_SLOT);
    path.with_file_name(format!("{file_name}.tmp"))
}

pub fn encode_snapshot(state: &PlayerState) -> Result<String, PersistenceError> {
    serde_json::to_string_pretty(&state.serialize()).map_err(PersistenceError::Encode)
}

pub fn decode_snapshot(raw: &str) -> Result<Snapshot, PersistenceError> {
    serde_json::from_str(raw).map_err(PersistenceError::Decode)
}

/// Write the state to the slot. Failures are logged and reported as `false`;
/// the caller carries on with the in-memory state.
pub fn save_state(store: &mut dyn SaveStore, state: &PlayerState) -> bool {
    let result = encode_snapshot(state).and_then(|raw| store.write(&raw));
    match result {
        Ok(()) => {
            debug!(position = %state.position(), "state_saved");
            true
        }
        Err(error) => {
            warn!(error = %error, "save_failed");
            false
        }
    }
}

/// Rehydrate from the slot if it holds a readable snapshot. Returns whether
/// anything was applied; on any failure the state is left untouched.
pub fn load_state(store: &dyn SaveStore, state: &mut PlayerState) -> bool {
    let raw = match store.read() {
        Ok(Some(raw)) => raw,
        Ok(None) => return false,
        Err(error) => {
            warn!(error = %error, "load_failed");
            return false;
        }
    };

    match decode_snapshot(&raw) {
        Ok(snapshot) => {
            state.deserialize(&snapshot);
            debug!(position = %state.position(), "state_loaded");
            true
        }
        Err(error) => {
            warn!(error = %error, "load_failed");
            false
        }
    }
}
