//! JSON state files.

use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use roster_core::RosterState;
use serde::{Deserialize, Serialize};

use crate::error::{PersistenceError, Result};
use crate::store::StateStore;

/// Envelope version written by this build.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

/// On-disk layout of a state file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateFile {
    pub schema_version: u32,
    /// RFC 3339 timestamp of the last save.
    pub saved_at: String,
    pub state: RosterState,
}

impl StateFile {
    pub fn new(state: RosterState) -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            saved_at: Utc::now().to_rfc3339(),
            state,
        }
    }

    pub fn saved_at(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.saved_at)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }
}

/// Read before the full body so a newer file is refused by version rather
/// than failing on an unknown shape.
#[derive(Deserialize)]
struct Header {
    schema_version: Option<u32>,
}

/// Stores state in one JSON file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the whole envelope. `Ok(None)` when the file does not exist.
    pub fn read(&self) -> Result<Option<StateFile>> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "no state file yet");
                return Ok(None);
            }
            Err(source) => {
                return Err(PersistenceError::Io {
                    operation: "read",
                    path: self.path.clone(),
                    source,
                });
            }
        };
        let file = parse_state_file(&text, &self.path)?;
        tracing::info!(
            path = %self.path.display(),
            players = file.state.roster.players.len(),
            warnings = file.state.ledger.len(),
            "loaded roster state"
        );
        Ok(Some(file))
    }

    /// Write `state` with a fresh timestamp via temp file and rename.
    pub fn write(&self, state: &RosterState) -> Result<StateFile> {
        let file = StateFile::new(state.clone());
        let mut bytes = serde_json::to_vec_pretty(&file)
            .map_err(|source| PersistenceError::Serialization { source })?;
        bytes.push(b'\n');

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|source| PersistenceError::Io {
                operation: "create directory",
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let temp_path = self.path.with_extension("json.tmp");
        let written = write_temp(&temp_path, &bytes).and_then(|()| {
            fs::rename(&temp_path, &self.path).map_err(|source| {
                PersistenceError::AtomicWriteFailed {
                    temp_path: temp_path.clone(),
                    target_path: self.path.clone(),
                    source,
                }
            })
        });
        if let Err(err) = written {
            if let Err(cleanup) = fs::remove_file(&temp_path)
                && cleanup.kind() != ErrorKind::NotFound
            {
                tracing::warn!(
                    path = %temp_path.display(),
                    error = %cleanup,
                    "could not remove temp file"
                );
            }
            return Err(err);
        }

        tracing::info!(path = %self.path.display(), "saved roster state");
        Ok(file)
    }
}

impl StateStore for JsonFileStore {
    fn load(&self) -> Result<Option<RosterState>> {
        Ok(self.read()?.map(|file| file.state))
    }

    fn save(&mut self, state: &RosterState) -> Result<()> {
        self.write(state).map(|_| ())
    }
}

/// Create `path`, write `bytes` and flush them to disk.
fn write_temp(path: &Path, bytes: &[u8]) -> Result<()> {
    let mut handle = File::create(path).map_err(|source| PersistenceError::Io {
        operation: "create",
        path: path.to_path_buf(),
        source,
    })?;
    handle.write_all(bytes).map_err(|source| PersistenceError::Io {
        operation: "write",
        path: path.to_path_buf(),
        source,
    })?;
    handle.sync_all().map_err(|source| PersistenceError::Io {
        operation: "sync",
        path: path.to_path_buf(),
        source,
    })
}

fn parse_state_file(text: &str, path: &Path) -> Result<StateFile> {
    let header: Header =
        serde_json::from_str(text).map_err(|err| PersistenceError::InvalidFormat {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })?;
    let Some(version) = header.schema_version else {
        return Err(PersistenceError::InvalidFormat {
            path: path.to_path_buf(),
            reason: "missing schema_version".to_string(),
        });
    };
    if version > CURRENT_SCHEMA_VERSION {
        return Err(PersistenceError::UnsupportedVersion {
            found: version,
            max_supported: CURRENT_SCHEMA_VERSION,
            path: path.to_path_buf(),
        });
    }
    serde_json::from_str(text).map_err(|source| PersistenceError::Deserialization {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_is_none() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("absent.json"));
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn not_an_object_is_invalid() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("text.json");
        fs::write(&path, r#""just a string""#).unwrap();
        let result = JsonFileStore::new(&path).load();
        assert!(matches!(result, Err(PersistenceError::InvalidFormat { .. })));
    }

    #[test]
    fn newer_version_is_refused() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("future.json");
        fs::write(&path, r#"{ "schema_version": 99, "state": "whatever" }"#).unwrap();
        let err = JsonFileStore::new(&path).load().unwrap_err();
        assert!(matches!(
            err,
            PersistenceError::UnsupportedVersion { found: 99, .. }
        ));
        assert!(err.suggestion().is_some());
    }

    #[test]
    fn write_leaves_no_temp_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("roster.json");
        let file = JsonFileStore::new(&path).write(&RosterState::default()).unwrap();
        assert!(path.exists());
        assert!(!path.with_extension("json.tmp").exists());
        assert!(file.saved_at().is_some());
    }

    #[test]
    fn failed_rename_removes_temp_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("roster.json");
        // A non-empty directory in the way makes the final rename fail.
        fs::create_dir(&path).unwrap();
        fs::write(path.join("keep"), "x").unwrap();

        let err = JsonFileStore::new(&path)
            .write(&RosterState::default())
            .unwrap_err();
        assert!(matches!(err, PersistenceError::AtomicWriteFailed { .. }));
        assert!(!path.with_extension("json.tmp").exists());
        assert!(path.join("keep").exists());
    }
}
