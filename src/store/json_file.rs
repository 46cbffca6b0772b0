use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde_json::Value;

use super::migrate::upgrade_ai_config;
use super::{AppState, StorageError, StoragePort};
use crate::config;
use crate::models::Patient;

/// `AppState` as pretty JSON in a single file, replaced atomically on save.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `config::state_file()`.
    pub fn at_default_location() -> Self {
        Self::new(config::state_file())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sibling copy written before a partially unreadable state is replaced.
    pub fn backup_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".bak");
        self.path.with_file_name(name)
    }

    fn back_up(&self) {
        let backup = self.backup_path();
        match std::fs::copy(&self.path, &backup) {
            Ok(_) => tracing::warn!(backup = %backup.display(), "Stored state backed up"),
            Err(e) => tracing::warn!(error = %e, "Could not back up stored state"),
        }
    }

    fn decode(&self, raw: Value) -> Option<AppState> {
        let version = raw.get("version").and_then(Value::as_str);
        if version != Some(config::STATE_VERSION) {
            tracing::warn!(
                path = %self.path.display(),
                found = ?version,
                expected = config::STATE_VERSION,
                "Discarding stored state with a different version"
            );
            return None;
        }

        let patients: Vec<Patient> = match raw.get("patients") {
            None | Some(Value::Null) => Vec::new(),
            Some(list) => match serde_json::from_value(list.clone()) {
                Ok(patients) => patients,
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        "Stored patients are unreadable, keeping AI settings only"
                    );
                    self.back_up();
                    Vec::new()
                }
            },
        };

        let now = Utc::now();
        let updated_at = raw
            .get("updated_at")
            .and_then(|v| serde_json::from_value(v.clone()).ok())
            .unwrap_or(now);

        Some(AppState {
            version: config::STATE_VERSION.to_string(),
            updated_at,
            patients,
            config: upgrade_ai_config(raw.get("config").unwrap_or(&Value::Null), now),
        })
    }
}

impl StoragePort for JsonFileStore {
    fn load(&self) -> Result<Option<AppState>, StorageError> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let raw: Value = match serde_json::from_str(&text) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Stored state is not valid JSON");
                return Ok(None);
            }
        };

        Ok(self.decode(raw))
    }

    fn save(&self, state: &AppState) -> Result<(), StorageError> {
        let dir = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir)?;

        let mut tmp = tempfile::NamedTempFile::new_in(&dir)?;
        serde_json::to_writer_pretty(&mut tmp, state)?;
        tmp.flush()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;

        tracing::debug!(path = %self.path.display(), patients = state.patients.len(), "State saved");
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
