//! Resumable cursor for the generation driver.
//!
//! The cursor is the index of the last item that was completed and durably
//! written. On disk it is `{"last_completed": <index>}`; a missing file, a
//! missing field or a negative value all mean "nothing completed yet".

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::DriverError;

/// Persists and retrieves the last completed item index.
pub trait CheckpointStore: Send + Sync {
    /// The last completed index, or `None` for a fresh start.
    fn load(&self) -> Result<Option<usize>, DriverError>;

    /// Records `index` as the last completed item.
    fn save(&self, index: usize) -> Result<(), DriverError>;

    /// Forgets any saved progress.
    fn clear(&self) -> Result<(), DriverError>;
}

#[derive(Debug, Serialize, Deserialize)]
struct CheckpointFile {
    #[serde(default)]
    last_completed: Option<i64>,
}

/// Checkpoint stored as a small JSON file, replaced atomically on save.
#[derive(Debug, Clone)]
pub struct JsonFileCheckpoint {
    path: PathBuf,
}

impl JsonFileCheckpoint {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn error(&self, reason: impl std::fmt::Display) -> DriverError {
        DriverError::Checkpoint {
            path: self.path.display().to_string(),
            reason: reason.to_string(),
        }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "checkpoint".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl CheckpointStore for JsonFileCheckpoint {
    fn load(&self) -> Result<Option<usize>, DriverError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.error(e)),
        };

        let file: CheckpointFile = serde_json::from_str(&content).map_err(|e| self.error(e))?;
        Ok(file
            .last_completed
            .and_then(|index| usize::try_from(index).ok()))
    }

    fn save(&self, index: usize) -> Result<(), DriverError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.error(e))?;
        }

        let body = serde_json::to_string(&CheckpointFile {
            last_completed: Some(index as i64),
        })?;

        let tmp = self.temp_path();
        {
            let mut file = fs::File::create(&tmp).map_err(|e| self.error(e))?;
            file.write_all(body.as_bytes()).map_err(|e| self.error(e))?;
            file.sync_all().map_err(|e| self.error(e))?;
        }
        fs::rename(&tmp, &self.path).map_err(|e| self.error(e))?;

        tracing::trace!(path = %self.path.display(), index, "Saved checkpoint");
        Ok(())
    }

    fn clear(&self) -> Result<(), DriverError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.error(e)),
        }
    }
}

/// Checkpoint held in memory, for tests and dry runs.
#[derive(Debug, Default)]
pub struct InMemoryCheckpoint {
    last_completed: Mutex<Option<usize>>,
}

impl InMemoryCheckpoint {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_after(index: usize) -> Self {
        Self {
            last_completed: Mutex::new(Some(index)),
        }
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<usize>> {
        self.last_completed
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl CheckpointStore for InMemoryCheckpoint {
    fn load(&self) -> Result<Option<usize>, DriverError> {
        Ok(*self.slot())
    }

    fn save(&self, index: usize) -> Result<(), DriverError> {
        *self.slot() = Some(index);
        Ok(())
    }

    fn clear(&self) -> Result<(), DriverError> {
        *self.slot() = None;
        Ok(())
    }
}
