//! Profile store: the only state that survives between runs.
//!
//! Two string fields (resume, target role) in a key-value store. The store is loaded
//! once at startup and every change is written through immediately. There is no
//! schema version: unknown keys are preserved, missing keys fall back to defaults.

use std::collections::BTreeMap;
#[cfg(test)]
use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::errors::AppError;
use crate::models::samples::SAMPLE_RESUME;

pub const RESUME_KEY: &str = "jobsy_resume";
pub const ROLE_KEY: &str = "jobsy_role";

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), AppError>;
    fn remove(&mut self, key: &str) -> Result<(), AppError>;

    /// Where the entries live on disk, if anywhere.
    fn location(&self) -> Option<&Path> {
        None
    }
}

/// JSON object on disk, replaced atomically on every write.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    /// A missing file is an empty store. An unreadable one is logged and treated as empty
    /// so a corrupt profile never blocks the app.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, AppError> {
        let path = path.into();
        let entries = match std::fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!("Ignoring unreadable profile at {}: {e}", path.display());
                BTreeMap::new()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No profile at {}, starting empty", path.display());
                BTreeMap::new()
            }
            Err(e) => return Err(AppError::Io(e)),
        };
        Ok(Self { path, entries })
    }

    /// Writes `entries` to disk. Callers swap them in only after this succeeds.
    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<(), AppError> {
        let dir = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir)?;

        let mut tmp = NamedTempFile::new_in(&dir)?;
        serde_json::to_writer_pretty(&mut tmp, entries)?;
        tmp.write_all(b"\n")?;
        tmp.persist(&self.path)
            .map_err(|e| AppError::Store(format!("{}: {}", self.path.display(), e.error)))?;
        debug!("Profile written to {}", self.path.display());
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn location(&self) -> Option<&Path> {
        Some(&self.path)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), AppError> {
        let mut next = self.entries.clone();
        next.insert(key.to_string(), value.to_string());
        self.persist(&next)?;
        self.entries = next;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), AppError> {
        if !self.entries.contains_key(key) {
            return Ok(());
        }
        let mut next = self.entries.clone();
        next.remove(key);
        self.persist(&next)?;
        self.entries = next;
        Ok(())
    }
}

#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

#[cfg(test)]
impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), AppError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), AppError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// The user's persisted resume and target role, with built-in fallbacks.
#[derive(Debug)]
pub struct Profile<S: KeyValueStore> {
    store: S,
    resume: String,
    target_role: String,
}

impl<S: KeyValueStore> Profile<S> {
    /// Reads both fields once. A missing resume falls back to the sample resume,
    /// a missing role to an empty string.
    pub fn load(store: S) -> Self {
        let resume = store
            .get(RESUME_KEY)
            .unwrap_or_else(|| SAMPLE_RESUME.to_string());
        let target_role = store.get(ROLE_KEY).unwrap_or_default();
        info!(
            "Profile loaded (resume: {} chars, role set: {})",
            resume.len(),
            !target_role.is_empty()
        );
        Self {
            store,
            resume,
            target_role,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn resume(&self) -> &str {
        &self.resume
    }

    pub fn target_role(&self) -> &str {
        &self.target_role
    }

    pub fn is_sample_resume(&self) -> bool {
        self.resume == SAMPLE_RESUME
    }

    pub fn set_resume(&mut self, resume: impl Into<String>) -> Result<(), AppError> {
        let resume = resume.into();
        if resume == self.resume {
            return Ok(());
        }
        self.store.set(RESUME_KEY, &resume)?;
        self.resume = resume;
        Ok(())
    }

    pub fn set_target_role(&mut self, role: impl Into<String>) -> Result<(), AppError> {
        let role = role.into();
        if role == self.target_role {
            return Ok(());
        }
        self.store.set(ROLE_KEY, &role)?;
        self.target_role = role;
        Ok(())
    }

    /// Forgets both fields; the next load sees the fallbacks.
    pub fn clear(&mut self) -> Result<(), AppError> {
        self.store.remove(RESUME_KEY)?;
        self.store.remove(ROLE_KEY)?;
        self.resume = SAMPLE_RESUME.to_string();
        self.target_role = String::new();
        Ok(())
    }
}
