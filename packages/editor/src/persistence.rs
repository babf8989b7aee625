//! Best-effort project persistence keyed by project id.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use blockpage_document::{to_json, Project, SerializationError};
use tracing::debug;

use crate::errors::PersistError;

pub trait ProjectStorage: Send + fmt::Debug {
    /// Store the project under its id, replacing any previous copy
    fn save(&self, project: &Project) -> Result<(), PersistError>;

    /// Raw JSON of a stored project
    fn load(&self, project_id: &str) -> Result<String, PersistError>;
}

fn encode(project: &Project) -> Result<String, PersistError> {
    to_json(project).map_err(|e| match e {
        SerializationError::Json(e) => PersistError::Serialization(e),
        other => PersistError::Unavailable(other.to_string()),
    })
}

/// Ids become file names, so they may not reach outside the storage dir
fn check_key(project_id: &str) -> Result<(), PersistError> {
    let invalid = project_id.is_empty()
        || project_id.contains(|c: char| c == '/' || c == '\\')
        || project_id == "."
        || project_id == "..";
    if invalid {
        return Err(PersistError::InvalidKey(project_id.to_string()));
    }
    Ok(())
}

/// One `<dir>/<projectId>.json` file per project
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, project_id: &str) -> Result<PathBuf, PersistError> {
        check_key(project_id)?;
        Ok(self.dir.join(format!("{}.json", project_id)))
    }
}

impl ProjectStorage for FileStorage {
    fn save(&self, project: &Project) -> Result<(), PersistError> {
        let path = self.path_for(&project.id)?;
        let json = encode(project)?;
        fs::create_dir_all(&self.dir)?;
        fs::write(&path, json)?;
        debug!(path = %path.display(), "Saved project");
        Ok(())
    }

    fn load(&self, project_id: &str) -> Result<String, PersistError> {
        let path = self.path_for(project_id)?;
        if !path.exists() {
            return Err(PersistError::NotFound(project_id.to_string()));
        }
        Ok(fs::read_to_string(path)?)
    }
}

/// In-process storage. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    projects: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.projects.lock().map(|p| p.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ProjectStorage for MemoryStorage {
    fn save(&self, project: &Project) -> Result<(), PersistError> {
        check_key(&project.id)?;
        let json = encode(project)?;
        let mut projects = self
            .projects
            .lock()
            .map_err(|e| PersistError::Unavailable(e.to_string()))?;
        projects.insert(project.id.clone(), json);
        Ok(())
    }

    fn load(&self, project_id: &str) -> Result<String, PersistError> {
        let projects = self
            .projects
            .lock()
            .map_err(|e| PersistError::Unavailable(e.to_string()))?;
        projects
            .get(project_id)
            .cloned()
            .ok_or_else(|| PersistError::NotFound(project_id.to_string()))
    }
}
