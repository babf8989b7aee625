use crate::config::Config;
use anyhow::{Context, Result};
use blockpage_editor::{FileStorage, Store, StoreConfig};
use std::fs;
use std::path::PathBuf;
use tracing::debug;

/// The project file plus the config that located it
pub struct ProjectFile {
    pub config: Config,
    pub path: PathBuf,
}

impl ProjectFile {
    pub fn locate(cwd: &str) -> Result<Self> {
        let config = Config::load(cwd)?;
        let path = config.get_project_path(cwd);
        Ok(Self { config, path })
    }

    /// Load the project into a fresh Store
    pub fn open(&self, cwd: &str) -> Result<Store> {
        let source = fs::read_to_string(&self.path).with_context(|| {
            format!(
                "Cannot read project file {} (run `blockpage init` first)",
                self.path.display()
            )
        })?;

        let store_config = StoreConfig {
            history: self.config.history,
            persist_on_mutation: false,
        };
        let mut store = Store::new(store_config);
        if let Some(dir) = self.config.get_storage_dir(cwd) {
            store = store.with_storage(FileStorage::new(dir));
        }

        store
            .load_project(&source)
            .with_context(|| format!("Invalid project file {}", self.path.display()))?;

        debug!(path = %self.path.display(), project_id = %store.project().id, "Opened project");
        Ok(store)
    }

    /// Write the Store's project back, and to storage when configured
    pub fn save(&self, store: &Store) -> Result<()> {
        let json = store.to_json()?;
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, json)
            .with_context(|| format!("Cannot write project file {}", self.path.display()))?;

        store.save()?;
        Ok(())
    }
}
