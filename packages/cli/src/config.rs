use blockpage_editor::HistoryConfig;
use blockpage_export::ExportFormat;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_CONFIG_NAME: &str = "blockpage.config.json";

/// blockpage configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Project document, relative to the config file
    #[serde(default = "default_project_file")]
    pub project_file: String,

    /// Export output directory
    #[serde(default = "default_out_dir")]
    pub out_dir: String,

    /// Formats written by `blockpage export` when none are given
    #[serde(default = "default_emit")]
    pub emit: Vec<ExportFormat>,

    /// Also keep a copy of every saved project here, keyed by project id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_dir: Option<String>,

    #[serde(default)]
    pub history: HistoryConfig,
}

fn default_project_file() -> String {
    "project.json".to_string()
}

fn default_out_dir() -> String {
    "dist".to_string()
}

fn default_emit() -> Vec<ExportFormat> {
    vec![ExportFormat::Html]
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &str) -> anyhow::Result<Self> {
        let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            // Return default config if none exists
            Ok(Config::default())
        }
    }

    pub fn get_project_path(&self, cwd: &str) -> PathBuf {
        PathBuf::from(cwd).join(&self.project_file)
    }

    pub fn get_out_dir(&self, cwd: &str) -> PathBuf {
        PathBuf::from(cwd).join(&self.out_dir)
    }

    pub fn get_storage_dir(&self, cwd: &str) -> Option<PathBuf> {
        self.storage_dir.as_ref().map(|dir| PathBuf::from(cwd).join(dir))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            project_file: default_project_file(),
            out_dir: default_out_dir(),
            emit: default_emit(),
            storage_dir: None,
            history: HistoryConfig::default(),
        }
    }
}
