use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::store::fs::{BOOKS_FILE, ISSUED_FILE, MEMBERS_FILE};

const CONFIG_FILENAME: &str = "config.json";

/// Configuration for libris, stored as `config.json` in the data
/// directory. Only the document file names are configurable; the directory
/// itself comes from the CLI.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LibrisConfig {
    /// File name of the books document.
    #[serde(default = "default_books_file")]
    pub books_file: String,

    /// File name of the members document.
    #[serde(default = "default_members_file")]
    pub members_file: String,

    /// File name of the issued-books document.
    #[serde(default = "default_issued_file")]
    pub issued_file: String,
}

fn default_books_file() -> String {
    BOOKS_FILE.to_string()
}

fn default_members_file() -> String {
    MEMBERS_FILE.to_string()
}

fn default_issued_file() -> String {
    ISSUED_FILE.to_string()
}

impl Default for LibrisConfig {
    fn default() -> Self {
        Self {
            books_file: default_books_file(),
            members_file: default_members_file(),
            issued_file: default_issued_file(),
        }
    }
}

impl LibrisConfig {
    /// Load config from the given directory, or return defaults if not found.
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)?;
        let config: LibrisConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save config to the given directory.
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();
        if !config_dir.exists() {
            fs::create_dir_all(config_dir)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self)?;
        fs::write(config_path, content)?;
        Ok(())
    }
}
