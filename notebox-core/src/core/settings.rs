//! Store configuration and settings persistence for Notebox.
//!
//! [`AppSettings`] is the user-editable part (where the database lives) and is
//! stored as JSON at an OS-appropriate location. [`StoreConfig`] is what
//! [`Storage::open`](super::storage::Storage::open) actually consumes.

use crate::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the local database.
pub const DEFAULT_STORE_NAME: &str = "notes";

/// Schema version the current code expects on disk.
pub const DEFAULT_STORE_VERSION: u32 = 1;

/// Persisted application settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    /// Directory holding the note database file.
    pub data_directory: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            data_directory: default_data_directory().to_string_lossy().to_string(),
        }
    }
}

/// Identifies which database to open and at which version.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreConfig {
    pub name: String,
    pub version: u32,
    pub data_directory: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_STORE_NAME.to_string(),
            version: DEFAULT_STORE_VERSION,
            data_directory: default_data_directory(),
        }
    }
}

impl StoreConfig {
    /// Config for the default `notes` store (version 1) inside `data_directory`.
    pub fn in_directory<P: AsRef<Path>>(data_directory: P) -> Self {
        Self {
            data_directory: data_directory.as_ref().to_path_buf(),
            ..Self::default()
        }
    }

    pub fn from_settings(settings: &AppSettings) -> Self {
        Self::in_directory(&settings.data_directory)
    }

    /// Path of the SQLite file backing this store: `<data_directory>/<name>.sqlite3`.
    pub fn database_path(&self) -> PathBuf {
        self.data_directory.join(format!("{}.sqlite3", self.name))
    }
}

/// Directory name used under the OS config and data directories.
const APP_DIR: &str = "notebox";

/// Returns the path to the settings JSON file: `<OS config dir>/notebox/settings.json`.
pub fn settings_file_path() -> PathBuf {
    app_dir(dirs::config_dir()).join("settings.json")
}

/// Returns the default data directory: `<OS data dir>/notebox`.
pub fn default_data_directory() -> PathBuf {
    app_dir(dirs::data_dir())
}

fn app_dir(base: Option<PathBuf>) -> PathBuf {
    base.unwrap_or_else(|| PathBuf::from(".")).join(APP_DIR)
}

/// Loads settings from disk; returns defaults if the file is missing or corrupt.
pub fn load_settings() -> AppSettings {
    load_settings_from(settings_file_path())
}

/// Saves settings to disk, creating parent directories as needed.
///
/// # Errors
///
/// Returns [`crate::NoteboxError::Io`] if the directory or file cannot be
/// written, or [`crate::NoteboxError::Json`] if serialization fails.
pub fn save_settings(settings: &AppSettings) -> Result<()> {
    save_settings_to(settings_file_path(), settings)
}

fn load_settings_from<P: AsRef<Path>>(path: P) -> AppSettings {
    match fs::read_to_string(path.as_ref()) {
        Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
            log::warn!(
                "Ignoring corrupt settings file {}: {e}",
                path.as_ref().display()
            );
            AppSettings::default()
        }),
        Err(_) => AppSettings::default(),
    }
}

fn save_settings_to<P: AsRef<Path>>(path: P, settings: &AppSettings) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(settings)?;
    fs::write(path, json)?;
    Ok(())
}
