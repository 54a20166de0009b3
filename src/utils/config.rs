//! User preferences stored as `prefs.json` in the data directory

use crate::downloader::options::DownloadOptions;
use crate::utils::error::EasyError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, warn};
use uuid::Uuid;

/// Name of the preset shown when none has been saved
pub const DEFAULT_PRESET: &str = "Default";

/// Persistent preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    /// Folder used for the last download
    pub last_folder: Option<String>,

    /// Shell command run after every finished job
    pub post_hook: Option<String>,

    /// Show a desktop notification when a job finishes
    pub notifications: bool,

    /// Named option sets
    pub presets: BTreeMap<String, DownloadOptions>,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            last_folder: None,
            post_hook: None,
            notifications: true,
            presets: BTreeMap::new(),
        }
    }
}

impl Preferences {
    /// Load preferences, falling back to defaults when the file is missing or unreadable
    pub fn load(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                debug!("No preferences at {}: {}", path.display(), e);
                return Self::default();
            }
        };

        match serde_json::from_str(&content) {
            Ok(prefs) => prefs,
            Err(e) => {
                warn!("Ignoring corrupt preferences {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Write preferences atomically (temp file + rename).
    /// Each save has its own temp file, so concurrent saves never share one;
    /// the last rename wins.
    pub async fn save(&self, path: &Path) -> Result<(), EasyError> {
        let json = serde_json::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let tmp = path.with_extension(format!("json.{}.tmp", Uuid::new_v4().simple()));
        if let Err(e) = tokio::fs::write(&tmp, json).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e.into());
        }
        if let Err(e) = tokio::fs::rename(&tmp, path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e.into());
        }
        Ok(())
    }

    /// Names for the preset picker
    pub fn preset_names(&self) -> Vec<String> {
        if self.presets.is_empty() {
            vec![DEFAULT_PRESET.to_string()]
        } else {
            self.presets.keys().cloned().collect()
        }
    }

    pub fn save_preset(&mut self, name: &str, options: DownloadOptions) -> Result<(), EasyError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(EasyError::InvalidInput(
                "preset name cannot be empty".to_string(),
            ));
        }
        self.presets.insert(name.to_string(), options);
        Ok(())
    }

    /// Options for a preset; the unsaved default preset resets the form
    pub fn preset(&self, name: &str) -> Option<DownloadOptions> {
        match self.presets.get(name) {
            Some(options) => Some(options.clone()),
            None if name == DEFAULT_PRESET => Some(DownloadOptions::default()),
            None => None,
        }
    }
}
