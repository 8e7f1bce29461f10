// Application settings
// Loaded from ~/.config/tasksheet/settings.json

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // Grid
    /// Empty rows offered below the data for entering new rows
    #[serde(rename = "grid.virtualRowPadding")]
    pub virtual_row_padding: usize,

    /// Reject date edits that do not parse as dates
    #[serde(rename = "grid.strictDates")]
    pub strict_dates: bool,

    // Import / export
    /// "," by default; "auto" sniffs the delimiter of imported .csv files
    #[serde(rename = "io.delimiter")]
    pub delimiter: String,

    #[serde(rename = "io.exportPrefix")]
    pub export_prefix: String,

    // Storage
    /// Overrides the platform data directory
    #[serde(rename = "storage.dir", skip_serializing_if = "Option::is_none")]
    pub storage_dir: Option<PathBuf>,

    // User
    /// Recorded as the creator of new sheets
    #[serde(rename = "user.displayName")]
    pub display_name: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            virtual_row_padding: 20,
            strict_dates: false,
            delimiter: ",".to_string(),
            export_prefix: "spreadsheet-export".to_string(),
            storage_dir: None,
            display_name: "Current User".to_string(),
        }
    }
}

impl Settings {
    /// Get the settings file path
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("tasksheet")
            .join("settings.json")
    }

    /// Directory the file store keeps sheets in
    pub fn data_dir(&self) -> PathBuf {
        match &self.storage_dir {
            Some(dir) => dir.clone(),
            None => dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("tasksheet"),
        }
    }

    /// Load settings from the default location, falling back to defaults
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    /// Load settings from `path`. A missing or unreadable file gives defaults.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(contents) => Self::parse(&contents).unwrap_or_else(|e| {
                log::warn!("settings: cannot parse {}: {}; using defaults", path.display(), e);
                Self::default()
            }),
            Err(e) => {
                log::warn!("settings: cannot read {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Parse settings JSON. Lines starting with `//` are comments.
    pub fn parse(contents: &str) -> Result<Self, serde_json::Error> {
        let cleaned: String = contents
            .lines()
            .filter(|line| !line.trim().starts_with("//"))
            .collect::<Vec<_>>()
            .join("\n");
        serde_json::from_str(&cleaned)
    }

    /// Save current settings to the default location
    pub fn save(&self) -> Result<(), String> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| e.to_string())?;
        }

        let json = serde_json::to_string_pretty(self).map_err(|e| e.to_string())?;

        fs::write(path, json).map_err(|e| e.to_string())
    }
}
