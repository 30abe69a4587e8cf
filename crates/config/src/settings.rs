use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use platelunch_dedup::LinkTemplate;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSettings {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Worksheet to read; the first one when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sheet: Option<String>,
}

impl Default for FileSettings {
    fn default() -> Self {
        Self {
            input: PathBuf::from("input.xlsx"),
            output: PathBuf::from("output.xlsx"),
            sheet: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnSettings {
    pub name: String,
    pub phone: String,
    pub link: String,
}

impl Default for ColumnSettings {
    fn default() -> Self {
        Self {
            name: "COMPANY_name".into(),
            phone: "Company_Phone".into(),
            link: "Instagram_link".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightSettings {
    /// Hex RGB fill for partial-duplicate phone cells, e.g. "FF0000".
    pub fill: String,
    pub bold: bool,
    /// Display text of hyperlink cells.
    pub link_text: String,
}

impl Default for HighlightSettings {
    fn default() -> Self {
        Self {
            fill: "FF0000".into(),
            bold: true,
            link_text: "Instagram".into(),
        }
    }
}

impl HighlightSettings {
    /// Fill colour as 0xRRGGBB. Accepts an optional leading '#'.
    pub fn fill_rgb(&self) -> Result<u32, ConfigError> {
        let hex = self.fill.trim().trim_start_matches('#');
        if hex.len() != 6 {
            return Err(ConfigError::Validation(format!(
                "highlight.fill must be 6 hex digits, got \"{}\"",
                self.fill
            )));
        }
        u32::from_str_radix(hex, 16).map_err(|_| {
            ConfigError::Validation(format!("highlight.fill is not hex: \"{}\"", self.fill))
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub files: FileSettings,
    pub columns: ColumnSettings,
    pub links: LinkTemplate,
    pub highlight: HighlightSettings,
}

impl Settings {
    /// Default settings file path
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("platelunch")
            .join("config.toml")
    }

    /// Parse and validate a TOML document.
    pub fn from_toml(s: &str) -> Result<Self, ConfigError> {
        let settings: Self = toml::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Write(e.to_string()))
    }

    /// Load from an explicit path (must exist) or the default path
    /// (defaults when absent).
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::load_from(path),
            None => {
                let path = Self::config_path();
                if path.exists() {
                    Self::load_from(&path)
                } else {
                    tracing::debug!("no settings at {}, using defaults", path.display());
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)
            .map_err(|e| ConfigError::Read(format!("{}: {e}", path.display())))?;
        let settings = Self::from_toml(&contents)?;
        tracing::debug!("loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Write these settings to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Write(e.to_string()))?;
        }
        fs::write(path, self.to_toml()?).map_err(|e| ConfigError::Write(e.to_string()))
    }

    /// Column names are compared ignoring ASCII case, since header lookup
    /// falls back to a case-insensitive match.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let cols = &self.columns;
        let mut seen = HashSet::new();
        for (key, value) in [("name", &cols.name), ("phone", &cols.phone), ("link", &cols.link)] {
            if value.trim().is_empty() {
                return Err(ConfigError::Validation(format!("columns.{key} must not be empty")));
            }
            if !seen.insert(value.trim().to_ascii_lowercase()) {
                return Err(ConfigError::Validation(format!(
                    "columns.{key} repeats column \"{value}\""
                )));
            }
        }
        if self.links.base.trim().is_empty() {
            return Err(ConfigError::Validation("links.base must not be empty".into()));
        }
        if self.files.input.as_os_str().is_empty() || self.files.output.as_os_str().is_empty() {
            return Err(ConfigError::Validation("files.input and files.output are required".into()));
        }
        self.highlight.fill_rgb()?;
        Ok(())
    }
}
