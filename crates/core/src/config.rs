//! Config persistence for display settings and the clock list.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::clock::DisplaySettings;
use crate::offset::UtcOffset;
use crate::registry::ClockRegistry;

/// Directory under the user config dir holding the config file.
pub const DEFAULT_CONFIG_DIR: &str = "wurld";

/// On-disk document. The whole file is rewritten on every save.
#[derive(Debug, Serialize, Deserialize)]
struct ConfigDocument {
    #[serde(default)]
    use_24h: bool,
    #[serde(default = "default_show_weekday")]
    show_weekday: bool,
    #[serde(default)]
    clocks: Vec<ClockEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ClockEntry {
    label: String,
    offset: UtcOffset,
}

fn default_show_weekday() -> bool {
    true
}

/// Loads and saves the config document at a fixed path.
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    /// Create a store backed by the given file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Default location under the user's config directory.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(DEFAULT_CONFIG_DIR)
            .join("config.json")
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load persisted state, `Ok(None)` when no config file exists yet.
    ///
    /// Corrupt content is an `Err`; the caller decides whether to fall back
    /// to [`default_state`]. Duplicate labels in the file keep their first
    /// occurrence.
    pub fn load(&self) -> Result<Option<(DisplaySettings, ClockRegistry)>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read {}", self.path.display()))?;
        let document: ConfigDocument = serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse {}", self.path.display()))?;

        let settings = DisplaySettings {
            use_24h: document.use_24h,
            show_weekday: document.show_weekday,
        };
        let mut registry = ClockRegistry::new();
        for entry in document.clocks {
            if !registry.add(&entry.label, entry.offset) {
                warn!(label = %entry.label, "skipping duplicate clock label in config");
            }
        }
        Ok(Some((settings, registry)))
    }

    /// Rewrite the config file, creating parent directories as needed.
    pub fn save(&self, settings: &DisplaySettings, registry: &ClockRegistry) -> Result<()> {
        let document = ConfigDocument {
            use_24h: settings.use_24h,
            show_weekday: settings.show_weekday,
            clocks: registry
                .clocks()
                .iter()
                .map(|clock| ClockEntry {
                    label: clock.label.clone(),
                    offset: clock.offset,
                })
                .collect(),
        };

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let serialised =
            serde_json::to_string_pretty(&document).context("failed to serialise config")?;
        fs::write(&self.path, serialised)
            .with_context(|| format!("failed to write {}", self.path.display()))
    }
}

/// State used when no config exists or it cannot be read: a single clock
/// named `local` tracking host time, 12-hour display, weekday shown.
pub fn default_state() -> (DisplaySettings, ClockRegistry) {
    let mut registry = ClockRegistry::new();
    registry.add("local", UtcOffset::Local);
    (DisplaySettings::default(), registry)
}
