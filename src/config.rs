use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::engine::schedule::DuePolicy;

pub const MAX_FEEDBACK_PAUSE_MS: u64 = 10_000;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_data_file")]
    pub data_file: String,
    #[serde(default = "default_feedback_pause_ms")]
    pub feedback_pause_ms: u64,
    #[serde(default = "default_clear_screen")]
    pub clear_screen: bool,
    #[serde(default)]
    pub due_policy: DuePolicy,
    #[serde(default = "default_autosave")]
    pub autosave: bool,
}

fn default_data_file() -> String {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("recite")
        .join("library.json")
        .to_string_lossy()
        .to_string()
}
fn default_feedback_pause_ms() -> u64 {
    1500
}
fn default_clear_screen() -> bool {
    true
}
fn default_autosave() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
            feedback_pause_ms: default_feedback_pause_ms(),
            clear_screen: default_clear_screen(),
            due_policy: DuePolicy::default(),
            autosave: default_autosave(),
        }
    }
}

impl Config {
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            let mut config: Config = toml::from_str(&content)
                .with_context(|| format!("parsing {}", path.display()))?;
            config.validate();
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Load `path`, or write the defaults there on first run so the file can
    /// be edited.
    pub fn load_or_init(path: &Path) -> Result<Self> {
        if path.exists() {
            return Self::load_from(path);
        }
        let config = Config::default();
        config.save_to(path)?;
        log::info!("wrote default config to {}", path.display());
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("recite")
            .join("config.toml")
    }

    /// Clamp values a hand-edited file may have pushed out of range.
    pub fn validate(&mut self) {
        self.feedback_pause_ms = self.feedback_pause_ms.min(MAX_FEEDBACK_PAUSE_MS);
        if self.data_file.trim().is_empty() {
            self.data_file = default_data_file();
        }
    }
}
