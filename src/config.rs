//! Configuration handling for the TUI

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// User configuration for the TUI
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// Demo shown at startup: "contact", "signup" or "custom"
    pub start_demo: Option<String>,
    /// JSON schema file used by the "custom" demo
    pub schema_path: Option<PathBuf>,
    /// Show a reset button on every form
    pub show_reset: Option<bool>,
    /// Show the step indicator above wizards
    pub show_step_indicator: Option<bool>,
    /// Tracing filter used when RUST_LOG is not set
    pub log_filter: Option<String>,
}

impl AppConfig {
    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("io", "formflow", "formflow-tui")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Load configuration from the user config directory
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load configuration from an explicit file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: AppConfig = serde_json::from_str(&content)
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(config)
    }

    pub fn show_reset(&self) -> bool {
        self.show_reset.unwrap_or(true)
    }

    pub fn show_step_indicator(&self) -> bool {
        self.show_step_indicator.unwrap_or(true)
    }

    pub fn log_filter(&self) -> &str {
        self.log_filter.as_deref().unwrap_or("formflow_tui=info")
    }
}
