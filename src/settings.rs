use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{MsarError, Result};
use crate::models::Aggregation;
use crate::writer::RetentionMode;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub output_dir: String,
    pub accounts_file: String,
    pub extracts_dir: String,
    pub retention: RetentionMode,
    pub extract_mac: bool,
    pub include_campaign_type: bool,
    pub aggregation: Aggregation,
    pub file_prefix: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            output_dir: "output".to_string(),
            accounts_file: config_dir().join("accounts.json").to_string_lossy().to_string(),
            extracts_dir: "downloads".to_string(),
            retention: RetentionMode::default(),
            extract_mac: false,
            include_campaign_type: true,
            aggregation: Aggregation::default(),
            file_prefix: "msar_campaign_performance".to_string(),
        }
    }
}

fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("msar")
}

pub fn settings_path() -> PathBuf {
    std::env::var_os("MSAR_SETTINGS")
        .map(PathBuf::from)
        .unwrap_or_else(|| config_dir().join("settings.json"))
}

pub fn load_settings() -> Settings {
    let path = settings_path();
    if path.exists() {
        let content = std::fs::read_to_string(&path).unwrap_or_default();
        serde_json::from_str(&content).unwrap_or_default()
    } else {
        Settings::default()
    }
}

pub fn save_settings(settings: &Settings) -> Result<PathBuf> {
    let path = settings_path();
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let json = serde_json::to_string_pretty(settings)
        .map_err(|e| MsarError::Settings(e.to_string()))?;
    std::fs::write(&path, format!("{json}\n"))?;
    Ok(path)
}

pub fn shellexpand_path(path: &str) -> String {
    if path.starts_with('~') {
        if let Some(home) = dirs::home_dir() {
            return path.replacen('~', &home.to_string_lossy(), 1);
        }
    }
    path.to_string()
}
