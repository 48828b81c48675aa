//! Application configuration management

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "scriptshot", "ScriptShot")
}

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Backend settings
    pub backend: BackendConfig,
    /// Publishing and thumbnail settings
    pub publish: PublishConfig,
    /// Editor settings
    pub editor: EditorConfig,
    /// UI settings
    pub ui: UiConfig,
}

/// Backend settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Root of the local backend; the platform data dir when unset
    pub data_dir: Option<PathBuf>,
}

/// Publishing settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PublishConfig {
    /// Generate thumbnails for block posts
    pub thumbnails_enabled: bool,
    /// Delay before rasterizing the preview, letting images and fonts settle
    pub thumbnail_delay_ms: u64,
    /// Thumbnails wider than this are scaled down
    pub thumbnail_max_width: u32,
    /// JPEG quality (1-100)
    pub thumbnail_quality: u8,
}

/// Editor-specific settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Font size in pixels
    pub font_size: f32,
    /// Font size of the code composer
    pub code_font_size: f32,
}

/// UI settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Theme (light/dark)
    pub theme: String,
    /// Sidebar width
    pub sidebar_width: f32,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            thumbnails_enabled: true,
            thumbnail_delay_ms: 500,
            thumbnail_max_width: 640,
            thumbnail_quality: 80,
        }
    }
}

impl PublishConfig {
    pub fn thumbnail_delay(&self) -> Duration {
        Duration::from_millis(self.thumbnail_delay_ms)
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            font_size: 14.0,
            code_font_size: 13.0,
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            theme: "dark".to_string(),
            sidebar_width: 220.0,
        }
    }
}

impl AppConfig {
    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Load configuration from disk
    pub fn load() -> Result<Self> {
        let path = Self::config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        Self::from_json(&content)
    }

    /// Parse configuration; absent fields take their defaults
    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).context("Failed to parse config")
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        // Ensure config directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, content)?;

        tracing::info!("Saved config to: {}", path.display());
        Ok(())
    }

    /// Get the local backend root
    pub fn data_dir(&self) -> PathBuf {
        self.backend.data_dir.clone().unwrap_or_else(|| {
            project_dirs()
                .map(|dirs| dirs.data_dir().to_path_buf())
                .unwrap_or_else(|| PathBuf::from("scriptshot-data"))
        })
    }

    pub fn dark_mode(&self) -> bool {
        !self.ui.theme.eq_ignore_ascii_case("light")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config = AppConfig::from_json(r#"{"publish": {"thumbnail_delay_ms": 1200}}"#).unwrap();
        assert_eq!(config.publish.thumbnail_delay(), Duration::from_millis(1200));
        assert!(config.publish.thumbnails_enabled);
        assert_eq!(config.publish.thumbnail_quality, 80);
        assert_eq!(config.ui, UiConfig::default());
    }

    #[test]
    fn test_data_dir_override() {
        let mut config = AppConfig::default();
        config.backend.data_dir = Some(PathBuf::from("/tmp/scriptshot"));
        assert_eq!(config.data_dir(), PathBuf::from("/tmp/scriptshot"));
    }

    #[test]
    fn test_theme() {
        let mut config = AppConfig::default();
        assert!(config.dark_mode());
        config.ui.theme = "Light".to_string();
        assert!(!config.dark_mode());
    }
}
