use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub const JPEG_QUALITY_ENV: &str = "EKTA_JPEG_QUALITY";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
/// Persisted application settings for Ekta.
pub struct AppConfig {
    /// Images larger than this box are scaled down before editing.
    pub display_max_width: u32,
    pub display_max_height: u32,
    pub jpeg_quality: u8,
    pub output_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            display_max_width: 800,
            display_max_height: 600,
            jpeg_quality: 90,
            output_dir: None,
        }
    }
}

impl AppConfig {
    /// Returns the user config file path, if a config directory is available.
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("ekta").join("config.toml"))
    }

    /// Loads config from disk plus environment overrides, falling back to defaults on any error.
    pub fn load() -> Self {
        let mut config = Self::config_path()
            .map(|path| Self::load_from(&path))
            .unwrap_or_default();
        if let Ok(raw) = std::env::var(JPEG_QUALITY_ENV) {
            config.apply_quality_override(&raw);
        }
        config
    }

    pub fn load_from(path: &Path) -> Self {
        let Ok(contents) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        match toml::from_str(&contents) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(path = %path.display(), %err, "ignoring invalid config");
                Self::default()
            }
        }
    }

    fn apply_quality_override(&mut self, raw: &str) {
        match raw.trim().parse::<u8>() {
            Ok(q) if (1..=100).contains(&q) => self.jpeg_quality = q,
            _ => tracing::warn!(value = raw, "{} must be 1-100; ignoring", JPEG_QUALITY_ENV),
        }
    }
}
