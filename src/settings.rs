//! User settings stored as settings.json in the app data directory

use crate::constants::SEARCH_DEBOUNCE_MS;
use crate::i18n::Locale;
use crate::types::ViewMode;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // Window geometry
    pub window_x: Option<f32>,
    pub window_y: Option<f32>,
    pub window_w: Option<f32>,
    pub window_h: Option<f32>,

    // View
    pub view_mode: ViewMode,
    pub large_thumbnails: bool,
    pub locale: Locale,

    // Paths
    pub download_path: Option<String>,
    pub gallery_path: Option<String>,
    pub manifest: Option<String>,
    /// Extra font with CJK coverage, loaded as a fallback
    pub font_path: Option<String>,

    // Behaviour
    pub debounce_ms: u64,
    pub user_agent: Option<String>,
    pub share_available: Option<bool>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            window_x: None,
            window_y: None,
            window_w: None,
            window_h: None,
            view_mode: ViewMode::Grid,
            large_thumbnails: false,
            locale: Locale::default(),
            download_path: None,
            gallery_path: None,
            manifest: None,
            font_path: None,
            debounce_ms: SEARCH_DEBOUNCE_MS,
            user_agent: None,
            share_available: None,
        }
    }
}

impl Settings {
    pub fn load(data_dir: &Path) -> Self {
        let path = data_dir.join("settings.json");
        match std::fs::read_to_string(&path) {
            Ok(s) => match serde_json::from_str(&s) {
                Ok(settings) => {
                    debug!(path = %path.display(), "Settings loaded");
                    settings
                }
                Err(e) => {
                    warn!(error = %e, "Failed to parse settings, using defaults");
                    Self::default()
                }
            },
            Err(_) => {
                debug!("No settings file found, using defaults");
                Self::default()
            }
        }
    }

    pub fn save(&self, data_dir: &Path) {
        let path = data_dir.join("settings.json");
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(e) = std::fs::write(&path, json) {
                    warn!(error = %e, "Failed to save settings");
                }
            }
            Err(e) => warn!(error = %e, "Failed to serialize settings"),
        }
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn download_path_or_default(&self) -> PathBuf {
        self.download_path
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| {
                dirs::download_dir()
                    .or_else(dirs::home_dir)
                    .unwrap_or_else(|| PathBuf::from("."))
            })
    }

    /// Where "saved to gallery" files go
    pub fn gallery_path_or_default(&self) -> PathBuf {
        self.gallery_path
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| {
                dirs::picture_dir()
                    .unwrap_or_else(|| self.download_path_or_default())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load(dir.path());
        assert_eq!(settings.debounce_ms, 300);
        assert_eq!(settings.view_mode, ViewMode::Grid);
        assert_eq!(settings.locale, Locale::ZhCn);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("settings.json"),
            r#"{"view_mode": "list", "locale": "en", "download_path": "/tmp/pics"}"#,
        )
        .unwrap();
        let settings = Settings::load(dir.path());
        assert_eq!(settings.view_mode, ViewMode::List);
        assert_eq!(settings.locale, Locale::En);
        assert_eq!(settings.download_path_or_default(), PathBuf::from("/tmp/pics"));
        assert_eq!(settings.debounce(), Duration::from_millis(300));
    }

    #[test]
    fn corrupt_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("settings.json"), "{ nope").unwrap();
        assert!(Settings::load(dir.path()).manifest.is_none());
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings {
            manifest: Some("https://example.com/images_data.json".into()),
            share_available: Some(true),
            ..Default::default()
        };
        settings.save(dir.path());
        let loaded = Settings::load(dir.path());
        assert_eq!(loaded.manifest, settings.manifest);
        assert_eq!(loaded.share_available, Some(true));
    }
}
