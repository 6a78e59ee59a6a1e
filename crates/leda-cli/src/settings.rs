//! User settings read from a TOML file.
//!
//! ```toml
//! [autosave]
//! enabled = true
//! interval_seconds = 30
//!
//! [persistence]
//! write_mode = "atomic"
//! ```

use std::path::{Path, PathBuf};

use leda_autosave::AutoSaveConfig;
use leda_persistence::WriteMode;
use serde::{Deserialize, Serialize};

/// Settings for an editing session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub autosave: AutoSaveConfig,
    pub persistence: PersistenceSettings,
}

/// How documents are written to disk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistenceSettings {
    pub write_mode: WriteMode,
}

impl Settings {
    /// Load settings from the default location.
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    /// Load settings from a specific path.
    ///
    /// A missing file yields defaults. An unreadable or invalid file also
    /// yields defaults, with a warning. An out-of-range auto-save interval
    /// resets only the `[autosave]` section.
    pub fn load_from(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No settings at {}, using defaults", path.display());
                return Self::default();
            }
            Err(e) => {
                tracing::warn!("Failed to read settings {}: {e}", path.display());
                return Self::default();
            }
        };

        match toml::from_str::<Self>(&content) {
            Ok(mut settings) => {
                if let Err(e) = settings.autosave.validate() {
                    tracing::warn!("Ignoring [autosave] in {}: {e}", path.display());
                    settings.autosave = AutoSaveConfig::default();
                }
                tracing::debug!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                tracing::warn!("Ignoring invalid settings {}: {e}", path.display());
                Self::default()
            }
        }
    }

    /// Apply command-line overrides on top of the file settings.
    pub fn with_overrides(mut self, autosave: bool, interval: Option<u64>) -> Self {
        if autosave {
            self.autosave.enabled = true;
        }
        if let Some(seconds) = interval {
            self.autosave.interval_seconds = seconds;
        }
        self
    }

    /// Get the default config file path.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("org", "Leda", "leda")
            .map(|dirs| dirs.config_dir().join("settings.toml"))
            .unwrap_or_else(|| PathBuf::from("settings.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_load_full_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        fs::write(
            &path,
            "[autosave]\nenabled = true\ninterval_seconds = 30\n\n\
             [persistence]\nwrite_mode = \"atomic\"\n",
        )
        .unwrap();

        let settings = Settings::load_from(&path);
        assert!(settings.autosave.enabled);
        assert_eq!(settings.autosave.interval_seconds, 30);
        assert_eq!(settings.persistence.write_mode, WriteMode::Atomic);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        fs::write(&path, "[autosave]\nenabled = true\n").unwrap();

        let settings = Settings::load_from(&path);
        assert!(settings.autosave.enabled);
        assert_eq!(settings.autosave.interval_seconds, 5);
        assert_eq!(settings.persistence.write_mode, WriteMode::Direct);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let settings = Settings::load_from(&dir.path().join("absent.toml"));
        assert_eq!(settings, Settings::default());
        assert!(!settings.autosave.enabled);
    }

    #[test]
    fn test_invalid_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        fs::write(&path, "[autosave\nenabled = maybe").unwrap();

        assert_eq!(Settings::load_from(&path), Settings::default());
    }

    #[test]
    fn test_out_of_range_interval_resets_autosave_only() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        fs::write(
            &path,
            "[autosave]\nenabled = true\ninterval_seconds = 1\n\n\
             [persistence]\nwrite_mode = \"atomic\"\n",
        )
        .unwrap();

        let settings = Settings::load_from(&path);
        assert_eq!(settings.autosave, AutoSaveConfig::default());
        assert!(settings.autosave.validate().is_ok());
        assert_eq!(settings.persistence.write_mode, WriteMode::Atomic);
    }

    #[test]
    fn test_overrides() {
        let settings = Settings::default().with_overrides(true, Some(60));
        assert!(settings.autosave.enabled);
        assert_eq!(settings.autosave.interval_seconds, 60);

        let untouched = Settings::default().with_overrides(false, None);
        assert_eq!(untouched, Settings::default());
    }

    #[test]
    fn test_config_path_file_name() {
        let path = Settings::config_path();
        assert_eq!(path.file_name().unwrap(), "settings.toml");
    }
}
