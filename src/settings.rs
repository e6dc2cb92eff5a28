use std::{fs, io::ErrorKind, path::PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{error::AppError, host::DEFAULT_HOST};

/// Host preferences persisted outside the git files
pub trait Settings {
    fn use_default_host(&self) -> bool;

    fn set_use_default_host(&mut self, value: bool) -> Result<(), AppError>;

    fn current_host(&self) -> String;

    fn set_current_host(&mut self, host: &str) -> Result<(), AppError>;
}

/// Values stored in the settings file
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct HostPreferences {
    pub use_default_host: bool,
    pub current_host: String,
}

impl Default for HostPreferences {
    fn default() -> Self {
        Self {
            use_default_host: true,
            current_host: DEFAULT_HOST.to_string(),
        }
    }
}

/// [`Settings`] backed by a pretty-printed JSON file
#[derive(Debug)]
pub struct JsonSettings {
    path: PathBuf,
    prefs: HostPreferences,
}

impl JsonSettings {
    /// Loads preferences from `path`, falling back to defaults
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let prefs = match fs::read_to_string(&path) {
            Ok(contents) if contents.trim().is_empty() => HostPreferences::default(),
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|e| {
                warn!(path = %path.display(), error = %e, "invalid settings file, using defaults");
                HostPreferences::default()
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => HostPreferences::default(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to read settings file, using defaults");
                HostPreferences::default()
            }
        };
        debug!(path = %path.display(), ?prefs, "loaded settings");
        Self { path, prefs }
    }

    fn store(&self) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| AppError::write(parent, e))?;
        }
        let json: String = serde_json::to_string_pretty(&self.prefs)?;
        fs::write(&self.path, json).map_err(|e| AppError::write(&self.path, e))?;
        Ok(())
    }
}

impl Settings for JsonSettings {
    fn use_default_host(&self) -> bool {
        self.prefs.use_default_host
    }

    fn set_use_default_host(&mut self, value: bool) -> Result<(), AppError> {
        let previous = std::mem::replace(&mut self.prefs.use_default_host, value);
        self.store().inspect_err(|_| self.prefs.use_default_host = previous)
    }

    fn current_host(&self) -> String {
        self.prefs.current_host.clone()
    }

    fn set_current_host(&mut self, host: &str) -> Result<(), AppError> {
        let previous = std::mem::replace(&mut self.prefs.current_host, host.to_string());
        self.store().inspect_err(|_| self.prefs.current_host = previous)
    }
}

/// In-memory [`Settings`] for tests
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemorySettings {
    pub prefs: HostPreferences,
}

#[cfg(test)]
impl Settings for MemorySettings {
    fn use_default_host(&self) -> bool {
        self.prefs.use_default_host
    }

    fn set_use_default_host(&mut self, value: bool) -> Result<(), AppError> {
        self.prefs.use_default_host = value;
        Ok(())
    }

    fn current_host(&self) -> String {
        self.prefs.current_host.clone()
    }

    fn set_current_host(&mut self, host: &str) -> Result<(), AppError> {
        self.prefs.current_host = host.to_string();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_defaults() {
        let tmp = TempDir::new().unwrap();

        let settings = JsonSettings::load(tmp.path().join("settings.json"));

        assert!(settings.use_default_host());
        assert_eq!(settings.current_host(), "github.com");
    }

    #[test]
    fn test_setters_persist() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested/settings.json");
        let mut settings = JsonSettings::load(&path);

        settings.set_use_default_host(false).unwrap();
        settings.set_current_host("git.example.com").unwrap();

        let reloaded = JsonSettings::load(&path);
        assert!(!reloaded.use_default_host());
        assert_eq!(reloaded.current_host(), "git.example.com");
    }

    #[test]
    fn test_invalid_file_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("settings.json");
        fs::write(&path, "{ not json").unwrap();

        let settings = JsonSettings::load(&path);

        assert_eq!(settings.prefs, HostPreferences::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("settings.json");
        fs::write(&path, r#"{ "use_default_host": false }"#).unwrap();

        let settings = JsonSettings::load(&path);

        assert!(!settings.use_default_host());
        assert_eq!(settings.current_host(), "github.com");
    }

    #[test]
    fn test_failed_store_keeps_previous_value() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("settings.json");
        fs::create_dir(&path).unwrap();
        let mut settings = JsonSettings::load(&path);

        let err = settings.set_current_host("example.com").unwrap_err();

        assert!(matches!(err, AppError::Write { .. }));
        assert_eq!(settings.current_host(), "github.com");
    }
}
