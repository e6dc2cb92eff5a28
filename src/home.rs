use std::path::PathBuf;

use crate::error::AppError;

/// Identity config file in the tool's home directory
const IDENTITY_FILE: &str = ".gitconfig";
/// Credential store file in the tool's home directory
const CREDENTIALS_FILE: &str = ".git-credentials";
/// Settings file, relative to the tool's home directory
const SETTINGS_FILE: &str = ".config/gitident/settings.json";

/// Home directory of the tool installation whose Git files are managed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolHome {
    root: PathBuf,
}

impl ToolHome {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Uses `override_root` when given, otherwise the user's home directory
    pub fn resolve(override_root: Option<PathBuf>) -> Result<Self, AppError> {
        match override_root {
            Some(root) => Ok(Self::new(root)),
            None => dirs::home_dir().map(Self::new).ok_or(AppError::HomeDirNotFound),
        }
    }

    pub fn identity_path(&self) -> PathBuf {
        self.root.join(IDENTITY_FILE)
    }

    pub fn credentials_path(&self) -> PathBuf {
        self.root.join(CREDENTIALS_FILE)
    }

    pub fn settings_path(&self) -> PathBuf {
        self.root.join(SETTINGS_FILE)
    }
}
