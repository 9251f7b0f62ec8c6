//! Settings store for loading docstack.toml.

use std::path::{Path, PathBuf};

use super::{Settings, parser};

#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
    /// Missing file is an error instead of falling back to defaults
    required: bool,
}

impl SettingsStore {
    /// Store at `~/.config/docstack/docstack.toml`; a missing file yields defaults.
    pub fn from_default_location() -> anyhow::Result<Self> {
        let path = Self::default_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        Ok(Self {
            path,
            required: false,
        })
    }

    /// Store at an explicit path; the file must exist.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            required: true,
        }
    }

    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("docstack").join("docstack.toml"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> anyhow::Result<Settings> {
        if !self.required && !self.path.exists() {
            return Ok(Settings::default());
        }
        parser::parse_settings(&self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_optional_file_yields_defaults() {
        let temp = TempDir::new().unwrap();
        let store = SettingsStore {
            path: temp.path().join("docstack.toml"),
            required: false,
        };
        assert_eq!(store.load().unwrap(), Settings::default());
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let store = SettingsStore::from_path(temp.path().join("absent.toml"));
        assert!(store.load().is_err());
    }

    #[test]
    fn explicit_file_is_parsed() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("docstack.toml");
        std::fs::write(&path, "[release]\nversion = \"v2.1.0\"\n").unwrap();

        let settings = SettingsStore::from_path(&path).load().unwrap();
        assert_eq!(settings.release.version.as_deref(), Some("v2.1.0"));
    }
}
