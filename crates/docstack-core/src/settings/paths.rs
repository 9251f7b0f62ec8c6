//! Host path layout.
//!
//! Paths come in two flavors: *target* paths are what the deployed system
//! sees (written into config and unit files), *host* paths are where this
//! process reads and writes. They differ only when a staging root is set.

use std::path::{Path, PathBuf};

use super::Settings;

/// Subdirectories created inside the install directory.
pub const DATA_DIRS: [&str; 4] = ["consume", "data", "media", "static"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    root: PathBuf,
    install_dir: PathBuf,
    unit_dir: PathBuf,
    credentials_file: PathBuf,
    version_file: PathBuf,
    imagemagick_policy: PathBuf,
    nltk_data_dir: PathBuf,
    motd_file: PathBuf,
    encoder_build_dir: PathBuf,
}

impl Layout {
    /// Layout for the current operator's home directory.
    pub fn new(root: impl Into<PathBuf>, settings: &Settings) -> anyhow::Result<Self> {
        let home = dirs::home_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine home directory"))?;
        Ok(Self::with_home(root, &home, settings))
    }

    /// Layout with an explicit home directory (for testing).
    pub fn with_home(root: impl Into<PathBuf>, home: &Path, settings: &Settings) -> Self {
        let paths = &settings.paths;
        Self {
            root: root.into(),
            install_dir: paths.install_dir.clone(),
            unit_dir: paths.unit_dir.clone(),
            credentials_file: expand_home(&paths.credentials_file, home),
            version_file: paths.version_file.clone(),
            imagemagick_policy: paths.imagemagick_policy.clone(),
            nltk_data_dir: paths.nltk_data_dir.clone(),
            motd_file: paths.motd_file.clone(),
            encoder_build_dir: settings.encoder.build_dir.clone(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn is_staged(&self) -> bool {
        self.root != Path::new("/")
    }

    /// Map a target path onto the host filesystem.
    pub fn rebase(&self, path: &Path) -> PathBuf {
        match path.strip_prefix("/") {
            Ok(relative) => self.root.join(relative),
            Err(_) => self.root.join(path),
        }
    }

    // Target paths

    pub fn target_install_dir(&self) -> &Path {
        &self.install_dir
    }

    pub fn target_src_dir(&self) -> PathBuf {
        self.install_dir.join("src")
    }

    pub fn target_credentials_file(&self) -> &Path {
        &self.credentials_file
    }

    // Host paths

    pub fn install_dir(&self) -> PathBuf {
        self.rebase(&self.install_dir)
    }

    /// Directory the release archive is downloaded and unpacked into.
    pub fn install_parent(&self) -> PathBuf {
        self.install_dir()
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.root.clone())
    }

    pub fn src_dir(&self) -> PathBuf {
        self.install_dir().join("src")
    }

    pub fn config_file(&self) -> PathBuf {
        self.install_dir().join("paperless.conf")
    }

    pub fn unit_dir(&self) -> PathBuf {
        self.rebase(&self.unit_dir)
    }

    pub fn credentials_file(&self) -> PathBuf {
        self.rebase(&self.credentials_file)
    }

    pub fn version_file(&self) -> PathBuf {
        self.rebase(&self.version_file)
    }

    pub fn imagemagick_policy(&self) -> PathBuf {
        self.rebase(&self.imagemagick_policy)
    }

    pub fn nltk_data_dir(&self) -> PathBuf {
        self.rebase(&self.nltk_data_dir)
    }

    pub fn motd_file(&self) -> PathBuf {
        self.rebase(&self.motd_file)
    }

    pub fn encoder_build_dir(&self) -> PathBuf {
        self.rebase(&self.encoder_build_dir)
    }
}

fn expand_home(path: &Path, home: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => home.join(rest),
        Err(_) => path.to_path_buf(),
    }
}
