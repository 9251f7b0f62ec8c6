//! Settings schema for docstack.toml
//!
//! Every section is optional; missing fields fall back to the layout of a
//! stock Paperless-ngx host.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root structure of docstack.toml
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub paths: PathSettings,
    pub release: ReleaseSettings,
    pub encoder: EncoderSettings,
    pub nltk: NltkSettings,
    /// Pre-filled prompt answers keyed by prompt key
    pub answers: BTreeMap<String, String>,
    pub hooks: HookSettings,
}

/// Filesystem locations on the target host.
///
/// A leading `~/` in `credentials_file` is expanded to the operator's home.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathSettings {
    pub install_dir: PathBuf,
    pub unit_dir: PathBuf,
    pub credentials_file: PathBuf,
    pub version_file: PathBuf,
    pub imagemagick_policy: PathBuf,
    pub nltk_data_dir: PathBuf,
    pub motd_file: PathBuf,
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            install_dir: PathBuf::from("/opt/paperless"),
            unit_dir: PathBuf::from("/etc/systemd/system"),
            credentials_file: PathBuf::from("~/paperless.creds"),
            version_file: PathBuf::from("/opt/paperless_version.txt"),
            imagemagick_policy: PathBuf::from("/etc/ImageMagick-6/policy.xml"),
            nltk_data_dir: PathBuf::from("/usr/share/nltk_data"),
            motd_file: PathBuf::from("/etc/motd"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReleaseSettings {
    /// GitHub `owner/repo` publishing the release archives
    pub repository: String,
    pub api_base: String,
    pub config_template_url: String,
    /// Pinned release tag; skips latest-release resolution when set
    pub version: Option<String>,
}

impl Default for ReleaseSettings {
    fn default() -> Self {
        Self {
            repository: "paperless-ngx/paperless-ngx".to_string(),
            api_base: "https://api.github.com".to_string(),
            config_template_url: "https://raw.githubusercontent.com/paperless-ngx/paperless-ngx/main/paperless.conf.example".to_string(),
            version: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderSettings {
    pub repository: String,
    pub build_dir: PathBuf,
}

impl Default for EncoderSettings {
    fn default() -> Self {
        Self {
            repository: "https://github.com/agl/jbig2enc".to_string(),
            build_dir: PathBuf::from("/opt/jbig2enc"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NltkSettings {
    pub corpora: Vec<String>,
}

impl Default for NltkSettings {
    fn default() -> Self {
        Self {
            corpora: vec![
                "snowball_data".to_string(),
                "stopwords".to_string(),
                "punkt_tab".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HookSettings {
    /// Commands run after the login banner is written, as `[program, args...]`
    pub post_install: Vec<Vec<String>>,
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.release.repository.split('/').count() != 2 {
            anyhow::bail!(
                "release.repository must be 'owner/repo', got '{}'",
                self.release.repository
            );
        }
        if !self.paths.install_dir.is_absolute() {
            anyhow::bail!(
                "paths.install_dir must be absolute: {}",
                self.paths.install_dir.display()
            );
        }
        if let Some(index) = self.hooks.post_install.iter().position(Vec::is_empty) {
            anyhow::bail!("hooks.post_install[{}] is empty", index);
        }
        Ok(())
    }
}
