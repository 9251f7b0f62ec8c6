//! Release resolution and download.

mod archive;
mod github;

pub use archive::unpack_tar_xz;
pub use github::GitHubReleases;

use std::path::Path;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ProvisionError;

/// Top-level directory inside every release archive.
pub const ARCHIVE_ROOT: &str = "paperless-ngx";

/// A published application release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Release {
    /// Tag as published, e.g. `v2.11.6`
    pub tag: String,
    pub version: semver::Version,
}

impl Release {
    /// Parse a tag such as `v2.11.6` or `2.11.6`.
    pub fn from_tag(tag: &str) -> anyhow::Result<Self> {
        let tag = tag.trim();
        let version = semver::Version::parse(tag.strip_prefix('v').unwrap_or(tag))
            .map_err(|e| anyhow::anyhow!("Release tag '{}' is not a semantic version: {}", tag, e))?;
        Ok(Self {
            tag: tag.to_string(),
            version,
        })
    }

    pub fn archive_name(&self) -> String {
        format!("{}-{}.tar.xz", ARCHIVE_ROOT, self.tag)
    }

    pub fn download_url(&self, repository: &str) -> anyhow::Result<Url> {
        let raw = format!(
            "https://github.com/{}/releases/download/{}/{}",
            repository,
            self.tag,
            self.archive_name()
        );
        Url::parse(&raw).map_err(|e| anyhow::anyhow!("Invalid download URL '{}': {}", raw, e))
    }
}

/// Where releases and their artifacts come from.
pub trait ReleaseSource {
    /// Repository the releases belong to, as `owner/repo`.
    fn repository(&self) -> &str;

    fn latest_release(&self) -> anyhow::Result<Release>;

    /// Download `url` to the file `dest`.
    fn download(&self, url: &Url, dest: &Path) -> anyhow::Result<()>;

    fn fetch_text(&self, url: &Url) -> anyhow::Result<String>;
}

#[derive(Debug, Deserialize)]
struct LatestReleaseBody {
    tag_name: String,
}

/// Parse the body of a `releases/latest` API response.
pub fn parse_latest_release(repository: &str, body: &str) -> anyhow::Result<Release> {
    let parsed: LatestReleaseBody =
        serde_json::from_str(body).map_err(|e| ProvisionError::Release {
            repository: repository.to_string(),
            reason: format!("unexpected API response: {e}"),
        })?;

    Release::from_tag(&parsed.tag_name).map_err(|e| {
        ProvisionError::Release {
            repository: repository.to_string(),
            reason: e.to_string(),
        }
        .into()
    })
}
