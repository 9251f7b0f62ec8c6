//! GitHub releases API client.

use std::path::Path;

use anyhow::Context;
use tracing::{debug, info};
use url::Url;

use super::{Release, ReleaseSource, parse_latest_release};
use crate::error::ProvisionError;
use crate::settings::ReleaseSettings;

const USER_AGENT: &str = concat!("docstack/", env!("CARGO_PKG_VERSION"));

/// Resolves releases through `GET /repos/{owner}/{repo}/releases/latest`.
///
/// Blocking facade over reqwest; each call drives its own runtime.
#[derive(Debug, Clone)]
pub struct GitHubReleases {
    repository: String,
    api_base: String,
    pinned: Option<String>,
}

impl GitHubReleases {
    pub fn new(repository: impl Into<String>, api_base: impl Into<String>) -> Self {
        Self {
            repository: repository.into(),
            api_base: api_base.into(),
            pinned: None,
        }
    }

    pub fn from_settings(settings: &ReleaseSettings) -> Self {
        Self {
            repository: settings.repository.clone(),
            api_base: settings.api_base.clone(),
            pinned: settings.version.clone(),
        }
    }

    /// Always resolve to `tag` instead of asking the API.
    pub fn pinned(mut self, tag: impl Into<String>) -> Self {
        self.pinned = Some(tag.into());
        self
    }

    pub fn latest_release_url(&self) -> anyhow::Result<Url> {
        let (owner, repo) = parse_repository(&self.repository)?;
        let raw = format!(
            "{}/repos/{}/{}/releases/latest",
            self.api_base.trim_end_matches('/'),
            owner,
            repo
        );
        Url::parse(&raw).map_err(|e| anyhow::anyhow!("Invalid API URL '{}': {}", raw, e))
    }

    fn client() -> anyhow::Result<reqwest::Client> {
        reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to build HTTP client")
    }

    fn runtime() -> anyhow::Result<tokio::runtime::Runtime> {
        tokio::runtime::Runtime::new()
            .map_err(|e| anyhow::anyhow!("Failed to create tokio runtime: {}", e))
    }

    async fn get(url: &Url, accept: Option<&str>) -> anyhow::Result<reqwest::Response> {
        let mut request = Self::client()?.get(url.clone());
        if let Some(accept) = accept {
            request = request.header(reqwest::header::ACCEPT, accept);
        }
        let response = request
            .send()
            .await
            .with_context(|| format!("Failed to fetch {}", url))?;

        if !response.status().is_success() {
            anyhow::bail!("HTTP {} from {}", response.status(), url);
        }
        Ok(response)
    }
}

impl ReleaseSource for GitHubReleases {
    fn repository(&self) -> &str {
        &self.repository
    }

    fn latest_release(&self) -> anyhow::Result<Release> {
        if let Some(tag) = &self.pinned {
            debug!(tag = %tag, "using pinned release");
            return Release::from_tag(tag).map_err(|e| {
                ProvisionError::Release {
                    repository: self.repository.clone(),
                    reason: e.to_string(),
                }
                .into()
            });
        }

        let url = self.latest_release_url()?;
        info!(url = %url, "resolving latest release");

        let body = Self::runtime()?
            .block_on(async {
                let response = Self::get(&url, Some("application/vnd.github.v3+json")).await?;
                response
                    .text()
                    .await
                    .with_context(|| format!("Failed to read response body from {}", url))
            })
            .map_err(|e| ProvisionError::Release {
                repository: self.repository.clone(),
                reason: format!("{e:#}"),
            })?;

        parse_latest_release(&self.repository, &body)
    }

    fn download(&self, url: &Url, dest: &Path) -> anyhow::Result<()> {
        info!(url = %url, dest = %dest.display(), "downloading");

        let bytes = Self::runtime()?.block_on(async {
            let response = Self::get(url, None).await?;
            response
                .bytes()
                .await
                .with_context(|| format!("Failed to read response body from {}", url))
        })?;

        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        std::fs::write(dest, &bytes)
            .with_context(|| format!("Failed to write download to {}", dest.display()))
    }

    fn fetch_text(&self, url: &Url) -> anyhow::Result<String> {
        debug!(url = %url, "fetching");
        Self::runtime()?.block_on(async {
            let response = Self::get(url, None).await?;
            response
                .text()
                .await
                .with_context(|| format!("Failed to read response body from {}", url))
        })
    }
}

/// Split `owner/repo` into its parts.
pub(crate) fn parse_repository(repository: &str) -> anyhow::Result<(&str, &str)> {
    match repository.split_once('/') {
        Some((owner, repo)) if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') => {
            Ok((owner, repo))
        }
        _ => anyhow::bail!("Invalid GitHub repo format: {}", repository),
    }
}
