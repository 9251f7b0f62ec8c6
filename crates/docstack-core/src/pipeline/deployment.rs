//! Deployment parameters accumulated across pipeline steps.

use tracing::warn;
use url::Url;

use crate::database::{DatabaseMode, DatabaseSettings};
use crate::ocr::OcrLanguages;
use crate::release::Release;

/// Optional consumer behaviors, each off unless the operator opts in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeatureFlags {
    pub recursive: bool,
    pub subdirs_as_tags: bool,
    pub delete_duplicates: bool,
    pub barcodes: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminAccount {
    pub username: String,
    pub password: String,
}

/// Everything decided during a run.
///
/// Fields start empty and are filled by the step that owns them; later steps
/// read what earlier steps decided.
#[derive(Debug, Clone, Default)]
pub struct Deployment {
    pub database_mode: Option<DatabaseMode>,
    pub ocr_languages: OcrLanguages,
    pub release: Option<Release>,
    pub database: Option<DatabaseSettings>,
    pub secret_key: Option<String>,
    pub time_zone: Option<String>,
    pub public_url: Option<String>,
    pub features: FeatureFlags,
    pub admin: Option<AdminAccount>,
    pub adminer_installed: bool,
}

impl Deployment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Database settings, or an error naming the step that should have set them.
    pub fn database(&self) -> anyhow::Result<&DatabaseSettings> {
        self.database
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("Database settings not collected; run the 'configure' step"))
    }

    pub fn release(&self) -> anyhow::Result<&Release> {
        self.release
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("No release resolved; run the 'application' step"))
    }
}

/// Normalize an operator-supplied public URL.
///
/// Only `http` and `https` URLs with a host are accepted. The result is the
/// bare origin (scheme, host and non-default port); any path, query or
/// fragment is dropped.
pub fn normalize_public_url(input: &str) -> anyhow::Result<String> {
    let input = input.trim();
    let url = Url::parse(input).map_err(|e| anyhow::anyhow!("Invalid URL '{}': {}", input, e))?;

    if !matches!(url.scheme(), "http" | "https") {
        anyhow::bail!("URL must use http or https: {}", input);
    }
    if url.host_str().is_none_or(str::is_empty) {
        anyhow::bail!("URL has no host: {}", input);
    }

    if url.path() != "/" || url.query().is_some() || url.fragment().is_some() {
        warn!(url = %input, "dropping path, query and fragment from public URL");
    }

    Ok(url.origin().ascii_serialization())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_url_normalization() {
        assert_eq!(
            normalize_public_url(" https://docs.example.com/ ").unwrap(),
            "https://docs.example.com"
        );
        assert_eq!(
            normalize_public_url("http://10.0.0.5:8000").unwrap(),
            "http://10.0.0.5:8000"
        );
        assert_eq!(
            normalize_public_url("https://docs.example.com:443/").unwrap(),
            "https://docs.example.com"
        );
    }

    #[test]
    fn public_url_is_reduced_to_its_origin() {
        assert_eq!(
            normalize_public_url("https://docs.example.com/paperless/?next=/x#frag").unwrap(),
            "https://docs.example.com"
        );
        assert_eq!(
            normalize_public_url("http://Docs.Example.com:8000/paperless").unwrap(),
            "http://docs.example.com:8000"
        );
    }

    #[test]
    fn public_url_rejections() {
        assert!(normalize_public_url("docs.example.com").is_err());
        assert!(normalize_public_url("ftp://docs.example.com").is_err());
        assert!(normalize_public_url("").is_err());
    }

    #[test]
    fn unset_fields_name_their_step() {
        let deployment = Deployment::new();
        assert!(
            deployment
                .database()
                .unwrap_err()
                .to_string()
                .contains("configure")
        );
        assert!(deployment.release().is_err());
    }
}
