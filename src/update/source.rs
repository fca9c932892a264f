use crate::error::{Error, Result};
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

pub const GITHUB_API: &str = "https://api.github.com";
pub const GITHUB_RAW: &str = "https://raw.githubusercontent.com";
pub const GITHUB_WEB: &str = "https://github.com";
pub const DEFAULT_REPO: &str = "gisph/gisph-cli";
const USER_AGENT: &str = "gisph-cli";

/// Anything that can tell us the latest published version.
pub trait ReleaseSource {
    fn latest_version(&self) -> Result<String>;
}

#[derive(Deserialize)]
struct Release {
    tag_name: String,
}

#[derive(Deserialize)]
struct Manifest {
    package: ManifestPackage,
}

#[derive(Deserialize)]
struct ManifestPackage {
    version: String,
}

/// Reads the latest release from GitHub, falling back to the manifest on
/// the default branch when the repository has no releases yet.
pub struct GithubReleases {
    client: Client,
    repo: String,
    api_base: String,
    raw_base: String,
}

impl GithubReleases {
    pub fn new(repo: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| Error::UpdateCheck(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            repo: repo.into(),
            api_base: GITHUB_API.to_string(),
            raw_base: GITHUB_RAW.to_string(),
        })
    }

    /// Repository from `GITHUB_REPO`, or the built-in default.
    pub fn from_env(timeout: Duration) -> Result<Self> {
        Self::new(repo_from_env(), timeout)
    }

    /// Point both endpoints somewhere else (mirrors, tests).
    pub fn with_endpoints(mut self, api_base: &str, raw_base: &str) -> Self {
        self.api_base = api_base.trim_end_matches('/').to_string();
        self.raw_base = raw_base.trim_end_matches('/').to_string();
        self
    }

    pub fn repo(&self) -> &str {
        &self.repo
    }

    fn version_from_main(&self) -> Result<String> {
        let url = format!("{}/{}/main/Cargo.toml", self.raw_base, self.repo);
        debug!(%url, "no releases published, reading manifest from main");

        let res = self
            .client
            .get(&url)
            .send()
            .map_err(|e| Error::UpdateCheck(format!("Failed to check version: {}", e)))?;
        if res.status() != StatusCode::OK {
            return Err(Error::UpdateCheck(
                "Could not fetch version from GitHub".to_string(),
            ));
        }

        let text = res
            .text()
            .map_err(|e| Error::UpdateCheck(format!("Failed to check version: {}", e)))?;
        manifest_version(&text)
            .ok_or_else(|| Error::UpdateCheck("Failed to parse Cargo.toml from GitHub".to_string()))
    }
}

impl ReleaseSource for GithubReleases {
    fn latest_version(&self) -> Result<String> {
        let url = format!("{}/repos/{}/releases/latest", self.api_base, self.repo);
        debug!(%url, "fetching latest release");

        let res = self
            .client
            .get(&url)
            .send()
            .map_err(|e| Error::UpdateCheck(format!("Failed to check version: {}", e)))?;

        match res.status() {
            StatusCode::NOT_FOUND => self.version_from_main(),
            StatusCode::OK => {
                let release: Release = res.json().map_err(|_| {
                    Error::UpdateCheck("Failed to parse GitHub response".to_string())
                })?;
                let version = release.tag_name.trim_start_matches('v').to_string();
                debug!(%version, "latest release");
                Ok(version)
            }
            other => Err(Error::UpdateCheck(format!(
                "GitHub API returned status {}",
                other.as_u16()
            ))),
        }
    }
}

/// `package.version` from a Cargo manifest.
pub(crate) fn manifest_version(text: &str) -> Option<String> {
    toml::from_str::<Manifest>(text)
        .ok()
        .map(|m| m.package.version)
}

pub fn repo_from_env() -> String {
    std::env::var("GITHUB_REPO")
        .ok()
        .filter(|r| !r.is_empty())
        .unwrap_or_else(|| DEFAULT_REPO.to_string())
}

/// Source tarball of the default branch.
pub fn archive_url(repo: &str) -> String {
    format!("{}/{}/archive/refs/heads/main.tar.gz", GITHUB_WEB, repo)
}
