//! Documents in a GitHub repository
//!
//! Files are read from the raw content host, so no API token is needed for
//! public repositories.

use std::fmt;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;
use tracing::debug;

use super::{ContentStore, FetchError};

const GITHUB_HOST: &str = "https://github.com/";

const RAW_HOST: &str = "https://raw.githubusercontent.com";

/// Branch used when none is given
pub const DEFAULT_BRANCH: &str = "main";

/// Owner and repository name parsed from a repository URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoLocator {
    pub owner: String,
    pub repo: String,
}

impl RepoLocator {
    /// Parse `https://github.com/<owner>/<repo>`, with an optional `.git`
    /// suffix or trailing slash
    pub fn parse(url: &str) -> Result<Self, FetchError> {
        let trimmed = url.trim();
        let rest = trimmed
            .strip_prefix(GITHUB_HOST)
            .ok_or_else(|| FetchError::malformed_locator(url))?;
        let rest = rest.strip_suffix('/').unwrap_or(rest);
        let rest = rest.strip_suffix(".git").unwrap_or(rest);

        let mut segments = rest.split('/');
        match (segments.next(), segments.next(), segments.next()) {
            (Some(owner), Some(repo), None) if !owner.is_empty() && !repo.is_empty() => Ok(Self {
                owner: owner.to_string(),
                repo: repo.to_string(),
            }),
            _ => Err(FetchError::malformed_locator(url)),
        }
    }
}

impl fmt::Display for RepoLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

/// Serves documents from one branch of a GitHub repository
#[derive(Debug, Clone)]
pub struct GitHubStore {
    client: reqwest::Client,
    base_url: String,
    locator: RepoLocator,
    branch: String,
}

impl GitHubStore {
    pub fn new(locator: RepoLocator, branch: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: RAW_HOST.to_string(),
            locator,
            branch: branch.into(),
        }
    }

    /// Serve raw files from another host, such as a mirror
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// Parse a repository URL and open a store on `branch`
    pub fn open(url: &str, branch: &str) -> Result<Self, FetchError> {
        Ok(Self::new(RepoLocator::parse(url)?, branch))
    }

    pub fn locator(&self) -> &RepoLocator {
        &self.locator
    }

    pub fn branch(&self) -> &str {
        &self.branch
    }

    /// Raw content URL for a document path
    pub fn document_url(&self, path: &str) -> String {
        format!(
            "{}/{}/{}/{}/{}",
            self.base_url,
            self.locator.owner,
            self.locator.repo,
            self.branch,
            path.trim_start_matches('/')
        )
    }
}

#[async_trait]
impl ContentStore for GitHubStore {
    async fn fetch_document(&self, path: &str) -> Result<Option<Value>, FetchError> {
        let url = self.document_url(path);
        debug!(%url, "fetching document");
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| FetchError::http(&url, e))?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => {
                let body = response.text().await.map_err(|e| FetchError::http(&url, e))?;
                serde_json::from_str(&body)
                    .map(Some)
                    .map_err(|source| FetchError::InvalidJson { path: url, source })
            }
            status => Err(FetchError::http(&url, format!("unexpected status {}", status))),
        }
    }
}
