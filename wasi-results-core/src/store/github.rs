//! Result store backed by a GitHub repository
//!
//! Reports are read through the REST contents API. Two response shapes are
//! selected with the `Accept` header: the JSON metadata shape for commits and
//! directory listings, and the raw shape for report blobs.

use async_trait::async_trait;
use futures::future::try_join_all;
use reqwest::{
    header::{
        ACCEPT,
        AUTHORIZATION,
        CONTENT_TYPE,
    },
    Client,
    Response,
    StatusCode,
};
use serde::Deserialize;
use tracing::{
    debug,
    warn,
};

use super::{
    latest_per_directory,
    CommitSha,
    RawBlob,
    ResultStore,
};
use crate::{
    config::StoreConfig,
    error::{
        ResultsError,
        ResultsResult,
    },
    key::StoreKey,
    model::{
        Entry,
        Report,
    },
};

/// Structured (listing/commit) response shape
pub const ACCEPT_JSON: &str = "application/vnd.github.v3+json";
/// Raw blob response shape
pub const ACCEPT_RAW: &str = "application/vnd.github.v3.raw";

const USER_AGENT: &str = concat!("wasi-results/", env!("CARGO_PKG_VERSION"));

/// One item of a contents listing
#[derive(Debug, Deserialize)]
struct ContentItem {
    path: String,
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Debug, Deserialize)]
struct CommitInfo {
    sha: String,
}

/// GitHub REST API client for published results
#[derive(Debug, Clone)]
pub struct GitHubStore {
    client: Client,
    config: StoreConfig,
}

impl GitHubStore {
    /// Build a client; every request carries the configured credential and
    /// is bounded by the configured timeout
    pub fn new(config: StoreConfig) -> ResultsResult<Self> {
        config.validate()?;
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ResultsError::config(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    fn commit_api_url(&self, reference: &str) -> String {
        format!(
            "{}/repos/{}/commits/{}",
            self.config.api_base, self.config.suite_repo, reference
        )
    }

    fn contents_url(&self, path: &str) -> String {
        format!(
            "{}/repos/{}/contents/{}?ref={}",
            self.config.api_base, self.config.results_repo, path, self.config.results_branch
        )
    }

    async fn send(&self, url: &str, accept: &str, key: &str) -> ResultsResult<Response> {
        debug!(url, accept, "store request");
        self.client
            .get(url)
            .header(AUTHORIZATION, self.config.credential.authorization())
            .header(ACCEPT, accept)
            .send()
            .await
            .map_err(|e| transport_error(key, &e))
    }

    async fn send_ok(&self, url: &str, accept: &str, key: &str) -> ResultsResult<Response> {
        let response = self.send(url, accept, key).await?;
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else if status == StatusCode::NOT_FOUND {
            Err(ResultsError::not_found(key))
        } else {
            Err(ResultsError::upstream(key, format!("HTTP {}", status)))
        }
    }

    async fn body(key: &str, response: Response) -> ResultsResult<Vec<u8>> {
        let bytes = response.bytes().await.map_err(|e| transport_error(key, &e))?;
        Ok(bytes.to_vec())
    }

    async fn list_dir(&self, path: &str) -> ResultsResult<Vec<ContentItem>> {
        let response = self.send_ok(&self.contents_url(path), ACCEPT_JSON, path).await?;
        let body = Self::body(path, response).await?;
        serde_json::from_slice(&body).map_err(|source| ResultsError::Parse {
            key: path.to_string(),
            source,
        })
    }

    /// Files of one runtime directory, in listing order
    ///
    /// Files whose path is not a usable key are skipped.
    async fn list_files(&self, dir: &StoreKey) -> ResultsResult<Vec<Entry>> {
        let items = self.list_dir(dir.as_str()).await?;
        Ok(items
            .into_iter()
            .filter(|item| item.kind == "file")
            .filter(|item| usable_path(&item.path))
            .map(|item| Entry::new(item.path))
            .collect())
    }
}

#[async_trait]
impl ResultStore for GitHubStore {
    async fn resolve_commit(&self, reference: &str) -> ResultsResult<CommitSha> {
        let reference = StoreKey::parse(reference)?;
        // An unknown branch is a store failure, not a missing page
        let response = self
            .send_ok(&self.commit_api_url(reference.as_str()), ACCEPT_JSON, reference.as_str())
            .await
            .map_err(|e| match e {
                ResultsError::NotFound { key } => ResultsError::upstream(key, "HTTP 404 Not Found"),
                other => other,
            })?;
        let body = Self::body(reference.as_str(), response).await?;
        let commit: CommitInfo =
            serde_json::from_slice(&body).map_err(|source| ResultsError::Parse {
                key: reference.to_string(),
                source,
            })?;
        if commit.sha.is_empty() || !commit.sha.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ResultsError::upstream(
                reference.as_str(),
                format!("unexpected commit id {:?}", commit.sha),
            ));
        }
        debug!(reference = %reference, sha = %commit.sha, "resolved commit");
        Ok(CommitSha::new(commit.sha))
    }

    async fn list_entries(&self, commit: &CommitSha) -> ResultsResult<Vec<Entry>> {
        let items = self.list_dir(commit.as_str()).await?;
        let dirs: Vec<StoreKey> = items
            .into_iter()
            .filter(|item| item.kind == "dir")
            .filter(|item| usable_path(&item.path))
            .filter_map(|item| StoreKey::parse(&item.path).ok())
            .collect();

        let listings = try_join_all(dirs.iter().map(|dir| self.list_files(dir))).await?;
        Ok(latest_per_directory(listings))
    }

    async fn fetch_report(&self, key: &StoreKey) -> ResultsResult<Report> {
        let response = self.send_ok(&self.contents_url(key.as_str()), ACCEPT_RAW, key.as_str()).await?;
        let body = Self::body(key.as_str(), response).await?;
        Report::from_slice(key, &body)
    }

    async fn fetch_raw(&self, key: &StoreKey) -> ResultsResult<RawBlob> {
        let response = self.send(&self.contents_url(key.as_str()), ACCEPT_RAW, key.as_str()).await?;
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = Self::body(key.as_str(), response).await?;
        Ok(RawBlob {
            status,
            content_type,
            body,
        })
    }

    fn commit_url(&self, commit: &str) -> Option<String> {
        Some(format!(
            "https://github.com/{}/commit/{}",
            self.config.suite_repo, commit
        ))
    }
}

/// Whether a listed path can be used as a store key; logs the ones that can't
fn usable_path(path: &str) -> bool {
    match StoreKey::parse(path) {
        Ok(_) => true,
        Err(e) => {
            warn!(path, error = %e, "skipping unusable store path");
            false
        },
    }
}

fn transport_error(key: &str, error: &reqwest::Error) -> ResultsError {
    let reason = if error.is_timeout() {
        "request timed out".to_string()
    } else if error.is_connect() {
        "store unreachable".to_string()
    } else {
        error.to_string()
    };
    ResultsError::upstream(key, reason)
}
