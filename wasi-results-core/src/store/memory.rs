//! In-memory result store
//!
//! Serves a fixed set of blobs with the same error semantics as the GitHub
//! store. Used by tests and for running the viewer without network access.

use std::collections::{
    BTreeMap,
    HashMap,
};

use async_trait::async_trait;

use super::{
    group_by_directory,
    latest_per_directory,
    CommitSha,
    RawBlob,
    ResultStore,
};
use crate::{
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

const NOT_FOUND_BODY: &[u8] = br#"{"message":"Not Found"}"#;

/// Result store holding blobs in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    branches:    HashMap<String, String>,
    blobs:       BTreeMap<String, Vec<u8>>,
    commit_base: Option<String>,
    unavailable: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Point a branch at a commit
    pub fn with_branch(mut self, branch: impl Into<String>, sha: impl Into<String>) -> Self {
        self.branches.insert(branch.into(), sha.into());
        self
    }

    /// Store a raw blob under `path`
    pub fn with_blob(mut self, path: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        self.blobs.insert(path.into(), body.into());
        self
    }

    /// Store a report under `path` as JSON
    pub fn with_report(self, path: impl Into<String>, report: &Report) -> Self {
        // Plain structs with string keys always serialize
        let body = serde_json::to_vec(report).unwrap_or_default();
        self.with_blob(path, body)
    }

    /// Base URL commit links are built from, e.g. `https://github.com/o/r/commit`
    pub fn with_commit_links(mut self, base: impl Into<String>) -> Self {
        self.commit_base = Some(base.into().trim_end_matches('/').to_string());
        self
    }

    /// Make every call fail as if the store were unreachable
    pub fn unavailable(mut self) -> Self {
        self.unavailable = true;
        self
    }

    fn check_available(&self, key: &str) -> ResultsResult<()> {
        if self.unavailable {
            Err(ResultsError::upstream(key, "store unreachable"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl ResultStore for MemoryStore {
    async fn resolve_commit(&self, reference: &str) -> ResultsResult<CommitSha> {
        self.check_available(reference)?;
        self.branches
            .get(reference)
            .map(CommitSha::new)
            .ok_or_else(|| ResultsError::upstream(reference, "HTTP 404 Not Found"))
    }

    async fn list_entries(&self, commit: &CommitSha) -> ResultsResult<Vec<Entry>> {
        self.check_available(commit.as_str())?;
        let prefix = format!("{}/", commit.as_str());
        if !self.blobs.keys().any(|path| path.starts_with(&prefix)) {
            return Err(ResultsError::not_found(commit.as_str()));
        }
        let groups = group_by_directory(commit, self.blobs.keys().map(String::as_str));
        Ok(latest_per_directory(groups))
    }

    async fn fetch_report(&self, key: &StoreKey) -> ResultsResult<Report> {
        self.check_available(key.as_str())?;
        let body = self
            .blobs
            .get(key.as_str())
            .ok_or_else(|| ResultsError::not_found(key.as_str()))?;
        Report::from_slice(key, body)
    }

    async fn fetch_raw(&self, key: &StoreKey) -> ResultsResult<RawBlob> {
        self.check_available(key.as_str())?;
        Ok(match self.blobs.get(key.as_str()) {
            Some(body) => RawBlob {
                status:       200,
                content_type: Some("application/json".to_string()),
                body:         body.clone(),
            },
            None => RawBlob {
                status:       404,
                content_type: Some("application/json".to_string()),
                body:         NOT_FOUND_BODY.to_vec(),
            },
        })
    }

    fn commit_url(&self, commit: &str) -> Option<String> {
        self.commit_base.as_ref().map(|base| format!("{}/{}", base, commit))
    }
}
