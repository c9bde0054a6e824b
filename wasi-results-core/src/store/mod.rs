//! Access to the remote store holding result reports
//!
//! The store is a key→blob tree laid out as
//! `<commit>/<runtime>/<version>.json`. [`ResultStore`] is the seam the HTTP
//! layer talks to; [`GitHubStore`] reads a GitHub repository through its REST
//! API and [`MemoryStore`] serves a fixed set of blobs.

use std::{
    collections::BTreeMap,
    fmt,
};

use async_trait::async_trait;
use tracing::warn;

use crate::{
    error::ResultsResult,
    key::StoreKey,
    model::{
        Entry,
        Report,
    },
};

pub mod github;
pub mod memory;

pub use github::GitHubStore;
pub use memory::MemoryStore;

/// Commit identifier naming one result directory
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CommitSha(String);

impl CommitSha {
    pub fn new(sha: impl Into<String>) -> Self {
        Self(sha.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CommitSha {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Upstream response forwarded untouched by the raw route
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawBlob {
    /// Upstream HTTP status code
    pub status:       u16,
    /// Upstream `content-type`, if any
    pub content_type: Option<String>,
    /// Upstream body bytes
    pub body:         Vec<u8>,
}

/// Read access to published result reports
#[async_trait]
pub trait ResultStore: Send + Sync {
    /// Resolve the head commit of a branch
    async fn resolve_commit(&self, reference: &str) -> ResultsResult<CommitSha>;

    /// List the latest report of every runtime under a commit, sorted by path
    async fn list_entries(&self, commit: &CommitSha) -> ResultsResult<Vec<Entry>>;

    /// Fetch and parse one report
    async fn fetch_report(&self, key: &StoreKey) -> ResultsResult<Report>;

    /// Fetch one blob without interpreting status or body
    async fn fetch_raw(&self, key: &StoreKey) -> ResultsResult<RawBlob>;

    /// Web page of a testsuite commit, when the store knows where commits live
    fn commit_url(&self, commit: &str) -> Option<String> {
        let _ = commit;
        None
    }
}

/// Reduce per-directory listings to one entry each, sorted by path
///
/// Each inner listing is one runtime directory in store order; its last file is
/// taken as the most recent version. Empty directories contribute nothing.
pub fn latest_per_directory<I>(listings: I) -> Vec<Entry>
where
    I: IntoIterator<Item = Vec<Entry>>,
{
    let mut entries: Vec<Entry> = listings
        .into_iter()
        .filter_map(|mut listing| listing.pop())
        .collect();
    entries.sort_by(|a, b| a.path.as_bytes().cmp(b.path.as_bytes()));
    entries
}

/// Group file paths under `<commit>/` by their runtime directory
///
/// Paths deeper than `<commit>/<dir>/<file>` are ignored, matching a single
/// level of directory listing. Paths that are not valid store keys are
/// skipped.
pub(crate) fn group_by_directory<'a, I>(commit: &CommitSha, paths: I) -> Vec<Vec<Entry>>
where
    I: IntoIterator<Item = &'a str>,
{
    let prefix = format!("{}/", commit.as_str());
    let mut dirs: BTreeMap<&str, Vec<Entry>> = BTreeMap::new();
    for path in paths {
        let Some(rest) = path.strip_prefix(&prefix) else {
            continue;
        };
        if let Err(e) = StoreKey::parse(path) {
            warn!(path, error = %e, "skipping unusable store path");
            continue;
        }
        let mut parts = rest.split('/');
        if let (Some(dir), Some(_file), None) = (parts.next(), parts.next(), parts.next()) {
            dirs.entry(dir).or_default().push(Entry::new(path));
        }
    }
    dirs.into_values().collect()
}
