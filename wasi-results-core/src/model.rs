//! Report model as written by the WASI testsuite runners
//!
//! One report blob looks like:
//!
//! ```json
//! {
//!   "runtime": { "name": "wasmtime", "version": "1.0" },
//!   "results": [
//!     { "path": "tests/rust/fd_read.wasm", "status": "PASS", "message": "" }
//!   ]
//! }
//! ```

use std::fmt;

use serde::{
    Deserialize,
    Serialize,
};

use crate::{
    error::{
        ResultsError,
        ResultsResult,
    },
    key::StoreKey,
};

/// WASI implementation that produced a report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Runtime {
    pub name:    String,
    pub version: String,
}

/// Outcome of a single conformance test
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Status {
    Pass,
    Fail,
    /// Any status string the runners may add later, kept verbatim
    Other(String),
}

impl Status {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pass => "PASS",
            Self::Fail => "FAIL",
            Self::Other(other) => other,
        }
    }

    /// Lowercase form, used as the CSS class of a status cell
    pub fn css_class(&self) -> String {
        self.as_str().to_lowercase()
    }
}

impl From<String> for Status {
    fn from(value: String) -> Self {
        match value.as_str() {
            "PASS" => Self::Pass,
            "FAIL" => Self::Fail,
            _ => Self::Other(value),
        }
    }
}

impl From<Status> for String {
    fn from(status: Status) -> Self {
        match status {
            Status::Other(other) => other,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One test of a report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestResult {
    pub path:    String,
    pub status:  Status,
    /// Failure output, empty for passing tests
    #[serde(default)]
    pub message: String,
}

impl TestResult {
    pub fn new(path: impl Into<String>, status: Status, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            status,
            message: message.into(),
        }
    }
}

/// Full output of one runtime/version run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub runtime: Runtime,
    pub results: Vec<TestResult>,
}

impl Report {
    /// Parse a fetched blob, attributing failures to `key`
    pub fn from_slice(key: &StoreKey, bytes: &[u8]) -> ResultsResult<Self> {
        serde_json::from_slice(bytes).map_err(|source| ResultsError::Parse {
            key: key.to_string(),
            source,
        })
    }
}

/// Listing record naming one fetchable report
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Entry {
    pub path: String,
}

impl Entry {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    /// Store key of the listed report
    pub fn key(&self) -> ResultsResult<StoreKey> {
        StoreKey::parse(&self.path)
    }

    /// Detail page link: the path without its `.json` suffix, rooted at `/`
    pub fn page_link(&self) -> String {
        let path = self.path.strip_suffix(crate::key::REPORT_SUFFIX).unwrap_or(&self.path);
        format!("/{}", path.trim_start_matches('/'))
    }
}
