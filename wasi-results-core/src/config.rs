//! Configuration for result store access

use std::{
    fmt,
    str::FromStr,
    time::Duration,
};

use crate::error::{
    ResultsError,
    ResultsResult,
};

/// Default GitHub REST API endpoint
pub const DEFAULT_API_BASE: &str = "https://api.github.com";
/// Owner of the default repository
pub const DEFAULT_REPO_OWNER: &str = "WebAssembly";
/// Name of the default repository
pub const DEFAULT_REPO_NAME: &str = "wasi-testsuite";
/// Repository holding the testsuite and its published results, `owner/name`
pub const DEFAULT_REPO: &str = "WebAssembly/wasi-testsuite";
/// Branch the results are published to
pub const DEFAULT_RESULTS_BRANCH: &str = "results";
/// Branch whose head commit names the result directory
pub const DEFAULT_SUITE_BRANCH: &str = "main";
/// Timeout applied to every outbound call
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Bearer credential attached to every store call
///
/// `Debug` is redacted so the value never ends up in logs.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wrap a credential, rejecting empty or blank values
    pub fn new(value: impl Into<String>) -> ResultsResult<Self> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ResultsError::config("store credential is empty"));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Load a credential from an optional raw value (typically CLI or env)
    pub fn from_optional(value: Option<String>) -> ResultsResult<Self> {
        match value {
            Some(value) => Self::new(value),
            None => Err(ResultsError::config(
                "store credential is missing (set GITHUB_TOKEN or pass --token)",
            )),
        }
    }

    /// Value of the `Authorization` header
    pub fn authorization(&self) -> String {
        format!("token {}", self.0)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// `owner/name` reference to a GitHub repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    owner: String,
    name:  String,
}

impl RepoRef {
    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl FromStr for RepoRef {
    type Err = ResultsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.trim().split('/');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(owner), Some(name), None) if !owner.is_empty() && !name.is_empty() => Ok(Self {
                owner: owner.to_string(),
                name:  name.to_string(),
            }),
            _ => Err(ResultsError::config(format!(
                "invalid repository '{}', expected owner/name",
                s
            ))),
        }
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Settings for talking to the result store
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Credential sent as `Authorization: token <credential>`
    pub credential:     Credential,
    /// Base URL of the REST API, without trailing slash
    pub api_base:       String,
    /// Repository holding the published result files
    pub results_repo:   RepoRef,
    /// Branch of `results_repo` the files live on
    pub results_branch: String,
    /// Repository whose commits name the result directories
    pub suite_repo:     RepoRef,
    /// Branch of `suite_repo` resolved for the index page
    pub suite_branch:   String,
    /// Timeout for each outbound call
    pub timeout:        Duration,
}

impl StoreConfig {
    /// Configuration with default repositories, branches and timeout
    pub fn new(credential: Credential) -> Self {
        let repo = RepoRef {
            owner: DEFAULT_REPO_OWNER.to_string(),
            name:  DEFAULT_REPO_NAME.to_string(),
        };
        Self {
            credential,
            api_base: DEFAULT_API_BASE.to_string(),
            results_repo: repo.clone(),
            results_branch: DEFAULT_RESULTS_BRANCH.to_string(),
            suite_repo: repo,
            suite_branch: DEFAULT_SUITE_BRANCH.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_results(mut self, repo: RepoRef, branch: impl Into<String>) -> Self {
        self.results_repo = repo;
        self.results_branch = branch.into();
        self
    }

    pub fn with_suite(mut self, repo: RepoRef, branch: impl Into<String>) -> Self {
        self.suite_repo = repo;
        self.suite_branch = branch.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Validate settings that cannot be checked by construction
    pub fn validate(&self) -> ResultsResult<()> {
        if self.timeout.is_zero() {
            return Err(ResultsError::config("timeout must be greater than zero"));
        }
        if !(self.api_base.starts_with("https://") || self.api_base.starts_with("http://")) {
            return Err(ResultsError::config(format!(
                "api base '{}' is not an http(s) URL",
                self.api_base
            )));
        }
        if self.results_branch.trim().is_empty() || self.suite_branch.trim().is_empty() {
            return Err(ResultsError::config("branch names must not be empty"));
        }
        Ok(())
    }
}
