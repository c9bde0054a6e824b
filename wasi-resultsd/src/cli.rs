//! Command line and environment configuration
//!
//! Every option can also be supplied through the environment. The credential
//! is mandatory; a missing one stops the daemon before it binds.

use std::{
    net::SocketAddr,
    time::Duration,
};

use clap::Parser;
use wasi_results_core::{
    config::{
        DEFAULT_API_BASE,
        DEFAULT_REPO,
        DEFAULT_RESULTS_BRANCH,
        DEFAULT_SUITE_BRANCH,
    },
    Credential,
    RepoRef,
    ResultsResult,
    StoreConfig,
};

/// WASI Results Daemon CLI arguments
#[derive(Parser, Debug, Clone)]
#[command(version, about = "Serve WASI testsuite results as HTML")]
pub struct Args {
    /// Credential for the result store API
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Address to listen on
    #[arg(long, env = "WASI_RESULTS_BIND", default_value = "127.0.0.1:8080")]
    pub bind: SocketAddr,

    /// Base URL of the GitHub REST API
    #[arg(long, env = "WASI_RESULTS_API_BASE", default_value = DEFAULT_API_BASE)]
    pub api_base: String,

    /// Repository holding the published result files (owner/name)
    #[arg(long, env = "WASI_RESULTS_REPO", default_value = DEFAULT_REPO)]
    pub results_repo: String,

    /// Branch the result files are published to
    #[arg(long, env = "WASI_RESULTS_BRANCH", default_value = DEFAULT_RESULTS_BRANCH)]
    pub results_branch: String,

    /// Testsuite repository whose commits name result directories (owner/name)
    #[arg(long, env = "WASI_SUITE_REPO", default_value = DEFAULT_REPO)]
    pub suite_repo: String,

    /// Testsuite branch shown on the index page
    #[arg(long, env = "WASI_SUITE_BRANCH", default_value = DEFAULT_SUITE_BRANCH)]
    pub suite_branch: String,

    /// Timeout for each call to the result store, in seconds
    #[arg(long, env = "WASI_RESULTS_TIMEOUT_SECS", default_value_t = 10)]
    pub timeout_secs: u64,
}

impl Args {
    /// Store configuration; fails when the credential is missing or blank
    pub fn store_config(&self) -> ResultsResult<StoreConfig> {
        let credential = Credential::from_optional(self.token.clone())?;
        let results_repo: RepoRef = self.results_repo.parse()?;
        let suite_repo: RepoRef = self.suite_repo.parse()?;

        let config = StoreConfig::new(credential)
            .with_api_base(self.api_base.as_str())
            .with_results(results_repo, self.results_branch.as_str())
            .with_suite(suite_repo, self.suite_branch.as_str())
            .with_timeout(Duration::from_secs(self.timeout_secs));
        config.validate()?;
        Ok(config)
    }
}
