//! # WASI Results Daemon (wasi-resultsd)
//!
//! Serves WASI testsuite conformance results as HTML.
//!
//! ## Usage
//!
//! ```bash
//! GITHUB_TOKEN=... wasi-resultsd [--bind 127.0.0.1:8080] [--suite-branch main]
//! ```
//!
//! Log output is controlled by `RUST_LOG` (filter, default `info`) and
//! `RUST_LOG_FORMAT` (`pretty`, `compact` or `json`).

#![warn(missing_docs)]

use std::env;

use anyhow::{
    Context,
    Result,
};
use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;
use wasi_resultsd::{
    github_state,
    serve,
    Args,
};

#[tokio::main]
async fn main() -> Result<()> {
    initialize_tracing();

    let args = Args::parse();

    // No credential, no server
    let config = args.store_config().context("Invalid configuration")?;
    info!(
        results = %config.results_repo,
        results_branch = %config.results_branch,
        suite = %config.suite_repo,
        suite_branch = %config.suite_branch,
        timeout_secs = config.timeout.as_secs(),
        "result store configured"
    );
    let state = github_state(config).context("Failed to create result store client")?;

    let listener = TcpListener::bind(args.bind)
        .await
        .with_context(|| format!("Failed to bind {}", args.bind))?;
    info!(addr = %args.bind, "serving WASI results");

    serve(listener, state).await.context("Server error")?;
    Ok(())
}

fn initialize_tracing() {
    let format = env::var("RUST_LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true);

    match format.as_str() {
        "json" => subscriber.json().init(),
        "compact" => subscriber.compact().init(),
        _ => subscriber.pretty().init(),
    }
}
