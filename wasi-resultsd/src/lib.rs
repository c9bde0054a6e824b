//! # WASI Results Daemon (wasi-resultsd)
//!
//! Serves published WASI testsuite results as HTML. Each request is handled
//! independently: the path selects a page, the page's reports are fetched from
//! the result store, and the rendered document is returned.
//!
//! | Path | Response |
//! |------|----------|
//! | `/` | every runtime's latest report for the suite branch head |
//! | `/<commit>/<runtime>/<version>` | one report, test by test |
//! | `/raw/<commit>/<runtime>/<version>.json` | the stored JSON, forwarded as-is |
//! | `/healthz` | `ok` |

#![forbid(unsafe_code)]

pub mod app;
pub mod cli;
pub mod responder;
pub mod router;

use std::sync::Arc;

pub use app::{
    app,
    serve,
    AppState,
};
pub use cli::Args;
pub use router::Route;
use wasi_results_core::{
    GitHubStore,
    ResultsResult,
    StoreConfig,
};

/// Application state backed by the GitHub result store
pub fn github_state(config: StoreConfig) -> ResultsResult<AppState> {
    let suite_branch = config.suite_branch.clone();
    let store = GitHubStore::new(config)?;
    Ok(AppState::new(Arc::new(store), suite_branch))
}
