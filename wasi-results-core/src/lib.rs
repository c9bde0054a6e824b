//! WASI Results Core - report model, result store access and HTML views
//!
//! This library holds everything the results viewer needs that is not tied to
//! an HTTP server: the JSON report model produced by the WASI testsuite
//! runners, pass/fail aggregation, access to the remote store holding those
//! reports, and rendering of the index and detail pages.
//!
//! # Architecture
//!
//! - **Model**: [`Report`], [`Runtime`], [`TestResult`] as stored upstream
//! - **Aggregation**: [`summary::summarize`] and [`summary::sort_by_path`]
//! - **Store**: the [`ResultStore`] trait with a GitHub-backed implementation
//!   and an in-memory one
//! - **Rendering**: [`render::render_index`] and [`render::render_detail`],
//!   with a single escape path for every dynamic value
//!
//! Every entity is built fresh per request; nothing here caches or persists.

#![forbid(unsafe_code)]
// Lints configured in Cargo.toml

// Core modules
pub mod config;
pub mod error;
pub mod key;
pub mod model;
pub mod render;
pub mod store;
pub mod summary;

// Public API
pub use config::{
    Credential,
    RepoRef,
    StoreConfig,
};
pub use error::{
    ResultsError,
    ResultsResult,
};
pub use key::StoreKey;
pub use model::{
    Entry,
    Report,
    Runtime,
    Status,
    TestResult,
};
pub use store::{
    CommitSha,
    GitHubStore,
    MemoryStore,
    RawBlob,
    ResultStore,
};
pub use summary::Summary;

/// Library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
