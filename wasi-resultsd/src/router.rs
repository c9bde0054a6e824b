//! Request path dispatch
//!
//! Routing is a pure function of the request path so it can be tested without
//! a server. The query string is never part of the input.

use wasi_results_core::{
    ResultsResult,
    StoreKey,
};

/// Prefix of the raw pass-through route
pub const RAW_PREFIX: &str = "/raw/";
/// Liveness probe path
pub const HEALTH_PATH: &str = "/healthz";

/// Page selected by a request path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `/`: every runtime's latest report
    Index,
    /// `/<key>`: one report as HTML
    Detail(StoreKey),
    /// `/raw/<key>.json`: the stored blob, forwarded as-is
    Raw(StoreKey),
    /// `/healthz`
    Health,
}

impl Route {
    /// Dispatch a request path (without query string)
    pub fn parse(path: &str) -> ResultsResult<Self> {
        if path == "/" || path.is_empty() {
            return Ok(Self::Index);
        }
        if path == HEALTH_PATH {
            return Ok(Self::Health);
        }
        if let Some(rest) = path.strip_prefix(RAW_PREFIX) {
            return StoreKey::report(rest).map(Self::Raw);
        }

        let key = path.strip_prefix('/').unwrap_or(path);
        let key = key.strip_suffix('/').unwrap_or(key);
        StoreKey::report(key).map(Self::Detail)
    }
}
