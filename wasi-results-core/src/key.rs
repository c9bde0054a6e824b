//! Validated store keys
//!
//! Request paths are untrusted. A [`StoreKey`] can only be built from a path
//! whose segments are non-empty, are not `.` or `..`, and use a conservative
//! alphabet, so a key can be spliced into an upstream URL as-is.

use std::fmt;

use crate::error::{
    ResultsError,
    ResultsResult,
};

/// Suffix carried by every report blob
pub const REPORT_SUFFIX: &str = ".json";

/// A relative path into the result store
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StoreKey(String);

impl StoreKey {
    /// Validate a relative path such as `abc123/wasmtime/1.0.json`
    pub fn parse(path: &str) -> ResultsResult<Self> {
        if path.is_empty() {
            return Err(invalid(path, "empty key"));
        }
        for segment in path.split('/') {
            validate_segment(path, segment)?;
        }
        Ok(Self(path.to_string()))
    }

    /// Key of the report blob for a page path, adding `.json` unless present
    pub fn report(path: &str) -> ResultsResult<Self> {
        if path.is_empty() {
            return Err(invalid(path, "empty key"));
        }
        if path.ends_with(REPORT_SUFFIX) {
            Self::parse(path)
        } else {
            Self::parse(&format!("{}{}", path, REPORT_SUFFIX))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Path segments of the key
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/')
    }

    /// Key without its `.json` suffix, as used in page links
    pub fn page_path(&self) -> &str {
        self.0.strip_suffix(REPORT_SUFFIX).unwrap_or(&self.0)
    }

    /// Commit directory the key lives under, when it has one
    ///
    /// Report keys are laid out as `<commit>/<runtime>/<version>.json`; a
    /// single-segment key has no commit component.
    pub fn commit(&self) -> Option<&str> {
        self.0.split_once('/').map(|(commit, _)| commit)
    }
}

impl fmt::Display for StoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for StoreKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

fn validate_segment(path: &str, segment: &str) -> ResultsResult<()> {
    if segment.is_empty() {
        return Err(invalid(path, "empty segment"));
    }
    if segment == "." || segment == ".." {
        return Err(invalid(path, "relative segment"));
    }
    if let Some(c) = segment.chars().find(|c| !is_key_char(*c)) {
        return Err(invalid(path, &format!("character {:?} not allowed", c)));
    }
    Ok(())
}

fn is_key_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '+')
}

fn invalid(path: &str, reason: &str) -> ResultsError {
    ResultsError::InvalidKey {
        key:    path.escape_debug().to_string(),
        reason: reason.to_string(),
    }
}
