//! Pass/fail aggregation and stable ordering of test results

use crate::model::{
    Status,
    TestResult,
};

/// Pass/fail counts derived from a result list
///
/// `total` counts every result; statuses other than PASS and FAIL count toward
/// `total` only, so `passed + failed <= total`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub total:  usize,
    pub passed: usize,
    pub failed: usize,
}

impl Summary {
    /// Fraction of passing tests, 0.0 for an empty report
    pub fn pass_ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.passed as f64 / self.total as f64
        }
    }
}

/// Count results in a single pass
pub fn summarize(results: &[TestResult]) -> Summary {
    results.iter().fold(
        Summary {
            total: results.len(),
            ..Summary::default()
        },
        |mut summary, result| {
            match result.status {
                Status::Pass => summary.passed += 1,
                Status::Fail => summary.failed += 1,
                Status::Other(_) => {},
            }
            summary
        },
    )
}

/// Results ordered by path, byte-wise, keeping input order for equal paths
pub fn sort_by_path(results: &[TestResult]) -> Vec<TestResult> {
    let mut sorted = results.to_vec();
    // `sort_by` is stable
    sorted.sort_by(|a, b| a.path.as_bytes().cmp(b.path.as_bytes()));
    sorted
}
