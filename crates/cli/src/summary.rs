//! Parses the test runner's textual output into suite totals.

use anyhow::{Context, Result};
use regex_lite::Regex;

/// Aggregated verdict of one suite pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SuiteSummary {
    pub passed: u64,
    pub failed: u64,
    pub skipped: u64,
}

impl SuiteSummary {
    pub fn total(&self) -> u64 {
        self.passed + self.failed + self.skipped
    }

    pub fn all_passed(&self) -> bool {
        self.failed == 0 && self.total() > 0
    }
}

/// Sums every `test result:` line in a runner transcript. The runner emits
/// one line per test binary, so a workspace run produces several.
pub fn parse_summary(output: &str) -> Result<SuiteSummary> {
    let line = Regex::new(r"test result: \w+\. (\d+) passed; (\d+) failed; (\d+) ignored")
        .context("summary pattern")?;

    let mut summary = SuiteSummary::default();
    for caps in output.lines().filter_map(|l| line.captures(l)) {
        summary.passed += caps[1].parse::<u64>().unwrap_or(0);
        summary.failed += caps[2].parse::<u64>().unwrap_or(0);
        summary.skipped += caps[3].parse::<u64>().unwrap_or(0);
    }
    Ok(summary)
}
