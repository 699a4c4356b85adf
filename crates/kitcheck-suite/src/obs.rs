//! Structured observability hooks for suite lifecycle events.
//!
//! Events are emitted at `info!` level (warnings for failures and errors)
//! with an `event` field so JSON log consumers can filter on it.

use tracing::{info, warn};

/// RAII guard that enters a suite-scoped tracing span.
///
/// ```ignore
/// let _span = SuiteSpan::enter("exp_test", "LINUX-voltdb-2.8.1.tar.gz");
/// ```
pub struct SuiteSpan {
    _span: tracing::span::EnteredSpan,
}

impl SuiteSpan {
    pub fn enter(suite: &str, package: &str) -> Self {
        let span = tracing::info_span!("kitcheck.suite", suite = %suite, package = %package);
        Self {
            _span: span.entered(),
        }
    }
}

/// Emit event: suite started with the number of examples to check.
pub fn emit_suite_started(suite: &str, examples: usize) {
    info!(event = "suite.started", suite = %suite, examples = examples);
}

/// Emit event: an example was selected but is not in the unpacked kit.
pub fn emit_example_not_found(example: &str) {
    warn!(event = "case.not_found", example = %example);
}

/// Emit event: one example's log was evaluated into a verdict.
pub fn emit_case_evaluated(example: &str, rule: &str, passed: bool, duration_ms: u64) {
    if passed {
        info!(
            event = "case.evaluated",
            example = %example,
            rule = %rule,
            passed = passed,
            duration_ms = duration_ms,
        );
    } else {
        warn!(
            event = "case.evaluated",
            example = %example,
            rule = %rule,
            passed = passed,
            duration_ms = duration_ms,
        );
    }
}

/// Emit event: one example's log could not be read.
pub fn emit_case_error(example: &str, error: &dyn std::fmt::Display) {
    warn!(event = "case.error", example = %example, error = %error);
}

/// Emit event: suite finished.
pub fn emit_suite_finished(passed: usize, failed: usize, errors: usize, duration_ms: u64) {
    info!(
        event = "suite.finished",
        passed = passed,
        failed = failed,
        errors = errors,
        duration_ms = duration_ms,
    );
}
