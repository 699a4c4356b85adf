//! Evaluation of a single example's captured output.

use std::path::PathBuf;
use std::time::Instant;

use kitcheck_core::AssertionVerdict;

use crate::config::SuiteConfig;
use crate::example::BundledExample;
use crate::obs::{emit_case_error, emit_case_evaluated};

/// What came out of checking one example.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaseOutcome {
    /// The rule ran and produced a verdict.
    Verdict(AssertionVerdict),

    /// The log could not be read; recorded as an error, not a failure.
    Error(String),
}

/// Result of checking one example.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseResult {
    /// Example checked.
    pub example: BundledExample,

    /// Name of the rule applied.
    pub rule: String,

    /// Client log the rule ran against.
    pub artifact: PathBuf,

    /// Verdict or error.
    pub outcome: CaseOutcome,

    /// Duration in milliseconds.
    pub duration_ms: u64,
}

impl CaseResult {
    /// Whether the example passed.
    pub fn passed(&self) -> bool {
        matches!(&self.outcome, CaseOutcome::Verdict(v) if v.passed)
    }

    /// Whether the example failed on content (not an I/O error).
    pub fn failed(&self) -> bool {
        matches!(&self.outcome, CaseOutcome::Verdict(v) if !v.passed)
    }

    pub fn is_error(&self) -> bool {
        matches!(self.outcome, CaseOutcome::Error(_))
    }

    /// Human-readable message for the report.
    pub fn message(&self) -> &str {
        match &self.outcome {
            CaseOutcome::Verdict(v) => &v.message,
            CaseOutcome::Error(e) => e,
        }
    }

    pub fn verdict(&self) -> Option<&AssertionVerdict> {
        match &self.outcome {
            CaseOutcome::Verdict(v) => Some(v),
            CaseOutcome::Error(_) => None,
        }
    }
}

/// Checks one example's client log with the rule the configuration maps it to.
pub struct CaseRunner;

impl CaseRunner {
    /// Evaluate `example` and return its result.
    ///
    /// Never fails: an unreadable log becomes a [`CaseOutcome::Error`] so the
    /// rest of the suite still runs.
    pub fn evaluate_case(config: &SuiteConfig, example: BundledExample) -> CaseResult {
        let start = Instant::now();
        let rule = config.rule_for(example);
        let artifact = config.client_log(example);

        let outcome = match rule.evaluate(&artifact) {
            Ok(verdict) => CaseOutcome::Verdict(verdict),
            Err(e) => {
                emit_case_error(example.name(), &e);
                CaseOutcome::Error(e.to_string())
            }
        };

        let duration_ms = start.elapsed().as_millis() as u64;
        if let CaseOutcome::Verdict(verdict) = &outcome {
            emit_case_evaluated(example.name(), rule.name(), verdict.passed, duration_ms);
        }

        CaseResult {
            example,
            rule: rule.name().to_string(),
            artifact,
            outcome,
            duration_ms,
        }
    }
}
