//! Suite orchestration: one case per selected example, run in sequence.

use std::time::Instant;

use tracing::info;

use crate::config::SuiteConfig;
use crate::discovery::discover_examples;
use crate::error::Result;
use crate::example::BundledExample;
use crate::obs::{emit_example_not_found, emit_suite_finished, emit_suite_started, SuiteSpan};
use crate::runner::{CaseResult, CaseRunner};

/// Result of a complete suite run.
#[derive(Debug, Clone)]
pub struct SuiteResult {
    /// Results of individual examples, in catalogue order.
    pub cases: Vec<CaseResult>,

    /// Total duration in milliseconds.
    pub duration_ms: u64,
}

impl SuiteResult {
    pub fn passed_count(&self) -> usize {
        self.cases.iter().filter(|c| c.passed()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.cases.iter().filter(|c| c.failed()).count()
    }

    pub fn error_count(&self) -> usize {
        self.cases.iter().filter(|c| c.is_error()).count()
    }

    /// Whether every case passed.
    pub fn success(&self) -> bool {
        self.cases.iter().all(CaseResult::passed)
    }
}

/// Runs the configured examples one at a time.
pub struct SuiteRunner {
    config: SuiteConfig,
}

impl SuiteRunner {
    pub fn new(config: SuiteConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SuiteConfig {
        &self.config
    }

    /// Examples this run will check.
    ///
    /// Without a kit root this is the selection. With one, selected examples
    /// missing from the kit are dropped with a warning.
    pub fn examples(&self) -> Result<Vec<BundledExample>> {
        let selected = self.config.selection.examples();
        let Some(kit_root) = &self.config.kit_root else {
            return Ok(selected);
        };

        let discovered = discover_examples(kit_root, self.config.selection)?;
        Ok(selected
            .into_iter()
            .filter(|example| {
                let present = discovered.contains(example);
                if !present {
                    emit_example_not_found(example.name());
                }
                present
            })
            .collect())
    }

    /// Evaluate every example once.
    ///
    /// Only kit discovery can fail the run; per-example problems are recorded
    /// in the returned cases.
    pub fn run(&self) -> Result<SuiteResult> {
        let start = Instant::now();
        let _span = SuiteSpan::enter(&self.config.suite_name, &self.config.archive_name());

        let examples = self.examples()?;
        emit_suite_started(&self.config.suite_name, examples.len());

        let mut cases = Vec::with_capacity(examples.len());
        for example in examples {
            info!(example = %example, "Checking example");
            cases.push(CaseRunner::evaluate_case(&self.config, example));
        }

        let result = SuiteResult {
            cases,
            duration_ms: start.elapsed().as_millis() as u64,
        };
        emit_suite_finished(
            result.passed_count(),
            result.failed_count(),
            result.error_count(),
            result.duration_ms,
        );
        Ok(result)
    }
}
