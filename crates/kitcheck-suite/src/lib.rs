//! kitcheck suite - smoke checks over a release kit's bundled examples
//!
//! Provides a suite runner that:
//! - Maps each bundled example to the assertion rule for its client output
//! - Evaluates every selected example once, in sequence
//! - Renders a JUnit-style report of the verdicts

pub mod config;
pub mod discovery;
pub mod error;
pub mod example;
pub mod obs;
pub mod report;
pub mod runner;
pub mod suite;
pub mod telemetry;

// Re-export key types
pub use config::{local_hostname, read_release, PackageKind, SuiteConfig};
pub use discovery::discover_examples;
pub use error::{Result, SuiteError};
pub use example::{BundledExample, SuiteSelection, BENCHMARK_KEYWORDS};
pub use report::{
    render_junit_xml, write_junit_xml, write_report_json, CaseRecord, CaseStatus, SuiteReport,
};
pub use runner::{CaseOutcome, CaseResult, CaseRunner};
pub use suite::{SuiteResult, SuiteRunner};
pub use telemetry::init_tracing;
