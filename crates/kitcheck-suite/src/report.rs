//! Suite report artifacts.
//!
//! The report is a flat list of case records. Two renderings are provided:
//! - `exp_rpt.xml` - JUnit-style XML consumed by CI dashboards
//! - an optional pretty JSON copy of the same records

use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::config::SuiteConfig;
use crate::runner::CaseResult;
use crate::suite::SuiteResult;

pub const REPORT_SCHEMA_VERSION: &str = "1.0";

/// Outcome of one case as reported.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CaseStatus {
    Passed,
    Failed,
    Error,
}

/// One `<testcase>` worth of data.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CaseRecord {
    pub suite: String,
    pub package: String,
    pub name: String,
    pub rule: String,
    pub status: CaseStatus,
    pub message: String,
    /// Missing keywords; empty unless a keyword check failed.
    pub missing_keywords: Vec<String>,
    pub duration_ms: u64,
}

impl CaseRecord {
    pub fn from_case(config: &SuiteConfig, case: &CaseResult) -> Self {
        let status = if case.is_error() {
            CaseStatus::Error
        } else if case.passed() {
            CaseStatus::Passed
        } else {
            CaseStatus::Failed
        };

        let missing_keywords = match (status, case.verdict()) {
            (CaseStatus::Failed, Some(v)) => v
                .missing_keys
                .as_ref()
                .map(|keys| keys.iter().cloned().collect())
                .unwrap_or_default(),
            _ => Vec::new(),
        };

        Self {
            suite: config.suite_name.clone(),
            package: config.archive_name(),
            name: case.example.name().to_string(),
            rule: case.rule.clone(),
            status,
            message: case.message().to_string(),
            missing_keywords,
            duration_ms: case.duration_ms,
        }
    }
}

/// Whole-run report.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SuiteReport {
    pub schema_version: String,
    pub generated_at: DateTime<Utc>,
    pub suite_name: String,
    pub package: String,
    pub url: String,
    pub hostname: String,
    pub release: String,
    pub cases: Vec<CaseRecord>,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub errors: usize,
}

impl SuiteReport {
    pub fn new(config: &SuiteConfig, result: &SuiteResult) -> Self {
        Self::from_records(
            config,
            result
                .cases
                .iter()
                .map(|c| CaseRecord::from_case(config, c))
                .collect(),
        )
    }

    pub fn from_records(config: &SuiteConfig, cases: Vec<CaseRecord>) -> Self {
        let count = |status: CaseStatus| cases.iter().filter(|c| c.status == status).count();
        let passed = count(CaseStatus::Passed);
        let failed = count(CaseStatus::Failed);
        let errors = count(CaseStatus::Error);

        Self {
            schema_version: REPORT_SCHEMA_VERSION.to_string(),
            generated_at: Utc::now(),
            suite_name: config.suite_name.clone(),
            package: config.archive_name(),
            url: config.kit_url(),
            hostname: config.hostname.clone(),
            release: config.release.clone(),
            total: cases.len(),
            cases,
            passed,
            failed,
            errors,
        }
    }

    pub fn success(&self) -> bool {
        self.failed == 0 && self.errors == 0
    }
}

/// Render the JUnit-style XML report.
///
/// Each case becomes its own `<testsuite>` holding one `<testcase>`; passes
/// carry an `<info>` element, failures a `<failure>` (with a `<Missing>`
/// child listing absent keywords), errors an `<error>`.
pub fn render_junit_xml(report: &SuiteReport) -> String {
    let timestamp = report
        .generated_at
        .to_rfc3339_opts(SecondsFormat::Secs, true);

    let mut out = String::new();
    out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    out.push_str("<project>\n");
    let _ = writeln!(
        out,
        "  <testsuites package=\"{}\" URL=\"{}\" hostname=\"{}\">",
        escape_attr(&report.package),
        escape_attr(&report.url),
        escape_attr(&report.hostname)
    );

    for case in &report.cases {
        let failures = usize::from(case.status == CaseStatus::Failed);
        let errors = usize::from(case.status == CaseStatus::Error);
        let _ = writeln!(
            out,
            "    <testsuite errors=\"{}\" failures=\"{}\" name=\"{}\" tests=\"1\" time=\"{:.3}\" timestamp=\"{}\">",
            errors,
            failures,
            escape_attr(&case.suite),
            case.duration_ms as f64 / 1000.0,
            timestamp
        );
        let _ = writeln!(
            out,
            "      <testcase classname=\"{}\" name=\"{}\">",
            escape_attr(&case.package),
            escape_attr(&case.name)
        );

        let message = escape_attr(&case.message);
        match case.status {
            CaseStatus::Passed => {
                let _ = writeln!(out, "        <info Message=\"{message}\"/>");
            }
            CaseStatus::Failed if case.missing_keywords.is_empty() => {
                let _ = writeln!(out, "        <failure Message=\"{message}\"/>");
            }
            CaseStatus::Failed => {
                let _ = writeln!(out, "        <failure Message=\"{message}\">");
                let _ = writeln!(
                    out,
                    "          <Missing MissingString=\"{}\"/>",
                    escape_attr(&case.missing_keywords.join(", "))
                );
                out.push_str("        </failure>\n");
            }
            CaseStatus::Error => {
                let _ = writeln!(out, "        <error Error=\"{message}\"/>");
            }
        }

        out.push_str("      </testcase>\n");
        out.push_str("    </testsuite>\n");
    }

    out.push_str("  </testsuites>\n");
    out.push_str("</project>\n");
    out
}

/// Write the XML report.
pub fn write_junit_xml(path: &Path, report: &SuiteReport) -> Result<()> {
    std::fs::write(path, render_junit_xml(report)).with_context(|| format!("write {:?}", path))?;
    Ok(())
}

/// Write the report as pretty JSON.
pub fn write_report_json(path: &Path, report: &SuiteReport) -> Result<()> {
    let content = serde_json::to_string_pretty(report).context("serialize suite report")?;
    std::fs::write(path, content).with_context(|| format!("write {:?}", path))?;
    Ok(())
}

fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            '\n' => out.push_str("&#10;"),
            '\r' => out.push_str("&#13;"),
            '\t' => out.push_str("&#9;"),
            // Not representable in XML 1.0, even as a character reference.
            c if is_xml_forbidden(c) => out.push(char::REPLACEMENT_CHARACTER),
            c => out.push(c),
        }
    }
    out
}

fn is_xml_forbidden(c: char) -> bool {
    matches!(
        c,
        '\u{0}'..='\u{8}' | '\u{b}' | '\u{c}' | '\u{e}'..='\u{1f}' | '\u{fffe}' | '\u{ffff}'
    )
}
