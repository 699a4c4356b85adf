//! Assertion rules applied to captured client logs.

use std::collections::BTreeSet;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, ErrorKind};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{CheckError, Result};
use crate::scan::{first_line, LineScanner};
use crate::section::extract_section_from_file;
use crate::verdict::{AssertionVerdict, VerdictKind};

/// File name of a recorded baseline inside `<baseline_root>/<example>/`.
pub const BASELINE_FILE_NAME: &str = "client_output.txt";

/// Location of the baseline recorded for `example` under `baseline_root`.
pub fn baseline_path(baseline_root: &Path, example: &str) -> PathBuf {
    baseline_root.join(example).join(BASELINE_FILE_NAME)
}

/// Fixed set of keyword lines a log must contain, each at least once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpectedKeywordSet {
    keywords: BTreeSet<String>,
}

impl ExpectedKeywordSet {
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keywords: keywords.into_iter().map(Into::<String>::into).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    pub fn contains(&self, keyword: &str) -> bool {
        self.keywords.contains(keyword)
    }

    pub fn keywords(&self) -> impl Iterator<Item = &str> {
        self.keywords.iter().map(String::as_str)
    }
}

/// A named check over one log artifact.
///
/// The set of rules is closed; callers pick a variant once at configuration
/// time and call [`AssertionRule::evaluate`] once per artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum AssertionRule {
    /// First line must equal `expected` exactly.
    ExactFirstLine { expected: String },

    /// A section bounded by `start` and `end` must be present.
    BoundedSection {
        start: String,
        end: String,
        found_message: String,
        missing_message: String,
    },

    /// Every keyword must appear as a whole (trimmed) line.
    KeywordSetPresence { required: ExpectedKeywordSet },

    /// Artifact must be byte-identical to `baseline`.
    BaselineDiff { baseline: PathBuf },
}

impl AssertionRule {
    pub fn exact_first_line(expected: impl Into<String>) -> Self {
        AssertionRule::ExactFirstLine {
            expected: expected.into(),
        }
    }

    pub fn bounded_section(
        start: impl Into<String>,
        end: impl Into<String>,
        found_message: impl Into<String>,
        missing_message: impl Into<String>,
    ) -> Self {
        AssertionRule::BoundedSection {
            start: start.into(),
            end: end.into(),
            found_message: found_message.into(),
            missing_message: missing_message.into(),
        }
    }

    pub fn keyword_set<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        AssertionRule::KeywordSetPresence {
            required: ExpectedKeywordSet::new(keywords),
        }
    }

    /// Compare against `<baseline_root>/<example>/client_output.txt`.
    pub fn baseline_diff(baseline_root: &Path, example: &str) -> Self {
        AssertionRule::BaselineDiff {
            baseline: baseline_path(baseline_root, example),
        }
    }

    /// Stable rule name.
    pub fn name(&self) -> &'static str {
        match self {
            AssertionRule::ExactFirstLine { .. } => "exact_first_line",
            AssertionRule::BoundedSection { .. } => "bounded_section",
            AssertionRule::KeywordSetPresence { .. } => "keyword_set_presence",
            AssertionRule::BaselineDiff { .. } => "baseline_diff",
        }
    }

    /// Apply the rule to the artifact at `artifact`.
    ///
    /// Only I/O failures on the artifact (or on an existing baseline) are
    /// returned as errors; every content mismatch is a failing verdict.
    pub fn evaluate(&self, artifact: &Path) -> Result<AssertionVerdict> {
        debug!(rule = self.name(), artifact = %artifact.display(), "Evaluating rule");
        match self {
            AssertionRule::ExactFirstLine { expected } => check_first_line(expected, artifact),
            AssertionRule::BoundedSection {
                start,
                end,
                found_message,
                missing_message,
            } => {
                let section = extract_section_from_file(artifact, start, end)?;
                if section.found {
                    Ok(AssertionVerdict::pass(found_message.clone()))
                } else {
                    debug!(
                        captured_lines = section.text.len(),
                        "Section never reached its end marker"
                    );
                    Ok(AssertionVerdict::fail(
                        VerdictKind::NoClosure,
                        missing_message.clone(),
                    ))
                }
            }
            AssertionRule::KeywordSetPresence { required } => check_keywords(required, artifact),
            AssertionRule::BaselineDiff { baseline } => check_baseline(baseline, artifact),
        }
    }
}

fn check_first_line(expected: &str, artifact: &Path) -> Result<AssertionVerdict> {
    match first_line(artifact)? {
        Some(actual) if actual == expected => Ok(AssertionVerdict::pass(expected)),
        Some(actual) => Ok(AssertionVerdict::fail(
            VerdictKind::Mismatch,
            format!("Expected '{expected}'. Actually returned: '{actual}'"),
        )),
        None => Ok(AssertionVerdict::fail(
            VerdictKind::NoContent,
            format!(
                "Expected '{expected}'. Actually returned no content: {} is empty",
                artifact.display()
            ),
        )),
    }
}

fn check_keywords(required: &ExpectedKeywordSet, artifact: &Path) -> Result<AssertionVerdict> {
    let mut seen = BTreeSet::new();
    for line in LineScanner::open(artifact)? {
        let line = line?;
        let trimmed = line.trim();
        if required.contains(trimmed)
            && seen.insert(trimmed.to_string())
            && seen.len() == required.len()
        {
            break;
        }
    }

    let missing: BTreeSet<String> = required
        .keywords()
        .filter(|k| !seen.contains(*k))
        .map(str::to_string)
        .collect();

    if missing.is_empty() {
        Ok(
            AssertionVerdict::pass("The client output has all the expected key words")
                .with_missing_keys(missing),
        )
    } else {
        Ok(AssertionVerdict::fail(
            VerdictKind::MissingKeywords,
            format!(
                "The client output does not have all the expected key words: {} of {} missing",
                missing.len(),
                required.len()
            ),
        )
        .with_missing_keys(missing))
    }
}

fn check_baseline(baseline: &Path, artifact: &Path) -> Result<AssertionVerdict> {
    let baseline_meta = match fs::metadata(baseline) {
        Ok(meta) => meta,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            warn!(baseline = %baseline.display(), "Baseline file not found");
            return Ok(AssertionVerdict::fail(
                VerdictKind::BaselineMissing,
                format!("Warning: cannot find the baseline file: {}", baseline.display()),
            ));
        }
        Err(e) => return Err(CheckError::unreadable(baseline, e)),
    };
    let artifact_meta = fs::metadata(artifact).map_err(|e| CheckError::unreadable(artifact, e))?;

    let identical =
        baseline_meta.len() == artifact_meta.len() && same_bytes(baseline, artifact)?;

    let paths = format!(
        "\nBaseline: {}\nThe client output: {}",
        baseline.display(),
        artifact.display()
    );
    if identical {
        Ok(AssertionVerdict::pass(format!(
            "The client output matches the baseline{paths}"
        )))
    } else {
        Ok(AssertionVerdict::fail(
            VerdictKind::Mismatch,
            format!("Warning: the client output does NOT match the baseline{paths}"),
        ))
    }
}

fn same_bytes(a: &Path, b: &Path) -> Result<bool> {
    let mut ra = BufReader::new(File::open(a).map_err(|e| CheckError::unreadable(a, e))?);
    let mut rb = BufReader::new(File::open(b).map_err(|e| CheckError::unreadable(b, e))?);

    loop {
        let ba = ra.fill_buf().map_err(|e| CheckError::unreadable(a, e))?;
        let bb = rb.fill_buf().map_err(|e| CheckError::unreadable(b, e))?;
        if ba.is_empty() || bb.is_empty() {
            return Ok(ba.is_empty() && bb.is_empty());
        }

        let n = ba.len().min(bb.len());
        if ba[..n] != bb[..n] {
            return Ok(false);
        }
        ra.consume(n);
        rb.consume(n);
    }
}
