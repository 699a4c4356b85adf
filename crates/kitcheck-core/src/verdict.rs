//! Assertion verdicts.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Why a verdict came out the way it did.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum VerdictKind {
    /// The artifact met the expectation.
    Passed,

    /// Content was present but differed from the expectation.
    Mismatch,

    /// The artifact had no lines to inspect.
    NoContent,

    /// The bounded section never reached its end marker.
    NoClosure,

    /// One or more required keywords were absent.
    MissingKeywords,

    /// No baseline exists to compare against; inconclusive.
    BaselineMissing,
}

/// Result of applying one assertion rule to one artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssertionVerdict {
    /// Whether the rule passed.
    pub passed: bool,

    /// Human-readable diagnostic.
    pub message: String,

    /// Required keywords not observed. Only keyword checks populate this;
    /// it is empty (not `None`) when such a check passes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub missing_keys: Option<BTreeSet<String>>,

    /// Outcome classification.
    pub kind: VerdictKind,
}

impl AssertionVerdict {
    pub fn pass(message: impl Into<String>) -> Self {
        Self {
            passed: true,
            message: message.into(),
            missing_keys: None,
            kind: VerdictKind::Passed,
        }
    }

    pub fn fail(kind: VerdictKind, message: impl Into<String>) -> Self {
        Self {
            passed: false,
            message: message.into(),
            missing_keys: None,
            kind,
        }
    }

    /// Attach the set of missing keywords.
    pub fn with_missing_keys(mut self, keys: BTreeSet<String>) -> Self {
        self.missing_keys = Some(keys);
        self
    }

    /// True when the verdict is neither a pass nor a real failure.
    pub fn is_inconclusive(&self) -> bool {
        self.kind == VerdictKind::BaselineMissing
    }
}
