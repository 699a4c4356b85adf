//! Bundled example catalogue and the rule each example is checked with.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use kitcheck_core::AssertionRule;
use serde::{Deserialize, Serialize};

use crate::error::SuiteError;

/// Headings the key-value benchmark clients print on a healthy run.
pub const BENCHMARK_KEYWORDS: [&str; 6] = [
    "Command Line Configuration",
    "Setup & Initialization",
    "Starting Benchmark",
    "KV Store Results",
    "Client Workload Statistics",
    "System Server Statistics",
];

/// Example applications shipped in a release kit.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum BundledExample {
    /// doc/tutorials/helloworld
    #[serde(rename = "helloworld")]
    HelloWorld,

    /// examples/voter
    Voter,

    /// examples/voltkv
    #[serde(rename = "voltkv")]
    VoltKv,

    /// examples/voltcache
    #[serde(rename = "voltcache")]
    VoltCache,
}

impl BundledExample {
    pub const ALL: [BundledExample; 4] = [
        BundledExample::HelloWorld,
        BundledExample::Voter,
        BundledExample::VoltKv,
        BundledExample::VoltCache,
    ];

    /// Directory name of the example inside the kit.
    pub fn name(&self) -> &'static str {
        match self {
            BundledExample::HelloWorld => "helloworld",
            BundledExample::Voter => "voter",
            BundledExample::VoltKv => "voltkv",
            BundledExample::VoltCache => "voltcache",
        }
    }

    /// Launcher script inside the example directory.
    pub fn launcher(&self) -> &'static str {
        "run.sh"
    }

    /// Static expectation for the example's client output.
    pub fn default_rule(&self) -> AssertionRule {
        match self {
            BundledExample::HelloWorld => AssertionRule::exact_first_line("Hola, Mundo!"),
            BundledExample::Voter => AssertionRule::bounded_section(
                "Voting Results",
                "The Winner is: Edwina Burnam",
                "The Winner is Edwina Burnam",
                "The Winner is NOT Edwina Burnam",
            ),
            BundledExample::VoltKv | BundledExample::VoltCache => {
                AssertionRule::keyword_set(BENCHMARK_KEYWORDS)
            }
        }
    }

    /// Rule comparing the client output against a recorded baseline.
    pub fn baseline_rule(&self, baseline_root: &Path) -> AssertionRule {
        AssertionRule::baseline_diff(baseline_root, self.name())
    }
}

impl fmt::Display for BundledExample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BundledExample {
    type Err = SuiteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BundledExample::ALL
            .into_iter()
            .find(|e| e.name() == s.trim().to_lowercase())
            .ok_or_else(|| SuiteError::UnknownExample(s.to_string()))
    }
}

/// Which examples a run covers.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SuiteSelection {
    #[default]
    All,
    Only(BundledExample),
}

impl SuiteSelection {
    /// Parse a selection; `"all"` or an example name.
    pub fn parse(s: &str) -> Result<Self, SuiteError> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(SuiteSelection::All)
        } else {
            s.parse().map(SuiteSelection::Only)
        }
    }

    pub fn includes(&self, example: BundledExample) -> bool {
        match self {
            SuiteSelection::All => true,
            SuiteSelection::Only(only) => *only == example,
        }
    }

    /// Selected examples in catalogue order.
    pub fn examples(&self) -> Vec<BundledExample> {
        BundledExample::ALL
            .into_iter()
            .filter(|e| self.includes(*e))
            .collect()
    }
}
