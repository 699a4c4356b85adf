//! kitcheck core - log assertion engine
//!
//! Scans captured console logs of example applications and turns them into
//! pass/fail verdicts:
//! - Lazy line scanning of log artifacts
//! - Bounded section extraction between two markers
//! - A closed set of assertion rules (first line, section, keywords, baseline)

pub mod error;
pub mod rule;
pub mod scan;
pub mod section;
pub mod verdict;

// Re-export key types
pub use error::{CheckError, Result};
pub use rule::{baseline_path, AssertionRule, ExpectedKeywordSet, BASELINE_FILE_NAME};
pub use scan::{first_line, LineScanner};
pub use section::{extract_section, extract_section_from_file, SectionMatch};
pub use verdict::{AssertionVerdict, VerdictKind};
