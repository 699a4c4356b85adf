//! Bounded section extraction between a start marker and an end marker.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::scan::LineScanner;

/// Outcome of a section scan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionMatch {
    /// Whether a start marker and, after it, an end marker were observed.
    pub found: bool,

    /// Captured lines. Without closure this is the partial capture, kept for
    /// diagnostics only.
    pub text: Vec<String>,
}

impl SectionMatch {
    /// Captured lines, but only when the section closed.
    pub fn closed_text(&self) -> Option<&[String]> {
        if self.found {
            Some(&self.text)
        } else {
            None
        }
    }
}

/// Scan `lines` for the first run that starts at a line containing
/// `start_marker` and ends at a line containing `end_marker`.
///
/// Both marker lines are part of the captured text. Markers match by
/// substring. A start marker seen while already capturing is a no-op, and an
/// end marker seen before any start marker is ignored. Scanning stops at the
/// first closure.
pub fn extract_section<I, S>(lines: I, start_marker: &str, end_marker: &str) -> SectionMatch
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut extractor = SectionExtractor::new(start_marker, end_marker);
    for line in lines {
        if extractor.feed(line.as_ref()) {
            break;
        }
    }
    extractor.finish()
}

/// Run [`extract_section`] over a log artifact, reading it line by line.
///
/// I/O failures, including ones hit mid-scan, propagate.
pub fn extract_section_from_file(
    path: impl AsRef<Path>,
    start_marker: &str,
    end_marker: &str,
) -> Result<SectionMatch> {
    let mut extractor = SectionExtractor::new(start_marker, end_marker);
    for line in LineScanner::open(path)? {
        if extractor.feed(&line?) {
            break;
        }
    }
    Ok(extractor.finish())
}

struct SectionExtractor<'a> {
    start_marker: &'a str,
    end_marker: &'a str,
    inside: bool,
    found: bool,
    text: Vec<String>,
}

impl<'a> SectionExtractor<'a> {
    fn new(start_marker: &'a str, end_marker: &'a str) -> Self {
        Self {
            start_marker,
            end_marker,
            inside: false,
            found: false,
            text: Vec::new(),
        }
    }

    /// Consume one line. Returns `true` once the section has closed.
    fn feed(&mut self, line: &str) -> bool {
        if !self.inside && line.contains(self.start_marker) {
            self.inside = true;
        }
        if !self.inside {
            return false;
        }

        self.text.push(line.to_string());
        if line.contains(self.end_marker) {
            self.inside = false;
            self.found = true;
        }
        self.found
    }

    fn finish(self) -> SectionMatch {
        SectionMatch {
            found: self.found,
            text: self.text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn captures_inclusive_section() {
        let m = extract_section(["x", "START", "mid", "END", "y"], "START", "END");
        assert!(m.found);
        assert_eq!(m.text, vec!["START", "mid", "END"]);
        assert_eq!(m.closed_text(), Some(&m.text[..]));
    }

    #[test]
    fn markers_match_by_substring() {
        let m = extract_section(
            [
                " Voting Results",
                " ----",
                "    The Winner is: Edwina Burnam",
            ],
            "Voting Results",
            "The Winner is: Edwina Burnam",
        );
        assert!(m.found);
        assert_eq!(m.text.len(), 3);
    }

    #[test]
    fn no_start_marker_means_nothing_found() {
        let m = extract_section(["a", "END", "b"], "START", "END");
        assert!(!m.found);
        assert!(m.text.is_empty());
        assert!(m.closed_text().is_none());
    }

    #[test]
    fn end_before_start_is_ignored() {
        let m = extract_section(["END", "START", "tail"], "START", "END");
        assert!(!m.found);
        assert_eq!(m.text, vec!["START", "tail"]);
        assert!(m.closed_text().is_none());
    }

    #[test]
    fn repeated_start_while_inside_keeps_capturing() {
        let m = extract_section(["START", "a", "START", "b", "END"], "START", "END");
        assert!(m.found);
        assert_eq!(m.text, vec!["START", "a", "START", "b", "END"]);
    }

    #[test]
    fn single_line_with_both_markers_closes() {
        let m = extract_section(["pre", "START ... END", "post"], "START", "END");
        assert!(m.found);
        assert_eq!(m.text, vec!["START ... END"]);
    }

    #[test]
    fn stops_at_first_closure() {
        let m = extract_section(
            ["START", "one", "END", "START", "two", "END"],
            "START",
            "END",
        );
        assert!(m.found);
        assert_eq!(m.text, vec!["START", "one", "END"]);
    }

    #[test]
    fn unclosed_section_keeps_partial_text() {
        let m = extract_section(["START", "a", "b"], "START", "END");
        assert!(!m.found);
        assert_eq!(m.text, vec!["START", "a", "b"]);
    }

    #[test]
    fn empty_input() {
        let m = extract_section(Vec::<String>::new(), "START", "END");
        assert_eq!(m, SectionMatch::default());
    }
}
