//! Lazy line-at-a-time reading of captured log artifacts.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::error::{CheckError, Result};

/// Forward-only reader that yields one line of a log artifact per call.
///
/// Line terminators (`\n` and `\r\n`) are stripped. Bytes that are not valid
/// UTF-8 are replaced rather than failing the scan, since console output from
/// the example applications is not guaranteed to be clean text.
///
/// The file handle is released when the scanner is dropped, whether or not
/// the scan reached end-of-file.
pub struct LineScanner {
    path: PathBuf,
    reader: BufReader<File>,
    buf: Vec<u8>,
    done: bool,
}

impl LineScanner {
    /// Open `path` for scanning.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| CheckError::unreadable(path, e))?;
        Ok(Self {
            path: path.to_path_buf(),
            reader: BufReader::new(file),
            buf: Vec::new(),
            done: false,
        })
    }

    /// Path of the artifact being scanned.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Iterator for LineScanner {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        self.buf.clear();
        match self.reader.read_until(b'\n', &mut self.buf) {
            Ok(0) => {
                self.done = true;
                None
            }
            Ok(_) => {
                if self.buf.last() == Some(&b'\n') {
                    self.buf.pop();
                    if self.buf.last() == Some(&b'\r') {
                        self.buf.pop();
                    }
                }
                Some(Ok(String::from_utf8_lossy(&self.buf).into_owned()))
            }
            Err(e) => {
                self.done = true;
                Some(Err(CheckError::unreadable(&self.path, e)))
            }
        }
    }
}

/// Read only the first line of an artifact, with trailing whitespace removed.
///
/// Returns `Ok(None)` when the artifact has no lines at all.
pub fn first_line(path: impl AsRef<Path>) -> Result<Option<String>> {
    let mut scanner = LineScanner::open(path)?;
    let line = scanner.next().transpose()?;
    Ok(line.map(|l| l.trim_end().to_string()))
}
