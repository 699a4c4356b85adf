//! Locate runnable examples inside an unpacked release kit.

use std::collections::BTreeSet;
use std::path::Path;

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::{Result, SuiteError};
use crate::example::{BundledExample, SuiteSelection};

/// Walk `kit_root` and return every selected example that ships an
/// executable launcher.
///
/// Directory names must match an example name exactly. Symlinks are
/// followed. Only an unreadable `kit_root` is an error; entries below it that
/// cannot be read are logged and skipped.
pub fn discover_examples(
    kit_root: &Path,
    selection: SuiteSelection,
) -> Result<BTreeSet<BundledExample>> {
    let mut found = BTreeSet::new();

    let walker = WalkDir::new(kit_root)
        .min_depth(1)
        .follow_links(true)
        .sort_by_file_name();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(source) if source.depth() == 0 => {
                return Err(SuiteError::Discovery {
                    root: kit_root.to_path_buf(),
                    source,
                });
            }
            Err(e) => {
                warn!(
                    path = ?e.path(),
                    error = %e,
                    "Skipping unreadable entry in kit"
                );
                continue;
            }
        };
        if !entry.file_type().is_dir() {
            continue;
        }

        let Some(name) = entry.file_name().to_str() else {
            continue;
        };
        let Some(example) = BundledExample::ALL.into_iter().find(|e| e.name() == name) else {
            continue;
        };
        if !selection.includes(example) || found.contains(&example) {
            continue;
        }

        let launcher = entry.path().join(example.launcher());
        if is_executable(&launcher) {
            debug!(example = %example, dir = %entry.path().display(), "Discovered example");
            found.insert(example);
        } else {
            debug!(
                example = %example,
                launcher = %launcher.display(),
                "Skipping example without executable launcher"
            );
        }
    }

    Ok(found)
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
