//! Suite configuration and release-kit identity.

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use kitcheck_core::{first_line, AssertionRule};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SuiteError};
use crate::example::{BundledExample, SuiteSelection};

/// Where candidate kits are published.
pub const DEFAULT_KIT_URL_ROOT: &str = "http://volt0/kits/candidate/";

/// Test name recorded on every `<testsuite>` element.
pub const DEFAULT_SUITE_NAME: &str = "exp_test";

/// Directory the launcher captures `<example>_client` / `<example>_server` logs into.
pub const DEFAULT_LOGS_DIR: &str = "/tmp";

/// Baselines live under `<root>/<example>/client_output.txt`.
pub const DEFAULT_BASELINE_ROOT: &str = "plannertester/baseline";

pub const DEFAULT_REPORT_PATH: &str = "/tmp/exp_rpt.xml";

const ARCHIVE_SUFFIX: &str = "tar.gz";

/// Kernel and distro files that hold the machine's host name, in lookup order.
const HOSTNAME_SOURCES: [&str; 2] = ["/proc/sys/kernel/hostname", "/etc/hostname"];

/// Flavour of the distribution under test.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PackageKind {
    /// Community edition.
    #[default]
    #[serde(rename = "comm")]
    Community,

    /// Enterprise edition.
    Pro,
}

impl PackageKind {
    pub fn name(&self) -> &'static str {
        match self {
            PackageKind::Community => "comm",
            PackageKind::Pro => "pro",
        }
    }

    /// File name prefix of the kit archive.
    pub fn archive_prefix(&self) -> &'static str {
        match self {
            PackageKind::Community => "LINUX-voltdb",
            PackageKind::Pro => "LINUX-voltdb-ent",
        }
    }

    /// e.g. `LINUX-voltdb-2.8.1.tar.gz`
    pub fn archive_name(&self, release: &str) -> String {
        format!("{}-{}.{}", self.archive_prefix(), release, ARCHIVE_SUFFIX)
    }
}

impl fmt::Display for PackageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PackageKind {
    type Err = SuiteError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim() {
            "comm" => Ok(PackageKind::Community),
            "pro" => Ok(PackageKind::Pro),
            other => Err(SuiteError::InvalidPackageKind(other.to_string())),
        }
    }
}

/// Configuration for one suite run.
///
/// Built once and handed to the runner; nothing here is process-wide.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SuiteConfig {
    /// Name recorded on each report `<testsuite>`.
    pub suite_name: String,

    /// Distribution flavour.
    pub package: PackageKind,

    /// Release number, e.g. `2.8.1`.
    pub release: String,

    /// URL prefix the kit archive was fetched from.
    pub kit_url_root: String,

    /// Host recorded in the report.
    pub hostname: String,

    /// Directory holding captured client/server logs.
    pub logs_dir: PathBuf,

    /// Root of recorded baselines.
    pub baseline_root: PathBuf,

    /// Examples compared against a baseline instead of their static rule.
    pub baseline_examples: BTreeSet<BundledExample>,

    /// Examples covered by the run.
    pub selection: SuiteSelection,

    /// Unpacked kit; when set, only examples found inside it are checked.
    pub kit_root: Option<PathBuf>,
}

impl SuiteConfig {
    /// Create a configuration with default locations.
    pub fn new(package: PackageKind, release: impl Into<String>) -> Self {
        Self {
            suite_name: DEFAULT_SUITE_NAME.to_string(),
            package,
            release: release.into(),
            kit_url_root: DEFAULT_KIT_URL_ROOT.to_string(),
            hostname: local_hostname(),
            logs_dir: PathBuf::from(DEFAULT_LOGS_DIR),
            baseline_root: PathBuf::from(DEFAULT_BASELINE_ROOT),
            baseline_examples: BTreeSet::new(),
            selection: SuiteSelection::All,
            kit_root: None,
        }
    }

    pub fn with_suite_name(mut self, name: impl Into<String>) -> Self {
        self.suite_name = name.into();
        self
    }

    pub fn with_kit_url_root(mut self, root: impl Into<String>) -> Self {
        self.kit_url_root = root.into();
        self
    }

    pub fn with_hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = hostname.into();
        self
    }

    pub fn with_logs_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.logs_dir = dir.into();
        self
    }

    pub fn with_baseline_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.baseline_root = root.into();
        self
    }

    /// Check `example` against its baseline.
    pub fn with_baseline(mut self, example: BundledExample) -> Self {
        self.baseline_examples.insert(example);
        self
    }

    pub fn with_selection(mut self, selection: SuiteSelection) -> Self {
        self.selection = selection;
        self
    }

    pub fn with_kit_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.kit_root = Some(root.into());
        self
    }

    /// Kit archive file name.
    pub fn archive_name(&self) -> String {
        self.package.archive_name(&self.release)
    }

    /// Full URL of the kit archive.
    pub fn kit_url(&self) -> String {
        format!(
            "{}/{}",
            self.kit_url_root.trim_end_matches('/'),
            self.archive_name()
        )
    }

    /// Captured output of `run.sh client`.
    pub fn client_log(&self, example: BundledExample) -> PathBuf {
        self.logs_dir.join(format!("{}_client", example.name()))
    }

    /// Captured output of `run.sh` (the server).
    pub fn server_log(&self, example: BundledExample) -> PathBuf {
        self.logs_dir.join(format!("{}_server", example.name()))
    }

    /// The rule `example` is checked with under this configuration.
    pub fn rule_for(&self, example: BundledExample) -> AssertionRule {
        if self.baseline_examples.contains(&example) {
            example.baseline_rule(&self.baseline_root)
        } else {
            example.default_rule()
        }
    }
}

/// Host name of this machine, or `localhost` when none can be found.
///
/// Checks the kernel/distro host name files, then `HOSTNAME` and
/// `COMPUTERNAME` in the environment.
pub fn local_hostname() -> String {
    hostname_from(HOSTNAME_SOURCES.into_iter().map(Path::new))
        .or_else(|| non_empty(std::env::var("HOSTNAME").ok()))
        .or_else(|| non_empty(std::env::var("COMPUTERNAME").ok()))
        .unwrap_or_else(|| "localhost".to_string())
}

fn hostname_from<'a>(sources: impl IntoIterator<Item = &'a Path>) -> Option<String> {
    sources
        .into_iter()
        .find_map(|path| non_empty(first_line(path).ok().flatten()))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Read the release number from the first line of a `version.txt`.
pub fn read_release(version_file: &Path) -> Result<String> {
    match first_line(version_file)? {
        Some(line) if !line.trim().is_empty() => Ok(line.trim().to_string()),
        _ => Err(SuiteError::MissingRelease {
            path: version_file.to_path_buf(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_package_archive_names() {
        assert_eq!(
            PackageKind::Community.archive_name("2.8.1"),
            "LINUX-voltdb-2.8.1.tar.gz"
        );
        assert_eq!(
            PackageKind::Pro.archive_name("2.8.1"),
            "LINUX-voltdb-ent-2.8.1.tar.gz"
        );
    }

    #[test]
    fn test_package_from_str() {
        assert_eq!("comm".parse::<PackageKind>().unwrap(), PackageKind::Community);
        assert_eq!("pro".parse::<PackageKind>().unwrap(), PackageKind::Pro);
        let err = "enterprise".parse::<PackageKind>().unwrap_err();
        assert!(err.to_string().contains("comm, pro"));
    }

    #[test]
    fn test_hostname_from_first_usable_source() {
        let dir = tempfile::tempdir().unwrap();
        let empty = dir.path().join("empty");
        std::fs::write(&empty, "\n").unwrap();
        let named = dir.path().join("hostname");
        std::fs::write(&named, "build-07\n").unwrap();
        let absent = dir.path().join("absent");

        assert_eq!(
            hostname_from([absent.as_path(), empty.as_path(), named.as_path()]),
            Some("build-07".to_string())
        );
        assert_eq!(hostname_from([absent.as_path()]), None);
    }

    #[test]
    fn test_local_hostname_is_never_empty() {
        let host = local_hostname();
        assert!(!host.is_empty());
        assert_eq!(host, host.trim());
        assert_eq!(SuiteConfig::new(PackageKind::Pro, "1.0").hostname, host);
    }

    #[test]
    fn test_config_defaults() {
        let config = SuiteConfig::new(PackageKind::Community, "2.8.1");
        assert_eq!(config.suite_name, "exp_test");
        assert_eq!(config.selection, SuiteSelection::All);
        assert!(config.kit_root.is_none());
        assert_eq!(
            config.kit_url(),
            "http://volt0/kits/candidate/LINUX-voltdb-2.8.1.tar.gz"
        );
    }

    #[test]
    fn test_log_paths() {
        let config = SuiteConfig::new(PackageKind::Pro, "3.0").with_logs_dir("/var/log/kit");
        assert_eq!(
            config.client_log(BundledExample::Voter),
            PathBuf::from("/var/log/kit/voter_client")
        );
        assert_eq!(
            config.server_log(BundledExample::Voter),
            PathBuf::from("/var/log/kit/voter_server")
        );
    }

    #[test]
    fn test_rule_for_honours_baseline_override() {
        let config = SuiteConfig::new(PackageKind::Community, "1.0")
            .with_baseline_root("/b")
            .with_baseline(BundledExample::VoltKv);
        assert_eq!(
            config.rule_for(BundledExample::VoltKv).name(),
            "baseline_diff"
        );
        assert_eq!(
            config.rule_for(BundledExample::VoltCache).name(),
            "keyword_set_presence"
        );
    }

    #[test]
    fn test_read_release() {
        let dir = tempfile::tempdir().unwrap();
        let version = dir.path().join("version.txt");
        std::fs::write(&version, "2.8.1\n").unwrap();
        assert_eq!(read_release(&version).unwrap(), "2.8.1");
    }

    #[test]
    fn test_read_release_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let version = dir.path().join("version.txt");
        std::fs::write(&version, "").unwrap();
        assert!(matches!(
            read_release(&version),
            Err(SuiteError::MissingRelease { .. })
        ));
    }

    #[test]
    fn test_read_release_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            read_release(&dir.path().join("version.txt")),
            Err(SuiteError::Check(_))
        ));
    }
}
