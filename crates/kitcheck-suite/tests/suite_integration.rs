//! Integration tests for a full suite run over captured logs.

use std::fs;
use std::path::Path;

use kitcheck_suite::{
    render_junit_xml, BundledExample, CaseStatus, PackageKind, SuiteConfig, SuiteReport,
    SuiteRunner, SuiteSelection, BENCHMARK_KEYWORDS,
};

fn write_log(dir: &Path, example: &str, content: &str) {
    fs::write(dir.join(format!("{example}_client")), content).expect("write log");
}

fn healthy_logs(dir: &Path) {
    write_log(dir, "helloworld", "Hola, Mundo!\n");
    write_log(
        dir,
        "voter",
        " Voting Results\n ----\n    Edwina Burnam  2,156,993\n    The Winner is: Edwina Burnam\n",
    );
    let benchmark = BENCHMARK_KEYWORDS
        .iter()
        .map(|k| format!("{k}\nsome stats line\n"))
        .collect::<String>();
    write_log(dir, "voltkv", &benchmark);
    write_log(dir, "voltcache", &benchmark);
}

/// Test: all four examples pass on healthy logs
#[test]
fn test_successful_suite() {
    let logs = tempfile::tempdir().unwrap();
    healthy_logs(logs.path());

    let config = SuiteConfig::new(PackageKind::Community, "2.8.1").with_logs_dir(logs.path());
    let runner = SuiteRunner::new(config.clone());
    let result = runner.run().expect("suite run");

    assert!(result.success(), "Suite should succeed");
    assert_eq!(result.passed_count(), 4);
    assert_eq!(result.failed_count(), 0);
    assert_eq!(result.error_count(), 0);

    let report = SuiteReport::new(&config, &result);
    assert!(report.success());
    assert_eq!(report.total, 4);
}

/// Test: one bad example does not stop the others
#[test]
fn test_failures_and_errors_are_isolated() {
    let logs = tempfile::tempdir().unwrap();
    healthy_logs(logs.path());
    write_log(logs.path(), "helloworld", "Hello, World!\n");
    write_log(logs.path(), "voltkv", "Starting Benchmark\n");
    fs::remove_file(logs.path().join("voter_client")).unwrap();

    let config = SuiteConfig::new(PackageKind::Pro, "3.0").with_logs_dir(logs.path());
    let result = SuiteRunner::new(config.clone()).run().expect("suite run");

    assert_eq!(result.cases.len(), 4, "every example yields exactly one case");
    assert_eq!(result.passed_count(), 1);
    assert_eq!(result.failed_count(), 2);
    assert_eq!(result.error_count(), 1);

    let report = SuiteReport::new(&config, &result);
    let by_name = |name: &str| {
        report
            .cases
            .iter()
            .find(|c| c.name == name)
            .unwrap_or_else(|| panic!("no case {name}"))
    };
    assert_eq!(by_name("voter").status, CaseStatus::Error);
    assert_eq!(by_name("helloworld").status, CaseStatus::Failed);
    assert!(by_name("helloworld").message.contains("Hello, World!"));
    assert_eq!(by_name("voltkv").missing_keywords.len(), 5);
    assert_eq!(by_name("voltcache").status, CaseStatus::Passed);

    let xml = render_junit_xml(&report);
    assert!(xml.contains("LINUX-voltdb-ent-3.0.tar.gz"));
    assert!(xml.contains("<Missing MissingString="));
}

/// Test: selection limits the suite to one example
#[test]
fn test_single_example_selection() {
    let logs = tempfile::tempdir().unwrap();
    healthy_logs(logs.path());

    let config = SuiteConfig::new(PackageKind::Community, "2.8.1")
        .with_logs_dir(logs.path())
        .with_selection(SuiteSelection::Only(BundledExample::VoltCache));
    let result = SuiteRunner::new(config).run().expect("suite run");

    assert_eq!(result.cases.len(), 1);
    assert_eq!(result.cases[0].example, BundledExample::VoltCache);
    assert!(result.success());
}

/// Test: baseline comparison replaces the static rule when configured
#[test]
fn test_baseline_override() {
    let logs = tempfile::tempdir().unwrap();
    healthy_logs(logs.path());
    let baseline_root = logs.path().join("baseline");
    fs::create_dir_all(baseline_root.join("helloworld")).unwrap();
    fs::write(
        baseline_root.join("helloworld").join("client_output.txt"),
        "Hola, Mundo!\n",
    )
    .unwrap();

    let config = SuiteConfig::new(PackageKind::Community, "2.8.1")
        .with_logs_dir(logs.path())
        .with_baseline_root(&baseline_root)
        .with_baseline(BundledExample::HelloWorld)
        .with_baseline(BundledExample::Voter);
    let result = SuiteRunner::new(config).run().expect("suite run");

    let hello = &result.cases[0];
    assert_eq!(hello.example, BundledExample::HelloWorld);
    assert_eq!(hello.rule, "baseline_diff");
    assert!(hello.passed());

    let voter = &result.cases[1];
    assert_eq!(voter.rule, "baseline_diff");
    assert!(voter.failed(), "missing baseline is a failure, not an error");
    assert!(voter.verdict().expect("verdict").is_inconclusive());
}

/// Test: with a kit root, only discovered examples are checked
#[cfg(unix)]
#[test]
fn test_kit_root_limits_examples() {
    use std::os::unix::fs::PermissionsExt;

    let logs = tempfile::tempdir().unwrap();
    healthy_logs(logs.path());

    let kit = tempfile::tempdir().unwrap();
    let voter_dir = kit.path().join("voltdb-2.8.1/examples/voter");
    fs::create_dir_all(&voter_dir).unwrap();
    let launcher = voter_dir.join("run.sh");
    fs::write(&launcher, "#!/bin/sh\n").unwrap();
    fs::set_permissions(&launcher, fs::Permissions::from_mode(0o755)).unwrap();

    let config = SuiteConfig::new(PackageKind::Community, "2.8.1")
        .with_logs_dir(logs.path())
        .with_kit_root(kit.path());
    let result = SuiteRunner::new(config).run().expect("suite run");

    assert_eq!(result.cases.len(), 1);
    assert_eq!(result.cases[0].example, BundledExample::Voter);
}

/// Test: coloured console output still renders a well-formed report
#[test]
fn test_ansi_coloured_log_renders_clean_xml() {
    let logs = tempfile::tempdir().unwrap();
    healthy_logs(logs.path());
    write_log(logs.path(), "helloworld", "\x1b[32mHola, Mundo!\x1b[0m\n");

    let config = SuiteConfig::new(PackageKind::Community, "2.8.1")
        .with_logs_dir(logs.path())
        .with_selection(SuiteSelection::Only(BundledExample::HelloWorld));
    let result = SuiteRunner::new(config.clone()).run().expect("suite run");
    assert!(result.cases[0].failed());

    let xml = render_junit_xml(&SuiteReport::new(&config, &result));
    let illegal: Vec<char> = xml
        .chars()
        .filter(|c| c.is_control() && !matches!(c, '\n' | '\r' | '\t'))
        .collect();
    assert!(illegal.is_empty(), "control characters in report: {illegal:?}");
}

/// Test: an unreadable corner of the kit does not abort the run
#[cfg(unix)]
#[test]
fn test_broken_kit_entry_still_produces_cases() {
    use std::os::unix::fs::PermissionsExt;

    let logs = tempfile::tempdir().unwrap();
    healthy_logs(logs.path());

    let kit = tempfile::tempdir().unwrap();
    let voter_dir = kit.path().join("voltdb-2.8.1/examples/voter");
    fs::create_dir_all(&voter_dir).unwrap();
    let launcher = voter_dir.join("run.sh");
    fs::write(&launcher, "#!/bin/sh\n").unwrap();
    fs::set_permissions(&launcher, fs::Permissions::from_mode(0o755)).unwrap();
    let lib = kit.path().join("voltdb-2.8.1/lib");
    fs::create_dir_all(&lib).unwrap();
    std::os::unix::fs::symlink(kit.path().join("missing"), lib.join("priv")).unwrap();

    let config = SuiteConfig::new(PackageKind::Community, "2.8.1")
        .with_logs_dir(logs.path())
        .with_kit_root(kit.path());
    let result = SuiteRunner::new(config).run().expect("suite run");

    assert_eq!(result.cases.len(), 1);
    assert!(result.success());
}
