//! kitcheck - release kit smoke checks
//!
//! The `kitcheck` command checks the captured console output of a release
//! kit's bundled example applications and writes a JUnit-style report.
//!
//! ## Commands
//!
//! - `run`: check every selected example and write the report
//! - `section`: print the part of a log between two markers

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn, Level};

use kitcheck_core::extract_section_from_file;
use kitcheck_suite::config::{
    DEFAULT_BASELINE_ROOT, DEFAULT_KIT_URL_ROOT, DEFAULT_LOGS_DIR, DEFAULT_REPORT_PATH,
};
use kitcheck_suite::{
    read_release, write_junit_xml, write_report_json, BundledExample, CaseStatus, PackageKind,
    SuiteConfig, SuiteReport, SuiteRunner, SuiteSelection,
};

#[derive(Parser)]
#[command(name = "kitcheck")]
#[command(author = "Stevedores Org")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Smoke checks for release kit example applications", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check captured example logs and write the suite report
    Run(RunArgs),

    /// Print the section of a log between two markers
    Section {
        /// Log file to scan
        file: PathBuf,

        /// Marker that opens the section
        #[arg(long)]
        start: String,

        /// Marker that closes the section
        #[arg(long)]
        end: String,
    },
}

#[derive(clap::Args)]
struct RunArgs {
    /// Release number (read from --version-file when omitted)
    #[arg(short, long, env = "KITCHECK_RELEASE")]
    release: Option<String>,

    /// File whose first line is the release number
    #[arg(long, default_value = "version.txt")]
    version_file: PathBuf,

    /// Package kind: comm or pro
    #[arg(short, long, default_value = "comm")]
    pkg: String,

    /// Example to check, or "all"
    #[arg(short, long, default_value = "all")]
    suite: String,

    /// Directory holding <example>_client logs
    #[arg(long, env = "KITCHECK_LOGS_DIR", default_value = DEFAULT_LOGS_DIR)]
    logs_dir: PathBuf,

    /// Unpacked kit; only examples with an executable run.sh inside it are checked
    #[arg(long, env = "KITCHECK_KIT_ROOT")]
    kit_root: Option<PathBuf>,

    /// Root of recorded baselines (<dir>/<example>/client_output.txt)
    #[arg(long, env = "KITCHECK_BASELINE_DIR", default_value = DEFAULT_BASELINE_ROOT)]
    baseline_dir: PathBuf,

    /// Compare this example against its baseline instead of its static check (repeatable)
    #[arg(long = "baseline", value_name = "EXAMPLE")]
    baselines: Vec<String>,

    /// URL prefix the kit was downloaded from (recorded in the report)
    #[arg(long, default_value = DEFAULT_KIT_URL_ROOT)]
    kit_url_root: String,

    /// Host name recorded in the report (defaults to this machine's)
    #[arg(long, env = "KITCHECK_HOSTNAME")]
    hostname: Option<String>,

    /// Where to write the XML report
    #[arg(long, default_value = DEFAULT_REPORT_PATH)]
    report: PathBuf,

    /// Also write the report as JSON
    #[arg(long)]
    json_report: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    kitcheck_suite::init_tracing(cli.json, level);

    match cli.command {
        Commands::Run(args) => cmd_run(args),
        Commands::Section { file, start, end } => cmd_section(&file, &start, &end),
    }
}

/// Check the selected examples and write the report.
fn cmd_run(args: RunArgs) -> Result<()> {
    let package: PackageKind = args.pkg.parse()?;
    let release = match args.release {
        Some(release) => release,
        None => read_release(&args.version_file)
            .with_context(|| format!("Failed to read release from {:?}", args.version_file))?,
    };

    let mut config = SuiteConfig::new(package, release)
        .with_selection(parse_selection(&args.suite))
        .with_logs_dir(args.logs_dir)
        .with_baseline_root(args.baseline_dir)
        .with_kit_url_root(args.kit_url_root);
    if let Some(hostname) = args.hostname {
        config = config.with_hostname(hostname);
    }
    if let Some(kit_root) = args.kit_root {
        config = config.with_kit_root(kit_root);
    }
    for example in parse_baselines(&args.baselines)? {
        config = config.with_baseline(example);
    }

    println!("############################################");
    println!("Tested Version in this RUN: {}", config.release);
    println!("############################################");
    println!("Package: {}", config.kit_url());
    println!();

    let runner = SuiteRunner::new(config);
    let result = runner.run().context("Suite failed to run")?;
    let report = SuiteReport::new(runner.config(), &result);

    for case in &report.cases {
        let status = match case.status {
            CaseStatus::Passed => "✓",
            CaseStatus::Failed => "✗",
            CaseStatus::Error => "!",
        };
        println!("  {} {} ({}, {}ms)", status, case.name, case.rule, case.duration_ms);
        if case.status != CaseStatus::Passed {
            for line in case.message.lines() {
                println!("      {}", line);
            }
            if !case.missing_keywords.is_empty() {
                println!("      missing: {}", case.missing_keywords.join(", "));
            }
        }
    }

    println!();
    println!(
        "Summary: {}/{} examples passed ({} failed, {} errors)",
        report.passed, report.total, report.failed, report.errors
    );

    write_junit_xml(&args.report, &report)?;
    info!(report = %args.report.display(), "Wrote XML report");
    println!("Report: {}", args.report.display());
    if let Some(path) = &args.json_report {
        write_report_json(path, &report)?;
        println!("JSON report: {}", path.display());
    }

    if report.success() {
        println!("\n✓ All examples passed!");
        Ok(())
    } else {
        anyhow::bail!("At least one example failed")
    }
}

/// Print the section of `file` between `start` and `end`.
fn cmd_section(file: &Path, start: &str, end: &str) -> Result<()> {
    let section = extract_section_from_file(file, start, end)
        .with_context(|| format!("Failed to scan {:?}", file))?;

    match section.closed_text() {
        Some(lines) => {
            for line in lines {
                println!("{}", line);
            }
            Ok(())
        }
        None => {
            if !section.text.is_empty() {
                eprintln!("(partial, end marker not reached)");
                for line in &section.text {
                    eprintln!("{}", line);
                }
            }
            anyhow::bail!("No section from {:?} to {:?} in {:?}", start, end, file)
        }
    }
}

/// Parse `--suite`; unknown names fall back to every example.
fn parse_selection(suite: &str) -> SuiteSelection {
    SuiteSelection::parse(suite).unwrap_or_else(|e| {
        warn!(suite = %suite, error = %e, "Unknown suite name, covering all examples in this run");
        SuiteSelection::All
    })
}

fn parse_baselines(names: &[String]) -> Result<Vec<BundledExample>> {
    names
        .iter()
        .map(|name| {
            name.parse::<BundledExample>()
                .with_context(|| format!("Invalid --baseline value: {}", name))
        })
        .collect()
}
