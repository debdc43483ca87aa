//! tmirror - Tree Mirror
//!
//! Mirror a source directory into a target directory, powered by treemirror.

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing_subscriber::EnvFilter;
use treemirror::{
    Config, DEFAULT_CONFIG_FILE, Error as MirrorError, EventLog, Mirror, PlanAction, PlanItem,
    SyncOptions, SyncReport,
};

/// Default audit log file name, placed next to the executable.
const DEFAULT_LOG_FILE: &str = "sync.log";

/// tmirror - one-way directory mirror
///
/// Copies every file that is missing or older in the target directory from
/// the source directory, preserving timestamps. Nothing is ever deleted.
///
/// The source and target come from a JSON config file:
///   {"source_dir": "...", "target_dir": "..."}
///
/// Looked up from --config, then config.json next to the executable, then
/// asked for on standard input.
#[derive(Parser, Debug)]
#[command(name = "tmirror", version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Audit log file (default: sync.log next to the executable)
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,

    /// Number of files copied concurrently
    #[arg(short = 'j', long, default_value = "16")]
    jobs: usize,

    /// Do not call fsync after each file (faster but less safe)
    #[arg(long)]
    no_sync: bool,

    /// Truncate and write targets in place instead of via a temp file
    #[arg(long)]
    in_place: bool,

    /// Print what would be copied without copying anything
    #[arg(short = 'n', long = "plan", alias = "dry-run")]
    plan: bool,

    /// Disable the progress spinner
    #[arg(short = 'q', long)]
    quiet: bool,

    /// Verbose output
    #[arg(short = 'v', long)]
    verbose: bool,
}

type CliResult<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
enum CliError {
    #[error("Error getting executable path: {source}")]
    ExecutablePath { source: io::Error },

    #[error("Failed to read configuration path from stdin: {source}")]
    Prompt { source: io::Error },

    #[error("Error loading config: {source}")]
    Config { source: MirrorError },

    #[error("Error opening log file {path}: {source}")]
    LogFile { path: PathBuf, source: io::Error },

    #[error("Failed to plan: {source}")]
    Plan { source: MirrorError },
}

fn main() {
    if let Err(error) = run() {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

fn run() -> CliResult<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let exe_dir = executable_dir()?;
    let config_path = resolve_config_path(
        args.config.clone(),
        Some(exe_dir.join(DEFAULT_CONFIG_FILE)),
        || prompt_config_path(&mut io::stdin().lock(), &mut io::stdout()),
    )?;
    let config = Config::load(&config_path).map_err(|source| CliError::Config { source })?;

    let options = build_options(&args);
    let mirror = Mirror::from_config(&config, options);

    if args.plan {
        let items = mirror.plan().map_err(|source| CliError::Plan { source })?;
        print_plan(&items);
        return Ok(());
    }

    let log_path = args
        .log_file
        .clone()
        .unwrap_or_else(|| exe_dir.join(DEFAULT_LOG_FILE));
    let log = EventLog::open(&log_path).map_err(|source| CliError::LogFile {
        path: log_path.clone(),
        source,
    })?;

    println!(
        "Starting sync from [{}] ===========> [{}]",
        config.source_dir.display(),
        config.target_dir.display()
    );

    let pb = if args.quiet {
        None
    } else {
        spinner(&format!("Mirroring {}...", config.source_dir.display()))
    };

    let report = mirror.run(&log);

    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    if args.verbose {
        print_report(&report);
    }
    println!("Sync completed.");
    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    // Ignore the error if a subscriber is already installed
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn executable_dir() -> CliResult<PathBuf> {
    let exe = std::env::current_exe().map_err(|source| CliError::ExecutablePath { source })?;
    Ok(exe
        .parent()
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf))
}

/// Pick the configuration file: explicit flag, then the default path if
/// something exists there, then whatever `prompt` returns.
fn resolve_config_path(
    flag: Option<PathBuf>,
    default: Option<PathBuf>,
    prompt: impl FnOnce() -> io::Result<PathBuf>,
) -> CliResult<PathBuf> {
    if let Some(path) = flag {
        return Ok(path);
    }
    if let Some(path) = default {
        if path_exists(&path) {
            return Ok(path);
        }
    }
    prompt().map_err(|source| CliError::Prompt { source })
}

/// Anything other than "not found" counts as existing, so an unreadable
/// default config is reported by the loader instead of being skipped.
fn path_exists(path: &Path) -> bool {
    match path.symlink_metadata() {
        Ok(_) => true,
        Err(e) => e.kind() != io::ErrorKind::NotFound,
    }
}

fn prompt_config_path(input: &mut impl BufRead, output: &mut impl Write) -> io::Result<PathBuf> {
    writeln!(
        output,
        "Configuration file not found. Please provide the path to the configuration file:"
    )?;
    output.flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(PathBuf::from(line.trim()))
}

fn build_options(args: &Args) -> SyncOptions {
    let mut options = SyncOptions::default().with_parallel(args.jobs);
    if args.no_sync {
        options = options.without_fsync();
    }
    if args.in_place {
        options = options.in_place();
    }
    options
}

fn spinner(message: &str) -> Option<ProgressBar> {
    let style = ProgressStyle::default_spinner()
        .template("{spinner:.green} {msg} [{elapsed}]")
        .ok()?;
    let pb = ProgressBar::new_spinner();
    pb.set_style(style);
    pb.set_message(message.to_owned());
    pb.enable_steady_tick(Duration::from_millis(100));
    Some(pb)
}

fn print_plan(items: &[PlanItem]) {
    let mut to_copy = 0usize;
    for item in items {
        if item.action == PlanAction::Copy {
            to_copy += 1;
        }
        println!(
            "{:<4} {} -> {} ({})",
            item.action.as_str(),
            item.source.display(),
            item.target.display(),
            item.reason
        );
    }
    println!(
        "Plan: {} to copy, {} to skip.",
        to_copy,
        items.len() - to_copy
    );
}

fn print_report(report: &SyncReport) {
    eprintln!(
        "{} files seen: {} copied ({}), {} skipped, {} failed in {:.2?}",
        report.files_seen,
        report.files_copied,
        format_bytes(report.bytes_copied),
        report.files_skipped,
        report.files_failed,
        report.duration
    );
    if let Some(ref walk_error) = report.walk_error {
        eprintln!("Walk stopped early: {walk_error}");
    }
}

fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
