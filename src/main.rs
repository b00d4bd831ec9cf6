use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use clap::Parser;
use thiserror::Error;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use backup_buddy::{ensure, EnsureOutcome, MirrorError, MirrorReport, Mode};

const SOURCE_DOCK: &str = "srcDock";
const DESTINATION_DOCK: &str = "destDock";

/// Mirror a directory tree, copying only new or newer files.
#[derive(Parser, Debug)]
#[command(name = "backup-buddy", version, about)]
struct Cli {
    /// Directory to copy from. Defaults to ./srcDock.
    #[arg(env = "BACKUP_BUDDY_SOURCE")]
    source: Option<PathBuf>,

    /// Directory to copy into. Defaults to ./destDock.
    #[arg(env = "BACKUP_BUDDY_DEST")]
    destination: Option<PathBuf>,

    /// `single` (top-level files only) or `recursive` (whole tree).
    #[arg(short, long, default_value = "recursive")]
    mode: Mode,

    /// Append-only log of warnings and failures.
    #[arg(long, default_value = "CopyLog.log")]
    log_file: PathBuf,

    /// Show per-file skip decisions.
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Error, Debug)]
enum AppError {
    #[error("cannot open log file {}: {source}", .path.display())]
    LogFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot install Ctrl+C handler: {0}")]
    Signal(#[from] ctrlc::Error),

    #[error("{}", .0.reason())]
    Mirror(#[from] MirrorError),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_tracing(&cli.log_file, cli.verbose) {
        eprintln!("* [ERROR]: {e} *");
        return ExitCode::from(1);
    }

    match run(cli) {
        Ok(report) => {
            print_summary(&report);
            if report.is_clean() {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(2)
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "run aborted");
            eprintln!("\n* [ERROR]: {e} .. exiting, check log *");
            ExitCode::from(1)
        }
    }
}

fn run(cli: Cli) -> Result<MirrorReport, AppError> {
    let source = match cli.source {
        Some(p) => p,
        None => dock(SOURCE_DOCK)?,
    };
    let destination = match cli.destination {
        Some(p) => p,
        None => dock(DESTINATION_DOCK)?,
    };

    let cancel = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&cancel);
    ctrlc::set_handler(move || {
        flag.store(true, Ordering::Relaxed);
    })?;

    let report = backup_buddy::builder(source, destination)
        .mode(cli.mode)
        .cancel_flag(cancel)
        .run()?;

    Ok(report)
}

/// Default dock directory in the working directory, created on first use.
fn dock(name: &str) -> Result<PathBuf, AppError> {
    let path = PathBuf::from(".").join(name);
    if ensure(&path)? == EnsureOutcome::Created {
        tracing::info!(path = %path.display(), "dock directory missing, created it");
    }
    Ok(path)
}

fn init_tracing(log_file: &Path, verbose: bool) -> Result<(), AppError> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .map_err(|source| AppError::LogFile {
            path: log_file.to_path_buf(),
            source,
        })?;

    let console_filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_filter(console_filter))
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .with_filter(LevelFilter::WARN),
        )
        .init();

    Ok(())
}

fn print_summary(report: &MirrorReport) {
    println!("\n{} Summary {}", "*".repeat(19), "*".repeat(51));
    println!(
        "Copied:  {} ({} new, {} updated)",
        report.files_copied,
        report.files_copied - report.files_updated,
        report.files_updated
    );
    println!("Skipped: {} (up to date)", report.files_skipped);
    println!("Directories created: {}", report.dirs_created);
    println!(
        "Scanned {} files in {} directories in {:.3}s",
        report.stats.files_seen,
        report.stats.dirs_visited,
        report.stats.duration.as_secs_f64()
    );

    if !report.errors.is_empty() {
        println!("Failed:  {}", report.errors.len());
        for err in &report.errors {
            println!("  - {}", err.reason());
        }
    }

    if report.interrupted {
        println!("\n* Ctrl + C detected .. stopped early, run again to resume *");
    }
}
