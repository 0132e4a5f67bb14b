//! Streams - Command-line front end for the copy strategy engine.
//!
//! Resolves the source and destination from flags and an optional settings
//! file, runs one strategy (or all of them in turn), and prints the unit
//! count and timing for each run, optionally followed by a content check.

mod config;

use clap::{ArgAction, Parser};
use std::path::PathBuf;
use std::time::Duration;
use streams_engine::{create_strategy, first_mismatch, run_strategy, StrategyKind, TransferReport};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::config::{FileConfig, RunConfig};

/// Streams - compare file copy strategies
#[derive(Parser, Debug)]
#[command(name = "streams")]
#[command(version = "0.1.0")]
#[command(about = "Copy a file with different I/O strategies and verify the result")]
struct Args {
    /// Settings file (TOML)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Source file
    #[arg(long, value_name = "PATH")]
    src: Option<PathBuf>,

    /// Destination file (created or overwritten)
    #[arg(long, value_name = "PATH")]
    dst: Option<PathBuf>,

    /// Strategy: byte, block, buffered, memory, memory-byte, line, or all
    #[arg(long, value_name = "NAME")]
    strategy: Option<String>,

    /// Working buffer size in bytes for block and buffered copies
    #[arg(long, value_name = "BYTES")]
    block_size: Option<usize>,

    /// Encoding label used to decode the source in line copies
    #[arg(long, value_name = "LABEL")]
    source_encoding: Option<String>,

    /// Encoding label used to write the destination in line copies
    #[arg(long, value_name = "LABEL")]
    destination_encoding: Option<String>,

    /// Line terminator written by line copies: lf or crlf
    #[arg(long, value_name = "ENDING")]
    line_ending: Option<String>,

    /// Compare source and destination byte for byte after each copy
    #[arg(long)]
    verify: bool,

    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

/// Result of a completed CLI run.
#[derive(Debug, Default)]
struct Outcome {
    reports: Vec<TransferReport>,
    mismatches: Vec<StrategyKind>,
}

fn format_duration(elapsed: Duration) -> String {
    if elapsed.as_secs() > 0 {
        format!("{:.2}s", elapsed.as_secs_f64())
    } else {
        format!("{:.3}ms", elapsed.as_secs_f64() * 1000.0)
    }
}

/// The quickest run, when more than one strategy ran.
fn fastest(reports: &[TransferReport]) -> Option<&TransferReport> {
    if reports.len() < 2 {
        return None;
    }
    reports.iter().min_by_key(|r| r.elapsed)
}

fn default_log_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    }
}

/// Install the global subscriber. Called once, from `main`.
fn init_logging(verbose: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_log_level(verbose)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Parse arguments, run the copies, and map the outcome to an exit code
fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    let exit_code = match run_cli(&args) {
        Ok(outcome) => {
            if let Some(fastest) = fastest(&outcome.reports) {
                println!(
                    "Fastest: {} ({})",
                    fastest.strategy,
                    format_duration(fastest.elapsed)
                );
            }
            if outcome.mismatches.is_empty() {
                0
            } else {
                1
            }
        }
        Err(msg) => {
            eprintln!("Error: {}", msg);
            2
        }
    };

    std::process::exit(exit_code);
}

/// Main CLI logic - separated for testability
fn run_cli(args: &Args) -> Result<Outcome, String> {
    let file = match &args.config {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };
    let config = RunConfig::resolve(args, file)?;
    debug!(
        target: "streams::cli",
        src = %config.source.display(),
        dst = %config.destination.display(),
        selection = ?config.selection,
        block_size = config.settings.block_size,
        verify = config.verify,
        "resolved run configuration"
    );

    let mut outcome = Outcome::default();
    for kind in config.selection.kinds() {
        let strategy = create_strategy(kind, &config.settings);
        let report = run_strategy(strategy.as_ref(), &config.source, &config.destination)
            .map_err(|e| format!("{} failed: {}", strategy.name(), e))?;

        println!(
            "{}() done. Total {}: {} ({})",
            report.strategy,
            report.unit,
            report.count,
            format_duration(report.elapsed)
        );

        if config.verify {
            let mismatch = first_mismatch(&config.source, &config.destination)
                .map_err(|e| format!("Verification failed: {}", e))?;
            println!("Contents equal: {}", mismatch.is_none());
            if let Some(mismatch) = mismatch {
                if kind.is_byte_exact() {
                    eprintln!("  {}: {}", report.strategy, mismatch);
                } else {
                    eprintln!("  {}: {} (re-encoded text output)", report.strategy, mismatch);
                }
                outcome.mismatches.push(kind);
            }
        }

        outcome.reports.push(report);
    }

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn base_args(src: PathBuf, dst: PathBuf) -> Args {
        Args {
            config: None,
            src: Some(src),
            dst: Some(dst),
            strategy: None,
            block_size: None,
            source_encoding: None,
            destination_encoding: None,
            line_ending: None,
            verify: false,
            verbose: 0,
        }
    }

    #[test]
    fn test_cli_block_copy_with_verification() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let src = temp_dir.path().join("source.bin");
        let dst = temp_dir.path().join("dest.bin");
        fs::write(&src, vec![7u8; 9404]).expect("Failed to write file");

        let mut args = base_args(src, dst.clone());
        args.verify = true;

        let outcome = run_cli(&args).expect("CLI should succeed");
        assert_eq!(outcome.reports.len(), 1);
        assert_eq!(outcome.reports[0].strategy, "BlockCopy");
        assert_eq!(outcome.reports[0].count, 9404);
        assert!(outcome.mismatches.is_empty());
        assert_eq!(fs::metadata(&dst).expect("dest").len(), 9404);
    }

    #[test]
    fn test_cli_runs_all_strategies() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let src = temp_dir.path().join("source.txt");
        let dst = temp_dir.path().join("dest.txt");
        fs::write(&src, "alpha\nbeta\n").expect("Failed to write file");

        let mut args = base_args(src, dst);
        args.strategy = Some("all".to_string());
        args.verify = true;

        let outcome = run_cli(&args).expect("CLI should succeed");
        assert_eq!(outcome.reports.len(), StrategyKind::ALL.len());
        assert!(outcome.mismatches.is_empty());
        let line = outcome.reports.last().expect("line report");
        assert_eq!(line.strategy, "LineCopy");
        assert_eq!(line.count, 2);
    }

    #[test]
    fn test_cli_reports_lossy_line_copy() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let src = temp_dir.path().join("source.txt");
        let dst = temp_dir.path().join("dest.txt");
        fs::write(&src, "Grüße\n").expect("Failed to write file");

        let mut args = base_args(src, dst);
        args.strategy = Some("line".to_string());
        args.destination_encoding = Some("windows-1252".to_string());
        args.verify = true;

        let outcome = run_cli(&args).expect("CLI should succeed");
        assert_eq!(outcome.mismatches, vec![StrategyKind::Line]);
    }

    #[test]
    fn test_cli_reads_paths_from_config_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let src = temp_dir.path().join("source.bin");
        let dst = temp_dir.path().join("dest.bin");
        fs::write(&src, b"config driven").expect("Failed to write file");

        let config_path = temp_dir.path().join("streams.toml");
        fs::write(
            &config_path,
            format!(
                "source_file_path = {:?}\ndestination_file_path = {:?}\nstrategy = \"memory\"\n",
                src.display().to_string(),
                dst.display().to_string()
            ),
        )
        .expect("Failed to write config");

        let mut args = base_args(PathBuf::new(), PathBuf::new());
        args.src = None;
        args.dst = None;
        args.config = Some(config_path);

        let outcome = run_cli(&args).expect("CLI should succeed");
        assert_eq!(outcome.reports[0].strategy, "InMemoryCopy");
        assert_eq!(fs::read(&dst).expect("dest"), b"config driven");
    }

    #[test]
    fn test_cli_rejects_missing_source() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let args = base_args(
            PathBuf::from("/nonexistent/path"),
            temp_dir.path().join("dest.bin"),
        );

        let result = run_cli(&args);
        assert!(result.is_err(), "CLI should reject missing source");
    }

    #[test]
    fn test_cli_rejects_empty_source() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let args = base_args(PathBuf::new(), temp_dir.path().join("dest.bin"));

        let err = run_cli(&args).unwrap_err();
        assert!(err.contains("Invalid argument"), "unexpected message: {}", err);
    }

    #[test]
    fn test_cli_rejects_invalid_strategy() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let mut args = base_args(temp_dir.path().join("a"), temp_dir.path().join("b"));
        args.strategy = Some("invalid".to_string());

        let result = run_cli(&args);
        assert!(result.is_err(), "CLI should reject invalid strategy");
    }

    #[test]
    fn test_cli_rejects_zero_block_size() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let src = temp_dir.path().join("source.bin");
        fs::write(&src, b"data").expect("Failed to write file");
        let mut args = base_args(src, temp_dir.path().join("dest.bin"));
        args.block_size = Some(0);

        let result = run_cli(&args);
        assert!(result.is_err(), "CLI should reject a zero block size");
    }

    #[test]
    fn test_fastest_needs_several_reports() {
        let report = |strategy, millis| TransferReport {
            strategy,
            unit: streams_engine::UnitKind::Bytes,
            count: 1,
            elapsed: Duration::from_millis(millis),
        };
        assert!(fastest(&[report("BlockCopy", 5)]).is_none());

        let reports = [report("ByteCopy", 40), report("BlockCopy", 3), report("BufferedCopy", 4)];
        assert_eq!(fastest(&reports).map(|r| r.strategy), Some("BlockCopy"));
    }

    #[test]
    fn test_verbosity_maps_to_log_level() {
        assert_eq!(default_log_level(0), "warn");
        assert_eq!(default_log_level(1), "debug");
        assert_eq!(default_log_level(2), "trace");
        assert_eq!(default_log_level(5), "trace");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_millis(1500)), "1.50s");
        assert_eq!(format_duration(Duration::from_micros(2500)), "2.500ms");
    }
}
