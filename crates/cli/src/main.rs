use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use expensa_ocr::{preprocess, scan_text, ReceiptExtractor, ScanConfig, ScanError};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

/// Exit status when a receipt was read but rejected by the acceptance policy.
const EXIT_REJECTED: u8 = 2;

#[derive(Parser)]
#[command(name = "expensa")]
#[command(about = "Extract merchant, date and total from receipt OCR text")]
#[command(version)]
struct Cli {
    /// Log extractor decisions (repeat for candidate-level tracing)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract a receipt and apply the acceptance policy
    Scan {
        #[command(flatten)]
        input: InputArgs,

        /// TOML config with an [acceptance] section
        #[arg(long)]
        config: Option<PathBuf>,

        /// Earliest acceptable receipt date (overrides config)
        #[arg(long)]
        valid_from: Option<NaiveDate>,

        /// Accept receipts without a total
        #[arg(long)]
        allow_missing_amount: bool,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Print every ranked candidate per field
    Explain {
        #[command(flatten)]
        input: InputArgs,
    },
}

#[derive(Args)]
struct InputArgs {
    /// OCR text file; reads stdin when omitted or `-`
    file: Option<PathBuf>,

    /// Evaluate dates as of this day instead of the local date
    #[arg(long)]
    today: Option<NaiveDate>,
}

impl InputArgs {
    fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }

    fn read_text(&self) -> Result<String> {
        match self.file.as_deref() {
            Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display())),
            _ => {
                let mut buf = String::new();
                io::stdin().read_to_string(&mut buf).context("reading stdin")?;
                Ok(buf)
            }
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "expensa=debug,expensa_ocr=debug",
        _ => "expensa=trace,expensa_ocr=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<ExitCode> {
    match cli.command {
        Commands::Scan {
            input,
            config,
            valid_from,
            allow_missing_amount,
            pretty,
        } => {
            let mut cfg = match config {
                Some(path) => ScanConfig::load(&path)?,
                None => ScanConfig::default(),
            };
            if valid_from.is_some() {
                cfg.acceptance.valid_from = valid_from;
            }
            if allow_missing_amount {
                cfg.acceptance.require_amount = false;
            }
            tracing::debug!(policy = ?cfg.acceptance, "acceptance policy");

            let text = input.read_text()?;
            let today = input.today();
            match scan_text(&text, &cfg.acceptance, today) {
                Ok(receipt) => {
                    print_json(&receipt, pretty)?;
                    Ok(ExitCode::SUCCESS)
                }
                Err(e @ (ScanError::NoAmount | ScanError::OutOfDateRange { .. })) => {
                    eprintln!("rejected: {e}");
                    Ok(ExitCode::from(EXIT_REJECTED))
                }
                Err(e) => Err(e.into()),
            }
        }
        Commands::Explain { input } => {
            let text = input.read_text()?;
            let report = ReceiptExtractor::explain(&preprocess(&text), input.today());
            print_json(&report, true)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let out = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{out}");
    Ok(())
}
