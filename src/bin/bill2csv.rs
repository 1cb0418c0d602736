use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;

use anyhow::{Context, Result, anyhow};
use clap::{Args, Parser, Subcommand};
use sales_bill_to_csv::{
    CleanOptions, CleanReport, HeaderSkip, Pipeline, clean_files, to_csv_bytes, to_xlsx_bytes,
};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "bill2csv",
    version,
    about = "Clean ragged sales-bill and payment-receipt exports into CSV/XLSX"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Clean one or more workbook exports and write combined output.
    Clean(CleanArgs),
}

#[derive(Debug, Args)]
struct CleanArgs {
    /// Input workbook path. Repeatable; order defines the combined order.
    #[arg(short, long = "input", required = true)]
    inputs: Vec<PathBuf>,

    /// Output CSV path.
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Output XLSX path.
    #[arg(long)]
    xlsx: Option<PathBuf>,

    /// Document shape of the batch: sales or payment.
    #[arg(long, default_value = "sales")]
    pipeline: String,

    /// Header skip: 'auto' or a fixed row count. Defaults per pipeline.
    #[arg(long)]
    header: Option<String>,

    /// Output delimiter character for CSV.
    #[arg(long, default_value = ",")]
    delimiter: char,

    /// Sheet name for the XLSX output.
    #[arg(long)]
    sheet: Option<String>,

    /// Print the processing report as JSON on stdout.
    #[arg(long)]
    json: bool,

    /// Enable verbose per-file output.
    #[arg(short, long)]
    verbose: bool,
}

const SALES_CSV_NAME: &str = "sales_clean_all.csv";
const SALES_XLSX_NAME: &str = "sales_clean_all.xlsx";
const PAYMENT_XLSX_NAME: &str = "payment_report.xlsx";

fn parse_options(args: &CleanArgs) -> Result<CleanOptions> {
    let pipeline = Pipeline::from_str(&args.pipeline)
        .map_err(|error| anyhow!(error))
        .context("failed to parse --pipeline")?;

    let header_skip = args
        .header
        .as_deref()
        .map(HeaderSkip::from_str)
        .transpose()
        .map_err(|error| anyhow!(error))
        .context("failed to parse --header")?;

    if !args.delimiter.is_ascii() {
        anyhow::bail!("delimiter must be a single ASCII character");
    }

    Ok(CleanOptions {
        pipeline,
        header_skip,
        delimiter: args.delimiter as u8,
        sheet_name: args.sheet.clone(),
        ..CleanOptions::default()
    })
}

/// Output targets: what was asked for, or the pipeline's fixed names.
fn output_targets(args: &CleanArgs, pipeline: Pipeline) -> (Option<PathBuf>, Option<PathBuf>) {
    if args.csv.is_some() || args.xlsx.is_some() {
        return (args.csv.clone(), args.xlsx.clone());
    }

    match pipeline {
        Pipeline::Sales => (
            Some(PathBuf::from(SALES_CSV_NAME)),
            Some(PathBuf::from(SALES_XLSX_NAME)),
        ),
        Pipeline::Payment => (None, Some(PathBuf::from(PAYMENT_XLSX_NAME))),
    }
}

fn log_report(report: &CleanReport, verbose: bool) {
    for failure in &report.failures {
        eprintln!("failed: {}: {}", failure.file, failure.message);
    }

    if !report.warnings.is_empty() {
        eprintln!("warning: {} issue(s) detected", report.warnings.len());
        if verbose {
            for warning in &report.warnings {
                eprintln!(
                    "  - {:?} file={:?} header_row={:?}: {}",
                    warning.code, warning.file, warning.header_row, warning.message
                );
            }
        }
    }

    if verbose {
        for file in &report.files {
            eprintln!(
                "{}: header row {}, {} row(s)",
                file.file, file.header_row, file.row_count
            );
        }
    }
}

fn run_clean(args: &CleanArgs) -> Result<CleanReport> {
    let options = parse_options(args)?;
    let (combined, report) = clean_files(&args.inputs, &options)
        .context("failed to clean the uploaded workbooks")?;

    let (csv_path, xlsx_path) = output_targets(args, options.pipeline);
    if let Some(path) = csv_path {
        let bytes = to_csv_bytes(&combined, options.delimiter)?;
        std::fs::write(&path, bytes)
            .with_context(|| format!("failed to write '{}'", path.display()))?;
    }
    if let Some(path) = xlsx_path {
        let bytes = to_xlsx_bytes(&combined, options.effective_sheet_name())?;
        std::fs::write(&path, bytes)
            .with_context(|| format!("failed to write '{}'", path.display()))?;
    }

    Ok(report)
}

fn main() -> ExitCode {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("sales_bill_to_csv=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Clean(args) => match run_clean(&args) {
            Ok(report) => {
                log_report(&report, args.verbose);
                if args.json {
                    match serde_json::to_string_pretty(&report) {
                        Ok(json) => println!("{json}"),
                        Err(error) => {
                            eprintln!("error: failed to serialize report: {error}");
                            return ExitCode::from(1);
                        }
                    }
                }
                if report.row_count > 0 {
                    ExitCode::SUCCESS
                } else {
                    ExitCode::from(2)
                }
            }
            Err(error) => {
                eprintln!("error: {error:#}");
                ExitCode::from(1)
            }
        },
    }
}
