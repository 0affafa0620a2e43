//! DQ Check - CLI tool for validating a submission file and saving an annotated copy.

use clap::{ArgAction, Parser};
use dq_checker::{
    derive_financial_month,
    logging::{init_logging, LogConfig, LogFormat},
    output::{save_output, write_summaries},
    parse_filename, Dataset, FinancialMonthRule, Format, Result, RuleRunner, DEFAULT_MONTH_COLUMN,
    DEFAULT_SUFFIX,
};
use std::fs::File;
use std::io;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "dq_check")]
#[command(about = "Validate financial month columns and save an annotated report", long_about = None)]
struct Cli {
    /// Input file path (CSV, TSV or XLSX)
    #[arg(short, long)]
    input: PathBuf,

    /// Folder the annotated report is written to
    #[arg(short, long = "output-dir")]
    output_dir: PathBuf,

    /// Suffix appended to the input base name
    #[arg(long, default_value = DEFAULT_SUFFIX)]
    suffix: String,

    /// Month column to validate (repeatable)
    #[arg(short, long = "column", default_value = DEFAULT_MONTH_COLUMN)]
    columns: Vec<String>,

    /// Current file month (derived from the filename date when omitted)
    #[arg(long)]
    month: Option<String>,

    /// Input format (csv, tsv, xlsx); detected from the extension when omitted
    #[arg(long)]
    format: Option<String>,

    /// Write the summary table here instead of stdout
    #[arg(long)]
    summary: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Log line layout (full, compact)
    #[arg(long = "log-format", default_value = "full")]
    log_format: String,

    /// Disable colored log output
    #[arg(long = "no-color")]
    no_color: bool,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let log_config = LogConfig::from_verbosity(cli.verbose)
        .with_format(cli.log_format.parse::<LogFormat>()?)
        .with_ansi(!cli.no_color);
    init_logging(&log_config)?;

    let format = match cli.format {
        Some(ref f) => f.parse::<Format>()?,
        None => Format::from_path(&cli.input)?,
    };

    let file_name = cli
        .input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let metadata = parse_filename(&file_name)?;
    info!(
        provider = metadata.provider_code.as_deref().unwrap_or("-"),
        dataset = metadata.dataset_type.as_deref().unwrap_or("-"),
        "parsed file name"
    );

    // Explicit month wins over the filename date
    let month = match cli.month {
        Some(ref m) => m.clone(),
        None => {
            let period = derive_financial_month(&file_name)?;
            info!(period = %period, "derived financial period");
            period.month.to_string()
        }
    };

    let mut runner = RuleRunner::new();
    for column in &cli.columns {
        runner.add(Box::new(FinancialMonthRule::parse(column.as_str(), &month)?));
    }

    let mut input = File::open(&cli.input)?;
    let dataset = Dataset::from_read(&mut input, format)?;
    info!(rows = dataset.height(), columns = dataset.width(), "loaded dataset");

    let report = runner.run(dataset);
    let path = save_output(&report.dataset, &cli.output_dir, &file_name, &cli.suffix, format)?;

    if let Some(ref summary_path) = cli.summary {
        let mut file = File::create(summary_path)?;
        write_summaries(&report.summaries, &mut file)?;
    } else {
        let mut stdout = io::stdout();
        write_summaries(&report.summaries, &mut stdout)?;
    }

    println!("Report saved at: {}", path.display());
    Ok(())
}
