//! DQ Parse Name - CLI tool for inspecting submission filenames.

use clap::Parser;
use dq_checker::{derive_financial_month, parse_filename, FilenameMetadata, Result};

#[derive(Parser)]
#[command(name = "dq_parse_name")]
#[command(about = "Show the metadata and financial period encoded in submission filenames", long_about = None)]
struct Cli {
    /// Filenames to inspect
    #[arg(required = true)]
    names: Vec<String>,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    for name in &cli.names {
        let metadata = parse_filename(name)?;
        println!("{}", name);
        print!("{}", describe(&metadata));

        match derive_financial_month(name) {
            Ok(period) => println!("  financial period: {}", period),
            Err(e) => println!("  financial period: unavailable ({})", e),
        }
    }

    Ok(())
}

fn describe(metadata: &FilenameMetadata) -> String {
    let field = |value: Option<String>| value.unwrap_or_else(|| "-".to_string());

    let date = match (metadata.year, metadata.month, metadata.day) {
        (Some(y), Some(m), Some(d)) => format!("{:04}-{:02}-{:02}", y, m, d),
        _ => "-".to_string(),
    };

    format!(
        "  provider: {}\n  dataset type: {}\n  date: {}\n",
        field(metadata.provider_code.clone()),
        field(metadata.dataset_type.clone()),
        date
    )
}
