//! Data Quality Checker Library
//!
//! A library for validating tabular datasets column by column and annotating
//! every row with a verdict and a human-readable reason.
//!
//! # Components
//!
//! - **Filename parser**: derives provider, dataset type and reporting date
//!   from structured submission filenames
//! - **Rules**: per-column validation units behind the [`Rule`] trait
//! - **Financial month rule**: checks month columns against the reporting month
//! - **Runner**: executes rules in order and aggregates PASS/FAIL/ERROR counts
//!
//! # Examples
//!
//! ## Validating a month column
//!
//! ```no_run
//! use std::fs::File;
//! use dq_checker::{derive_financial_month, Dataset, FinancialMonthRule, Format, Rule};
//!
//! let name = "ID12345_RHW00_0CN_ACM0000_20250901_DCB2050_A000_P00_V01.csv";
//! let period = derive_financial_month(name)?;
//!
//! let mut file = File::open(name)?;
//! let dataset = Dataset::from_read(&mut file, Format::Csv)?;
//!
//! let mut rule = FinancialMonthRule::new("Financial Month", period.month.into());
//! let annotated = rule.execute(dataset);
//! println!("{:?}", rule.summary());
//! # let _ = annotated;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod error;
pub mod types;
pub mod csv_format;
pub mod xlsx_format;
pub mod filename;
pub mod rule;
pub mod month_rule;
pub mod runner;
pub mod output;
pub mod logging;

use std::path::Path;
use std::str::FromStr;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::{Column, Dataset, Outcome, Value, Verdict};
pub use filename::{derive_financial_month, parse_filename, FilenameMetadata, FinancialPeriod};
pub use rule::{Rule, RuleBase, Summary};
pub use month_rule::FinancialMonthRule;
pub use runner::{RuleRunner, RunReport};

/// Suffix appended to the input base name when saving the annotated dataset.
pub const DEFAULT_SUFFIX: &str = "_DQ_Report";

/// Column checked by the financial month rule when none is given.
pub const DEFAULT_MONTH_COLUMN: &str = "Financial Month";

/// Supported tabular data formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Comma-separated values
    Csv,
    /// Tab-separated values
    Tsv,
    /// Spreadsheet workbook; `.xls` is read, output is always `.xlsx`
    Xlsx,
}

impl FromStr for Format {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(Format::Csv),
            "tsv" | "tab" => Ok(Format::Tsv),
            "xlsx" | "xlsm" | "xls" | "excel" => Ok(Format::Xlsx),
            _ => Err(Error::UnsupportedFormat(s.to_string())),
        }
    }
}

impl Format {
    /// Detect the format from a file extension.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| Error::UnsupportedFormat(path.display().to_string()))?;
        ext.parse()
    }

    /// Get file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            Format::Csv => "csv",
            Format::Tsv => "tsv",
            Format::Xlsx => "xlsx",
        }
    }

    /// Field delimiter byte, `None` for workbooks.
    pub fn delimiter(&self) -> Option<u8> {
        match self {
            Format::Csv => Some(b','),
            Format::Tsv => Some(b'\t'),
            Format::Xlsx => None,
        }
    }
}
