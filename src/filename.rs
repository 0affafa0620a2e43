//! Structured submission filename parser.
//!
//! Submission files follow an underscore-separated naming convention, e.g.
//! `ID12345_RHW00_0CN_ACM0000_20250901_DCB2050_A000_P00_V01.xlsx`, where one
//! token names the provider (`RHW00`), one the dataset type and one the
//! submission date (`YYYYMMDD`).
//!
//! Providers submit one month late, so the financial period a file reports on
//! is the calendar month before the embedded date.

use crate::error::{Error, Result};
use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

static PROVIDER_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{3,5}0*$").expect("Invalid provider token regex"));

static DATASET_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{3,10}0*$").expect("Invalid dataset token regex"));

static DATE_DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]{8}").expect("Invalid date regex"));

/// Metadata extracted from a submission filename. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilenameMetadata {
    /// Provider code with trailing zeros stripped (`RHW00` → `RHW`).
    pub provider_code: Option<String>,

    /// Dataset type with trailing zeros stripped (`ACM0000` → `ACM`).
    pub dataset_type: Option<String>,

    /// Year of the embedded date.
    pub year: Option<i32>,

    /// Month of the embedded date, as written (not range checked).
    pub month: Option<u32>,

    /// Day of the embedded date, as written (not range checked).
    pub day: Option<u32>,
}

/// Financial month and year a submission reports on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinancialPeriod {
    /// Month in `1..=12`.
    pub month: u32,

    /// Calendar year of that month.
    pub year: i32,
}

impl fmt::Display for FinancialPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Decompose a filename (with or without directory) into its metadata.
///
/// Matching is case-insensitive. Provider and dataset type take the first
/// token matching their pattern, so both may resolve to the same token.
///
/// # Examples
///
/// ```
/// use dq_checker::parse_filename;
///
/// let meta = parse_filename("ID12345_RHW00_0CN_ACM0000_20250901_DCB2050_A000_P00_V01.xlsx")?;
/// assert_eq!(meta.provider_code.as_deref(), Some("RHW"));
/// assert_eq!((meta.year, meta.month, meta.day), (Some(2025), Some(9), Some(1)));
/// # Ok::<(), dq_checker::Error>(())
/// ```
pub fn parse_filename(file_name: &str) -> Result<FilenameMetadata> {
    let base_name = strip_extension(base_name(file_name)).to_uppercase();
    let parts: Vec<&str> = base_name.split('_').collect();

    let mut parsed = FilenameMetadata::default();

    parsed.provider_code = parts
        .iter()
        .find(|p| PROVIDER_TOKEN.is_match(p))
        .map(|p| p.trim_end_matches('0').to_string());

    parsed.dataset_type = parts
        .iter()
        .find(|p| DATASET_TOKEN.is_match(p) && !p.starts_with("ID"))
        .map(|p| p.trim_end_matches('0').to_string());

    if let Some(m) = DATE_DIGITS.find(&base_name) {
        let digits = m.as_str();
        let field = |range: std::ops::Range<usize>| {
            digits[range].parse::<u32>().map_err(|e| Error::FilenameParse {
                filename: file_name.to_string(),
                message: e.to_string(),
            })
        };
        parsed.year = Some(field(0..4)? as i32);
        parsed.month = Some(field(4..6)?);
        parsed.day = Some(field(6..8)?);
    }

    Ok(parsed)
}

/// Derive the financial period a submission reports on.
///
/// The embedded date is moved back one calendar month; January rolls back to
/// December of the previous year.
///
/// # Examples
///
/// ```
/// use dq_checker::derive_financial_month;
///
/// let period = derive_financial_month("RHW00_ACM_20250101.csv")?;
/// assert_eq!((period.month, period.year), (12, 2024));
/// # Ok::<(), dq_checker::Error>(())
/// ```
pub fn derive_financial_month(file_name: &str) -> Result<FinancialPeriod> {
    let parsed = parse_filename(file_name)?;

    let (year, month) = match (parsed.year, parsed.month) {
        (Some(year), Some(month)) if year != 0 && month != 0 => (year, month),
        _ => return Err(Error::MissingDate(file_name.to_string())),
    };

    let date = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| Error::InvalidDate(format!("{}-{:02}", year, month)))?;

    Ok(previous_month(date))
}

fn previous_month(date: NaiveDate) -> FinancialPeriod {
    use chrono::Datelike;

    if date.month() == 1 {
        FinancialPeriod {
            month: 12,
            year: date.year() - 1,
        }
    } else {
        FinancialPeriod {
            month: date.month() - 1,
            year: date.year(),
        }
    }
}

fn base_name(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

fn strip_extension(name: &str) -> &str {
    let leading_dots = name.len() - name.trim_start_matches('.').len();
    match name[leading_dots..].rfind('.') {
        Some(pos) => &name[..leading_dots + pos],
        None => name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = "ID12345_RHW00_0CN_ACM0000_20250901_DCB2050_A000_P00_V01.xlsx";

    #[test]
    fn test_parse_sample_filename() {
        let meta = parse_filename(SAMPLE).unwrap();
        assert_eq!(meta.provider_code.as_deref(), Some("RHW"));
        assert_eq!(meta.year, Some(2025));
        assert_eq!(meta.month, Some(9));
        assert_eq!(meta.day, Some(1));
    }

    #[test]
    fn test_dataset_type_takes_first_matching_token() {
        // The provider token also satisfies the dataset pattern and comes
        // first, so it wins over ACM0000.
        let meta = parse_filename(SAMPLE).unwrap();
        assert_eq!(meta.dataset_type.as_deref(), Some("RHW"));

        let meta = parse_filename("ID99_1RH_DEVICES000_20240315.csv").unwrap();
        assert_eq!(meta.provider_code, None);
        assert_eq!(meta.dataset_type.as_deref(), Some("DEVICES"));
    }

    #[test]
    fn test_dataset_type_skips_id_prefix() {
        let meta = parse_filename("IDENT_DEVICES_20240315").unwrap();
        assert_eq!(meta.provider_code.as_deref(), Some("IDENT"));
        assert_eq!(meta.dataset_type.as_deref(), Some("DEVICES"));
    }

    #[test]
    fn test_case_insensitive_with_directory() {
        let meta = parse_filename("/data/in/rhw00_acm_20250815.csv").unwrap();
        assert_eq!(meta.provider_code.as_deref(), Some("RHW"));
        assert_eq!(meta.month, Some(8));

        let meta = parse_filename(r"C:\DQ\RXQ_acm_20250815.csv").unwrap();
        assert_eq!(meta.provider_code.as_deref(), Some("RXQ"));
    }

    #[test]
    fn test_no_tokens_match() {
        let meta = parse_filename("12_ab_x.csv").unwrap();
        assert_eq!(meta, FilenameMetadata::default());
    }

    #[test]
    fn test_first_eight_digits_win() {
        let meta = parse_filename("RHW_202509011234.csv").unwrap();
        assert_eq!((meta.year, meta.month, meta.day), (Some(2025), Some(9), Some(1)));
    }

    #[test]
    fn test_derive_financial_month() {
        let period = derive_financial_month("RHW00_ACM_20250101.xlsx").unwrap();
        assert_eq!(period, FinancialPeriod { month: 12, year: 2024 });

        let period = derive_financial_month("RHW00_ACM_20250815.xlsx").unwrap();
        assert_eq!(period, FinancialPeriod { month: 7, year: 2025 });
        assert_eq!(period.to_string(), "2025-07");

        let period = derive_financial_month(SAMPLE).unwrap();
        assert_eq!(period, FinancialPeriod { month: 8, year: 2025 });
    }

    #[test]
    fn test_derive_without_date_fails() {
        assert!(matches!(
            derive_financial_month("RHW00_ACM.csv"),
            Err(Error::MissingDate(_))
        ));
    }

    #[test]
    fn test_derive_with_impossible_month_fails() {
        assert!(matches!(
            derive_financial_month("RHW_20251301.csv"),
            Err(Error::InvalidDate(_))
        ));
        assert!(matches!(
            derive_financial_month("RHW_20250001.csv"),
            Err(Error::MissingDate(_))
        ));
    }

    #[test]
    fn test_strip_extension() {
        assert_eq!(strip_extension("a.b.xlsx"), "a.b");
        assert_eq!(strip_extension(".hidden"), ".hidden");
        assert_eq!(strip_extension("plain"), "plain");
    }
}
