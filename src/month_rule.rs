//! Financial month validation.
//!
//! Every row of the month column must be a one or two digit month in
//! `1..=12` that does not exceed the month of the file being checked.
//! Checks after the blank check are independent: a row collects every reason
//! that applies, joined with `"; "`.

use crate::error::{Error, Result};
use crate::rule::{Rule, RuleBase};
use crate::types::{Dataset, Outcome, Value};
use std::num::IntErrorKind;
use tracing::warn;

const BLANK: &str = "Blank - mandatory field.";
const NOT_NUMERIC: &str = "Not numeric.";
const TOO_LONG: &str = "More than 2 digits.";
const NOT_INTEGER: &str = "Not convertible to integer.";
const OUT_OF_RANGE: &str = "Invalid month (must be 1–12).";

/// Validates a financial month column against the current file month.
#[derive(Debug, Clone, PartialEq)]
pub struct FinancialMonthRule {
    base: RuleBase,
    current_file_month: i64,
}

impl FinancialMonthRule {
    /// Create the rule for `column_name` with the reference month.
    pub fn new(column_name: impl Into<String>, current_file_month: i64) -> Self {
        Self {
            base: RuleBase::for_type::<Self>(column_name)
                .with_param("current_file_month", current_file_month),
            current_file_month,
        }
    }

    /// Create the rule from a cell-like value, coercing it to an integer.
    ///
    /// Numbers are truncated; text must be an optionally signed integer.
    pub fn from_value(column_name: impl Into<String>, current_file_month: &Value) -> Result<Self> {
        let month = match current_file_month {
            Value::Number(n) if n.is_finite() && n.abs() < i64::MAX as f64 => n.trunc() as i64,
            Value::Text(s) => return Self::parse(column_name, s),
            other => return Err(invalid_month_param(&other.to_cell_string())),
        };
        Ok(Self::new(column_name, month))
    }

    /// Create the rule from a textual month such as `"6"` or `" +6 "`.
    pub fn parse(column_name: impl Into<String>, current_file_month: &str) -> Result<Self> {
        let month = current_file_month
            .trim()
            .parse::<i64>()
            .map_err(|_| invalid_month_param(current_file_month))?;
        Ok(Self::new(column_name, month))
    }

    /// Override the name reported in summaries.
    pub fn with_rule_name(mut self, rule_name: impl Into<String>) -> Self {
        self.base = self.base.with_rule_name(rule_name);
        self
    }

    /// Month values may not exceed this.
    pub fn current_file_month(&self) -> i64 {
        self.current_file_month
    }

    /// Validate a single cell.
    pub fn check_value(&self, value: &Value) -> Outcome {
        let text = value.to_cell_string();
        let text = text.trim();

        if text.is_empty() {
            return Outcome::fail(&[BLANK.to_string()]);
        }

        let mut reasons = Vec::new();
        let all_digits = text.chars().all(|c| c.is_ascii_digit());

        if !all_digits {
            reasons.push(NOT_NUMERIC.to_string());
        }

        if text.chars().count() > 2 {
            reasons.push(TOO_LONG.to_string());
        }

        let parsed = parse_integer(text);
        match &parsed {
            Some(Integer::Fits(n)) if (1..=12).contains(n) => {}
            Some(_) => reasons.push(OUT_OF_RANGE.to_string()),
            None => reasons.push(NOT_INTEGER.to_string()),
        }

        if all_digits {
            let exceeds = match &parsed {
                Some(Integer::Fits(n)) => (*n > self.current_file_month).then(|| n.to_string()),
                Some(Integer::Overflow(digits)) => Some(digits.clone()),
                None => None,
            };
            if let Some(num) = exceeds {
                reasons.push(format!(
                    "Month {} exceeds current file month ({}).",
                    num, self.current_file_month
                ));
            }
        }

        Outcome::from_reasons(&reasons)
    }
}

impl Rule for FinancialMonthRule {
    fn base(&self) -> &RuleBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut RuleBase {
        &mut self.base
    }

    fn validate(&self, dataset: &mut Dataset) -> Result<()> {
        let column = dataset.column(self.column_name())?;

        if !column.is_numeric() {
            warn!(
                column = self.column_name(),
                dtype = column.dtype(),
                "column is not numeric, values may need conversion"
            );
        }

        let outcomes: Vec<Outcome> = column.values.iter().map(|v| self.check_value(v)).collect();
        self.base.annotate(dataset, outcomes)
    }
}

enum Integer {
    Fits(i64),
    /// Too large for `i64`; holds the digits without sign or leading zeros.
    Overflow(String),
}

fn parse_integer(text: &str) -> Option<Integer> {
    match text.parse::<i64>() {
        Ok(n) => Some(Integer::Fits(n)),
        Err(e) if matches!(e.kind(), IntErrorKind::PosOverflow | IntErrorKind::NegOverflow) => {
            let digits = text.trim_start_matches(['+', '-']).trim_start_matches('0');
            Some(Integer::Overflow(digits.to_string()))
        }
        Err(_) => None,
    }
}

fn invalid_month_param(raw: &str) -> Error {
    Error::InvalidParameter {
        name: "current_file_month".to_string(),
        message: format!("cannot convert '{}' to an integer", raw),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Column, Verdict};
    use pretty_assertions::assert_eq;

    fn rule(current: i64) -> FinancialMonthRule {
        FinancialMonthRule::new("Financial Month", current)
    }

    fn reason(current: i64, value: Value) -> String {
        let outcome = rule(current).check_value(&value);
        assert_eq!(outcome.verdict, Verdict::Fail);
        outcome.reason
    }

    #[test]
    fn test_valid_months_pass() {
        for current in 1..=12 {
            for month in 1..=current {
                for value in [
                    Value::from(month.to_string()),
                    Value::from(format!("{:02}", month)),
                    Value::Number(month as f64),
                ] {
                    assert_eq!(rule(current).check_value(&value), Outcome::pass());
                }
            }
        }
    }

    #[test]
    fn test_blank_short_circuits() {
        for value in [Value::Missing, Value::from(""), Value::from("   "), Value::Number(f64::NAN)] {
            assert_eq!(reason(6, value), BLANK);
        }
    }

    #[test]
    fn test_out_of_range_and_exceeding_both_reported() {
        assert_eq!(
            reason(6, Value::from("13")),
            "Invalid month (must be 1–12).; Month 13 exceeds current file month (6)."
        );
        assert_eq!(reason(12, Value::from("0")), OUT_OF_RANGE);
    }

    #[test]
    fn test_non_numeric_reports_both_messages() {
        assert_eq!(reason(6, Value::from("AB")), "Not numeric.; Not convertible to integer.");
    }

    #[test]
    fn test_negative_and_fractional() {
        assert_eq!(reason(6, Value::from("-3")), "Not numeric.; Invalid month (must be 1–12).");
        assert_eq!(
            reason(6, Value::Number(5.5)),
            "Not numeric.; More than 2 digits.; Not convertible to integer."
        );
    }

    #[test]
    fn test_leading_zero_length_and_exceeding() {
        assert_eq!(
            reason(6, Value::from("007")),
            "More than 2 digits.; Month 7 exceeds current file month (6)."
        );
        assert_eq!(reason(6, Value::from(" 7 ")), "Month 7 exceeds current file month (6).");
    }

    #[test]
    fn test_only_ascii_digits_count() {
        assert_eq!(
            reason(6, Value::from("1_2")),
            "Not numeric.; More than 2 digits.; Not convertible to integer."
        );
        assert_eq!(reason(6, Value::from("５")), "Not numeric.; Not convertible to integer.");
        assert_eq!(reason(6, Value::from("٣")), "Not numeric.; Not convertible to integer.");
    }

    #[test]
    fn test_numeric_and_text_columns_agree() {
        let numbers = vec![
            Value::Number(3.0),
            Value::Number(13.0),
            Value::Number(0.0),
            Value::Number(7.0),
            Value::Missing,
        ];
        let texts = vec![
            Value::from("3"),
            Value::from("13"),
            Value::from("0"),
            Value::from("7"),
            Value::Missing,
        ];

        let annotate = |values: Vec<Value>| {
            let ds = Dataset::from_columns(vec![Column::new("Financial Month", values)]).unwrap();
            let out = rule(6).execute(ds);
            (
                out.column("Financial Month_Result").unwrap().values.clone(),
                out.column("Financial Month_Reason").unwrap().values.clone(),
            )
        };

        let from_numbers = annotate(numbers);
        let from_texts = annotate(texts);
        assert_eq!(from_numbers, from_texts);
        assert_eq!(
            from_numbers.0,
            vec![
                Value::from("PASS"),
                Value::from("FAIL"),
                Value::from("FAIL"),
                Value::from("FAIL"),
                Value::from("FAIL"),
            ]
        );
    }

    #[test]
    fn test_huge_number() {
        assert_eq!(
            reason(6, Value::from("0099999999999999999999")),
            "More than 2 digits.; Invalid month (must be 1–12).; Month 99999999999999999999 exceeds current file month (6)."
        );
    }

    #[test]
    fn test_validate_appends_columns_in_row_order() {
        let ds = Dataset::from_columns(vec![
            Column::new("Provider", vec![Value::from("RHW"); 4]),
            Column::new(
                "Financial Month",
                vec![Value::from("3"), Value::Missing, Value::from("AB"), Value::from("13")],
            ),
        ])
        .unwrap();

        let mut rule = rule(6);
        let out = rule.execute(ds);

        assert_eq!(
            out.column_names(),
            vec!["Provider", "Financial Month", "Financial Month_Result", "Financial Month_Reason"]
        );
        assert_eq!(
            out.column("Financial Month_Result").unwrap().values,
            vec![
                Value::from("PASS"),
                Value::from("FAIL"),
                Value::from("FAIL"),
                Value::from("FAIL"),
            ]
        );
        assert_eq!(
            out.column("Financial Month_Reason").unwrap().values[..2].to_vec(),
            vec![Value::from(""), Value::from(BLANK)]
        );

        let summary = rule.summary().unwrap();
        assert_eq!((summary.rule.as_str(), summary.pass, summary.fail, summary.error), ("FinancialMonthRule", 1, 3, 0));
    }

    #[test]
    fn test_rerun_is_idempotent() {
        let ds = Dataset::from_columns(vec![Column::new(
            "Financial Month",
            vec![Value::Number(2.0), Value::from("x"), Value::Missing],
        )])
        .unwrap();

        let mut rule = rule(6);
        let first = rule.execute(ds.clone());
        let second = rule.execute(ds);
        assert_eq!(first, second);

        let again = rule.execute(first.clone());
        assert_eq!(again, first);
    }

    #[test]
    fn test_missing_column_is_error_not_panic() {
        let ds = Dataset::from_columns(vec![Column::new("Other", vec![Value::from("1")])]).unwrap();
        let mut rule = rule(6);
        let out = rule.execute(ds);

        assert_eq!(out.column("Financial Month_Result").unwrap().values, vec![Value::from("ERROR")]);
        assert_eq!(
            out.column("Financial Month_Reason").unwrap().values,
            vec![Value::from("Column not found: Financial Month")]
        );
        assert_eq!(rule.summary().unwrap().error, 1);
    }

    #[test]
    fn test_construction_coerces_month() {
        assert_eq!(FinancialMonthRule::parse("m", " 6 ").unwrap().current_file_month(), 6);
        assert_eq!(FinancialMonthRule::parse("m", "+6").unwrap().current_file_month(), 6);
        assert_eq!(
            FinancialMonthRule::from_value("m", &Value::Number(6.7)).unwrap().current_file_month(),
            6
        );
        assert_eq!(
            FinancialMonthRule::from_value("m", &Value::from("11")).unwrap().current_file_month(),
            11
        );
        assert!(matches!(
            FinancialMonthRule::parse("m", "six"),
            Err(Error::InvalidParameter { .. })
        ));
        assert!(FinancialMonthRule::from_value("m", &Value::Missing).is_err());
        assert!(FinancialMonthRule::from_value("m", &Value::Number(f64::INFINITY)).is_err());
    }

    #[test]
    fn test_rule_name_and_params() {
        let named = rule(6).with_rule_name("MonthCheck");
        assert_eq!(named.rule_name(), "MonthCheck");
        assert_eq!(named.base().param("current_file_month"), Some("6"));
        assert_eq!(rule(6).rule_name(), "FinancialMonthRule");
    }
}
