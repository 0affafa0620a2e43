//! Core table and verdict types shared by the loader, the rules and the runner.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Suffix of the verdict column a rule appends.
pub const RESULT_SUFFIX: &str = "_Result";

/// Suffix of the reason column a rule appends.
pub const REASON_SUFFIX: &str = "_Reason";

/// A single cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Free text.
    Text(String),
    /// Numeric value.
    Number(f64),
    /// Empty cell.
    Missing,
}

impl Value {
    /// Returns true for empty cells and NaN numbers.
    pub fn is_missing(&self) -> bool {
        match self {
            Value::Missing => true,
            Value::Number(n) => n.is_nan(),
            Value::Text(_) => false,
        }
    }

    /// Render the cell the way it appears in a written table.
    ///
    /// Integral numbers drop their fractional part, so `5.0` renders as `"5"`.
    /// Missing cells render as the empty string.
    pub fn to_cell_string(&self) -> String {
        if self.is_missing() {
            return String::new();
        }
        match self {
            Value::Text(s) => s.clone(),
            Value::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => format!("{}", *n as i64),
            Value::Number(n) => n.to_string(),
            Value::Missing => String::new(),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

/// A named column of cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// Column header.
    pub name: String,

    /// Cells in row order.
    pub values: Vec<Value>,
}

impl Column {
    /// Create a column from a header and its values.
    pub fn new(name: impl Into<String>, values: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// A column is numeric when every non-missing cell holds a number.
    pub fn is_numeric(&self) -> bool {
        self.values
            .iter()
            .all(|v| matches!(v, Value::Number(_) | Value::Missing))
    }

    /// Short storage type label used in diagnostics.
    pub fn dtype(&self) -> &'static str {
        if self.is_numeric() {
            "number"
        } else {
            "text"
        }
    }
}

/// An ordered table of columns that all share the same row count.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    columns: Vec<Column>,
    height: usize,
}

impl Dataset {
    /// Create an empty dataset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a dataset from columns, checking they all have the same length.
    pub fn from_columns(columns: Vec<Column>) -> Result<Self> {
        let height = columns.first().map(|c| c.values.len()).unwrap_or(0);
        for column in &columns {
            if column.values.len() != height {
                return Err(Error::ColumnLengthMismatch {
                    column: column.name.clone(),
                    expected: height,
                    actual: column.values.len(),
                });
            }
        }
        Ok(Self { columns, height })
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// All columns in order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Column headers in order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Locate a column by exact name.
    pub fn column(&self, name: &str) -> Result<&Column> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| Error::ColumnNotFound(name.to_string()))
    }

    /// Replace the column with this name, or append it at the end.
    ///
    /// The first column set on an empty dataset fixes the row count.
    pub fn set_column(&mut self, name: &str, values: Vec<Value>) -> Result<()> {
        if self.columns.is_empty() {
            self.height = values.len();
        } else if values.len() != self.height {
            return Err(Error::ColumnLengthMismatch {
                column: name.to_string(),
                expected: self.height,
                actual: values.len(),
            });
        }

        match self.columns.iter_mut().find(|c| c.name == name) {
            Some(existing) => existing.values = values,
            None => self.columns.push(Column::new(name, values)),
        }
        Ok(())
    }

    /// Fill a column with the same value on every row.
    pub fn fill_column(&mut self, name: &str, value: Value) {
        let values = vec![value; self.height];
        match self.columns.iter_mut().find(|c| c.name == name) {
            Some(existing) => existing.values = values,
            None => self.columns.push(Column::new(name, values)),
        }
    }

    /// Iterate over rows as rendered cell strings.
    pub fn rows(&self) -> impl Iterator<Item = Vec<String>> + '_ {
        (0..self.height).map(move |idx| {
            self.columns
                .iter()
                .map(|c| c.values[idx].to_cell_string())
                .collect()
        })
    }
}

/// Per-row verdict of a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Verdict {
    /// Row satisfied every check.
    #[serde(rename = "PASS")]
    Pass,
    /// Row failed one or more checks.
    #[serde(rename = "FAIL")]
    Fail,
    /// The rule itself failed to evaluate.
    #[serde(rename = "ERROR")]
    Error,
}

impl Verdict {
    /// Label written into `_Result` columns.
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Pass => "PASS",
            Verdict::Fail => "FAIL",
            Verdict::Error => "ERROR",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Verdict {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "PASS" => Ok(Verdict::Pass),
            "FAIL" => Ok(Verdict::Fail),
            "ERROR" => Ok(Verdict::Error),
            _ => Err(format!("Invalid verdict: {}", s)),
        }
    }
}

impl From<Verdict> for Value {
    fn from(verdict: Verdict) -> Self {
        Value::Text(verdict.as_str().to_string())
    }
}

/// Outcome of one rule on one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    /// Verdict for the row.
    pub verdict: Verdict,

    /// Explanation; empty on PASS, non-empty on FAIL.
    pub reason: String,
}

impl Outcome {
    /// A passing outcome with an empty reason.
    pub fn pass() -> Self {
        Self {
            verdict: Verdict::Pass,
            reason: String::new(),
        }
    }

    /// A failing outcome. Reasons are joined with `"; "`.
    pub fn fail(reasons: &[String]) -> Self {
        Self {
            verdict: Verdict::Fail,
            reason: reasons.join("; "),
        }
    }

    /// Pass when no reasons were collected, otherwise fail with all of them.
    pub fn from_reasons(reasons: &[String]) -> Self {
        if reasons.is_empty() {
            Self::pass()
        } else {
            Self::fail(reasons)
        }
    }
}
