//! The rule contract.
//!
//! A rule validates one column and appends `{column}_Result` and
//! `{column}_Reason` to the dataset. [`Rule::execute`] never fails: if
//! [`Rule::validate`] returns an error, every row of the rule's result column
//! is marked `ERROR` and the reason column carries the error message, so one
//! broken rule cannot abort a run of many.

use crate::error::Result;
use crate::types::{Dataset, Outcome, Value, Verdict, REASON_SUFFIX, RESULT_SUFFIX};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, error};

/// State shared by every rule: its column, name, parameters and last result.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleBase {
    column_name: String,
    rule_name: String,
    params: BTreeMap<String, String>,
    results: Option<Dataset>,
}

impl RuleBase {
    /// Create the state for a rule of type `T`, named after the type.
    pub fn for_type<T: ?Sized>(column_name: impl Into<String>) -> Self {
        Self::new(column_name, short_type_name::<T>())
    }

    /// Create the state for a rule with an explicit name.
    pub fn new(column_name: impl Into<String>, rule_name: impl Into<String>) -> Self {
        Self {
            column_name: column_name.into(),
            rule_name: rule_name.into(),
            params: BTreeMap::new(),
            results: None,
        }
    }

    /// Override the rule name.
    pub fn with_rule_name(mut self, rule_name: impl Into<String>) -> Self {
        self.rule_name = rule_name.into();
        self
    }

    /// Attach a named parameter.
    pub fn with_param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.params.insert(key.into(), value.to_string());
        self
    }

    /// Column the rule validates.
    pub fn column_name(&self) -> &str {
        &self.column_name
    }

    /// Name reported in summaries.
    pub fn rule_name(&self) -> &str {
        &self.rule_name
    }

    /// Look up a named parameter.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// All named parameters.
    pub fn params(&self) -> &BTreeMap<String, String> {
        &self.params
    }

    /// Last dataset produced by [`Rule::execute`], if any.
    pub fn results(&self) -> Option<&Dataset> {
        self.results.as_ref()
    }

    /// Name of the verdict column, `{column}_Result`.
    pub fn result_column(&self) -> String {
        format!("{}{}", self.column_name, RESULT_SUFFIX)
    }

    /// Name of the reason column, `{column}_Reason`.
    pub fn reason_column(&self) -> String {
        format!("{}{}", self.column_name, REASON_SUFFIX)
    }

    /// Append one outcome per row as the result and reason columns.
    pub fn annotate(&self, dataset: &mut Dataset, outcomes: Vec<Outcome>) -> Result<()> {
        let (results, reasons): (Vec<Value>, Vec<Value>) = outcomes
            .into_iter()
            .map(|o| (Value::from(o.verdict), Value::Text(o.reason)))
            .unzip();

        dataset.set_column(&self.result_column(), results)?;
        dataset.set_column(&self.reason_column(), reasons)
    }

    fn annotate_error(&self, dataset: &mut Dataset, message: &str) {
        dataset.fill_column(&self.result_column(), Value::from(Verdict::Error));
        dataset.fill_column(&self.reason_column(), Value::from(message));
    }
}

/// Per-rule PASS/FAIL/ERROR counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    #[serde(rename = "Rule")]
    pub rule: String,
    #[serde(rename = "PASS")]
    pub pass: usize,
    #[serde(rename = "FAIL")]
    pub fail: usize,
    #[serde(rename = "ERROR")]
    pub error: usize,
}

/// Count verdicts across every `_Result` column of the dataset.
///
/// Includes result columns written by other rules earlier in the same run.
pub fn summarize(rule_name: &str, dataset: &Dataset) -> Summary {
    let mut summary = Summary {
        rule: rule_name.to_string(),
        pass: 0,
        fail: 0,
        error: 0,
    };

    let cells = dataset
        .columns()
        .iter()
        .filter(|c| c.name.contains(RESULT_SUFFIX))
        .flat_map(|c| c.values.iter());

    for cell in cells {
        let Value::Text(label) = cell else {
            continue;
        };
        match label.parse::<Verdict>() {
            Ok(Verdict::Pass) => summary.pass += 1,
            Ok(Verdict::Fail) => summary.fail += 1,
            Ok(Verdict::Error) => summary.error += 1,
            Err(_) => {}
        }
    }

    summary
}

/// A validation unit bound to one column.
///
/// Implementors provide [`Rule::validate`] and access to their [`RuleBase`];
/// execution, caching and summaries come from the provided methods.
pub trait Rule {
    /// Shared rule state.
    fn base(&self) -> &RuleBase;

    /// Mutable shared rule state.
    fn base_mut(&mut self) -> &mut RuleBase;

    /// Validate the dataset, appending the result and reason columns.
    ///
    /// Implementations must not touch any other column.
    fn validate(&self, dataset: &mut Dataset) -> Result<()>;

    fn rule_name(&self) -> &str {
        self.base().rule_name()
    }

    fn column_name(&self) -> &str {
        self.base().column_name()
    }

    /// Returns true once the rule has been executed at least once.
    fn is_evaluated(&self) -> bool {
        self.base().results().is_some()
    }

    /// Run [`Rule::validate`], converting any error into a dataset-wide
    /// `ERROR` annotation. The returned dataset is also cached on the rule.
    fn execute(&mut self, mut dataset: Dataset) -> Dataset {
        debug!(rule = self.rule_name(), column = self.column_name(), "executing rule");

        if let Err(e) = self.validate(&mut dataset) {
            error!(
                rule = self.rule_name(),
                column = self.column_name(),
                "rule failed: {}",
                e
            );
            self.base().annotate_error(&mut dataset, &e.to_string());
        }

        self.base_mut().results = Some(dataset.clone());
        dataset
    }

    /// Verdict counts over the last result, or `None` if never executed.
    fn summary(&self) -> Option<Summary> {
        self.base()
            .results()
            .map(|results| summarize(self.rule_name(), results))
    }
}

fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    full.rsplit("::").next().unwrap_or(full)
}
