//! Sequential rule execution and summary aggregation.

use crate::rule::{Rule, Summary};
use crate::types::Dataset;
use tracing::info;

/// Annotated dataset and one summary per executed rule, in run order.
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub dataset: Dataset,
    pub summaries: Vec<Summary>,
}

/// Runs a list of rules against a dataset, one after another.
///
/// Rules see the columns appended by the rules before them, so a later
/// rule's summary also counts the earlier rules' verdicts.
#[derive(Default)]
pub struct RuleRunner {
    rules: Vec<Box<dyn Rule>>,
}

impl RuleRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule to the run.
    pub fn with_rule<R: Rule + 'static>(mut self, rule: R) -> Self {
        self.add(Box::new(rule));
        self
    }

    /// Append a boxed rule to the run.
    pub fn add(&mut self, rule: Box<dyn Rule>) {
        self.rules.push(rule);
    }

    /// Rules in run order.
    pub fn rules(&self) -> &[Box<dyn Rule>] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Execute every rule in order, threading the dataset through each.
    pub fn run(&mut self, dataset: Dataset) -> RunReport {
        let mut dataset = dataset;
        let mut summaries = Vec::with_capacity(self.rules.len());

        for rule in &mut self.rules {
            dataset = rule.execute(dataset);
            if let Some(summary) = rule.summary() {
                info!(
                    rule = summary.rule.as_str(),
                    column = rule.column_name(),
                    pass = summary.pass,
                    fail = summary.fail,
                    error = summary.error,
                    "rule finished"
                );
                summaries.push(summary);
            }
        }

        RunReport { dataset, summaries }
    }
}
