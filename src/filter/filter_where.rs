use regex::{Regex, RegexBuilder};

use super::error::FilterError;
use super::types::{Condition, SqlValue};

pub struct FilterWhere;

impl FilterWhere {
    /// Render conditions as a parameterized Postgres WHERE body
    pub fn generate(conditions: &[Condition]) -> (String, Vec<SqlValue>) {
        let mut params = Vec::with_capacity(conditions.len());
        let mut clauses = Vec::with_capacity(conditions.len());

        for condition in conditions {
            let index = params.len() + 1;
            let clause = match condition {
                Condition::Eq { column, value } => {
                    params.push(value.clone());
                    format!("\"{}\" = ${}", column, index)
                }
                Condition::EqIgnoreCase { column, value } => {
                    params.push(SqlValue::Text(value.clone()));
                    format!("lower(\"{}\") = lower(${})", column, index)
                }
                Condition::Matches { column, pattern } => {
                    params.push(SqlValue::Text(pattern.clone()));
                    format!("\"{}\" ~* ${}", column, index)
                }
                Condition::Before { column, value } => {
                    params.push(SqlValue::Timestamp(*value));
                    format!("\"{}\" <= ${}", column, index)
                }
            };
            clauses.push(clause);
        }

        (clauses.join(" AND "), params)
    }

    /// In-memory counterpart of `generate` for a single column value.
    /// `Matches` conditions use `pattern`, compiled by the caller.
    pub fn evaluate(condition: &Condition, pattern: Option<&Regex>, value: &SqlValue) -> bool {
        match condition {
            Condition::Eq { value: expected, .. } => value == expected,
            Condition::EqIgnoreCase { value: expected, .. } => value
                .as_text()
                .map(|actual| actual.to_lowercase() == expected.to_lowercase())
                .unwrap_or(false),
            Condition::Matches { .. } => match (pattern, value.as_text()) {
                (Some(re), Some(text)) => re.is_match(text),
                _ => false,
            },
            Condition::Before { value: limit, .. } => match value {
                SqlValue::Timestamp(at) => at <= limit,
                _ => false,
            },
        }
    }

    pub fn compile(pattern: &str) -> Result<Regex, FilterError> {
        RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(|e| FilterError::InvalidPattern(e.to_string()))
    }
}

/// Conditions ready to test many rows, with every regex compiled once
pub struct RowMatcher<'a> {
    conditions: Vec<(&'a Condition, Option<Regex>)>,
}

impl<'a> RowMatcher<'a> {
    pub fn new(conditions: &'a [Condition]) -> Self {
        let conditions = conditions
            .iter()
            .map(|condition| {
                let pattern = match condition {
                    Condition::Matches { pattern, .. } => FilterWhere::compile(pattern).ok(),
                    _ => None,
                };
                (condition, pattern)
            })
            .collect();
        Self { conditions }
    }

    /// True when every condition holds for the row described by `lookup`
    pub fn matches(&self, lookup: impl Fn(&str) -> Option<SqlValue>) -> bool {
        self.conditions.iter().all(|(condition, pattern)| {
            lookup(condition.column())
                .map(|value| FilterWhere::evaluate(condition, pattern.as_ref(), &value))
                .unwrap_or(false)
        })
    }

    pub fn compiled_patterns(&self) -> usize {
        self.conditions.iter().filter(|(_, pattern)| pattern.is_some()).count()
    }
}
