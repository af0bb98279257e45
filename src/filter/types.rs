use chrono::{DateTime, Utc};

/// A column value as it travels to and from a store backend
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Int(i64),
    OptInt(Option<i64>),
    Text(String),
    OptText(Option<String>),
    Bool(bool),
    IntArray(Vec<i64>),
    Timestamp(DateTime<Utc>),
}

impl SqlValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            SqlValue::Text(s) => Some(s),
            SqlValue::OptText(Some(s)) => Some(s),
            _ => None,
        }
    }
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        SqlValue::Int(v)
    }
}

impl From<bool> for SqlValue {
    fn from(v: bool) -> Self {
        SqlValue::Bool(v)
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        SqlValue::Text(v.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        SqlValue::Text(v)
    }
}

/// Single predicate over one column
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Eq { column: String, value: SqlValue },
    EqIgnoreCase { column: String, value: String },
    /// Case-insensitive regular expression match
    Matches { column: String, pattern: String },
    Before { column: String, value: DateTime<Utc> },
}

impl Condition {
    pub fn column(&self) -> &str {
        match self {
            Condition::Eq { column, .. }
            | Condition::EqIgnoreCase { column, .. }
            | Condition::Matches { column, .. }
            | Condition::Before { column, .. } => column,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SqlResult {
    pub query: String,
    pub params: Vec<SqlValue>,
}
