use chrono::{DateTime, Utc};

use super::error::FilterError;
use super::filter_where::{FilterWhere, RowMatcher};
use super::types::{Condition, SqlResult, SqlValue};
use crate::pagination::PageRequest;

/// Backend-neutral description of a query: conditions joined with AND, a
/// fixed `id ASC` order, and an optional window.
#[derive(Debug, Clone, Default)]
pub struct Filter {
    conditions: Vec<Condition>,
    limit: Option<u64>,
    offset: Option<u64>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, column: &str, value: impl Into<SqlValue>) -> Self {
        self.conditions.push(Condition::Eq { column: column.to_string(), value: value.into() });
        self
    }

    pub fn eq_ignore_case(mut self, column: &str, value: &str) -> Self {
        self.conditions.push(Condition::EqIgnoreCase { column: column.to_string(), value: value.to_string() });
        self
    }

    /// Case-insensitive regex match; the pattern is compiled up front so a bad
    /// pattern is reported before any backend sees it.
    pub fn matches(mut self, column: &str, pattern: &str) -> Result<Self, FilterError> {
        FilterWhere::compile(pattern)?;
        self.conditions.push(Condition::Matches { column: column.to_string(), pattern: pattern.to_string() });
        Ok(self)
    }

    pub fn before(mut self, column: &str, value: DateTime<Utc>) -> Self {
        self.conditions.push(Condition::Before { column: column.to_string(), value });
        self
    }

    pub fn limit(mut self, limit: u64, offset: Option<u64>) -> Self {
        self.limit = Some(limit);
        self.offset = offset;
        self
    }

    pub fn page(self, request: PageRequest) -> Self {
        let offset = request.offset();
        self.limit(request.per_page, Some(offset))
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn window(&self) -> (Option<u64>, u64) {
        (self.limit, self.offset.unwrap_or(0))
    }

    /// Prepares the conditions for testing in-memory rows. Build one per
    /// query, not per row.
    pub fn matcher(&self) -> RowMatcher<'_> {
        RowMatcher::new(&self.conditions)
    }

    pub fn to_sql(&self, table_name: &str) -> Result<SqlResult, FilterError> {
        Self::validate_table_name(table_name)?;
        let where_result = self.to_where_sql()?;
        let query = [
            "SELECT *".to_string(),
            format!("FROM \"{}\"", table_name),
            if where_result.query.is_empty() { String::new() } else { format!("WHERE {}", where_result.query) },
            "ORDER BY \"id\" ASC".to_string(),
            self.build_limit_clause(),
        ].into_iter().filter(|s| !s.is_empty()).collect::<Vec<_>>().join(" ");

        Ok(SqlResult { query, params: where_result.params })
    }

    pub fn to_where_sql(&self) -> Result<SqlResult, FilterError> {
        for condition in &self.conditions {
            Self::validate_column(condition.column())?;
        }
        let (query, params) = FilterWhere::generate(&self.conditions);
        Ok(SqlResult { query, params })
    }

    pub fn to_count_sql(&self, table_name: &str) -> Result<SqlResult, FilterError> {
        Self::validate_table_name(table_name)?;
        let where_result = self.to_where_sql()?;
        let query = if where_result.query.is_empty() {
            format!("SELECT COUNT(*) as count FROM \"{}\"", table_name)
        } else {
            format!("SELECT COUNT(*) as count FROM \"{}\" WHERE {}", table_name, where_result.query)
        };
        Ok(SqlResult { query, params: where_result.params })
    }

    pub(crate) fn validate_table_name(name: &str) -> Result<(), FilterError> {
        if !Self::is_identifier(name) {
            return Err(FilterError::InvalidTableName(format!("Invalid table name format: {}", name)));
        }
        Ok(())
    }

    pub(crate) fn validate_column(column: &str) -> Result<(), FilterError> {
        if !Self::is_identifier(column) {
            return Err(FilterError::InvalidColumn(format!("Invalid column name format: {}", column)));
        }
        Ok(())
    }

    fn is_identifier(name: &str) -> bool {
        let mut chars = name.chars();
        match chars.next() {
            Some(first) if first.is_alphabetic() || first == '_' => {}
            _ => return false,
        }
        chars.all(|c| c.is_alphanumeric() || c == '_')
    }

    fn build_limit_clause(&self) -> String {
        match (self.limit, self.offset) {
            (Some(l), Some(o)) => format!("LIMIT {} OFFSET {}", l, o),
            (Some(l), None) => format!("LIMIT {}", l),
            (None, Some(o)) => format!("OFFSET {}", o),
            (None, None) => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_without_conditions_orders_by_id() {
        let sql = Filter::new().to_sql("games").unwrap();
        assert_eq!(sql.query, "SELECT * FROM \"games\" ORDER BY \"id\" ASC");
        assert!(sql.params.is_empty());
    }

    #[test]
    fn paged_search_numbers_parameters() {
        let sql = Filter::new()
            .matches("name", "catan")
            .unwrap()
            .eq("highlighted", true)
            .page(PageRequest::new(3, 12))
            .to_sql("games")
            .unwrap();
        assert_eq!(
            sql.query,
            "SELECT * FROM \"games\" WHERE \"name\" ~* $1 AND \"highlighted\" = $2 ORDER BY \"id\" ASC LIMIT 12 OFFSET 24"
        );
        assert_eq!(sql.params.len(), 2);
    }

    #[test]
    fn count_ignores_the_window() {
        let sql = Filter::new()
            .eq_ignore_case("username", "Alice")
            .limit(5, Some(10))
            .to_count_sql("users")
            .unwrap();
        assert_eq!(sql.query, "SELECT COUNT(*) as count FROM \"users\" WHERE lower(\"username\") = lower($1)");
    }

    #[test]
    fn rejects_bad_identifiers_and_patterns() {
        assert!(Filter::new().to_sql("games; DROP").is_err());
        assert!(Filter::new().eq("na me", 1i64).to_sql("games").is_err());
        assert!(Filter::new().matches("name", "(unclosed").is_err());
    }

    #[test]
    fn evaluates_rows_in_memory() {
        let filter = Filter::new().matches("name", "^ca").unwrap();
        assert!(filter.matcher().matches(|_| Some(SqlValue::Text("Catan".into()))));
        assert!(!filter.matcher().matches(|_| Some(SqlValue::Text("Azul".into()))));
        assert!(!filter.matcher().matches(|_| None));
    }
}
