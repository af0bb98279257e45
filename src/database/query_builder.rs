use sqlx::{self, postgres::PgArguments, postgres::PgRow, FromRow, PgPool, Row};

use crate::database::manager::DatabaseError;
use crate::filter::{Filter, SqlResult, SqlValue};

/// Builds and runs the statements behind `Repository`
pub struct QueryBuilder<'a> {
    table_name: &'a str,
}

impl<'a> QueryBuilder<'a> {
    pub fn new(table_name: &'a str) -> Result<Self, DatabaseError> {
        Filter::validate_table_name(table_name).map_err(|e| DatabaseError::QueryError(e.to_string()))?;
        Ok(Self { table_name })
    }

    pub fn insert_sql(&self, columns: &[(&'static str, SqlValue)]) -> SqlResult {
        let names: Vec<String> = columns.iter().map(|(c, _)| format!("\"{}\"", c)).collect();
        let placeholders: Vec<String> = (1..=columns.len()).map(|i| format!("${}", i)).collect();
        SqlResult {
            query: format!(
                "INSERT INTO \"{}\" ({}) VALUES ({}) RETURNING *",
                self.table_name,
                names.join(", "),
                placeholders.join(", ")
            ),
            params: columns.iter().map(|(_, v)| v.clone()).collect(),
        }
    }

    pub fn update_sql(&self, id: i64, columns: &[(&'static str, SqlValue)]) -> SqlResult {
        let assignments: Vec<String> = columns
            .iter()
            .enumerate()
            .map(|(i, (c, _))| format!("\"{}\" = ${}", c, i + 1))
            .collect();
        let mut params: Vec<SqlValue> = columns.iter().map(|(_, v)| v.clone()).collect();
        params.push(SqlValue::Int(id));
        SqlResult {
            query: format!(
                "UPDATE \"{}\" SET {} WHERE \"id\" = ${} RETURNING *",
                self.table_name,
                assignments.join(", "),
                params.len()
            ),
            params,
        }
    }

    pub async fn fetch_all<T>(&self, sql: SqlResult, pool: &PgPool) -> Result<Vec<T>, DatabaseError>
    where
        T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    {
        let mut q = sqlx::query_as::<_, T>(&sql.query);
        for p in sql.params.iter() {
            q = bind_param_query_as(q, p);
        }
        Ok(q.fetch_all(pool).await?)
    }

    pub async fn fetch_one<T>(&self, sql: SqlResult, pool: &PgPool) -> Result<T, DatabaseError>
    where
        T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    {
        let mut q = sqlx::query_as::<_, T>(&sql.query);
        for p in sql.params.iter() {
            q = bind_param_query_as(q, p);
        }
        Ok(q.fetch_one(pool).await?)
    }

    pub async fn count(&self, filter: &Filter, pool: &PgPool) -> Result<u64, DatabaseError> {
        let sql = filter
            .to_count_sql(self.table_name)
            .map_err(|e| DatabaseError::QueryError(e.to_string()))?;
        let mut q = sqlx::query(&sql.query);
        for p in sql.params.iter() {
            q = bind_param_query(q, p);
        }
        let row = q.fetch_one(pool).await?;
        let count: i64 = row.try_get("count")?;
        Ok(count.max(0) as u64)
    }

    pub async fn execute(&self, sql: SqlResult, pool: &PgPool) -> Result<u64, DatabaseError> {
        let mut q = sqlx::query(&sql.query);
        for p in sql.params.iter() {
            q = bind_param_query(q, p);
        }
        Ok(q.execute(pool).await?.rows_affected())
    }
}

fn bind_param_query<'q>(
    q: sqlx::query::Query<'q, sqlx::Postgres, PgArguments>,
    v: &SqlValue,
) -> sqlx::query::Query<'q, sqlx::Postgres, PgArguments> {
    match v.clone() {
        SqlValue::Int(i) => q.bind(i),
        SqlValue::OptInt(i) => q.bind(i),
        SqlValue::Text(s) => q.bind(s),
        SqlValue::OptText(s) => q.bind(s),
        SqlValue::Bool(b) => q.bind(b),
        SqlValue::IntArray(ids) => q.bind(ids),
        SqlValue::Timestamp(at) => q.bind(at),
    }
}

fn bind_param_query_as<'q, O>(
    q: sqlx::query::QueryAs<'q, sqlx::Postgres, O, PgArguments>,
    v: &SqlValue,
) -> sqlx::query::QueryAs<'q, sqlx::Postgres, O, PgArguments>
where
    O: for<'r> FromRow<'r, PgRow>,
{
    match v.clone() {
        SqlValue::Int(i) => q.bind(i),
        SqlValue::OptInt(i) => q.bind(i),
        SqlValue::Text(s) => q.bind(s),
        SqlValue::OptText(s) => q.bind(s),
        SqlValue::Bool(b) => q.bind(b),
        SqlValue::IntArray(ids) => q.bind(ids),
        SqlValue::Timestamp(at) => q.bind(at),
    }
}
