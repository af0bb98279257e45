use sqlx::{postgres::PgRow, FromRow};

use crate::filter::SqlValue;

/// A row type with an integer primary key.
///
/// `columns` is the single description of a row used by both store backends:
/// the Postgres repository binds it into INSERT/UPDATE statements and the
/// in-memory store evaluates filters against it.
pub trait Entity: Clone + Send + Sync + Unpin + 'static + for<'r> FromRow<'r, PgRow> {
    const TABLE: &'static str;

    fn id(&self) -> Option<i64>;

    fn set_id(&mut self, id: i64);

    /// Every stored column except `id`
    fn columns(&self) -> Vec<(&'static str, SqlValue)>;

    fn column(&self, name: &str) -> Option<SqlValue> {
        if name == "id" {
            return self.id().map(SqlValue::Int);
        }
        self.columns()
            .into_iter()
            .find(|(column, _)| *column == name)
            .map(|(_, value)| value)
    }
}
