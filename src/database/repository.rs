use async_trait::async_trait;
use sqlx::PgPool;

use crate::database::entity::Entity;
use crate::database::manager::DatabaseError;
use crate::database::query_builder::QueryBuilder;
use crate::database::store::Store;
use crate::filter::{Filter, SqlResult, SqlValue};

/// Postgres-backed `Store` for one entity table
pub struct Repository<T> {
    pool: PgPool,
    _phantom: std::marker::PhantomData<T>,
}

impl<T: Entity> Repository<T> {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            _phantom: std::marker::PhantomData,
        }
    }

    fn builder(&self) -> Result<QueryBuilder<'static>, DatabaseError> {
        QueryBuilder::new(T::TABLE)
    }
}

#[async_trait]
impl<T: Entity> Store<T> for Repository<T> {
    async fn save(&self, entity: T) -> Result<T, DatabaseError> {
        let builder = self.builder()?;
        let columns = entity.columns();
        let sql = match entity.id() {
            Some(id) => builder.update_sql(id, &columns),
            None => builder.insert_sql(&columns),
        };
        match builder.fetch_one(sql, &self.pool).await {
            Err(DatabaseError::Sqlx(sqlx::Error::RowNotFound)) => Err(DatabaseError::NotFound(format!(
                "{} row {} not found",
                T::TABLE,
                entity.id().unwrap_or_default()
            ))),
            other => other,
        }
    }

    async fn delete(&self, id: i64) -> Result<(), DatabaseError> {
        let builder = self.builder()?;
        let sql = SqlResult {
            query: format!("DELETE FROM \"{}\" WHERE \"id\" = $1", T::TABLE),
            params: vec![SqlValue::Int(id)],
        };
        builder.execute(sql, &self.pool).await?;
        Ok(())
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<T>, DatabaseError> {
        self.find_one(Filter::new().eq("id", id)).await
    }

    async fn select(&self, filter: &Filter) -> Result<Vec<T>, DatabaseError> {
        let builder = self.builder()?;
        let sql = filter
            .to_sql(T::TABLE)
            .map_err(|e| DatabaseError::QueryError(e.to_string()))?;
        builder.fetch_all(sql, &self.pool).await
    }

    async fn count(&self, filter: &Filter) -> Result<u64, DatabaseError> {
        self.builder()?.count(filter, &self.pool).await
    }
}
