use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::RwLock;

use crate::database::entity::Entity;
use crate::database::manager::DatabaseError;
use crate::database::store::Store;
use crate::filter::Filter;

/// Process-local store keyed by id. Used when no `DATABASE_URL` is configured
/// and by the test suite.
pub struct MemoryStore<T> {
    rows: RwLock<BTreeMap<i64, T>>,
    next_id: AtomicI64,
    writes: AtomicUsize,
}

impl<T: Entity> MemoryStore<T> {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(BTreeMap::new()),
            next_id: AtomicI64::new(1),
            writes: AtomicUsize::new(0),
        }
    }

    /// Number of save and delete calls received so far
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn poisoned() -> DatabaseError {
        DatabaseError::QueryError(format!("{} store lock poisoned", T::TABLE))
    }
}

impl<T: Entity> Default for MemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Entity> Store<T> for MemoryStore<T> {
    /// Updating an id with no row fails like the Postgres `UPDATE` does
    async fn save(&self, mut entity: T) -> Result<T, DatabaseError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        let mut rows = self.rows.write().map_err(|_| Self::poisoned())?;
        let id = match entity.id() {
            Some(id) if rows.contains_key(&id) => id,
            Some(id) => {
                return Err(DatabaseError::NotFound(format!("{} row {} not found", T::TABLE, id)));
            }
            None => {
                let id = self.next_id.fetch_add(1, Ordering::SeqCst);
                entity.set_id(id);
                id
            }
        };
        rows.insert(id, entity.clone());
        Ok(entity)
    }

    async fn delete(&self, id: i64) -> Result<(), DatabaseError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        let mut rows = self.rows.write().map_err(|_| Self::poisoned())?;
        rows.remove(&id);
        Ok(())
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<T>, DatabaseError> {
        let rows = self.rows.read().map_err(|_| Self::poisoned())?;
        Ok(rows.get(&id).cloned())
    }

    async fn select(&self, filter: &Filter) -> Result<Vec<T>, DatabaseError> {
        let rows = self.rows.read().map_err(|_| Self::poisoned())?;
        let (limit, offset) = filter.window();
        let matcher = filter.matcher();
        let matching = rows
            .values()
            .filter(|row| matcher.matches(|column| row.column(column)))
            .skip(offset as usize)
            .cloned();
        Ok(match limit {
            Some(limit) => matching.take(limit as usize).collect(),
            None => matching.collect(),
        })
    }

    async fn count(&self, filter: &Filter) -> Result<u64, DatabaseError> {
        let rows = self.rows.read().map_err(|_| Self::poisoned())?;
        let matcher = filter.matcher();
        let total = rows
            .values()
            .filter(|row| matcher.matches(|column| row.column(column)))
            .count();
        Ok(total as u64)
    }
}
