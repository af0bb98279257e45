use async_trait::async_trait;

use crate::database::entity::Entity;
use crate::database::manager::DatabaseError;
use crate::filter::Filter;
use crate::pagination::{Page, PageRequest};

/// Persistence operations shared by every entity.
///
/// Each `save` is one atomic write of the whole entity: inserts when the id is
/// unset (assigning it), updates otherwise.
#[async_trait]
pub trait Store<T: Entity>: Send + Sync {
    async fn save(&self, entity: T) -> Result<T, DatabaseError>;

    async fn delete(&self, id: i64) -> Result<(), DatabaseError>;

    async fn get_by_id(&self, id: i64) -> Result<Option<T>, DatabaseError>;

    /// Rows matching the filter, ordered by id ascending
    async fn select(&self, filter: &Filter) -> Result<Vec<T>, DatabaseError>;

    /// Number of rows matching the filter's conditions; the window is ignored
    async fn count(&self, filter: &Filter) -> Result<u64, DatabaseError>;

    async fn all(&self) -> Result<Vec<T>, DatabaseError> {
        self.select(&Filter::new()).await
    }

    async fn find_one(&self, filter: Filter) -> Result<Option<T>, DatabaseError> {
        let rows = self.select(&filter.limit(1, None)).await?;
        Ok(rows.into_iter().next())
    }

    /// Count, then slice. Both steps see the same conditions so `page_count`
    /// reflects the filtered set. The two reads are not isolated from
    /// concurrent writes.
    async fn paginate(&self, request: PageRequest, filter: Filter) -> Result<Page<T>, DatabaseError> {
        let total = self.count(&filter).await?;
        let items = self.select(&filter.page(request)).await?;
        Ok(Page::new(items, total, request.page, request.per_page))
    }
}
