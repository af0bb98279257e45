pub mod entity;
pub mod manager;
pub mod memory;
pub mod models;
pub mod query_builder;
pub mod repository;
pub mod store;

use sqlx::PgPool;
use std::sync::Arc;

pub use entity::Entity;
pub use manager::{DatabaseError, DatabaseManager};
pub use memory::MemoryStore;
pub use repository::Repository;
pub use store::Store;

use models::{Collection, Game, Publisher, Report, Tag, User};

/// One store handle per entity, shared by every request
#[derive(Clone)]
pub struct Database {
    pub users: Arc<dyn Store<User>>,
    pub games: Arc<dyn Store<Game>>,
    pub publishers: Arc<dyn Store<Publisher>>,
    pub tags: Arc<dyn Store<Tag>>,
    pub collections: Arc<dyn Store<Collection>>,
    pub reports: Arc<dyn Store<Report>>,
    pub pool: Option<PgPool>,
}

impl Database {
    pub fn memory() -> Self {
        Self {
            users: Arc::new(MemoryStore::<User>::new()),
            games: Arc::new(MemoryStore::<Game>::new()),
            publishers: Arc::new(MemoryStore::<Publisher>::new()),
            tags: Arc::new(MemoryStore::<Tag>::new()),
            collections: Arc::new(MemoryStore::<Collection>::new()),
            reports: Arc::new(MemoryStore::<Report>::new()),
            pool: None,
        }
    }

    pub fn postgres(pool: PgPool) -> Self {
        Self {
            users: Arc::new(Repository::<User>::new(pool.clone())),
            games: Arc::new(Repository::<Game>::new(pool.clone())),
            publishers: Arc::new(Repository::<Publisher>::new(pool.clone())),
            tags: Arc::new(Repository::<Tag>::new(pool.clone())),
            collections: Arc::new(Repository::<Collection>::new(pool.clone())),
            reports: Arc::new(Repository::<Report>::new(pool.clone())),
            pool: Some(pool),
        }
    }

    /// Postgres when a URL is configured, otherwise a fresh in-memory set
    pub async fn from_config(settings: &crate::config::DatabaseConfig) -> Result<Self, DatabaseError> {
        match settings.url {
            Some(_) => Ok(Self::postgres(DatabaseManager::connect(settings).await?)),
            None => {
                tracing::warn!("DATABASE_URL not set, using in-memory store (data is lost on exit)");
                Ok(Self::memory())
            }
        }
    }

    pub async fn health_check(&self) -> Result<(), DatabaseError> {
        match &self.pool {
            Some(pool) => DatabaseManager::health_check(pool).await,
            None => Ok(()),
        }
    }
}
