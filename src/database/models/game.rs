use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use crate::database::entity::Entity;
use crate::database::manager::DatabaseError;
use crate::database::store::Store;
use crate::filter::{Filter, SqlValue};

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Game {
    pub id: Option<i64>,
    pub bgg_id: i64,
    pub name: String,
    pub image_path: Option<String>,
    pub location: Option<String>,
    pub last_updated: DateTime<Utc>,
    pub publisher_ids: Vec<i64>,
    pub tag_ids: Vec<i64>,
}

impl Game {
    pub fn new(bgg_id: i64, name: impl Into<String>, image_path: Option<String>) -> Self {
        Self {
            id: None,
            bgg_id,
            name: name.into(),
            image_path,
            location: None,
            last_updated: Utc::now(),
            publisher_ids: vec![],
            tag_ids: vec![],
        }
    }

    pub async fn get_by_bgg_id(store: &dyn Store<Game>, bgg_id: i64) -> Result<Option<Game>, DatabaseError> {
        store.find_one(Filter::new().eq("bgg_id", bgg_id)).await
    }

    /// Resolves ids to games, silently skipping ids with no row
    pub async fn get_many(store: &dyn Store<Game>, ids: &[i64]) -> Result<Vec<Game>, DatabaseError> {
        let mut games = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(game) = store.get_by_id(*id).await? {
                games.push(game);
            }
        }
        Ok(games)
    }
}

impl Entity for Game {
    const TABLE: &'static str = "games";

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    fn columns(&self) -> Vec<(&'static str, SqlValue)> {
        vec![
            ("bgg_id", SqlValue::Int(self.bgg_id)),
            ("name", SqlValue::Text(self.name.clone())),
            ("image_path", SqlValue::OptText(self.image_path.clone())),
            ("location", SqlValue::OptText(self.location.clone())),
            ("last_updated", SqlValue::Timestamp(self.last_updated)),
            ("publisher_ids", SqlValue::IntArray(self.publisher_ids.clone())),
            ("tag_ids", SqlValue::IntArray(self.tag_ids.clone())),
        ]
    }
}
