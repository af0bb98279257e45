use serde::Serialize;
use sqlx::FromRow;

use crate::database::entity::Entity;
use crate::database::manager::DatabaseError;
use crate::database::store::Store;
use crate::filter::{Filter, SqlValue};

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Publisher {
    pub id: Option<i64>,
    pub bgg_id: i64,
    pub name: String,
}

impl Publisher {
    pub fn new(bgg_id: i64, name: impl Into<String>) -> Self {
        Self { id: None, bgg_id, name: name.into() }
    }

    pub async fn get_by_bgg_id(
        store: &dyn Store<Publisher>,
        bgg_id: i64,
    ) -> Result<Option<Publisher>, DatabaseError> {
        store.find_one(Filter::new().eq("bgg_id", bgg_id)).await
    }
}

impl Entity for Publisher {
    const TABLE: &'static str = "publishers";

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
        ]
    }
}
