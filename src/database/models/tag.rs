use serde::Serialize;
use sqlx::FromRow;

use crate::database::entity::Entity;
use crate::database::manager::DatabaseError;
use crate::database::store::Store;
use crate::filter::{Filter, SqlValue};
use crate::types::TagType;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Tag {
    pub id: Option<i64>,
    pub bgg_id: i64,
    pub name: String,
    #[serde(rename = "type")]
    #[sqlx(try_from = "String")]
    pub tag_type: TagType,
}

impl Tag {
    pub fn new(bgg_id: i64, name: impl Into<String>, tag_type: TagType) -> Self {
        Self { id: None, bgg_id, name: name.into(), tag_type }
    }

    /// Tags are unique per `(bgg_id, type)`
    pub async fn get_by_bgg_id(
        store: &dyn Store<Tag>,
        bgg_id: i64,
        tag_type: TagType,
    ) -> Result<Option<Tag>, DatabaseError> {
        store
            .find_one(Filter::new().eq("bgg_id", bgg_id).eq("tag_type", tag_type.as_str()))
            .await
    }
}

impl Entity for Tag {
    const TABLE: &'static str = "tags";

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
            ("tag_type", SqlValue::Text(self.tag_type.as_str().to_string())),
        ]
    }
}
