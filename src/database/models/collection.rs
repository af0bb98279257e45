use serde::Serialize;
use sqlx::FromRow;

use crate::database::entity::Entity;
use crate::filter::SqlValue;

/// Curated list of games; at most one is highlighted on the home page
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Collection {
    pub id: Option<i64>,
    pub name: String,
    pub description: Option<String>,
    pub highlighted: bool,
    pub game_ids: Vec<i64>,
}

impl Collection {
    pub fn new(name: impl Into<String>, description: Option<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            description,
            highlighted: false,
            game_ids: vec![],
        }
    }
}

impl Entity for Collection {
    const TABLE: &'static str = "collections";

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    fn columns(&self) -> Vec<(&'static str, SqlValue)> {
        vec![
            ("name", SqlValue::Text(self.name.clone())),
            ("description", SqlValue::OptText(self.description.clone())),
            ("highlighted", SqlValue::Bool(self.highlighted)),
            ("game_ids", SqlValue::IntArray(self.game_ids.clone())),
        ]
    }
}
