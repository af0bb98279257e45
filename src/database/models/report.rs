use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use crate::database::entity::Entity;
use crate::filter::SqlValue;

/// Problem report about a game (missing pieces, damage, ...)
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Report {
    pub id: Option<i64>,
    pub game_name: String,
    pub description: String,
    pub game_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

impl Report {
    pub fn new(game_name: impl Into<String>, description: impl Into<String>, game_id: Option<i64>) -> Self {
        Self {
            id: None,
            game_name: game_name.into(),
            description: description.into(),
            game_id,
            created_at: Utc::now(),
        }
    }
}

impl Entity for Report {
    const TABLE: &'static str = "reports";

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    fn columns(&self) -> Vec<(&'static str, SqlValue)> {
        vec![
            ("game_name", SqlValue::Text(self.game_name.clone())),
            ("description", SqlValue::Text(self.description.clone())),
            ("game_id", SqlValue::OptInt(self.game_id)),
            ("created_at", SqlValue::Timestamp(self.created_at)),
        ]
    }
}
