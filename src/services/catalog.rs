use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::database::manager::DatabaseError;
use crate::database::models::{Game, Publisher, Tag};
use crate::database::Database;
use crate::filter::Filter;
use crate::types::TagType;

/// A game with its publishers and tags resolved
#[derive(Debug, Clone, Serialize)]
pub struct GameDetail {
    #[serde(flatten)]
    pub game: Game,
    pub publishers: Vec<Publisher>,
    pub tags: Vec<Tag>,
}

/// Catalog entry as supplied by an import or by hand
#[derive(Debug, Clone, Default)]
pub struct GameInput {
    pub bgg_id: i64,
    pub name: String,
    pub image_path: Option<String>,
    pub location: Option<String>,
    pub publishers: Vec<(i64, String)>,
    pub tags: Vec<(i64, String, TagType)>,
}

pub struct CatalogService {
    db: Database,
}

impl CatalogService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn upsert_publisher(&self, bgg_id: i64, name: &str) -> Result<Publisher, DatabaseError> {
        if let Some(existing) = Publisher::get_by_bgg_id(self.db.publishers.as_ref(), bgg_id).await? {
            return Ok(existing);
        }
        self.db.publishers.save(Publisher::new(bgg_id, name)).await
    }

    pub async fn upsert_tag(&self, bgg_id: i64, name: &str, tag_type: TagType) -> Result<Tag, DatabaseError> {
        if let Some(existing) = Tag::get_by_bgg_id(self.db.tags.as_ref(), bgg_id, tag_type).await? {
            return Ok(existing);
        }
        self.db.tags.save(Tag::new(bgg_id, name, tag_type)).await
    }

    /// Inserts the game, or refreshes the one with the same BGG id. Existing
    /// image paths and locations are kept unless the input supplies new ones.
    pub async fn add_game(&self, input: GameInput) -> Result<Game, DatabaseError> {
        let mut game = match Game::get_by_bgg_id(self.db.games.as_ref(), input.bgg_id).await? {
            Some(mut existing) => {
                existing.name = input.name;
                existing
            }
            None => Game::new(input.bgg_id, input.name, None),
        };

        if input.image_path.is_some() {
            game.image_path = input.image_path;
        }
        if input.location.is_some() {
            game.location = input.location;
        }

        let mut publisher_ids = Vec::with_capacity(input.publishers.len());
        for (bgg_id, name) in &input.publishers {
            if let Some(id) = self.upsert_publisher(*bgg_id, name).await?.id {
                publisher_ids.push(id);
            }
        }

        let mut tag_ids = Vec::with_capacity(input.tags.len());
        for (bgg_id, name, tag_type) in &input.tags {
            if let Some(id) = self.upsert_tag(*bgg_id, name, *tag_type).await?.id {
                tag_ids.push(id);
            }
        }

        game.publisher_ids = publisher_ids;
        game.tag_ids = tag_ids;
        game.last_updated = Utc::now();

        let game = self.db.games.save(game).await?;
        tracing::info!(game_id = game.id, bgg_id = game.bgg_id, "Saved game {}", game.name);
        Ok(game)
    }

    pub async fn game_detail(&self, id: i64) -> Result<Option<GameDetail>, DatabaseError> {
        let Some(game) = self.db.games.get_by_id(id).await? else {
            return Ok(None);
        };

        let mut publishers = Vec::with_capacity(game.publisher_ids.len());
        for id in &game.publisher_ids {
            if let Some(publisher) = self.db.publishers.get_by_id(*id).await? {
                publishers.push(publisher);
            }
        }

        let mut tags = Vec::with_capacity(game.tag_ids.len());
        for id in &game.tag_ids {
            if let Some(tag) = self.db.tags.get_by_id(*id).await? {
                tags.push(tag);
            }
        }

        Ok(Some(GameDetail { game, publishers, tags }))
    }

    /// Games whose metadata was last refreshed at or before `cutoff`
    pub async fn stale_games(&self, cutoff: DateTime<Utc>) -> Result<Vec<Game>, DatabaseError> {
        self.db.games.select(&Filter::new().before("last_updated", cutoff)).await
    }
}
