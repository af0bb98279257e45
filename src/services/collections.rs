use serde::Serialize;

use crate::database::manager::DatabaseError;
use crate::database::models::{Collection, Game};
use crate::database::Database;
use crate::filter::Filter;

/// A collection together with the games it lists
#[derive(Debug, Clone, Serialize)]
pub struct CollectionDetail {
    #[serde(flatten)]
    pub collection: Collection,
    pub games: Vec<Game>,
}

/// Submitted collection fields, as entered on the create and edit pages
#[derive(Debug, Clone, Default)]
pub struct CollectionInput {
    pub name: String,
    pub description: Option<String>,
    pub highlight: bool,
    pub game_ids: Vec<i64>,
}

pub struct CollectionService {
    db: Database,
}

impl CollectionService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// The collection shown on the home page, if any
    pub async fn highlighted(&self) -> Result<Option<CollectionDetail>, DatabaseError> {
        match self
            .db
            .collections
            .find_one(Filter::new().eq("highlighted", true))
            .await?
        {
            Some(collection) => Ok(Some(self.with_games(collection).await?)),
            None => Ok(None),
        }
    }

    pub async fn detail(&self, id: i64) -> Result<Option<CollectionDetail>, DatabaseError> {
        match self.db.collections.get_by_id(id).await? {
            Some(collection) => Ok(Some(self.with_games(collection).await?)),
            None => Ok(None),
        }
    }

    async fn with_games(&self, collection: Collection) -> Result<CollectionDetail, DatabaseError> {
        let games = Game::get_many(self.db.games.as_ref(), &collection.game_ids).await?;
        Ok(CollectionDetail { collection, games })
    }

    /// Clears the flag on every other collection and sets it on this one.
    /// The caller saves `collection`.
    pub async fn highlight(&self, collection: &mut Collection) -> Result<(), DatabaseError> {
        let highlighted = self.db.collections.select(&Filter::new().eq("highlighted", true)).await?;
        for mut other in highlighted {
            if collection.id.is_some() && other.id == collection.id {
                continue;
            }
            other.highlighted = false;
            self.db.collections.save(other).await?;
        }

        collection.highlighted = true;
        Ok(())
    }

    /// Ids without a game are dropped
    async fn existing_games(&self, ids: &[i64]) -> Result<Vec<i64>, DatabaseError> {
        let games = Game::get_many(self.db.games.as_ref(), ids).await?;
        Ok(games.into_iter().filter_map(|game| game.id).collect())
    }

    pub async fn create(&self, input: CollectionInput) -> Result<Collection, DatabaseError> {
        let mut collection = Collection::new(input.name, input.description);
        collection.game_ids = self.existing_games(&input.game_ids).await?;

        if input.highlight {
            self.highlight(&mut collection).await?;
        }

        let collection = self.db.collections.save(collection).await?;
        tracing::info!(collection_id = collection.id, "Created collection {}", collection.name);
        Ok(collection)
    }

    /// `None` when there is no collection with that id
    pub async fn update(&self, id: i64, input: CollectionInput) -> Result<Option<Collection>, DatabaseError> {
        let Some(mut collection) = self.db.collections.get_by_id(id).await? else {
            return Ok(None);
        };

        collection.name = input.name;
        collection.description = input.description;

        if input.highlight && !collection.highlighted {
            self.highlight(&mut collection).await?;
        } else {
            collection.highlighted = input.highlight;
        }

        collection.game_ids = self.existing_games(&input.game_ids).await?;

        let collection = self.db.collections.save(collection).await?;
        tracing::info!(collection_id = collection.id, "Updated collection {}", collection.name);
        Ok(Some(collection))
    }
}
