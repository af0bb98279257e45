use async_trait::async_trait;
use serde_json::json;
use std::path::PathBuf;

use crate::database::models::Game;
use crate::error::ApiError;
use crate::filter::Filter;
use crate::services::CatalogService;
use crate::views::{ApiOutcome, ApiResult, ApiView, View, ViewRequest, ViewResponse, ViewResult};

pub struct Games;

#[async_trait]
impl View for Games {
    const NAME: &'static str = "Games";
    const ROUTE: Option<&'static str> = Some("/games");

    async fn get(&self, req: ViewRequest) -> ViewResult {
        let page = req.state.db.games.paginate(req.fixed_page(12), Filter::new()).await?;
        Ok(ViewResponse::render("pages/games.html", json!({ "page": page })))
    }
}

/// Game search and lookup
pub struct GamesApi;

#[async_trait]
impl ApiView for GamesApi {
    const NAME: &'static str = "GamesApi";
    const ROUTE: Option<&'static str> = Some("/api/games");

    /// `q` is a case-insensitive regular expression over the name
    async fn list(&self, req: ViewRequest) -> ApiResult {
        let filter = match req.query("q").filter(|q| !q.is_empty()) {
            Some(pattern) => Filter::new().matches("name", pattern).map_err(ApiError::from)?,
            None => Filter::new(),
        };

        let page = req.state.db.games.paginate(req.page_request(12), filter).await?;
        ApiOutcome::data(page)
    }

    async fn read(&self, req: ViewRequest, key: String) -> ApiResult {
        let id: i64 = key.parse().map_err(|_| ApiError::not_found())?;
        match CatalogService::new(req.state.db.clone()).game_detail(id).await? {
            Some(detail) => ApiOutcome::data(detail),
            None => Err(ApiError::not_found().into()),
        }
    }
}

/// Box art, looked up by BGG id
pub struct GameImage;

#[async_trait]
impl View for GameImage {
    const NAME: &'static str = "GameImage";
    const ROUTE: Option<&'static str> = Some("/games/:game_id/image");

    async fn get(&self, req: ViewRequest) -> ViewResult {
        let Some(bgg_id) = req.param_id("game_id") else {
            return Ok(ViewResponse::not_found());
        };

        let game = Game::get_by_bgg_id(req.state.db.games.as_ref(), bgg_id).await?;
        let Some(image_path) = game.and_then(|g| g.image_path) else {
            return Ok(ViewResponse::not_found());
        };

        let mut path = PathBuf::from(image_path);
        if path.is_relative() {
            path = req.state.config.storage.image_root.join(path);
        }
        Ok(ViewResponse::file(path, "image/png"))
    }
}
