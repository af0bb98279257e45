use async_trait::async_trait;
use serde_json::json;

use crate::services::CollectionService;
use crate::views::{View, ViewRequest, ViewResponse, ViewResult};

pub struct Home;

#[async_trait]
impl View for Home {
    const NAME: &'static str = "Home";
    const ROUTE: Option<&'static str> = Some("/");

    async fn get(&self, req: ViewRequest) -> ViewResult {
        let collection = CollectionService::new(req.state.db.clone()).highlighted().await?;
        Ok(ViewResponse::render("pages/home.html", json!({ "collection": collection })))
    }
}
