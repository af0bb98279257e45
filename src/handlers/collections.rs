use async_trait::async_trait;
use serde_json::json;

use crate::error::AppError;
use crate::filter::Filter;
use crate::services::{CollectionInput, CollectionService};
use crate::types::Role;
use crate::views::{Access, FlashMessage, FormData, View, ViewRequest, ViewResponse, ViewResult};

const FORM_TEMPLATE: &str = "pages/create_edit_collection.html";

fn collection_input(form: &FormData) -> Result<CollectionInput, AppError> {
    Ok(CollectionInput {
        name: form.require("name")?.to_string(),
        description: form.get("description").map(str::to_string),
        highlight: form.checkbox("highlight"),
        game_ids: form.ids("games"),
    })
}

fn collection_url(id: Option<i64>) -> String {
    match id {
        Some(id) => format!("/collections/{}", id),
        None => "/collections".to_string(),
    }
}

pub struct ListCollections;

#[async_trait]
impl View for ListCollections {
    const NAME: &'static str = "ListCollections";
    const ROUTE: Option<&'static str> = Some("/collections");

    async fn get(&self, req: ViewRequest) -> ViewResult {
        let page = req.state.db.collections.paginate(req.page_request(12), Filter::new()).await?;
        Ok(ViewResponse::render("pages/collections.html", json!({ "page": page })))
    }
}

pub struct NewCollection;

#[async_trait]
impl View for NewCollection {
    const NAME: &'static str = "NewCollection";
    const ROUTE: Option<&'static str> = Some("/collections/new");
    const ACCESS: Access = Access::role(Role::Editor);

    async fn get(&self, _req: ViewRequest) -> ViewResult {
        Ok(ViewResponse::render(FORM_TEMPLATE, json!({ "collection": null })))
    }

    async fn post(&self, req: ViewRequest) -> ViewResult {
        let input = collection_input(&req.form())?;
        let collection = CollectionService::new(req.state.db.clone()).create(input).await?;

        Ok(ViewResponse::redirect(collection_url(collection.id)).flash(FlashMessage::success("Collection created")))
    }
}

pub struct ViewCollection;

#[async_trait]
impl View for ViewCollection {
    const NAME: &'static str = "ViewCollection";
    const ROUTE: Option<&'static str> = Some("/collections/:collection_id");

    async fn get(&self, req: ViewRequest) -> ViewResult {
        let Some(id) = req.param_id("collection_id") else {
            return Ok(ViewResponse::not_found());
        };

        match CollectionService::new(req.state.db.clone()).detail(id).await? {
            Some(detail) => Ok(ViewResponse::render("pages/collection.html", json!({ "collection": detail }))),
            None => Ok(ViewResponse::not_found()),
        }
    }
}

pub struct EditCollection;

#[async_trait]
impl View for EditCollection {
    const NAME: &'static str = "EditCollection";
    const ROUTE: Option<&'static str> = Some("/collections/:collection_id/edit");
    const ACCESS: Access = Access::role(Role::Editor);

    async fn get(&self, req: ViewRequest) -> ViewResult {
        let Some(id) = req.param_id("collection_id") else {
            return Ok(ViewResponse::not_found());
        };

        match CollectionService::new(req.state.db.clone()).detail(id).await? {
            Some(detail) => Ok(ViewResponse::render(FORM_TEMPLATE, json!({ "collection": detail }))),
            None => Ok(ViewResponse::not_found()),
        }
    }

    async fn post(&self, req: ViewRequest) -> ViewResult {
        let Some(id) = req.param_id("collection_id") else {
            return Ok(ViewResponse::not_found());
        };
        let input = collection_input(&req.form())?;

        match CollectionService::new(req.state.db.clone()).update(id, input).await? {
            Some(collection) => Ok(ViewResponse::redirect(collection_url(collection.id))
                .flash(FlashMessage::success("Collection updated successfully"))),
            None => Ok(ViewResponse::not_found()),
        }
    }
}
