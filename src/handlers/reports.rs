use async_trait::async_trait;
use serde_json::json;

use crate::database::models::Report;
use crate::error::ApiError;
use crate::filter::Filter;
use crate::types::Role;
use crate::views::{Access, FlashMessage, View, ViewRequest, ViewResponse, ViewResult};

/// Form id meaning "a game that is not in the catalog"
const UNLISTED_GAME: i64 = -1;

pub struct ReportForm;

#[async_trait]
impl View for ReportForm {
    const NAME: &'static str = "ReportForm";
    const ROUTE: Option<&'static str> = Some("/report");

    async fn get(&self, _req: ViewRequest) -> ViewResult {
        Ok(ViewResponse::render("pages/make-report.html", json!({})))
    }

    async fn post(&self, req: ViewRequest) -> ViewResult {
        let form = req.form();
        let game_id: i64 = form
            .require("id")?
            .trim()
            .parse()
            .map_err(|_| ApiError::bad_request("Invalid game id"))?;
        let description = form.get_or_empty("description");
        let title = form.get_or_empty("title");

        let report = if game_id == UNLISTED_GAME {
            Report::new(title, description, None)
        } else {
            match req.state.db.games.get_by_id(game_id).await? {
                Some(game) => Report::new(game.name, description, game.id),
                None => return Ok(ViewResponse::not_found()),
            }
        };

        let report = req.state.db.reports.save(report).await?;
        tracing::info!(report_id = report.id, "Report filed for {}", report.game_name);

        Ok(ViewResponse::redirect("/").flash(FlashMessage::success("Thank you for your report!")))
    }
}

pub struct Reports;

#[async_trait]
impl View for Reports {
    const NAME: &'static str = "Reports";
    const ROUTE: Option<&'static str> = Some("/reports");
    const ACCESS: Access = Access::role(Role::Editor);

    async fn get(&self, req: ViewRequest) -> ViewResult {
        let page = req.state.db.reports.paginate(req.fixed_page(15), Filter::new()).await?;
        Ok(ViewResponse::render("pages/reports.html", json!({ "page": page })))
    }
}
