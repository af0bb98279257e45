use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::database::models::User;
use crate::error::{ApiError, AppError};
use crate::filter::Filter;
use crate::types::Role;
use crate::views::{Access, ApiOutcome, ApiResult, ApiView, View, ViewRequest, ViewResponse, ViewResult};

pub struct Users;

#[async_trait]
impl View for Users {
    const NAME: &'static str = "Users";
    const ROUTE: Option<&'static str> = Some("/users");
    const ACCESS: Access = Access::role(Role::Admin);

    async fn get(&self, req: ViewRequest) -> ViewResult {
        let page = req.state.db.users.paginate(req.fixed_page(10), Filter::new()).await?;
        Ok(ViewResponse::render("pages/users.html", json!({ "page": page })))
    }
}

#[derive(Debug, Deserialize)]
struct RoleChange {
    role: Option<String>,
}

/// Admin user management: change a role, delete an account
pub struct UsersApi;

impl UsersApi {
    async fn find(req: &ViewRequest, key: &str) -> Result<User, AppError> {
        let id: i64 = key.parse().map_err(|_| ApiError::not_found())?;
        match req.state.db.users.get_by_id(id).await? {
            Some(user) => Ok(user),
            None => Err(ApiError::not_found().into()),
        }
    }
}

#[async_trait]
impl ApiView for UsersApi {
    const NAME: &'static str = "UsersApi";
    const ROUTE: Option<&'static str> = Some("/api/users");
    const ACCESS: Access = Access::role(Role::Admin);

    async fn update(&self, req: ViewRequest, key: String) -> ApiResult {
        let change: RoleChange = req.json()?;
        let Some(role) = change.role else {
            return ApiOutcome::empty();
        };

        let mut user = Self::find(&req, &key).await?;
        user.role = role.parse().map_err(|_| ApiError::bad_request("Invalid role"))?;

        let user = req.state.db.users.save(user).await?;
        tracing::info!(user_id = user.id, role = %user.role, "Changed role of {}", user.username);
        ApiOutcome::data(user)
    }

    async fn delete(&self, req: ViewRequest, key: String) -> ApiResult {
        let user = Self::find(&req, &key).await?;

        if req.user.as_ref().is_some_and(|me| me.is(&user)) {
            return Err(ApiError::method_not_allowed("Cannot delete self").into());
        }

        if let Some(id) = user.id {
            req.state.db.users.delete(id).await?;
            tracing::info!(user_id = id, "Deleted user {}", user.username);
        }
        ApiOutcome::empty()
    }
}
