use async_trait::async_trait;
use axum::{http::StatusCode, response::Response};
use serde::Serialize;

use crate::error::{ApiError, AppError};
use crate::views::access::Access;
use crate::views::envelope::Envelope;
use crate::views::request::ViewRequest;

/// Successful result of an API operation, chosen explicitly by the operation
#[derive(Debug, Clone, PartialEq)]
pub enum ApiOutcome {
    Data { data: serde_json::Value, status: StatusCode },
    Empty { status: StatusCode },
}

pub type ApiResult = Result<ApiOutcome, AppError>;

impl ApiOutcome {
    /// `data` with 200
    pub fn data(value: impl Serialize) -> ApiResult {
        Self::data_with_status(value, StatusCode::OK)
    }

    pub fn data_with_status(value: impl Serialize, status: StatusCode) -> ApiResult {
        Ok(ApiOutcome::Data { data: serde_json::to_value(value)?, status })
    }

    /// No `data` key, 204
    pub fn empty() -> ApiResult {
        Ok(ApiOutcome::Empty { status: StatusCode::NO_CONTENT })
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiOutcome::Data { status, .. } | ApiOutcome::Empty { status } => *status,
        }
    }
}

/// Uniform list/create/read/update/delete surface.
///
/// Mounted at `ROUTE` (`GET` list, `POST` create) and `ROUTE/:key`
/// (`GET` read, `PATCH` update, `DELETE` delete). Every operation answers
/// 405 "Not Allowed" until a view implements it.
#[async_trait]
pub trait ApiView: Send + Sync + 'static {
    const NAME: &'static str;
    const ROUTE: Option<&'static str>;
    const ACCESS: Access = Access::PUBLIC;

    async fn list(&self, _req: ViewRequest) -> ApiResult {
        Err(ApiError::not_allowed().into())
    }

    async fn create(&self, _req: ViewRequest) -> ApiResult {
        Err(ApiError::not_allowed().into())
    }

    async fn read(&self, _req: ViewRequest, _key: String) -> ApiResult {
        Err(ApiError::not_allowed().into())
    }

    async fn update(&self, _req: ViewRequest, _key: String) -> ApiResult {
        Err(ApiError::not_allowed().into())
    }

    async fn delete(&self, _req: ViewRequest, _key: String) -> ApiResult {
        Err(ApiError::not_allowed().into())
    }
}

/// Wraps an operation's result in the envelope.
///
/// Only `AppError::Api` is turned into a failure envelope here; any other
/// error is handed back for the fallback boundary.
pub fn frame(result: ApiResult) -> Result<Response, AppError> {
    match result {
        Ok(ApiOutcome::Data { data, status }) => Ok(Envelope::success(data).with_status(status)),
        Ok(ApiOutcome::Empty { status }) => Ok(Envelope::empty().with_status(status)),
        Err(AppError::Api(err)) => Ok(Envelope::failure(err.message()).with_status(err.status_code())),
        Err(other) => Err(other),
    }
}
