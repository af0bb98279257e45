use axum::body::Bytes;
use serde::de::DeserializeOwned;
use std::collections::HashMap;

use crate::database::models::User;
use crate::error::ApiError;
use crate::pagination::{self, PageRequest};
use crate::state::AppState;
use crate::views::form::FormData;

/// Everything a view handler gets to see about one request.
///
/// The signed-in user is passed in explicitly; handlers never look it up.
pub struct ViewRequest {
    pub state: AppState,
    pub user: Option<User>,
    pub params: HashMap<String, String>,
    pub query: HashMap<String, String>,
    pub body: Bytes,
}

impl ViewRequest {
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    /// Integer path parameter; `None` when absent or not a number
    pub fn param_id(&self, name: &str) -> Option<i64> {
        self.param(name).and_then(|value| value.parse().ok())
    }

    pub fn query(&self, name: &str) -> Option<&str> {
        self.query.get(name).map(String::as_str)
    }

    pub fn page_num(&self) -> u64 {
        pagination::page_num(&self.query)
    }

    pub fn per_page(&self, default: u64) -> u64 {
        pagination::per_page(&self.query, default, self.state.config.pagination.max_per_page)
    }

    /// `p` from the query with a fixed page size
    pub fn fixed_page(&self, per_page: u64) -> PageRequest {
        PageRequest::new(self.page_num(), per_page)
    }

    /// `p` and `per_page` from the query
    pub fn page_request(&self, default_per_page: u64) -> PageRequest {
        PageRequest::from_query(&self.query, default_per_page, self.state.config.pagination.max_per_page)
    }

    pub fn form(&self) -> FormData {
        FormData::parse(&self.body)
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        serde_json::from_slice(&self.body).map_err(|e| ApiError::bad_request(format!("Invalid JSON body: {}", e)))
    }
}
