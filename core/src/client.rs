//! Request builder and response parser for the todo backend.
//!
//! # Design
//! `TodoClient` holds only the base URL and carries no state between calls.
//! Each operation is split into a `build_*` method producing an
//! `HttpRequest` and a `parse_*` method consuming an `HttpResponse`, so the
//! I/O in between can be done by `ApiClient` or by a native host over FFI.
//! All parsing goes through `classify`.

use url::form_urlencoded;

use crate::classify::classify;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{Todo, TodoChange, User};

/// Stateless request builder and response parser.
#[derive(Debug, Clone)]
pub struct TodoClient {
    base_url: String,
}

impl TodoClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_login(&self, username: &str) -> HttpRequest {
        let query: String = form_urlencoded::Serializer::new(String::new())
            .append_pair("username", username)
            .finish();
        HttpRequest {
            method: HttpMethod::Get,
            url: format!("{}/users?{query}", self.base_url),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn build_list_todos(&self, user_id: i64) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url: format!("{}/todos?userId={user_id}", self.base_url),
            headers: Vec::new(),
            body: None,
        }
    }

    /// The body always carries every field, merged from `todo` and `change`.
    pub fn build_update_todo(
        &self,
        todo: &Todo,
        change: &TodoChange,
    ) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(&todo.with_changes(change))
            .map_err(|e| ApiError::Unexpected(format!("failed to encode todo: {e}")))?;
        Ok(HttpRequest {
            method: HttpMethod::Put,
            url: format!("{}/todos/{}", self.base_url, todo.id),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(body),
        })
    }

    /// An empty user list means the username is unknown. A success body that
    /// is not a list is reported as `Unexpected`.
    pub fn parse_login(&self, response: HttpResponse) -> Result<User, ApiError> {
        let value: serde_json::Value = classify(&response)?;
        if !value.is_array() {
            return Err(ApiError::Unexpected(
                "login response is not a list of users".to_string(),
            ));
        }
        let users: Vec<User> = serde_json::from_value(value)
            .map_err(|e| ApiError::Unexpected(format!("malformed user record: {e}")))?;
        users.into_iter().next().ok_or(ApiError::InvalidUsername)
    }

    pub fn parse_list_todos(&self, response: HttpResponse) -> Result<Vec<Todo>, ApiError> {
        classify(&response)
    }

    pub fn parse_update_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        classify(&response)
    }
}
