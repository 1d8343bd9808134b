//! Stateless request builder and response parser for the todo API.
//!
//! Each operation is a `build_*` / `parse_*` pair. The caller performs the
//! round-trip in between.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{CreateTodo, DeleteConfirm, ErrorDetail, Todo, UpdateTodo, Welcome};

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

    pub fn build_welcome(&self) -> HttpRequest {
        HttpRequest::bodyless(HttpMethod::Get, format!("{}/", self.base_url))
    }

    pub fn build_list_todos(&self) -> HttpRequest {
        HttpRequest::bodyless(HttpMethod::Get, self.todos_path())
    }

    pub fn build_get_todo(&self, id: i64) -> HttpRequest {
        HttpRequest::bodyless(HttpMethod::Get, self.todo_path(id))
    }

    pub fn build_create_todo(&self, input: &CreateTodo) -> Result<HttpRequest, ApiError> {
        Ok(HttpRequest::json(HttpMethod::Post, self.todos_path(), to_json(input)?))
    }

    /// Create several todos in one request. The server commits all of
    /// them or none.
    pub fn build_create_todos(&self, inputs: &[CreateTodo]) -> Result<HttpRequest, ApiError> {
        Ok(HttpRequest::json(HttpMethod::Post, self.todos_path(), to_json(inputs)?))
    }

    pub fn build_update_todo(&self, id: i64, input: &UpdateTodo) -> Result<HttpRequest, ApiError> {
        Ok(HttpRequest::json(HttpMethod::Put, self.todo_path(id), to_json(input)?))
    }

    /// The server refuses with 400 unless `confirm` is true.
    pub fn build_delete_todo(&self, id: i64, confirm: bool) -> Result<HttpRequest, ApiError> {
        let body = to_json(&DeleteConfirm { confirm })?;
        Ok(HttpRequest::json(HttpMethod::Delete, self.todo_path(id), body))
    }

    pub fn parse_welcome(&self, response: HttpResponse) -> Result<Welcome, ApiError> {
        parse_json(response, 200)
    }

    pub fn parse_list_todos(&self, response: HttpResponse) -> Result<Vec<Todo>, ApiError> {
        parse_json(response, 200)
    }

    pub fn parse_get_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        parse_json(response, 200)
    }

    pub fn parse_create_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        parse_json(response, 201)
    }

    pub fn parse_create_todos(&self, response: HttpResponse) -> Result<Vec<Todo>, ApiError> {
        parse_json(response, 201)
    }

    pub fn parse_update_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        parse_json(response, 200)
    }

    pub fn parse_delete_todo(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response, 204)
    }

    fn todos_path(&self) -> String {
        format!("{}/todos", self.base_url)
    }

    fn todo_path(&self, id: i64) -> String {
        format!("{}/todos/{id}", self.base_url)
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, ApiError> {
    serde_json::to_string(value).map_err(|e| ApiError::SerializationError(e.to_string()))
}

fn parse_json<T: DeserializeOwned>(response: HttpResponse, expected: u16) -> Result<T, ApiError> {
    check_status(&response, expected)?;
    serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse, expected: u16) -> Result<(), ApiError> {
    if response.status == expected {
        return Ok(());
    }
    if response.status == 404 {
        return Err(ApiError::NotFound);
    }
    let detail = serde_json::from_str::<ErrorDetail>(&response.body)
        .map(|e| e.detail)
        .unwrap_or_else(|_| response.body.clone());
    Err(ApiError::HttpError {
        status: response.status,
        detail,
    })
}
