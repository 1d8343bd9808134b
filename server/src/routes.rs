use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::Value;

use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath};
use crate::models::{CreatePayload, DeleteConfirm, Todo, TodoUpdate, Welcome};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .route("/todos", get(list_todos).post(create_todos))
        .route(
            "/todos/{id}",
            get(get_todo).put(update_todo).delete(delete_todo),
        )
}

async fn root() -> Json<Welcome> {
    Json(Welcome::default())
}

async fn list_todos(State(state): State<AppState>) -> Result<Json<Vec<Todo>>, ApiError> {
    Ok(Json(state.todos.list().await?))
}

async fn get_todo(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<Todo>, ApiError> {
    Ok(Json(state.todos.get(id).await?))
}

async fn create_todos(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<Value>,
) -> Result<Response, ApiError> {
    let response = match CreatePayload::from_value(body)? {
        CreatePayload::Single(input) => {
            let todo = state.todos.insert(&input).await?;
            (StatusCode::CREATED, Json(todo)).into_response()
        }
        CreatePayload::Batch(inputs) => {
            let todos = state.todos.insert_many(&inputs).await?;
            (StatusCode::CREATED, Json(todos)).into_response()
        }
    };
    Ok(response)
}

async fn update_todo(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(changes): ApiJson<TodoUpdate>,
) -> Result<Json<Todo>, ApiError> {
    Ok(Json(state.todos.update(id, &changes).await?))
}

async fn delete_todo(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    body: Bytes,
) -> Result<StatusCode, ApiError> {
    if !DeleteConfirm::from_body(&body)?.confirm {
        return Err(ApiError::ConfirmationRequired);
    }
    state.todos.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
