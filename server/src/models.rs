//! Wire and row types for the todo resource.
//!
//! `Todo` doubles as the database row (`sqlx::FromRow`) and the JSON
//! representation returned by every handler. Request payloads are separate
//! types so that "field omitted" stays distinguishable from "field set".

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;

use crate::error::ApiError;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Todo {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

/// Payload for creating one todo. `description` falls back to an empty
/// string when omitted or `null`.
#[derive(Clone, Debug, Deserialize)]
pub struct TodoCreate {
    title: String,
    #[serde(default)]
    description: Option<String>,
}

impl TodoCreate {
    pub fn new(title: impl Into<String>, description: Option<String>) -> Self {
        Self {
            title: title.into(),
            description,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        self.description.as_deref().unwrap_or_default()
    }
}

/// Body of `POST /todos`: either one creation payload or a list of them.
#[derive(Clone, Debug)]
pub enum CreatePayload {
    Single(TodoCreate),
    Batch(Vec<TodoCreate>),
}

impl CreatePayload {
    /// Resolve the variant from the JSON shape, then deserialize that shape.
    pub fn from_value(value: Value) -> Result<Self, ApiError> {
        match value {
            Value::Array(_) => serde_json::from_value(value)
                .map(Self::Batch)
                .map_err(|err| ApiError::Validation(err.to_string())),
            Value::Object(_) => serde_json::from_value(value)
                .map(Self::Single)
                .map_err(|err| ApiError::Validation(err.to_string())),
            _ => Err(ApiError::Validation(
                "expected a todo object or an array of todo objects".to_string(),
            )),
        }
    }
}

/// Partial update. `None` (absent or `null`) leaves the stored value alone.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct TodoUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub completed: Option<bool>,
}

#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(default)]
pub struct DeleteConfirm {
    pub confirm: bool,
}

impl Default for DeleteConfirm {
    fn default() -> Self {
        Self { confirm: true }
    }
}

impl DeleteConfirm {
    /// Parse an optional request body. An empty body confirms the delete.
    pub fn from_body(body: &[u8]) -> Result<Self, ApiError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        serde_json::from_slice(body).map_err(|err| ApiError::Validation(err.to_string()))
    }
}

#[derive(Debug, Serialize)]
pub struct Welcome {
    pub message: &'static str,
}

impl Default for Welcome {
    fn default() -> Self {
        Self {
            message: "Welcome to Todo API",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn todo_serializes_to_json() {
        let created_at = DateTime::parse_from_rfc3339("2024-05-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let todo = Todo {
            id: 7,
            title: "Test".to_string(),
            description: String::new(),
            completed: false,
            created_at,
        };
        let json = serde_json::to_value(&todo).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["title"], "Test");
        assert_eq!(json["description"], "");
        assert_eq!(json["completed"], false);
        assert_eq!(json["created_at"], "2024-05-01T12:00:00Z");
    }

    #[test]
    fn create_defaults_description_to_empty() {
        let input: TodoCreate = serde_json::from_str(r#"{"title":"Buy milk"}"#).unwrap();
        assert_eq!(input.title(), "Buy milk");
        assert_eq!(input.description(), "");

        let input: TodoCreate =
            serde_json::from_str(r#"{"title":"Buy milk","description":null}"#).unwrap();
        assert_eq!(input.description(), "");
    }

    #[test]
    fn create_rejects_missing_title() {
        let result: Result<TodoCreate, _> = serde_json::from_str(r#"{"description":"x"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn payload_object_is_single() {
        let payload = CreatePayload::from_value(json!({"title": "One"})).unwrap();
        assert!(matches!(payload, CreatePayload::Single(ref t) if t.title() == "One"));
    }

    #[test]
    fn payload_array_is_batch() {
        let payload =
            CreatePayload::from_value(json!([{"title": "A"}, {"title": "B", "description": "b"}]))
                .unwrap();
        match payload {
            CreatePayload::Batch(items) => {
                assert_eq!(items.len(), 2);
                assert_eq!(items[1].description(), "b");
            }
            CreatePayload::Single(_) => panic!("expected batch"),
        }
    }

    #[test]
    fn payload_rejects_scalars_and_bad_items() {
        assert!(matches!(
            CreatePayload::from_value(json!("title")),
            Err(ApiError::Validation(_))
        ));
        assert!(matches!(
            CreatePayload::from_value(json!([{"title": "ok"}, {"nope": 1}])),
            Err(ApiError::Validation(_))
        ));
    }

    #[test]
    fn update_all_fields_optional() {
        let input: TodoUpdate = serde_json::from_str(r#"{}"#).unwrap();
        assert!(input.title.is_none());
        assert!(input.description.is_none());
        assert!(input.completed.is_none());
    }

    #[test]
    fn update_keeps_explicit_false() {
        let input: TodoUpdate = serde_json::from_str(r#"{"completed":false}"#).unwrap();
        assert_eq!(input.completed, Some(false));
        assert!(input.title.is_none());
    }

    #[test]
    fn delete_confirm_defaults_to_true() {
        assert!(DeleteConfirm::from_body(b"").unwrap().confirm);
        assert!(DeleteConfirm::from_body(b"{}").unwrap().confirm);
        assert!(!DeleteConfirm::from_body(br#"{"confirm":false}"#).unwrap().confirm);
        assert!(DeleteConfirm::from_body(b"{oops").is_err());
    }
}
