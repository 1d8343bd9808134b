//! Client-side DTOs for the todo API.
//!
//! Defined independently of the server crate; the integration test
//! catches schema drift between the two.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A todo as returned by the server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Todo {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

/// Creation payload. The server fills in an empty description when
/// `description` is `None`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTodo {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl CreateTodo {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
        }
    }
}

/// Partial update. Only fields that are `Some` are sent, and only those
/// change on the server.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTodo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Welcome {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct DeleteConfirm {
    pub confirm: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorDetail {
    pub detail: String,
}
