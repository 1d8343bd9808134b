//! Synchronous client core for the todo service.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network. The caller executes the round-trip, so the core
//! stays deterministic and testable.
//!
//! # Design
//! - `TodoClient` is stateless and holds only `base_url`.
//! - Each operation is split into `build_*` (produces request) and
//!   `parse_*` (consumes response).
//! - Error bodies of the form `{"detail": "..."}` surface in
//!   `ApiError::HttpError`; 404 maps to `ApiError::NotFound`.

pub mod client;
pub mod error;
pub mod http;
pub mod types;

pub use client::TodoClient;
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use types::{CreateTodo, Todo, UpdateTodo, Welcome};
