//! Errors returned by `TodoClient` build and parse methods.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// 404: no todo with the requested id.
    #[error("todo not found")]
    NotFound,

    /// Any other unexpected status. `detail` is the server's `detail`
    /// field when the body carries one, else the raw body.
    #[error("HTTP {status}: {detail}")]
    HttpError { status: u16, detail: String },

    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    #[error("serialization failed: {0}")]
    SerializationError(String),
}
