//! Error responses in the Steve/Norman error format

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rancher_common::SteveError;

#[derive(Debug, Clone, PartialEq)]
pub enum FakeError {
    /// 401 Unauthorized
    Unauthorized,

    /// 404 Not Found
    NotFound(String),

    /// 409 Conflict, object already exists
    AlreadyExists(String),

    /// 409 Conflict, stale resourceVersion
    Conflict(String),

    /// 422 Unprocessable Entity
    Invalid(String),
}

impl FakeError {
    pub fn to_steve_error(&self) -> SteveError {
        match self {
            FakeError::Unauthorized => SteveError::new(401, "Unauthorized", "must authenticate"),
            FakeError::NotFound(msg) => SteveError::new(404, "NotFound", msg.clone()),
            FakeError::AlreadyExists(msg) => SteveError::new(409, "AlreadyExists", msg.clone()),
            FakeError::Conflict(msg) => SteveError::new(409, "Conflict", msg.clone()),
            FakeError::Invalid(msg) => SteveError::new(422, "Invalid", msg.clone()),
        }
    }
}

impl IntoResponse for FakeError {
    fn into_response(self) -> Response {
        let body = self.to_steve_error();
        let status = StatusCode::from_u16(body.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        tracing::debug!(status = body.status, code = %body.code, message = %body.message, "Request rejected");
        (status, Json(body)).into_response()
    }
}

pub type FakeResult<T> = std::result::Result<T, FakeError>;
