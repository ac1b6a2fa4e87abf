//! Application error taxonomy.
//!
//! Every fallible operation that reaches the HTTP boundary returns an
//! [`AppError`]. The error carries an [`ErrorKind`] describing *what* went
//! wrong and the HTTP status it renders as, plus an [`anyhow::Error`] holding
//! the message shown to the client.
//!
//! | Kind | Status |
//! |------|--------|
//! | `Unauthenticated` | 401 |
//! | `Forbidden` | 403 |
//! | `NotFound` | 404 |
//! | `Conflict` | 400 |
//! | `InvalidState` | 400 |
//! | `BadRequest` | 400 |
//! | `Unprocessable` | 422 |
//! | `Internal` | 500 |
//!
//! Duplicate clearance requests are reported to clients as 400, so
//! `Conflict` shares the status of the other client-side workflow errors.

use anyhow::Error;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use validator::ValidationErrors;

/// The category of an [`AppError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing, malformed, invalid or expired credential.
    Unauthenticated,
    /// Valid credential with an insufficient role.
    Forbidden,
    /// A referenced entity does not exist.
    NotFound,
    /// A uniqueness rule was violated.
    Conflict,
    /// The system is not in a state that allows the operation.
    InvalidState,
    /// The request itself is unacceptable.
    BadRequest,
    /// The request body failed validation rules.
    Unprocessable,
    /// Unexpected persistence or computation failure.
    Internal,
}

impl ErrorKind {
    /// HTTP status this kind renders as.
    pub fn status(self) -> StatusCode {
        match self {
            ErrorKind::Unauthenticated => StatusCode::UNAUTHORIZED,
            ErrorKind::Forbidden => StatusCode::FORBIDDEN,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Conflict | ErrorKind::InvalidState | ErrorKind::BadRequest => {
                StatusCode::BAD_REQUEST
            }
            ErrorKind::Unprocessable => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug)]
pub struct AppError {
    pub kind: ErrorKind,
    pub status: StatusCode,
    pub error: Error,
}

impl AppError {
    pub fn new<E>(kind: ErrorKind, err: E) -> Self
    where
        E: Into<Error>,
    {
        Self {
            kind,
            status: kind.status(),
            error: err.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unauthenticated, anyhow::anyhow!(message.into()))
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Forbidden, anyhow::anyhow!(message.into()))
    }

    pub fn not_found<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(ErrorKind::NotFound, err)
    }

    pub fn conflict<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(ErrorKind::Conflict, err)
    }

    pub fn invalid_state<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(ErrorKind::InvalidState, err)
    }

    pub fn bad_request<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(ErrorKind::BadRequest, err)
    }

    pub fn unprocessable<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(ErrorKind::Unprocessable, err)
    }

    pub fn internal<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(ErrorKind::Internal, err)
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::internal(anyhow::anyhow!(message.into()))
    }

    /// The client-facing message.
    pub fn message(&self) -> String {
        self.error.to_string()
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.error)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": self.error.to_string()
        }));

        (self.status, body).into_response()
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        AppError::unprocessable(errors)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::internal(err)
    }
}
