//! Registration service error types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::store::StoreError;

/// Errors returned by the registration service
#[derive(Error, Debug)]
pub enum RegistrationError {
    /// A required field is missing or the request body is unusable
    #[error("{0}")]
    Validation(String),

    /// The record store could not be written or read
    #[error(transparent)]
    Storage(#[from] StoreError),
}

impl RegistrationError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for RegistrationError {
    fn into_response(self) -> Response {
        let body = json!({
            "status": "error",
            "message": self.to_string(),
        });
        (self.status_code(), Json(body)).into_response()
    }
}

pub type RegistrationResult<T> = Result<T, RegistrationError>;
