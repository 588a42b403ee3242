use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::error;

use crate::storage::StoreError;

/// Envelope shared by every JSON response.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Json<Self> {
        Json(Self {
            ok: true,
            data: Some(data),
            error: None,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Unprocessable(String),
    #[error("Invalid or missing token")]
    InvalidToken,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("{0}")]
    NotFound(&'static str),
    /// `message` goes to the caller, `cause` only to the log.
    #[error("{message}")]
    Internal {
        message: &'static str,
        cause: anyhow::Error,
    },
}

impl ApiError {
    pub fn internal(message: &'static str, cause: impl Into<anyhow::Error>) -> Self {
        Self::Internal {
            message,
            cause: cause.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::InvalidToken | ApiError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn bad_body(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        ApiError::internal("Internal server error", e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal { message, cause } = &self {
            error!(error = %cause, "{message}");
        }
        let body = ApiResponse::<()> {
            ok: false,
            data: None,
            error: Some(self.to_string()),
        };
        (self.status(), Json(body)).into_response()
    }
}
