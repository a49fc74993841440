use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::db::StorageError;
use crate::llm::LlmError;
use crate::wods::generator::GenerationError;

/// Every failure a handler can surface. Each one is scoped to its request.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),
    #[error("authentication required")]
    Unauthorized,
    #[error("not found")]
    NotFound,
    #[error("model provider error: {0}")]
    Provider(String),
    #[error("model returned no content")]
    EmptyResponse,
    #[error("model returned a malformed workout: {0}")]
    MalformedResponse(String),
    #[error("storage error: {0}")]
    Storage(String),
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub message: String,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Provider(_) | AppError::EmptyResponse | AppError::MalformedResponse(_) => {
                StatusCode::BAD_GATEWAY
            }
            AppError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "validation_error",
            AppError::Unauthorized => "unauthorized",
            AppError::NotFound => "not_found",
            AppError::Provider(_) => "provider_error",
            AppError::EmptyResponse => "empty_response",
            AppError::MalformedResponse(_) => "malformed_response",
            AppError::Storage(_) => "storage_error",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorBody {
            error: self.code(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<LlmError> for AppError {
    fn from(e: LlmError) -> Self {
        match e {
            LlmError::Provider(msg) => AppError::Provider(msg),
            LlmError::EmptyResponse => AppError::EmptyResponse,
        }
    }
}

impl From<GenerationError> for AppError {
    fn from(e: GenerationError) -> Self {
        match e {
            GenerationError::Validation(msg) => AppError::Validation(msg),
            GenerationError::Llm(inner) => inner.into(),
            GenerationError::MalformedResponse(msg) => AppError::MalformedResponse(msg),
        }
    }
}

impl From<StorageError> for AppError {
    fn from(e: StorageError) -> Self {
        AppError::Storage(e.to_string())
    }
}
