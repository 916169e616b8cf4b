use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::types::activity::Column;

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Failed to read activity rows: {0}")]
    Read(String),
    #[error("Row {row} has {found} columns, expected {expected}")]
    ColumnCount {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("Row {row}: invalid value {value:?} in column {column}")]
    MalformedField {
        row: usize,
        column: Column,
        value: String,
    },
    #[error("Parsing was cancelled")]
    Cancelled,
}

#[derive(Debug, thiserror::Error)]
pub enum AggregateError {
    #[error("No activities to analyze")]
    EmptyInput,
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Aggregate(#[from] AggregateError),
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("No uploaded files available")]
    NoUploads,
    #[error("Storage error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Stable identifier for the failure, returned alongside the message.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Pipeline(PipelineError::Parse(err)) => match err {
                ParseError::Read(_) | ParseError::ColumnCount { .. } => "read_error",
                ParseError::MalformedField { .. } => "malformed_field",
                ParseError::Cancelled => "cancelled",
            },
            AppError::Pipeline(PipelineError::Aggregate(AggregateError::EmptyInput)) => "empty_input",
            AppError::Store(StoreError::NoUploads) => "not_found",
            AppError::Store(StoreError::Io(_)) => "storage",
            AppError::BadRequest(_) => "bad_request",
            AppError::Internal(_) => "internal",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Pipeline(PipelineError::Parse(err)) => match err {
                ParseError::Read(_) | ParseError::ColumnCount { .. } => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
                ParseError::MalformedField { .. } => StatusCode::BAD_REQUEST,
                ParseError::Cancelled => StatusCode::SERVICE_UNAVAILABLE,
            },
            AppError::Pipeline(PipelineError::Aggregate(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Store(StoreError::NoUploads) => StatusCode::NOT_FOUND,
            AppError::Store(StoreError::Io(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }

        let body = Json(json!({
            "error": self.to_string(),
            "kind": self.kind(),
        }));

        (status, body).into_response()
    }
}
