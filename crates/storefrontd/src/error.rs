//! Maps intake errors to structured HTTP responses.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use storefront_core::{IntakeError, STORE_FAILURE_MESSAGE};
use storefront_state::ValidationError;

#[derive(Error, Debug)]
pub enum AppError {
    /// Request body failed model validation.
    #[error(transparent)]
    Validation(ValidationError),

    /// Request body could not be read as JSON.
    #[error("{message}")]
    Rejected { status: StatusCode, message: String },

    /// Internal server error; the message is safe to expose.
    #[error("{0}")]
    Internal(String),
}

impl From<IntakeError> for AppError {
    fn from(err: IntakeError) -> Self {
        match err {
            IntakeError::Validation(validation) => AppError::Validation(validation),
            IntakeError::Store => AppError::Internal(STORE_FAILURE_MESSAGE.to_string()),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, fields) = match &self {
            AppError::Validation(validation) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Some(
                    validation
                        .errors
                        .iter()
                        .map(|e| {
                            json!({
                                "path": e.path,
                                "code": e.kind.code(),
                                "message": e.kind.to_string(),
                            })
                        })
                        .collect::<Vec<_>>(),
                ),
            ),
            AppError::Rejected { status, .. } => (*status, None),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, None),
        };

        let mut error = json!({
            "code": status.as_u16(),
            "message": self.to_string(),
        });
        if let Some(fields) = fields {
            error["fields"] = json!(fields);
        }
        (status, axum::Json(json!({ "error": error }))).into_response()
    }
}
