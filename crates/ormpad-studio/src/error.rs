use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Transport-level errors. Snippet failures are never represented here;
/// they travel as text inside the run result.
#[derive(Debug, Error)]
pub enum StudioError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Engine error: {0}")]
    Engine(#[from] ormpad_engine::EngineError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl IntoResponse for StudioError {
    fn into_response(self) -> Response {
        let (status, error_code) = match &self {
            StudioError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "INVALID_REQUEST"),
            StudioError::Engine(_) => (StatusCode::INTERNAL_SERVER_ERROR, "ENGINE_ERROR"),
            StudioError::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "IO_ERROR"),
        };

        let body = Json(json!({
            "success": false,
            "error": {
                "code": error_code,
                "message": self.to_string(),
            }
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, StudioError>;
