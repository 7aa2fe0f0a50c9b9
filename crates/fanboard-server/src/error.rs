use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use fanboard_board::BoardError;
use fanboard_store::StoreError;

#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    NotFound(String),
    Internal(String),
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BadRequest(e) => write!(f, "bad request: {}", e),
            Self::NotFound(e) => write!(f, "not found: {}", e),
            Self::Internal(e) => write!(f, "internal: {}", e),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, msg) = match &self {
            Self::BadRequest(e) => (StatusCode::BAD_REQUEST, e.as_str()),
            Self::NotFound(e) => (StatusCode::NOT_FOUND, e.as_str()),
            Self::Internal(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.as_str()),
        };
        let body = serde_json::json!({ "error": msg });
        (status, axum::Json(body)).into_response()
    }
}

impl From<BoardError> for AppError {
    fn from(e: BoardError) -> Self {
        if e.is_validation() {
            return Self::BadRequest(e.to_string());
        }
        match &e {
            BoardError::Store(StoreError::NotFound(_))
            | BoardError::Store(StoreError::ParentNotFound(_)) => {
                Self::NotFound(e.to_string())
            }
            _ => Self::Internal(e.to_string()),
        }
    }
}
