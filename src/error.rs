use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Not found")]
    NotFound,
    #[error("Too many requests")]
    TooManyRequests,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            Self::BadRequest(e) => (StatusCode::BAD_REQUEST, e),
            Self::Unauthorized => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED".to_owned()),
            Self::NotFound => (StatusCode::NOT_FOUND, "NOT_FOUND".to_owned()),
            Self::TooManyRequests => {
                (StatusCode::TOO_MANY_REQUESTS, "TOO_MANY_REQUESTS".to_owned())
            }
        };

        (status, Json(json!({ "error": error }))).into_response()
    }
}
