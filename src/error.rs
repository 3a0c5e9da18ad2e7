use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::storage::StorageError;

#[derive(Error, Debug)]
pub enum AssetError {
    #[error("logo fetch failed: {0}")]
    SourceFetch(String),

    #[error("image synthesis failed: {0}")]
    Synthesis(#[from] image::ImageError),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("not authorized")]
    Unauthorized,

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AssetError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AssetError::SourceFetch(_) => (StatusCode::BAD_GATEWAY, self.to_string()),
            AssetError::Synthesis(_) => (StatusCode::UNPROCESSABLE_ENTITY, self.to_string()),
            AssetError::Unauthorized => (StatusCode::FORBIDDEN, self.to_string()),
            AssetError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            AssetError::Storage(_) | AssetError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal server error".to_string(),
            ),
        };

        (status, message).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AssetError>;
