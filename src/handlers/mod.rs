pub mod auth;
pub mod customers;
pub mod devices;
pub mod inventory;
pub mod notifications;
pub mod receivers;
pub mod suppliers;
pub mod technicians;
pub mod tickets;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::database::StoreError;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
}

/// Error taxonomy of the API surface: 404 and 401 carry a message body,
/// anything internal is logged and reduced to a generic 500.
#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    Unauthorized(String),
    Internal,
}

impl ApiError {
    pub fn not_found(entity: &str) -> Self {
        ApiError::NotFound(format!("{} not found", entity))
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        log::error!("document store failure: {}", e);
        ApiError::Internal
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, message),
            ApiError::Unauthorized(message) => (StatusCode::UNAUTHORIZED, message),
            ApiError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };
        (status, Json(ErrorBody { message })).into_response()
    }
}
