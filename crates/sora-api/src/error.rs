//! HTTP error mapping
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use sora_core::SoraError;
use sora_export::ExportError;
use sora_store::{StorageError, StoreError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Engine(#[from] SoraError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error("AUTH/missing_user: x-user-id header is required")]
    Unauthenticated,

    #[error("REQUEST/{0}")]
    BadRequest(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Engine(SoraError::Validation { .. }) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Engine(SoraError::OutOfScope(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Engine(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Store(StoreError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Store(StoreError::Forbidden(_)) => StatusCode::FORBIDDEN,
            ApiError::Store(StoreError::InvalidName) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Store(StoreError::Unavailable(_)) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Store(StoreError::Serialize(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Storage(StorageError::UnsupportedGeoFile(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Storage(StorageError::InvalidFileName(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Storage(StorageError::AlreadyExists(_)) => StatusCode::CONFLICT,
            ApiError::Storage(StorageError::InvalidUrl(_)) => StatusCode::BAD_REQUEST,
            ApiError::Storage(StorageError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Storage(StorageError::Unavailable(_)) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Export(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Unauthenticated => StatusCode::UNAUTHORIZED,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Machine-readable code in the response body
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Engine(e) => e.code(),
            ApiError::Store(StoreError::NotFound(_)) => "NOT_FOUND",
            ApiError::Store(StoreError::Forbidden(_)) => "FORBIDDEN",
            ApiError::Store(StoreError::InvalidName) => "INVALID_NAME",
            ApiError::Store(_) => "STORE",
            ApiError::Storage(StorageError::UnsupportedGeoFile(_)) => "UNSUPPORTED_GEO_FILE",
            ApiError::Storage(StorageError::InvalidFileName(_)) => "INVALID_FILE_NAME",
            ApiError::Storage(StorageError::AlreadyExists(_)) => "ALREADY_EXISTS",
            ApiError::Storage(StorageError::InvalidUrl(_)) => "INVALID_URL",
            ApiError::Storage(StorageError::NotFound(_)) => "NOT_FOUND",
            ApiError::Storage(StorageError::Unavailable(_)) => "STORAGE",
            ApiError::Export(_) => "EXPORT",
            ApiError::Unauthenticated => "UNAUTHENTICATED",
            ApiError::BadRequest(_) => "BAD_REQUEST",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let field = match &self {
            ApiError::Engine(e) => e.field().map(String::from),
            _ => None,
        };
        let body = json!({
            "error": {
                "code": self.code(),
                "message": self.to_string(),
                "field": field,
            }
        });
        (status, Json(body)).into_response()
    }
}
