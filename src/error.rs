use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{error, warn};

use crate::users::services::ServiceError;

/// JSON body shared by every error path.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub status: u16,
    pub message: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Unmapped route, or a create/update body missing a required field.
    #[error("Not Found: {url}")]
    NotFound { url: String },
    #[error("Internal Server Error")]
    Internal,
}

impl ApiError {
    pub fn not_found(url: impl Into<String>) -> Self {
        Self::NotFound { url: url.into() }
    }

    /// Maps a service failure for the request at `url`.
    pub fn from_service(err: ServiceError, url: &str) -> Self {
        match err {
            ServiceError::MissingField(field) => {
                warn!(field, %url, "request rejected: missing field");
                Self::not_found(url)
            }
            ServiceError::Hash(e) => {
                error!(error = %e, "password hashing failed");
                Self::Internal
            }
            ServiceError::Store(e) => {
                error!(error = %e, "store operation failed");
                Self::Internal
            }
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorBody {
            status: status.as_u16(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
