//! Ingestion error types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use contracts::ContractError;
use thiserror::Error;
use tracing::error;

/// Errors surfaced by the ingestion service
#[derive(Debug, Error)]
pub enum IngestionError {
    /// Request body could not be decoded into a reading
    #[error("bad request: {message}")]
    BadRequest { message: String },

    /// Store append or page read failed
    #[error("store error: {0}")]
    Store(#[source] ContractError),

    /// Alert notification failed (the reading is already persisted)
    #[error("notification error: {0}")]
    Notify(#[source] ContractError),
}

impl IngestionError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    /// HTTP status reported to the caller
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::Store(_) | Self::Notify(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for IngestionError {
    fn into_response(self) -> Response {
        let status = self.status();
        error!(status = status.as_u16(), error = %self, "Request failed");
        (status, self.to_string()).into_response()
    }
}

/// Ingestion Result alias
pub type Result<T> = std::result::Result<T, IngestionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            IngestionError::bad_request("x").status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            IngestionError::Store(ContractError::store_write("door", "down")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            IngestionError::Notify(ContractError::notify_delivery("hook", "down")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
