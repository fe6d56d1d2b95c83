//! Error responses for the HTTP handlers.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use food_map_database::DbError;
use food_map_inspection::DecodeError;
use thiserror::Error;

/// Everything a handler can fail with.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A required query parameter was absent or blank.
    #[error("Missing query parameter {0}")]
    MissingParameter(&'static str),

    /// Connecting to or querying the database failed.
    #[error(transparent)]
    Database(#[from] DbError),

    /// A row held a value the lookup tables cannot decode.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// A static page could not be opened.
    #[error("Failed to open {page}: {source}")]
    Page {
        /// Page file name.
        page: &'static str,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

impl ApiError {
    /// Message shown to the client. Internal details stay in the log.
    fn public_message(&self) -> String {
        match self {
            Self::MissingParameter(name) => format!("Missing query parameter {name}"),
            Self::Database(DbError::Connection { .. }) => "Database unavailable".to_string(),
            Self::Database(_) => "Failed to query inspections".to_string(),
            Self::Decode(_) => "Inspection data could not be decoded".to_string(),
            Self::Page { .. } => "Page not found".to_string(),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingParameter(_) => StatusCode::BAD_REQUEST,
            Self::Database(DbError::Connection { .. }) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Database(_) | Self::Decode(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Page { .. } => StatusCode::NOT_FOUND,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            log::error!("{self}");
        } else {
            log::warn!("{self}");
        }

        HttpResponse::build(status).json(serde_json::json!({
            "error": self.public_message()
        }))
    }
}
