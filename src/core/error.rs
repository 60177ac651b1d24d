// Centralized error handling for the complaint service

use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use thiserror::Error;
use tracing::error;

/// Errors returned by request handlers
#[derive(Error, Debug)]
pub enum RequestError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No session, a tampered session, or a session holding the wrong role
    #[error("Login required")]
    Unauthorized,

    #[error("Not allowed to delete this complaint")]
    Forbidden,

    /// Path id that is not a non-negative integer
    #[error("Not found")]
    NotFound,

    #[error("Storage failure: {0}")]
    Store(StoreError),

    #[error("Password hashing failed: {0}")]
    PasswordHash(#[from] argon2::password_hash::Error),

    /// A blocking task panicked or was cancelled
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<StoreError> for RequestError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UsernameTaken(_) => RequestError::Validation(ValidationError::DuplicateUser),
            other => RequestError::Store(other),
        }
    }
}

impl IntoResponse for RequestError {
    fn into_response(self) -> Response {
        match &self {
            RequestError::Unauthorized => Redirect::to("/").into_response(),
            RequestError::Validation(_) => (StatusCode::BAD_REQUEST, self.to_string()).into_response(),
            RequestError::Forbidden => (StatusCode::FORBIDDEN, self.to_string()).into_response(),
            RequestError::NotFound => (StatusCode::NOT_FOUND, self.to_string()).into_response(),
            RequestError::Store(_) | RequestError::PasswordHash(_) | RequestError::Internal(_) => {
                error!(error = %self, "Request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
        }
    }
}

/// Input rejected before anything is written
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Username and password required")]
    MissingCredentials,

    #[error("User already exists")]
    DuplicateUser,

    #[error("Complaint text and location are required")]
    MissingComplaintFields,

    #[error("Spam or meaningless complaints are not allowed")]
    Spam,

    #[error("Invalid status: {0}")]
    InvalidStatus(String),
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Username already taken: {0}")]
    UsernameTaken(String),

    #[error("Corrupt row: {0}")]
    Corrupt(#[from] ModelError),
}

/// Failures parsing persisted enum columns
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ModelError {
    #[error("Unknown role: {0}")]
    UnknownRole(String),

    #[error("Unknown status: {0}")]
    UnknownStatus(String),

    #[error("Unknown priority: {0}")]
    UnknownPriority(String),
}

#[derive(Error, Debug)]
pub enum ClassifierError {
    #[error("Failed to access model artifact {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to parse model artifact: {0}")]
    Format(#[from] serde_json::Error),

    #[error("Inconsistent model artifact: {0}")]
    Inconsistent(String),

    #[error("Cannot fit a model without training samples")]
    EmptyTrainingSet,
}
