//! Typed error handling for the storefront
//!
//! Request handlers recover from almost everything locally (a notice and a
//! redirect), so these errors mostly travel between modules. The few that
//! reach axum are turned into a plain-text response by [`IntoResponse`].
//!
//! # Error Categories
//!
//! - [`ValidationError`]: missing or malformed form fields
//! - [`StorageError`]: storage backend failures
//! - [`ConfigError`]: configuration parsing, surfaced at startup only
//! - Render and notification failures carry their source message

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use std::fmt;

use crate::notification::NotificationError;

/// The main error type for the storefront
#[derive(Debug)]
pub enum ShopError {
    /// Form input errors
    Validation(ValidationError),

    /// Storage backend errors
    Storage(StorageError),

    /// Template rendering errors
    Render(String),

    /// Confirmation delivery errors
    Notification(NotificationError),

    /// Internal errors (should not happen in normal operation)
    Internal(String),
}

impl fmt::Display for ShopError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShopError::Validation(e) => write!(f, "{}", e),
            ShopError::Storage(e) => write!(f, "{}", e),
            ShopError::Render(msg) => write!(f, "Failed to render view: {}", msg),
            ShopError::Notification(e) => write!(f, "{}", e),
            ShopError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ShopError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ShopError::Validation(e) => Some(e),
            ShopError::Storage(e) => Some(e),
            ShopError::Notification(e) => Some(e),
            ShopError::Render(_) | ShopError::Internal(_) => None,
        }
    }
}

impl ShopError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ShopError::Validation(_) => StatusCode::BAD_REQUEST,
            ShopError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ShopError::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ShopError::Notification(_) => StatusCode::BAD_GATEWAY,
            ShopError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            ShopError::Validation(e) => e.error_code(),
            ShopError::Storage(_) => "STORAGE_ERROR",
            ShopError::Render(_) => "RENDER_ERROR",
            ShopError::Notification(_) => "NOTIFICATION_ERROR",
            ShopError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for ShopError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        tracing::error!(code = self.error_code(), error = %self, "request failed");
        (status, format!("{}: {}", self.error_code(), self)).into_response()
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Errors related to form input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// One or more required fields were empty or absent
    MissingFields(Vec<String>),

    /// A field was present but malformed
    InvalidField { field: String, message: String },

    /// A catalog key that does not exist
    UnknownService { key: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::MissingFields(fields) => {
                write!(f, "Missing required fields: {}", fields.join(", "))
            }
            ValidationError::InvalidField { field, message } => {
                write!(f, "Invalid value for '{}': {}", field, message)
            }
            ValidationError::UnknownService { key } => {
                write!(f, "Unknown service: {}", key)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

impl ValidationError {
    pub fn error_code(&self) -> &'static str {
        match self {
            ValidationError::MissingFields(_) => "MISSING_FIELDS",
            ValidationError::InvalidField { .. } => "INVALID_FIELD",
            ValidationError::UnknownService { .. } => "UNKNOWN_SERVICE",
        }
    }

    /// The notice shown to the visitor when this error stops a form
    pub fn notice(&self) -> String {
        match self {
            ValidationError::MissingFields(_) => "Please fill in all fields!".to_string(),
            ValidationError::InvalidField { field, .. } if field == "event_date" => {
                "Please enter the event date as YYYY-MM-DD.".to_string()
            }
            ValidationError::InvalidField { field, .. } if field == "rating" => {
                "Rating must be a whole number.".to_string()
            }
            ValidationError::InvalidField { field, .. } => format!("Please check the {} field.", field),
            ValidationError::UnknownService { .. } => "Service not found!".to_string(),
        }
    }
}

impl From<ValidationError> for ShopError {
    fn from(err: ValidationError) -> Self {
        ShopError::Validation(err)
    }
}

// =============================================================================
// Storage Errors
// =============================================================================

/// Errors related to storage backends
#[derive(Debug)]
pub enum StorageError {
    /// Connection error
    ConnectionError { backend: String, message: String },

    /// Query execution error
    QueryError { backend: String, message: String },

    /// Transaction error
    TransactionError { message: String },
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::ConnectionError { backend, message } => {
                write!(f, "Failed to connect to {}: {}", backend, message)
            }
            StorageError::QueryError { backend, message } => {
                write!(f, "{} query error: {}", backend, message)
            }
            StorageError::TransactionError { message } => {
                write!(f, "Transaction error: {}", message)
            }
        }
    }
}

impl std::error::Error for StorageError {}

impl From<StorageError> for ShopError {
    fn from(err: StorageError) -> Self {
        ShopError::Storage(err)
    }
}

// =============================================================================
// Configuration Errors
// =============================================================================

/// Errors related to configuration parsing
#[derive(Debug)]
pub enum ConfigError {
    /// File could not be read
    Io { file: String, message: String },

    /// YAML could not be parsed
    ParseError { file: Option<String>, message: String },

    /// An environment override held an unusable value
    InvalidValue { key: String, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { file, message } => {
                write!(f, "Failed to read config file '{}': {}", file, message)
            }
            ConfigError::ParseError {
                file: Some(file),
                message,
            } => write!(f, "Failed to parse config file '{}': {}", file, message),
            ConfigError::ParseError { file: None, message } => {
                write!(f, "Failed to parse config: {}", message)
            }
            ConfigError::InvalidValue { key, value } => {
                write!(f, "Invalid value '{}' for {}", value, key)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

// =============================================================================
// Conversions from external errors
// =============================================================================

impl From<tera::Error> for ShopError {
    fn from(err: tera::Error) -> Self {
        // tera nests the useful message in the source chain
        let mut message = err.to_string();
        let mut source = std::error::Error::source(&err);
        while let Some(inner) = source {
            message.push_str(": ");
            message.push_str(&inner.to_string());
            source = inner.source();
        }
        ShopError::Render(message)
    }
}

impl From<NotificationError> for ShopError {
    fn from(err: NotificationError) -> Self {
        ShopError::Notification(err)
    }
}

impl From<anyhow::Error> for ShopError {
    fn from(err: anyhow::Error) -> Self {
        ShopError::Storage(StorageError::QueryError {
            backend: "store".to_string(),
            message: format!("{:#}", err),
        })
    }
}
