// --- File: crates/bookify_common/src/error.rs ---
use std::fmt;
use thiserror::Error;

/// The error type returned at the HTTP boundary.
///
/// Feature crates map their own errors into one of these variants; each
/// variant carries the short, user-facing message.
#[derive(Error, Debug)]
pub enum BookifyError {
    /// No session credential, or one the server refuses
    #[error("{0}")]
    AuthError(String),

    /// A required field was not supplied
    #[error("Missing required field: {0}")]
    MissingField(String),

    /// Input was supplied but is malformed
    #[error("{0}")]
    ValidationError(String),

    /// Error occurred while parsing request data
    #[error("Failed to parse data: {0}")]
    ParseError(String),

    /// Missing or invalid configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The feature is switched off at runtime
    #[error("{0}")]
    ServiceDisabled(String),

    /// The remote provider or the network failed
    #[error("{message}")]
    ExternalServiceError {
        service_name: String,
        message: String,
    },
}

/// A trait for converting errors to HTTP status codes.
pub trait HttpStatusCode {
    /// Returns the HTTP status code for this error.
    fn status_code(&self) -> u16;
}

impl HttpStatusCode for BookifyError {
    fn status_code(&self) -> u16 {
        match self {
            BookifyError::AuthError(_) => 401,
            BookifyError::MissingField(_) => 400,
            BookifyError::ValidationError(_) => 400,
            BookifyError::ParseError(_) => 400,
            BookifyError::ConfigError(_) => 500,
            BookifyError::ServiceDisabled(_) => 503,
            BookifyError::ExternalServiceError { .. } => 500,
        }
    }
}

// Utility functions for error handling
pub fn unauthorized() -> BookifyError {
    BookifyError::AuthError("Unauthorized".to_string())
}

pub fn missing_field<T: fmt::Display>(field: T) -> BookifyError {
    BookifyError::MissingField(field.to_string())
}

pub fn validation_error<T: fmt::Display>(message: T) -> BookifyError {
    BookifyError::ValidationError(message.to_string())
}

pub fn config_error<T: fmt::Display>(message: T) -> BookifyError {
    BookifyError::ConfigError(message.to_string())
}

pub fn external_service_error<T: fmt::Display>(service_name: &str, message: T) -> BookifyError {
    BookifyError::ExternalServiceError {
        service_name: service_name.to_string(),
        message: message.to_string(),
    }
}
