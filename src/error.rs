//! Application-wide error types
//!
//! Provides a unified error type covering the whole failure taxonomy of the
//! service. Every variant maps to an HTTP status code and a JSON body, so
//! controllers can propagate errors with the `?` operator and never crash the
//! process.

use std::collections::HashMap;
use thiserror::Error;

/// Validation errors as a map of field names to messages
///
/// Supports multiple errors per field and converts from the `validator`
/// crate's error type.
#[derive(Debug, Clone, Default)]
pub struct ValidationErrors {
    /// Map of field names to their validation error messages
    pub errors: HashMap<String, Vec<String>>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self {
            errors: HashMap::new(),
        }
    }

    /// Add an error for a specific field
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Convert from the validator crate's error type
    pub fn from_validator(errors: validator::ValidationErrors) -> Self {
        let mut result = Self::new();
        for (field, field_errors) in errors.field_errors() {
            for error in field_errors {
                let message = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Validation failed for field '{}'", field));
                result.add(field.to_string(), message);
            }
        }
        result
    }

    /// Convert to a JSON value for the response body
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "message": "The given data was invalid.",
            "errors": self.errors
        })
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Validation failed: {:?}", self.errors)
    }
}

impl std::error::Error for ValidationErrors {}

/// Application error type
///
/// Each variant carries enough context to produce a caller-visible JSON
/// error response. `Unauthorized` is deliberately reported as a
/// row-not-affected condition so the API never leaks whether a row owned by
/// another user exists.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// Analyzer invoked with neither text nor file input
    #[error("Please provide either text or a file")]
    EmptyInput,

    /// Completion endpoint unreachable, errored, or credential missing
    #[error("Task analysis service unavailable: {0}")]
    ModelUnavailable(String),

    /// Both parse paths yielded zero subtasks
    #[error("No subtasks could be extracted from the response")]
    NoSubtasksExtracted,

    /// No valid session for an operation that requires one
    #[error("Not authenticated")]
    Unauthenticated,

    /// Session valid but the user/role does not match the target row
    #[error("Not authorized")]
    Unauthorized,

    /// Form validation errors (422 Unprocessable Entity)
    #[error("Validation failed")]
    Validation(ValidationErrors),

    /// Resource not found (404)
    #[error("{resource} not found")]
    NotFound {
        /// The name of the resource that was not found
        resource: &'static str,
    },

    /// Missing route parameter (400)
    #[error("Missing required parameter: {0}")]
    MissingParam(String),

    /// Route parameter could not be parsed to the expected type (400)
    #[error("Invalid parameter '{param}': expected {expected_type}")]
    InvalidParam {
        param: String,
        expected_type: &'static str,
    },

    /// Malformed request body (400)
    #[error("{0}")]
    BadRequest(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(String),

    /// Generic internal server error
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a single-field validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = ValidationErrors::new();
        errors.add(field, message);
        Self::Validation(errors)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn not_found(resource: &'static str) -> Self {
        Self::NotFound { resource }
    }

    pub fn invalid_param(param: impl Into<String>, expected_type: &'static str) -> Self {
        Self::InvalidParam {
            param: param.into(),
            expected_type,
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::EmptyInput => 400,
            Self::ModelUnavailable(_) => 502,
            Self::NoSubtasksExtracted => 422,
            Self::Unauthenticated => 401,
            Self::Unauthorized => 403,
            Self::Validation(_) => 422,
            Self::NotFound { .. } => 404,
            Self::MissingParam(_) => 400,
            Self::InvalidParam { .. } => 400,
            Self::BadRequest(_) => 400,
            Self::Database(_) => 500,
            Self::Internal(_) => 500,
        }
    }
}

impl From<sea_orm::DbErr> for Error {
    fn from(e: sea_orm::DbErr) -> Self {
        Self::Database(e.to_string())
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(e: validator::ValidationErrors) -> Self {
        Self::Validation(ValidationErrors::from_validator(e))
    }
}
