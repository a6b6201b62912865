//! Error types and HTTP response conversion

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias using the crate error
pub type Result<T> = std::result::Result<T, Error>;

/// Failure reported by a [`TemplateEngine`](crate::engine::TemplateEngine)
#[derive(Debug, Error)]
pub enum TemplateError {
    /// No template is registered under the requested name
    #[error("Template not found: {0}")]
    NotFound(String),

    /// The template source could not be parsed
    #[error("Template `{name}` has a syntax error: {message}")]
    Syntax {
        /// Template name
        name: String,
        /// Engine-provided description
        message: String,
    },

    /// The template was found but failed while executing
    #[error("Template `{name}` failed to execute: {message}")]
    Execution {
        /// Template name
        name: String,
        /// Engine-provided description
        message: String,
    },

    /// The output sink rejected a write
    #[error("Template output could not be written: {0}")]
    Write(#[source] std::io::Error),
}

impl TemplateError {
    /// Whether the failure came from the output sink rather than the template itself
    pub fn is_write_failure(&self) -> bool {
        matches!(self, TemplateError::Write(_))
    }
}

/// Main error type for the crate
///
/// Large error variants are boxed to reduce stack size
#[derive(Debug, Error)]
pub enum Error {
    /// Settings could not be loaded
    #[error("Configuration error: {0}")]
    Config(Box<figment::Error>),

    /// Renderer configuration was rejected at construction
    #[error("Invalid renderer configuration: {0}")]
    InvalidConfig(String),

    /// A named template failed and the error policy asked for propagation
    #[error("Rendering `{name}` failed: {source}")]
    Template {
        /// Name of the failing template
        name: String,
        /// Underlying engine failure
        #[source]
        source: TemplateError,
    },

    /// The response body sink failed
    #[error("Response write failed: {0}")]
    Write(#[source] std::io::Error),

    /// A model could not be built from the supplied data
    #[error("Model error: {0}")]
    Model(String),

    /// Serializing data into a model failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Error::Config(Box::new(err))
    }
}

/// Error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,

    /// Optional error code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    /// HTTP status code
    pub status: u16,
}

impl ErrorResponse {
    /// Create error response with a code
    pub fn with_code(
        status: StatusCode,
        code: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            error: error.into(),
            code: Some(code.into()),
            status: status.as_u16(),
        }
    }
}

impl Error {
    fn code(&self) -> &'static str {
        match self {
            Error::Config(_) | Error::InvalidConfig(_) => "CONFIG_ERROR",
            Error::Template { .. } => "TEMPLATE_ERROR",
            Error::Write(_) => "WRITE_ERROR",
            Error::Model(_) | Error::Serialization(_) => "MODEL_ERROR",
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = StatusCode::INTERNAL_SERVER_ERROR;

        match &self {
            Error::Template { name, source } => {
                tracing::error!(template = %name, error = %source, "Template rendering error");
            }
            other => tracing::error!(code = other.code(), "{}", other),
        }

        // Engine messages can quote template source; keep them out of the body.
        let message = match &self {
            Error::Template { .. } => "Template rendering failed".to_string(),
            Error::Write(_) => "Response could not be written".to_string(),
            other => other.to_string(),
        };

        let body = ErrorResponse::with_code(status, self.code(), message);
        (status, Json(body)).into_response()
    }
}
