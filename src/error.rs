//! Error taxonomy for the request pipeline

use thiserror::Error;

/// Errors raised while turning a request into a response.
///
/// Only `UnsupportedMethod` and `NotFound` become HTTP responses. Everything
/// else aborts the connection without writing anything back.
#[derive(Error, Debug)]
pub enum ServeError {
    #[error("unsupported method: {0}")]
    UnsupportedMethod(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("malformed request line: {0:?}")]
    MalformedRequest(String),

    #[error("script {script} failed: {reason}")]
    ScriptExecution { script: String, reason: String },

    #[error("request is not valid UTF-8")]
    InvalidEncoding(#[from] std::string::FromUtf8Error),

    #[error("connection closed before the request was complete")]
    ConnectionClosed,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ServeError {
    /// Get error code for this error type
    pub fn code(&self) -> &'static str {
        match self {
            ServeError::UnsupportedMethod(_) => "SRV405",
            ServeError::NotFound(_) => "SRV404",
            ServeError::MalformedRequest(_) => "SRV001",
            ServeError::ScriptExecution { .. } => "SRV002",
            ServeError::InvalidEncoding(_) => "SRV003",
            ServeError::ConnectionClosed => "SRV004",
            ServeError::Io(_) => "SRV005",
        }
    }

    /// Whether this error is answered with an HTTP response.
    pub fn is_client_facing(&self) -> bool {
        matches!(
            self,
            ServeError::UnsupportedMethod(_) | ServeError::NotFound(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, ServeError>;
