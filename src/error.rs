//! Unified error types for Oxide-Steps

use thiserror::Error;

/// Unified Result type
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for Oxide-Steps
///
/// Every variant is fatal for the step that raised it; nothing at this layer
/// retries.
#[derive(Error, Debug)]
pub enum Error {
    /// Page or element key missing from the page-object table
    #[error("Page object not found: {0}")]
    NotFound(String),

    /// Readiness wait or step limit exceeded its budget
    #[error("Operation timeout: {0}")]
    Timeout(String),

    /// Assertion failed; the message embeds actual and expected values
    #[error("{0}")]
    Mismatch(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Sentence matched no registered step
    #[error("Undefined step: {0}")]
    UndefinedStep(String),

    /// A captured argument cannot be used
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// WebSocket errors
    #[error("WebSocket error: {0}")]
    WebSocket(String),

    /// CDP protocol errors
    #[error("CDP error: {0}")]
    Cdp(String),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Script execution failed
    #[error("Script execution failed: {0}")]
    ScriptExecutionFailed(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a new page-object not found error for `page.element`
    pub fn not_found<P: AsRef<str>, E: AsRef<str>>(page: P, element: E) -> Self {
        Error::NotFound(format!("{}.{}", page.as_ref(), element.as_ref()))
    }

    /// Create a new timeout error
    pub fn timeout<S: Into<String>>(msg: S) -> Self {
        Error::Timeout(msg.into())
    }

    /// Create a new mismatch error of the form `<actual> <relation> <expected>`
    pub fn mismatch(actual: &str, relation: &str, expected: &str) -> Self {
        Error::Mismatch(format!("{} {} {}", actual, relation, expected))
    }

    /// Create a new undefined step error
    pub fn undefined_step<S: Into<String>>(sentence: S) -> Self {
        Error::UndefinedStep(sentence.into())
    }

    /// Create a new invalid argument error
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        Error::InvalidArgument(msg.into())
    }

    /// Create a new WebSocket error
    pub fn websocket<S: Into<String>>(msg: S) -> Self {
        Error::WebSocket(msg.into())
    }

    /// Create a new CDP error
    pub fn cdp<S: Into<String>>(msg: S) -> Self {
        Error::Cdp(msg.into())
    }

    /// Create a new script execution failed error
    pub fn script_execution_failed<S: Into<String>>(msg: S) -> Self {
        Error::ScriptExecutionFailed(msg.into())
    }

    /// Create a new configuration error
    pub fn configuration<S: Into<String>>(msg: S) -> Self {
        Error::Configuration(msg.into())
    }

    /// Create a new internal error
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        Error::Internal(msg.into())
    }

    /// Whether the error is an assertion mismatch
    pub fn is_mismatch(&self) -> bool {
        matches!(self, Error::Mismatch(_))
    }

    /// Whether the error is a readiness timeout
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Timeout(_))
    }
}
