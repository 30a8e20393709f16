use miette::{Diagnostic, Result};
use thiserror::Error;

/// Main error type for the crate
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("Invalid argument: {0}")]
    #[diagnostic(code(calnav::invalid_argument))]
    InvalidArgument(String),

    #[error("Not found: {0}")]
    #[diagnostic(code(calnav::not_found))]
    NotFound(String),

    #[error("Out of range: {0}")]
    #[diagnostic(code(calnav::out_of_range))]
    OutOfRange(String),

    #[error("Google Calendar API unavailable: {0}")]
    #[diagnostic(code(calnav::remote_unavailable))]
    RemoteUnavailable(String),

    #[error("Environment error: {0}")]
    #[diagnostic(code(calnav::environment))]
    Environment(String),

    #[error("Configuration error: {0}")]
    #[diagnostic(code(calnav::config))]
    Config(String),

    #[error(transparent)]
    #[diagnostic(code(calnav::io))]
    Io(#[from] std::io::Error),

    #[error("Other error: {0}")]
    #[diagnostic(code(calnav::other))]
    Other(String),
}

// Transport failures are reported as the remote being unavailable
impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::RemoteUnavailable(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

/// Type alias for Result with our Error type
pub type CalendarResult<T> = Result<T, Error>;

/// Helper to create invalid argument errors
pub fn invalid_argument(message: &str) -> Error {
    Error::InvalidArgument(message.to_string())
}

/// Helper to create not found errors
pub fn not_found(message: &str) -> Error {
    Error::NotFound(message.to_string())
}

/// Helper to create out of range errors
pub fn out_of_range(message: &str) -> Error {
    Error::OutOfRange(message.to_string())
}

/// Helper to create remote service errors
pub fn remote_error(message: &str) -> Error {
    Error::RemoteUnavailable(message.to_string())
}

/// Helper to create environment errors
pub fn env_error(var: &str) -> Error {
    Error::Environment(format!("Missing environment variable: {}", var))
}

/// Helper to create configuration errors
pub fn config_error(message: &str) -> Error {
    Error::Config(message.to_string())
}

/// Helper to create other errors
pub fn other_error(message: &str) -> Error {
    Error::Other(message.to_string())
}
