use miette::{Diagnostic, Result};
use thiserror::Error;

/// Main error type for the application
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("Malformed input: {0}")]
    #[diagnostic(
        code(kalenterivahti::malformed_input),
        help("Expected a JSON object with string fields description, created_date, event_name, invitee_email and event_id")
    )]
    MalformedInput(String),

    #[error("Classification failed: {0}")]
    #[diagnostic(code(kalenterivahti::classification))]
    Classification(String),

    #[error("Environment error: {0}")]
    #[diagnostic(code(kalenterivahti::environment))]
    Environment(String),

    #[error("Configuration error: {0}")]
    #[diagnostic(code(kalenterivahti::config))]
    Config(String),

    #[error("Component error: {0}")]
    #[diagnostic(code(kalenterivahti::component))]
    Component(String),

    #[error(transparent)]
    #[diagnostic(code(kalenterivahti::io))]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    #[diagnostic(code(kalenterivahti::serialization))]
    Serialization(String),

    #[error("Other error: {0}")]
    #[diagnostic(code(kalenterivahti::other))]
    Other(String),
}

// Implement From for TOML deserialization errors
impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

/// Type alias for Result with our Error type
pub type VahtiResult<T> = Result<T, Error>;

/// Helper to create environment errors
pub fn env_error(var: &str) -> Error {
    Error::Environment(format!("Missing environment variable: {}", var))
}

/// Helper to create configuration errors
pub fn config_error(message: &str) -> Error {
    Error::Config(message.to_string())
}

/// Helper to create component errors
pub fn component_error(message: &str) -> Error {
    Error::Component(message.to_string())
}

/// Helper to create malformed input errors
pub fn malformed_input(message: &str) -> Error {
    Error::MalformedInput(message.to_string())
}

/// Helper to create classification errors
pub fn classification_error(message: &str) -> Error {
    Error::Classification(message.to_string())
}
