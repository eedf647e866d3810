//! Error types for the SL Mail skill Lambda.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while handling a skill turn.
///
/// User-level outcomes (wrong password, wrong invocation order, missing
/// access token) are not represented here: they end the turn with a spoken
/// message instead of failing it. Every variant below aborts the invocation.
#[derive(Error, Debug)]
pub enum Error {
    /// Mail API transport or parse failure
    #[error("Mail provider error: {0}")]
    Provider(String),

    /// Credential store transport failure
    #[error("Credential store error: {0}")]
    Store(String),

    /// Malformed or unrecognized platform event
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Password hashing or verification infrastructure failure
    #[error("Password error: {0}")]
    Password(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
