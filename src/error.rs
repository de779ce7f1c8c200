//! Error types
//!
//! `BehaviorError` covers option validation before a handler exists,
//! `ServerError` everything that can stop the server from starting.

use thiserror::Error;

/// Rejected behavior option
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BehaviorError {
    #[error("content length must not be negative, got {0}")]
    InvalidContentLength(i64),
    #[error("invalid HTTP method: {0:?}")]
    InvalidMethod(String),
    #[error("invalid header name: {0:?}")]
    InvalidHeaderName(String),
    #[error("invalid attachment filename: {0:?}")]
    InvalidFilename(String),
    #[error("timestamp out of range: {0}")]
    InvalidTimestamp(i64),
}

/// Startup and serving errors
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("configuration error: {0}")]
    Config(#[from] ::config::ConfigError),
    #[error("invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid behavior: {0}")]
    Behavior(#[from] BehaviorError),
    #[error("invalid address: {0}")]
    Address(String),
    #[error("logger initialisation failed: {0}")]
    Logger(String),
}

pub type Result<T> = std::result::Result<T, ServerError>;
