//! Error types for the Gait Lab pipeline.

use thiserror::Error;

use crate::types::EventId;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Insufficient data: need {required} samples, have {available}")]
    InsufficientData { required: usize, available: usize },

    #[error("Insufficient events: need {required} active events, have {available}")]
    InsufficientEvents { required: usize, available: usize },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Unknown event: {0:?}")]
    UnknownEvent(EventId),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<config::ConfigError> for Error {
    fn from(e: config::ConfigError) -> Self {
        Error::Config(e.to_string())
    }
}
