//! Error types for the fallible edges of termblocks (record loading, CLI specs, config)

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TermblocksError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse records JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Record at index {index} is not a JSON object")]
    RecordNotObject { index: usize },

    #[error("Records document must be an array of objects or an object with a \"records\" array")]
    RecordsNotArray,

    #[error("Invalid column spec '{0}', expected key or key:Header")]
    InvalidColumnSpec(String),

    #[error("Invalid sort spec '{0}', expected key, key:asc or key:desc")]
    InvalidSortSpec(String),

    #[error("Unknown story '{0}'. Run 'termblocks list' to see available stories")]
    UnknownStory(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<anyhow::Error> for TermblocksError {
    fn from(err: anyhow::Error) -> Self {
        TermblocksError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TermblocksError>;
