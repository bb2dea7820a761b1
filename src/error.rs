//! Error types for taskboard.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("task text must not be empty")]
    EmptyText,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
