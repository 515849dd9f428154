// AdMatch error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AdMatchError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Missing mandatory column: {0}")]
    MissingColumn(&'static str),

    #[error("Manifest error: {0}")]
    Manifest(String),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("{0}")]
    Other(String),
}

impl From<anyhow::Error> for AdMatchError {
    fn from(err: anyhow::Error) -> Self {
        AdMatchError::Other(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AdMatchError>;
