// FILE: crates/media-engine/src/error.rs

use thiserror::Error;
use vinylcast_core::AppError;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Episode index {index} is out of range (catalog has {len} episodes)")]
    InvalidIndex { index: usize, len: usize },

    #[error("Decode error: {0}")]
    DecodeError(String),

    #[error("Output error: {0}")]
    OutputError(String),

    #[error("Seek error: {0}")]
    SeekError(String),

    #[error("Unsupported source: {0}")]
    UnsupportedSource(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type EngineResult<T> = Result<T, EngineError>;

impl From<EngineError> for AppError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::InvalidIndex { index, len } => AppError::InvalidInput {
                field: "episode index".to_string(),
                reason: format!("{} is outside 0..{}", index, len),
            },
            EngineError::DecodeError(detail) | EngineError::UnsupportedSource(detail) => {
                AppError::LoadError {
                    source_url: String::new(),
                    detail,
                }
            }
            EngineError::OutputError(detail) | EngineError::SeekError(detail) => {
                AppError::PlayError { detail }
            }
            EngineError::InvalidState(message) => AppError::InternalError { message },
            EngineError::IoError(e) => AppError::from(e),
        }
    }
}
