// src/partition/error.rs
use crate::math::error::MathError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PartitionError {
    #[error("Invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("Partitioning cancelled after {processed} of {total} points")]
    Cancelled { processed: usize, total: usize },

    #[error("Deadline exceeded after {processed} of {total} points")]
    DeadlineExceeded { processed: usize, total: usize },

    #[error("Failed to build worker pool: {message}")]
    ThreadPool { message: String },

    #[error(transparent)]
    Math(#[from] MathError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type PartitionResult<T> = Result<T, PartitionError>;
