//! Error types for Synheart Corpus

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while building a dataset
#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("Missing file: {}", .0.display())]
    MissingFile(PathBuf),

    #[error("Malformed recording: {0}")]
    MalformedRecord(String),

    #[error("No usable channels: {0}")]
    NoUsableChannels(String),

    #[error("Dimension mismatch: {0}")]
    DimensionMismatch(String),

    #[error("Resampling error: {0}")]
    ResampleError(String),

    #[error("Questionnaire error: {0}")]
    QuestionnaireError(String),

    #[error("Audio analysis error: {0}")]
    AudioError(String),

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}
