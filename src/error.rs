//! Typed errors for the audio-to-notes pipeline.

use thiserror::Error;

/// Errors produced by the processing pipeline and its operations.
///
/// During a full processing run these are caught at stage boundaries and
/// recorded on the session (`status = error` + `error_message`); only
/// `resummarize`/`delete` surface them directly to the caller.
#[derive(Error, Debug)]
pub enum PipelineError {
    // Upload stage
    #[error("Unsupported audio format: .{extension}")]
    UnsupportedFormat { extension: String },

    #[error("File too large ({size_mb:.1}MB). Max allowed: {limit_mb}MB")]
    FileTooLarge { size_mb: f64, limit_mb: u64 },

    // Transcription stage
    #[error("Transcription failed: {message}")]
    Transcription { message: String },

    // Summarization stage
    #[error("Summarization failed: {message}")]
    Summarization { message: String },

    // Resummarize / delete
    #[error("Session not found: {id}")]
    NotFound { id: String },

    #[error("{message}")]
    InvalidState { message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
