//! Error handling for eqsynth
//!
//! Out-of-range filter parameters never reach this module: they degrade to
//! pass-through sections inside the designers. Everything here is a caller
//! contract violation or an I/O failure.

use thiserror::Error;

/// Result type alias for eqsynth operations
pub type Result<T> = std::result::Result<T, EqError>;

/// Main error type for eqsynth operations
#[derive(Error, Debug)]
pub enum EqError {
    // Parameter Errors
    #[error("Invalid sample rate: {sample_rate} Hz (must be positive)")]
    InvalidSampleRate { sample_rate: u32 },

    #[error("Expected {expected} gain values, got {actual}")]
    GainCountMismatch { expected: usize, actual: usize },

    #[error("Unsupported filter type: '{kind}' (expected 'IIR' or 'FIR')")]
    UnsupportedFilterKind { kind: String },

    #[error("Invalid audio buffer: {reason}")]
    InvalidBuffer { reason: String },

    // Store Errors
    #[error("Audio track not found: {id}")]
    TrackNotFound { id: String },

    // File Errors
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Invalid audio file: {reason}")]
    InvalidAudio {
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Unsupported audio format: {format}")]
    UnsupportedFormat { format: String },

    #[error("Audio contains no samples")]
    EmptyAudio,

    // I/O Errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization Errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl EqError {
    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            EqError::InvalidSampleRate { .. } => "INVALID_SAMPLE_RATE",
            EqError::GainCountMismatch { .. } => "GAIN_COUNT_MISMATCH",
            EqError::UnsupportedFilterKind { .. } => "UNSUPPORTED_FILTER_KIND",
            EqError::InvalidBuffer { .. } => "INVALID_BUFFER",
            EqError::TrackNotFound { .. } => "TRACK_NOT_FOUND",
            EqError::FileNotFound { .. } => "FILE_NOT_FOUND",
            EqError::InvalidAudio { .. } => "INVALID_AUDIO",
            EqError::UnsupportedFormat { .. } => "UNSUPPORTED_FORMAT",
            EqError::EmptyAudio => "EMPTY_AUDIO",
            EqError::Io(_) => "IO_ERROR",
            EqError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Whether the caller caused this error (bad request rather than a
    /// failure on our side). A service layer maps these to 4xx responses.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, EqError::Io(_) | EqError::Serialization(_))
    }

    /// Build an `InvalidAudio` error from a codec failure
    pub(crate) fn invalid_audio<E>(reason: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        EqError::InvalidAudio {
            reason: reason.into(),
            source: Some(Box::new(source)),
        }
    }
}
