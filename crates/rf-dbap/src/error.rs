//! Error types for speaker layouts and panning

use thiserror::Error;

use crate::layout::LayoutKind;

/// Spatial audio error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SpatialError {
    /// Layout name not recognized
    #[error("Unknown speaker layout: {0}")]
    UnknownLayout(String),

    /// Channel count does not match the layout kind
    #[error("Invalid channel count for {kind} layout: expected {expected}, got {got}")]
    InvalidChannelCount {
        kind: LayoutKind,
        expected: usize,
        got: usize,
    },

    /// Decay must be a finite dB value
    #[error("Invalid decay: {0} dB")]
    InvalidDecay(f32),

    /// Buffer size mismatch
    #[error("Buffer size mismatch: expected {expected}, got {got}")]
    BufferSizeMismatch { expected: usize, got: usize },

    /// Malformed configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for spatial operations
pub type SpatialResult<T> = Result<T, SpatialError>;
