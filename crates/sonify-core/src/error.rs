//! Error types for depth sonification

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SonifyError {
    #[error("Audio output unavailable: {0}")]
    AudioUnavailable(String),

    #[error("No render surface: {0}")]
    SurfaceUnavailable(String),

    #[error("GPU resource error: {0}")]
    GpuResource(String),

    #[error("Unknown camera preset: {0}")]
    InvalidPreset(u8),

    #[error("Unknown sonify mode: {0}")]
    InvalidMode(u8),
}

pub type Result<T> = std::result::Result<T, SonifyError>;
