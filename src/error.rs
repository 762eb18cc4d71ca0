// src/error.rs
use thiserror::Error;

/// Raised when the pose detector cannot be brought up. Fatal for the session.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("pose model failed to load: {0}")]
    ModelLoad(String),
    #[error("invalid analyzer configuration: {0}")]
    InvalidConfig(String),
}

/// A single detection call failed.
#[derive(Debug, Error)]
pub enum DetectError {
    #[error("pose estimation failed on frame {frame}: {reason}")]
    Estimation { frame: u64, reason: String },
    #[error("detector has not been initialized")]
    NotInitialized,
    #[error("detector used after dispose")]
    Disposed,
}

/// Anything that prevents a frame's statistics from being computed.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error(transparent)]
    Detect(#[from] DetectError),
    #[error("non-finite coordinate in {0}")]
    NonFiniteCoordinate(&'static str),
    #[error("roster slot {0} out of range")]
    SlotOutOfRange(usize),
}
