//! Error types
//!
//! Only startup and configuration can fail. A dropped sensor frame is not an
//! error: the predictor simply holds its last position.

use thiserror::Error;

/// Hand sensor could not be brought up
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SensorError {
    #[error("camera device not available: {0}")]
    DeviceUnavailable(String),
}

/// Round could not start
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StartupError {
    #[error("hand sensor unavailable: {0}")]
    SensorUnavailable(#[from] SensorError),

    #[error("loading sequence has not finished")]
    StillLoading,

    #[error("round can only start from the loading phase")]
    NotLoading,
}

/// Collision mask built from bad bitmap data
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MaskError {
    #[error("alpha buffer holds {actual} bytes, expected {expected} for {width}x{height}")]
    SizeMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    #[error("mask dimensions must be non-zero, got {0}x{1}")]
    Empty(u32, u32),
}

/// Tuning file could not be used
#[derive(Error, Debug)]
pub enum TuningError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid tuning value `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Gamertag rejected by the entry screen rules
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GamertagError {
    #[error("please enter a gamertag to continue")]
    Empty,

    #[error("max {max} characters allowed")]
    TooLong { max: usize },
}
