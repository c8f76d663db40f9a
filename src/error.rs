//! Unified chart error types.
//!
//! Most of the rendering pipeline degrades softly (empty geometry, empty
//! readout). These errors cover structural misuse and unparseable input.

use thiserror::Error;

/// Top-level chart error.
#[derive(Error, Debug)]
pub enum ChartError {
    #[error("Path parse error at byte {position}: {reason}")]
    PathParse { position: usize, reason: String },

    #[error("Interpolation error: {0}")]
    Interpolation(#[from] InterpolationError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Errors raised while preparing sample-based interpolation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InterpolationError {
    #[error("x and y sample lengths differ (xs={xs}, ys={ys})")]
    LengthMismatch { xs: usize, ys: usize },

    #[error("Need at least {needed} samples, got {got}")]
    InsufficientSamples { needed: usize, got: usize },

    #[error("Sample x values must be strictly increasing (index {index})")]
    NotIncreasing { index: usize },

    #[error("Non-finite sample at index {index}")]
    NonFinite { index: usize },
}

impl ChartError {
    pub(crate) fn parse(position: usize, reason: impl Into<String>) -> Self {
        ChartError::PathParse {
            position,
            reason: reason.into(),
        }
    }
}
