//! Error types shared across Reelcap crates.

/// Top-level error type for Reelcap operations.
///
/// Only unrecoverable conditions live here. Per-group anomalies that the
/// pipeline recovers from locally are reported separately and never abort
/// a caption run.
#[derive(Debug, thiserror::Error)]
pub enum ReelcapError {
    #[error("Invalid video dimensions: {width}x{height}")]
    InvalidDimensions { width: i64, height: i64 },

    #[error("Font unavailable: {reason}")]
    FontUnavailable { reason: String },

    #[error("Aspect ratio rejected: {width}x{height} (ratio {ratio:.4})")]
    AspectRejected { width: u32, height: u32, ratio: f64 },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Caption run cancelled")]
    Cancelled,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using ReelcapError.
pub type ReelcapResult<T> = Result<T, ReelcapError>;

impl ReelcapError {
    pub fn invalid_dimensions(width: impl Into<i64>, height: impl Into<i64>) -> Self {
        Self::InvalidDimensions {
            width: width.into(),
            height: height.into(),
        }
    }

    pub fn font_unavailable(reason: impl Into<String>) -> Self {
        Self::FontUnavailable {
            reason: reason.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Whether this error aborts the whole run rather than a single step.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::Cancelled)
    }
}
