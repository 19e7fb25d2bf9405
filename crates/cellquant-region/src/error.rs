//! Error types for cellquant-region

use thiserror::Error;

/// Errors that can occur during region reconstruction
#[derive(Debug, Error)]
pub enum RegionError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] cellquant_core::Error),

    /// Channel index outside 1..=channels
    #[error("invalid channel: {channel} (stack has {channels} channel(s))")]
    InvalidChannel { channel: usize, channels: usize },

    /// Requested mode does not support the stack geometry
    #[error("unsupported geometry: {0}")]
    UnsupportedGeometry(String),

    /// Cancellation was requested through the progress sink
    #[error("cancelled between regions")]
    Cancelled,
}

/// Result type for region operations
pub type RegionResult<T> = Result<T, RegionError>;
