//! Error types for cellquant-metrics

use thiserror::Error;

/// Errors that can occur during quantification
#[derive(Debug, Error)]
pub enum MetricsError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] cellquant_core::Error),

    /// Reconstruction error
    #[error("region error: {0}")]
    Region(#[from] cellquant_region::RegionError),

    /// Channel index outside 1..=channels
    #[error("invalid channel: {channel} (stack has {channels} channel(s))")]
    InvalidChannel { channel: usize, channels: usize },

    /// Surrounding reference distance must be positive and finite
    #[error("invalid reference distance: {0}")]
    InvalidReferenceDistance(f64),

    /// Cancellation was requested through the progress sink
    #[error("cancelled between regions")]
    Cancelled,
}

/// Result type for quantification operations
pub type MetricsResult<T> = Result<T, MetricsError>;
