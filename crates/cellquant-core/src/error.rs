//! Error types for cellquant-core
//!
//! Provides a unified error type for all operations in the core crate.
//! Each variant captures enough context for diagnostics without exposing
//! internal implementation details.

use thiserror::Error;

/// cellquant core error type
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid stack dimensions (every extent must be at least 1)
    #[error("invalid stack dimensions: {width}x{height}x{slices}, {frames} frame(s), {channels} channel(s)")]
    InvalidDimension {
        width: usize,
        height: usize,
        slices: usize,
        frames: usize,
        channels: usize,
    },

    /// Voxel coordinate outside the stack extents
    #[error("coordinate out of bounds: ({x}, {y}, {z}) at frame {t}, channel {c}")]
    CoordinateOutOfBounds {
        x: usize,
        y: usize,
        z: usize,
        t: usize,
        c: usize,
    },

    /// Channel index outside 1..=channels
    #[error("invalid channel: {channel} (stack has {channels} channel(s), expected 1..={channels})")]
    InvalidChannel { channel: usize, channels: usize },

    /// Buffer length does not match the stack shape
    #[error("buffer length mismatch: expected {expected} values, got {actual}")]
    BufferMismatch { expected: usize, actual: usize },

    /// Invalid parameter value
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Result type alias for cellquant-core operations
pub type Result<T> = std::result::Result<T, Error>;
