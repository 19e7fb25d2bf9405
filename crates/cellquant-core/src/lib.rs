//! cellquant-core - Basic data structures for cell quantification
//!
//! This crate provides the fundamental data structures used throughout
//! the cellquant library:
//!
//! - [`Hyperstack`] / [`HyperstackMut`] - The 5-D voxel container
//!   (immutable / mutable)
//! - [`StackShape`] - Stack extents and index arithmetic
//! - [`Calibration`] - Physical voxel sizes and units
//! - [`Samples`] - Float sample buffer with the guarded statistics family
//! - [`BoundsXyz`] - Inclusive spatial bounds
//!
//! The mask convention is shared by every consumer: on a mask channel,
//! 0.0 is background and any positive value is foreground.

pub mod bounds;
pub mod calibration;
pub mod error;
pub mod samples;
pub mod stack;

pub use bounds::BoundsXyz;
pub use calibration::Calibration;
pub use error::{Error, Result};
pub use samples::Samples;
pub use stack::{Hyperstack, HyperstackMut, StackShape};
