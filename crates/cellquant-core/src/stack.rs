//! Hyperstack - the 5-D voxel container
//!
//! A [`Hyperstack`] stores scalar voxel values over (x, y, z-slice, t-frame,
//! channel). Values are `f64`, matching the source data after segmentation:
//! a mask channel holds 0.0 for background and any positive value for
//! foreground, while the remaining channels carry raw intensities.
//!
//! # Voxel layout
//!
//! Data is a flat buffer ordered so that x varies fastest, then y, then
//! channel, then slice, then frame:
//! `index = ((((t * slices + z) * channels + c) * height + y) * width + x`.
//!
//! # Ownership model
//!
//! `Hyperstack` uses `Arc` for efficient cloning (shared ownership).
//! To modify voxel data, convert to `HyperstackMut` via
//! [`Hyperstack::try_into_mut`] or [`Hyperstack::to_mut`], then convert back
//! with `Into<Hyperstack>`. [`HyperstackMut::snapshot`] produces an
//! explicitly independent immutable copy of the current buffer.

use crate::calibration::Calibration;
use crate::error::{Error, Result};
use std::sync::Arc;

/// Extents of a [`Hyperstack`] along its five axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StackShape {
    /// X extent in voxels
    pub width: usize,
    /// Y extent in voxels
    pub height: usize,
    /// Z extent (number of slices)
    pub slices: usize,
    /// T extent (number of frames)
    pub frames: usize,
    /// Number of channels
    pub channels: usize,
}

impl StackShape {
    /// Create a shape, validating that every extent is at least 1.
    pub fn new(
        width: usize,
        height: usize,
        slices: usize,
        frames: usize,
        channels: usize,
    ) -> Result<Self> {
        if width == 0 || height == 0 || slices == 0 || frames == 0 || channels == 0 {
            return Err(Error::InvalidDimension {
                width,
                height,
                slices,
                frames,
                channels,
            });
        }
        Ok(Self {
            width,
            height,
            slices,
            frames,
            channels,
        })
    }

    /// Single-slice, single-frame shape.
    pub fn plane(width: usize, height: usize, channels: usize) -> Result<Self> {
        Self::new(width, height, 1, 1, channels)
    }

    /// Total number of voxel values across all slices, frames and channels.
    #[inline]
    pub fn len(&self) -> usize {
        self.width * self.height * self.slices * self.frames * self.channels
    }

    /// Always false for a validated shape; present for API symmetry.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True when the stack is a single 2-D plane (one slice, one frame).
    #[inline]
    pub fn is_planar(&self) -> bool {
        self.slices == 1 && self.frames == 1
    }

    /// Check a spatial/temporal/channel coordinate against the extents.
    #[inline]
    pub fn contains(&self, x: usize, y: usize, z: usize, t: usize, c: usize) -> bool {
        x < self.width && y < self.height && z < self.slices && t < self.frames && c < self.channels
    }

    /// Flat buffer index of a coordinate. The coordinate must be in bounds.
    #[inline]
    pub fn index(&self, x: usize, y: usize, z: usize, t: usize, c: usize) -> usize {
        ((((t * self.slices + z) * self.channels + c) * self.height) + y) * self.width + x
    }
}

/// Immutable, cheaply clonable voxel stack.
#[derive(Debug, Clone)]
pub struct Hyperstack {
    shape: StackShape,
    calibration: Calibration,
    values: Arc<Vec<f64>>,
}

impl Hyperstack {
    /// Create a zero-filled stack.
    pub fn new(shape: StackShape) -> Self {
        Self {
            shape,
            calibration: Calibration::default(),
            values: Arc::new(vec![0.0; shape.len()]),
        }
    }

    /// Create a stack from an existing buffer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BufferMismatch`] when the buffer length does not
    /// equal `shape.len()`.
    pub fn from_values(shape: StackShape, values: Vec<f64>) -> Result<Self> {
        if values.len() != shape.len() {
            return Err(Error::BufferMismatch {
                expected: shape.len(),
                actual: values.len(),
            });
        }
        Ok(Self {
            shape,
            calibration: Calibration::default(),
            values: Arc::new(values),
        })
    }

    /// Replace the calibration.
    pub fn with_calibration(mut self, calibration: Calibration) -> Self {
        self.calibration = calibration;
        self
    }

    #[inline]
    pub fn shape(&self) -> StackShape {
        self.shape
    }

    #[inline]
    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    /// Read one voxel value, or `None` when the coordinate is out of bounds.
    #[inline]
    pub fn voxel(&self, x: usize, y: usize, z: usize, t: usize, c: usize) -> Option<f64> {
        if self.shape.contains(x, y, z, t, c) {
            Some(self.values[self.shape.index(x, y, z, t, c)])
        } else {
            None
        }
    }

    /// Read one voxel value without a bounds check.
    #[inline]
    pub fn voxel_unchecked(&self, x: usize, y: usize, z: usize, t: usize, c: usize) -> f64 {
        self.values[self.shape.index(x, y, z, t, c)]
    }

    /// Foreground test on a mask channel: any value above zero.
    #[inline]
    pub fn is_foreground(&self, x: usize, y: usize, z: usize, t: usize, c: usize) -> bool {
        self.voxel(x, y, z, t, c).is_some_and(|v| v > 0.0)
    }

    /// Convert into the mutable form without copying when this is the only
    /// reference, otherwise hand the stack back unchanged.
    pub fn try_into_mut(self) -> std::result::Result<HyperstackMut, Hyperstack> {
        match Arc::try_unwrap(self.values) {
            Ok(values) => Ok(HyperstackMut {
                shape: self.shape,
                calibration: self.calibration,
                values,
            }),
            Err(values) => Err(Hyperstack {
                shape: self.shape,
                calibration: self.calibration,
                values,
            }),
        }
    }

    /// Mutable copy of this stack (always copies the buffer).
    pub fn to_mut(&self) -> HyperstackMut {
        HyperstackMut {
            shape: self.shape,
            calibration: self.calibration.clone(),
            values: self.values.as_ref().clone(),
        }
    }
}

/// Owned, mutable voxel stack.
#[derive(Debug, Clone)]
pub struct HyperstackMut {
    shape: StackShape,
    calibration: Calibration,
    values: Vec<f64>,
}

impl HyperstackMut {
    /// Create a zero-filled mutable stack.
    pub fn new(shape: StackShape) -> Self {
        Self {
            shape,
            calibration: Calibration::default(),
            values: vec![0.0; shape.len()],
        }
    }

    /// Replace the calibration.
    pub fn with_calibration(mut self, calibration: Calibration) -> Self {
        self.calibration = calibration;
        self
    }

    #[inline]
    pub fn shape(&self) -> StackShape {
        self.shape
    }

    #[inline]
    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    /// Read one voxel value, or `None` when the coordinate is out of bounds.
    #[inline]
    pub fn voxel(&self, x: usize, y: usize, z: usize, t: usize, c: usize) -> Option<f64> {
        if self.shape.contains(x, y, z, t, c) {
            Some(self.values[self.shape.index(x, y, z, t, c)])
        } else {
            None
        }
    }

    /// Read one voxel value without a bounds check.
    #[inline]
    pub fn voxel_unchecked(&self, x: usize, y: usize, z: usize, t: usize, c: usize) -> f64 {
        self.values[self.shape.index(x, y, z, t, c)]
    }

    /// Foreground test on a mask channel: any value above zero.
    #[inline]
    pub fn is_foreground(&self, x: usize, y: usize, z: usize, t: usize, c: usize) -> bool {
        self.voxel(x, y, z, t, c).is_some_and(|v| v > 0.0)
    }

    /// Write one voxel value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CoordinateOutOfBounds`] when the coordinate is
    /// outside the stack extents.
    #[inline]
    pub fn set_voxel(
        &mut self,
        x: usize,
        y: usize,
        z: usize,
        t: usize,
        c: usize,
        value: f64,
    ) -> Result<()> {
        if !self.shape.contains(x, y, z, t, c) {
            return Err(Error::CoordinateOutOfBounds { x, y, z, t, c });
        }
        let idx = self.shape.index(x, y, z, t, c);
        self.values[idx] = value;
        Ok(())
    }

    /// Write one voxel value without a bounds check.
    #[inline]
    pub fn set_voxel_unchecked(&mut self, x: usize, y: usize, z: usize, t: usize, c: usize, value: f64) {
        let idx = self.shape.index(x, y, z, t, c);
        self.values[idx] = value;
    }

    /// Explicitly independent immutable copy of the current buffer.
    ///
    /// This is the reference snapshot taken before reconstruction mutates
    /// the working grid; the copy shares nothing with `self`.
    pub fn snapshot(&self) -> Hyperstack {
        Hyperstack {
            shape: self.shape,
            calibration: self.calibration.clone(),
            values: Arc::new(self.values.clone()),
        }
    }
}

impl From<HyperstackMut> for Hyperstack {
    fn from(stack: HyperstackMut) -> Self {
        Hyperstack {
            shape: stack.shape,
            calibration: stack.calibration,
            values: Arc::new(stack.values),
        }
    }
}
