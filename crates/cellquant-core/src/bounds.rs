//! Inclusive integer bounds over the three spatial axes
//!
//! Used by the surrounding-region query to grow a region's extent by a
//! calibrated distance and clip the result to the stack.

use crate::stack::StackShape;

/// Inclusive axis-aligned 3-D bounds in voxel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundsXyz {
    pub x_min: i64,
    pub x_max: i64,
    pub y_min: i64,
    pub y_max: i64,
    pub z_min: i64,
    pub z_max: i64,
}

impl BoundsXyz {
    /// Empty bounds, ready to be grown point by point.
    pub fn empty() -> Self {
        Self {
            x_min: i64::MAX,
            x_max: i64::MIN,
            y_min: i64::MAX,
            y_max: i64::MIN,
            z_min: i64::MAX,
            z_max: i64::MIN,
        }
    }

    /// True when no point has been included yet.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.x_min > self.x_max
    }

    /// Grow the bounds to include a point.
    pub fn include(&mut self, x: usize, y: usize, z: usize) {
        let (x, y, z) = (x as i64, y as i64, z as i64);
        self.x_min = self.x_min.min(x);
        self.x_max = self.x_max.max(x);
        self.y_min = self.y_min.min(y);
        self.y_max = self.y_max.max(y);
        self.z_min = self.z_min.min(z);
        self.z_max = self.z_max.max(z);
    }

    /// Expand each axis outward by the given margins (in voxels).
    pub fn expand(&self, dx: i64, dy: i64, dz: i64) -> Self {
        Self {
            x_min: self.x_min - dx,
            x_max: self.x_max + dx,
            y_min: self.y_min - dy,
            y_max: self.y_max + dy,
            z_min: self.z_min - dz,
            z_max: self.z_max + dz,
        }
    }

    /// Clip to the spatial extents of a stack shape.
    pub fn clip_to(&self, shape: &StackShape) -> Self {
        Self {
            x_min: self.x_min.max(0),
            x_max: self.x_max.min(shape.width as i64 - 1),
            y_min: self.y_min.max(0),
            y_max: self.y_max.min(shape.height as i64 - 1),
            z_min: self.z_min.max(0),
            z_max: self.z_max.min(shape.slices as i64 - 1),
        }
    }

    /// Iterate every (x, y, z) voxel coordinate inside the bounds.
    /// Yields nothing for empty or fully clipped-away bounds.
    pub fn iter_voxels(&self) -> impl Iterator<Item = (usize, usize, usize)> + '_ {
        let b = *self;
        (b.x_min..=b.x_max)
            .flat_map(move |x| (b.y_min..=b.y_max).map(move |y| (x, y)))
            .flat_map(move |(x, y)| (b.z_min..=b.z_max).map(move |z| (x, y, z)))
            .filter(|&(x, y, z)| x >= 0 && y >= 0 && z >= 0)
            .map(|(x, y, z)| (x as usize, y as usize, z as usize))
    }
}

impl Default for BoundsXyz {
    fn default() -> Self {
        Self::empty()
    }
}
