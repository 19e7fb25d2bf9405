//! VoxelPoint - one foreground voxel of a reconstructed region
//!
//! A point is probed once, against the immutable reference snapshot, when
//! reconstruction first visits its voxel. It carries everything later
//! stages need - coordinates, a per-channel intensity snapshot, and the
//! face-exposure counters used for surface estimation - so quantification
//! never has to re-read a grid that flood fill has since zeroed.

use cellquant_core::{Calibration, Hyperstack};

/// One foreground voxel with its intensity snapshot and face exposure.
#[derive(Debug, Clone)]
pub struct VoxelPoint {
    pub x: usize,
    pub y: usize,
    pub z: usize,
    pub t: usize,
    /// Background neighbors along ±z (0..=2). Each exposed face has the
    /// in-plane pixel area.
    pub axial_faces: u8,
    /// Background neighbors along ±x and ±y (0..=4). Each exposed face has
    /// area avg(pixel width, height) × pixel depth.
    pub lateral_faces: u8,
    /// Intensity of this voxel in every channel, read from the reference
    /// snapshot at construction.
    intensities: Box<[f64]>,
}

impl VoxelPoint {
    /// Probe a voxel of the reference snapshot.
    ///
    /// Face exposure is evaluated on `mask_channel` (0-based) of the
    /// reference: a neighbor is exposed when its mask value is exactly 0.0.
    /// Neighbors outside the stack do not count as exposed. The coordinate
    /// itself must be in bounds.
    pub fn probe(
        x: usize,
        y: usize,
        z: usize,
        t: usize,
        reference: &Hyperstack,
        mask_channel: usize,
    ) -> Self {
        let shape = reference.shape();
        let background =
            |px: usize, py: usize, pz: usize| reference.voxel_unchecked(px, py, pz, t, mask_channel) == 0.0;

        let mut axial_faces = 0;
        if z > 0 && background(x, y, z - 1) {
            axial_faces += 1;
        }
        if z < shape.slices - 1 && background(x, y, z + 1) {
            axial_faces += 1;
        }

        let mut lateral_faces = 0;
        if x > 0 && background(x - 1, y, z) {
            lateral_faces += 1;
        }
        if x < shape.width - 1 && background(x + 1, y, z) {
            lateral_faces += 1;
        }
        if y > 0 && background(x, y - 1, z) {
            lateral_faces += 1;
        }
        if y < shape.height - 1 && background(x, y + 1, z) {
            lateral_faces += 1;
        }

        let intensities = (0..shape.channels)
            .map(|c| reference.voxel_unchecked(x, y, z, t, c))
            .collect();

        Self {
            x,
            y,
            z,
            t,
            axial_faces,
            lateral_faces,
            intensities,
        }
    }

    /// Snapshotted intensity in the given 0-based channel.
    #[inline]
    pub fn intensity(&self, channel: usize) -> f64 {
        self.intensities[channel]
    }

    /// Number of channels in the snapshot.
    #[inline]
    pub fn channels(&self) -> usize {
        self.intensities.len()
    }

    /// True when at least one face is exposed to background, i.e. the point
    /// lies on the region boundary.
    #[inline]
    pub fn is_exposed(&self) -> bool {
        self.axial_faces > 0 || self.lateral_faces > 0
    }

    /// Calibrated surface area contributed by this voxel's exposed faces.
    #[inline]
    pub fn surface_contribution(&self, cal: &Calibration) -> f64 {
        cal.pixel_area() * f64::from(self.axial_faces)
            + cal.avg_lateral() * cal.pixel_depth * f64::from(self.lateral_faces)
    }
}
