//! Spatial and temporal calibration of a voxel stack
//!
//! Calibration maps voxel indices to physical units. All statistics in this
//! workspace are computed in voxel units; calibration is applied only at the
//! reporting boundary and inside the explicitly calibrated shape metrics
//! (surface, volume, surrounding distance).

/// Physical calibration of a [`Hyperstack`](crate::Hyperstack).
#[derive(Debug, Clone, PartialEq)]
pub struct Calibration {
    /// Physical width of one voxel
    pub pixel_width: f64,
    /// Physical height of one voxel
    pub pixel_height: f64,
    /// Physical depth of one voxel (slice spacing)
    pub pixel_depth: f64,
    /// Spatial unit, e.g. "µm"
    pub unit: String,
    /// Time between frames
    pub frame_interval: f64,
    /// Temporal unit, e.g. "s"
    pub time_unit: String,
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            pixel_width: 1.0,
            pixel_height: 1.0,
            pixel_depth: 1.0,
            unit: "px".to_string(),
            frame_interval: 0.0,
            time_unit: "frame".to_string(),
        }
    }
}

impl Calibration {
    /// Create an isotropic spatial calibration with the given voxel edge length.
    pub fn isotropic(edge: f64, unit: &str) -> Self {
        Self {
            pixel_width: edge,
            pixel_height: edge,
            pixel_depth: edge,
            unit: unit.to_string(),
            ..Self::default()
        }
    }

    /// Calibrated area of one in-plane pixel.
    #[inline]
    pub fn pixel_area(&self) -> f64 {
        self.pixel_width * self.pixel_height
    }

    /// Calibrated volume of one voxel.
    #[inline]
    pub fn voxel_volume(&self) -> f64 {
        self.pixel_width * self.pixel_height * self.pixel_depth
    }

    /// Mean of pixel width and height. Used wherever an isotropic in-plane
    /// pixel size is assumed (lateral face areas, 2-D distance conversion).
    #[inline]
    pub fn avg_lateral(&self) -> f64 {
        (self.pixel_width + self.pixel_height) / 2.0
    }

    /// True when pixel width and height differ. Surface and outline metrics
    /// are approximate in that case.
    #[inline]
    pub fn is_anisotropic_in_plane(&self) -> bool {
        self.pixel_width != self.pixel_height
    }
}
