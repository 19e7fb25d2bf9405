//! CellRegion - one quantified object
//!
//! A [`CellRegion`] is built once from a reconstructed point set and the
//! reference snapshot, fully computed in [`CellRegion::quantify`], and
//! read-only afterwards. Every derived quantity is stored per frame; a
//! frame the region never touches gets a zero voxel count and NaN
//! statistics rather than an error, so reporting can still emit a row.

use crate::error::{MetricsError, MetricsResult};
use crate::stats::ChannelStats;
use crate::surround::{SurroundingConfig, SurroundingMetrics, compute_surrounding};
use cellquant_core::{Calibration, Hyperstack, Samples};
use cellquant_region::{Outline, TracedRegion, VoxelPoint};
use std::f64::consts::PI;

/// One reconstructed object with its per-frame morphometry and intensity
/// statistics.
#[derive(Debug, Clone)]
pub struct CellRegion {
    points: Vec<VoxelPoint>,
    outline: Option<Outline>,
    slices: usize,
    frames: usize,
    channels: usize,
    voxel_count: Vec<usize>,
    /// Centroid in voxel units, `[x, y, z]` per frame; NaN on empty frames
    centroid: Vec<[f64; 3]>,
    axial_faces: Vec<u64>,
    lateral_faces: Vec<u64>,
    /// Indexed `[frame][channel]`
    channel_stats: Vec<Vec<ChannelStats>>,
    surrounding: Option<SurroundingMetrics>,
}

impl CellRegion {
    /// Quantify a reconstructed region against the reference snapshot.
    ///
    /// `mask_channel` is the 1-based channel the region was reconstructed
    /// from; it controls only which channel the surrounding statistics
    /// skip - the region's own statistics cover every channel. Pass a
    /// [`SurroundingConfig`] to add surrounding-region quantification.
    ///
    /// # Errors
    ///
    /// [`MetricsError::InvalidChannel`] for a mask channel outside
    /// `1..=channels`.
    pub fn quantify(
        region: TracedRegion,
        reference: &Hyperstack,
        mask_channel: usize,
        surrounding: Option<&SurroundingConfig>,
    ) -> MetricsResult<Self> {
        let shape = reference.shape();
        if mask_channel < 1 || mask_channel > shape.channels {
            return Err(MetricsError::InvalidChannel {
                channel: mask_channel,
                channels: shape.channels,
            });
        }
        let mask0 = mask_channel - 1;
        let TracedRegion { points, outline } = region;

        let frames = shape.frames;
        let channels = shape.channels;
        let mut voxel_count = vec![0usize; frames];
        let mut centroid_sum = vec![[0.0f64; 3]; frames];
        let mut axial_faces = vec![0u64; frames];
        let mut lateral_faces = vec![0u64; frames];
        let mut samples: Vec<Vec<Samples>> =
            vec![(0..channels).map(|_| Samples::new()).collect(); frames];

        for p in &points {
            voxel_count[p.t] += 1;
            centroid_sum[p.t][0] += p.x as f64;
            centroid_sum[p.t][1] += p.y as f64;
            centroid_sum[p.t][2] += p.z as f64;
            axial_faces[p.t] += u64::from(p.axial_faces);
            lateral_faces[p.t] += u64::from(p.lateral_faces);
            for c in 0..channels {
                samples[p.t][c].push(p.intensity(c));
            }
        }

        let centroid = voxel_count
            .iter()
            .zip(&centroid_sum)
            .map(|(&count, sum)| {
                if count == 0 {
                    [f64::NAN; 3]
                } else {
                    [
                        sum[0] / count as f64,
                        sum[1] / count as f64,
                        sum[2] / count as f64,
                    ]
                }
            })
            .collect();

        let channel_stats = samples
            .iter()
            .map(|frame| frame.iter().map(ChannelStats::from_samples).collect())
            .collect();

        let surrounding =
            surrounding.map(|config| compute_surrounding(&points, reference, mask0, config));

        Ok(Self {
            points,
            outline,
            slices: shape.slices,
            frames,
            channels,
            voxel_count,
            centroid,
            axial_faces,
            lateral_faces,
            channel_stats,
            surrounding,
        })
    }

    /// The region's points in discovery order.
    #[inline]
    pub fn points(&self) -> &[VoxelPoint] {
        &self.points
    }

    /// The traced outline, present on the 2-D path.
    #[inline]
    pub fn outline(&self) -> Option<&Outline> {
        self.outline.as_ref()
    }

    #[inline]
    pub fn frames(&self) -> usize {
        self.frames
    }

    #[inline]
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// True when the source stack had a single slice: volume, surface and
    /// asphericity then report area, outline length and the 2-D index.
    #[inline]
    pub fn is_planar(&self) -> bool {
        self.slices == 1
    }

    /// Voxels in the given frame.
    #[inline]
    pub fn voxel_count(&self, frame: usize) -> usize {
        self.voxel_count[frame]
    }

    /// Centroid `[x, y, z]` in voxel units; NaN when the frame is empty.
    #[inline]
    pub fn centroid(&self, frame: usize) -> [f64; 3] {
        self.centroid[frame]
    }

    /// Summed exposed z-faces of the frame's points.
    #[inline]
    pub fn axial_faces(&self, frame: usize) -> u64 {
        self.axial_faces[frame]
    }

    /// Summed exposed x/y-faces of the frame's points.
    #[inline]
    pub fn lateral_faces(&self, frame: usize) -> u64 {
        self.lateral_faces[frame]
    }

    /// Intensity statistics of one frame and 0-based channel.
    #[inline]
    pub fn channel_stats(&self, frame: usize, channel: usize) -> &ChannelStats {
        &self.channel_stats[frame][channel]
    }

    /// Surrounding-region statistics, when quantified.
    #[inline]
    pub fn surrounding(&self) -> Option<&SurroundingMetrics> {
        self.surrounding.as_ref()
    }

    /// Calibrated volume (3-D) or area (2-D) of the frame's points.
    pub fn volume(&self, cal: &Calibration, frame: usize) -> f64 {
        let count = self.voxel_count[frame] as f64;
        if self.is_planar() {
            count * cal.pixel_area()
        } else {
            count * cal.voxel_volume()
        }
    }

    /// Calibrated surface area (3-D) or outline length (2-D), from the
    /// summed face-exposure counters:
    /// `pixel area × axial faces + avg in-plane size × depth × lateral
    /// faces`, with depth 1 on planar stacks. NaN on empty frames.
    pub fn surface(&self, cal: &Calibration, frame: usize) -> f64 {
        if self.voxel_count[frame] == 0 {
            return f64::NAN;
        }
        let depth = if self.is_planar() { 1.0 } else { cal.pixel_depth };
        cal.pixel_area() * self.axial_faces[frame] as f64
            + cal.avg_lateral() * depth * self.lateral_faces[frame] as f64
    }

    /// Asphericity index: the surface over the surface of the equal-volume
    /// sphere (3-D), or the outline length over the circumference of the
    /// equal-area circle (2-D). 1.0 for a perfect sphere/circle, larger
    /// for anything else; NaN on empty frames.
    pub fn asphericity(&self, cal: &Calibration, frame: usize) -> f64 {
        if self.voxel_count[frame] == 0 {
            return f64::NAN;
        }
        let volume = self.volume(cal, frame);
        let surface = self.surface(cal, frame);
        if self.is_planar() {
            surface / (2.0 * (volume * PI).sqrt())
        } else {
            let sphere_radius = (volume * 3.0 / (4.0 * PI)).powf(1.0 / 3.0);
            surface / (4.0 * PI * sphere_radius * sphere_radius)
        }
    }
}
