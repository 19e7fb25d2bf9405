//! Surrounding-region quantification
//!
//! The surrounding region of a reconstructed object is the set of voxels
//! within a calibrated distance of its boundary, excluding the object
//! itself. It is used for local-background intensity quantification (e.g.
//! crown-like structures around adipocytes).
//!
//! Two strategies, selected by stack geometry:
//!
//! - **planar** (one slice, one frame): the reference distance is converted
//!   to pixels through the mean in-plane pixel size; a pixel belongs to the
//!   surrounding when its Euclidean pixel distance to the nearest boundary
//!   pixel is at most that radius. This is the distance-dilation equivalent
//!   of offsetting the traced outline.
//! - **volumetric / timelapse**: per frame, the boundary points' bounding
//!   box is expanded per axis by the reference distance and clipped to the
//!   stack; a voxel belongs to the surrounding when its calibrated
//!   Euclidean distance to the nearest same-frame boundary point is
//!   strictly below the reference distance.
//!
//! The brute-force distance loop is O(box × boundary) per region. Regions
//! are local in extent, so this is acceptable; a spatial index would speed
//! it up without changing the strict comparison.

use crate::stats::{ChannelStats, SurroundingStats};
use cellquant_core::{BoundsXyz, Hyperstack, Samples};
use cellquant_region::VoxelPoint;
use std::collections::HashSet;

/// Parameters of the surrounding-region query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurroundingConfig {
    /// Distance from the region boundary, in calibrated units.
    pub reference_distance: f64,
}

/// Per-frame surrounding-region statistics of one region.
#[derive(Debug, Clone)]
pub struct SurroundingMetrics {
    /// Surrounding voxels per frame
    pub voxel_count: Vec<usize>,
    /// Statistics indexed by `[frame][channel]`; the mask channel is all
    /// NaN (no self-comparison)
    pub stats: Vec<Vec<SurroundingStats>>,
}

/// Quantify the surrounding region of the given point set.
///
/// `mask_channel` is 0-based. Intensities are read from the reference
/// snapshot, never from the mutated working grid.
pub(crate) fn compute_surrounding(
    points: &[VoxelPoint],
    reference: &Hyperstack,
    mask_channel: usize,
    config: &SurroundingConfig,
) -> SurroundingMetrics {
    let shape = reference.shape();
    let distance = config.reference_distance;

    let region: HashSet<(usize, usize, usize, usize)> =
        points.iter().map(|p| (p.x, p.y, p.z, p.t)).collect();

    // boundary subset: points with at least one exposed face
    let mut frame_range: Option<(usize, usize)> = None;
    let mut boundary: Vec<Vec<(usize, usize, usize)>> = vec![Vec::new(); shape.frames];
    let mut bounds = BoundsXyz::empty();
    for p in points.iter().filter(|p| p.is_exposed()) {
        boundary[p.t].push((p.x, p.y, p.z));
        bounds.include(p.x, p.y, p.z);
        frame_range = Some(match frame_range {
            None => (p.t, p.t),
            Some((lo, hi)) => (lo.min(p.t), hi.max(p.t)),
        });
    }

    let mut voxel_count = vec![0usize; shape.frames];
    let mut samples: Vec<Vec<Samples>> =
        vec![(0..shape.channels).map(|_| Samples::new()).collect(); shape.frames];

    if let Some((t_lo, t_hi)) = frame_range {
        let cal = reference.calibration();
        let margin = |axis_cal: f64| (distance / axis_cal).round() as i64 + 1;
        let search = bounds
            .expand(
                margin(cal.pixel_width),
                margin(cal.pixel_height),
                margin(cal.pixel_depth),
            )
            .clip_to(&shape);

        let planar = shape.is_planar();
        let radius_px = distance / cal.avg_lateral();
        let (pw, ph, pd) = (cal.pixel_width, cal.pixel_height, cal.pixel_depth);

        for (x, y, z) in search.iter_voxels() {
            for t in t_lo..=t_hi {
                if region.contains(&(x, y, z, t)) {
                    continue;
                }
                let mut nearest_sq = f64::INFINITY;
                if planar {
                    for &(sx, sy, _) in &boundary[t] {
                        let dx = x as f64 - sx as f64;
                        let dy = y as f64 - sy as f64;
                        nearest_sq = nearest_sq.min(dx * dx + dy * dy);
                    }
                    if nearest_sq.sqrt() > radius_px {
                        continue;
                    }
                } else {
                    for &(sx, sy, sz) in &boundary[t] {
                        let dx = (x as f64 - sx as f64) * pw;
                        let dy = (y as f64 - sy as f64) * ph;
                        let dz = (z as f64 - sz as f64) * pd;
                        nearest_sq = nearest_sq.min(dx * dx + dy * dy + dz * dz);
                    }
                    // strictly below the reference distance
                    if nearest_sq.sqrt() >= distance {
                        continue;
                    }
                }

                voxel_count[t] += 1;
                for c in 0..shape.channels {
                    if c == mask_channel {
                        continue;
                    }
                    samples[t][c].push(reference.voxel_unchecked(x, y, z, t, c));
                }
            }
        }
    }

    let stats = samples
        .iter()
        .map(|frame_samples| {
            frame_samples
                .iter()
                .enumerate()
                .map(|(c, s)| {
                    if c == mask_channel {
                        SurroundingStats::nan()
                    } else {
                        SurroundingStats {
                            base: ChannelStats::from_samples(s),
                            low5: s.trimmed_mean_low(5.0),
                            low25: s.trimmed_mean_low(25.0),
                            high5: s.trimmed_mean_high(5.0),
                            high25: s.trimmed_mean_high(25.0),
                        }
                    }
                })
                .collect()
        })
        .collect();

    SurroundingMetrics { voxel_count, stats }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cellquant_core::{Calibration, HyperstackMut, StackShape};

    fn probe_all(
        coords: &[(usize, usize, usize, usize)],
        reference: &Hyperstack,
    ) -> Vec<VoxelPoint> {
        coords
            .iter()
            .map(|&(x, y, z, t)| VoxelPoint::probe(x, y, z, t, reference, 0))
            .collect()
    }

    #[test]
    fn test_planar_ring_around_single_pixel() {
        // 2 channels: mask and an intensity channel of constant 50
        let shape = StackShape::plane(11, 11, 2).unwrap();
        let mut stack = HyperstackMut::new(shape);
        stack.set_voxel(5, 5, 0, 0, 0, 255.0).unwrap();
        for y in 0..11 {
            for x in 0..11 {
                stack.set_voxel(x, y, 0, 0, 1, 50.0).unwrap();
            }
        }
        let reference: Hyperstack = stack.into();
        let points = probe_all(&[(5, 5, 0, 0)], &reference);

        let metrics = compute_surrounding(
            &points,
            &reference,
            0,
            &SurroundingConfig {
                reference_distance: 1.5,
            },
        );
        // pixels within 1.5 px of (5,5), excluding it: 4 at distance 1 and
        // 4 at sqrt(2)
        assert_eq!(metrics.voxel_count[0], 8);
        assert!(metrics.stats[0][0].base.mean.is_nan());
        assert_eq!(metrics.stats[0][1].base.mean, 50.0);
        assert_eq!(metrics.stats[0][1].base.integrated, 400.0);
    }

    #[test]
    fn test_volumetric_strict_distance() {
        let shape = StackShape::new(11, 11, 3, 2, 1).unwrap();
        let mut stack = HyperstackMut::new(shape);
        // one-voxel region in frame 0 only
        stack.set_voxel(5, 5, 1, 0, 0, 255.0).unwrap();
        let reference: Hyperstack = stack.into();
        let points = probe_all(&[(5, 5, 1, 0)], &reference);

        let metrics = compute_surrounding(
            &points,
            &reference,
            0,
            &SurroundingConfig {
                reference_distance: 1.0,
            },
        );
        // strict comparison: the six face neighbors sit exactly at
        // distance 1.0 and are excluded
        assert_eq!(metrics.voxel_count[0], 0);
        assert_eq!(metrics.voxel_count[1], 0);

        let metrics = compute_surrounding(
            &points,
            &reference,
            0,
            &SurroundingConfig {
                reference_distance: 1.01,
            },
        );
        assert_eq!(metrics.voxel_count[0], 6);
        // the region is absent in frame 1, so nothing surrounds it there
        assert_eq!(metrics.voxel_count[1], 0);
    }

    #[test]
    fn test_volumetric_anisotropic_calibration() {
        let shape = StackShape::new(11, 11, 5, 1, 1).unwrap();
        let mut stack = HyperstackMut::new(shape);
        stack.set_voxel(5, 5, 2, 0, 0, 255.0).unwrap();
        let cal = Calibration {
            pixel_width: 1.0,
            pixel_height: 1.0,
            pixel_depth: 3.0,
            ..Calibration::default()
        };
        let reference: Hyperstack = stack.with_calibration(cal).into();
        let points = probe_all(&[(5, 5, 2, 0)], &reference);

        let metrics = compute_surrounding(
            &points,
            &reference,
            0,
            &SurroundingConfig {
                reference_distance: 1.5,
            },
        );
        // z neighbors are 3.0 units away and excluded; in-plane neighbors
        // at 1.0 and sqrt(2) qualify
        assert_eq!(metrics.voxel_count[0], 8);
    }

    #[test]
    fn test_empty_boundary_yields_zero_counts() {
        let shape = StackShape::plane(5, 5, 1).unwrap();
        let stack = HyperstackMut::new(shape);
        let reference: Hyperstack = stack.into();

        let metrics = compute_surrounding(
            &[],
            &reference,
            0,
            &SurroundingConfig {
                reference_distance: 2.0,
            },
        );
        assert_eq!(metrics.voxel_count[0], 0);
        assert!(metrics.stats[0][0].base.median.is_nan());
        assert!(metrics.stats[0][0].base.sd.is_nan());
    }

    #[test]
    fn test_trimmed_means_over_gradient() {
        // 1x100 plane, channel 1 carries 1..=100; region is a single pixel
        // at x=0 so the surrounding within 200 px is everything else
        let shape = StackShape::plane(100, 1, 2).unwrap();
        let mut stack = HyperstackMut::new(shape);
        stack.set_voxel(0, 0, 0, 0, 0, 255.0).unwrap();
        for x in 0..100 {
            stack.set_voxel(x, 0, 0, 0, 1, x as f64).unwrap();
        }
        let reference: Hyperstack = stack.into();
        let points = probe_all(&[(0, 0, 0, 0)], &reference);

        let metrics = compute_surrounding(
            &points,
            &reference,
            0,
            &SurroundingConfig {
                reference_distance: 200.0,
            },
        );
        // 99 surrounding pixels with values 1..=99
        assert_eq!(metrics.voxel_count[0], 99);
        let s = &metrics.stats[0][1];
        assert_eq!(s.base.min, 1.0);
        assert_eq!(s.base.max, 99.0);
        assert_eq!(s.base.median, 50.0);
        // round(99 * 5 / 100) = 5 elements from each end
        assert_eq!(s.low5, 3.0);
        assert_eq!(s.high5, 97.0);
    }
}
