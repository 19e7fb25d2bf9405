//! Report rows - the tabular external contract
//!
//! The surrounding application derives its results table from the region
//! list: one row per (region, frame) with calibrated geometry and the
//! per-channel statistics. Numeric formatting (decimal separator, digit
//! count) is deliberately left to the caller.

use crate::cell::CellRegion;
use crate::stats::{ChannelStats, SurroundingStats};
use cellquant_core::Hyperstack;

/// One row of the results table.
#[derive(Debug, Clone)]
pub struct ReportRow {
    /// 1-based region id, in discovery order
    pub region_id: usize,
    /// 0-based frame index
    pub frame: usize,
    pub total_frames: usize,
    /// Calibrated centroid; NaN when the frame is empty
    pub centroid_x: f64,
    pub centroid_y: f64,
    pub centroid_z: f64,
    pub voxel_count: usize,
    /// Calibrated volume (area on planar stacks)
    pub volume: f64,
    /// Calibrated surface (outline length on planar stacks)
    pub surface: f64,
    pub asphericity: f64,
    /// Per-channel statistics, 0-based channel order
    pub channels: Vec<ChannelStats>,
    /// Surrounding voxel count, when surrounding quantification ran
    pub surrounding_count: Option<usize>,
    /// Per-channel surrounding statistics, when quantified; the mask
    /// channel entry is all NaN
    pub surrounding: Option<Vec<SurroundingStats>>,
}

/// Derive the full results table from a region list.
///
/// Every region contributes one row per stack frame, including frames it
/// never touches (those carry zero counts and NaN statistics), so the
/// table layout is rectangular.
pub fn build_rows(regions: &[CellRegion], reference: &Hyperstack) -> Vec<ReportRow> {
    let cal = reference.calibration();
    let shape = reference.shape();
    let mut rows = Vec::with_capacity(regions.len() * shape.frames);

    for (i, region) in regions.iter().enumerate() {
        for frame in 0..region.frames() {
            let [cx, cy, cz] = region.centroid(frame);
            let channels = (0..region.channels())
                .map(|c| *region.channel_stats(frame, c))
                .collect();
            let (surrounding_count, surrounding) = match region.surrounding() {
                Some(metrics) => (
                    Some(metrics.voxel_count[frame]),
                    Some(metrics.stats[frame].clone()),
                ),
                None => (None, None),
            };
            rows.push(ReportRow {
                region_id: i + 1,
                frame,
                total_frames: region.frames(),
                centroid_x: cx * cal.pixel_width,
                centroid_y: cy * cal.pixel_height,
                centroid_z: cz * cal.pixel_depth,
                voxel_count: region.voxel_count(frame),
                volume: region.volume(cal, frame),
                surface: region.surface(cal, frame),
                asphericity: region.asphericity(cal, frame),
                channels,
                surrounding_count,
                surrounding,
            });
        }
    }
    rows
}

/// Anchor for drawing a region's id into an overlay: the rounded frame-0
/// centroid. Regions without frame-0 points are skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelAnchor {
    /// 1-based region id
    pub region_id: usize,
    pub x: usize,
    pub y: usize,
}

/// Overlay label anchors for all regions.
pub fn label_anchors(regions: &[CellRegion]) -> Vec<LabelAnchor> {
    regions
        .iter()
        .enumerate()
        .filter(|(_, region)| region.voxel_count(0) > 0)
        .map(|(i, region)| {
            let [cx, cy, _] = region.centroid(0);
            LabelAnchor {
                region_id: i + 1,
                x: cx.round() as usize,
                y: cy.round() as usize,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::CellRegion;
    use cellquant_core::{Calibration, HyperstackMut, StackShape};
    use cellquant_region::{TracedRegion, VoxelPoint};

    fn single_point_region(reference: &Hyperstack) -> CellRegion {
        let region = TracedRegion {
            points: vec![VoxelPoint::probe(2, 3, 0, 0, reference, 0)],
            outline: None,
        };
        CellRegion::quantify(region, reference, 1, None).unwrap()
    }

    #[test]
    fn test_rows_are_calibrated() {
        let shape = StackShape::plane(6, 6, 1).unwrap();
        let mut stack = HyperstackMut::new(shape);
        stack.set_voxel(2, 3, 0, 0, 0, 8.0).unwrap();
        let cal = Calibration {
            pixel_width: 0.5,
            pixel_height: 0.25,
            ..Calibration::default()
        };
        let reference: Hyperstack = stack.with_calibration(cal).into();

        let regions = vec![single_point_region(&reference)];
        let rows = build_rows(&regions, &reference);
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.region_id, 1);
        assert_eq!(row.frame, 0);
        assert_eq!(row.total_frames, 1);
        assert_eq!(row.centroid_x, 1.0);
        assert_eq!(row.centroid_y, 0.75);
        assert_eq!(row.voxel_count, 1);
        assert_eq!(row.volume, 0.125);
        assert_eq!(row.channels.len(), 1);
        assert_eq!(row.channels[0].mean, 8.0);
        assert!(row.surrounding_count.is_none());
    }

    #[test]
    fn test_one_row_per_frame() {
        let shape = StackShape::new(5, 5, 1, 3, 1).unwrap();
        let mut stack = HyperstackMut::new(shape);
        stack.set_voxel(1, 1, 0, 1, 0, 1.0).unwrap();
        let reference: Hyperstack = stack.into();
        let region = TracedRegion {
            points: vec![VoxelPoint::probe(1, 1, 0, 1, &reference, 0)],
            outline: None,
        };
        let regions = vec![CellRegion::quantify(region, &reference, 1, None).unwrap()];

        let rows = build_rows(&regions, &reference);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].voxel_count, 0);
        assert!(rows[0].centroid_x.is_nan());
        assert_eq!(rows[1].voxel_count, 1);
        assert_eq!(rows[2].voxel_count, 0);
    }

    #[test]
    fn test_label_anchors_skip_empty_first_frame() {
        let shape = StackShape::new(5, 5, 1, 2, 1).unwrap();
        let mut stack = HyperstackMut::new(shape);
        stack.set_voxel(3, 4, 0, 0, 0, 1.0).unwrap();
        stack.set_voxel(1, 1, 0, 1, 0, 1.0).unwrap();
        let reference: Hyperstack = stack.into();

        let present = TracedRegion {
            points: vec![VoxelPoint::probe(3, 4, 0, 0, &reference, 0)],
            outline: None,
        };
        let absent = TracedRegion {
            points: vec![VoxelPoint::probe(1, 1, 0, 1, &reference, 0)],
            outline: None,
        };
        let regions = vec![
            CellRegion::quantify(present, &reference, 1, None).unwrap(),
            CellRegion::quantify(absent, &reference, 1, None).unwrap(),
        ];

        let anchors = label_anchors(&regions);
        assert_eq!(anchors.len(), 1);
        assert_eq!(anchors[0], LabelAnchor { region_id: 1, x: 3, y: 4 });
    }
}
