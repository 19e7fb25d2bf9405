//! End-to-end pipeline tests over the public API.

use cellquant::metrics::{AnalysisConfig, SurroundingConfig, analyze, build_rows};
use cellquant::region::{
    BorderExclusion, Connectivity, MinSize, NoProgress, ReconstructionConfig, reconstruct,
};
use cellquant::{Calibration, HyperstackMut, StackShape};

fn config(min_size: usize) -> AnalysisConfig {
    AnalysisConfig {
        reconstruction: ReconstructionConfig {
            min_size: MinSize::Voxels(min_size),
            border_exclusion: BorderExclusion::None,
            ..ReconstructionConfig::default()
        },
        surrounding: None,
    }
}

/// Scatter a deterministic pattern of blobs and singles over a volume.
fn speckled_volume() -> HyperstackMut {
    let shape = StackShape::new(16, 16, 3, 1, 1).unwrap();
    let mut stack = HyperstackMut::new(shape);
    for i in 0..16usize {
        let x = (i * 7 + 3) % 16;
        let y = (i * 5 + 1) % 16;
        let z = i % 3;
        stack.set_voxel(x, y, z, 0, 0, 1.0 + i as f64).unwrap();
    }
    for y in 4..7 {
        for x in 9..12 {
            stack.set_voxel(x, y, 1, 0, 0, 99.0).unwrap();
        }
    }
    stack
}

#[test]
fn every_foreground_voxel_is_accounted_for() {
    let mut stack = speckled_volume();
    let foreground = {
        let shape = stack.shape();
        let mut n = 0;
        for z in 0..shape.slices {
            for y in 0..shape.height {
                for x in 0..shape.width {
                    if stack.voxel(x, y, z, 0, 0).unwrap() > 0.0 {
                        n += 1;
                    }
                }
            }
        }
        n
    };

    let cfg = ReconstructionConfig {
        min_size: MinSize::Voxels(4),
        border_exclusion: BorderExclusion::None,
        ..ReconstructionConfig::default()
    };
    let result = reconstruct(&mut stack, &cfg, &NoProgress).unwrap();
    assert_eq!(result.foreground_voxels, foreground);
    assert_eq!(result.kept_voxels + result.rejected_voxels, foreground);
}

#[test]
fn reprocessing_the_written_back_grid_is_idempotent() {
    let mut stack = speckled_volume();
    let cfg = config(4);

    let first = analyze(&mut stack, &cfg, &NoProgress).unwrap();
    let second = analyze(&mut stack, &cfg, &NoProgress).unwrap();

    assert_eq!(first.regions.len(), second.regions.len());
    for (a, b) in first.regions.iter().zip(&second.regions) {
        assert_eq!(a.voxel_count(0), b.voxel_count(0));
        assert_eq!(a.centroid(0), b.centroid(0));
        assert_eq!(
            a.channel_stats(0, 0).integrated,
            b.channel_stats(0, 0).integrated
        );
    }
}

#[test]
fn isolated_voxel_has_full_exposure_and_nan_sd() {
    let shape = StackShape::new(7, 7, 5, 1, 1).unwrap();
    let mut stack = HyperstackMut::new(shape);
    stack.set_voxel(3, 3, 2, 0, 0, 42.0).unwrap();

    let analysis = analyze(&mut stack, &config(1), &NoProgress).unwrap();
    assert_eq!(analysis.regions.len(), 1);
    let cell = &analysis.regions[0];
    assert_eq!(cell.axial_faces(0), 2);
    assert_eq!(cell.lateral_faces(0), 4);
    assert!(cell.channel_stats(0, 0).sd.is_nan());
    assert_eq!(cell.surface(&Calibration::default(), 0), 6.0);
}

#[test]
fn rectangular_solid_matches_closed_form_surface() {
    let (w, h, d) = (5usize, 4usize, 3usize);
    let shape = StackShape::new(12, 12, 6, 1, 1).unwrap();
    let mut stack = HyperstackMut::new(shape);
    for z in 1..1 + d {
        for y in 3..3 + h {
            for x in 2..2 + w {
                stack.set_voxel(x, y, z, 0, 0, 1.0).unwrap();
            }
        }
    }

    let analysis = analyze(&mut stack, &config(1), &NoProgress).unwrap();
    let cell = &analysis.regions[0];
    let cal = Calibration::default();
    assert_eq!(
        cell.surface(&cal, 0),
        2.0 * (w * h + h * d + w * d) as f64
    );
    assert_eq!(cell.volume(&cal, 0), (w * h * d) as f64);
}

#[test]
fn surrounding_trims_match_percentile_definition() {
    // mask pixel at x=0; channel 2 carries 1..=100 at x=1..=100
    let shape = StackShape::plane(101, 1, 2).unwrap();
    let mut stack = HyperstackMut::new(shape);
    stack.set_voxel(0, 0, 0, 0, 0, 255.0).unwrap();
    for x in 1..=100usize {
        stack.set_voxel(x, 0, 0, 0, 1, x as f64).unwrap();
    }

    let mut cfg = config(1);
    cfg.surrounding = Some(SurroundingConfig {
        reference_distance: 500.0,
    });
    let analysis = analyze(&mut stack, &cfg, &NoProgress).unwrap();
    let surrounding = analysis.regions[0].surrounding().unwrap();
    assert_eq!(surrounding.voxel_count[0], 100);
    let stats = &surrounding.stats[0][1];
    // sorted values 1..=100: bottom/top 5% average 3 and 98
    assert_eq!(stats.low5, 3.0);
    assert_eq!(stats.high5, 98.0);
    assert_eq!(stats.low25, 13.0);
    assert_eq!(stats.high25, 88.0);
    // mask channel carries no self-comparison
    assert!(surrounding.stats[0][0].base.mean.is_nan());
}

#[test]
fn border_touching_region_is_rejected_only_when_excluded() {
    let shape = StackShape::plane(7, 7, 1).unwrap();

    let mut cfg = config(1);
    cfg.reconstruction.border_exclusion = BorderExclusion::EdgesXy;
    let mut stack = HyperstackMut::new(shape);
    stack.set_voxel(0, 3, 0, 0, 0, 1.0).unwrap();
    let analysis = analyze(&mut stack, &cfg, &NoProgress).unwrap();
    assert!(analysis.regions.is_empty());
    // rejection clears the voxel for good
    assert_eq!(stack.voxel(0, 3, 0, 0, 0), Some(0.0));

    cfg.reconstruction.border_exclusion = BorderExclusion::None;
    let mut stack = HyperstackMut::new(shape);
    stack.set_voxel(0, 3, 0, 0, 0, 1.0).unwrap();
    let analysis = analyze(&mut stack, &cfg, &NoProgress).unwrap();
    assert_eq!(analysis.regions.len(), 1);
}

#[test]
fn minimum_size_is_an_inclusive_bound() {
    let shape = StackShape::plane(10, 10, 1).unwrap();
    let bar = [(2usize, 2usize), (3, 2), (4, 2), (5, 2)];

    let mut stack = HyperstackMut::new(shape);
    for &(x, y) in &bar {
        stack.set_voxel(x, y, 0, 0, 0, 1.0).unwrap();
    }
    let analysis = analyze(&mut stack, &config(4), &NoProgress).unwrap();
    assert_eq!(analysis.regions.len(), 1);

    let mut stack = HyperstackMut::new(shape);
    for &(x, y) in &bar {
        stack.set_voxel(x, y, 0, 0, 0, 1.0).unwrap();
    }
    let analysis = analyze(&mut stack, &config(5), &NoProgress).unwrap();
    assert!(analysis.regions.is_empty());
}

#[test]
fn block_scenario_reports_expected_row() {
    let shape = StackShape::plane(5, 5, 1).unwrap();
    let mut stack = HyperstackMut::new(shape);
    for y in 1..4 {
        for x in 1..4 {
            stack.set_voxel(x, y, 0, 0, 0, 10.0).unwrap();
        }
    }

    let analysis = analyze(&mut stack, &config(1), &NoProgress).unwrap();
    let rows = build_rows(&analysis.regions, &analysis.reference);
    assert_eq!(rows.len(), 1);
    let row = &rows[0];
    assert_eq!(row.region_id, 1);
    assert_eq!(row.voxel_count, 9);
    assert_eq!((row.centroid_x, row.centroid_y, row.centroid_z), (2.0, 2.0, 0.0));
    assert_eq!(row.channels[0].mean, 10.0);
    assert_eq!(row.channels[0].integrated, 90.0);
    assert_eq!(row.volume, 9.0);
    assert_eq!(row.surface, 12.0);
    assert!(row.surrounding_count.is_none());
}

#[test]
fn disjoint_voxels_stay_separate_unless_fused() {
    let shape = StackShape::plane(30, 30, 1).unwrap();
    let spots = [(3usize, 3usize), (25, 25)];

    let mut stack = HyperstackMut::new(shape);
    for &(x, y) in &spots {
        stack.set_voxel(x, y, 0, 0, 0, 1.0).unwrap();
    }
    let analysis = analyze(&mut stack, &config(1), &NoProgress).unwrap();
    assert_eq!(analysis.regions.len(), 2);
    assert_eq!(analysis.regions[0].voxel_count(0), 1);
    assert_eq!(analysis.regions[1].voxel_count(0), 1);

    let mut stack = HyperstackMut::new(shape);
    for &(x, y) in &spots {
        stack.set_voxel(x, y, 0, 0, 0, 1.0).unwrap();
    }
    let mut cfg = config(1);
    cfg.reconstruction.fuse = true;
    let analysis = analyze(&mut stack, &cfg, &NoProgress).unwrap();
    assert_eq!(analysis.regions.len(), 1);
    assert_eq!(analysis.regions[0].voxel_count(0), 2);
}

#[test]
fn timelapse_region_reports_one_row_per_frame() {
    let shape = StackShape::new(8, 8, 1, 2, 1).unwrap();
    let mut stack = HyperstackMut::new(shape);
    // frame 0: 2x2 block; frame 1: the same block shifted, overlapping at
    // (3,3) so the time link joins them
    for y in 2..4 {
        for x in 2..4 {
            stack.set_voxel(x, y, 0, 0, 0, 4.0).unwrap();
        }
    }
    for y in 3..5 {
        for x in 3..5 {
            stack.set_voxel(x, y, 0, 1, 0, 8.0).unwrap();
        }
    }

    let analysis = analyze(&mut stack, &config(2), &NoProgress).unwrap();
    assert_eq!(analysis.regions.len(), 1);
    let cell = &analysis.regions[0];
    assert_eq!(cell.voxel_count(0), 4);
    assert_eq!(cell.voxel_count(1), 4);
    assert_eq!(cell.channel_stats(0, 0).mean, 4.0);
    assert_eq!(cell.channel_stats(1, 0).mean, 8.0);
    assert_eq!(cell.centroid(0), [2.5, 2.5, 0.0]);
    assert_eq!(cell.centroid(1), [3.5, 3.5, 0.0]);

    let rows = build_rows(&analysis.regions, &analysis.reference);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].frame, 0);
    assert_eq!(rows[1].frame, 1);
    assert_eq!(rows[0].total_frames, 2);
}

#[test]
fn extended_connectivity_merges_diagonal_neighbors() {
    let shape = StackShape::plane(6, 6, 1).unwrap();
    let diagonal = [(1usize, 1usize), (2, 2), (3, 3)];

    let mut stack = HyperstackMut::new(shape);
    for &(x, y) in &diagonal {
        stack.set_voxel(x, y, 0, 0, 0, 1.0).unwrap();
    }
    let analysis = analyze(&mut stack, &config(1), &NoProgress).unwrap();
    assert_eq!(analysis.regions.len(), 3);

    let mut stack = HyperstackMut::new(shape);
    for &(x, y) in &diagonal {
        stack.set_voxel(x, y, 0, 0, 0, 1.0).unwrap();
    }
    let mut cfg = config(1);
    cfg.reconstruction.connectivity = Connectivity::Extended;
    let analysis = analyze(&mut stack, &cfg, &NoProgress).unwrap();
    assert_eq!(analysis.regions.len(), 1);
    assert_eq!(analysis.regions[0].voxel_count(0), 3);
}
