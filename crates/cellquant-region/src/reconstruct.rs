//! Region reconstruction
//!
//! [`reconstruct`] scans a mask channel of a working stack and extracts
//! every connected foreground region, applying size and border acceptance
//! filters. Visiting marks voxels by zeroing them in the working grid, so
//! all probing happens against an immutable reference snapshot taken before
//! the first mutation; after scanning, the values of every accepted voxel
//! are restored from the snapshot and rejected regions stay cleared.
//!
//! Single-slice, single-frame stacks take the outline-tracing fast path
//! (see [`crate::outline`]); everything else runs the explicit-stack flood
//! fill over the configured neighbor-offset table.

use crate::connectivity::Connectivity;
use crate::error::{RegionError, RegionResult};
use crate::outline::{MaskPlane, Outline, trace_objects};
use crate::point::VoxelPoint;
use crate::progress::ProgressSink;
use cellquant_core::{Calibration, Hyperstack, HyperstackMut, StackShape};
use log::debug;

/// Minimum region size, either directly in voxels or as a calibrated area
/// converted through the in-plane pixel area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MinSize {
    Voxels(usize),
    CalibratedArea(f64),
}

impl MinSize {
    /// Minimum voxel count for the given calibration.
    pub fn resolve(&self, cal: &Calibration) -> usize {
        match *self {
            MinSize::Voxels(n) => n,
            MinSize::CalibratedArea(area) => ((area / cal.pixel_area()).round() as usize).max(1),
        }
    }
}

/// Which stack borders disqualify a touching region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BorderExclusion {
    /// Keep regions regardless of border contact
    None,
    /// Reject regions touching the x or y borders
    #[default]
    EdgesXy,
    /// Reject regions touching the x, y or z borders
    /// (the z test applies only to stacks with more than one slice)
    EdgesXyz,
}

/// How the mask channel encodes objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputKind {
    /// Any positive value is foreground; connectivity defines the objects
    #[default]
    BinaryMask,
    /// Each distinct positive value is its own object
    /// (2-D single-frame stacks only)
    LabelImage,
}

/// Reconstruction parameters, passed by value - never ambient state.
#[derive(Debug, Clone)]
pub struct ReconstructionConfig {
    /// 1-based channel carrying the mask
    pub channel: usize,
    pub connectivity: Connectivity,
    pub min_size: MinSize,
    pub border_exclusion: BorderExclusion,
    /// Collect all accepted regions into a single region
    pub fuse: bool,
    pub input: InputKind,
}

impl Default for ReconstructionConfig {
    fn default() -> Self {
        Self {
            channel: 1,
            connectivity: Connectivity::FaceOnly,
            min_size: MinSize::Voxels(100),
            border_exclusion: BorderExclusion::EdgesXy,
            fuse: false,
            input: InputKind::BinaryMask,
        }
    }
}

/// One accepted region: its points in discovery order, and - on the 2-D
/// path - the traced outline kept for the caller's persistence needs.
#[derive(Debug, Clone)]
pub struct TracedRegion {
    pub points: Vec<VoxelPoint>,
    pub outline: Option<Outline>,
}

/// Result of a reconstruction run.
#[derive(Debug)]
pub struct Reconstruction {
    /// Accepted regions in discovery order (exactly one when fusing and
    /// anything was accepted)
    pub regions: Vec<TracedRegion>,
    /// The pre-mutation snapshot that all points were probed against;
    /// downstream statistics read intensities from here
    pub reference: Hyperstack,
    /// Foreground voxels on the mask channel before reconstruction
    pub foreground_voxels: usize,
    /// Points across all accepted regions
    pub kept_voxels: usize,
    /// Points across all rejected regions
    pub rejected_voxels: usize,
}

/// Reconstruct all connected regions on the configured mask channel.
///
/// The working stack is mutated: rejected regions are cleared to zero,
/// accepted voxels keep (have restored) their original values. Validation
/// failures are reported before any mutation, so a caller can skip to its
/// next task with the stack intact.
///
/// # Errors
///
/// [`RegionError::InvalidChannel`] for a channel outside `1..=channels`;
/// [`RegionError::UnsupportedGeometry`] for label-image input on a stack
/// with more than one slice or frame; [`RegionError::Cancelled`] when the
/// progress sink requests termination (checked between regions; the stack
/// is left consistent, with all regions accepted so far restored).
pub fn reconstruct(
    stack: &mut HyperstackMut,
    config: &ReconstructionConfig,
    progress: &dyn ProgressSink,
) -> RegionResult<Reconstruction> {
    let shape = stack.shape();
    if config.channel < 1 || config.channel > shape.channels {
        return Err(RegionError::InvalidChannel {
            channel: config.channel,
            channels: shape.channels,
        });
    }
    if config.input == InputKind::LabelImage && !shape.is_planar() {
        return Err(RegionError::UnsupportedGeometry(format!(
            "label-image input requires a single-slice, single-frame stack, got {} slice(s), {} frame(s)",
            shape.slices, shape.frames
        )));
    }

    let mask_channel = config.channel - 1;
    let min_size = config.min_size.resolve(stack.calibration());

    if shape.is_planar() {
        reconstruct_planar(stack, config, mask_channel, min_size, progress)
    } else {
        reconstruct_volumetric(stack, config, mask_channel, min_size, progress)
    }
}

fn reconstruct_volumetric(
    stack: &mut HyperstackMut,
    config: &ReconstructionConfig,
    mask_channel: usize,
    min_size: usize,
    progress: &dyn ProgressSink,
) -> RegionResult<Reconstruction> {
    let shape = stack.shape();
    let reference = stack.snapshot();

    let mut foreground = 0usize;
    for t in 0..shape.frames {
        for z in 0..shape.slices {
            for y in 0..shape.height {
                for x in 0..shape.width {
                    if reference.voxel_unchecked(x, y, z, t, mask_channel) > 0.0 {
                        foreground += 1;
                    }
                }
            }
        }
    }

    let offsets = config.connectivity.offsets();
    let mut regions: Vec<TracedRegion> = Vec::new();
    let mut fused: Vec<VoxelPoint> = Vec::new();
    let mut kept = 0usize;
    let mut rejected = 0usize;
    let mut filled = 0usize;
    // explicit growable stack; regions may be far larger than any call stack
    let mut fill_stack: Vec<(usize, usize, usize, usize)> = Vec::new();

    for t in 0..shape.frames {
        for z in 0..shape.slices {
            for x in 0..shape.width {
                for y in 0..shape.height {
                    if stack.voxel_unchecked(x, y, z, t, mask_channel) <= 0.0 {
                        continue;
                    }
                    if progress.is_cancelled() {
                        restore_points(stack, &reference, &regions, &fused, mask_channel);
                        return Err(RegionError::Cancelled);
                    }

                    let mut points = Vec::new();
                    points.push(VoxelPoint::probe(x, y, z, t, &reference, mask_channel));
                    stack.set_voxel_unchecked(x, y, z, t, mask_channel, 0.0);
                    fill_stack.push((x, y, z, t));

                    while let Some((cx, cy, cz, ct)) = fill_stack.pop() {
                        for &(dx, dy, dz, dt) in offsets {
                            let nx = cx as i64 + dx;
                            let ny = cy as i64 + dy;
                            let nz = cz as i64 + dz;
                            let nt = ct as i64 + dt;
                            if nx < 0
                                || ny < 0
                                || nz < 0
                                || nt < 0
                                || nx >= shape.width as i64
                                || ny >= shape.height as i64
                                || nz >= shape.slices as i64
                                || nt >= shape.frames as i64
                            {
                                continue;
                            }
                            let (nx, ny, nz, nt) =
                                (nx as usize, ny as usize, nz as usize, nt as usize);
                            if stack.voxel_unchecked(nx, ny, nz, nt, mask_channel) > 0.0 {
                                points.push(VoxelPoint::probe(nx, ny, nz, nt, &reference, mask_channel));
                                stack.set_voxel_unchecked(nx, ny, nz, nt, mask_channel, 0.0);
                                fill_stack.push((nx, ny, nz, nt));
                            }
                        }
                    }

                    filled += points.len();
                    let keep = passes_size_filter(&points, shape.frames, min_size)
                        && !touches_excluded_border(&points, &shape, config.border_exclusion);
                    if keep {
                        kept += points.len();
                        if config.fuse {
                            fused.extend(points);
                        } else {
                            regions.push(TracedRegion {
                                points,
                                outline: None,
                            });
                        }
                    } else {
                        rejected += points.len();
                    }
                    progress.progress(
                        filled as f64 / foreground.max(1) as f64,
                        "reconstructing regions",
                    );
                }
            }
        }
    }

    if config.fuse && !fused.is_empty() {
        regions.push(TracedRegion {
            points: fused,
            outline: None,
        });
        fused = Vec::new();
    }
    restore_points(stack, &reference, &regions, &fused, mask_channel);

    debug!(
        "reconstructed {} region(s): {} of {} foreground voxel(s) kept",
        regions.len(),
        kept,
        foreground
    );
    Ok(Reconstruction {
        regions,
        reference,
        foreground_voxels: foreground,
        kept_voxels: kept,
        rejected_voxels: rejected,
    })
}

fn reconstruct_planar(
    stack: &mut HyperstackMut,
    config: &ReconstructionConfig,
    mask_channel: usize,
    min_size: usize,
    progress: &dyn ProgressSink,
) -> RegionResult<Reconstruction> {
    let shape = stack.shape();
    let reference = stack.snapshot();
    let plane = MaskPlane::from_channel(&reference, mask_channel);
    let foreground = plane.foreground_count();

    let objects = trace_objects(
        &plane,
        config.connectivity.trace_eight_connected(),
        config.input == InputKind::LabelImage,
    );

    // blank the mask channel; accepted objects are restored afterwards
    for y in 0..shape.height {
        for x in 0..shape.width {
            stack.set_voxel_unchecked(x, y, 0, 0, mask_channel, 0.0);
        }
    }

    let total = objects.len().max(1);
    let mut regions: Vec<TracedRegion> = Vec::new();
    let mut fused: Vec<VoxelPoint> = Vec::new();
    let mut kept = 0usize;
    let mut rejected = 0usize;

    for (i, object) in objects.into_iter().enumerate() {
        if progress.is_cancelled() {
            restore_points(stack, &reference, &regions, &fused, mask_channel);
            return Err(RegionError::Cancelled);
        }

        let points: Vec<VoxelPoint> = object
            .pixels
            .iter()
            .map(|&(x, y)| VoxelPoint::probe(x, y, 0, 0, &reference, mask_channel))
            .collect();

        let keep = passes_size_filter(&points, shape.frames, min_size)
            && !touches_excluded_border(&points, &shape, config.border_exclusion);
        if keep {
            kept += points.len();
            if config.fuse {
                fused.extend(points);
            } else {
                regions.push(TracedRegion {
                    points,
                    outline: Some(object.outline),
                });
            }
        } else {
            rejected += points.len();
        }
        progress.progress((i + 1) as f64 / total as f64, "tracing objects");
    }

    if config.fuse && !fused.is_empty() {
        regions.push(TracedRegion {
            points: fused,
            outline: None,
        });
        fused = Vec::new();
    }
    restore_points(stack, &reference, &regions, &fused, mask_channel);

    debug!(
        "traced {} region(s): {} of {} foreground pixel(s) kept",
        regions.len(),
        kept,
        foreground
    );
    Ok(Reconstruction {
        regions,
        reference,
        foreground_voxels: foreground,
        kept_voxels: kept,
        rejected_voxels: rejected,
    })
}

/// Restore the mask-channel value of every accepted point from the
/// reference snapshot.
fn restore_points(
    stack: &mut HyperstackMut,
    reference: &Hyperstack,
    regions: &[TracedRegion],
    fused: &[VoxelPoint],
    mask_channel: usize,
) {
    let all = regions
        .iter()
        .flat_map(|r| r.points.iter())
        .chain(fused.iter());
    for p in all {
        let value = reference.voxel_unchecked(p.x, p.y, p.z, p.t, mask_channel);
        stack.set_voxel_unchecked(p.x, p.y, p.z, p.t, mask_channel, value);
    }
}

/// Size filter: per-frame counts for timelapse stacks (frames without any
/// point are ignored), total count otherwise.
fn passes_size_filter(points: &[VoxelPoint], frames: usize, min_size: usize) -> bool {
    if frames > 1 {
        let mut counts = vec![0usize; frames];
        for p in points {
            counts[p.t] += 1;
        }
        counts.iter().all(|&c| c == 0 || c >= min_size)
    } else {
        points.len() >= min_size
    }
}

fn touches_excluded_border(
    points: &[VoxelPoint],
    shape: &StackShape,
    exclusion: BorderExclusion,
) -> bool {
    let on_xy = |p: &VoxelPoint| {
        p.x == 0 || p.x == shape.width - 1 || p.y == 0 || p.y == shape.height - 1
    };
    match exclusion {
        BorderExclusion::None => false,
        BorderExclusion::EdgesXy => points.iter().any(on_xy),
        BorderExclusion::EdgesXyz => points.iter().any(|p| {
            on_xy(p) || (shape.slices > 1 && (p.z == 0 || p.z == shape.slices - 1))
        }),
    }
}
