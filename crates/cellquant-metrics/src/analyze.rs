//! End-to-end analysis pipeline
//!
//! [`analyze`] chains validation, reconstruction and per-region
//! quantification. Reconstruction mutates the working grid and therefore
//! stays strictly sequential; quantification only reads the shared
//! reference snapshot and each region's own points, so accepted regions
//! are quantified in parallel.

use crate::cell::CellRegion;
use crate::error::{MetricsError, MetricsResult};
use crate::surround::SurroundingConfig;
use cellquant_core::{Hyperstack, HyperstackMut};
use cellquant_region::{ProgressSink, ReconstructionConfig, reconstruct};
use log::debug;
use rayon::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Full analysis parameters.
#[derive(Debug, Clone, Default)]
pub struct AnalysisConfig {
    pub reconstruction: ReconstructionConfig,
    /// Enable surrounding-region quantification at the given distance
    pub surrounding: Option<SurroundingConfig>,
}

/// Result of a full analysis run.
#[derive(Debug)]
pub struct Analysis {
    /// Quantified regions in discovery order
    pub regions: Vec<CellRegion>,
    /// The pre-mutation snapshot statistics were computed from
    pub reference: Hyperstack,
    /// Foreground voxels on the mask channel before reconstruction
    pub foreground_voxels: usize,
    /// Voxels across accepted regions
    pub kept_voxels: usize,
}

/// Reconstruct and quantify every region of the stack's mask channel.
///
/// The working stack is mutated exactly as by
/// [`cellquant_region::reconstruct`]. All validation happens before the
/// first mutation, so a failed call leaves the stack intact and the caller
/// can proceed with its next task.
///
/// # Errors
///
/// Propagates reconstruction errors, and returns
/// [`MetricsError::InvalidReferenceDistance`] for a non-positive or
/// non-finite surrounding distance, or [`MetricsError::Cancelled`] when
/// the sink requests termination (polled between regions only).
pub fn analyze(
    stack: &mut HyperstackMut,
    config: &AnalysisConfig,
    progress: &dyn ProgressSink,
) -> MetricsResult<Analysis> {
    if let Some(surrounding) = &config.surrounding {
        let d = surrounding.reference_distance;
        if !d.is_finite() || d <= 0.0 {
            return Err(MetricsError::InvalidReferenceDistance(d));
        }
    }

    let reconstruction = reconstruct(stack, &config.reconstruction, progress)?;
    let reference = reconstruction.reference;
    let total = reconstruction.regions.len().max(1);
    let done = AtomicUsize::new(0);

    let regions: Vec<CellRegion> = reconstruction
        .regions
        .into_par_iter()
        .map(|region| {
            if progress.is_cancelled() {
                return Err(MetricsError::Cancelled);
            }
            let cell = CellRegion::quantify(
                region,
                &reference,
                config.reconstruction.channel,
                config.surrounding.as_ref(),
            )?;
            let finished = done.fetch_add(1, Ordering::Relaxed) + 1;
            progress.progress(finished as f64 / total as f64, "quantifying regions");
            Ok(cell)
        })
        .collect::<MetricsResult<_>>()?;

    debug!("quantified {} region(s)", regions.len());
    Ok(Analysis {
        regions,
        reference,
        foreground_voxels: reconstruction.foreground_voxels,
        kept_voxels: reconstruction.kept_voxels,
    })
}
