//! cellquant - Cell reconstruction and quantification
//!
//! cellquant identifies connected objects (cells, adipocytes) in
//! multi-dimensional voxel stacks (2-D/3-D, optionally over time) and
//! computes per-object morphometric and intensity statistics.
//!
//! # Overview
//!
//! The pipeline has three stages:
//!
//! - **Reconstruction** - flood fill or outline tracing over a segmented
//!   mask channel, with size and border acceptance filtering
//! - **Quantification** - per-frame voxel counts, centroids, surface and
//!   asphericity, and per-channel intensity statistics
//! - **Surrounding quantification** (optional) - distance-bounded
//!   local-background statistics around each object
//!
//! # Example
//!
//! ```
//! use cellquant::{HyperstackMut, StackShape};
//! use cellquant::metrics::{AnalysisConfig, analyze};
//! use cellquant::region::{BorderExclusion, MinSize, NoProgress, ReconstructionConfig};
//!
//! // 5x5 plane with a 3x3 block of value 10
//! let shape = StackShape::plane(5, 5, 1).unwrap();
//! let mut stack = HyperstackMut::new(shape);
//! for y in 1..4 {
//!     for x in 1..4 {
//!         stack.set_voxel(x, y, 0, 0, 0, 10.0).unwrap();
//!     }
//! }
//!
//! let config = AnalysisConfig {
//!     reconstruction: ReconstructionConfig {
//!         min_size: MinSize::Voxels(1),
//!         border_exclusion: BorderExclusion::None,
//!         ..ReconstructionConfig::default()
//!     },
//!     surrounding: None,
//! };
//! let analysis = analyze(&mut stack, &config, &NoProgress).unwrap();
//! assert_eq!(analysis.regions.len(), 1);
//! assert_eq!(analysis.regions[0].centroid(0), [2.0, 2.0, 0.0]);
//! ```

// Re-export core types (primary data structures used everywhere)
pub use cellquant_core::*;

// Re-export domain crates as modules to avoid name conflicts
pub use cellquant_metrics as metrics;
pub use cellquant_region as region;
