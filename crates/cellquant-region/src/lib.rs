//! cellquant-region - Connected-region reconstruction
//!
//! This crate turns a segmented mask channel of a voxel stack into a list
//! of connected regions:
//!
//! - **Flood-fill reconstruction** - explicit-stack fill over data-driven
//!   neighbor-offset tables, for volumetric and timelapse stacks
//! - **Outline tracing** - crack-edge boundary following with interior
//!   rasterization, the fast path for single-plane stacks
//! - **Acceptance filtering** - minimum size (per frame on timelapse data)
//!   and border exclusion
//!
//! # Examples
//!
//! ```
//! use cellquant_core::{HyperstackMut, StackShape};
//! use cellquant_region::{
//!     reconstruct, BorderExclusion, MinSize, NoProgress, ReconstructionConfig,
//! };
//!
//! let shape = StackShape::plane(16, 16, 1).unwrap();
//! let mut stack = HyperstackMut::new(shape);
//! for y in 4..8 {
//!     for x in 4..8 {
//!         stack.set_voxel(x, y, 0, 0, 0, 255.0).unwrap();
//!     }
//! }
//!
//! let config = ReconstructionConfig {
//!     min_size: MinSize::Voxels(4),
//!     border_exclusion: BorderExclusion::None,
//!     ..ReconstructionConfig::default()
//! };
//! let result = reconstruct(&mut stack, &config, &NoProgress).unwrap();
//! assert_eq!(result.regions.len(), 1);
//! assert_eq!(result.regions[0].points.len(), 16);
//! ```

pub mod connectivity;
pub mod error;
pub mod outline;
pub mod point;
pub mod progress;
pub mod reconstruct;

// Re-export core types
pub use cellquant_core;

// Re-export error types
pub use error::{RegionError, RegionResult};

// Re-export connectivity types
pub use connectivity::{Connectivity, EXTENDED_NEIGHBORS, FACE_NEIGHBORS, NeighborOffset};

// Re-export point and progress types
pub use point::VoxelPoint;
pub use progress::{NoProgress, ProgressSink};

// Re-export outline types and functions
pub use outline::{MaskPlane, Outline, TracedObject, trace_objects};

// Re-export reconstruction types and functions
pub use reconstruct::{
    BorderExclusion, InputKind, MinSize, Reconstruction, ReconstructionConfig, TracedRegion,
    reconstruct,
};
