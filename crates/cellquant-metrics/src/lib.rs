//! cellquant-metrics - Per-region quantification
//!
//! This crate turns reconstructed regions into quantified objects:
//!
//! - **Region metrics** - per-frame voxel counts, centroids, intensity
//!   statistics and the surface/asphericity shape metrics
//! - **Surrounding quantification** - distance-bounded local-background
//!   statistics with percentile-trimmed means
//! - **Pipeline** - [`analyze`] runs reconstruction and then quantifies
//!   all accepted regions in parallel
//! - **Report rows** - the tabular contract consumed by the caller's
//!   export layer
//!
//! # Examples
//!
//! ```
//! use cellquant_core::{HyperstackMut, StackShape};
//! use cellquant_metrics::{AnalysisConfig, analyze, build_rows};
//! use cellquant_region::{BorderExclusion, MinSize, NoProgress, ReconstructionConfig};
//!
//! let shape = StackShape::plane(16, 16, 1).unwrap();
//! let mut stack = HyperstackMut::new(shape);
//! for y in 4..8 {
//!     for x in 4..8 {
//!         stack.set_voxel(x, y, 0, 0, 0, 255.0).unwrap();
//!     }
//! }
//!
//! let config = AnalysisConfig {
//!     reconstruction: ReconstructionConfig {
//!         min_size: MinSize::Voxels(4),
//!         border_exclusion: BorderExclusion::None,
//!         ..ReconstructionConfig::default()
//!     },
//!     surrounding: None,
//! };
//! let analysis = analyze(&mut stack, &config, &NoProgress).unwrap();
//! assert_eq!(analysis.regions.len(), 1);
//!
//! let rows = build_rows(&analysis.regions, &analysis.reference);
//! assert_eq!(rows[0].voxel_count, 16);
//! ```

pub mod analyze;
pub mod cell;
pub mod error;
pub mod report;
pub mod stats;
pub mod surround;

// Re-export member crates
pub use cellquant_core;
pub use cellquant_region;

// Re-export error types
pub use error::{MetricsError, MetricsResult};

// Re-export quantification types and functions
pub use analyze::{Analysis, AnalysisConfig, analyze};
pub use cell::CellRegion;
pub use report::{LabelAnchor, ReportRow, build_rows, label_anchors};
pub use stats::{ChannelStats, SurroundingStats};
pub use surround::{SurroundingConfig, SurroundingMetrics};
