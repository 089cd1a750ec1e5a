//! densito — densitometry for thin-layer chromatography plate images.
//!
//! The pipeline stages are:
//!
//! 1. **Preprocess** – blur, invert and threshold the plate photograph.
//! 2. **Cut points** – locate the active plate rectangle.
//! 3. **Lanes** – segment the plate into sample lanes from a crushed profile.
//! 4. **Profile** – average each lane into a 1-D intensity profile.
//! 5. **Peaks** – greedy band search with slope-based inflection bounds.
//! 6. **Baseline** – keep the parts of each band above its endpoint chord.
//! 7. **Metrics** – surface, maximum, height and relative composition.
//!
//! # Public API
//! - [`Analyzer`] and [`AnalysisConfig`] as primary entry points
//! - stage functions and their configs for callers driving the pipeline
//!   step by step, or editing peaks by hand through [`Sample`]

pub mod analysis;
mod analyzer;
pub mod config;
mod error;
pub mod geometry;
mod grid;
pub mod preprocess;
pub mod profile;
mod sample;
pub mod segmentation;

#[cfg(test)]
pub(crate) mod test_utils;

pub use analysis::baseline::{validate_area, validate_areas, BaselineConfig, EMPTY_BASELINE};
pub use analysis::metrics::{
    compute_height, compute_maximum, compute_total_surface, integrate_peak, relativize_surface,
};
pub use analysis::peak_search::{search_areas, PeakSearchConfig};
pub use analyzer::{Analyzer, PlateAnalysis};
pub use config::{AnalysisConfig, PreprocessConfig, ProfileConfig};
pub use error::{AnalysisError, Result};
pub use geometry::{line_eval, line_slope, Chord, ChordFit, Interval};
pub use grid::{GridKind, IntensityGrid};
pub use profile::{compute_crush, compute_profile, Profile, ProfilePoint, ScanAxis};
pub use sample::{Peak, Sample};
pub use segmentation::cut_points::{locate_cut_points, CutBox, CutPointConfig};
pub use segmentation::lanes::{search_binary_areas, segment_lanes, validate_samples, LaneConfig};
