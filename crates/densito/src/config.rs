//! Tunable parameters for the whole plate pipeline.
//!
//! Every section carries `#[serde(default)]`, so a JSON file only needs the
//! fields it overrides.

use std::path::Path;

use crate::analysis::baseline::BaselineConfig;
use crate::analysis::peak_search::PeakSearchConfig;
use crate::error::Result;
use crate::profile::ScanAxis;
use crate::segmentation::cut_points::CutPointConfig;
use crate::segmentation::lanes::LaneConfig;

/// Blur strengths of the three preprocessing recipes.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PreprocessConfig {
    /// Gaussian sigma before thresholding for cut-point detection.
    pub cut_blur_sigma: f32,
    /// Gaussian sigma before thresholding for lane segmentation.
    pub lane_blur_sigma: f32,
    /// Gaussian sigma applied to the grid the lane profiles are read from.
    pub profile_blur_sigma: f32,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            cut_blur_sigma: 8.0,
            lane_blur_sigma: 8.0,
            profile_blur_sigma: 1.0,
        }
    }
}

/// How each lane profile is read.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ProfileConfig {
    /// Scan axis along the lane (perpendicular to the lane layout axis).
    pub axis: ScanAxis,
    /// Scan from the far edge (solvent front at position 0).
    pub inverted: bool,
    /// Report positions as retardation factors in `[0, 1]`.
    pub relative: bool,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            axis: ScanAxis::Vertical,
            inverted: true,
            relative: true,
        }
    }
}

/// Full analysis configuration.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub preprocess: PreprocessConfig,
    pub cut_points: CutPointConfig,
    pub lanes: LaneConfig,
    pub profile: ProfileConfig,
    pub peaks: PeakSearchConfig,
    pub baseline: BaselineConfig,
}

impl AnalysisConfig {
    /// Load from a JSON file; missing fields take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Write as pretty-printed JSON.
    pub fn to_json_file(&self, path: &Path) -> Result<()> {
        let text = serde_json::to_string_pretty(self)?;
        std::fs::write(path, text)?;
        Ok(())
    }
}
