//! High-level plate analysis API.
//!
//! [`Analyzer`] wraps an [`AnalysisConfig`] and runs the full pipeline on a
//! plate image: cut points, lane segmentation, then per-lane profile, peak
//! search, baseline validation and metrics. Lanes are independent and are
//! processed in parallel.

use image::GrayImage;
use rayon::prelude::*;

use crate::analysis::peak_search::search_areas;
use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::geometry::Interval;
use crate::grid::IntensityGrid;
use crate::preprocess;
use crate::profile::{compute_profile, ScanAxis};
use crate::sample::Sample;
use crate::segmentation::cut_points::{locate_cut_points, CutBox};
use crate::segmentation::lanes::segment_lanes;

/// Result of analyzing one plate image.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct PlateAnalysis {
    /// Image size as `[width, height]`.
    pub image_size: [u32; 2],
    /// Active plate rectangle in image pixels.
    pub cut: CutBox,
    /// One entry per lane, ordered along the lane axis.
    pub samples: Vec<Sample>,
}

/// Primary analysis interface.
///
/// Create once, analyze many plates.
///
/// # Examples
///
/// ```no_run
/// use densito::Analyzer;
/// use image::GrayImage;
///
/// let analyzer = Analyzer::new();
/// let plate = GrayImage::new(800, 600);
/// let result = analyzer.analyze(&plate).expect("analysis");
/// println!("{} lanes", result.samples.len());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Analyzer {
    config: AnalysisConfig,
}

impl Analyzer {
    /// Analyzer with default tunables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with full config control.
    pub fn with_config(config: AnalysisConfig) -> Self {
        Self { config }
    }

    /// Access the current configuration.
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Mutable access to configuration for post-construction tuning.
    pub fn config_mut(&mut self) -> &mut AnalysisConfig {
        &mut self.config
    }

    /// Run the full pipeline on a grayscale plate image.
    pub fn analyze(&self, image: &GrayImage) -> Result<PlateAnalysis> {
        let cfg = &self.config;
        let (width, height) = image.dimensions();

        let cut_grid = preprocess::cut_point_grid(image, cfg.preprocess.cut_blur_sigma)?;
        let cut = locate_cut_points(&cut_grid, &cfg.cut_points)?;
        tracing::info!(
            "plate {}x{}: active area {:?}..={:?}",
            width,
            height,
            cut.top_left,
            cut.bottom_right
        );

        let lane_grid = if cfg.preprocess.lane_blur_sigma == cfg.preprocess.cut_blur_sigma {
            cut_grid
        } else {
            preprocess::lane_grid(image, cfg.preprocess.lane_blur_sigma)?
        };
        let lanes = segment_lanes(&cut.crop(&lane_grid), &cfg.lanes)?;
        tracing::info!("{} lanes", lanes.len());

        let plate = cut.crop(&preprocess::profile_grid(
            image,
            cfg.preprocess.profile_blur_sigma,
        ));
        let samples = self.analyze_lanes(&plate, &lanes)?;

        Ok(PlateAnalysis {
            image_size: [width, height],
            cut,
            samples,
        })
    }

    /// Profile and analyze each lane of an already cropped profile grid.
    pub fn analyze_lanes(&self, plate: &IntensityGrid, lanes: &[Interval]) -> Result<Vec<Sample>> {
        let lanes: Vec<Interval> = lanes
            .iter()
            .copied()
            .filter(|l| {
                let keep = l.width() >= 1.0;
                if !keep {
                    tracing::debug!(lane = ?l, "zero-width lane skipped");
                }
                keep
            })
            .collect();

        lanes
            .par_iter()
            .enumerate()
            .map(|(i, &lane)| self.analyze_sample(plate, lane, format!("S{}", i + 1)))
            .collect()
    }

    /// Build one sample: crop its lane, extract the profile, find and measure peaks.
    pub fn analyze_sample(&self, plate: &IntensityGrid, lane: Interval, name: String) -> Result<Sample> {
        let cfg = &self.config;
        // lane ends are inclusive sample indices
        let lo = lane.start.max(0.0).floor() as u32;
        let hi = (lane.end.max(0.0).ceil() as u32).saturating_add(1);
        let strip = match cfg.lanes.axis {
            ScanAxis::Horizontal => plate.crop(lo, 0, hi, plate.height()),
            ScanAxis::Vertical => plate.crop(0, lo, plate.width(), hi),
        };

        let profile = compute_profile(&strip, cfg.profile.axis, cfg.profile.inverted, cfg.profile.relative)?;
        let seed_point = cfg.profile.axis.len(&strip) as f64;
        let areas = search_areas(&profile, &cfg.peaks);

        let mut sample = Sample::new(name, lane, 0.0, seed_point, profile);
        sample.set_peak_limits(&areas, &cfg.baseline);
        tracing::debug!(
            sample = %sample.name,
            peaks = sample.peaks().len(),
            total = sample.total_surface(),
            "sample analyzed"
        );
        Ok(sample)
    }
}
