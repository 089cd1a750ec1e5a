//! Plate crop-box estimation from axis profiles.
//!
//! Expects a grid that was blurred, inverted and auto-thresholded, so the
//! background around the plate is bright and the plate interior dark.
//!
//! Pass 1 finds the plate silhouette: on each half of an axis profile the
//! innermost background sample marks the edge. Pass 2 re-profiles the
//! pass-1 crop and trims the residual noise band just inside the silhouette.

use crate::error::Result;
use crate::grid::IntensityGrid;
use crate::profile::{compute_profile, Profile, ScanAxis};

/// Thresholds for the two cut-point passes.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CutPointConfig {
    /// Pass-1 background level: profile values above it are outside the plate.
    pub background_threshold: f64,
    /// Pass-2 edge level: values below it are inside the plate.
    pub edge_threshold: f64,
    /// Inset applied after each pass, as a fraction of profile length.
    pub margin_fraction: f64,
    /// Run the refinement pass.
    pub refine: bool,
}

impl Default for CutPointConfig {
    fn default() -> Self {
        Self {
            background_threshold: 175.0,
            edge_threshold: 5.0,
            margin_fraction: 0.005,
            refine: true,
        }
    }
}

/// Active plate rectangle in absolute grid coordinates (inclusive corners).
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CutBox {
    /// `[x, y]` of the top-left corner.
    pub top_left: [u32; 2],
    /// `[x, y]` of the bottom-right corner.
    pub bottom_right: [u32; 2],
}

impl CutBox {
    /// Box covering the whole grid.
    pub fn full(grid: &IntensityGrid) -> Self {
        Self {
            top_left: [0, 0],
            bottom_right: [
                grid.width().saturating_sub(1),
                grid.height().saturating_sub(1),
            ],
        }
    }

    /// Width in pixels (inclusive corners).
    pub fn width(&self) -> u32 {
        self.bottom_right[0] - self.top_left[0] + 1
    }

    /// Height in pixels (inclusive corners).
    pub fn height(&self) -> u32 {
        self.bottom_right[1] - self.top_left[1] + 1
    }

    /// Crop `grid` to this box.
    pub fn crop(&self, grid: &IntensityGrid) -> IntensityGrid {
        grid.crop(
            self.top_left[0],
            self.top_left[1],
            self.bottom_right[0] + 1,
            self.bottom_right[1] + 1,
        )
    }
}

/// Edge pair `[lo, hi]` along one axis, in indices of the scanned profile.
type Span = [i64; 2];

fn margin(len: usize, fraction: f64) -> i64 {
    (len as f64 * fraction).round() as i64
}

/// Pass 1 on one axis profile.
fn silhouette_span(profile: &Profile, cfg: &CutPointConfig) -> Span {
    let n = profile.len();
    let half = n / 2;
    let mut lo = 0i64;
    let mut hi = n as i64 - 1;

    for i in 0..half {
        if profile.value(i) > cfg.background_threshold {
            lo = i as i64;
        }
    }
    if let Some(i) = (half..n).find(|&i| profile.value(i) > cfg.background_threshold) {
        hi = i as i64;
    }

    let m = margin(n, cfg.margin_fraction);
    [lo + m, hi - m]
}

/// Pass 2 on one axis profile of the pre-cropped grid: offsets of the first
/// interior sample from each end, or `0` where no edge is found.
fn interior_offsets(profile: &Profile, cfg: &CutPointConfig) -> [i64; 2] {
    let n = profile.len();
    let half = n / 2;

    let first_edge = |idx: &mut dyn Iterator<Item = usize>| -> Option<usize> {
        let mut edge = None;
        for i in idx {
            let v = profile.value(i);
            match edge {
                None if v < cfg.edge_threshold => edge = Some(i),
                Some(_) if v > cfg.edge_threshold => break,
                _ => {}
            }
        }
        edge
    };

    let lead = first_edge(&mut (0..half)).map_or(0, |i| i as i64);
    let trail = first_edge(&mut (half..n).rev()).map_or(0, |i| (n - 1 - i) as i64);
    [lead, trail]
}

fn span_to_box(x: Span, y: Span, grid: &IntensityGrid) -> Option<CutBox> {
    let max_x = grid.width() as i64 - 1;
    let max_y = grid.height() as i64 - 1;
    let x0 = x[0].clamp(0, max_x.max(0));
    let x1 = x[1].clamp(0, max_x.max(0));
    let y0 = y[0].clamp(0, max_y.max(0));
    let y1 = y[1].clamp(0, max_y.max(0));
    if x0 >= x1 || y0 >= y1 {
        return None;
    }
    Some(CutBox {
        top_left: [x0 as u32, y0 as u32],
        bottom_right: [x1 as u32, y1 as u32],
    })
}

/// Estimate the plate's active rectangle.
///
/// Falls back to the previous estimate (ultimately the whole grid) when a
/// pass produces an empty box.
pub fn locate_cut_points(grid: &IntensityGrid, cfg: &CutPointConfig) -> Result<CutBox> {
    let px = compute_profile(grid, ScanAxis::Horizontal, false, false)?;
    let py = compute_profile(grid, ScanAxis::Vertical, false, false)?;
    let sx = silhouette_span(&px, cfg);
    let sy = silhouette_span(&py, cfg);

    let Some(coarse) = span_to_box(sx, sy, grid) else {
        tracing::warn!(
            "cut points: silhouette pass produced an empty box {:?}/{:?}; using full grid",
            sx,
            sy
        );
        return Ok(CutBox::full(grid));
    };
    tracing::debug!(?coarse, "cut points after silhouette pass");

    if !cfg.refine {
        return Ok(coarse);
    }

    let inner = coarse.crop(grid);
    let px = compute_profile(&inner, ScanAxis::Horizontal, false, false)?;
    let py = compute_profile(&inner, ScanAxis::Vertical, false, false)?;
    let ox = interior_offsets(&px, cfg);
    let oy = interior_offsets(&py, cfg);
    let mx = margin(px.len(), cfg.margin_fraction);
    let my = margin(py.len(), cfg.margin_fraction);

    let x0 = coarse.top_left[0] as i64;
    let x1 = coarse.bottom_right[0] as i64;
    let y0 = coarse.top_left[1] as i64;
    let y1 = coarse.bottom_right[1] as i64;
    let refined = span_to_box(
        [x0 + ox[0] + mx, x1 - ox[1] - mx],
        [y0 + oy[0] + my, y1 - oy[1] - my],
        grid,
    );

    match refined {
        Some(b) => {
            tracing::debug!(cut = ?b, "cut points after refinement pass");
            Ok(b)
        }
        None => {
            tracing::warn!("cut points: refinement pass collapsed the box; keeping silhouette");
            Ok(coarse)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GridKind;
    use crate::test_utils::plate_silhouette;

    #[test]
    fn finds_dark_plate_on_bright_background() {
        // 400x300 grid, plate occupies x in [60, 339], y in [40, 259]
        let grid = plate_silhouette(400, 300, [60, 40], [339, 259], 4);
        let cut = locate_cut_points(&grid, &CutPointConfig::default()).expect("cut");

        assert!(cut.top_left[0] >= 60 && cut.top_left[0] <= 80, "{:?}", cut);
        assert!(cut.top_left[1] >= 40 && cut.top_left[1] <= 60, "{:?}", cut);
        assert!(cut.bottom_right[0] <= 339 && cut.bottom_right[0] >= 320, "{:?}", cut);
        assert!(cut.bottom_right[1] <= 259 && cut.bottom_right[1] >= 240, "{:?}", cut);
    }

    #[test]
    fn refinement_trims_noise_band() {
        let grid = plate_silhouette(400, 300, [60, 40], [339, 259], 4);
        let coarse = locate_cut_points(
            &grid,
            &CutPointConfig {
                refine: false,
                ..Default::default()
            },
        )
        .expect("cut");
        let fine = locate_cut_points(&grid, &CutPointConfig::default()).expect("cut");
        assert!(fine.top_left[0] > coarse.top_left[0]);
        assert!(fine.bottom_right[0] < coarse.bottom_right[0]);
        assert!(fine.top_left[1] > coarse.top_left[1]);
        assert!(fine.bottom_right[1] < coarse.bottom_right[1]);
    }

    #[test]
    fn uniform_grid_keeps_whole_extent_minus_margin() {
        let grid = IntensityGrid::from_raw(200, 100, vec![0; 200 * 100], GridKind::Gray)
            .expect("grid");
        let cut = locate_cut_points(&grid, &CutPointConfig::default()).expect("cut");
        // silhouette pass insets by 1px on both axes, refinement by 1px on x only
        assert_eq!(cut.top_left, [2, 1]);
        assert_eq!(cut.bottom_right, [197, 98]);
    }

    #[test]
    fn collapsed_box_falls_back_to_full_grid() {
        let grid = IntensityGrid::from_raw(1, 40, vec![255; 40], GridKind::Gray).expect("grid");
        let cut = locate_cut_points(&grid, &CutPointConfig::default()).expect("cut");
        assert_eq!(cut, CutBox::full(&grid));
    }

    #[test]
    fn bright_grid_yields_box_inside_grid() {
        let grid = IntensityGrid::from_raw(50, 40, vec![255; 50 * 40], GridKind::Gray)
            .expect("grid");
        let cut = locate_cut_points(&grid, &CutPointConfig::default()).expect("cut");
        assert!(cut.bottom_right[0] < 50 && cut.bottom_right[1] < 40);
        assert!(cut.width() >= 1 && cut.height() >= 1);
    }
}
