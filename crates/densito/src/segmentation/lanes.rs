//! Lane segmentation from a crushed (binary on/off) profile.

use crate::error::Result;
use crate::geometry::Interval;
use crate::grid::IntensityGrid;
use crate::profile::{compute_crush, ScanAxis};

/// Lane segmentation parameters.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct LaneConfig {
    /// Axis along which lanes are laid out side by side.
    pub axis: ScanAxis,
    /// A run of "on" samples must be strictly longer than this to be a lane.
    pub min_run_length: usize,
    /// Symmetric expansion applied to each lane to recover cropped band edges.
    pub extend: f64,
}

impl Default for LaneConfig {
    fn default() -> Self {
        Self {
            axis: ScanAxis::Horizontal,
            min_run_length: 50,
            extend: 30.0,
        }
    }
}

/// Runs of `1` opened by a `0 → 1` and closed by a `1 → 0` transition.
///
/// Runs touching either end of the profile have no bounding transition and
/// are ignored. Returned intervals span the first to the last `1` sample and
/// are sorted by start.
pub fn search_binary_areas(binary: &[(i64, i64)], min_run_length: usize) -> Vec<Interval> {
    let mut lanes = Vec::new();
    let mut open: Option<i64> = None;

    for w in binary.windows(2) {
        let (_, prev) = w[0];
        let (idx, cur) = w[1];
        if prev == 0 && cur == 1 {
            open = Some(idx);
        } else if prev == 1 && cur == 0 {
            if let Some(start) = open.take() {
                let last = w[0].0;
                let len = (last - start + 1) as usize;
                if len > min_run_length {
                    lanes.push(Interval::new(start as f64, last as f64));
                } else {
                    tracing::debug!(start, len, "lane candidate too short; dropped");
                }
            }
        }
    }

    lanes.sort_by(Interval::cmp_by_start);
    lanes
}

/// Expand lanes, clamp them to the grid and make neighbours disjoint.
///
/// With no input lanes the whole grid extent becomes a single lane.
pub fn validate_samples(grid: &IntensityGrid, lanes: &[Interval], cfg: &LaneConfig) -> Vec<Interval> {
    let extent = cfg.axis.len(grid) as f64;
    if lanes.is_empty() {
        tracing::info!("no lanes found; using the whole plate as one sample");
        return vec![Interval::new(0.0, extent)];
    }

    let mut out: Vec<Interval> = lanes
        .iter()
        .map(|l| {
            Interval::new(
                (l.start - cfg.extend).clamp(0.0, extent),
                (l.end + cfg.extend).clamp(0.0, extent),
            )
        })
        .collect();
    out.sort_by(Interval::cmp_by_start);

    let mut i = 0;
    while i + 1 < out.len() {
        let (a, b) = (out[i], out[i + 1]);
        if b.end <= a.end {
            tracing::debug!(?a, ?b, "lane nested in its neighbour; dropped");
            out.remove(i + 1);
            continue;
        }
        if a.intersects_next(&b) {
            let shift = (a.end - b.start) / 2.0 + cfg.extend / 2.0;
            out[i].end = (a.end - shift).max(a.start);
            out[i + 1].start = (b.start + shift).min(b.end);
        }
        i += 1;
    }
    out
}

/// Crush `binary` along the lane axis and segment it into lanes.
pub fn segment_lanes(binary: &IntensityGrid, cfg: &LaneConfig) -> Result<Vec<Interval>> {
    let crush = compute_crush(binary, cfg.axis, false)?;
    let raw = search_binary_areas(&crush, cfg.min_run_length);
    tracing::debug!("{} raw lanes found", raw.len());
    Ok(validate_samples(binary, &raw, cfg))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GridKind;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn crush(bits: &[i64]) -> Vec<(i64, i64)> {
        bits.iter().enumerate().map(|(i, &b)| (i as i64, b)).collect()
    }

    fn runs(pattern: &[(usize, i64)]) -> Vec<i64> {
        pattern.iter().flat_map(|&(n, b)| std::iter::repeat(b).take(n)).collect()
    }

    fn blank(width: u32, height: u32) -> IntensityGrid {
        IntensityGrid::from_raw(width, height, vec![0; (width * height) as usize], GridKind::Binary)
            .expect("grid")
    }

    #[test]
    fn keeps_runs_longer_than_threshold() {
        let bits = runs(&[(10, 0), (60, 1), (20, 0), (50, 1), (5, 0), (51, 1), (3, 0)]);
        let lanes = search_binary_areas(&crush(&bits), 50);
        assert_eq!(
            lanes,
            vec![Interval::new(10.0, 69.0), Interval::new(145.0, 195.0)]
        );
    }

    #[test]
    fn open_ended_runs_are_ignored() {
        let bits = runs(&[(80, 1), (10, 0), (80, 1)]);
        assert!(search_binary_areas(&crush(&bits), 50).is_empty());
    }

    #[test]
    fn empty_lane_list_becomes_whole_grid() {
        let lanes = validate_samples(&blank(320, 10), &[], &LaneConfig::default());
        assert_eq!(lanes, vec![Interval::new(0.0, 320.0)]);
    }

    #[test]
    fn expansion_is_clamped_to_grid() {
        let grid = blank(300, 10);
        let lanes = validate_samples(
            &grid,
            &[Interval::new(10.0, 80.0), Interval::new(200.0, 290.0)],
            &LaneConfig::default(),
        );
        assert_eq!(lanes[0], Interval::new(0.0, 110.0));
        assert_eq!(lanes[1], Interval::new(170.0, 300.0));
    }

    #[test]
    fn lanes_past_the_grid_collapse_onto_its_edge() {
        let grid = blank(300, 10);
        let lanes = validate_samples(
            &grid,
            &[Interval::new(100.0, 150.0), Interval::new(350.0, 380.0)],
            &LaneConfig::default(),
        );
        assert_eq!(lanes, vec![Interval::new(70.0, 180.0), Interval::new(300.0, 300.0)]);
        for l in &lanes {
            assert!(l.start <= l.end, "{:?}", l);
            assert!(l.start >= 0.0 && l.end <= 300.0, "{:?}", l);
        }
    }

    #[test]
    fn overlapping_neighbours_are_split() {
        let grid = blank(400, 10);
        let cfg = LaneConfig::default();
        // gap of 20 becomes an overlap of 40 after expansion
        let lanes = validate_samples(
            &grid,
            &[Interval::new(100.0, 170.0), Interval::new(190.0, 260.0)],
            &cfg,
        );
        assert_eq!(lanes.len(), 2);
        assert_eq!(lanes[0].end, 200.0 - 20.0 - 15.0);
        assert_eq!(lanes[1].start, 160.0 + 20.0 + 15.0);
        assert!(!lanes[0].intersects_next(&lanes[1]));
    }

    #[test]
    fn validated_lanes_never_overlap() {
        let mut rng = StdRng::seed_from_u64(7);
        let grid = blank(2000, 4);
        for _ in 0..50 {
            let mut bits = Vec::with_capacity(2000);
            while bits.len() < 2000 {
                let len = rng.gen_range(5..120);
                let b = rng.gen_range(0..2);
                bits.extend(std::iter::repeat(b).take(len));
            }
            bits.truncate(2000);
            let raw = search_binary_areas(&crush(&bits), 50);
            let lanes = validate_samples(&grid, &raw, &LaneConfig::default());
            assert!(!lanes.is_empty());
            for w in lanes.windows(2) {
                assert!(!w[0].intersects_next(&w[1]), "{:?}", w);
            }
            for l in &lanes {
                assert!(l.start <= l.end && l.start >= 0.0 && l.end <= 2000.0);
            }
        }
    }

    #[test]
    fn segment_lanes_rejects_gray_grid() {
        let gray = IntensityGrid::from_raw(4, 4, vec![7; 16], GridKind::Gray).expect("grid");
        assert!(segment_lanes(&gray, &LaneConfig::default()).is_err());
    }
}
