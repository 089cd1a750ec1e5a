//! Greedy band search over a lane profile.
//!
//! Each iteration takes the strongest remaining maximum, walks outwards to
//! the inflection on either side, records the interval and erases it from a
//! private working copy. Bands in this domain rise more sharply than they
//! trail, so the leading side uses a stricter slope threshold than the
//! trailing side.
//!
//! All slopes are measured in value units per sample index.

use crate::geometry::{line_slope, Interval};
use crate::profile::Profile;

/// Peak search tunables.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PeakSearchConfig {
    /// Maximum number of extraction iterations.
    pub max_iterations: usize,
    /// Stop once the remaining global maximum is at or below this value.
    pub min_peak_height: f64,
    /// Coarse inflection slope on the leading (left) side.
    pub leading_slope: f64,
    /// Coarse inflection slope on the trailing (right) side.
    pub trailing_slope: f64,
    /// Flatness slope used to refine each bound toward the apex.
    pub refine_slope: f64,
    /// Intervals narrower than this many samples are discarded.
    pub min_width: usize,
}

impl Default for PeakSearchConfig {
    fn default() -> Self {
        Self {
            max_iterations: 10,
            min_peak_height: 30.0,
            leading_slope: 0.05,
            trailing_slope: 0.3,
            refine_slope: 0.075,
            min_width: 10,
        }
    }
}

/// Index of the first global maximum.
fn argmax(values: &[f64]) -> Option<(usize, f64)> {
    values
        .iter()
        .copied()
        .enumerate()
        .fold(None, |best, (i, v)| match best {
            Some((_, bv)) if bv >= v => best,
            _ => Some((i, v)),
        })
}

/// Walk from `apex` in direction `step` (±1) and return the index of the
/// running minimum at the first inflection.
fn inflection(values: &[f64], apex: usize, step: isize, slope_threshold: f64) -> usize {
    let n = values.len() as isize;
    let mut min_val = values[apex];
    let mut min_idx = apex;
    let mut k = apex as isize + step;

    while k >= 0 && k < n {
        let v = values[k as usize];
        if v < min_val {
            min_val = v;
            min_idx = k as usize;
        } else {
            let (before, after) = (k - 1, k + 1);
            if before >= 0 && after < n {
                let yb = values[before as usize];
                let ya = values[after as usize];
                if yb > min_val
                    && ya > min_val
                    && line_slope(before as f64, after as f64, yb, ya).abs() > slope_threshold
                {
                    break;
                }
            }
        }
        k += step;
    }
    min_idx
}

/// Last index from the inflection `min_idx` toward `apex` whose chord from
/// the minimum is no steeper than `slope_threshold`. `min_idx` if none is.
fn refine_bound(values: &[f64], min_idx: usize, apex: usize, slope_threshold: f64) -> usize {
    let flat = |k: usize| {
        line_slope(min_idx as f64, k as f64, values[min_idx], values[k]).abs() <= slope_threshold
    };
    let found = if apex > min_idx {
        (min_idx + 1..=apex).rev().find(|&k| flat(k))
    } else {
        (apex..min_idx).find(|&k| flat(k))
    };
    found.unwrap_or(min_idx)
}

/// Sort and merge intersecting neighbours until stable.
fn merge_intersecting(mut spans: Vec<(usize, usize)>) -> Vec<(usize, usize)> {
    spans.sort_unstable();
    loop {
        let mut merged = false;
        let mut out: Vec<(usize, usize)> = Vec::with_capacity(spans.len());
        let mut i = 0;
        while i < spans.len() {
            let cur = spans[i];
            if let Some(&next) = spans.get(i + 1) {
                if next.0 < cur.1 {
                    out.push((cur.0.min(next.0), cur.1.max(next.1)));
                    merged = true;
                    i += 2;
                    continue;
                }
            }
            out.push(cur);
            i += 1;
        }
        out.sort_unstable();
        spans = out;
        if !merged {
            return spans;
        }
    }
}

/// Candidate band intervals in the profile's own position units.
///
/// Returns at most `max_iterations` intervals, each at least `min_width`
/// samples wide, sorted by start and pairwise non-intersecting.
pub fn search_areas(profile: &Profile, cfg: &PeakSearchConfig) -> Vec<Interval> {
    let n = profile.len();
    if n == 0 {
        return Vec::new();
    }
    let mut work = profile.values();
    let mut spans: Vec<(usize, usize)> = Vec::new();

    for iter in 0..cfg.max_iterations {
        let Some((apex, apex_val)) = argmax(&work) else {
            break;
        };
        if apex_val <= cfg.min_peak_height {
            tracing::debug!(iter, apex_val, "remaining maximum below peak threshold");
            break;
        }

        let left_min = inflection(&work, apex, -1, cfg.leading_slope);
        let left = refine_bound(&work, left_min, apex, cfg.refine_slope);
        let right_min = inflection(&work, apex, 1, cfg.trailing_slope);
        let right = refine_bound(&work, right_min, apex, cfg.refine_slope);

        let lo = (left + 1).min(n - 1);
        let hi = right.saturating_sub(1);
        let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
        spans.push((lo, hi));

        // Always erase the apex so the next iteration makes progress.
        for v in &mut work[lo.min(apex)..=hi.max(apex)] {
            *v = 0.0;
        }
        tracing::trace!(iter, apex, lo, hi, "peak candidate");
    }

    let before = spans.len();
    spans.retain(|&(lo, hi)| hi - lo >= cfg.min_width);
    if spans.len() < before {
        tracing::debug!("{} narrow peak candidates discarded", before - spans.len());
    }

    merge_intersecting(spans)
        .into_iter()
        .map(|(lo, hi)| Interval::new(profile.position(lo), profile.position(hi)))
        .collect()
}
