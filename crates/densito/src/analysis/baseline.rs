//! Baseline validation: where does the curve sit above its chord?
//!
//! For each candidate interval a straight chord joins the curve values at
//! the interval endpoints. The sub-intervals where the curve lies on or
//! above that chord are the regions that actually hold band material.

use crate::geometry::{Chord, ChordFit, Interval};
use crate::profile::Profile;

/// Baseline validation tunables.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BaselineConfig {
    /// Segments narrower than this fraction of the profile domain are dropped.
    pub min_width_fraction: f64,
}

impl Default for BaselineConfig {
    fn default() -> Self {
        Self {
            min_width_fraction: 0.025,
        }
    }
}

/// Sentinel returned when no segment survives.
pub const EMPTY_BASELINE: Interval = Interval {
    start: 0.0,
    end: 0.0,
};

/// Raw above-chord segments of one candidate, in sample indices.
fn segments_above_chord(profile: &Profile, i: usize, j: usize, out: &mut Vec<(usize, usize)>) {
    let chord = match Chord::through(i as f64, profile.value(i), j as f64, profile.value(j)) {
        ChordFit::Line(c) => c,
        ChordFit::Degenerate => return,
    };

    let mut open: Option<usize> = None;
    for k in i..=j {
        let c = chord.eval(k as f64);
        let v = profile.value(k);
        match open {
            None if c <= v => open = Some(k),
            Some(s) if c >= v || k == j => {
                out.push((s, k));
                open = None;
            }
            _ => {}
        }
    }
}

/// Above-chord baseline segments for a batch of candidate intervals.
///
/// An empty `intervals` slice means the whole profile domain. Never returns
/// an empty list: when nothing survives the width filter the single
/// [`EMPTY_BASELINE`] sentinel is returned.
pub fn validate_areas(profile: &Profile, intervals: &[Interval], cfg: &BaselineConfig) -> Vec<Interval> {
    if profile.is_empty() {
        return vec![EMPTY_BASELINE];
    }
    let whole = [Interval::new(0.0, profile.max_position())];
    let candidates = if intervals.is_empty() { &whole[..] } else { intervals };

    let mut raw = Vec::new();
    for iv in candidates {
        let i = profile.index_of(iv.start);
        let j = profile.index_of(iv.end);
        if i == j {
            tracing::debug!(?iv, "candidate maps to a single sample; skipped");
            continue;
        }
        let (i, j) = if i < j { (i, j) } else { (j, i) };
        segments_above_chord(profile, i, j, &mut raw);
    }

    let min_width = cfg.min_width_fraction * profile.max_position();
    let segments: Vec<Interval> = raw
        .into_iter()
        .map(|(s, e)| Interval::new(profile.position(s), profile.position(e)))
        .filter(|seg| seg.width() >= min_width)
        .collect();

    if segments.is_empty() {
        tracing::debug!("no baseline segment survived the width filter");
        return vec![EMPTY_BASELINE];
    }
    segments
}

/// Single-interval form of [`validate_areas`], used for a peak's own limits.
pub fn validate_area(profile: &Profile, limits: Interval, cfg: &BaselineConfig) -> Vec<Interval> {
    validate_areas(profile, std::slice::from_ref(&limits), cfg)
}
