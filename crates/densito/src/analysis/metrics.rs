//! Per-peak measurements: surface, maximum, height and relative composition.
//!
//! Positions are mapped to sample indices with [`Profile::index_of`], the
//! same mapping the baseline validator uses.

use crate::geometry::{Chord, ChordFit};
use crate::profile::{Profile, ProfilePoint};
use crate::sample::{Peak, Sample};

/// Chord between the curve values at the mapped endpoints of a segment.
fn segment_chord(profile: &Profile, i: usize, j: usize) -> ChordFit {
    Chord::through(i as f64, profile.value(i), j as f64, profile.value(j))
}

/// Area between the curve and the chord of every baseline segment.
///
/// Per-sample differences below zero are clamped to zero. Zero-width
/// segments (including the empty-baseline sentinel) contribute nothing.
pub fn integrate_peak(sample: &Sample, peak: &Peak) -> f64 {
    let profile = sample.profile();
    if profile.is_empty() {
        return 0.0;
    }

    let mut surface = 0.0;
    let mut clamped = 0usize;
    for seg in &peak.baseline {
        let i = profile.index_of(seg.start);
        let j = profile.index_of(seg.end);
        let (i, j) = if i <= j { (i, j) } else { (j, i) };
        let chord = match segment_chord(profile, i, j) {
            ChordFit::Line(c) => c,
            ChordFit::Degenerate => continue,
        };
        for k in i..=j {
            let diff = profile.value(k) - chord.eval(k as f64);
            if diff < 0.0 {
                clamped += 1;
            } else {
                surface += diff;
            }
        }
    }

    if clamped > 0 {
        tracing::warn!(
            peak = %peak.name,
            clamped,
            "curve below its baseline; negative area clamped to zero"
        );
    }
    surface
}

/// Highest point inside the peak limits.
///
/// Ties resolve to the middle of the tied indices, so flat-topped bands are
/// not biased toward their leading edge. `(NaN, NaN)` for an empty range.
pub fn compute_maximum(sample: &Sample, peak: &Peak) -> ProfilePoint {
    let profile = sample.profile();
    if profile.is_empty() {
        return ProfilePoint::NAN;
    }
    let i = profile.index_of(peak.limits.start);
    let j = profile.index_of(peak.limits.end);
    let (i, j) = if i <= j { (i, j) } else { (j, i) };

    let max = (i..=j)
        .map(|k| profile.value(k))
        .fold(f64::NEG_INFINITY, f64::max);
    if !max.is_finite() {
        return ProfilePoint::NAN;
    }
    let ties: Vec<usize> = (i..=j).filter(|&k| profile.value(k) == max).collect();
    let k = ties[ties.len() / 2];
    ProfilePoint::new(profile.position(k), max)
}

/// Height of the maximum above the chord of the baseline segment holding it.
///
/// A negative height is clamped to zero. A segment collapsing to a single
/// sample (the `(0,0)` sentinel) has no chord and measures from `0`.
/// `(NaN, NaN)` when no baseline segment contains the maximum.
pub fn compute_height(sample: &Sample, peak: &Peak) -> ProfilePoint {
    let profile = sample.profile();
    let maximum = compute_maximum(sample, peak);
    if !maximum.is_finite() {
        return ProfilePoint::NAN;
    }

    let Some(seg) = peak.baseline.iter().find(|s| s.contains(maximum.position)) else {
        tracing::debug!(peak = %peak.name, "maximum outside every baseline segment");
        return ProfilePoint::NAN;
    };
    let i = profile.index_of(seg.start);
    let j = profile.index_of(seg.end);
    let x = profile.index_of(maximum.position) as f64;
    let base = match segment_chord(profile, i, j) {
        ChordFit::Line(c) => c.eval(x),
        ChordFit::Degenerate => {
            tracing::warn!(peak = %peak.name, index = i, "degenerate baseline chord; base taken as 0");
            0.0
        }
    };

    let height = maximum.value - base;
    if height < 0.0 {
        tracing::warn!(peak = %peak.name, height, "negative peak height clamped to zero");
        return ProfilePoint::new(maximum.position, 0.0);
    }
    ProfilePoint::new(maximum.position, height)
}

/// Peak surface as a percentage of the sample total. `0` when the total is `0`.
pub fn relativize_surface(sample: &Sample, peak: &Peak) -> f64 {
    let total = sample.total_surface();
    if total == 0.0 {
        if peak.surface != 0.0 {
            tracing::warn!(sample = %sample.name, "zero total surface; relative surface set to 0");
        }
        return 0.0;
    }
    peak.surface / total * 100.0
}

/// Σ of the sample's peak surfaces.
pub fn compute_total_surface(sample: &Sample) -> f64 {
    sample.peaks().iter().map(|p| p.surface).sum()
}
