//! Intervals and straight-line chord primitives.
//!
//! Chords through two profile samples serve as the zero reference for
//! baseline detection, area integration and height measurement. A chord
//! with coincident abscissae is a modeling impossibility rather than
//! corrupted state, so the free functions degrade to `0` and log instead of
//! failing.

use std::cmp::Ordering;

/// Closed interval `[start, end]` in profile position units.
#[derive(Debug, Clone, Copy, PartialEq, Default, serde::Serialize, serde::Deserialize)]
pub struct Interval {
    pub start: f64,
    pub end: f64,
}

impl Interval {
    /// Build an interval, swapping the endpoints if needed so `start <= end`.
    pub fn new(a: f64, b: f64) -> Self {
        if b < a {
            Self { start: b, end: a }
        } else {
            Self { start: a, end: b }
        }
    }

    /// `end - start`.
    #[inline]
    pub fn width(&self) -> f64 {
        self.end - self.start
    }

    /// Whether `x` lies inside the closed interval.
    #[inline]
    pub fn contains(&self, x: f64) -> bool {
        x >= self.start && x <= self.end
    }

    /// Whether `next` starts strictly before this interval ends.
    #[inline]
    pub fn intersects_next(&self, next: &Interval) -> bool {
        next.start < self.end
    }

    /// Smallest interval covering both.
    pub fn cover(&self, other: &Interval) -> Interval {
        Interval {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Ordering by start, then end. NaN sorts as equal.
    pub fn cmp_by_start(a: &Interval, b: &Interval) -> Ordering {
        a.start
            .partial_cmp(&b.start)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.end.partial_cmp(&b.end).unwrap_or(Ordering::Equal))
    }
}

/// Straight line `y = slope * x + intercept` through two points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Chord {
    pub slope: f64,
    pub intercept: f64,
}

/// Outcome of fitting a chord through two points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ChordFit {
    /// Well-defined line.
    Line(Chord),
    /// Both points share the same abscissa.
    Degenerate,
}

impl ChordFit {
    /// Evaluate at `x`, falling back to a flat zero line when degenerate.
    pub fn eval_or_flat(&self, x: f64) -> f64 {
        match self {
            Self::Line(c) => c.eval(x),
            Self::Degenerate => 0.0,
        }
    }
}

impl Chord {
    /// Chord through `(x1, y1)` and `(x2, y2)`.
    pub fn through(x1: f64, y1: f64, x2: f64, y2: f64) -> ChordFit {
        if x1 == x2 {
            return ChordFit::Degenerate;
        }
        let slope = (y2 - y1) / (x2 - x1);
        ChordFit::Line(Chord {
            slope,
            intercept: y1 - slope * x1,
        })
    }

    /// Value of the line at `x`.
    #[inline]
    pub fn eval(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Slope of the chord through `(x1, y1)` and `(x2, y2)`.
///
/// Returns `0` and logs when `x1 == x2`.
pub fn line_slope(x1: f64, x2: f64, y1: f64, y2: f64) -> f64 {
    match Chord::through(x1, y1, x2, y2) {
        ChordFit::Line(c) => c.slope,
        ChordFit::Degenerate => {
            tracing::warn!(x = x1, "degenerate chord: cannot compute slope of a vertical line");
            0.0
        }
    }
}

/// Value at `x` of the chord through `(x1, y1)` and `(x2, y2)`.
///
/// Returns `0` and logs when `x1 == x2`.
pub fn line_eval(x1: f64, x2: f64, y1: f64, y2: f64, x: f64) -> f64 {
    match Chord::through(x1, y1, x2, y2) {
        ChordFit::Line(c) => c.eval(x),
        ChordFit::Degenerate => {
            tracing::warn!(x = x1, "degenerate chord: cannot evaluate a vertical line");
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn flat_chord_evaluates_to_zero() {
        assert_eq!(line_eval(0.0, 4.0, 0.0, 0.0, 2.0), 0.0);
    }

    #[test]
    fn vertical_chord_degrades_to_zero() {
        assert_eq!(line_eval(0.0, 0.0, 0.0, 10.0, 5.0), 0.0);
        assert_eq!(line_slope(3.0, 3.0, 1.0, 2.0), 0.0);
        assert_eq!(Chord::through(1.0, 0.0, 1.0, 5.0), ChordFit::Degenerate);
    }

    #[test]
    fn sloped_chord_interpolates() {
        assert_abs_diff_eq!(line_eval(2.0, 6.0, 10.0, 30.0, 4.0), 20.0, epsilon = 1e-12);
        assert_abs_diff_eq!(line_slope(2.0, 6.0, 10.0, 30.0), 5.0, epsilon = 1e-12);
        let fit = Chord::through(0.0, 1.0, 2.0, 5.0);
        assert_abs_diff_eq!(fit.eval_or_flat(1.0), 3.0, epsilon = 1e-12);
        assert_eq!(ChordFit::Degenerate.eval_or_flat(1.0), 0.0);
    }

    #[test]
    fn interval_normalizes_and_covers() {
        let a = Interval::new(5.0, 2.0);
        assert_eq!(a, Interval { start: 2.0, end: 5.0 });
        let b = Interval::new(4.0, 9.0);
        assert!(a.intersects_next(&b));
        assert_eq!(a.cover(&b), Interval { start: 2.0, end: 9.0 });
        assert!(a.contains(5.0) && !a.contains(5.1));
    }
}
