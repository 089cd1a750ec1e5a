//! 1-D intensity profiles extracted from an [`IntensityGrid`].
//!
//! A profile holds one `(position, value)` pair per grid line along the scan
//! axis. Positions are always strictly increasing; an inverted scan only
//! changes which grid line lands at which position.

use std::fmt::Write as _;
use std::str::FromStr;

use crate::error::{AnalysisError, Result};
use crate::grid::{GridKind, IntensityGrid};

/// Direction along which a profile is sampled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanAxis {
    /// One value per row (mean across columns); length = grid height.
    Vertical,
    /// One value per column (mean across rows); length = grid width.
    Horizontal,
}

impl ScanAxis {
    /// Number of profile samples for `grid` along this axis.
    pub fn len(self, grid: &IntensityGrid) -> usize {
        match self {
            Self::Vertical => grid.height() as usize,
            Self::Horizontal => grid.width() as usize,
        }
    }

    /// The perpendicular axis.
    pub fn other(self) -> Self {
        match self {
            Self::Vertical => Self::Horizontal,
            Self::Horizontal => Self::Vertical,
        }
    }
}

impl TryFrom<u8> for ScanAxis {
    type Error = AnalysisError;

    fn try_from(code: u8) -> Result<Self> {
        match code {
            0 => Ok(Self::Vertical),
            1 => Ok(Self::Horizontal),
            other => Err(AnalysisError::invalid(
                "axis",
                format!("unsupported axis code {}", other),
            )),
        }
    }
}

impl FromStr for ScanAxis {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "vertical" | "v" | "rows" => Ok(Self::Vertical),
            "horizontal" | "h" | "columns" => Ok(Self::Horizontal),
            other => Err(AnalysisError::invalid(
                "axis",
                format!("unsupported axis `{}`", other),
            )),
        }
    }
}

/// One profile sample. Non-finite coordinates serialize as JSON `null`.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ProfilePoint {
    #[serde(deserialize_with = "f64_or_nan")]
    pub position: f64,
    #[serde(deserialize_with = "f64_or_nan")]
    pub value: f64,
}

fn f64_or_nan<'de, D>(d: D) -> std::result::Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::Deserialize;
    Ok(Option::<f64>::deserialize(d)?.unwrap_or(f64::NAN))
}

impl ProfilePoint {
    /// `(NaN, NaN)` marker for "no such point".
    pub const NAN: ProfilePoint = ProfilePoint {
        position: f64::NAN,
        value: f64::NAN,
    };

    pub fn new(position: f64, value: f64) -> Self {
        Self { position, value }
    }

    /// Whether both coordinates are finite.
    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.value.is_finite()
    }
}

/// Ordered intensity profile.
#[derive(Debug, Clone, PartialEq, Default, serde::Serialize, serde::Deserialize)]
pub struct Profile {
    points: Vec<ProfilePoint>,
}

impl Profile {
    /// Build from points, sorting them by position.
    pub fn from_points(mut points: Vec<ProfilePoint>) -> Self {
        points.sort_by(|a, b| a.position.total_cmp(&b.position));
        Self { points }
    }

    /// Profile with positions `0, 1, .., N-1`.
    pub fn from_values(values: &[f64]) -> Self {
        Self {
            points: values
                .iter()
                .enumerate()
                .map(|(i, &v)| ProfilePoint::new(i as f64, v))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[ProfilePoint] {
        &self.points
    }

    /// Copy of the sample values in position order.
    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }

    /// Value at sample index `i`.
    #[inline]
    pub fn value(&self, i: usize) -> f64 {
        self.points[i].value
    }

    /// Position at sample index `i`.
    #[inline]
    pub fn position(&self, i: usize) -> f64 {
        self.points[i].position
    }

    /// Position of the final sample (the domain maximum), `0` when empty.
    pub fn max_position(&self) -> f64 {
        self.points.last().map(|p| p.position).unwrap_or(0.0)
    }

    /// Nearest sample index for position `x`: `round((N-1) * x / maxPosition)`.
    ///
    /// Clamped to `[0, N-1]`; returns `0` for an empty or zero-length domain.
    pub fn index_of(&self, x: f64) -> usize {
        let n = self.points.len();
        let max_pos = self.max_position();
        if n < 2 || max_pos <= 0.0 || !x.is_finite() {
            return 0;
        }
        let idx = ((n - 1) as f64 * x / max_pos).round();
        idx.clamp(0.0, (n - 1) as f64) as usize
    }

    /// Serialize as `position\tvalue` lines.
    pub fn to_tsv(&self) -> String {
        let mut out = String::with_capacity(self.points.len() * 16);
        for p in &self.points {
            let _ = writeln!(out, "{}\t{}", p.position, p.value);
        }
        out
    }

    /// Parse `position\tvalue` lines. Blank lines are skipped.
    pub fn from_tsv(text: &str) -> Result<Self> {
        let mut points = Vec::new();
        for (i, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let mut fields = line.split('\t');
            let (Some(pos), Some(val), None) = (fields.next(), fields.next(), fields.next()) else {
                return Err(AnalysisError::ProfileFormat {
                    line: i + 1,
                    reason: "expected exactly two tab-separated fields".to_string(),
                });
            };
            let parse = |s: &str| {
                s.trim().parse::<f64>().map_err(|e| AnalysisError::ProfileFormat {
                    line: i + 1,
                    reason: e.to_string(),
                })
            };
            points.push(ProfilePoint::new(parse(pos)?, parse(val)?));
        }
        Ok(Self::from_points(points))
    }
}

/// Sum of grid values along scan line `line`.
fn line_sum(grid: &IntensityGrid, axis: ScanAxis, line: usize) -> u64 {
    match axis {
        ScanAxis::Vertical => grid.row(line as u32).iter().map(|&v| v as u64).sum(),
        ScanAxis::Horizontal => (0..grid.height())
            .map(|y| grid.value(line as u32, y) as u64)
            .sum(),
    }
}

fn check_non_empty(grid: &IntensityGrid) -> Result<()> {
    if grid.width() == 0 || grid.height() == 0 {
        return Err(AnalysisError::EmptyGrid {
            width: grid.width(),
            height: grid.height(),
        });
    }
    Ok(())
}

/// Mean intensity per grid line along `axis`.
///
/// `inverted` mirrors the scan (line `N-1-i` is reported at position `i`).
/// `relative` rescales positions to `i / (N-1)`.
pub fn compute_profile(
    grid: &IntensityGrid,
    axis: ScanAxis,
    inverted: bool,
    relative: bool,
) -> Result<Profile> {
    check_non_empty(grid)?;
    let n = axis.len(grid);
    let across = axis.other().len(grid) as f64;
    let denom = if n > 1 { (n - 1) as f64 } else { 1.0 };

    let points = (0..n)
        .map(|i| {
            let line = if inverted { n - 1 - i } else { i };
            let mean = line_sum(grid, axis, line) as f64 / across;
            let position = if relative { i as f64 / denom } else { i as f64 };
            ProfilePoint::new(position, mean)
        })
        .collect();
    Ok(Profile { points })
}

/// Binary "on/off" profile: `(index, 1)` where a line has any set pixel.
///
/// Requires a [`GridKind::Binary`] grid.
pub fn compute_crush(grid: &IntensityGrid, axis: ScanAxis, inverted: bool) -> Result<Vec<(i64, i64)>> {
    if grid.kind() != GridKind::Binary {
        return Err(AnalysisError::invalid(
            "grid",
            "crush profile requires a binarized single-channel grid",
        ));
    }
    check_non_empty(grid)?;
    let n = axis.len(grid);
    Ok((0..n)
        .map(|i| {
            let line = if inverted { n - 1 - i } else { i };
            let on = line_sum(grid, axis, line) > 0;
            (i as i64, on as i64)
        })
        .collect())
}
