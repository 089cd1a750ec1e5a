//! Lane and band entities with their recompute lifecycle.
//!
//! A [`Sample`] owns its profile and peaks. Whenever a peak's limits change
//! its baseline is re-validated, and whenever limits or baseline change the
//! peak metrics and the sample-wide surfaces are recomputed. Relative
//! surfaces are only computed after every peak surface of the sample is
//! known.

use crate::analysis::baseline::{validate_area, BaselineConfig};
use crate::analysis::metrics::{
    compute_height, compute_maximum, compute_total_surface, integrate_peak, relativize_surface,
};
use crate::geometry::Interval;
use crate::profile::{Profile, ProfilePoint};

/// One chromatographic band inside a lane.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Peak {
    /// Display name.
    pub name: String,
    /// 1-based ordinal inside the owning sample.
    pub position: usize,
    /// Integration limits in the owning profile's position units.
    pub limits: Interval,
    /// Sub-segments of `limits` where the curve sits above its chord.
    pub baseline: Vec<Interval>,
    pub maximum: ProfilePoint,
    pub height: ProfilePoint,
    /// Integrated area between curve and baseline.
    pub surface: f64,
    /// Share of the sample's total surface, in percent.
    pub relative_surface: f64,
}

impl Peak {
    /// Fresh peak with limits only; metrics are filled by [`Sample::refresh`].
    pub fn new(limits: Interval) -> Self {
        Self {
            name: String::new(),
            position: 0,
            limits,
            baseline: Vec::new(),
            maximum: ProfilePoint::NAN,
            height: ProfilePoint::NAN,
            surface: 0.0,
            relative_surface: 0.0,
        }
    }
}

/// One lane of the plate.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Sample {
    /// Display name.
    pub name: String,
    /// Lane extent along the plate's lane axis.
    pub limits: Interval,
    /// Secondary-axis crop bound at the solvent front.
    pub front_point: f64,
    /// Secondary-axis crop bound at the seed line.
    pub seed_point: f64,
    profile: Profile,
    peaks: Vec<Peak>,
    total_surface: f64,
}

impl Sample {
    pub fn new(
        name: impl Into<String>,
        limits: Interval,
        front_point: f64,
        seed_point: f64,
        profile: Profile,
    ) -> Self {
        Self {
            name: name.into(),
            limits,
            front_point,
            seed_point,
            profile,
            peaks: Vec::new(),
            total_surface: 0.0,
        }
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn peaks(&self) -> &[Peak] {
        &self.peaks
    }

    /// Σ of peak surfaces as of the last refresh.
    pub fn total_surface(&self) -> f64 {
        self.total_surface
    }

    /// Replace the profile. Existing peaks no longer apply and are dropped.
    pub fn set_profile(&mut self, profile: Profile) {
        self.profile = profile;
        self.peaks.clear();
        self.total_surface = 0.0;
    }

    /// Replace all peaks with fresh ones built from `limits`.
    pub fn set_peak_limits(&mut self, limits: &[Interval], cfg: &BaselineConfig) {
        self.peaks = limits.iter().copied().map(Peak::new).collect();
        self.refresh(cfg);
    }

    /// Add one manually drawn peak.
    pub fn add_peak(&mut self, limits: Interval, cfg: &BaselineConfig) {
        self.peaks.push(Peak::new(limits));
        self.refresh(cfg);
    }

    /// Remove the peak at `index`, if present.
    pub fn remove_peak(&mut self, index: usize, cfg: &BaselineConfig) -> Option<Peak> {
        if index >= self.peaks.len() {
            return None;
        }
        let removed = self.peaks.remove(index);
        self.refresh(cfg);
        Some(removed)
    }

    /// Move the limits of one peak; its baseline and all surfaces follow.
    pub fn update_peak_limits(&mut self, index: usize, limits: Interval, cfg: &BaselineConfig) -> bool {
        let Some(peak) = self.peaks.get_mut(index) else {
            return false;
        };
        peak.limits = limits;
        self.refresh(cfg);
        true
    }

    /// Override the baseline of one peak; metrics follow, the baseline is kept.
    pub fn update_peak_baseline(&mut self, index: usize, baseline: Vec<Interval>) -> bool {
        let Some(peak) = self.peaks.get_mut(index) else {
            return false;
        };
        peak.baseline = baseline;
        self.refresh_metrics();
        true
    }

    /// Re-validate every baseline, then recompute all metrics.
    pub fn refresh(&mut self, cfg: &BaselineConfig) {
        self.peaks.sort_by(|a, b| Interval::cmp_by_start(&a.limits, &b.limits));
        for peak in &mut self.peaks {
            peak.baseline = validate_area(&self.profile, peak.limits, cfg);
        }
        self.refresh_metrics();
    }

    /// Recompute metrics and surfaces from the current limits and baselines.
    pub fn refresh_metrics(&mut self) {
        for i in 0..self.peaks.len() {
            let (surface, maximum, height) = {
                let peak = &self.peaks[i];
                (
                    integrate_peak(self, peak),
                    compute_maximum(self, peak),
                    compute_height(self, peak),
                )
            };
            let peak = &mut self.peaks[i];
            peak.position = i + 1;
            peak.name = format!("{}-{}", self.name, i + 1);
            peak.surface = surface;
            peak.maximum = maximum;
            peak.height = height;
        }

        // relative surfaces need every peak surface first
        self.total_surface = compute_total_surface(self);
        for i in 0..self.peaks.len() {
            let rel = relativize_surface(self, &self.peaks[i]);
            self.peaks[i].relative_surface = rel;
        }
    }

    /// Install peaks with preset surfaces, bypassing the recompute.
    #[cfg(test)]
    pub(crate) fn with_surfaces(mut self, peaks: Vec<Peak>) -> Self {
        self.peaks = peaks;
        self.total_surface = compute_total_surface(&self);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::gaussian_profile;
    use approx::assert_abs_diff_eq;

    fn two_band_sample() -> Sample {
        let profile = gaussian_profile(300, &[(90.0, 8.0, 100.0), (210.0, 8.0, 50.0)], 2.0);
        Sample::new("S1", Interval::new(0.0, 80.0), 0.0, 300.0, profile)
    }

    #[test]
    fn lifecycle_fills_baseline_and_metrics() {
        let mut s = two_band_sample();
        let cfg = BaselineConfig::default();
        s.set_peak_limits(&[Interval::new(210.0 - 30.0, 240.0), Interval::new(60.0, 120.0)], &cfg);

        assert_eq!(s.peaks().len(), 2);
        // peaks are kept in limit order
        assert_eq!(s.peaks()[0].limits, Interval::new(60.0, 120.0));
        assert_eq!(s.peaks()[0].position, 1);
        assert_eq!(s.peaks()[1].name, "S1-2");
        assert_eq!(s.peaks()[0].maximum, ProfilePoint::new(90.0, 102.0));
        assert!(s.peaks()[0].surface > s.peaks()[1].surface);

        let sum: f64 = s.peaks().iter().map(|p| p.surface).sum();
        assert_abs_diff_eq!(s.total_surface(), sum, epsilon = 1e-9);
        let rel: f64 = s.peaks().iter().map(|p| p.relative_surface).sum();
        assert_abs_diff_eq!(rel, 100.0, epsilon = 1e-9);
    }

    #[test]
    fn moving_limits_updates_surfaces() {
        let mut s = two_band_sample();
        let cfg = BaselineConfig::default();
        s.set_peak_limits(&[Interval::new(60.0, 120.0), Interval::new(180.0, 240.0)], &cfg);
        let before = s.peaks()[1].surface;

        assert!(s.update_peak_limits(1, Interval::new(200.0, 220.0), &cfg));
        assert!(s.peaks()[1].surface < before);
        assert!(!s.update_peak_limits(5, Interval::new(0.0, 1.0), &cfg));
    }

    #[test]
    fn removing_all_peaks_zeroes_total() {
        let mut s = two_band_sample();
        let cfg = BaselineConfig::default();
        s.add_peak(Interval::new(60.0, 120.0), &cfg);
        assert!(s.total_surface() > 0.0);
        assert!(s.remove_peak(0, &cfg).is_some());
        assert!(s.remove_peak(0, &cfg).is_none());
        assert_eq!(s.total_surface(), 0.0);
    }

    #[test]
    fn baseline_override_keeps_segments() {
        let mut s = two_band_sample();
        let cfg = BaselineConfig::default();
        s.add_peak(Interval::new(60.0, 120.0), &cfg);
        let narrow = vec![Interval::new(80.0, 100.0)];
        assert!(s.update_peak_baseline(0, narrow.clone()));
        assert_eq!(s.peaks()[0].baseline, narrow);
        assert!(s.peaks()[0].surface > 0.0);
    }

    #[test]
    fn replacing_profile_drops_peaks() {
        let mut s = two_band_sample();
        s.add_peak(Interval::new(60.0, 120.0), &BaselineConfig::default());
        s.set_profile(Profile::from_values(&[0.0; 10]));
        assert!(s.peaks().is_empty());
        assert_eq!(s.total_surface(), 0.0);
    }
}
