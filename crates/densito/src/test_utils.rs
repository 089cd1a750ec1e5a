//! Synthetic grids, profiles and plate images shared by unit tests.

use image::{GrayImage, Luma};

use crate::grid::{GridKind, IntensityGrid};
use crate::profile::Profile;

/// Thresholded cut-point grid of a plate on a bright background.
///
/// Pixels outside the inclusive rectangle `top_left..=bottom_right` are 255,
/// a `band`-pixel rim just inside the rectangle is 40 (edge noise) and the
/// interior is 0.
pub(crate) fn plate_silhouette(
    w: u32,
    h: u32,
    top_left: [u32; 2],
    bottom_right: [u32; 2],
    band: u32,
) -> IntensityGrid {
    let mut values = Vec::with_capacity((w * h) as usize);
    for y in 0..h {
        for x in 0..w {
            let inside = x >= top_left[0]
                && x <= bottom_right[0]
                && y >= top_left[1]
                && y <= bottom_right[1];
            let rim = x < top_left[0] + band
                || x + band > bottom_right[0]
                || y < top_left[1] + band
                || y + band > bottom_right[1];
            values.push(match (inside, rim) {
                (false, _) => 255,
                (true, true) => 40,
                (true, false) => 0,
            });
        }
    }
    IntensityGrid::from_raw(w, h, values, GridKind::Gray).expect("silhouette grid")
}

/// Profile at positions `0..n` with `offset + Σ amp·exp(-(x-mu)²/(2σ²))`.
pub(crate) fn gaussian_profile(n: usize, bands: &[(f64, f64, f64)], offset: f64) -> Profile {
    let values: Vec<f64> = (0..n)
        .map(|i| {
            let x = i as f64;
            let mut v = offset;
            for &(mu, sigma, amp) in bands {
                let d = x - mu;
                v += amp * (-(d * d) / (2.0 * sigma * sigma)).exp();
            }
            v
        })
        .collect();
    Profile::from_values(&values)
}

/// Photograph-like plate: dark surroundings, white plate, dark round spots.
///
/// `spots` are `(cx, cy, radius, darkness)` in absolute pixels; `darkness`
/// is subtracted from the plate white inside each disk.
pub(crate) fn draw_plate_image(
    w: u32,
    h: u32,
    top_left: [u32; 2],
    bottom_right: [u32; 2],
    spots: &[(f32, f32, f32, f32)],
) -> GrayImage {
    GrayImage::from_fn(w, h, |x, y| {
        let on_plate = x >= top_left[0]
            && x <= bottom_right[0]
            && y >= top_left[1]
            && y <= bottom_right[1];
        if !on_plate {
            return Luma([20]);
        }
        let mut v = 245.0f32;
        for &(cx, cy, r, dark) in spots {
            if (x as f32 - cx).hypot(y as f32 - cy) < r {
                v -= dark;
            }
        }
        Luma([v.clamp(0.0, 255.0).round() as u8])
    })
}
