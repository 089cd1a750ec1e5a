//! Image transforms feeding the analysis stages.
//!
//! The analysis core only sees [`IntensityGrid`]s. This module turns decoded
//! images into the three grids it needs:
//!
//! - [`cut_point_grid`]: blur → grayscale → invert → threshold
//! - [`profile_grid`]: blur → grayscale → invert
//! - [`lane_grid`]: blur → grayscale → invert → threshold

use image::{DynamicImage, GrayImage, Luma};
use imageproc::geometric_transformations::{rotate_about_center, Interpolation};

use crate::error::Result;
use crate::grid::IntensityGrid;
use crate::profile::ScanAxis;

/// 8-bit luma view of any decoded image.
pub fn grayscale(image: &DynamicImage) -> GrayImage {
    image.to_luma8()
}

/// Photographic negative.
pub fn invert(image: &GrayImage) -> GrayImage {
    let mut out = image.clone();
    image::imageops::invert(&mut out);
    out
}

/// Gaussian blur via `imageproc`. A non-positive sigma leaves the image as is.
pub fn gaussian_blur(image: &GrayImage, sigma: f32) -> GrayImage {
    if sigma.is_nan() || sigma <= 0.0 {
        return image.clone();
    }
    imageproc::filter::gaussian_blur_f32(image, sigma)
}

/// Otsu binarization: pixels above the level become 255, the rest 0.
pub fn auto_threshold(image: &GrayImage) -> GrayImage {
    let level = imageproc::contrast::otsu_level(image);
    tracing::trace!(level, "otsu threshold");
    let mut out = image.clone();
    for p in out.pixels_mut() {
        p.0[0] = if p.0[0] > level { 255 } else { 0 };
    }
    out
}

/// Copy of the rectangle with inclusive corners `top_left` / `bottom_right`.
pub fn crop(image: &GrayImage, top_left: [u32; 2], bottom_right: [u32; 2]) -> GrayImage {
    let (w, h) = image.dimensions();
    let x0 = top_left[0].min(w);
    let y0 = top_left[1].min(h);
    let x1 = (bottom_right[0] + 1).clamp(x0, w);
    let y1 = (bottom_right[1] + 1).clamp(y0, h);
    image::imageops::crop_imm(image, x0, y0, x1 - x0, y1 - y0).to_image()
}

/// Rotate about the image center. Uncovered corners are filled white.
pub fn rotate(image: &GrayImage, angle_degrees: f32) -> GrayImage {
    rotate_about_center(
        image,
        angle_degrees.to_radians(),
        Interpolation::Bilinear,
        Luma([255]),
    )
}

/// Mirror along `axis`: `Vertical` flips top/bottom, `Horizontal` left/right.
pub fn flip(image: &GrayImage, axis: ScanAxis) -> GrayImage {
    match axis {
        ScanAxis::Vertical => image::imageops::flip_vertical(image),
        ScanAxis::Horizontal => image::imageops::flip_horizontal(image),
    }
}

fn blurred_negative(image: &GrayImage, sigma: f32) -> GrayImage {
    invert(&gaussian_blur(image, sigma))
}

/// Binary grid for [`locate_cut_points`](crate::segmentation::cut_points::locate_cut_points).
pub fn cut_point_grid(image: &GrayImage, sigma: f32) -> Result<IntensityGrid> {
    IntensityGrid::from_binary(&auto_threshold(&blurred_negative(image, sigma)))
}

/// Grayscale grid the lane profiles are read from; bands read as high values.
pub fn profile_grid(image: &GrayImage, sigma: f32) -> IntensityGrid {
    IntensityGrid::from_gray(&blurred_negative(image, sigma))
}

/// Binary grid for [`segment_lanes`](crate::segmentation::lanes::segment_lanes).
pub fn lane_grid(image: &GrayImage, sigma: f32) -> Result<IntensityGrid> {
    IntensityGrid::from_binary(&auto_threshold(&blurred_negative(image, sigma)))
}
