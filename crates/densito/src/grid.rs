//! Rectangular intensity grid consumed by every analysis stage.

use image::GrayImage;

use crate::error::{AnalysisError, Result};

/// Pixel representation carried by an [`IntensityGrid`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GridKind {
    /// Arbitrary non-negative intensities.
    Gray,
    /// Single-channel thresholded grid (values 0 or 255).
    Binary,
}

/// Row-major array of non-negative brightness values.
#[derive(Debug, Clone, PartialEq)]
pub struct IntensityGrid {
    width: u32,
    height: u32,
    values: Vec<u32>,
    kind: GridKind,
}

impl IntensityGrid {
    /// Wrap raw row-major values. Fails if `values.len() != width * height`.
    pub fn from_raw(width: u32, height: u32, values: Vec<u32>, kind: GridKind) -> Result<Self> {
        let expected = width as usize * height as usize;
        if values.len() != expected {
            return Err(AnalysisError::invalid(
                "values",
                format!(
                    "expected {} values for a {}x{} grid, got {}",
                    expected,
                    width,
                    height,
                    values.len()
                ),
            ));
        }
        Ok(Self {
            width,
            height,
            values,
            kind,
        })
    }

    /// Grayscale grid from an 8-bit luma image.
    pub fn from_gray(img: &GrayImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            values: img.as_raw().iter().map(|&v| v as u32).collect(),
            kind: GridKind::Gray,
        }
    }

    /// Binary grid from a thresholded luma image.
    ///
    /// Fails unless every pixel is either 0 or 255.
    pub fn from_binary(img: &GrayImage) -> Result<Self> {
        if let Some(v) = img.as_raw().iter().find(|&&v| v != 0 && v != 255) {
            return Err(AnalysisError::invalid(
                "grid",
                format!("binary grid expected, found intensity {}", v),
            ));
        }
        let mut grid = Self::from_gray(img);
        grid.kind = GridKind::Binary;
        Ok(grid)
    }

    /// Grid width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Grid height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixel representation.
    pub fn kind(&self) -> GridKind {
        self.kind
    }

    /// Raw row-major values.
    pub fn values(&self) -> &[u32] {
        &self.values
    }

    /// Intensity at `(x, y)`. Panics when out of bounds.
    #[inline]
    pub fn value(&self, x: u32, y: u32) -> u32 {
        self.values[y as usize * self.width as usize + x as usize]
    }

    /// One image row.
    pub fn row(&self, y: u32) -> &[u32] {
        let w = self.width as usize;
        let start = y as usize * w;
        &self.values[start..start + w]
    }

    /// Copy of the rectangle `[x0, x1) × [y0, y1)`, clamped to the grid.
    pub fn crop(&self, x0: u32, y0: u32, x1: u32, y1: u32) -> Self {
        let x1 = x1.min(self.width);
        let y1 = y1.min(self.height);
        let x0 = x0.min(x1);
        let y0 = y0.min(y1);
        let mut values = Vec::with_capacity(((x1 - x0) * (y1 - y0)) as usize);
        for y in y0..y1 {
            values.extend_from_slice(&self.row(y)[x0 as usize..x1 as usize]);
        }
        Self {
            width: x1 - x0,
            height: y1 - y0,
            values,
            kind: self.kind,
        }
    }

    /// Convert back to an 8-bit image (values saturate at 255).
    pub fn to_gray_image(&self) -> GrayImage {
        let raw = self.values.iter().map(|&v| v.min(255) as u8).collect();
        GrayImage::from_raw(self.width, self.height, raw).unwrap_or_else(|| GrayImage::new(0, 0))
    }
}
