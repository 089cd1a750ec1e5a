//! Plate segmentation: active-area cut points and lane boundaries.

pub mod cut_points;
pub mod lanes;
