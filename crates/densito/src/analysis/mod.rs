//! Per-lane band analysis: peak search, baseline validation and metrics.

pub mod baseline;
pub mod metrics;
pub mod peak_search;
