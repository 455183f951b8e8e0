//! The numeric thresholds shared by the morpho crates.
//!
//! Epsilon constants are not a general answer to float precision, but the
//! shape pipeline works on normalized-ish coordinates (outline progress in
//! `[0, 1]`, shapes within a few units of the origin), so a small set of
//! fixed thresholds is enough. They are deliberately not configurable.

/// Distance below which two points are considered coincident.
///
/// Also used on outline progress values, where it separates "real" curve
/// spans from degenerate ones.
pub const DISTANCE_EPSILON: f64 = 1e-5;

/// Threshold under which angles and dot/cross products are treated as zero.
pub const ANGLE_EPSILON: f64 = 1e-6;

/// A loose distance threshold for validating user-provided feature chains,
/// which may carry accumulated error from earlier transformations.
pub const RELAXED_DISTANCE_EPSILON: f64 = 5e-3;
