//! Arithmetic on cyclic outline progress values.
//!
//! Progress lives in `[0, 1)` and wraps: 0.99 and 0.01 are close. These
//! helpers keep that wrap-around reasoning in one place.

/// Euclidean-style modulo; the result is always in `[0, modulus)`.
#[inline]
pub(crate) fn positive_modulo(num: f64, modulus: f64) -> f64 {
    (num % modulus + modulus) % modulus
}

/// Whether `progress` lies in the cyclic range from `start` to `end`.
///
/// When `end < start` the range is the one wrapping through 1.
#[inline]
pub(crate) fn progress_in_range(progress: f64, start: f64, end: f64) -> bool {
    if end >= start {
        (start..=end).contains(&progress)
    } else {
        progress >= start || progress <= end
    }
}

/// Distance between two progress values on the cyclic unit interval, in
/// `[0, 0.5]`.
#[inline]
pub(crate) fn progress_distance(p1: f64, p2: f64) -> f64 {
    (positive_modulo(p1 - p2 + 0.5, 1.0) - 0.5).abs()
}

#[test]
fn positive_modulo_negative_input() {
    assert!((positive_modulo(-0.25, 1.0) - 0.75).abs() < 1e-12);
    assert!((positive_modulo(1.25, 1.0) - 0.25).abs() < 1e-12);
}

#[test]
fn progress_in_wrapping_range() {
    assert!(progress_in_range(0.95, 0.9, 0.1));
    assert!(progress_in_range(0.05, 0.9, 0.1));
    assert!(!progress_in_range(0.5, 0.9, 0.1));
    assert!(progress_in_range(0.5, 0.2, 0.7));
}

#[test]
fn progress_distance_wraps() {
    assert!((progress_distance(0.99, 0.01) - 0.02).abs() < 1e-12);
    assert!((progress_distance(0.25, 0.75) - 0.5).abs() < 1e-12);
}
