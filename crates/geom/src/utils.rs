//! Various math tools shared by the shape crates.

use crate::tolerance::ANGLE_EPSILON;
use crate::{vector, Point, Vector};

/// Linearly interpolate between `a` and `b`.
#[inline]
pub fn interpolate(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Rotate a vector 90 degrees counter-clockwise (in y-up coordinates).
#[inline]
pub fn rotate90(v: Vector) -> Vector {
    vector(-v.y, v.x)
}

/// The unit vector at `angle` radians from the x axis.
#[inline]
pub fn direction_vector(angle: f64) -> Vector {
    vector(angle.cos(), angle.sin())
}

/// The point at polar coordinates (`radius`, `angle`), as a vector from the
/// origin.
#[inline]
pub fn radial_to_cartesian(radius: f64, angle: f64) -> Vector {
    direction_vector(angle) * radius
}

/// Intersect the line through `p0` with direction `d0` and the line through
/// `p1` with direction `d1`.
///
/// Returns `None` when the lines are parallel or close enough to parallel
/// that the intersection would be numerically meaningless.
pub fn line_intersection(p0: Point, d0: Vector, p1: Point, d1: Vector) -> Option<Point> {
    let rotated_d1 = rotate90(d1);
    let den = d0.dot(rotated_d1);
    if den.abs() < ANGLE_EPSILON {
        return None;
    }
    let num = (p1 - p0).dot(rotated_d1);
    // Also reject when the intersection is far out along nearly-parallel
    // lines. Equivalent to abs(den / num) < ANGLE_EPSILON without the
    // division.
    if den.abs() < ANGLE_EPSILON * num.abs() {
        return None;
    }
    let k = num / den;
    Some(p0 + d0 * k)
}

#[test]
fn line_intersection_crossing() {
    let p = line_intersection(
        crate::point(0.0, 0.0),
        vector(1.0, 0.0),
        crate::point(2.0, -1.0),
        vector(0.0, 1.0),
    )
    .unwrap();
    assert!((p - crate::point(2.0, 0.0)).length() < 1e-12);
}

#[test]
fn line_intersection_parallel() {
    assert_eq!(
        line_intersection(
            crate::point(0.0, 0.0),
            vector(1.0, 1.0),
            crate::point(1.0, 0.0),
            vector(1.0, 1.0),
        ),
        None
    );
}

#[test]
fn direction_vector_quadrants() {
    let d = direction_vector(core::f64::consts::FRAC_PI_2);
    assert!(d.x.abs() < 1e-12);
    assert!((d.y - 1.0).abs() < 1e-12);
}
