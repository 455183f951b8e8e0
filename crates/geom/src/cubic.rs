//! The cubic bézier segment all shapes are made of.

use crate::tolerance::DISTANCE_EPSILON;
use crate::traits::Transformation;
use crate::utils::rotate90;
use crate::{point, Box2D, Point};

use arrayvec::ArrayVec;
use core::ops::{Add, Div, Mul};

/// A 2d curve segment defined by four points: the two anchors at the
/// beginning and the end of the segment, and two control points.
///
/// The curve is defined by equation:
/// ```∀ t ∈ [0..1],  P(t) = (1 - t)³ * from + 3 * (1 - t)² * t * ctrl1 + 3 * t² * (1 - t) * ctrl2 + t³ * to```
///
/// Once built a `Cubic` is never mutated; every operation returns a new
/// value. Equality is exact, component-wise.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct Cubic {
    pub from: Point,
    pub ctrl1: Point,
    pub ctrl2: Point,
    pub to: Point,
}

impl Cubic {
    #[inline]
    pub fn new(from: Point, ctrl1: Point, ctrl2: Point, to: Point) -> Self {
        Cubic {
            from,
            ctrl1,
            ctrl2,
            to,
        }
    }

    /// A line segment from `from` to `to`, expressed as a cubic with its
    /// control points at one and two thirds of the way.
    pub fn straight_line(from: Point, to: Point) -> Self {
        Cubic {
            from,
            ctrl1: from.lerp(to, 1.0 / 3.0),
            ctrl2: from.lerp(to, 2.0 / 3.0),
            to,
        }
    }

    /// A curve with all four points at `at`.
    ///
    /// Zero-length cubics appear wherever a polygon vertex is left
    /// unrounded; they keep the corner count intact without contributing
    /// geometry.
    pub fn empty(at: Point) -> Self {
        Cubic {
            from: at,
            ctrl1: at,
            ctrl2: at,
            to: at,
        }
    }

    /// Approximates the minor (≤ 180 degrees) circular arc on the circle
    /// centered at `center` going from `from` to `to` with a single cubic.
    ///
    /// `from` and `to` must be equidistant from `center`. The sweep
    /// direction is whichever of the two arcs is shorter. Nearly coincident
    /// endpoints degrade to a straight line.
    pub fn circular_arc(center: Point, from: Point, to: Point) -> Self {
        let p0d = (from - center).normalize();
        let p1d = (to - center).normalize();
        let rotated_p0 = rotate90(p0d);
        let rotated_p1 = rotate90(p1d);
        let clockwise = rotated_p0.dot(to - center) >= 0.0;
        let cosa = p0d.dot(p1d);
        if cosa > 0.999 {
            return Cubic::straight_line(from, to);
        }
        // Length of the control tangents for a single-cubic arc
        // approximation, from the chord/radius relation.
        let k = (from - center).length() * 4.0 / 3.0
            * ((2.0 * (1.0 - cosa)).sqrt() - (1.0 - cosa * cosa).sqrt())
            / (1.0 - cosa)
            * if clockwise { 1.0 } else { -1.0 };

        Cubic {
            from,
            ctrl1: from + rotated_p0 * k,
            ctrl2: to - rotated_p1 * k,
            to,
        }
    }

    /// Sample the curve at t (expecting t between 0 and 1).
    pub fn sample(&self, t: f64) -> Point {
        let t2 = t * t;
        let t3 = t2 * t;
        let one_t = 1.0 - t;
        let one_t2 = one_t * one_t;
        let one_t3 = one_t2 * one_t;

        self.from * one_t3
            + self.ctrl1.to_vector() * 3.0 * one_t2 * t
            + self.ctrl2.to_vector() * 3.0 * one_t * t2
            + self.to.to_vector() * t3
    }

    /// Split this curve into two sub-curves at `t`.
    ///
    /// Both halves share the exact sampled point at `t` as their meeting
    /// anchor, so chains built from splits never develop gaps.
    pub fn split(&self, t: f64) -> (Cubic, Cubic) {
        let ab = self.from.lerp(self.ctrl1, t);
        let bc = self.ctrl1.lerp(self.ctrl2, t);
        let cd = self.ctrl2.lerp(self.to, t);
        let abc = ab.lerp(bc, t);
        let bcd = bc.lerp(cd, t);
        let mid = self.sample(t);

        (
            Cubic {
                from: self.from,
                ctrl1: ab,
                ctrl2: abc,
                to: mid,
            },
            Cubic {
                from: mid,
                ctrl1: bcd,
                ctrl2: cd,
                to: self.to,
            },
        )
    }

    /// Swap the beginning and the end of the segment.
    pub fn flip(&self) -> Self {
        Cubic {
            from: self.to,
            ctrl1: self.ctrl2,
            ctrl2: self.ctrl1,
            to: self.from,
        }
    }

    /// Whether the two anchors coincide within the distance tolerance.
    ///
    /// The control points are deliberately ignored: a curve that starts and
    /// ends at the same spot contributes nothing to an outline.
    #[inline]
    pub fn is_zero_length(&self) -> bool {
        (self.from.x - self.to.x).abs() < DISTANCE_EPSILON
            && (self.from.y - self.to.y).abs() < DISTANCE_EPSILON
    }

    /// Returns a conservative rectangle the curve is contained in, from the
    /// convex hull of the four points.
    ///
    /// This method is faster than `bounding_box` but more conservative.
    pub fn fast_bounding_box(&self) -> Box2D {
        if self.is_zero_length() {
            return Box2D {
                min: self.from,
                max: self.from,
            };
        }
        let min_x = self
            .from
            .x
            .min(self.ctrl1.x)
            .min(self.ctrl2.x)
            .min(self.to.x);
        let max_x = self
            .from
            .x
            .max(self.ctrl1.x)
            .max(self.ctrl2.x)
            .max(self.to.x);
        let min_y = self
            .from
            .y
            .min(self.ctrl1.y)
            .min(self.ctrl2.y)
            .min(self.to.y);
        let max_y = self
            .from
            .y
            .max(self.ctrl1.y)
            .max(self.ctrl2.y)
            .max(self.to.y);

        Box2D {
            min: point(min_x, min_y),
            max: point(max_x, max_y),
        }
    }

    /// Returns the smallest rectangle that contains the curve, solving the
    /// derivative roots on each axis.
    pub fn bounding_box(&self) -> Box2D {
        if self.is_zero_length() {
            return Box2D {
                min: self.from,
                max: self.from,
            };
        }
        let (min_x, max_x) =
            axis_bounds(self.from.x, self.ctrl1.x, self.ctrl2.x, self.to.x);
        let (min_y, max_y) =
            axis_bounds(self.from.y, self.ctrl1.y, self.ctrl2.y, self.to.y);

        Box2D {
            min: point(min_x, min_y),
            max: point(max_x, max_y),
        }
    }

    /// Applies the transformation to all four points and returns the result.
    #[inline]
    pub fn transformed<T: Transformation>(&self, transform: &T) -> Self {
        Cubic {
            from: transform.transform_point(self.from),
            ctrl1: transform.transform_point(self.ctrl1),
            ctrl2: transform.transform_point(self.ctrl2),
            to: transform.transform_point(self.to),
        }
    }

    /// The curve whose points are interpolated between `self` (at t = 0)
    /// and `other` (at t = 1).
    pub fn interpolated(&self, other: &Cubic, t: f64) -> Cubic {
        Cubic {
            from: self.from.lerp(other.from, t),
            ctrl1: self.ctrl1.lerp(other.ctrl1, t),
            ctrl2: self.ctrl2.lerp(other.ctrl2, t),
            to: self.to.lerp(other.to, t),
        }
    }
}

/// Min/max of one coordinate of the curve over t in [0, 1].
fn axis_bounds(p0: f64, p1: f64, p2: f64, p3: f64) -> (f64, f64) {
    let mut min = p0.min(p3);
    let mut max = p0.max(p3);
    for t in local_extrema(p0, p1, p2, p3) {
        let v = axis_sample(p0, p1, p2, p3, t);
        min = min.min(v);
        max = max.max(v);
    }
    (min, max)
}

fn axis_sample(p0: f64, p1: f64, p2: f64, p3: f64, t: f64) -> f64 {
    let t2 = t * t;
    let t3 = t2 * t;
    let one_t = 1.0 - t;
    let one_t2 = one_t * one_t;
    let one_t3 = one_t2 * one_t;

    p0 * one_t3 + p1 * 3.0 * one_t2 * t + p2 * 3.0 * one_t * t2 + p3 * t3
}

/// The parameters of the local extrema of one coordinate, in (0, 1).
fn local_extrema(p0: f64, p1: f64, p2: f64, p3: f64) -> ArrayVec<f64, 2> {
    let mut result = ArrayVec::new();

    // The derivative of a cubic bézier curve is a second degree polynomial
    // f(t) = a * t² + b * t + c with:
    let a = 3.0 * (p3 + 3.0 * (p1 - p2) - p0);
    let b = 6.0 * (p2 - 2.0 * p1 + p0);
    let c = 3.0 * (p1 - p0);

    fn in_range(t: f64) -> bool {
        t > 0.0 && t < 1.0
    }

    // If the derivative is close enough to a linear function.
    if a.abs() < DISTANCE_EPSILON {
        if b != 0.0 {
            let t = -c / b;
            if in_range(t) {
                result.push(t);
            }
        }
        return result;
    }

    let discriminant = b * b - 4.0 * a * c;

    if discriminant < 0.0 {
        return result;
    }

    if discriminant == 0.0 {
        let t = -b / (2.0 * a);
        if in_range(t) {
            result.push(t);
        }
        return result;
    }

    let discriminant_sqrt = discriminant.sqrt();

    let mut first_extremum = (-b - discriminant_sqrt) / (2.0 * a);
    let mut second_extremum = (-b + discriminant_sqrt) / (2.0 * a);
    if first_extremum > second_extremum {
        core::mem::swap(&mut first_extremum, &mut second_extremum);
    }

    if in_range(first_extremum) {
        result.push(first_extremum);
    }

    if in_range(second_extremum) {
        result.push(second_extremum);
    }

    result
}

impl Add for Cubic {
    type Output = Cubic;
    fn add(self, rhs: Cubic) -> Cubic {
        Cubic {
            from: self.from + rhs.from.to_vector(),
            ctrl1: self.ctrl1 + rhs.ctrl1.to_vector(),
            ctrl2: self.ctrl2 + rhs.ctrl2.to_vector(),
            to: self.to + rhs.to.to_vector(),
        }
    }
}

impl Mul<f64> for Cubic {
    type Output = Cubic;
    fn mul(self, rhs: f64) -> Cubic {
        Cubic {
            from: self.from * rhs,
            ctrl1: self.ctrl1 * rhs,
            ctrl2: self.ctrl2 * rhs,
            to: self.to * rhs,
        }
    }
}

impl Div<f64> for Cubic {
    type Output = Cubic;
    fn div(self, rhs: f64) -> Cubic {
        self * (1.0 / rhs)
    }
}

#[cfg(test)]
fn assert_points_near(a: Point, b: Point) {
    assert!((a - b).length() < 1e-9, "{a:?} != {b:?}");
}

#[test]
fn straight_line_split() {
    let line = Cubic::straight_line(point(0.0, 0.0), point(1.0, 0.0));
    let (left, right) = line.split(0.5);
    assert_points_near(left.to, point(0.5, 0.0));
    assert_points_near(right.from, point(0.5, 0.0));
    assert_points_near(left.from, point(0.0, 0.0));
    assert_points_near(right.to, point(1.0, 0.0));
    // Both halves stay line-like: controls on the segment.
    assert!(left.ctrl1.y.abs() < 1e-12 && right.ctrl2.y.abs() < 1e-12);
}

#[test]
fn split_halves_meet_at_sample() {
    let c = Cubic::new(
        point(0.0, 0.0),
        point(0.2, 1.5),
        point(1.3, -0.5),
        point(2.0, 1.0),
    );
    for t in [0.1, 0.25, 0.5, 0.77, 0.9] {
        let (a, b) = c.split(t);
        assert_eq!(a.to, c.sample(t));
        assert_eq!(b.from, c.sample(t));
    }
}

#[test]
fn circular_arc_stays_on_circle() {
    let center = point(0.0, 0.0);
    let arc = Cubic::circular_arc(center, point(1.0, 0.0), point(0.0, 1.0));
    for i in 0..=10 {
        let t = i as f64 / 10.0;
        let r = (arc.sample(t) - center).length();
        // A single-cubic quarter circle is accurate well below the percent.
        assert!((r - 1.0).abs() < 3e-3, "radius off at t = {t}: {r}");
    }
}

#[test]
fn circular_arc_coincident_endpoints() {
    let arc = Cubic::circular_arc(
        point(0.0, 0.0),
        point(1.0, 0.0),
        point(1.0, 1e-4),
    );
    assert_eq!(
        arc,
        Cubic::straight_line(point(1.0, 0.0), point(1.0, 1e-4))
    );
}

#[test]
fn bounding_boxes_ordering() {
    let c = Cubic::new(
        point(0.0, 0.0),
        point(0.5, 2.0),
        point(1.5, -2.0),
        point(2.0, 0.0),
    );
    let fast = c.fast_bounding_box();
    let tight = c.bounding_box();
    assert!(fast.min.x <= tight.min.x);
    assert!(fast.min.y <= tight.min.y);
    assert!(fast.max.x >= tight.max.x);
    assert!(fast.max.y >= tight.max.y);
    // The extrema of this curve are strictly inside the control hull.
    assert!(fast.max.y > tight.max.y);
}

#[test]
fn bounding_box_linear_derivative() {
    // ctrl points chosen so the x derivative has a degenerate quadratic
    // coefficient.
    let c = Cubic::new(
        point(0.0, 0.0),
        point(1.0, 1.0),
        point(2.0, 1.0),
        point(3.0, 0.0),
    );
    let b = c.bounding_box();
    assert_eq!(b.min.x, 0.0);
    assert_eq!(b.max.x, 3.0);
    assert!((b.max.y - 0.75).abs() < 1e-12);
}

#[test]
fn zero_length_bounds() {
    let c = Cubic::empty(point(4.0, -2.0));
    assert!(c.is_zero_length());
    let b = c.bounding_box();
    assert_eq!(b.min, point(4.0, -2.0));
    assert_eq!(b.max, point(4.0, -2.0));
}

#[test]
fn flip_roundtrip() {
    let c = Cubic::new(
        point(0.0, 0.0),
        point(1.0, 1.0),
        point(2.0, -1.0),
        point(3.0, 0.0),
    );
    assert_eq!(c.flip().flip(), c);
    assert_eq!(c.flip().from, c.to);
    assert_eq!(c.flip().ctrl1, c.ctrl2);
}

#[test]
fn arithmetic() {
    let c = Cubic::straight_line(point(0.0, 0.0), point(1.0, 2.0));
    let doubled = c * 2.0;
    assert_eq!(doubled.to, point(2.0, 4.0));
    let back = doubled / 2.0;
    assert_points_near(back.to, c.to);
    let sum = c + c;
    assert_eq!(sum.to, point(2.0, 4.0));
}

#[test]
fn interpolated_endpoints() {
    let a = Cubic::straight_line(point(0.0, 0.0), point(1.0, 0.0));
    let b = Cubic::straight_line(point(0.0, 2.0), point(1.0, 2.0));
    assert_eq!(a.interpolated(&b, 0.0), a);
    assert_eq!(a.interpolated(&b, 1.0), b);
    assert_points_near(a.interpolated(&b, 0.5).from, point(0.0, 1.0));
}

#[test]
fn transformed_with_closure() {
    use crate::traits::PointMap;
    let c = Cubic::straight_line(point(0.0, 0.0), point(1.0, 0.0));
    let moved = c.transformed(&PointMap(|p: Point| point(p.x + 1.0, p.y)));
    assert_eq!(moved.from, point(1.0, 0.0));
    assert_eq!(moved.to, point(2.0, 0.0));
}
