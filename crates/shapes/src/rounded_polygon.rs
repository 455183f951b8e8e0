//! Closed shapes built from polygon vertices with rounded corners.

use crate::corner_rounding::CornerRounding;
use crate::error::{ShapeError, ShapeResult};
use crate::feature::Feature;
use crate::geom::tolerance::{DISTANCE_EPSILON, RELAXED_DISTANCE_EPSILON};
use crate::geom::traits::{PointMap, Transformation};
use crate::geom::utils::{line_intersection, rotate90};
use crate::geom::{point, Box2D, Cubic, Point, Vector};

/// A closed shape: an ordered, cyclic list of [`Feature`]s whose curves
/// form a continuous loop, with corner vertices replaced by arcs and
/// optional smoothing flanks.
///
/// Polygons are immutable; transforms return new values. The flattened
/// curve list is precomputed at construction and starts mid-way through the
/// first corner, which gives the morph a stable outline origin.
#[derive(Clone, Debug, PartialEq)]
pub struct RoundedPolygon {
    features: Vec<Feature>,
    center: Point,
    cubics: Vec<Cubic>,
}

impl RoundedPolygon {
    /// Builds a polygon from a flat `[x0, y0, x1, y1, ...]` vertex list in
    /// outline order.
    ///
    /// `rounding` applies to every vertex unless `per_vertex_rounding`
    /// provides one entry per vertex. When `center` is `None` it is derived
    /// from the resulting curves.
    pub fn from_vertices(
        vertices: &[f64],
        rounding: CornerRounding,
        per_vertex_rounding: Option<&[CornerRounding]>,
        center: Option<Point>,
    ) -> ShapeResult<RoundedPolygon> {
        if vertices.len() < 6 {
            return Err(ShapeError::argument(
                "polygons must have at least 3 vertices",
            ));
        }
        if vertices.len() % 2 == 1 {
            return Err(ShapeError::argument(
                "the vertex array must have an even size",
            ));
        }
        if vertices.iter().any(|v| !v.is_finite()) {
            return Err(ShapeError::argument("vertex coordinates must be finite"));
        }
        validate_rounding(&rounding)?;
        let n = vertices.len() / 2;
        if let Some(pvr) = per_vertex_rounding {
            if pvr.len() != n {
                return Err(ShapeError::argument(format!(
                    "per-vertex rounding must have one entry per vertex: {} != {n}",
                    pvr.len(),
                )));
            }
            for r in pvr {
                validate_rounding(r)?;
            }
        }

        let vertex = |i: usize| point(vertices[i * 2], vertices[i * 2 + 1]);

        let rounded_corners: Vec<RoundedCorner> = (0..n)
            .map(|i| {
                let vtx_rounding = per_vertex_rounding.map(|p| p[i]).unwrap_or(rounding);
                RoundedCorner::new(
                    vertex((i + n - 1) % n),
                    vertex(i),
                    vertex((i + 1) % n),
                    vtx_rounding,
                )
            })
            .collect();

        // For each side, how much of the cut each pair of adjacent corners
        // asked for actually fits, as (rounding scale, smoothing scale).
        // Rounding wins over smoothing when the side is too short for both.
        let cut_adjusts: Vec<(f64, f64)> = (0..n)
            .map(|ix| {
                let next = (ix + 1) % n;
                let expected_round_cut = rounded_corners[ix].expected_round_cut
                    + rounded_corners[next].expected_round_cut;
                let expected_cut =
                    rounded_corners[ix].expected_cut() + rounded_corners[next].expected_cut();
                let side_size = (vertex(ix) - vertex(next)).length();
                if expected_round_cut > side_size {
                    (side_size / expected_round_cut, 0.0)
                } else if expected_cut > side_size {
                    (
                        1.0,
                        (side_size - expected_round_cut) / (expected_cut - expected_round_cut),
                    )
                } else {
                    (1.0, 1.0)
                }
            })
            .collect();

        let corners: Vec<Vec<Cubic>> = (0..n)
            .map(|i| {
                // delta 0 is the side toward the previous vertex, delta 1
                // the one toward the next.
                let mut allowed_cuts = [0.0; 2];
                for (delta, allowed) in allowed_cuts.iter_mut().enumerate() {
                    let (round_cut_ratio, cut_ratio) = cut_adjusts[(i + n - 1 + delta) % n];
                    *allowed = rounded_corners[i].expected_round_cut * round_cut_ratio
                        + (rounded_corners[i].expected_cut()
                            - rounded_corners[i].expected_round_cut)
                            * cut_ratio;
                }
                rounded_corners[i].cubics(allowed_cuts[0], allowed_cuts[1])
            })
            .collect();

        let mut features = Vec::with_capacity(2 * n);
        for i in 0..n {
            let next = (i + 1) % n;
            let prev_vertex = vertex((i + n - 1) % n);
            let convex = (vertex(i) - prev_vertex).cross(vertex(next) - vertex(i)) > 0.0;
            features.push(Feature::corner_unchecked(corners[i].clone(), convex));
            features.push(Feature::edge_unchecked(vec![Cubic::straight_line(
                last_anchor(&corners[i]),
                first_anchor(&corners[next]),
            )]));
        }

        Ok(Self::build(features, center))
    }

    /// A regular polygon with `num_vertices` vertices at `radius` around
    /// `center`, with the same rounding at every vertex unless
    /// `per_vertex_rounding` is provided.
    pub fn from_vertices_count(
        num_vertices: usize,
        radius: f64,
        rounding: CornerRounding,
        per_vertex_rounding: Option<&[CornerRounding]>,
        center: Point,
    ) -> ShapeResult<RoundedPolygon> {
        if num_vertices < 3 {
            return Err(ShapeError::argument(
                "polygons must have at least 3 vertices",
            ));
        }
        let vertices = vertices_from_num_verts(num_vertices, radius, center);
        Self::from_vertices(&vertices, rounding, per_vertex_rounding, Some(center))
    }

    /// Builds a polygon from a pre-built feature list, deriving the center
    /// from the curves.
    ///
    /// The features must chain continuously, including from the last back
    /// to the first.
    pub fn from_features(features: Vec<Feature>) -> ShapeResult<RoundedPolygon> {
        validate_feature_chain(&features)?;
        Ok(Self::build(features, None))
    }

    /// Like [`RoundedPolygon::from_features`] with an explicit center.
    pub fn from_features_at(features: Vec<Feature>, center: Point) -> ShapeResult<RoundedPolygon> {
        validate_feature_chain(&features)?;
        Ok(Self::build(features, Some(center)))
    }

    /// The one place every factory converges on. `features` are assumed
    /// structurally valid at this point.
    pub(crate) fn build(features: Vec<Feature>, center: Option<Point>) -> RoundedPolygon {
        let center = center.filter(|c| c.x.is_finite() && c.y.is_finite());
        let center = center.unwrap_or_else(|| center_from_features(&features));
        let cubics = flatten_features(&features, center);
        RoundedPolygon {
            features,
            center,
            cubics,
        }
    }

    /// The features of the outline, in cyclic order.
    #[inline]
    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    /// The flattened outline: a closed, continuous chain of curves with
    /// degenerate segments removed.
    #[inline]
    pub fn cubics(&self) -> &[Cubic] {
        &self.cubics
    }

    #[inline]
    pub fn center(&self) -> Point {
        self.center
    }

    /// The exact bounding box of the outline.
    pub fn bounding_box(&self) -> Box2D {
        union_boxes(self.cubics.iter().map(|c| c.bounding_box()))
    }

    /// A looser bounding box from the control hulls; cheaper than
    /// [`RoundedPolygon::bounding_box`] and never smaller.
    pub fn fast_bounding_box(&self) -> Box2D {
        union_boxes(self.cubics.iter().map(|c| c.fast_bounding_box()))
    }

    /// A square around `center` that contains the shape under any rotation
    /// about its center.
    ///
    /// Sampling anchors and curve midpoints is enough for the curves the
    /// builder produces, which never stray far from their anchors.
    pub fn max_bounding_box(&self) -> Box2D {
        let mut max_dist_squared: f64 = 0.0;
        for cubic in &self.cubics {
            let anchor_distance = (cubic.from - self.center).square_length();
            let middle_distance = (cubic.sample(0.5) - self.center).square_length();
            max_dist_squared = max_dist_squared.max(anchor_distance).max(middle_distance);
        }
        let distance = max_dist_squared.sqrt();
        Box2D {
            min: point(self.center.x - distance, self.center.y - distance),
            max: point(self.center.x + distance, self.center.y + distance),
        }
    }

    /// The polygon scaled and translated so its bounding box fills the unit
    /// square, centered along its shorter axis.
    pub fn normalized(&self) -> RoundedPolygon {
        let bounds = self.bounding_box();
        let width = bounds.max.x - bounds.min.x;
        let height = bounds.max.y - bounds.min.y;
        let side = width.max(height);
        let offset_x = (side - width) / 2.0 - bounds.min.x;
        let offset_y = (side - height) / 2.0 - bounds.min.y;
        self.transformed(&PointMap(move |p: Point| {
            point((p.x + offset_x) / side, (p.y + offset_y) / side)
        }))
    }

    /// The polygon with every curve (and the center) transformed.
    pub fn transformed<T: Transformation>(&self, transform: &T) -> RoundedPolygon {
        RoundedPolygon {
            features: self
                .features
                .iter()
                .map(|f| f.transformed(transform))
                .collect(),
            center: transform.transform_point(self.center),
            cubics: self.cubics.iter().map(|c| c.transformed(transform)).collect(),
        }
    }
}

pub(crate) fn validate_rounding(rounding: &CornerRounding) -> ShapeResult<()> {
    CornerRounding::new(rounding.radius, rounding.smoothing).map(|_| ())
}

pub(crate) fn vertices_from_num_verts(
    num_vertices: usize,
    radius: f64,
    center: Point,
) -> Vec<f64> {
    use crate::geom::utils::radial_to_cartesian;
    let mut result = Vec::with_capacity(num_vertices * 2);
    for i in 0..num_vertices {
        let vertex = center
            + radial_to_cartesian(radius, std::f64::consts::TAU * i as f64 / num_vertices as f64);
        result.push(vertex.x);
        result.push(vertex.y);
    }
    result
}

fn first_anchor(cubics: &[Cubic]) -> Point {
    cubics.first().map(|c| c.from).unwrap_or_else(Point::zero)
}

fn last_anchor(cubics: &[Cubic]) -> Point {
    cubics.last().map(|c| c.to).unwrap_or_else(Point::zero)
}

fn union_boxes(mut boxes: impl Iterator<Item = Box2D>) -> Box2D {
    // The outline always has at least one curve.
    let first = boxes.next().unwrap_or(Box2D {
        min: Point::zero(),
        max: Point::zero(),
    });
    boxes.fold(first, |acc, b| acc.union(&b))
}

fn validate_feature_chain(features: &[Feature]) -> ShapeResult<()> {
    if features.is_empty() {
        return Err(ShapeError::argument(
            "polygons must have at least one feature",
        ));
    }
    for i in 0..features.len() {
        let next = (i + 1) % features.len();
        let gap = (last_anchor(features[i].cubics()) - first_anchor(features[next].cubics()))
            .length();
        if gap >= RELAXED_DISTANCE_EPSILON {
            return Err(ShapeError::argument(
                "the feature chain must be continuous and closed",
            ));
        }
    }
    Ok(())
}

/// The arithmetic mean of the start anchors of all curves.
fn center_from_features(features: &[Feature]) -> Point {
    let mut sum = Vector::zero();
    let mut count = 0.0;
    for feature in features {
        for cubic in feature.cubics() {
            sum += cubic.from.to_vector();
            count += 1.0;
        }
    }
    if count == 0.0 {
        return Point::zero();
    }
    (sum / count).to_point()
}

/// Flattens a feature list into the outline curve chain.
///
/// When the first feature is a full three-curve corner, the flat list
/// starts at the middle of its arc instead of at the feature boundary; the
/// second half of the arc leads the list and the first half closes it.
/// Zero-length curves are dropped, carrying their endpoint into the
/// preceding curve so the chain stays anchored, and the final curve is
/// snapped onto the first one.
fn flatten_features(features: &[Feature], center: Point) -> Vec<Cubic> {
    if features.is_empty() {
        return vec![Cubic::empty(center)];
    }

    let first_split = {
        let cubics = features[0].cubics();
        if cubics.len() == 3 {
            let (start, end) = cubics[1].split(0.5);
            Some((vec![cubics[0], start], vec![end, cubics[2]]))
        } else {
            None
        }
    };

    let mut out = Vec::new();
    let mut first_cubic: Option<Cubic> = None;
    let mut last_cubic: Option<Cubic> = None;

    for i in 0..=features.len() {
        let feature_cubics: Vec<Cubic> = if i == 0 {
            match &first_split {
                Some((_, end_half)) => end_half.clone(),
                None => features[0].cubics().to_vec(),
            }
        } else if i == features.len() {
            match &first_split {
                Some((start_half, _)) => start_half.clone(),
                None => break,
            }
        } else {
            features[i].cubics().to_vec()
        };
        for cubic in feature_cubics {
            if !cubic.is_zero_length() {
                if let Some(prev) = last_cubic.take() {
                    out.push(prev);
                }
                if first_cubic.is_none() {
                    first_cubic = Some(cubic);
                }
                last_cubic = Some(cubic);
            } else if let Some(prev) = last_cubic.as_mut() {
                // Dropping several zero-length curves in a row must not
                // break the anchor chain; carry their endpoint forward.
                prev.to = cubic.to;
            }
        }
    }

    match (first_cubic, last_cubic) {
        (Some(first), Some(mut last)) => {
            // Snap the outline exactly closed, whatever error accumulated.
            last.to = first.from;
            out.push(last);
        }
        // Everything was degenerate; keep a single point so downstream
        // consumers still see an outline.
        _ => out.push(Cubic::empty(center)),
    }
    out
}

/// Scratch state for rounding one vertex.
///
/// `expected_round_cut` is how much edge length the circular arc wants to
/// consume on each side of the vertex; `expected_cut` adds the smoothing
/// flanks on top. The polygon builder compares those appetites against the
/// actual side lengths and hands back the allowed cuts.
struct RoundedCorner {
    corner: Point,
    d1: Vector,
    d2: Vector,
    corner_radius: f64,
    smoothing: f64,
    expected_round_cut: f64,
}

impl RoundedCorner {
    fn new(p0: Point, p1: Point, p2: Point, rounding: CornerRounding) -> Self {
        let v01 = p0 - p1;
        let v21 = p2 - p1;
        let d01 = v01.length();
        let d21 = v21.length();
        if d01 > 0.0 && d21 > 0.0 {
            let d1 = v01 / d01;
            let d2 = v21 / d21;
            let cos_angle = d1.dot(d2);
            let sin_angle = (1.0 - cos_angle * cos_angle).max(0.0).sqrt();
            // The distance along each edge from the vertex to where the
            // inscribed circle of radius r touches it is
            // r / tan(angle / 2) = r * (1 + cos) / sin.
            let expected_round_cut = if sin_angle > 1e-3 {
                rounding.radius * (cos_angle + 1.0) / sin_angle
            } else {
                0.0
            };
            RoundedCorner {
                corner: p1,
                d1,
                d2,
                corner_radius: rounding.radius,
                smoothing: rounding.smoothing,
                expected_round_cut,
            }
        } else {
            // A repeated vertex leaves no corner to round.
            RoundedCorner {
                corner: p1,
                d1: Vector::zero(),
                d2: Vector::zero(),
                corner_radius: 0.0,
                smoothing: 0.0,
                expected_round_cut: 0.0,
            }
        }
    }

    fn expected_cut(&self) -> f64 {
        (1.0 + self.smoothing) * self.expected_round_cut
    }

    /// The curves for this corner, given how much edge length the polygon
    /// actually granted toward the previous and next vertices.
    fn cubics(&self, allowed_cut0: f64, allowed_cut1: f64) -> Vec<Cubic> {
        let allowed_cut = allowed_cut0.min(allowed_cut1);
        if self.expected_round_cut < DISTANCE_EPSILON
            || allowed_cut < DISTANCE_EPSILON
            || self.corner_radius < DISTANCE_EPSILON
        {
            // No room or no request: a sharp corner, kept as a zero-length
            // placeholder so the corner count and convexity survive.
            return vec![Cubic::empty(self.corner)];
        }
        let actual_round_cut = allowed_cut.min(self.expected_round_cut);
        let actual_smoothing0 = self.actual_smoothing(allowed_cut0);
        let actual_smoothing1 = self.actual_smoothing(allowed_cut1);
        // Scale the radius down in proportion to the cut we had to give up.
        let actual_r = self.corner_radius * actual_round_cut / self.expected_round_cut;
        let center_distance = (actual_r * actual_r + actual_round_cut * actual_round_cut).sqrt();
        let center = self.corner + ((self.d1 + self.d2) / 2.0).normalize() * center_distance;
        let circle_intersection0 = self.corner + self.d1 * actual_round_cut;
        let circle_intersection2 = self.corner + self.d2 * actual_round_cut;
        let flanking0 = self.flanking_curve(
            actual_round_cut,
            actual_smoothing0,
            self.d1,
            circle_intersection0,
            circle_intersection2,
            center,
            actual_r,
        );
        let flanking2 = self
            .flanking_curve(
                actual_round_cut,
                actual_smoothing1,
                self.d2,
                circle_intersection2,
                circle_intersection0,
                center,
                actual_r,
            )
            .flip();
        vec![
            flanking0,
            Cubic::circular_arc(center, flanking0.to, flanking2.from),
            flanking2,
        ]
    }

    /// The smoothing we can honor given the allowed cut: full when the cut
    /// fits entirely, scaling down linearly to zero when only the rounding
    /// itself fits.
    fn actual_smoothing(&self, allowed_cut: f64) -> f64 {
        if allowed_cut > self.expected_cut() {
            self.smoothing
        } else if allowed_cut > self.expected_round_cut {
            self.smoothing * (allowed_cut - self.expected_round_cut)
                / (self.expected_cut() - self.expected_round_cut)
        } else {
            0.0
        }
    }

    /// One of the two curves bridging a straight edge and the central arc.
    #[allow(clippy::too_many_arguments)]
    fn flanking_curve(
        &self,
        actual_round_cut: f64,
        actual_smoothing: f64,
        side_direction: Vector,
        circle_segment_intersection: Point,
        other_circle_segment_intersection: Point,
        circle_center: Point,
        actual_r: f64,
    ) -> Cubic {
        // The flank starts on the edge, past the arc by the smoothing
        // factor.
        let curve_start =
            self.corner + side_direction * actual_round_cut * (1.0 + actual_smoothing);
        // It lands back on the circle at a point proportional to the
        // smoothing: nowhere at 0, halfway toward the other intersection
        // at 1.
        let p = circle_segment_intersection.lerp(
            circle_segment_intersection.lerp(other_circle_segment_intersection, 0.5),
            actual_smoothing,
        );
        let curve_end = circle_center + (p - circle_center).normalize() * actual_r;
        // The control point on the circle side sits where the tangent at
        // curve_end meets the edge, keeping the join smooth. A degenerate
        // intersection falls back onto the arc boundary.
        let circle_tangent = rotate90(curve_end - circle_center);
        let anchor_end = line_intersection(self.corner, side_direction, curve_end, circle_tangent)
            .unwrap_or(circle_segment_intersection);
        // The control point on the edge side: two thirds of the way from
        // the start toward the far control keeps the transition close to
        // curvature-continuous.
        let anchor_start = point(
            (curve_start.x + 2.0 * anchor_end.x) / 3.0,
            (curve_start.y + 2.0 * anchor_end.y) / 3.0,
        );
        Cubic::new(curve_start, anchor_start, anchor_end, curve_end)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn assert_near(a: Point, b: Point, tolerance: f64) {
        assert!((a - b).length() < tolerance, "{a:?} != {b:?}");
    }

    /// Closure and continuity: every polygon's outline must chain within
    /// the distance tolerance and come back to its start.
    pub(crate) fn check_outline(polygon: &RoundedPolygon) {
        let cubics = polygon.cubics();
        assert!(!cubics.is_empty());
        for i in 0..cubics.len() {
            let next = &cubics[(i + 1) % cubics.len()];
            assert_near(cubics[i].to, next.from, DISTANCE_EPSILON);
        }
    }

    #[test]
    fn unrounded_square() {
        let square = RoundedPolygon::from_vertices_count(
            4,
            1.0,
            CornerRounding::UNROUNDED,
            None,
            Point::zero(),
        )
        .unwrap();
        // The four vertices sit on the axes, so the diamond's bounds are
        // exactly the unit box.
        let bounds = square.bounding_box();
        assert_near(bounds.min, point(-1.0, -1.0), 1e-9);
        assert_near(bounds.max, point(1.0, 1.0), 1e-9);
        // Structurally: 4 corners carrying one placeholder curve each plus
        // 4 edges; the flat outline keeps only the edges.
        let feature_cubics: usize = square.features().iter().map(|f| f.cubics().len()).sum();
        assert_eq!(feature_cubics, 8);
        assert_eq!(square.cubics().len(), 4);
        check_outline(&square);
    }

    #[test]
    fn square_bounds_scenario() {
        // An axis-aligned unit-radius square from explicit vertices.
        let square = RoundedPolygon::from_vertices(
            &[1.0, 1.0, -1.0, 1.0, -1.0, -1.0, 1.0, -1.0],
            CornerRounding::UNROUNDED,
            None,
            Some(Point::zero()),
        )
        .unwrap();
        let bounds = square.bounding_box();
        assert_near(bounds.min, point(-1.0, -1.0), 1e-12);
        assert_near(bounds.max, point(1.0, 1.0), 1e-12);
    }

    #[test]
    fn duplicated_vertex_collapses() {
        let with_dup = RoundedPolygon::from_vertices(
            &[0.0, 0.0, 1.0, 0.0, 1.0, 0.0, 0.0, 1.0],
            CornerRounding::UNROUNDED,
            None,
            None,
        )
        .unwrap();
        let triangle = RoundedPolygon::from_vertices(
            &[0.0, 0.0, 1.0, 0.0, 0.0, 1.0],
            CornerRounding::UNROUNDED,
            None,
            None,
        )
        .unwrap();
        assert_eq!(with_dup.cubics().len(), triangle.cubics().len());
        for (a, b) in with_dup.cubics().iter().zip(triangle.cubics()) {
            assert_near(a.from, b.from, 1e-9);
            assert_near(a.ctrl1, b.ctrl1, 1e-9);
            assert_near(a.ctrl2, b.ctrl2, 1e-9);
            assert_near(a.to, b.to, 1e-9);
        }
    }

    #[test]
    fn degenerate_polygon_is_a_point() {
        let collapsed = RoundedPolygon::from_vertices_count(
            6,
            0.0,
            CornerRounding::new(0.1, 0.0).unwrap(),
            None,
            Point::zero(),
        )
        .unwrap();
        assert_eq!(collapsed.cubics().len(), 1);
        assert!(collapsed.cubics()[0].is_zero_length());
    }

    #[test]
    fn rounded_corners_consume_radius() {
        let rounded = RoundedPolygon::from_vertices_count(
            4,
            std::f64::consts::SQRT_2,
            CornerRounding::new(0.2, 0.0).unwrap(),
            None,
            Point::zero(),
        )
        .unwrap();
        check_outline(&rounded);
        // Each corner is three real curves, each edge one.
        assert_eq!(rounded.features().len(), 8);
        for feature in rounded.features() {
            if feature.is_corner() {
                assert_eq!(feature.cubics().len(), 3);
                assert!(feature.is_convex_corner());
            }
        }
        // The rounded diamond is strictly inside the sharp one, whose tips
        // reach sqrt(2) on each axis.
        let bounds = rounded.bounding_box();
        assert!(bounds.max.x < std::f64::consts::SQRT_2);
        assert!(bounds.max.y < std::f64::consts::SQRT_2);
        assert!(bounds.max.x > 1.2);
    }

    #[test]
    fn space_competition_scales_rounding() {
        // Corner radii that together want more than the full side length;
        // rounding must shrink proportionally and the outline stay closed.
        let squeezed = RoundedPolygon::from_vertices(
            &[0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.0, 1.0],
            CornerRounding::new(5.0, 0.0).unwrap(),
            None,
            None,
        )
        .unwrap();
        check_outline(&squeezed);
        let bounds = squeezed.bounding_box();
        assert!(bounds.max.x <= 1.0 + DISTANCE_EPSILON);
        assert!(bounds.min.x >= -DISTANCE_EPSILON);
    }

    #[test]
    fn smoothing_partial_allocation() {
        // Radius fits, radius + smoothing does not: smoothing must scale.
        let shape = RoundedPolygon::from_vertices(
            &[0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.0, 1.0],
            CornerRounding::new(0.4, 1.0).unwrap(),
            None,
            None,
        )
        .unwrap();
        check_outline(&shape);
    }

    #[test]
    fn concave_corners_detected() {
        // A dart: three convex tips and one concave notch.
        let dart = RoundedPolygon::from_vertices(
            &[0.0, -1.0, 1.0, 1.0, 0.0, 0.5, -1.0, 1.0],
            CornerRounding::UNROUNDED,
            None,
            None,
        )
        .unwrap();
        let concave = dart
            .features()
            .iter()
            .filter(|f| f.is_concave_corner())
            .count();
        let convex = dart
            .features()
            .iter()
            .filter(|f| f.is_convex_corner())
            .count();
        assert_eq!(concave + convex, 4);
        assert_eq!(concave, 1);
    }

    #[test]
    fn features_round_trip() {
        let source = RoundedPolygon::from_vertices_count(
            5,
            1.0,
            CornerRounding::new(0.2, 0.5).unwrap(),
            None,
            Point::zero(),
        )
        .unwrap();
        let rebuilt = RoundedPolygon::from_features_at(
            source.features().to_vec(),
            source.center(),
        )
        .unwrap();
        assert_eq!(source.cubics().len(), rebuilt.cubics().len());
        for (a, b) in source.cubics().iter().zip(rebuilt.cubics()) {
            assert_near(a.from, b.from, DISTANCE_EPSILON);
            assert_near(a.to, b.to, DISTANCE_EPSILON);
        }
    }

    #[test]
    fn from_features_rejects_broken_chain() {
        let a = Cubic::straight_line(point(0.0, 0.0), point(1.0, 0.0));
        let b = Cubic::straight_line(point(5.0, 0.0), point(0.0, 5.0));
        let features = vec![
            Feature::edge(vec![a]).unwrap(),
            Feature::edge(vec![b]).unwrap(),
        ];
        assert!(RoundedPolygon::from_features(features).is_err());
        assert!(RoundedPolygon::from_features(Vec::new()).is_err());
    }

    #[test]
    fn transform_linearity() {
        let shape = RoundedPolygon::from_vertices_count(
            6,
            1.0,
            CornerRounding::new(0.3, 0.0).unwrap(),
            None,
            Point::zero(),
        )
        .unwrap();
        let transform = crate::geom::Transform::new(2.0, 0.5, -0.5, 2.0, 3.0, -1.0);
        let moved = shape.transformed(&transform);
        for (a, b) in shape.cubics().iter().zip(moved.cubics()) {
            assert_near(transform.transform_point(a.from), b.from, DISTANCE_EPSILON);
            assert_near(transform.transform_point(a.ctrl1), b.ctrl1, DISTANCE_EPSILON);
            assert_near(transform.transform_point(a.ctrl2), b.ctrl2, DISTANCE_EPSILON);
            assert_near(transform.transform_point(a.to), b.to, DISTANCE_EPSILON);
        }
        check_outline(&moved);
    }

    #[test]
    fn normalized_fits_unit_square() {
        let shape = RoundedPolygon::from_vertices(
            &[0.0, 0.0, 4.0, 0.0, 4.0, 2.0, 0.0, 2.0],
            CornerRounding::new(0.5, 0.0).unwrap(),
            None,
            None,
        )
        .unwrap();
        let normalized = shape.normalized();
        let bounds = normalized.bounding_box();
        assert!(bounds.min.x >= -1e-9 && bounds.min.y >= -1e-9);
        assert!(bounds.max.x <= 1.0 + 1e-9 && bounds.max.y <= 1.0 + 1e-9);
        // The wide shape fills x and is centered in y.
        assert_near(
            point(bounds.min.x, 1.0 - bounds.max.y),
            point(0.0, bounds.min.y),
            1e-9,
        );
    }

    #[test]
    fn exact_bounds_within_fast_bounds() {
        let shape = RoundedPolygon::from_vertices_count(
            5,
            1.0,
            CornerRounding::new(0.4, 0.0).unwrap(),
            None,
            Point::zero(),
        )
        .unwrap();
        let exact = shape.bounding_box();
        let fast = shape.fast_bounding_box();
        assert!(fast.min.x <= exact.min.x && fast.min.y <= exact.min.y);
        assert!(fast.max.x >= exact.max.x && fast.max.y >= exact.max.y);
        // For a rounded shape the control hull sticks out on some axis.
        assert!(
            fast.max.x > exact.max.x
                || fast.max.y > exact.max.y
                || fast.min.x < exact.min.x
                || fast.min.y < exact.min.y
        );
        let max_bounds = shape.max_bounding_box();
        assert!(max_bounds.min.x <= exact.min.x && max_bounds.max.x >= exact.max.x);
        assert!(max_bounds.min.y <= exact.min.y && max_bounds.max.y >= exact.max.y);
    }

    #[test]
    fn max_bounds_rotation_invariant() {
        let shape = RoundedPolygon::from_vertices_count(
            3,
            1.0,
            CornerRounding::UNROUNDED,
            None,
            Point::zero(),
        )
        .unwrap();
        let max_bounds = shape.max_bounding_box();
        for i in 0..8 {
            let rotation = crate::geom::Rotation::new(crate::geom::Angle::radians(
                std::f64::consts::TAU * i as f64 / 8.0,
            ));
            let rotated = shape.transformed(&rotation);
            let bounds = rotated.bounding_box();
            assert!(bounds.min.x >= max_bounds.min.x - 1e-9);
            assert!(bounds.min.y >= max_bounds.min.y - 1e-9);
            assert!(bounds.max.x <= max_bounds.max.x + 1e-9);
            assert!(bounds.max.y <= max_bounds.max.y + 1e-9);
        }
    }

    #[test]
    fn randomized_outlines_stay_closed() {
        use rand::{Rng, SeedableRng};
        let mut rng = rand::rngs::StdRng::seed_from_u64(0x5eed);
        for _ in 0..50 {
            let n = rng.gen_range(3..9);
            let mut vertices = Vec::with_capacity(n * 2);
            for i in 0..n {
                let angle = std::f64::consts::TAU * i as f64 / n as f64;
                let radius = rng.gen_range(0.3..2.0);
                vertices.push(angle.cos() * radius);
                vertices.push(angle.sin() * radius);
            }
            let rounding =
                CornerRounding::new(rng.gen_range(0.0..1.0), rng.gen_range(0.0..1.0)).unwrap();
            let shape =
                RoundedPolygon::from_vertices(&vertices, rounding, None, None).unwrap();
            check_outline(&shape);
        }
    }

    #[test]
    fn rejects_bad_vertex_input() {
        assert!(RoundedPolygon::from_vertices(
            &[0.0, 0.0, 1.0, 0.0],
            CornerRounding::UNROUNDED,
            None,
            None
        )
        .is_err());
        assert!(RoundedPolygon::from_vertices(
            &[0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.5],
            CornerRounding::UNROUNDED,
            None,
            None
        )
        .is_err());
        assert!(RoundedPolygon::from_vertices(
            &[0.0, 0.0, 1.0, f64::NAN, 1.0, 1.0],
            CornerRounding::UNROUNDED,
            None,
            None
        )
        .is_err());
        let one_rounding = [CornerRounding::UNROUNDED];
        assert!(RoundedPolygon::from_vertices(
            &[0.0, 0.0, 1.0, 0.0, 1.0, 1.0],
            CornerRounding::UNROUNDED,
            Some(&one_rounding),
            None
        )
        .is_err());
        assert!(RoundedPolygon::from_vertices(
            &[0.0, 0.0, 1.0, 0.0, 1.0, 1.0],
            CornerRounding {
                radius: -1.0,
                smoothing: 0.0
            },
            None,
            None
        )
        .is_err());
    }

    #[test]
    fn flat_outline_starts_mid_corner() {
        let shape = RoundedPolygon::from_vertices_count(
            4,
            1.0,
            CornerRounding::new(0.2, 0.0).unwrap(),
            None,
            Point::zero(),
        )
        .unwrap();
        // The first feature is a corner with a 3-curve rounding; the flat
        // list must start half-way along its middle arc.
        let first_feature_cubics = shape.features()[0].cubics();
        let (_, second_half) = first_feature_cubics[1].split(0.5);
        assert_near(shape.cubics()[0].from, second_half.from, 1e-12);
    }

    #[test]
    fn vertex_count_vertices_on_circle() {
        let vertices = vertices_from_num_verts(4, 2.0, point(1.0, 0.0));
        assert_near(point(vertices[0], vertices[1]), point(3.0, 0.0), 1e-9);
        assert_near(point(vertices[2], vertices[3]), point(1.0, 2.0), 1e-9);
        assert_near(point(vertices[4], vertices[5]), point(-1.0, 0.0), 1e-9);
        assert_near(point(vertices[6], vertices[7]), point(1.0, -2.0), 1e-9);
    }

}
