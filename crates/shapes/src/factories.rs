//! Parametric shape factories: circles, rectangles, stars and pills.
//!
//! Each of these reduces to a vertex list plus rounding configuration and
//! goes through the standard corner construction in
//! [`RoundedPolygon::from_vertices`].

use crate::corner_rounding::CornerRounding;
use crate::error::{ShapeError, ShapeResult};
use crate::geom::utils::{direction_vector, interpolate, radial_to_cartesian};
use crate::geom::{point, Point};
use crate::rounded_polygon::RoundedPolygon;
use crate::utils::positive_modulo;

use std::f64::consts::{FRAC_PI_2, PI, TAU};

impl RoundedPolygon {
    /// A circle of `radius`, approximated by `num_vertices` fully rounded
    /// corners.
    ///
    /// The underlying polygon's radius is `radius / cos(π / num_vertices)`
    /// so the corner arcs land exactly on the requested circle.
    pub fn circle(num_vertices: usize, radius: f64, center: Point) -> ShapeResult<RoundedPolygon> {
        if num_vertices < 3 {
            return Err(ShapeError::argument(
                "circles must have at least 3 vertices",
            ));
        }
        if !(radius > 0.0) {
            return Err(ShapeError::argument("radius must be positive"));
        }
        let theta = PI / num_vertices as f64;
        let polygon_radius = radius / theta.cos();
        RoundedPolygon::from_vertices_count(
            num_vertices,
            polygon_radius,
            CornerRounding::new(radius, 0.0)?,
            None,
            center,
        )
    }

    /// An axis-aligned `width` by `height` rectangle around `center`.
    pub fn rectangle(
        width: f64,
        height: f64,
        rounding: CornerRounding,
        per_vertex_rounding: Option<&[CornerRounding]>,
        center: Point,
    ) -> ShapeResult<RoundedPolygon> {
        if !(width > 0.0) || !(height > 0.0) {
            return Err(ShapeError::argument(
                "rectangle width and height must be positive",
            ));
        }
        let left = center.x - width / 2.0;
        let top = center.y - height / 2.0;
        let right = center.x + width / 2.0;
        let bottom = center.y + height / 2.0;
        let vertices = [right, bottom, left, bottom, left, top, right, top];
        RoundedPolygon::from_vertices(&vertices, rounding, per_vertex_rounding, Some(center))
    }

    /// A star with `num_vertices_per_radius` outer points at `radius` and
    /// as many inner points at `inner_radius`.
    ///
    /// `inner_rounding`, when provided without an explicit per-vertex list,
    /// expands into alternating outer/inner rounding values.
    pub fn star(
        num_vertices_per_radius: usize,
        radius: f64,
        inner_radius: f64,
        rounding: CornerRounding,
        inner_rounding: Option<CornerRounding>,
        per_vertex_rounding: Option<&[CornerRounding]>,
        center: Point,
    ) -> ShapeResult<RoundedPolygon> {
        if num_vertices_per_radius < 3 {
            return Err(ShapeError::argument(
                "stars must have at least 3 vertices per radius",
            ));
        }
        if !(radius > 0.0) || !(inner_radius > 0.0) {
            return Err(ShapeError::argument(
                "star radii must both be greater than 0",
            ));
        }
        if inner_radius >= radius {
            return Err(ShapeError::argument(
                "inner radius must be less than the outer radius",
            ));
        }
        let expanded;
        let pvr = match (per_vertex_rounding, inner_rounding) {
            (Some(pvr), _) => Some(pvr),
            (None, Some(inner)) => {
                expanded = (0..num_vertices_per_radius)
                    .flat_map(|_| [rounding, inner])
                    .collect::<Vec<_>>();
                Some(expanded.as_slice())
            }
            (None, None) => None,
        };
        let vertices = star_vertices(num_vertices_per_radius, radius, inner_radius, center);
        RoundedPolygon::from_vertices(&vertices, rounding, pvr, Some(center))
    }

    /// A pill: two semicircular end caps joined by straight edges.
    ///
    /// Modeled as a rectangle whose corner radius is half the smaller
    /// dimension; adjacent corner arcs then meet and form the caps.
    pub fn pill(
        width: f64,
        height: f64,
        smoothing: f64,
        center: Point,
    ) -> ShapeResult<RoundedPolygon> {
        if !(width > 0.0) || !(height > 0.0) {
            return Err(ShapeError::argument(
                "pill width and height must be positive",
            ));
        }
        let w_half = width / 2.0;
        let h_half = height / 2.0;
        let vertices = [
            w_half + center.x,
            h_half + center.y,
            -w_half + center.x,
            h_half + center.y,
            -w_half + center.x,
            -h_half + center.y,
            w_half + center.x,
            -h_half + center.y,
        ];
        RoundedPolygon::from_vertices(
            &vertices,
            CornerRounding::new(w_half.min(h_half), smoothing)?,
            None,
            Some(center),
        )
    }

    /// A star whose vertices lie along the contour of a pill.
    ///
    /// `inner_radius_ratio` scales the inner vertices toward the pill's
    /// spine. `vertex_spacing` balances how vertices are spaced around the
    /// curved caps: at 0 spacing follows the inner radius, at 1 the outer.
    /// `start_location` rotates the whole vertex pattern along the contour
    /// by a fraction of its perimeter.
    #[allow(clippy::too_many_arguments)]
    pub fn pill_star(
        width: f64,
        height: f64,
        num_vertices_per_radius: usize,
        inner_radius_ratio: f64,
        rounding: CornerRounding,
        inner_rounding: Option<CornerRounding>,
        per_vertex_rounding: Option<&[CornerRounding]>,
        vertex_spacing: f64,
        start_location: f64,
        center: Point,
    ) -> ShapeResult<RoundedPolygon> {
        if num_vertices_per_radius < 3 {
            return Err(ShapeError::argument(
                "pill stars must have at least 3 vertices per radius",
            ));
        }
        if !(width > 0.0) || !(height > 0.0) {
            return Err(ShapeError::argument(
                "pill star width and height must be positive",
            ));
        }
        if !(inner_radius_ratio > 0.0 && inner_radius_ratio < 1.0) {
            return Err(ShapeError::argument(
                "inner radius ratio must be between 0 and 1",
            ));
        }
        if !(0.0..=1.0).contains(&vertex_spacing) || !(0.0..=1.0).contains(&start_location) {
            return Err(ShapeError::argument(
                "vertex spacing and start location must be in [0, 1]",
            ));
        }
        let expanded;
        let pvr = match (per_vertex_rounding, inner_rounding) {
            (Some(pvr), _) => Some(pvr),
            (None, Some(inner)) => {
                expanded = (0..num_vertices_per_radius)
                    .flat_map(|_| [rounding, inner])
                    .collect::<Vec<_>>();
                Some(expanded.as_slice())
            }
            (None, None) => None,
        };
        let vertices = pill_star_vertices(
            num_vertices_per_radius,
            width,
            height,
            inner_radius_ratio,
            vertex_spacing,
            start_location,
        );
        let vertices: Vec<f64> = vertices
            .chunks(2)
            .flat_map(|xy| [xy[0] + center.x, xy[1] + center.y])
            .collect();
        RoundedPolygon::from_vertices(&vertices, rounding, pvr, Some(center))
    }
}

fn star_vertices(
    num_vertices_per_radius: usize,
    radius: f64,
    inner_radius: f64,
    center: Point,
) -> Vec<f64> {
    let mut result = Vec::with_capacity(num_vertices_per_radius * 4);
    let step = TAU / num_vertices_per_radius as f64;
    for i in 0..num_vertices_per_radius {
        let outer = center + radial_to_cartesian(radius, step * i as f64);
        result.push(outer.x);
        result.push(outer.y);
        let inner = center + radial_to_cartesian(inner_radius, step * i as f64 + step / 2.0);
        result.push(inner.x);
        result.push(inner.y);
    }
    result
}

/// Walks the pill contour, dropping alternating outer/inner vertices at
/// regular intervals of its (spacing-adjusted) perimeter.
///
/// The contour splits into eleven consecutive sections, starting at the
/// middle of the right side and winding through positive y: two half
/// edges at the seam, four quarter-circle caps and the straight runs
/// between them. Degenerate sections (a square pill has no straight runs)
/// simply have zero length and are stepped over.
fn pill_star_vertices(
    num_vertices_per_radius: usize,
    width: f64,
    height: f64,
    inner_radius_ratio: f64,
    vertex_spacing: f64,
    start_location: f64,
) -> Vec<f64> {
    let endcap_radius = width.min(height) / 2.0;
    let v_seg_len = (height - width).max(0.0);
    let h_seg_len = (width - height).max(0.0);
    let v_seg_half = v_seg_len / 2.0;
    let h_seg_half = h_seg_len / 2.0;
    let circle_perimeter =
        TAU * endcap_radius * interpolate(inner_radius_ratio, 1.0, vertex_spacing);
    let perimeter = 2.0 * h_seg_len + 2.0 * v_seg_len + circle_perimeter;
    let quarter = circle_perimeter / 4.0;

    let mut sections = [0.0; 11];
    sections[1] = v_seg_half;
    sections[2] = sections[1] + quarter;
    sections[3] = sections[2] + h_seg_len;
    sections[4] = sections[3] + quarter;
    sections[5] = sections[4] + v_seg_len;
    sections[6] = sections[5] + quarter;
    sections[7] = sections[6] + h_seg_len;
    sections[8] = sections[7] + quarter;
    sections[9] = sections[8] + v_seg_half;
    sections[10] = perimeter;

    let t_per_vertex = perimeter / (2.0 * num_vertices_per_radius as f64);
    let mut inner = false;
    let mut t = start_location * perimeter;
    let mut result = Vec::with_capacity(num_vertices_per_radius * 4);
    for _ in 0..num_vertices_per_radius * 2 {
        let bounded_t = positive_modulo(t, perimeter);
        let mut section = 0;
        while section < 10 && bounded_t >= sections[section + 1] {
            section += 1;
        }
        let t_in_section = bounded_t - sections[section];
        let section_len = sections[section + 1] - sections[section];
        let t_proportion = if section_len > 0.0 {
            t_in_section / section_len
        } else {
            0.0
        };

        let curr_radius = if inner {
            endcap_radius * inner_radius_ratio
        } else {
            endcap_radius
        };
        let vertex = match section {
            // Right edge, downward.
            0 => point(h_seg_half + curr_radius, t_in_section),
            // Bottom-right cap.
            1 => {
                point(h_seg_half, v_seg_half)
                    + direction_vector(t_proportion * FRAC_PI_2) * curr_radius
            }
            // Bottom edge, right to left.
            2 => point(
                h_seg_half - t_proportion * h_seg_len,
                v_seg_half + curr_radius,
            ),
            // Bottom-left cap.
            3 => {
                point(-h_seg_half, v_seg_half)
                    + direction_vector(FRAC_PI_2 + t_proportion * FRAC_PI_2) * curr_radius
            }
            // Left edge, upward.
            4 => point(-(h_seg_half + curr_radius), v_seg_half - t_in_section),
            // Top-left cap.
            5 => {
                point(-h_seg_half, -v_seg_half)
                    + direction_vector(PI + t_proportion * FRAC_PI_2) * curr_radius
            }
            // Top edge, left to right.
            6 => point(
                -h_seg_half + t_proportion * h_seg_len,
                -(v_seg_half + curr_radius),
            ),
            // Top-right cap.
            7 => {
                point(h_seg_half, -v_seg_half)
                    + direction_vector(3.0 * FRAC_PI_2 + t_proportion * FRAC_PI_2) * curr_radius
            }
            // Right edge again, closing toward the seam.
            _ => point(h_seg_half + curr_radius, -v_seg_half + t_in_section),
        };
        result.push(vertex.x);
        result.push(vertex.y);
        t += t_per_vertex;
        inner = !inner;
    }
    result
}
