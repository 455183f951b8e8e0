//! Smooth interpolation between two rounded polygons.

use crate::error::{ShapeError, ShapeResult};
use crate::feature_mapping::feature_mapper;
use crate::geom::tolerance::ANGLE_EPSILON;
use crate::geom::{Box2D, Cubic};
use crate::measure::{LengthMeasurer, MeasuredPolygon};
use crate::rounded_polygon::RoundedPolygon;
use crate::utils::positive_modulo;

/// A precomputed morph between two shapes.
///
/// Construction measures both outlines, matches their corner features,
/// re-origins the second outline at the point matching the first one's
/// start, and cuts both into the same number of curve segments. After
/// that, evaluating the morph at any progress is a plain lerp over the
/// matched curve pairs, cheap enough to run on every animation frame.
pub struct Morph {
    start: RoundedPolygon,
    end: RoundedPolygon,
    morph_match: Vec<(Cubic, Cubic)>,
}

impl Morph {
    pub fn new(start: RoundedPolygon, end: RoundedPolygon) -> ShapeResult<Morph> {
        let morph_match = Self::match_shapes(&start, &end)?;
        Ok(Morph {
            start,
            end,
            morph_match,
        })
    }

    /// The curve pairs the morph interpolates between.
    #[inline]
    pub fn pairs(&self) -> &[(Cubic, Cubic)] {
        &self.morph_match
    }

    /// Walks both measured outlines in lockstep, splitting whichever curve
    /// extends past the other's end, until both are consumed and every
    /// emitted pair covers the same progress span on both shapes.
    fn match_shapes(
        p1: &RoundedPolygon,
        p2: &RoundedPolygon,
    ) -> ShapeResult<Vec<(Cubic, Cubic)>> {
        let measured1 = MeasuredPolygon::measure(LengthMeasurer, p1)?;
        let measured2 = MeasuredPolygon::measure(LengthMeasurer, p2)?;

        // Map the corner features of one shape to the other.
        let mapper = feature_mapper(measured1.features(), measured2.features())?;

        // The progress on shape 2 matching shape 1's outline origin.
        let cut_point = mapper.map(0.0);

        // Re-origin the second shape there; the first one stays put.
        let bs1 = measured1;
        let bs2 = measured2.cut_and_shift(cut_point)?;

        let mut ret = Vec::new();
        let mut i1 = 1;
        let mut i2 = 1;
        let mut b1 = bs1.get(0).cloned();
        let mut b2 = bs2.get(0).cloned();
        while let (Some(cur1), Some(cur2)) = (b1.as_ref(), b2.as_ref()) {
            // The progress at which each current curve ends, in shape 1's
            // progress space.
            let b1a = if i1 == bs1.len() {
                1.0
            } else {
                cur1.end_outline_progress()
            };
            let b2a = if i2 == bs2.len() {
                1.0
            } else {
                mapper.map_back(positive_modulo(
                    cur2.end_outline_progress() + cut_point,
                    1.0,
                ))
            };
            let minb = b1a.min(b2a);

            // The curve that ends first is consumed whole; the other is
            // split at the match point (when it overshoots by more than
            // rounding noise).
            let (seg1, new_b1) = if b1a > minb + ANGLE_EPSILON {
                let (seg, rest) = bs1.cut_at_progress(cur1, minb)?;
                (seg, Some(rest))
            } else {
                let next = bs1.get(i1).cloned();
                i1 += 1;
                (cur1.clone(), next)
            };
            let (seg2, new_b2) = if b2a > minb + ANGLE_EPSILON {
                let (seg, rest) = bs2.cut_at_progress(
                    cur2,
                    positive_modulo(mapper.map(minb) - cut_point, 1.0),
                )?;
                (seg, Some(rest))
            } else {
                let next = bs2.get(i2).cloned();
                i2 += 1;
                (cur2.clone(), next)
            };
            ret.push((*seg1.cubic(), *seg2.cubic()));
            b1 = new_b1;
            b2 = new_b2;
        }
        if b1.is_some() || b2.is_some() {
            return Err(ShapeError::state(
                "expected both outlines to be fully matched",
            ));
        }
        Ok(ret)
    }

    /// The morphed outline at `progress`: 0 is the start shape, 1 the end
    /// shape, values in between interpolate, values outside extrapolate.
    pub fn at(&self, progress: f64) -> Vec<Cubic> {
        let mut out = Vec::new();
        self.at_into(progress, &mut out);
        out
    }

    /// Like [`Morph::at`], writing into `out` to avoid allocating on every
    /// animation frame. `out` is cleared first and its storage reused.
    pub fn at_into(&self, progress: f64, out: &mut Vec<Cubic>) {
        out.clear();
        out.reserve(self.morph_match.len());
        for (a, b) in &self.morph_match {
            out.push(a.interpolated(b, progress));
        }
        // Snap the outline exactly closed against interpolation drift.
        if let Some(&first) = out.first() {
            let last = out.len() - 1;
            out[last].to = first.from;
        }
    }

    /// Union of the source shapes' exact bounds; every interpolated shape
    /// stays inside it.
    pub fn bounding_box(&self) -> Box2D {
        self.start.bounding_box().union(&self.end.bounding_box())
    }

    /// Union of the source shapes' control-hull bounds.
    pub fn fast_bounding_box(&self) -> Box2D {
        self.start
            .fast_bounding_box()
            .union(&self.end.fast_bounding_box())
    }

    /// Union of the source shapes' rotation-invariant bounds.
    pub fn max_bounding_box(&self) -> Box2D {
        self.start
            .max_bounding_box()
            .union(&self.end.max_bounding_box())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corner_rounding::CornerRounding;
    use crate::geom::tolerance::DISTANCE_EPSILON;
    use crate::geom::{point, Point};

    fn shape(n: usize, radius: f64, rounding: f64) -> RoundedPolygon {
        RoundedPolygon::from_vertices_count(
            n,
            radius,
            CornerRounding::new(rounding, 0.0).unwrap(),
            None,
            Point::zero(),
        )
        .unwrap()
    }

    fn check_closed_chain(cubics: &[Cubic]) {
        assert!(!cubics.is_empty());
        for i in 0..cubics.len() {
            let next = &cubics[(i + 1) % cubics.len()];
            assert!(
                (cubics[i].to - next.from).length() < DISTANCE_EPSILON,
                "chain breaks after segment {i}"
            );
        }
    }

    /// The outline of `cubics` passes through all the positions the
    /// polygon's own outline passes through.
    fn check_same_outline(cubics: &[Cubic], polygon: &RoundedPolygon) {
        for reference in polygon.cubics() {
            for i in 0..=4 {
                let p = reference.sample(i as f64 / 4.0);
                let closest = cubics
                    .iter()
                    .flat_map(|c| (0..=64).map(move |j| c.sample(j as f64 / 64.0)))
                    .map(|q| (q - p).length())
                    .fold(f64::INFINITY, f64::min);
                assert!(closest < 0.02, "outline point {p:?} drifted by {closest}");
            }
        }
    }

    #[test]
    fn morph_endpoints_match_sources() {
        let square = shape(4, 1.0, 0.2);
        let pentagon = shape(5, 1.2, 0.1);
        let morph = Morph::new(square.clone(), pentagon.clone()).unwrap();
        check_same_outline(&morph.at(0.0), &square);
        check_same_outline(&morph.at(1.0), &pentagon);
    }

    #[test]
    fn morph_stays_closed_at_all_progresses() {
        let morph = Morph::new(shape(3, 1.0, 0.15), shape(6, 1.3, 0.3)).unwrap();
        for i in 0..=10 {
            let cubics = morph.at(i as f64 / 10.0);
            check_closed_chain(&cubics);
        }
        // Extrapolation stays well-defined and closed too.
        check_closed_chain(&morph.at(-0.25));
        check_closed_chain(&morph.at(1.25));
    }

    #[test]
    fn morph_of_identical_shapes_is_stable() {
        let square = shape(4, 1.0, 0.2);
        let morph = Morph::new(square.clone(), square.clone()).unwrap();
        for progress in [0.0, 0.3, 0.7, 1.0] {
            check_same_outline(&morph.at(progress), &square);
        }
    }

    #[test]
    fn matched_pairs_cover_both_outlines() {
        let a = shape(4, 1.0, 0.2);
        let b = shape(5, 1.0, 0.2);
        let morph = Morph::new(a, b).unwrap();
        let pairs = morph.pairs();
        assert!(!pairs.is_empty());
        // Both sides of the pair list chain up into closed outlines.
        let firsts: Vec<Cubic> = pairs.iter().map(|p| p.0).collect();
        let seconds: Vec<Cubic> = pairs.iter().map(|p| p.1).collect();
        check_closed_chain(&firsts);
        check_closed_chain(&seconds);
    }

    #[test]
    fn at_into_reuses_buffer() {
        let morph = Morph::new(shape(4, 1.0, 0.2), shape(5, 1.0, 0.2)).unwrap();
        let mut buffer = Vec::new();
        morph.at_into(0.25, &mut buffer);
        let len = buffer.len();
        let capacity = buffer.capacity();
        morph.at_into(0.75, &mut buffer);
        assert_eq!(buffer.len(), len);
        assert_eq!(buffer.capacity(), capacity);
        check_closed_chain(&buffer);
    }

    #[test]
    fn bounds_contain_every_interpolation() {
        let morph = Morph::new(shape(3, 1.0, 0.0), shape(8, 1.5, 0.4)).unwrap();
        let bounds = morph.bounding_box();
        for i in 0..=8 {
            let cubics = morph.at(i as f64 / 8.0);
            for c in &cubics {
                for j in 0..=8 {
                    let p = c.sample(j as f64 / 8.0);
                    assert!(p.x >= bounds.min.x - 1e-9 && p.x <= bounds.max.x + 1e-9);
                    assert!(p.y >= bounds.min.y - 1e-9 && p.y <= bounds.max.y + 1e-9);
                }
            }
        }
        let fast = morph.fast_bounding_box();
        assert!(fast.min.x <= bounds.min.x && fast.max.x >= bounds.max.x);
        assert!(fast.min.y <= bounds.min.y && fast.max.y >= bounds.max.y);
    }

    #[test]
    fn randomized_morphs_stay_closed() {
        use rand::{Rng, SeedableRng};
        let mut rng = rand::rngs::StdRng::seed_from_u64(7);
        for _ in 0..10 {
            let a = shape(
                rng.gen_range(3..8),
                rng.gen_range(0.5..1.5),
                rng.gen_range(0.0..0.4),
            );
            let b = shape(
                rng.gen_range(3..8),
                rng.gen_range(0.5..1.5),
                rng.gen_range(0.0..0.4),
            );
            let morph = Morph::new(a, b).unwrap();
            for _ in 0..5 {
                check_closed_chain(&morph.at(rng.gen_range(0.0..1.0)));
            }
        }
    }

    #[test]
    fn morph_between_concave_and_convex() {
        let star = RoundedPolygon::star(
            5,
            1.0,
            0.5,
            CornerRounding::new(0.1, 0.0).unwrap(),
            None,
            None,
            Point::zero(),
        )
        .unwrap();
        let circle = RoundedPolygon::circle(8, 1.0, point(0.0, 0.0)).unwrap();
        let morph = Morph::new(star, circle).unwrap();
        for i in 0..=4 {
            check_closed_chain(&morph.at(i as f64 / 4.0));
        }
    }
}
