//! Pairing the corners of two shapes ahead of a morph.
//!
//! Corners are matched greedily by proximity of their representative
//! points, under two constraints: a convex corner only pairs with a convex
//! one (same for concave), and the resulting progress mapping must not
//! cross itself — traversing one outline must traverse the other in the
//! same cyclic order.

use crate::double_mapper::DoubleMapper;
use crate::error::{ShapeError, ShapeResult};
use crate::feature::Feature;
use crate::geom::tolerance::DISTANCE_EPSILON;
use crate::geom::{point, Point};
use crate::measure::ProgressableFeature;
use crate::utils::{positive_modulo, progress_distance, progress_in_range};

use std::collections::HashSet;

/// Builds the progress mapping between two measured outlines from their
/// corner features.
pub fn feature_mapper(
    features1: &[ProgressableFeature],
    features2: &[ProgressableFeature],
) -> ShapeResult<DoubleMapper> {
    // Only corners participate; edges and ignorable features follow along.
    let filtered1: Vec<&ProgressableFeature> =
        features1.iter().filter(|f| f.feature.is_corner()).collect();
    let filtered2: Vec<&ProgressableFeature> =
        features2.iter().filter(|f| f.feature.is_corner()).collect();
    let mapping = build_mapping(&filtered1, &filtered2)?;
    DoubleMapper::new(&mapping)
}

struct DistanceVertex {
    distance: f64,
    f1: usize,
    f2: usize,
}

fn build_mapping(
    features1: &[&ProgressableFeature],
    features2: &[&ProgressableFeature],
) -> ShapeResult<Vec<(f64, f64)>> {
    let mut distance_vertex_list = Vec::new();
    for (i, f1) in features1.iter().enumerate() {
        for (j, f2) in features2.iter().enumerate() {
            if let Some(distance) = feature_dist_squared(&f1.feature, &f2.feature) {
                distance_vertex_list.push(DistanceVertex {
                    distance,
                    f1: i,
                    f2: j,
                });
            }
        }
    }
    distance_vertex_list.sort_by(|a, b| a.distance.total_cmp(&b.distance));

    // Without matchable corners there is nothing to anchor the mapping on.
    if distance_vertex_list.is_empty() {
        return Ok(vec![(0.0, 0.0), (0.5, 0.5)]);
    }
    // A single candidate still needs a second pair for a usable cyclic
    // mapping; mirror it half a turn away.
    if distance_vertex_list.len() == 1 {
        let d = &distance_vertex_list[0];
        let f1 = features1[d.f1].progress;
        let f2 = features2[d.f2].progress;
        return Ok(vec![
            (f1, f2),
            (
                positive_modulo(f1 + 0.5, 1.0),
                positive_modulo(f2 + 0.5, 1.0),
            ),
        ]);
    }

    let mut helper = MappingHelper::default();
    for d in &distance_vertex_list {
        helper.add_mapping(features1[d.f1], d.f1, features2[d.f2], d.f2)?;
    }
    Ok(helper.mapping)
}

/// Distance measure between two features, or `None` when the pair is not
/// allowed to match.
fn feature_dist_squared(f1: &Feature, f2: &Feature) -> Option<f64> {
    if f1.is_corner() && f2.is_corner() && f1.is_convex_corner() != f2.is_convex_corner() {
        // Concave and convex corners must never match; morphing one into
        // the other reads as the shape turning itself inside out.
        return None;
    }
    Some((feature_representative_point(f1) - feature_representative_point(f2)).square_length())
}

/// The midpoint of a feature's endpoints.
fn feature_representative_point(feature: &Feature) -> Point {
    let cubics = feature.cubics();
    let first = &cubics[0];
    let last = &cubics[cubics.len() - 1];
    point(
        (first.from.x + last.to.x) / 2.0,
        (first.from.y + last.to.y) / 2.0,
    )
}

/// Accumulates accepted pairs in source-progress order, rejecting pairs
/// that would land on top of an existing one or make the target sequence
/// cross over itself.
#[derive(Default)]
struct MappingHelper {
    mapping: Vec<(f64, f64)>,
    used_f1: HashSet<usize>,
    used_f2: HashSet<usize>,
}

impl MappingHelper {
    fn add_mapping(
        &mut self,
        f1: &ProgressableFeature,
        index1: usize,
        f2: &ProgressableFeature,
        index2: usize,
    ) -> ShapeResult<()> {
        // Each feature matches at most once.
        if self.used_f1.contains(&index1) || self.used_f2.contains(&index2) {
            return Ok(());
        }
        let insertion_index = match self
            .mapping
            .binary_search_by(|probe| probe.0.total_cmp(&f1.progress))
        {
            Ok(_) => {
                return Err(ShapeError::state(
                    "two features cannot share the same progress",
                ))
            }
            Err(i) => i,
        };
        let n = self.mapping.len();
        if n >= 1 {
            let (before1, before2) = self.mapping[(insertion_index + n - 1) % n];
            let (after1, after2) = self.mapping[insertion_index % n];
            // Pairs whose progress is virtually equal to a neighbor's would
            // make the mapper unstable.
            if progress_distance(f1.progress, before1) < DISTANCE_EPSILON
                || progress_distance(f1.progress, after1) < DISTANCE_EPSILON
                || progress_distance(f2.progress, before2) < DISTANCE_EPSILON
                || progress_distance(f2.progress, after2) < DISTANCE_EPSILON
            {
                return Ok(());
            }
            // With two or more pairs in place, the new target progress has
            // to fall between its neighbors' targets.
            if n > 1 && !progress_in_range(f2.progress, before2, after2) {
                return Ok(());
            }
        }
        self.mapping.insert(insertion_index, (f1.progress, f2.progress));
        self.used_f1.insert(index1);
        self.used_f2.insert(index2);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corner_rounding::CornerRounding;
    use crate::measure::{LengthMeasurer, MeasuredPolygon};
    use crate::rounded_polygon::RoundedPolygon;

    fn measured_features(polygon: &RoundedPolygon) -> Vec<ProgressableFeature> {
        MeasuredPolygon::measure(LengthMeasurer, polygon)
            .unwrap()
            .features()
            .to_vec()
    }

    fn regular(n: usize) -> RoundedPolygon {
        RoundedPolygon::from_vertices_count(
            n,
            1.0,
            CornerRounding::new(0.2, 0.0).unwrap(),
            None,
            Point::zero(),
        )
        .unwrap()
    }

    #[test]
    fn same_shape_maps_near_identity() {
        let features = measured_features(&regular(4));
        let mapper = feature_mapper(&features, &features).unwrap();
        for x in [0.0, 0.2, 0.5, 0.8] {
            assert!(
                progress_distance(mapper.map(x), x) < 1e-6,
                "{x} mapped to {}",
                mapper.map(x)
            );
        }
    }

    #[test]
    fn mapping_does_not_cross() {
        let features1 = measured_features(&regular(4));
        let features2 = measured_features(&regular(7));
        let filtered1: Vec<&ProgressableFeature> = features1.iter().collect();
        let filtered2: Vec<&ProgressableFeature> = features2.iter().collect();
        let mapping = build_mapping(&filtered1, &filtered2).unwrap();
        assert!(mapping.len() >= 2);
        // Source progresses are sorted; target progresses must then wrap
        // at most once when traversed in that order.
        let mut wraps = 0;
        for i in 0..mapping.len() {
            assert!(i == 0 || mapping[i].0 > mapping[i - 1].0);
            let prev = mapping[(i + mapping.len() - 1) % mapping.len()].1;
            if mapping[i].1 < prev {
                wraps += 1;
            }
        }
        assert!(wraps <= 1, "target sequence crosses: {mapping:?}");
    }

    #[test]
    fn convexity_is_preserved() {
        // A star has concave corners; a plain polygon has none. None of
        // the star's inner corners may match any of the polygon's.
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
        let pentagon = regular(5);
        let star_features = measured_features(&star);
        let pentagon_features = measured_features(&pentagon);
        for f1 in &star_features {
            if !f1.feature.is_concave_corner() {
                continue;
            }
            for f2 in &pentagon_features {
                assert!(feature_dist_squared(&f1.feature, &f2.feature).is_none());
            }
        }
        // The mapper still succeeds using the convex corners alone.
        assert!(feature_mapper(&star_features, &pentagon_features).is_ok());
    }

    #[test]
    fn no_corners_falls_back_to_identity_pairs() {
        let mapping = build_mapping(&[], &[]).unwrap();
        assert_eq!(mapping, vec![(0.0, 0.0), (0.5, 0.5)]);
    }

    #[test]
    fn representative_point_is_endpoint_midpoint() {
        use crate::geom::Cubic;
        let line = Cubic::straight_line(point(0.0, 0.0), point(2.0, 0.0));
        let edge = Feature::edge(vec![line]).unwrap();
        assert_eq!(feature_representative_point(&edge), point(1.0, 0.0));
    }
}
