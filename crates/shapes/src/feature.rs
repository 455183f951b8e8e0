//! Semantic grouping of the curves along a shape outline.

use crate::error::{ShapeError, ShapeResult};
use crate::geom::tolerance::DISTANCE_EPSILON;
use crate::geom::traits::Transformation;
use crate::geom::Cubic;

/// What a run of consecutive outline curves represents.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FeatureKind {
    /// A straight or near-straight run between two corners. Edges do not
    /// take part in default morph matching.
    Edge,
    /// The curves replacing one rounded vertex. `convex` is true when the
    /// vertex turns outward, by the sign of the cross product of the
    /// incoming and outgoing edge directions under the feature's own
    /// traversal direction.
    Corner { convex: bool },
    /// Built like an edge, but explicitly excluded from morph matching by
    /// the caller.
    Ignorable,
}

/// A tagged group of contiguous curves on a shape outline.
///
/// Features preserve the semantics of the original vertices (corner versus
/// edge, convex versus concave) through transformations, which the morph
/// uses to match like with like. A feature always holds at least one curve
/// and its curves form a continuous chain.
#[derive(Clone, Debug, PartialEq)]
pub struct Feature {
    cubics: Vec<Cubic>,
    kind: FeatureKind,
}

impl Feature {
    /// An edge feature over `cubics`.
    pub fn edge(cubics: Vec<Cubic>) -> ShapeResult<Self> {
        Self::validated(cubics, FeatureKind::Edge)
    }

    /// A corner feature whose vertex turns outward.
    pub fn convex_corner(cubics: Vec<Cubic>) -> ShapeResult<Self> {
        Self::validated(cubics, FeatureKind::Corner { convex: true })
    }

    /// A corner feature whose vertex turns inward.
    pub fn concave_corner(cubics: Vec<Cubic>) -> ShapeResult<Self> {
        Self::validated(cubics, FeatureKind::Corner { convex: false })
    }

    /// An edge-like feature that morph matching must leave alone.
    pub fn ignorable(cubics: Vec<Cubic>) -> ShapeResult<Self> {
        Self::validated(cubics, FeatureKind::Ignorable)
    }

    fn validated(cubics: Vec<Cubic>, kind: FeatureKind) -> ShapeResult<Self> {
        if cubics.is_empty() {
            return Err(ShapeError::argument("a feature must have at least one curve"));
        }
        for window in cubics.windows(2) {
            if (window[0].to - window[1].from).length() >= DISTANCE_EPSILON {
                return Err(ShapeError::argument(
                    "feature curves must form a continuous chain",
                ));
            }
        }
        Ok(Feature { cubics, kind })
    }

    // The builder produces chains that are continuous by construction, no
    // need to re-validate them.
    pub(crate) fn corner_unchecked(cubics: Vec<Cubic>, convex: bool) -> Self {
        Feature {
            cubics,
            kind: FeatureKind::Corner { convex },
        }
    }

    pub(crate) fn edge_unchecked(cubics: Vec<Cubic>) -> Self {
        Feature {
            cubics,
            kind: FeatureKind::Edge,
        }
    }

    /// The curves making up this feature, in outline order.
    #[inline]
    pub fn cubics(&self) -> &[Cubic] {
        &self.cubics
    }

    #[inline]
    pub fn kind(&self) -> FeatureKind {
        self.kind
    }

    #[inline]
    pub fn is_edge(&self) -> bool {
        self.kind == FeatureKind::Edge
    }

    #[inline]
    pub fn is_corner(&self) -> bool {
        matches!(self.kind, FeatureKind::Corner { .. })
    }

    #[inline]
    pub fn is_convex_corner(&self) -> bool {
        self.kind == FeatureKind::Corner { convex: true }
    }

    #[inline]
    pub fn is_concave_corner(&self) -> bool {
        self.kind == FeatureKind::Corner { convex: false }
    }

    /// Whether default morph matching skips this feature.
    #[inline]
    pub fn is_ignorable(&self) -> bool {
        !self.is_corner()
    }

    /// The feature with all of its curves transformed.
    pub fn transformed<T: Transformation>(&self, transform: &T) -> Feature {
        Feature {
            cubics: self.cubics.iter().map(|c| c.transformed(transform)).collect(),
            kind: self.kind,
        }
    }

    /// The feature traversed in the opposite direction.
    ///
    /// Reversing flips the apparent winding, so the convexity flag of a
    /// corner is negated to keep the cross-product definition consistent
    /// with the new traversal direction.
    pub fn reversed(&self) -> Feature {
        let kind = match self.kind {
            FeatureKind::Corner { convex } => FeatureKind::Corner { convex: !convex },
            other => other,
        };
        Feature {
            cubics: self.cubics.iter().rev().map(|c| c.flip()).collect(),
            kind,
        }
    }
}

#[cfg(test)]
use crate::geom::point;

#[test]
fn rejects_empty_and_discontinuous() {
    assert!(Feature::edge(Vec::new()).is_err());
    let a = Cubic::straight_line(point(0.0, 0.0), point(1.0, 0.0));
    let gap = Cubic::straight_line(point(2.0, 0.0), point(3.0, 0.0));
    assert!(Feature::edge(vec![a, gap]).is_err());
    let b = Cubic::straight_line(point(1.0, 0.0), point(1.0, 1.0));
    assert!(Feature::edge(vec![a, b]).is_ok());
}

#[test]
fn queries_follow_kind() {
    let line = Cubic::straight_line(point(0.0, 0.0), point(1.0, 0.0));
    let edge = Feature::edge(vec![line]).unwrap();
    assert!(edge.is_edge() && edge.is_ignorable() && !edge.is_corner());

    let corner = Feature::convex_corner(vec![line]).unwrap();
    assert!(corner.is_corner() && corner.is_convex_corner());
    assert!(!corner.is_concave_corner() && !corner.is_ignorable());

    let marked = Feature::ignorable(vec![line]).unwrap();
    assert!(marked.is_ignorable() && !marked.is_edge());
}

#[test]
fn reversed_reverses_chain_and_convexity() {
    let a = Cubic::straight_line(point(0.0, 0.0), point(1.0, 0.0));
    let b = Cubic::straight_line(point(1.0, 0.0), point(1.0, 1.0));
    let corner = Feature::convex_corner(vec![a, b]).unwrap();
    let reversed = corner.reversed();
    assert!(reversed.is_concave_corner());
    assert_eq!(reversed.cubics()[0].from, point(1.0, 1.0));
    assert_eq!(reversed.cubics()[1].to, point(0.0, 0.0));
    // Reversing twice gets the original back.
    assert_eq!(reversed.reversed(), corner);
}

#[test]
fn transformed_maps_every_point() {
    use crate::geom::traits::PointMap;
    use crate::geom::Point;

    let line = Cubic::straight_line(point(0.0, 0.0), point(1.0, 0.0));
    let edge = Feature::edge(vec![line]).unwrap();
    let moved = edge.transformed(&PointMap(|p: Point| point(p.x, p.y + 2.0)));
    assert_eq!(moved.cubics()[0].from, point(0.0, 2.0));
    assert_eq!(moved.cubics()[0].to, point(1.0, 2.0));
}
