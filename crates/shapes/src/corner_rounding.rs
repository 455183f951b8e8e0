//! Per-vertex rounding configuration.

use crate::error::{ShapeError, ShapeResult};

/// How much one vertex of a polygon gets rounded, and how.
///
/// `radius` is the radius of the circular arc that replaces the sharp
/// vertex, expressed in the polygon's own coordinate frame. Transforms
/// applied to a built polygon carry through naturally because they act on
/// the curves themselves, not on this configuration.
///
/// `smoothing`, in `[0, 1]`, controls how far the rounded region extends
/// past the circular arc along the two edges. At 0 the corner is the pure
/// arc; at 1 each flank consumes as much edge again as the arc did,
/// trading circularity for a softer transition.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct CornerRounding {
    pub radius: f64,
    pub smoothing: f64,
}

impl CornerRounding {
    /// No rounding at all: the vertex stays a sharp corner.
    pub const UNROUNDED: CornerRounding = CornerRounding {
        radius: 0.0,
        smoothing: 0.0,
    };

    pub fn new(radius: f64, smoothing: f64) -> ShapeResult<Self> {
        if !(radius >= 0.0) {
            return Err(ShapeError::argument(format!(
                "corner radius must be >= 0, got {radius}"
            )));
        }
        if !(0.0..=1.0).contains(&smoothing) {
            return Err(ShapeError::argument(format!(
                "smoothing must be in [0, 1], got {smoothing}"
            )));
        }
        Ok(CornerRounding { radius, smoothing })
    }

    /// A pure circular rounding without smoothing.
    pub fn circular(radius: f64) -> ShapeResult<Self> {
        Self::new(radius, 0.0)
    }
}

impl Default for CornerRounding {
    fn default() -> Self {
        CornerRounding::UNROUNDED
    }
}

#[test]
fn rejects_out_of_range() {
    assert!(CornerRounding::new(-1.0, 0.0).is_err());
    assert!(CornerRounding::new(f64::NAN, 0.0).is_err());
    assert!(CornerRounding::new(1.0, 1.5).is_err());
    assert!(CornerRounding::new(1.0, -0.1).is_err());
    assert!(CornerRounding::new(1.0, 1.0).is_ok());
    assert!(CornerRounding::new(0.0, 0.0).is_ok());
}
