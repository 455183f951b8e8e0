#![deny(bare_trait_objects)]
#![deny(unconditional_recursion)]
#![allow(clippy::many_single_char_names)]

//! Double-precision 2D geometric primitives on top of euclid.
//!
//! This crate is reexported in [morpho](https://docs.rs/morpho/). It holds
//! the curve-level building blocks of the shape-morphing crates:
//!
//! - the [`Cubic`] bézier segment, with evaluation, splitting, bounds and
//!   arc construction,
//! - unit-less `f64` aliases of the euclid types,
//! - the numeric tolerances shared by every crate in the workspace.

// Reexport dependencies.
pub use arrayvec;
pub use euclid;

#[cfg(feature = "serialization")]
#[macro_use]
pub extern crate serde;

pub mod cubic;
pub mod tolerance;
pub mod utils;

#[doc(inline)]
pub use crate::cubic::Cubic;

/// Alias for `euclid::default::Point2D<f64>`.
pub type Point = euclid::default::Point2D<f64>;

/// Alias for `euclid::default::Vector2D<f64>`.
pub type Vector = euclid::default::Vector2D<f64>;

/// Alias for `euclid::default::Size2D<f64>`.
pub type Size = euclid::default::Size2D<f64>;

/// Alias for `euclid::default::Box2D<f64>`.
pub type Box2D = euclid::default::Box2D<f64>;

/// Alias for `euclid::default::Transform2D<f64>`.
pub type Transform = euclid::default::Transform2D<f64>;

/// Alias for `euclid::default::Rotation2D<f64>`.
pub type Rotation = euclid::default::Rotation2D<f64>;

/// Alias for `euclid::default::Translation2D<f64>`.
pub type Translation = euclid::Translation2D<f64, euclid::UnknownUnit, euclid::UnknownUnit>;

/// Alias for `euclid::default::Scale<f64>`.
pub type Scale = euclid::default::Scale<f64>;

/// An angle in radians.
pub type Angle = euclid::Angle<f64>;

/// Shorthand for `Vector::new(x, y)`.
#[inline]
pub fn vector(x: f64, y: f64) -> Vector {
    Vector::new(x, y)
}

/// Shorthand for `Point::new(x, y)`.
#[inline]
pub fn point(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

pub mod traits {
    use crate::{Point, Rotation, Scale, Transform, Translation};

    /// Maps points to points.
    ///
    /// The shape types apply transformations to the control points of their
    /// curves rather than keeping a transform around, so anything that can
    /// map a point works: the euclid transforms as well as plain closures
    /// through [`PointMap`].
    pub trait Transformation {
        fn transform_point(&self, p: Point) -> Point;
    }

    impl Transformation for Transform {
        fn transform_point(&self, p: Point) -> Point {
            self.transform_point(p)
        }
    }

    impl Transformation for Rotation {
        fn transform_point(&self, p: Point) -> Point {
            self.transform_point(p)
        }
    }

    impl Transformation for Translation {
        fn transform_point(&self, p: Point) -> Point {
            self.transform_point(p)
        }
    }

    impl Transformation for Scale {
        fn transform_point(&self, p: Point) -> Point {
            (*self).transform_point(p)
        }
    }

    // Automatically implement Transformation for all &Transformation.
    impl<'l, T: Transformation> Transformation for &'l T {
        #[inline]
        fn transform_point(&self, p: Point) -> Point {
            (*self).transform_point(p)
        }
    }

    /// Adapter implementing [`Transformation`] for a point-mapping closure.
    pub struct PointMap<F>(pub F);

    impl<F: Fn(Point) -> Point> Transformation for PointMap<F> {
        #[inline]
        fn transform_point(&self, p: Point) -> Point {
            (self.0)(p)
        }
    }
}
