#![deny(bare_trait_objects)]
#![deny(unconditional_recursion)]
#![allow(clippy::float_cmp)]

//! Rounded polygons and smooth morphing between them.
//!
//! This crate is reexported in [morpho](https://docs.rs/morpho/). It turns
//! an ordered vertex list plus per-vertex [`CornerRounding`] into a closed
//! chain of cubic bézier curves (a [`RoundedPolygon`]), and matches two
//! such outlines end-to-end so that plain linear interpolation of the
//! matched curves reads as a continuous shape animation (a [`Morph`]).
//!
//! # Example
//!
//! ```
//! use morpho_shapes::{CornerRounding, Morph, RoundedPolygon};
//! use morpho_shapes::geom::Point;
//!
//! let square = RoundedPolygon::from_vertices_count(
//!     4,
//!     1.0,
//!     CornerRounding::new(0.2, 0.0).unwrap(),
//!     None,
//!     Point::zero(),
//! )
//! .unwrap();
//! let circle = RoundedPolygon::circle(8, 1.0, Point::zero()).unwrap();
//!
//! let morph = Morph::new(square, circle).unwrap();
//! // Hand the interpolated curves to your renderer on every frame.
//! let outline = morph.at(0.25);
//! assert!(!outline.is_empty());
//! ```
//!
//! Rendering is out of scope: a host adapter consumes the curve lists and
//! turns them into its own path primitives (`move_to`, `cubic_to`,
//! `close`).

pub use morpho_geom as geom;

#[cfg(feature = "serialization")]
#[macro_use]
pub extern crate serde;

pub mod corner_rounding;
pub mod double_mapper;
pub mod error;
pub mod feature;
pub mod feature_mapping;
pub mod measure;
pub mod morph;
pub mod rounded_polygon;

mod factories;
mod utils;

#[doc(inline)]
pub use crate::corner_rounding::CornerRounding;
#[doc(inline)]
pub use crate::double_mapper::DoubleMapper;
#[doc(inline)]
pub use crate::error::{ShapeError, ShapeResult};
#[doc(inline)]
pub use crate::feature::{Feature, FeatureKind};
#[doc(inline)]
pub use crate::feature_mapping::feature_mapper;
#[doc(inline)]
pub use crate::measure::{
    LengthMeasurer, MeasuredCubic, MeasuredPolygon, Measurer, ProgressableFeature,
};
#[doc(inline)]
pub use crate::morph::Morph;
#[doc(inline)]
pub use crate::rounded_polygon::RoundedPolygon;

pub mod math {
    //! f64 versions of the geometric types used everywhere.

    pub use morpho_geom::{
        point, vector, Angle, Box2D, Point, Rotation, Scale, Size, Transform, Translation,
        Vector,
    };
}
