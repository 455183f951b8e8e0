#![deny(bare_trait_objects)]

//! Rounded polygons that morph into each other.
//!
//! # Crates
//!
//! This meta-crate (`morpho`) reexports the following sub-crates for
//! convenience:
//!
//! * **morpho_shapes** - rounded polygon construction and the morph engine.
//! * **morpho_geom** - f64 cubic bézier curves and vector math on top of
//!   euclid.
//!
//! Each `morpho_<name>` crate is reexported as a `<name>` module, so
//! `use morpho_shapes::RoundedPolygon;` and
//! `use morpho::shapes::RoundedPolygon;` are equivalent.
//!
//! # Feature flags
//!
//! Serialization of the value types using serde can be enabled on each
//! crate with the `serialization` feature flag (disabled by default).
//!
//! # Example
//!
//! ```
//! use morpho::math::Point;
//! use morpho::shapes::{CornerRounding, Morph, RoundedPolygon};
//!
//! let triangle = RoundedPolygon::from_vertices_count(
//!     3,
//!     1.0,
//!     CornerRounding::new(0.25, 0.5).unwrap(),
//!     None,
//!     Point::zero(),
//! )
//! .unwrap();
//! let pill = RoundedPolygon::pill(2.0, 1.0, 0.0, Point::zero()).unwrap();
//!
//! let morph = Morph::new(triangle, pill).unwrap();
//! for step in 0..=4 {
//!     let outline = morph.at(step as f64 / 4.0);
//!     // Convert `outline` into your platform's path type here.
//!     assert!(!outline.is_empty());
//! }
//! ```

pub extern crate morpho_geom;
pub extern crate morpho_shapes;

pub use morpho_geom as geom;
pub use morpho_shapes as shapes;

pub use shapes::math;
