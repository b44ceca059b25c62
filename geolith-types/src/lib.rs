//! Geometry model and algorithms used by [`geolith`](https://docs.rs/geolith).
//!
//! The crate defines a closed set of vector geometry variants, wrapped into the [`Geometry`] enum:
//!
//! * [`Point`] - zero-dimensional geometry with optional `z` and `m` ordinates,
//! * [`LineString`] - ordered sequence of coordinates,
//! * [`Polygon`] - one exterior ring and zero or more holes,
//! * [`MultiPoint`], [`MultiLineString`], [`MultiPolygon`] - homogeneous collections,
//! * [`GeometryCollection`] - heterogeneous, possibly nested collection.
//!
//! All variants implement the [`GeometryOps`] trait, which gives access to metrics (area, planar and geodesic
//! lengths, centroid, bounding rectangle), predicates (simplicity, emptiness) and distances. Geometries are
//! validated when constructed and never change afterwards, so a tree can be freely shared between threads.
//!
//! ```
//! use geolith_types::{Coord, GeometryOps, LineString, Polygon};
//!
//! let ring = LineString::new(vec![
//!     Coord::new(0.0, 0.0),
//!     Coord::new(4.0, 0.0),
//!     Coord::new(4.0, 4.0),
//!     Coord::new(0.0, 4.0),
//!     Coord::new(0.0, 0.0),
//! ])
//! .unwrap();
//! let polygon = Polygon::new(vec![ring]).unwrap();
//!
//! assert_eq!(polygon.area(), 16.0);
//! assert_eq!(polygon.centroid().coord(), Some(&Coord::new(2.0, 2.0)));
//! ```

pub mod cartesian;
mod collection;
mod coord;
pub mod error;
pub mod geo;
#[cfg(feature = "geo-types")]
mod geo_types;
mod geometry;
mod geometry_type;
mod line_string;
mod meta;
mod point;
mod polygon;
pub mod segment;

pub use collection::{
    Collection, CollectionMember, GeometryCollection, MultiLineString, MultiPoint, MultiPolygon,
};
pub use coord::Coord;
pub use geometry::{Geometry, GeometryOps, Part};
pub use geometry_type::GeometryType;
pub use line_string::LineString;
pub use meta::{Data, Meta, WithMeta};
pub use point::Point;
pub use polygon::{AreaOptions, PointInPolygonOptions, Polygon};
