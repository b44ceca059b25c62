//! Accelerated implementations of geometry algorithms.
//!
//! A [`Backend`] is an optional strategy given to the [`Geolith`](crate::Geolith) facade. Before running a portable
//! algorithm the facade asks the backend whether it [`supports`](Backend::supports) the operation for the geometry
//! type. If it does, the backend result is used, otherwise (or if the backend returns `None`) the portable algorithm
//! of `geolith-types` runs. Both must agree within floating point tolerance.

use geolith_types::{Geometry, GeometryType, Point, Polygon};

#[cfg(feature = "geo")]
mod geo;

#[cfg(feature = "geo")]
pub use self::geo::GeoBackend;

/// Operation that can be delegated to a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Planar area.
    Area,
    /// Planar length or perimeter.
    Length,
    /// Centroid.
    Centroid,
    /// Simplicity check.
    IsSimple,
    /// Polygon containment. The backend is asked with the type of the containing polygon.
    Contains,
    /// Minimum planar distance between two geometries. The backend is asked with the type of the first one.
    Distance,
}

/// Native implementation of some of the geometry algorithms.
///
/// All methods have default implementations that decline the operation, so a backend implements only what it can
/// do.
pub trait Backend: Send + Sync {
    /// Name of the backend, used in log messages.
    fn name(&self) -> &'static str;

    /// Returns true if the backend can run the operation for geometries of the given type.
    fn supports(&self, operation: Operation, geometry_type: GeometryType) -> bool;

    /// Planar area.
    fn area(&self, _geometry: &Geometry) -> Option<f64> {
        None
    }

    /// Planar length.
    fn length(&self, _geometry: &Geometry) -> Option<f64> {
        None
    }

    /// Centroid.
    fn centroid(&self, _geometry: &Geometry) -> Option<Point> {
        None
    }

    /// Simplicity check.
    fn is_simple(&self, _geometry: &Geometry) -> Option<bool> {
        None
    }

    /// Whether the polygon contains the other geometry.
    fn contains(&self, _polygon: &Polygon, _other: &Geometry) -> Option<bool> {
        None
    }

    /// Minimum distance between two geometries.
    fn distance(&self, _a: &Geometry, _b: &Geometry) -> Option<f64> {
        None
    }
}
