//! Geolith reads and writes vector geometries in common text formats and runs geometry algorithms on them.
//!
//! The geometry model lives in the [`geolith_types`] crate, which is re-exported here. This crate adds:
//!
//! * [`adapters`](adapter) converting geometries from and to KML, WKT/EWKT and GeoJSON,
//! * [`registries`](registry) of format names and of markup element names,
//! * an optional accelerated [`backend`] for some of the algorithms,
//! * the [`Geolith`] facade tying all of that together.
//!
//! ```
//! use geolith::{Geolith, GeometryOps, WriteOptions};
//!
//! let geolith = Geolith::new();
//! let polygon = geolith
//!     .load("POLYGON((1 1,5 1,5 5,1 5,1 1),(2 2,2 3,3 3,3 2,2 2))", "wkt")
//!     .unwrap();
//!
//! assert_eq!(polygon.area(), 15.0);
//!
//! let kml = geolith.write(&polygon.centroid().into(), "kml", &WriteOptions::default()).unwrap();
//! assert!(kml.starts_with("<Point><coordinates>"));
//! ```

#![warn(clippy::unwrap_used)]
#![warn(missing_docs)]

pub mod adapter;
pub mod backend;
pub mod error;
pub mod registry;

use std::fmt::{Debug, Formatter};
use std::sync::Arc;

pub use adapter::{GeoAdapter, WriteOptions};
pub use error::GeolithError;
pub use registry::{geometry_type_registry, AdapterRegistry, GeometryTypeRegistry};

// Reexport geolith_types
pub use geolith_types;
pub use geolith_types::{
    Coord, Geometry, GeometryCollection, GeometryOps, GeometryType, LineString, MultiLineString,
    MultiPoint, MultiPolygon, Point, Polygon, WithMeta,
};

use adapter::Kml;
use backend::{Backend, Operation};

/// Entry point of the library: format lookup, reading and writing, and backend-aware algorithms.
///
/// The facade is cheap to clone and can be shared between threads.
#[derive(Clone)]
pub struct Geolith {
    adapters: AdapterRegistry,
    geometry_types: Arc<GeometryTypeRegistry>,
    backend: Option<Arc<dyn Backend>>,
}

impl Geolith {
    /// Creates a facade with all standard adapters and no backend.
    pub fn new() -> Self {
        Self {
            adapters: AdapterRegistry::standard(),
            geometry_types: geometry_type_registry(),
            backend: None,
        }
    }

    /// Replaces the format registry.
    pub fn with_adapters(mut self, adapters: AdapterRegistry) -> Self {
        self.adapters = adapters;
        self
    }

    /// Replaces the element name registry. If a `kml` adapter is registered, it is recreated to use it.
    pub fn with_geometry_types(mut self, geometry_types: Arc<GeometryTypeRegistry>) -> Self {
        if self.adapters.contains("kml") {
            self.adapters
                .register("kml", Arc::new(Kml::with_registry(geometry_types.clone())));
        }
        self.geometry_types = geometry_types;
        self
    }

    /// Sets the accelerated backend.
    pub fn with_backend(mut self, backend: Arc<dyn Backend>) -> Self {
        log::debug!("Using {} geometry backend", backend.name());
        self.backend = Some(backend);
        self
    }

    /// Element name registry used by the facade.
    pub fn geometry_type_registry(&self) -> &GeometryTypeRegistry {
        &self.geometry_types
    }

    /// Adapter registered for the format name.
    pub fn adapter(&self, format: &str) -> Result<Arc<dyn GeoAdapter>, GeolithError> {
        self.adapters.get(format)
    }

    /// Parses the text in the given format.
    pub fn load(&self, text: &str, format: &str) -> Result<Geometry, GeolithError> {
        self.adapter(format)?.read(text)
    }

    /// Serializes the geometry into the given format.
    pub fn write(
        &self,
        geometry: &Geometry,
        format: &str,
        options: &WriteOptions,
    ) -> Result<String, GeolithError> {
        self.adapter(format)?.write(geometry, options)
    }

    /// Area of the geometry.
    pub fn area(&self, geometry: &Geometry) -> f64 {
        self.delegate(Operation::Area, geometry.geometry_type(), |b| b.area(geometry))
            .unwrap_or_else(|| geometry.area())
    }

    /// Planar length of the geometry.
    pub fn length(&self, geometry: &Geometry) -> f64 {
        self.delegate(Operation::Length, geometry.geometry_type(), |b| {
            b.length(geometry)
        })
            .unwrap_or_else(|| geometry.length())
    }

    /// Centroid of the geometry.
    pub fn centroid(&self, geometry: &Geometry) -> Point {
        self.delegate(Operation::Centroid, geometry.geometry_type(), |b| {
            b.centroid(geometry)
        })
            .unwrap_or_else(|| geometry.centroid())
    }

    /// Whether the geometry has no self intersections.
    pub fn is_simple(&self, geometry: &Geometry) -> bool {
        self.delegate(Operation::IsSimple, geometry.geometry_type(), |b| {
            b.is_simple(geometry)
        })
            .unwrap_or_else(|| geometry.is_simple())
    }

    /// Whether the polygon contains the other geometry.
    pub fn contains(&self, polygon: &Polygon, other: &Geometry) -> bool {
        self.delegate(Operation::Contains, polygon.geometry_type(), |b| {
            b.contains(polygon, other)
        })
            .unwrap_or_else(|| polygon.contains(other))
    }

    /// Minimum planar distance between the geometries, `None` if either is empty.
    pub fn distance(&self, a: &Geometry, b: &Geometry) -> Option<f64> {
        self.delegate(Operation::Distance, a.geometry_type(), |backend| {
            backend.distance(a, b)
        })
            .or_else(|| a.distance(b))
    }

    fn delegate<T>(
        &self,
        operation: Operation,
        geometry_type: GeometryType,
        run: impl FnOnce(&dyn Backend) -> Option<T>,
    ) -> Option<T> {
        let backend = self.backend.as_deref()?;
        if !backend.supports(operation, geometry_type) {
            return None;
        }

        let result = run(backend);
        if result.is_none() {
            log::debug!(
                "Backend {} declined {operation:?} for {}, using portable algorithm",
                backend.name(),
                geometry_type
            );
        }

        result
    }
}

impl Default for Geolith {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for Geolith {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Geolith")
            .field("adapters", &self.adapters)
            .field("backend", &self.backend.as_ref().map(|b| b.name()))
            .finish()
    }
}
