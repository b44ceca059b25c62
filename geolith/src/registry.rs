//! Lookup tables of the facade: element names to geometry types, and format names to adapters.

use std::collections::HashMap;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use geolith_types::GeometryType;
use lazy_static::lazy_static;

use crate::adapter::{GeoAdapter, Kml, Wkt};
use crate::error::GeolithError;

lazy_static! {
    static ref STANDARD_GEOMETRY_TYPES: Arc<GeometryTypeRegistry> =
        Arc::new(GeometryTypeRegistry::standard());
}

/// Standard element name registry, shared by all adapters that do not get a custom one.
pub fn geometry_type_registry() -> Arc<GeometryTypeRegistry> {
    STANDARD_GEOMETRY_TYPES.clone()
}

/// Maps markup element names to geometry types.
///
/// Lookups ignore case and namespace prefixes, so `kml:Point`, `Point` and `point` are the same name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeometryTypeRegistry {
    names: HashMap<String, GeometryType>,
}

impl GeometryTypeRegistry {
    /// Registry without any names.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Names of all geometry types, plus `MultiGeometry` as an alias of `GeometryCollection`.
    pub fn standard() -> Self {
        GeometryType::ALL
            .iter()
            .fold(Self::empty(), |registry, ty| registry.with_alias(ty.name(), *ty))
            .with_alias("MultiGeometry", GeometryType::GeometryCollection)
    }

    /// Adds a name for the geometry type, replacing the previous meaning of the name.
    pub fn with_alias(mut self, name: &str, geometry_type: GeometryType) -> Self {
        let key = normalize(name);
        if let Some(previous) = self.names.insert(key, geometry_type) {
            if previous != geometry_type {
                log::warn!("Element name '{name}' is remapped from {previous} to {geometry_type}");
            }
        }
        self
    }

    /// Geometry type of the element, if the name is known.
    pub fn resolve(&self, element_name: &str) -> Option<GeometryType> {
        self.names.get(&normalize(element_name)).copied()
    }
}

fn normalize(name: &str) -> String {
    let local = name.rsplit_once(':').map_or(name, |(_, local)| local);
    local.to_lowercase()
}

/// Format name to adapter mapping used by the facade.
///
/// Format names are case-insensitive. Several names can point to the same adapter.
#[derive(Clone, Default)]
pub struct AdapterRegistry {
    adapters: HashMap<String, Arc<dyn GeoAdapter>>,
}

impl AdapterRegistry {
    /// Registry without adapters.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Registry with all the adapters of the crate: `kml`, `wkt`, `ewkt` and, with the `geojson` feature, `geojson`
    /// (also available as `json`).
    pub fn standard() -> Self {
        let registry = Self::empty()
            .with_adapter("kml", Arc::new(Kml::new()))
            .with_adapter("wkt", Arc::new(Wkt::standard()))
            .with_adapter("ewkt", Arc::new(Wkt::extended()));

        #[cfg(feature = "geojson")]
        let registry = {
            let geojson: Arc<dyn GeoAdapter> = Arc::new(crate::adapter::GeoJson::new());
            registry
                .with_adapter("geojson", geojson.clone())
                .with_adapter("json", geojson)
        };

        registry
    }

    /// Registers an adapter under the name, returning the adapter previously registered with it.
    pub fn register(
        &mut self,
        name: &str,
        adapter: Arc<dyn GeoAdapter>,
    ) -> Option<Arc<dyn GeoAdapter>> {
        let previous = self.adapters.insert(name.to_lowercase(), adapter);
        if previous.is_some() {
            log::warn!("Adapter for format '{name}' is replaced");
        }
        previous
    }

    /// Builder-style version of [`AdapterRegistry::register`].
    pub fn with_adapter(mut self, name: &str, adapter: Arc<dyn GeoAdapter>) -> Self {
        self.register(name, adapter);
        self
    }

    /// Returns true if an adapter is registered under the name.
    pub fn contains(&self, name: &str) -> bool {
        self.adapters.contains_key(&name.to_lowercase())
    }

    /// Adapter for the format.
    pub fn get(&self, name: &str) -> Result<Arc<dyn GeoAdapter>, GeolithError> {
        self.adapters
            .get(&name.to_lowercase())
            .cloned()
            .ok_or_else(|| GeolithError::UnknownFormat(name.to_string()))
    }

    /// Registered format names in alphabetical order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.adapters.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl Debug for AdapterRegistry {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdapterRegistry")
            .field("formats", &self.names())
            .finish()
    }
}
