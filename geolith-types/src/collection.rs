use serde::{Deserialize, Serialize};

use crate::error::GeolithTypesError;
use crate::geometry::Part;
use crate::meta::{Meta, WithMeta};
use crate::{Coord, Geometry, GeometryOps, GeometryType, LineString, Point, Polygon};

/// Collection of points.
pub type MultiPoint = Collection<Point>;
/// Collection of line strings.
pub type MultiLineString = Collection<LineString>;
/// Collection of polygons.
pub type MultiPolygon = Collection<Polygon>;
/// Collection of arbitrary geometries, possibly nested.
pub type GeometryCollection = Collection<Geometry>;

/// Geometry type that can be a component of a [`Collection`].
pub trait CollectionMember: GeometryOps + Sized {
    /// Type of the collection of such components.
    const COLLECTION_TYPE: GeometryType;
    /// Dimension of an empty collection of such components.
    const EMPTY_DIMENSION: u8;

    /// Unwraps the geometry into a component, failing if it has a different type.
    fn try_from_geometry(geometry: Geometry) -> Result<Self, GeolithTypesError>;
}

macro_rules! impl_collection_member {
    ($member:ident, $collection_type:ident, $dimension:literal) => {
        impl CollectionMember for $member {
            const COLLECTION_TYPE: GeometryType = GeometryType::$collection_type;
            const EMPTY_DIMENSION: u8 = $dimension;

            fn try_from_geometry(geometry: Geometry) -> Result<Self, GeolithTypesError> {
                match geometry {
                    Geometry::$member(v) => Ok(v),
                    other => Err(GeolithTypesError::InvalidGeometry(format!(
                        "{} cannot contain {}",
                        GeometryType::$collection_type,
                        other.geometry_type()
                    ))),
                }
            }
        }
    };
}

impl_collection_member!(Point, MultiPoint, 0);
impl_collection_member!(LineString, MultiLineString, 1);
impl_collection_member!(Polygon, MultiPolygon, 2);

impl CollectionMember for Geometry {
    const COLLECTION_TYPE: GeometryType = GeometryType::GeometryCollection;
    const EMPTY_DIMENSION: u8 = 0;

    fn try_from_geometry(geometry: Geometry) -> Result<Self, GeolithTypesError> {
        Ok(geometry)
    }
}

/// Ordered set of geometries owned by the collection.
///
/// Metrics of a collection are aggregated from the metrics of its components.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collection<G> {
    components: Vec<G>,
    meta: Meta,
}

impl<G> Default for Collection<G> {
    fn default() -> Self {
        Self {
            components: vec![],
            meta: Meta::default(),
        }
    }
}

impl<G> Collection<G> {
    /// Creates a new collection.
    pub fn new(components: Vec<G>) -> Self {
        Self {
            components,
            meta: Meta::default(),
        }
    }

    /// Creates an empty collection.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Components of the collection.
    pub fn components(&self) -> &[G] {
        &self.components
    }

    /// Iterates over the components.
    pub fn iter(&self) -> impl Iterator<Item = &G> {
        self.components.iter()
    }

    /// Number of components.
    pub fn num_geometries(&self) -> usize {
        self.components.len()
    }

    /// Component by its 1-based index.
    pub fn geometry_n(&self, n: usize) -> Option<&G> {
        self.components.get(n.checked_sub(1)?)
    }

    /// Takes the components out of the collection.
    pub fn into_components(self) -> Vec<G> {
        self.components
    }
}

impl<G: CollectionMember> Collection<G> {
    /// Builds a collection from generic geometries, checking that all of them have the component type.
    pub fn from_geometries(geometries: Vec<Geometry>) -> Result<Self, GeolithTypesError> {
        Ok(Self::new(
            geometries
                .into_iter()
                .map(G::try_from_geometry)
                .collect::<Result<_, _>>()?,
        ))
    }
}

impl<G> From<Vec<G>> for Collection<G> {
    fn from(components: Vec<G>) -> Self {
        Self::new(components)
    }
}

impl<G> WithMeta for Collection<G> {
    fn meta(&self) -> &Meta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut Meta {
        &mut self.meta
    }
}

impl<G: CollectionMember> GeometryOps for Collection<G> {
    fn geometry_type(&self) -> GeometryType {
        G::COLLECTION_TYPE
    }

    fn dimension(&self) -> u8 {
        self.components
            .iter()
            .map(|c| c.dimension())
            .max()
            .unwrap_or(G::EMPTY_DIMENSION)
    }

    fn is_empty(&self) -> bool {
        self.components.iter().all(|c| c.is_empty())
    }

    fn coords(&self) -> impl Iterator<Item = &Coord> {
        self.components.iter().flat_map(|c| c.coords())
    }

    /// Centroid of the components of the highest dimension, weighted by their area, length or count.
    fn centroid(&self) -> Point {
        let dimension = self.dimension();
        let weighted: Vec<(Coord, f64)> = self
            .components
            .iter()
            .filter(|c| !c.is_empty() && c.dimension() == dimension)
            .filter_map(|c| {
                let center = *c.centroid().coord()?;
                let weight = match dimension {
                    0 => 1.0,
                    1 => c.length(),
                    _ => c.area(),
                };
                Some((center, weight))
            })
            .collect();

        let total: f64 = weighted.iter().map(|(_, w)| w).sum();
        let (x, y, total) = if total > 0.0 {
            weighted.iter().fold((0.0, 0.0, total), |(x, y, t), (c, w)| {
                (x + c.x * w, y + c.y * w, t)
            })
        } else {
            // degenerate components count equally
            weighted.iter().fold((0.0, 0.0, 0.0), |(x, y, t), (c, _)| {
                (x + c.x, y + c.y, t + 1.0)
            })
        };

        if total == 0.0 {
            return Point::empty();
        }

        Point::new(x / total, y / total)
    }

    fn area(&self) -> f64 {
        self.components.iter().map(|c| c.area()).sum()
    }

    fn length(&self) -> f64 {
        self.components.iter().map(|c| c.length()).sum()
    }

    fn length_3d(&self) -> f64 {
        self.components.iter().map(|c| c.length_3d()).sum()
    }

    fn great_circle_length(&self, radius: f64) -> f64 {
        self.components
            .iter()
            .map(|c| c.great_circle_length(radius))
            .sum()
    }

    fn haversine_length(&self) -> f64 {
        self.components.iter().map(|c| c.haversine_length()).sum()
    }

    fn vincenty_length(&self) -> Option<f64> {
        self.components.iter().map(|c| c.vincenty_length()).sum()
    }

    fn elevation_gain(&self, tolerance: f64) -> f64 {
        self.components
            .iter()
            .map(|c| c.elevation_gain(tolerance))
            .sum()
    }

    fn elevation_loss(&self, tolerance: f64) -> f64 {
        self.components
            .iter()
            .map(|c| c.elevation_loss(tolerance))
            .sum()
    }

    fn is_simple(&self) -> bool {
        self.components.iter().all(|c| c.is_simple())
    }

    fn boundary(&self) -> Result<Geometry, GeolithTypesError> {
        if self.is_empty() {
            return Ok(Geometry::LineString(LineString::empty()));
        }

        let boundaries = self
            .components
            .iter()
            .map(|c| c.boundary())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Geometry::GeometryCollection(GeometryCollection::new(
            boundaries,
        )))
    }

    fn parts(&self) -> Vec<Part<'_>> {
        self.components.iter().flat_map(|c| c.parts()).collect()
    }
}
