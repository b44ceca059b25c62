use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Type tag of a geometry variant.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd, Eq, Ord, Hash, Deserialize, Serialize)]
pub enum GeometryType {
    /// [`Point`](crate::Point)
    Point,
    /// [`LineString`](crate::LineString)
    LineString,
    /// [`Polygon`](crate::Polygon)
    Polygon,
    /// [`MultiPoint`](crate::MultiPoint)
    MultiPoint,
    /// [`MultiLineString`](crate::MultiLineString)
    MultiLineString,
    /// [`MultiPolygon`](crate::MultiPolygon)
    MultiPolygon,
    /// [`GeometryCollection`](crate::GeometryCollection)
    GeometryCollection,
}

impl GeometryType {
    /// All variants, simple ones first.
    pub const ALL: [GeometryType; 7] = [
        GeometryType::Point,
        GeometryType::LineString,
        GeometryType::Polygon,
        GeometryType::MultiPoint,
        GeometryType::MultiLineString,
        GeometryType::MultiPolygon,
        GeometryType::GeometryCollection,
    ];

    /// Name of the type as used by OGC Simple Features.
    pub fn name(&self) -> &'static str {
        match self {
            GeometryType::Point => "Point",
            GeometryType::LineString => "LineString",
            GeometryType::Polygon => "Polygon",
            GeometryType::MultiPoint => "MultiPoint",
            GeometryType::MultiLineString => "MultiLineString",
            GeometryType::MultiPolygon => "MultiPolygon",
            GeometryType::GeometryCollection => "GeometryCollection",
        }
    }

    /// Returns true for the `Multi*` variants and for `GeometryCollection`.
    pub fn is_collection(&self) -> bool {
        matches!(
            self,
            GeometryType::MultiPoint
                | GeometryType::MultiLineString
                | GeometryType::MultiPolygon
                | GeometryType::GeometryCollection
        )
    }
}

impl Display for GeometryType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
