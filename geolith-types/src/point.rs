use serde::{Deserialize, Serialize};

use crate::error::GeolithTypesError;
use crate::geometry::Part;
use crate::meta::{impl_with_meta, Meta};
use crate::{Coord, Geometry, GeometryCollection, GeometryOps, GeometryType};

/// Zero-dimensional geometry. A point may be empty, which is not the same as a point at the origin.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    coord: Option<Coord>,
    meta: Meta,
}

impl Point {
    /// Creates a 2d point.
    pub fn new(x: f64, y: f64) -> Self {
        Self::from_coord(Coord::new(x, y))
    }

    /// Creates a 3d point.
    pub fn new_3d(x: f64, y: f64, z: f64) -> Self {
        Self::from_coord(Coord::new_3d(x, y, z))
    }

    /// Creates a point at the given position.
    pub fn from_coord(coord: Coord) -> Self {
        Self {
            coord: Some(coord),
            meta: Meta::default(),
        }
    }

    /// Creates an empty point.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Position of the point, `None` for an empty point.
    pub fn coord(&self) -> Option<&Coord> {
        self.coord.as_ref()
    }

    /// X coordinate.
    pub fn x(&self) -> Option<f64> {
        self.coord.map(|c| c.x)
    }

    /// Y coordinate.
    pub fn y(&self) -> Option<f64> {
        self.coord.map(|c| c.y)
    }

    /// Elevation.
    pub fn z(&self) -> Option<f64> {
        self.coord.and_then(|c| c.z)
    }

    /// Measure.
    pub fn m(&self) -> Option<f64> {
        self.coord.and_then(|c| c.m)
    }

    /// Returns true if the point has elevation.
    pub fn has_z(&self) -> bool {
        self.z().is_some()
    }

    /// Ordinates of the point, empty for an empty point.
    pub fn as_array(&self) -> Vec<f64> {
        self.coord.map(|c| c.as_array()).unwrap_or_default()
    }
}

impl From<Coord> for Point {
    fn from(coord: Coord) -> Self {
        Self::from_coord(coord)
    }
}

impl_with_meta!(Point);

impl GeometryOps for Point {
    fn geometry_type(&self) -> GeometryType {
        GeometryType::Point
    }

    fn dimension(&self) -> u8 {
        0
    }

    fn is_empty(&self) -> bool {
        self.coord.is_none()
    }

    fn coords(&self) -> impl Iterator<Item = &Coord> {
        self.coord.iter()
    }

    fn centroid(&self) -> Point {
        self.coord.map(Point::from_coord).unwrap_or_default()
    }

    fn is_simple(&self) -> bool {
        true
    }

    fn boundary(&self) -> Result<Geometry, GeolithTypesError> {
        Ok(Geometry::GeometryCollection(GeometryCollection::empty()))
    }

    fn parts(&self) -> Vec<Part<'_>> {
        self.coord.iter().map(Part::Point).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{LineString, WithMeta};

    #[test]
    fn empty_is_not_origin() {
        let empty = Point::empty();
        let origin = Point::new(0.0, 0.0);

        assert!(empty.is_empty());
        assert!(!origin.is_empty());
        assert_ne!(empty, origin);
        assert_eq!(empty.x(), None);
        assert!(empty.as_array().is_empty());
        assert!(empty.bounding_rect().is_none());
    }

    #[test]
    fn ordinates() {
        let p = Point::from_coord(Coord::new_3d(1.0, 2.0, 3.0).with_m(4.0));
        assert_eq!(p.x(), Some(1.0));
        assert_eq!(p.y(), Some(2.0));
        assert_eq!(p.z(), Some(3.0));
        assert_eq!(p.m(), Some(4.0));
        assert!(p.is_3d());
        assert!(p.is_measured());
        assert_eq!(p.as_array(), vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn point_metrics_are_defaults() {
        let p = Point::new(3.0, 4.0);
        assert_eq!(p.area(), 0.0);
        assert_eq!(p.length(), 0.0);
        assert_eq!(p.dimension(), 0);
        assert_eq!(p.centroid(), p);
        assert!(p.is_simple());
        assert!(p.boundary().unwrap().is_empty());
    }

    #[test]
    fn distance() {
        let p = Point::new(0.0, 0.0);
        assert_eq!(p.distance(&Point::new(3.0, 4.0)), Some(5.0));

        let line = LineString::new(vec![Coord::new(-1.0, 2.0), Coord::new(1.0, 2.0)]).unwrap();
        assert_eq!(p.distance(&line), Some(2.0));
        assert_eq!(line.distance(&p), Some(2.0));

        assert_eq!(p.distance(&Point::empty()), None);
    }

    #[test]
    fn meta_does_not_affect_geometry() {
        let p = Point::new(1.0, 2.0).with_srid(4326).with_data("name", "home");
        assert_eq!(p.srid(), Some(4326));
        assert_eq!(p.data_value("name"), Some("home"));
        assert!(p.equals(&Point::new(1.0, 2.0)));
    }
}
