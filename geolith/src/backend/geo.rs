use ::geo::{Area, Centroid, EuclideanLength};
use geolith_types::{Coord, Geometry, GeometryType, Point};

use crate::backend::{Backend, Operation};

/// Backend running the algorithms of the [`geo`](::geo) crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct GeoBackend;

impl GeoBackend {
    /// Creates the backend.
    pub fn new() -> Self {
        Self
    }
}

fn convert(geometry: &Geometry) -> Option<geo_types::Geometry<f64>> {
    match geo_types::Geometry::try_from(geometry) {
        Ok(converted) => Some(converted),
        Err(err) => {
            log::debug!("Geometry cannot be passed to geo backend: {err}");
            None
        }
    }
}

impl Backend for GeoBackend {
    fn name(&self) -> &'static str {
        "geo"
    }

    fn supports(&self, operation: Operation, geometry_type: GeometryType) -> bool {
        match operation {
            Operation::Area => true,
            Operation::Length => matches!(
                geometry_type,
                GeometryType::LineString | GeometryType::MultiLineString
            ),
            Operation::Centroid => matches!(
                geometry_type,
                GeometryType::Polygon | GeometryType::MultiPolygon
            ),
            Operation::IsSimple | Operation::Contains | Operation::Distance => false,
        }
    }

    fn area(&self, geometry: &Geometry) -> Option<f64> {
        Some(convert(geometry)?.unsigned_area())
    }

    fn length(&self, geometry: &Geometry) -> Option<f64> {
        match convert(geometry)? {
            geo_types::Geometry::LineString(line) => Some(line.euclidean_length()),
            geo_types::Geometry::MultiLineString(lines) => Some(lines.euclidean_length()),
            _ => None,
        }
    }

    fn centroid(&self, geometry: &Geometry) -> Option<Point> {
        let converted = convert(geometry)?;
        // Degenerate polygons have an empty centroid.
        if converted.unsigned_area() == 0.0 {
            return Some(Point::empty());
        }

        let centroid = converted.centroid()?;
        Some(Point::from_coord(Coord::from(centroid.0)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use geolith_types::{GeometryOps, LineString, Polygon};

    fn ring(points: &[(f64, f64)]) -> LineString {
        LineString::new(points.iter().map(|(x, y)| Coord::new(*x, *y)).collect()).unwrap()
    }

    fn polygon_with_hole() -> Geometry {
        Polygon::new(vec![
            ring(&[(0.0, 0.0), (6.0, 0.0), (6.0, 4.0), (0.0, 4.0), (0.0, 0.0)]),
            ring(&[(1.0, 1.0), (1.0, 2.0), (2.0, 2.0), (2.0, 1.0), (1.0, 1.0)]),
        ])
        .unwrap()
        .into()
    }

    #[test]
    fn agrees_with_portable_algorithms() {
        let backend = GeoBackend::new();
        let polygon = polygon_with_hole();

        assert_relative_eq!(backend.area(&polygon).unwrap(), polygon.area());

        let centroid = backend.centroid(&polygon).unwrap();
        let expected = polygon.centroid();
        assert_relative_eq!(centroid.x().unwrap(), expected.x().unwrap(), epsilon = 1e-9);
        assert_relative_eq!(centroid.y().unwrap(), expected.y().unwrap(), epsilon = 1e-9);

        let line: Geometry = ring(&[(0.0, 0.0), (3.0, 4.0), (3.0, 10.0)]).into();
        assert_relative_eq!(backend.length(&line).unwrap(), line.length());
    }

    #[test]
    fn declines_unsupported() {
        let backend = GeoBackend::new();
        assert!(!backend.supports(Operation::Contains, GeometryType::Polygon));
        assert!(!backend.supports(Operation::Length, GeometryType::Polygon));
        assert_eq!(backend.area(&Point::empty().into()), None);
    }
}
