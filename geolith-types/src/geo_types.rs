//! Conversions between geolith geometries and [`geo_types`] geometries.
//!
//! Only the planar coordinates are carried over, `z` and `m` and metadata are dropped.

use ::geo_types as gt;

use crate::cartesian::CartesianPoint2d;
use crate::error::GeolithTypesError;
use crate::{
    Coord, Geometry, GeometryCollection, LineString, MultiLineString, MultiPoint, MultiPolygon,
    Point, Polygon,
};

impl CartesianPoint2d for gt::Point<f64> {
    type Num = f64;

    fn x(&self) -> f64 {
        self.0.x
    }

    fn y(&self) -> f64 {
        self.0.y
    }
}

impl From<&Coord> for gt::Coord<f64> {
    fn from(c: &Coord) -> Self {
        gt::Coord { x: c.x, y: c.y }
    }
}

impl From<gt::Coord<f64>> for Coord {
    fn from(c: gt::Coord<f64>) -> Self {
        Coord::new(c.x, c.y)
    }
}

impl TryFrom<&Point> for gt::Point<f64> {
    type Error = GeolithTypesError;

    fn try_from(point: &Point) -> Result<Self, Self::Error> {
        point
            .coord()
            .map(|c| gt::Point(c.into()))
            .ok_or_else(|| {
                GeolithTypesError::InvalidGeometry("empty point cannot be converted".into())
            })
    }
}

impl From<&LineString> for gt::LineString<f64> {
    fn from(line: &LineString) -> Self {
        gt::LineString(line.points().iter().map(Into::into).collect())
    }
}

impl From<&Polygon> for gt::Polygon<f64> {
    fn from(polygon: &Polygon) -> Self {
        let exterior = polygon
            .exterior_ring()
            .map(Into::into)
            .unwrap_or_else(|| gt::LineString(vec![]));
        let interiors = polygon.interior_rings().iter().map(Into::into).collect();
        gt::Polygon::new(exterior, interiors)
    }
}

impl TryFrom<&Geometry> for gt::Geometry<f64> {
    type Error = GeolithTypesError;

    fn try_from(geometry: &Geometry) -> Result<Self, Self::Error> {
        Ok(match geometry {
            Geometry::Point(p) => gt::Geometry::Point(p.try_into()?),
            Geometry::LineString(l) => gt::Geometry::LineString(l.into()),
            Geometry::Polygon(p) => gt::Geometry::Polygon(p.into()),
            Geometry::MultiPoint(c) => gt::Geometry::MultiPoint(gt::MultiPoint(
                c.iter().map(TryInto::try_into).collect::<Result<_, _>>()?,
            )),
            Geometry::MultiLineString(c) => {
                gt::Geometry::MultiLineString(gt::MultiLineString(c.iter().map(Into::into).collect()))
            }
            Geometry::MultiPolygon(c) => {
                gt::Geometry::MultiPolygon(gt::MultiPolygon(c.iter().map(Into::into).collect()))
            }
            Geometry::GeometryCollection(c) => gt::Geometry::GeometryCollection(
                gt::GeometryCollection(c.iter().map(TryInto::try_into).collect::<Result<_, _>>()?),
            ),
        })
    }
}

fn line_from_gt(line: gt::LineString<f64>) -> Result<LineString, GeolithTypesError> {
    LineString::new(line.0.into_iter().map(Coord::from).collect())
}

fn polygon_from_gt(polygon: gt::Polygon<f64>) -> Result<Polygon, GeolithTypesError> {
    let (exterior, interiors) = polygon.into_inner();
    if exterior.0.is_empty() {
        return Ok(Polygon::empty());
    }

    let rings = std::iter::once(exterior)
        .chain(interiors)
        .map(line_from_gt)
        .collect::<Result<Vec<_>, _>>()?;
    Polygon::new(rings)
}

impl TryFrom<gt::Geometry<f64>> for Geometry {
    type Error = GeolithTypesError;

    fn try_from(geometry: gt::Geometry<f64>) -> Result<Self, Self::Error> {
        Ok(match geometry {
            gt::Geometry::Point(p) => Point::from(Coord::from(p.0)).into(),
            gt::Geometry::Line(l) => {
                LineString::new(vec![l.start.into(), l.end.into()])?.into()
            }
            gt::Geometry::LineString(l) => line_from_gt(l)?.into(),
            gt::Geometry::Polygon(p) => polygon_from_gt(p)?.into(),
            gt::Geometry::MultiPoint(mp) => MultiPoint::new(
                mp.0.into_iter()
                    .map(|p| Point::from(Coord::from(p.0)))
                    .collect(),
            )
            .into(),
            gt::Geometry::MultiLineString(ml) => MultiLineString::new(
                ml.0.into_iter()
                    .map(line_from_gt)
                    .collect::<Result<_, _>>()?,
            )
            .into(),
            gt::Geometry::MultiPolygon(mp) => MultiPolygon::new(
                mp.0.into_iter()
                    .map(polygon_from_gt)
                    .collect::<Result<_, _>>()?,
            )
            .into(),
            gt::Geometry::GeometryCollection(gc) => GeometryCollection::new(
                gc.0.into_iter()
                    .map(Geometry::try_from)
                    .collect::<Result<_, _>>()?,
            )
            .into(),
            gt::Geometry::Rect(r) => polygon_from_gt(r.to_polygon())?.into(),
            gt::Geometry::Triangle(t) => polygon_from_gt(t.to_polygon())?.into(),
        })
    }
}
