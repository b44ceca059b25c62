//! Well-known text, with the extended (EWKT) `SRID=n;` prefix.

use std::str::FromStr;

use geolith_types::error::GeolithTypesError;
use geolith_types::{
    Coord, Geometry, GeometryCollection, GeometryOps, LineString, MultiLineString,
    MultiPoint, MultiPolygon, Point, Polygon, WithMeta,
};

use crate::adapter::{GeoAdapter, WriteOptions};
use crate::error::GeolithError;

/// WKT reader and writer.
///
/// Both variants accept an `SRID=n;` prefix when reading. Only the extended one writes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Wkt {
    extended: bool,
}

impl Wkt {
    /// Plain WKT.
    pub fn standard() -> Self {
        Self { extended: false }
    }

    /// EWKT, writing the spatial reference id of the geometry as a prefix.
    pub fn extended() -> Self {
        Self { extended: true }
    }
}

impl Default for Wkt {
    fn default() -> Self {
        Self::standard()
    }
}

impl GeoAdapter for Wkt {
    fn name(&self) -> &'static str {
        if self.extended {
            "ewkt"
        } else {
            "wkt"
        }
    }

    fn read(&self, text: &str) -> Result<Geometry, GeolithError> {
        let (srid, body) = split_srid(text.trim(), self.name())?;
        let parsed = ::wkt::Wkt::<f64>::from_str(body)
            .map_err(|err| GeolithError::parse(self.name(), body, err.to_string()))?;
        let geometry = from_wkt(parsed)
            .map_err(|err| GeolithError::parse(self.name(), body, err.to_string()))?;

        Ok(match srid {
            Some(srid) => geometry.with_srid(srid),
            None => geometry,
        })
    }

    fn write(&self, geometry: &Geometry, options: &WriteOptions) -> Result<String, GeolithError> {
        let mut output = String::new();
        if self.extended {
            if let Some(srid) = geometry.srid() {
                output.push_str(&format!("SRID={srid};"));
            }
        }

        WktWriter::new(options, geometry).write_geometry(geometry, &mut output);

        Ok(output)
    }
}

fn split_srid<'a>(text: &'a str, format: &'static str) -> Result<(Option<i32>, &'a str), GeolithError> {
    let Some(prefix) = text.get(..5).filter(|p| p.eq_ignore_ascii_case("srid=")) else {
        return Ok((None, text));
    };

    let rest = &text[prefix.len()..];
    let Some((srid, body)) = rest.split_once(';') else {
        return Err(GeolithError::parse(format, text, "SRID prefix is not terminated by ';'"));
    };

    let srid = srid
        .trim()
        .parse::<i32>()
        .map_err(|err| GeolithError::parse(format, text, format!("invalid SRID: {err}")))?;

    Ok((Some(srid), body.trim()))
}

fn coord_from_wkt(coord: ::wkt::types::Coord<f64>) -> Coord {
    Coord {
        x: coord.x,
        y: coord.y,
        z: coord.z,
        m: coord.m,
    }
}

fn point_from_wkt(point: ::wkt::types::Point<f64>) -> Point {
    point
        .0
        .map(|c| Point::from_coord(coord_from_wkt(c)))
        .unwrap_or_default()
}

fn line_from_wkt(line: ::wkt::types::LineString<f64>) -> Result<LineString, GeolithTypesError> {
    LineString::new(line.0.into_iter().map(coord_from_wkt).collect())
}

fn polygon_from_wkt(polygon: ::wkt::types::Polygon<f64>) -> Result<Polygon, GeolithTypesError> {
    if polygon.0.is_empty() {
        return Ok(Polygon::empty());
    }

    Polygon::new(
        polygon
            .0
            .into_iter()
            .map(line_from_wkt)
            .collect::<Result<_, _>>()?,
    )
}

fn from_wkt(wkt: ::wkt::Wkt<f64>) -> Result<Geometry, GeolithTypesError> {
    Ok(match wkt {
        ::wkt::Wkt::Point(p) => point_from_wkt(p).into(),
        ::wkt::Wkt::LineString(l) => line_from_wkt(l)?.into(),
        ::wkt::Wkt::Polygon(p) => polygon_from_wkt(p)?.into(),
        ::wkt::Wkt::MultiPoint(mp) => {
            MultiPoint::new(mp.0.into_iter().map(point_from_wkt).collect()).into()
        }
        ::wkt::Wkt::MultiLineString(ml) => MultiLineString::new(
            ml.0.into_iter()
                .map(line_from_wkt)
                .collect::<Result<_, _>>()?,
        )
        .into(),
        ::wkt::Wkt::MultiPolygon(mp) => MultiPolygon::new(
            mp.0.into_iter()
                .map(polygon_from_wkt)
                .collect::<Result<_, _>>()?,
        )
        .into(),
        ::wkt::Wkt::GeometryCollection(gc) => GeometryCollection::new(
            gc.0.into_iter().map(from_wkt).collect::<Result<_, _>>()?,
        )
        .into(),
    })
}

struct WktWriter<'a> {
    options: &'a WriteOptions,
    has_z: bool,
    has_m: bool,
}

impl<'a> WktWriter<'a> {
    /// Writer tagging ordinates by what the geometry actually carries.
    fn new(options: &'a WriteOptions, geometry: &Geometry) -> Self {
        Self {
            options,
            has_z: geometry.is_3d(),
            has_m: geometry.is_measured(),
        }
    }

    fn write_geometry(&self, geometry: &Geometry, out: &mut String) {
        self.keyword(geometry.geometry_type().name(), out);
        if geometry.is_empty() {
            out.push_str("EMPTY");
            return;
        }

        match geometry {
            Geometry::Point(point) => self.point_body(point, out),
            Geometry::LineString(line) => self.line_body(line, out),
            Geometry::Polygon(polygon) => self.polygon_body(polygon, out),
            Geometry::MultiPoint(c) => self.point_list(c, out),
            Geometry::MultiLineString(c) => {
                self.list(c.iter(), out, |l, out| self.line_body(l, out))
            }
            Geometry::MultiPolygon(c) => {
                self.list(c.iter(), out, |p, out| self.polygon_body(p, out))
            }
            Geometry::GeometryCollection(c) => self.list(c.iter(), out, |g, out| {
                WktWriter::new(self.options, g).write_geometry(g, out)
            }),
        }
    }

    fn keyword(&self, name: &str, out: &mut String) {
        out.push_str(&name.to_uppercase());
        match (self.has_z, self.has_m) {
            (true, true) => out.push_str(" ZM "),
            (true, false) => out.push_str(" Z "),
            (false, true) => out.push_str(" M "),
            (false, false) => out.push(' '),
        }
    }

    fn list<'g, G: 'g>(
        &self,
        components: impl Iterator<Item = &'g G>,
        out: &mut String,
        body: impl Fn(&G, &mut String),
    ) {
        out.push('(');
        for (index, component) in components.enumerate() {
            if index > 0 {
                out.push_str(", ");
            }
            body(component, out);
        }
        out.push(')');
    }

    /// Empty members have no notation inside a multipoint and are left out.
    fn point_list(&self, points: &MultiPoint, out: &mut String) {
        let skipped = points.iter().filter(|p| p.is_empty()).count();
        if skipped > 0 {
            log::debug!("Leaving {skipped} empty points out of a WKT multipoint");
        }

        self.list(points.iter().filter(|p| !p.is_empty()), out, |p, out| {
            self.point_body(p, out)
        });
    }

    fn point_body(&self, point: &Point, out: &mut String) {
        match point.coord() {
            Some(coord) => {
                out.push('(');
                self.coord(coord, out);
                out.push(')');
            }
            None => out.push_str("EMPTY"),
        }
    }

    fn line_body(&self, line: &LineString, out: &mut String) {
        if line.points().is_empty() {
            out.push_str("EMPTY");
            return;
        }

        out.push('(');
        for (index, coord) in line.points().iter().enumerate() {
            if index > 0 {
                out.push_str(", ");
            }
            self.coord(coord, out);
        }
        out.push(')');
    }

    fn polygon_body(&self, polygon: &Polygon, out: &mut String) {
        if polygon.rings().is_empty() {
            out.push_str("EMPTY");
            return;
        }

        out.push('(');
        for (index, ring) in polygon.rings().iter().enumerate() {
            if index > 0 {
                out.push_str(", ");
            }
            self.line_body(ring, out);
        }
        out.push(')');
    }

    fn coord(&self, coord: &Coord, out: &mut String) {
        out.push_str(&self.options.format_number(coord.x));
        out.push(' ');
        out.push_str(&self.options.format_number(coord.y));
        if self.has_z {
            out.push(' ');
            out.push_str(&self.options.format_number(coord.z.unwrap_or(0.0)));
        }
        if self.has_m {
            out.push(' ');
            out.push_str(&self.options.format_number(coord.m.unwrap_or(0.0)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use geolith_types::GeometryType;

    fn write(geometry: impl Into<Geometry>) -> String {
        Wkt::standard()
            .write(&geometry.into(), &WriteOptions::default())
            .unwrap()
    }

    #[test]
    fn read_simple_geometries() {
        let point = Wkt::standard().read("POINT (1 2)").unwrap();
        assert_eq!(point.geometry_type(), GeometryType::Point);
        assert_eq!(point.coords().next(), Some(&Coord::new(1.0, 2.0)));

        let point = Wkt::standard().read("POINT Z (1 2 3)").unwrap();
        assert!(point.is_3d());
        assert_eq!(point.maximum_z(), Some(3.0));

        let polygon = Wkt::standard()
            .read("POLYGON((1 1,5 1,5 5,1 5,1 1),(2 2,2 3,3 3,3 2,2 2))")
            .unwrap();
        assert_eq!(polygon.area(), 15.0);

        let empty = Wkt::standard().read("POINT EMPTY").unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn read_collections() {
        let collection = Wkt::standard()
            .read("GEOMETRYCOLLECTION (POINT (4 6), LINESTRING (4 6, 7 10))")
            .unwrap();
        assert_eq!(collection.num_geometries(), 2);
        assert_eq!(collection.length(), 5.0);

        let multi = Wkt::standard()
            .read("MULTIPOLYGON (((0 0, 1 0, 1 1, 0 1, 0 0)), ((2 2, 4 2, 4 4, 2 4, 2 2)))")
            .unwrap();
        assert_eq!(multi.geometry_type(), GeometryType::MultiPolygon);
        assert_eq!(multi.area(), 5.0);
    }

    #[test]
    fn srid_prefix() {
        let geometry = Wkt::extended().read("SRID=4326;POINT (1 2)").unwrap();
        assert_eq!(geometry.srid(), Some(4326));
        assert_eq!(
            Wkt::extended().write(&geometry, &WriteOptions::default()).unwrap(),
            "SRID=4326;POINT (1 2)"
        );
        assert_eq!(
            Wkt::standard().write(&geometry, &WriteOptions::default()).unwrap(),
            "POINT (1 2)"
        );

        assert_matches!(
            Wkt::extended().read("SRID=abc;POINT (1 2)"),
            Err(GeolithError::Parse { format: "ewkt", .. })
        );
        assert_matches!(
            Wkt::extended().read("SRID=4326 POINT (1 2)"),
            Err(GeolithError::Parse { .. })
        );
    }

    #[test]
    fn invalid_input() {
        assert_matches!(
            Wkt::standard().read("POINT (1"),
            Err(GeolithError::Parse { format: "wkt", .. })
        );
        assert_matches!(
            Wkt::standard().read("POLYGON ((0 0, 1 0, 1 1, 0 1))"),
            Err(GeolithError::Parse { reason, .. }) if reason.contains("not closed")
        );
        assert_matches!(
            Wkt::standard().read("LINESTRING (0 0)"),
            Err(GeolithError::Parse { .. })
        );
    }

    #[test]
    fn write_geometries() {
        assert_eq!(write(Point::new(1.0, 2.5)), "POINT (1 2.5)");
        assert_eq!(write(Point::empty()), "POINT EMPTY");
        assert_eq!(
            write(Point::from_coord(Coord::new_3d(1.0, 2.0, 3.0).with_m(4.0))),
            "POINT ZM (1 2 3 4)"
        );
        assert_eq!(
            write(Point::from_coord(Coord::new(1.0, 2.0).with_m(4.0))),
            "POINT M (1 2 4)"
        );
        assert_eq!(
            write(
                LineString::new(vec![Coord::new(0.0, 0.0), Coord::new_3d(1.0, 1.0, 5.0)]).unwrap()
            ),
            "LINESTRING Z (0 0 0, 1 1 5)"
        );
        assert_eq!(
            write(MultiPoint::new(vec![Point::new(1.0, 2.0), Point::new(3.0, 4.0)])),
            "MULTIPOINT ((1 2), (3 4))"
        );
        assert_eq!(write(GeometryCollection::empty()), "GEOMETRYCOLLECTION EMPTY");
    }

    #[test]
    fn multipoint_with_empty_member() {
        let multi: Geometry =
            MultiPoint::new(vec![Point::new(1.0, 2.0), Point::empty(), Point::new(3.0, 4.0)])
                .into();
        let text = write(multi.clone());
        assert_eq!(text, "MULTIPOINT ((1 2), (3 4))");

        let back = Wkt::standard().read(&text).unwrap();
        assert_eq!(back.num_geometries(), 2);
        assert!(back.equals(&multi));

        let only_empty = MultiPoint::new(vec![Point::empty()]);
        assert_eq!(write(only_empty), "MULTIPOINT EMPTY");
    }

    #[test]
    fn collection_members_keep_their_dimensions() {
        let collection: Geometry = GeometryCollection::new(vec![
            Point::from_coord(Coord::new_3d(1.0, 2.0, 3.0)).into(),
            LineString::new(vec![Coord::new(0.0, 0.0), Coord::new(1.0, 1.0)])
                .unwrap()
                .into(),
        ])
        .into();

        let text = write(collection.clone());
        assert_eq!(
            text,
            "GEOMETRYCOLLECTION Z (POINT Z (1 2 3), LINESTRING (0 0, 1 1))"
        );

        let Geometry::GeometryCollection(back) = Wkt::standard().read(&text).unwrap() else {
            panic!("expected a collection");
        };
        assert!(back.geometry_n(1).unwrap().is_3d());
        assert!(!back.geometry_n(2).unwrap().is_3d());
        assert_eq!(back.geometry_n(2).unwrap().coords().next(), Some(&Coord::new(0.0, 0.0)));
    }

    #[test]
    fn write_nested_collection() {
        let collection = GeometryCollection::new(vec![
            Point::new(1.0, 2.0).into(),
            LineString::new(vec![Coord::new(0.0, 0.0), Coord::new(1.0, 1.0)])
                .unwrap()
                .into(),
            Point::empty().into(),
        ]);
        assert_eq!(
            write(collection),
            "GEOMETRYCOLLECTION (POINT (1 2), LINESTRING (0 0, 1 1), POINT EMPTY)"
        );
    }

    #[test]
    fn round_trip_with_precision() {
        let text = "POLYGON ((0 0, 3 0, 3 3, 0 3, 0 0), (1 1, 2 1, 2 2, 1 2, 1 1))";
        let polygon = Wkt::standard().read(text).unwrap();
        assert_eq!(
            Wkt::standard()
                .write(&polygon, &WriteOptions::default().with_precision(4))
                .unwrap(),
            text
        );
    }
}
