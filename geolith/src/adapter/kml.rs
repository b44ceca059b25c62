//! Keyhole Markup Language.

use std::sync::Arc;

use geolith_types::error::GeolithTypesError;
use geolith_types::{
    Coord, Data, Geometry, GeometryCollection, GeometryType, LineString, MultiLineString,
    MultiPoint, MultiPolygon, Point, Polygon, WithMeta,
};
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::adapter::xml::{parse_document, XmlElement};
use crate::adapter::{GeoAdapter, WriteOptions};
use crate::error::GeolithError;
use crate::registry::{geometry_type_registry, GeometryTypeRegistry};

const FORMAT: &str = "kml";

/// KML reader and writer.
///
/// Reading a document with placemarks produces a geometry collection with one geometry per placemark. Other child
/// elements of a placemark (`name`, `description`, ...) are stored as the data of its geometry. A document without
/// placemarks is read as the geometry of its root element.
///
/// Element names are matched without regard to case and namespace prefixes. Values keep their case.
#[derive(Debug, Clone)]
pub struct Kml {
    registry: Arc<GeometryTypeRegistry>,
}

impl Kml {
    /// Creates an adapter that uses the standard element name registry.
    pub fn new() -> Self {
        Self {
            registry: geometry_type_registry(),
        }
    }

    /// Creates an adapter with a custom element name registry.
    pub fn with_registry(registry: Arc<GeometryTypeRegistry>) -> Self {
        Self { registry }
    }
}

impl Default for Kml {
    fn default() -> Self {
        Self::new()
    }
}

impl GeoAdapter for Kml {
    fn name(&self) -> &'static str {
        FORMAT
    }

    fn read(&self, text: &str) -> Result<Geometry, GeolithError> {
        let root = parse_document(text, FORMAT)?;
        let reader = KmlReader {
            source: text,
            registry: &self.registry,
        };

        reader.read_document(&root)
    }

    fn write(&self, geometry: &Geometry, options: &WriteOptions) -> Result<String, GeolithError> {
        let mut writer = KmlWriter::new(options);
        writer.write_root(geometry)?;
        writer.finish()
    }
}

struct KmlReader<'a> {
    source: &'a str,
    registry: &'a GeometryTypeRegistry,
}

impl KmlReader<'_> {
    fn read_document(&self, root: &XmlElement) -> Result<Geometry, GeolithError> {
        let placemarks = if root.name == "placemark" {
            vec![root]
        } else {
            root.descendants_named("placemark")
        };

        if placemarks.is_empty() {
            return match self.registry.resolve(&root.name) {
                Some(geometry_type) => self.read_geometry(root, geometry_type),
                None => {
                    log::debug!("KML root element <{}> is not a geometry", root.name);
                    Ok(GeometryCollection::empty().into())
                }
            };
        }

        let mut geometries = vec![];
        for placemark in placemarks {
            match self.read_placemark(placemark)? {
                Some(geometry) => geometries.push(geometry),
                None => log::debug!("Skipping placemark without geometry"),
            }
        }

        Ok(GeometryCollection::new(geometries).into())
    }

    fn read_placemark(&self, placemark: &XmlElement) -> Result<Option<Geometry>, GeolithError> {
        let mut geometry = None;
        let mut data = Data::new();

        for child in placemark.elements() {
            match self.registry.resolve(&child.name) {
                Some(geometry_type) => geometry = Some(self.read_geometry(child, geometry_type)?),
                None => {
                    data.insert(child.name.clone(), child.text());
                }
            }
        }

        Ok(geometry.map(|mut geometry| {
            geometry.meta_mut().data.extend(data);
            geometry
        }))
    }

    fn read_geometry(
        &self,
        element: &XmlElement,
        geometry_type: GeometryType,
    ) -> Result<Geometry, GeolithError> {
        let geometry: Geometry = match geometry_type {
            GeometryType::Point => self.read_point(element)?.into(),
            GeometryType::LineString => self.read_line(element)?.into(),
            GeometryType::Polygon => self.read_polygon(element)?.into(),
            GeometryType::MultiPoint => {
                let components = self.read_components(element)?;
                MultiPoint::from_geometries(components)
                    .map_err(|err| self.invalid(element, err))?
                    .into()
            }
            GeometryType::MultiLineString => {
                let components = self.read_components(element)?;
                MultiLineString::from_geometries(components)
                    .map_err(|err| self.invalid(element, err))?
                    .into()
            }
            GeometryType::MultiPolygon => {
                let components = self.read_components(element)?;
                MultiPolygon::from_geometries(components)
                    .map_err(|err| self.invalid(element, err))?
                    .into()
            }
            GeometryType::GeometryCollection => {
                GeometryCollection::new(self.read_components(element)?).into()
            }
        };

        Ok(geometry)
    }

    fn read_components(&self, element: &XmlElement) -> Result<Vec<Geometry>, GeolithError> {
        let mut components = vec![];
        for child in element.elements() {
            let geometry_type = match child.name.as_str() {
                "linearring" => Some(GeometryType::LineString),
                name => self.registry.resolve(name),
            };

            if let Some(geometry_type) = geometry_type {
                components.push(self.read_geometry(child, geometry_type)?);
            }
        }

        Ok(components)
    }

    fn read_point(&self, element: &XmlElement) -> Result<Point, GeolithError> {
        let tuples = self.read_coordinates(element)?;
        let Some(first) = tuples.first() else {
            return Ok(Point::empty());
        };

        let mut coord = Coord::new(first[0], first[1]);
        if let Some(z) = first.get(2) {
            coord = coord.with_z(*z);
        }
        if let Some(m) = first.get(3) {
            coord = coord.with_m(*m);
        }

        Ok(Point::from_coord(coord))
    }

    fn read_line(&self, element: &XmlElement) -> Result<LineString, GeolithError> {
        let tuples = self.read_coordinates(element)?;
        let has_z = tuples.iter().any(|t| t.get(2).is_some_and(|z| *z != 0.0));
        let has_m = tuples.iter().any(|t| t.get(3).is_some_and(|m| *m != 0.0));

        let points = tuples
            .iter()
            .map(|t| {
                let mut coord = Coord::new(t[0], t[1]);
                if has_z {
                    coord = coord.with_z(t.get(2).copied().unwrap_or(0.0));
                }
                if has_m {
                    coord = coord.with_m(t.get(3).copied().unwrap_or(0.0));
                }
                coord
            })
            .collect();

        LineString::new(points).map_err(|err| self.invalid(element, err))
    }

    fn read_polygon(&self, element: &XmlElement) -> Result<Polygon, GeolithError> {
        let Some(outer) = element.child("outerboundaryis") else {
            return Ok(Polygon::empty());
        };

        let mut rings = vec![match outer.child("linearring") {
            Some(ring) => self.read_line(ring)?,
            None => LineString::empty(),
        }];

        for inner in element.children_named("innerboundaryis") {
            for ring in inner.children_named("linearring") {
                rings.push(self.read_line(ring)?);
            }
        }

        Polygon::new(rings).map_err(|err| self.invalid(element, err))
    }

    /// Coordinate tuples of the first `coordinates` child. Tuples with less than two values are ignored.
    fn read_coordinates(&self, element: &XmlElement) -> Result<Vec<Vec<f64>>, GeolithError> {
        let Some(coordinates) = element.child("coordinates") else {
            return Ok(vec![]);
        };

        let text = coordinates.text();
        let mut tuples = vec![];
        for tuple in text.split_whitespace() {
            let values: Vec<&str> = tuple.split(',').collect();
            if values.len() < 2 {
                continue;
            }

            let parsed = values
                .iter()
                .map(|v| v.trim().parse::<f64>())
                .collect::<Result<Vec<_>, _>>()
                .map_err(|err| {
                    GeolithError::parse(
                        FORMAT,
                        coordinates.source(self.source),
                        format!("invalid coordinate tuple '{tuple}': {err}"),
                    )
                })?;
            tuples.push(parsed);
        }

        Ok(tuples)
    }

    fn invalid(&self, element: &XmlElement, err: GeolithTypesError) -> GeolithError {
        GeolithError::parse(FORMAT, element.source(self.source), err.to_string())
    }
}

struct KmlWriter<'a> {
    writer: Writer<Vec<u8>>,
    options: &'a WriteOptions,
    prefix: String,
}

impl<'a> KmlWriter<'a> {
    fn new(options: &'a WriteOptions) -> Self {
        let prefix = match &options.namespace {
            Some(namespace) if !namespace.is_empty() => format!("{namespace}:"),
            _ => String::new(),
        };

        Self {
            writer: Writer::new(Vec::new()),
            options,
            prefix,
        }
    }

    fn finish(self) -> Result<String, GeolithError> {
        String::from_utf8(self.writer.into_inner()).map_err(|err| GeolithError::Write(err.to_string()))
    }

    fn write_root(&mut self, geometry: &Geometry) -> Result<(), GeolithError> {
        if let Geometry::GeometryCollection(collection) = geometry {
            if collection.iter().any(|g| !g.data().is_empty()) {
                self.start("Document")?;
                for component in collection.iter() {
                    self.write_placemark(component)?;
                }
                return self.end("Document");
            }
        }

        if geometry.data().is_empty() {
            self.write_geometry(geometry)
        } else {
            self.write_placemark(geometry)
        }
    }

    fn write_placemark(&mut self, geometry: &Geometry) -> Result<(), GeolithError> {
        self.start("Placemark")?;
        for (key, value) in geometry.data() {
            if !is_xml_name(key) {
                log::warn!("Data key '{key}' is not a valid element name and is not written to KML");
                continue;
            }

            self.start(key)?;
            self.text(value)?;
            self.end(key)?;
        }
        self.write_geometry(geometry)?;
        self.end("Placemark")
    }

    fn write_geometry(&mut self, geometry: &Geometry) -> Result<(), GeolithError> {
        match geometry {
            Geometry::Point(point) => self.write_point(point),
            Geometry::LineString(line) => self.write_line(line, "LineString"),
            Geometry::Polygon(polygon) => self.write_polygon(polygon),
            Geometry::MultiPoint(c) => {
                self.start("MultiGeometry")?;
                for point in c.iter() {
                    self.write_point(point)?;
                }
                self.end("MultiGeometry")
            }
            Geometry::MultiLineString(c) => {
                self.start("MultiGeometry")?;
                for line in c.iter() {
                    self.write_line(line, "LineString")?;
                }
                self.end("MultiGeometry")
            }
            Geometry::MultiPolygon(c) => {
                self.start("MultiGeometry")?;
                for polygon in c.iter() {
                    self.write_polygon(polygon)?;
                }
                self.end("MultiGeometry")
            }
            Geometry::GeometryCollection(c) => {
                self.start("MultiGeometry")?;
                for component in c.iter() {
                    self.write_geometry(component)?;
                }
                self.end("MultiGeometry")
            }
        }
    }

    fn write_point(&mut self, point: &Point) -> Result<(), GeolithError> {
        let coordinates = match point.coord() {
            Some(coord) => self.format_coord(coord),
            None => "0,0".to_string(),
        };

        self.start("Point")?;
        self.start("coordinates")?;
        self.text(&coordinates)?;
        self.end("coordinates")?;
        self.end("Point")
    }

    fn write_line(&mut self, line: &LineString, element: &str) -> Result<(), GeolithError> {
        self.start(element)?;
        if !line.points().is_empty() {
            let coordinates = line
                .points()
                .iter()
                .map(|c| self.format_coord(c))
                .collect::<Vec<_>>()
                .join(" ");
            self.start("coordinates")?;
            self.text(&coordinates)?;
            self.end("coordinates")?;
        }
        self.end(element)
    }

    fn write_polygon(&mut self, polygon: &Polygon) -> Result<(), GeolithError> {
        self.start("Polygon")?;
        if let Some(exterior) = polygon.exterior_ring() {
            self.start("outerBoundaryIs")?;
            self.write_line(exterior, "LinearRing")?;
            self.end("outerBoundaryIs")?;
        }
        for hole in polygon.interior_rings() {
            self.start("innerBoundaryIs")?;
            self.write_line(hole, "LinearRing")?;
            self.end("innerBoundaryIs")?;
        }
        self.end("Polygon")
    }

    fn format_coord(&self, coord: &Coord) -> String {
        let mut formatted = format!(
            "{},{}",
            self.options.format_number(coord.x),
            self.options.format_number(coord.y)
        );
        if let Some(z) = coord.z {
            formatted.push(',');
            formatted.push_str(&self.options.format_number(z));
        }
        formatted
    }

    fn start(&mut self, name: &str) -> Result<(), GeolithError> {
        let name = format!("{}{name}", self.prefix);
        self.emit(Event::Start(BytesStart::new(name)))
    }

    fn end(&mut self, name: &str) -> Result<(), GeolithError> {
        let name = format!("{}{name}", self.prefix);
        self.emit(Event::End(BytesEnd::new(name)))
    }

    fn text(&mut self, value: &str) -> Result<(), GeolithError> {
        self.emit(Event::Text(BytesText::new(value)))
    }

    fn emit(&mut self, event: Event<'_>) -> Result<(), GeolithError> {
        self.writer
            .write_event(event)
            .map_err(|err| GeolithError::Write(err.to_string()))
    }
}

fn is_xml_name(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };

    (first.is_alphabetic() || first == '_')
        && chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use geolith_types::GeometryOps;

    fn read(text: &str) -> Geometry {
        Kml::new().read(text).unwrap()
    }

    fn write(geometry: impl Into<Geometry>) -> String {
        Kml::new()
            .write(&geometry.into(), &WriteOptions::default())
            .unwrap()
    }

    fn square() -> Polygon {
        Polygon::new(vec![LineString::new(vec![
            Coord::new(0.0, 0.0),
            Coord::new(4.0, 0.0),
            Coord::new(4.0, 4.0),
            Coord::new(0.0, 4.0),
            Coord::new(0.0, 0.0),
        ])
        .unwrap()])
        .unwrap()
    }

    #[test]
    fn read_point() {
        let Geometry::Point(point) = read("<Point><coordinates>1,2,3</coordinates></Point>") else {
            panic!("not a point");
        };
        assert_eq!(point.x(), Some(1.0));
        assert_eq!(point.y(), Some(2.0));
        assert_eq!(point.z(), Some(3.0));
        assert_eq!(point.m(), None);

        let empty = read("<Point/>");
        assert!(empty.is_empty());
    }

    #[test]
    fn read_line_drops_zero_elevation() {
        let line = read(
            "<kml:LineString>
                <kml:coordinates>
                    1,2,0 3,4,0
                    5,6 invalid
                </kml:coordinates>
            </kml:LineString>",
        );
        assert_eq!(line.geometry_type(), GeometryType::LineString);
        assert!(!line.is_3d());
        assert_eq!(line.coords().count(), 3);

        let line = read("<LineString><coordinates>1,2,10 3,4</coordinates></LineString>");
        let zs: Vec<_> = line.coords().map(|c| c.z).collect();
        assert_eq!(zs, vec![Some(10.0), Some(0.0)]);
    }

    #[test]
    fn read_polygon_with_hole() {
        let polygon = read(
            "<Polygon>
                <outerBoundaryIs><LinearRing>
                    <coordinates>0,0 10,0 10,10 0,10 0,0</coordinates>
                </LinearRing></outerBoundaryIs>
                <innerBoundaryIs><LinearRing>
                    <coordinates>1,1 2,1 2,2 1,2 1,1</coordinates>
                </LinearRing></innerBoundaryIs>
            </Polygon>",
        );
        assert_eq!(polygon.area(), 99.0);

        assert!(read("<Polygon/>").is_empty());
    }

    #[test]
    fn polygon_without_ring_fails() {
        let result = Kml::new().read("<Polygon><outerBoundaryIs/></Polygon>");
        assert_matches!(result, Err(GeolithError::Parse { format: "kml", fragment, .. }) if fragment.starts_with("<Polygon>"));
    }

    #[test]
    fn invalid_coordinates_fail() {
        let result = Kml::new().read("<Point><coordinates>1,a</coordinates></Point>");
        assert_matches!(result, Err(GeolithError::Parse { reason, .. }) if reason.contains("1,a"));
    }

    #[test]
    fn read_placemarks() {
        let collection = read(
            r#"<?xml version="1.0" encoding="UTF-8"?>
            <kml xmlns="http://www.opengis.net/kml/2.2">
              <Document>
                <Placemark>
                  <name>Big Ben</name>
                  <Description>Clock Tower</Description>
                  <Point><coordinates>-0.1246,51.5007</coordinates></Point>
                </Placemark>
                <Placemark>
                  <name>No geometry</name>
                </Placemark>
                <Placemark>
                  <MultiGeometry>
                    <Point><coordinates>0,0</coordinates></Point>
                    <LinearRing><coordinates>0,0 1,1</coordinates></LinearRing>
                  </MultiGeometry>
                </Placemark>
              </Document>
            </kml>"#,
        );

        let Geometry::GeometryCollection(collection) = collection else {
            panic!("not a collection");
        };
        assert_eq!(collection.num_geometries(), 2);

        let tower = collection.geometry_n(1).unwrap();
        assert_eq!(tower.geometry_type(), GeometryType::Point);
        assert_eq!(tower.data_value("name"), Some("Big Ben"));
        assert_eq!(tower.data_value("description"), Some("Clock Tower"));

        let multi = collection.geometry_n(2).unwrap();
        assert_eq!(multi.geometry_type(), GeometryType::GeometryCollection);
        assert_eq!(multi.num_geometries(), 2);
        assert!(multi.data().is_empty());
    }

    #[test]
    fn unknown_root_is_empty_collection() {
        let geometry = read("<kml><Document><name>Empty</name></Document></kml>");
        assert_eq!(geometry.geometry_type(), GeometryType::GeometryCollection);
        assert!(geometry.is_empty());
    }

    #[test]
    fn typed_collections() {
        let geometry = read(
            "<MultiPoint><Point><coordinates>1,1</coordinates></Point><Point><coordinates>2,2</coordinates></Point></MultiPoint>",
        );
        assert_eq!(geometry.geometry_type(), GeometryType::MultiPoint);
        assert_eq!(geometry.num_geometries(), 2);

        let result = Kml::new().read(
            "<MultiPoint><LineString><coordinates>1,1 2,2</coordinates></LineString></MultiPoint>",
        );
        assert_matches!(result, Err(GeolithError::Parse { .. }));
    }

    #[test]
    fn custom_registry() {
        let registry = GeometryTypeRegistry::standard().with_alias("Track", GeometryType::LineString);
        let kml = Kml::with_registry(Arc::new(registry));
        let geometry = kml
            .read("<Track><coordinates>0,0 3,4</coordinates></Track>")
            .unwrap();
        assert_eq!(geometry.length(), 5.0);
    }

    #[test]
    fn write_geometries() {
        assert_eq!(
            write(Point::new(1.0, 2.5)),
            "<Point><coordinates>1,2.5</coordinates></Point>"
        );
        assert_eq!(
            write(Point::empty()),
            "<Point><coordinates>0,0</coordinates></Point>"
        );
        assert_eq!(
            write(LineString::new(vec![Coord::new_3d(0.0, 0.0, 1.0), Coord::new_3d(1.0, 1.0, 2.0)]).unwrap()),
            "<LineString><coordinates>0,0,1 1,1,2</coordinates></LineString>"
        );
        assert_eq!(write(LineString::empty()), "<LineString></LineString>");
        assert_eq!(
            write(square()),
            "<Polygon><outerBoundaryIs><LinearRing><coordinates>0,0 4,0 4,4 0,4 0,0</coordinates></LinearRing></outerBoundaryIs></Polygon>"
        );
        assert_eq!(
            write(MultiPoint::new(vec![Point::new(1.0, 1.0), Point::new(2.0, 2.0)])),
            "<MultiGeometry><Point><coordinates>1,1</coordinates></Point><Point><coordinates>2,2</coordinates></Point></MultiGeometry>"
        );
    }

    #[test]
    fn write_with_namespace_and_precision() {
        let options = WriteOptions::default()
            .with_namespace("kml")
            .with_precision(2);
        let geometry: Geometry =
            GeometryCollection::new(vec![Point::new(1.0 / 3.0, 2.0).into()]).into();
        assert_eq!(
            Kml::new().write(&geometry, &options).unwrap(),
            "<kml:MultiGeometry><kml:Point><kml:coordinates>0.33,2</kml:coordinates></kml:Point></kml:MultiGeometry>"
        );
    }

    #[test]
    fn write_placemark_data() {
        let point = Point::new(1.0, 2.0)
            .with_data("name", "A & B")
            .with_data("not a name", "skipped");
        assert_eq!(
            write(point),
            "<Placemark><name>A &amp; B</name><Point><coordinates>1,2</coordinates></Point></Placemark>"
        );
    }

    #[test]
    fn placemark_document_round_trip() {
        let geometry: Geometry = GeometryCollection::new(vec![
            Point::new(1.0, 2.0).with_data("name", "First").into(),
            square().into(),
        ])
        .into();

        let text = write(geometry.clone());
        assert!(text.starts_with("<Document><Placemark><name>First</name>"));

        let back = read(&text);
        assert!(back.equals(&geometry));
        let Geometry::GeometryCollection(back) = back else {
            panic!("not a collection");
        };
        assert_eq!(back.geometry_n(1).unwrap().data_value("name"), Some("First"));
    }
}
