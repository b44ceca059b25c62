//! GeoJSON through the `geojson` crate.

use ::geojson::{Feature, FeatureCollection, GeoJson as Document, JsonObject, Value};
use geolith_types::error::GeolithTypesError;
use geolith_types::{
    Coord, Data, Geometry, GeometryCollection, LineString, MultiLineString, MultiPoint,
    MultiPolygon, Point, Polygon, WithMeta,
};
use serde_json::Value as JsonValue;

use crate::adapter::{GeoAdapter, WriteOptions};
use crate::error::GeolithError;

const FORMAT: &str = "geojson";

/// GeoJSON reader and writer.
///
/// Feature properties become the data of the feature geometry, non-string values are stored as their JSON text.
/// A feature collection is read as a geometry collection. When writing, geometries with data are written as features.
#[derive(Debug, Clone, Copy, Default)]
pub struct GeoJson;

impl GeoJson {
    /// Creates the adapter.
    pub fn new() -> Self {
        Self
    }
}

impl GeoAdapter for GeoJson {
    fn name(&self) -> &'static str {
        FORMAT
    }

    fn read(&self, text: &str) -> Result<Geometry, GeolithError> {
        let document = text
            .parse::<Document>()
            .map_err(|err| GeolithError::parse(FORMAT, text, err.to_string()))?;
        let invalid = |err: GeolithTypesError| GeolithError::parse(FORMAT, text, err.to_string());

        match document {
            Document::Geometry(geometry) => from_geojson(geometry).map_err(invalid),
            Document::Feature(feature) => {
                Ok(from_feature(feature).map_err(invalid)?.unwrap_or_else(|| {
                    log::debug!("GeoJSON feature has no geometry");
                    GeometryCollection::empty().into()
                }))
            }
            Document::FeatureCollection(collection) => {
                let mut geometries = vec![];
                for feature in collection.features {
                    match from_feature(feature).map_err(invalid)? {
                        Some(geometry) => geometries.push(geometry),
                        None => log::debug!("Skipping GeoJSON feature without geometry"),
                    }
                }
                Ok(GeometryCollection::new(geometries).into())
            }
        }
    }

    fn write(&self, geometry: &Geometry, options: &WriteOptions) -> Result<String, GeolithError> {
        if geometry.srid().is_some() {
            log::debug!("GeoJSON has no place for the SRID, it is not written");
        }

        let document = match geometry {
            Geometry::GeometryCollection(collection)
                if collection.iter().any(|g| !g.data().is_empty()) =>
            {
                Document::FeatureCollection(FeatureCollection {
                    bbox: None,
                    features: collection
                        .iter()
                        .map(|g| to_feature(g, options))
                        .collect::<Result<_, _>>()?,
                    foreign_members: None,
                })
            }
            g if !g.data().is_empty() => Document::Feature(to_feature(g, options)?),
            g => Document::Geometry(to_geojson(g, options)?),
        };

        serde_json::to_string(&document).map_err(|err| GeolithError::Write(err.to_string()))
    }
}

fn from_feature(feature: Feature) -> Result<Option<Geometry>, GeolithTypesError> {
    let Some(geometry) = feature.geometry else {
        return Ok(None);
    };

    let mut geometry = from_geojson(geometry)?;
    if let Some(properties) = feature.properties {
        geometry.meta_mut().data.extend(properties_to_data(properties));
    }

    Ok(Some(geometry))
}

fn properties_to_data(properties: JsonObject) -> Data {
    properties
        .into_iter()
        .map(|(key, value)| {
            let value = match value {
                JsonValue::String(s) => s,
                other => other.to_string(),
            };
            (key, value)
        })
        .collect()
}

fn coord_from_position(position: &[f64]) -> Result<Coord, GeolithTypesError> {
    match position {
        [x, y] => Ok(Coord::new(*x, *y)),
        [x, y, z, ..] => Ok(Coord::new_3d(*x, *y, *z)),
        _ => Err(GeolithTypesError::InvalidGeometry(format!(
            "position must have at least 2 values, found {}",
            position.len()
        ))),
    }
}

fn line_from_positions(positions: &[Vec<f64>]) -> Result<LineString, GeolithTypesError> {
    LineString::new(
        positions
            .iter()
            .map(|p| coord_from_position(p))
            .collect::<Result<_, _>>()?,
    )
}

fn polygon_from_rings(rings: &[Vec<Vec<f64>>]) -> Result<Polygon, GeolithTypesError> {
    if rings.is_empty() {
        return Ok(Polygon::empty());
    }

    Polygon::new(
        rings
            .iter()
            .map(|r| line_from_positions(r))
            .collect::<Result<_, _>>()?,
    )
}

fn point_from_position(position: &[f64]) -> Result<Point, GeolithTypesError> {
    if position.is_empty() {
        return Ok(Point::empty());
    }

    Ok(Point::from_coord(coord_from_position(position)?))
}

fn from_geojson(geometry: ::geojson::Geometry) -> Result<Geometry, GeolithTypesError> {
    Ok(match geometry.value {
        Value::Point(position) => point_from_position(&position)?.into(),
        Value::MultiPoint(positions) => MultiPoint::new(
            positions
                .iter()
                .map(|p| point_from_position(p))
                .collect::<Result<_, _>>()?,
        )
        .into(),
        Value::LineString(positions) => line_from_positions(&positions)?.into(),
        Value::MultiLineString(lines) => MultiLineString::new(
            lines
                .iter()
                .map(|l| line_from_positions(l))
                .collect::<Result<_, _>>()?,
        )
        .into(),
        Value::Polygon(rings) => polygon_from_rings(&rings)?.into(),
        Value::MultiPolygon(polygons) => MultiPolygon::new(
            polygons
                .iter()
                .map(|p| polygon_from_rings(p))
                .collect::<Result<_, _>>()?,
        )
        .into(),
        Value::GeometryCollection(geometries) => GeometryCollection::new(
            geometries
                .into_iter()
                .map(from_geojson)
                .collect::<Result<_, _>>()?,
        )
        .into(),
    })
}

fn position(coord: &Coord, options: &WriteOptions) -> Vec<f64> {
    let round = |value: f64| {
        options
            .format_number(value)
            .parse::<f64>()
            .unwrap_or(value)
    };

    let mut position = vec![round(coord.x), round(coord.y)];
    if let Some(z) = coord.z {
        position.push(round(z));
    }
    position
}

fn line_positions(line: &LineString, options: &WriteOptions) -> Vec<Vec<f64>> {
    line.points().iter().map(|c| position(c, options)).collect()
}

fn polygon_rings(polygon: &Polygon, options: &WriteOptions) -> Vec<Vec<Vec<f64>>> {
    polygon
        .rings()
        .iter()
        .map(|r| line_positions(r, options))
        .collect()
}

fn point_position(point: &Point, options: &WriteOptions) -> Result<Vec<f64>, GeolithError> {
    point
        .coord()
        .map(|c| position(c, options))
        .ok_or_else(|| GeolithError::Write("GeoJSON cannot represent an empty point".into()))
}

fn to_geojson(
    geometry: &Geometry,
    options: &WriteOptions,
) -> Result<::geojson::Geometry, GeolithError> {
    let value = match geometry {
        Geometry::Point(point) => Value::Point(point_position(point, options)?),
        Geometry::LineString(line) => Value::LineString(line_positions(line, options)),
        Geometry::Polygon(polygon) => Value::Polygon(polygon_rings(polygon, options)),
        Geometry::MultiPoint(c) => Value::MultiPoint(
            c.iter()
                .map(|p| point_position(p, options))
                .collect::<Result<_, _>>()?,
        ),
        Geometry::MultiLineString(c) => {
            Value::MultiLineString(c.iter().map(|l| line_positions(l, options)).collect())
        }
        Geometry::MultiPolygon(c) => {
            Value::MultiPolygon(c.iter().map(|p| polygon_rings(p, options)).collect())
        }
        Geometry::GeometryCollection(c) => Value::GeometryCollection(
            c.iter()
                .map(|g| to_geojson(g, options))
                .collect::<Result<_, _>>()?,
        ),
    };

    Ok(::geojson::Geometry::new(value))
}

fn to_feature(geometry: &Geometry, options: &WriteOptions) -> Result<Feature, GeolithError> {
    let properties: JsonObject = geometry
        .data()
        .iter()
        .map(|(key, value)| (key.clone(), JsonValue::String(value.clone())))
        .collect();

    Ok(Feature {
        bbox: None,
        geometry: Some(to_geojson(geometry, options)?),
        id: None,
        properties: (!properties.is_empty()).then_some(properties),
        foreign_members: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use geolith_types::{GeometryOps, GeometryType};

    fn read(text: &str) -> Geometry {
        GeoJson::new().read(text).unwrap()
    }

    fn write_json(geometry: impl Into<Geometry>) -> JsonValue {
        let text = GeoJson::new()
            .write(&geometry.into(), &WriteOptions::default())
            .unwrap();
        serde_json::from_str(&text).unwrap()
    }

    #[test]
    fn read_geometries() {
        let point = read(r#"{"type": "Point", "coordinates": [1.5, 2.0, 10.0]}"#);
        assert_eq!(point.coords().next(), Some(&Coord::new_3d(1.5, 2.0, 10.0)));

        let polygon = read(
            r#"{"type": "Polygon", "coordinates": [
                [[0, 0], [4, 0], [4, 4], [0, 4], [0, 0]],
                [[1, 1], [2, 1], [2, 2], [1, 2], [1, 1]]
            ]}"#,
        );
        assert_eq!(polygon.area(), 15.0);

        let collection = read(
            r#"{"type": "GeometryCollection", "geometries": [
                {"type": "Point", "coordinates": [0, 0]},
                {"type": "MultiLineString", "coordinates": [[[0, 0], [3, 4]], [[0, 0], [0, 1]]]}
            ]}"#,
        );
        assert_eq!(collection.num_geometries(), 2);
        assert_eq!(collection.length(), 6.0);
    }

    #[test]
    fn read_features() {
        let feature = read(
            r#"{"type": "Feature",
                "properties": {"name": "Tower", "height": 96},
                "geometry": {"type": "Point", "coordinates": [-0.1246, 51.5007]}}"#,
        );
        assert_eq!(feature.geometry_type(), GeometryType::Point);
        assert_eq!(feature.data_value("name"), Some("Tower"));
        assert_eq!(feature.data_value("height"), Some("96"));

        let collection = read(
            r#"{"type": "FeatureCollection", "features": [
                {"type": "Feature", "properties": null, "geometry": {"type": "Point", "coordinates": [1, 1]}},
                {"type": "Feature", "properties": {"a": "b"}, "geometry": null}
            ]}"#,
        );
        assert_eq!(collection.geometry_type(), GeometryType::GeometryCollection);
        assert_eq!(collection.num_geometries(), 1);
    }

    #[test]
    fn invalid_input() {
        assert_matches!(
            GeoJson::new().read("{\"type\": \"Point\""),
            Err(GeolithError::Parse { format: "geojson", .. })
        );
        assert_matches!(
            GeoJson::new().read(
                r#"{"type": "Polygon", "coordinates": [[[0, 0], [1, 0], [1, 1], [0, 1]]]}"#
            ),
            Err(GeolithError::Parse { reason, .. }) if reason.contains("not closed")
        );
        assert_matches!(
            GeoJson::new().read(r#"{"type": "LineString", "coordinates": [[0, 0], [1]]}"#),
            Err(GeolithError::Parse { .. })
        );
    }

    #[test]
    fn write_geometry() {
        let json = write_json(
            LineString::new(vec![Coord::new(0.0, 0.0), Coord::new_3d(1.0, 2.0, 3.0)]).unwrap(),
        );
        assert_eq!(json["type"], "LineString");
        assert_eq!(json["coordinates"], serde_json::json!([[0.0, 0.0], [1.0, 2.0, 3.0]]));
    }

    #[test]
    fn write_features() {
        let json = write_json(Point::new(1.0, 2.0).with_data("name", "A"));
        assert_eq!(json["type"], "Feature");
        assert_eq!(json["properties"]["name"], "A");
        assert_eq!(json["geometry"]["type"], "Point");

        let json = write_json(GeometryCollection::new(vec![
            Point::new(1.0, 2.0).with_data("name", "A").into(),
            Point::new(3.0, 4.0).into(),
        ]));
        assert_eq!(json["type"], "FeatureCollection");
        assert_eq!(json["features"].as_array().map(Vec::len), Some(2));
    }

    #[test]
    fn write_with_precision() {
        let text = GeoJson::new()
            .write(
                &Point::new(1.0 / 3.0, 2.0).into(),
                &WriteOptions::default().with_precision(3),
            )
            .unwrap();
        let json: JsonValue = serde_json::from_str(&text).unwrap();
        assert_eq!(json["coordinates"], serde_json::json!([0.333, 2.0]));
    }

    #[test]
    fn empty_point_cannot_be_written() {
        assert_matches!(
            GeoJson::new().write(&Point::empty().into(), &WriteOptions::default()),
            Err(GeolithError::Write(_))
        );
    }
}
