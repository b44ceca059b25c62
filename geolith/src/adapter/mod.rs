//! Adapters convert geometries from and to textual exchange formats.
//!
//! Every format is one implementation of the [`GeoAdapter`] trait. Adapters are stateless apart from their
//! configuration, so a single instance can be shared between threads and used for any number of documents.

use geolith_types::Geometry;

use crate::error::GeolithError;

#[cfg(feature = "geojson")]
mod geojson;
mod kml;
mod wkt;
mod xml;

#[cfg(feature = "geojson")]
pub use self::geojson::GeoJson;
pub use self::kml::Kml;
pub use self::wkt::Wkt;

/// Bidirectional mapping between a [`Geometry`] and its text representation.
pub trait GeoAdapter: Send + Sync {
    /// Name of the format, used as the registry key.
    fn name(&self) -> &'static str;

    /// Parses a geometry.
    fn read(&self, text: &str) -> Result<Geometry, GeolithError>;

    /// Serializes a geometry.
    fn write(&self, geometry: &Geometry, options: &WriteOptions) -> Result<String, GeolithError>;
}

/// Options for [`GeoAdapter::write`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteOptions {
    /// Namespace prefix for the element names of XML based formats.
    pub namespace: Option<String>,
    /// Number of decimal digits. Trailing zeros are removed. If not set, the shortest exact representation is used.
    pub precision: Option<usize>,
}

impl WriteOptions {
    /// Sets the namespace prefix.
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Sets the number of decimal digits.
    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = Some(precision);
        self
    }

    pub(crate) fn format_number(&self, value: f64) -> String {
        let Some(precision) = self.precision else {
            return format!("{value}");
        };

        let formatted = format!("{value:.precision$}");
        let trimmed = if formatted.contains('.') {
            formatted.trim_end_matches('0').trim_end_matches('.')
        } else {
            &formatted
        };

        match trimmed {
            "-0" => "0".to_string(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_formatting() {
        let default = WriteOptions::default();
        assert_eq!(default.format_number(1.0), "1");
        assert_eq!(default.format_number(-0.25), "-0.25");

        let rounded = WriteOptions::default().with_precision(3);
        assert_eq!(rounded.format_number(1.0), "1");
        assert_eq!(rounded.format_number(2.123_456), "2.123");
        assert_eq!(rounded.format_number(-0.000_1), "0");
        assert_eq!(rounded.format_number(10.5), "10.5");

        let integer = WriteOptions::default().with_precision(0);
        assert_eq!(integer.format_number(120.0), "120");
    }
}
