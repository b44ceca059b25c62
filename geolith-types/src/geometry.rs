use serde::{Deserialize, Serialize};

use crate::cartesian::{CartesianPoint2d, Rect};
use crate::error::GeolithTypesError;
use crate::meta::{Meta, WithMeta};
use crate::segment::Segment;
use crate::{
    Coord, GeometryCollection, GeometryType, LineString, MultiLineString, MultiPoint,
    MultiPolygon, Point, Polygon,
};

/// Capabilities shared by all geometry variants.
///
/// Operations that make no sense for a variant (like area of a line) return a neutral value instead of failing.
/// Operations that are structurally undefined return [`GeolithTypesError::UnsupportedOperation`].
pub trait GeometryOps {
    /// Type tag of the geometry.
    fn geometry_type(&self) -> GeometryType;

    /// Topological dimension: 0 for points, 1 for lines, 2 for surfaces. For collections, the highest dimension of
    /// the components.
    fn dimension(&self) -> u8;

    /// Returns true if the geometry has no points.
    fn is_empty(&self) -> bool;

    /// All positions of the geometry, in order, including the ones of nested geometries.
    fn coords(&self) -> impl Iterator<Item = &Coord>;

    /// Axis-aligned bounding rectangle, `None` for an empty geometry.
    fn bounding_rect(&self) -> Option<Rect> {
        Rect::from_points(self.coords())
    }

    /// Geometric center. Empty if it cannot be determined.
    fn centroid(&self) -> Point;

    /// Planar area.
    fn area(&self) -> f64 {
        0.0
    }

    /// Planar length.
    fn length(&self) -> f64 {
        0.0
    }

    /// Length taking elevation into account. Missing elevation is taken as zero.
    fn length_3d(&self) -> f64 {
        0.0
    }

    /// Length along great circles of a sphere with the given radius, in units of the radius.
    ///
    /// Use [`WGS84_SEMI_MAJOR_AXIS`](crate::geo::WGS84_SEMI_MAJOR_AXIS) to get meters on the earth.
    fn great_circle_length(&self, _radius: f64) -> f64 {
        0.0
    }

    /// Length computed with the haversine formula, in meters.
    fn haversine_length(&self) -> f64 {
        0.0
    }

    /// Length on the WGS84 ellipsoid, in meters. `None` if the Vincenty formula does not converge for some segment.
    fn vincenty_length(&self) -> Option<f64> {
        Some(0.0)
    }

    /// Smallest elevation among the points that have one.
    fn minimum_z(&self) -> Option<f64> {
        self.coords().filter_map(|c| c.z).reduce(f64::min)
    }

    /// Largest elevation among the points that have one.
    fn maximum_z(&self) -> Option<f64> {
        self.coords().filter_map(|c| c.z).reduce(f64::max)
    }

    /// Smallest measure among the points that have one.
    fn minimum_m(&self) -> Option<f64> {
        self.coords().filter_map(|c| c.m).reduce(f64::min)
    }

    /// Largest measure among the points that have one.
    fn maximum_m(&self) -> Option<f64> {
        self.coords().filter_map(|c| c.m).reduce(f64::max)
    }

    /// Absolute elevation difference between the start and the end points.
    fn z_difference(&self) -> Option<f64> {
        None
    }

    /// Accumulated climb along the geometry, ignoring changes not exceeding `tolerance`.
    fn elevation_gain(&self, _tolerance: f64) -> f64 {
        0.0
    }

    /// Accumulated descent along the geometry, ignoring changes not exceeding `tolerance`.
    fn elevation_loss(&self, _tolerance: f64) -> f64 {
        0.0
    }

    /// Returns true if the geometry does not intersect itself.
    fn is_simple(&self) -> bool;

    /// Boundary of the geometry.
    fn boundary(&self) -> Result<Geometry, GeolithTypesError>;

    /// Points and lines the geometry consists of, used for distance computation.
    fn parts(&self) -> Vec<Part<'_>>;

    /// First point of a curve.
    fn start_point(&self) -> Option<Point> {
        None
    }

    /// Last point of a curve.
    fn end_point(&self) -> Option<Point> {
        None
    }

    /// Returns true if any point has elevation.
    fn is_3d(&self) -> bool {
        self.coords().any(Coord::has_z)
    }

    /// Returns true if any point has a measure.
    fn is_measured(&self) -> bool {
        self.coords().any(Coord::is_measured)
    }

    /// Structural equality: same type and same positions in the same order. Metadata is ignored.
    fn equals(&self, other: &impl GeometryOps) -> bool {
        self.geometry_type() == other.geometry_type() && self.coords().eq(other.coords())
    }

    /// Smallest planar distance between the two geometries. `None` if any of them is empty.
    ///
    /// Polygons are measured by their rings, so a point inside a polygon has the distance to its nearest edge.
    fn distance(&self, other: &impl GeometryOps) -> Option<f64> {
        let ours = self.parts();
        let theirs = other.parts();
        ours.iter()
            .flat_map(|a| theirs.iter().map(move |b| a.distance(b)))
            .reduce(f64::min)
    }
}

/// Elementary piece of a geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Part<'a> {
    /// A single position.
    Point(&'a Coord),
    /// A chain of segments.
    Line(&'a [Coord]),
}

impl Part<'_> {
    fn segments(line: &[Coord]) -> impl Iterator<Item = Segment<'_, Coord>> {
        line.windows(2).map(|w| Segment(&w[0], &w[1]))
    }

    fn distance(&self, other: &Part) -> f64 {
        match (self, other) {
            (Part::Point(a), Part::Point(b)) => a.distance(*b),
            (Part::Point(p), Part::Line(line)) | (Part::Line(line), Part::Point(p)) => {
                Self::segments(line)
                    .map(|s| s.distance_to_point(*p))
                    .fold(f64::INFINITY, f64::min)
            }
            (Part::Line(a), Part::Line(b)) => {
                let mut min = f64::INFINITY;
                for sa in Self::segments(a) {
                    for sb in Self::segments(b) {
                        if sa.intersects(&sb) {
                            return 0.0;
                        }

                        min = min
                            .min(sb.distance_to_point(sa.0))
                            .min(sb.distance_to_point(sa.1))
                            .min(sa.distance_to_point(sb.0))
                            .min(sa.distance_to_point(sb.1));
                    }
                }
                min
            }
        }
    }
}

/// Any geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Geometry {
    /// Point.
    Point(Point),
    /// LineString.
    LineString(LineString),
    /// Polygon.
    Polygon(Polygon),
    /// MultiPoint.
    MultiPoint(MultiPoint),
    /// MultiLineString.
    MultiLineString(MultiLineString),
    /// MultiPolygon.
    MultiPolygon(MultiPolygon),
    /// GeometryCollection.
    GeometryCollection(GeometryCollection),
}

macro_rules! dispatch {
    ($self:expr, $g:ident => $body:expr) => {
        match $self {
            Geometry::Point($g) => $body,
            Geometry::LineString($g) => $body,
            Geometry::Polygon($g) => $body,
            Geometry::MultiPoint($g) => $body,
            Geometry::MultiLineString($g) => $body,
            Geometry::MultiPolygon($g) => $body,
            Geometry::GeometryCollection($g) => $body,
        }
    };
}

impl Geometry {
    /// Splits all curves and rings of the geometry into two-point line strings.
    pub fn explode(&self) -> Vec<LineString> {
        match self {
            Geometry::Point(_) | Geometry::MultiPoint(_) => vec![],
            Geometry::LineString(line) => line.explode(),
            Geometry::Polygon(polygon) => polygon.rings().iter().flat_map(|r| r.explode()).collect(),
            Geometry::MultiLineString(c) => c.iter().flat_map(|l| l.explode()).collect(),
            Geometry::MultiPolygon(c) => c
                .iter()
                .flat_map(|p| p.rings().iter().flat_map(|r| r.explode()))
                .collect(),
            Geometry::GeometryCollection(c) => c.iter().flat_map(|g| g.explode()).collect(),
        }
    }

    /// Number of direct components of a collection, 1 for a simple geometry that is not empty.
    pub fn num_geometries(&self) -> usize {
        match self {
            Geometry::MultiPoint(c) => c.num_geometries(),
            Geometry::MultiLineString(c) => c.num_geometries(),
            Geometry::MultiPolygon(c) => c.num_geometries(),
            Geometry::GeometryCollection(c) => c.num_geometries(),
            simple => usize::from(!simple.is_empty()),
        }
    }
}

impl GeometryOps for Geometry {
    fn geometry_type(&self) -> GeometryType {
        dispatch!(self, g => g.geometry_type())
    }

    fn dimension(&self) -> u8 {
        dispatch!(self, g => g.dimension())
    }

    fn is_empty(&self) -> bool {
        dispatch!(self, g => g.is_empty())
    }

    fn coords(&self) -> impl Iterator<Item = &Coord> {
        dispatch!(self, g => Box::new(g.coords()) as Box<dyn Iterator<Item = &Coord> + '_>)
    }

    fn bounding_rect(&self) -> Option<Rect> {
        dispatch!(self, g => g.bounding_rect())
    }

    fn centroid(&self) -> Point {
        dispatch!(self, g => g.centroid())
    }

    fn area(&self) -> f64 {
        dispatch!(self, g => g.area())
    }

    fn length(&self) -> f64 {
        dispatch!(self, g => g.length())
    }

    fn length_3d(&self) -> f64 {
        dispatch!(self, g => g.length_3d())
    }

    fn great_circle_length(&self, radius: f64) -> f64 {
        dispatch!(self, g => g.great_circle_length(radius))
    }

    fn haversine_length(&self) -> f64 {
        dispatch!(self, g => g.haversine_length())
    }

    fn vincenty_length(&self) -> Option<f64> {
        dispatch!(self, g => g.vincenty_length())
    }

    fn minimum_z(&self) -> Option<f64> {
        dispatch!(self, g => g.minimum_z())
    }

    fn maximum_z(&self) -> Option<f64> {
        dispatch!(self, g => g.maximum_z())
    }

    fn minimum_m(&self) -> Option<f64> {
        dispatch!(self, g => g.minimum_m())
    }

    fn maximum_m(&self) -> Option<f64> {
        dispatch!(self, g => g.maximum_m())
    }

    fn z_difference(&self) -> Option<f64> {
        dispatch!(self, g => g.z_difference())
    }

    fn elevation_gain(&self, tolerance: f64) -> f64 {
        dispatch!(self, g => g.elevation_gain(tolerance))
    }

    fn elevation_loss(&self, tolerance: f64) -> f64 {
        dispatch!(self, g => g.elevation_loss(tolerance))
    }

    fn is_simple(&self) -> bool {
        dispatch!(self, g => g.is_simple())
    }

    fn boundary(&self) -> Result<Geometry, GeolithTypesError> {
        dispatch!(self, g => g.boundary())
    }

    fn parts(&self) -> Vec<Part<'_>> {
        dispatch!(self, g => g.parts())
    }

    fn start_point(&self) -> Option<Point> {
        dispatch!(self, g => g.start_point())
    }

    fn end_point(&self) -> Option<Point> {
        dispatch!(self, g => g.end_point())
    }
}

impl WithMeta for Geometry {
    fn meta(&self) -> &Meta {
        dispatch!(self, g => g.meta())
    }

    fn meta_mut(&mut self) -> &mut Meta {
        dispatch!(self, g => g.meta_mut())
    }
}

macro_rules! impl_from_variant {
    ($($variant:ident),+) => {
        $(
            impl From<$variant> for Geometry {
                fn from(value: $variant) -> Self {
                    Self::$variant(value)
                }
            }
        )+
    };
}

impl_from_variant!(
    Point,
    LineString,
    Polygon,
    MultiPoint,
    MultiLineString,
    MultiPolygon,
    GeometryCollection
);
