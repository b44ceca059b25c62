use serde::{Deserialize, Serialize};

use crate::cartesian::{CartesianPoint2d, Rect};
use crate::error::GeolithTypesError;
use crate::geometry::Part;
use crate::meta::{impl_with_meta, Meta};
use crate::segment::{chains_cross, is_simple_chain, Segment};
use crate::{Coord, Geometry, GeometryOps, GeometryType, LineString, Point};

/// Minimum number of points in a polygon ring, including the closing point.
const MIN_RING_POINTS: usize = 4;

const ON_RING_TOLERANCE: f64 = 1e-9;

/// Options of [`Polygon::area_with`].
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct AreaOptions {
    /// Ignore the holes.
    pub exterior_only: bool,
    /// Keep the sign of the exterior ring area: positive for counterclockwise winding, negative for clockwise.
    pub signed: bool,
}

/// Options of [`Polygon::point_in_polygon`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PointInPolygonOptions {
    /// Points lying on an edge are inside.
    pub on_boundary: bool,
    /// Points coinciding with a vertex are inside.
    pub on_vertex: bool,
}

impl Default for PointInPolygonOptions {
    fn default() -> Self {
        Self {
            on_boundary: true,
            on_vertex: true,
        }
    }
}

/// Planar surface bounded by an exterior ring, with optional holes.
///
/// Every ring is closed and has at least four points. Holes are expected to lie inside the exterior ring, but this is
/// not checked.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    rings: Vec<LineString>,
    meta: Meta,
}

impl Polygon {
    /// Creates a polygon from its rings, the first one being the exterior ring.
    ///
    /// Fails if any ring has fewer than four points or is not closed.
    pub fn new(rings: Vec<LineString>) -> Result<Self, GeolithTypesError> {
        Self::build(rings, false)
    }

    /// Same as [`Polygon::new`], but closes open rings by appending their start point.
    pub fn force_closed(rings: Vec<LineString>) -> Result<Self, GeolithTypesError> {
        Self::build(rings, true)
    }

    /// Creates an empty polygon.
    pub fn empty() -> Self {
        Self::default()
    }

    fn build(rings: Vec<LineString>, force: bool) -> Result<Self, GeolithTypesError> {
        let rings = rings
            .into_iter()
            .map(|ring| {
                if ring.num_points() < MIN_RING_POINTS {
                    return Err(GeolithTypesError::InvalidGeometry(format!(
                        "polygon ring must have at least {MIN_RING_POINTS} points, found {}",
                        ring.num_points()
                    )));
                }

                if ring.is_closed() {
                    return Ok(ring);
                }

                let (first, last) = (ring.points()[0], ring.points()[ring.num_points() - 1]);
                if !force {
                    return Err(GeolithTypesError::InvalidGeometry(format!(
                        "polygon ring is not closed: first point {:?}, last point {:?}",
                        first.as_array(),
                        last.as_array()
                    )));
                }

                let mut points = ring.points().to_vec();
                points.push(first);
                LineString::new(points)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            rings,
            meta: Meta::default(),
        })
    }

    /// All rings, exterior first.
    pub fn rings(&self) -> &[LineString] {
        &self.rings
    }

    /// Exterior ring, `None` for an empty polygon.
    pub fn exterior_ring(&self) -> Option<&LineString> {
        self.rings.first()
    }

    /// Holes of the polygon.
    pub fn interior_rings(&self) -> &[LineString] {
        self.rings.get(1..).unwrap_or_default()
    }

    /// Number of holes.
    pub fn num_interior_rings(&self) -> usize {
        self.interior_rings().len()
    }

    /// Hole by its 1-based index.
    pub fn interior_ring_n(&self, n: usize) -> Option<&LineString> {
        self.interior_rings().get(n.checked_sub(1)?)
    }

    /// Area of the polygon computed with the shoelace formula.
    pub fn area_with(&self, options: AreaOptions) -> f64 {
        let Some(exterior) = self.exterior_ring() else {
            return 0.0;
        };

        let signed = ring_signed_area(exterior.points());
        let area = if options.signed { signed } else { signed.abs() };

        if options.exterior_only {
            return area;
        }

        area - self
            .interior_rings()
            .iter()
            .map(|ring| ring_signed_area(ring.points()).abs())
            .sum::<f64>()
    }

    /// Exterior ring vertex farthest from the centroid. Empty if the centroid is empty.
    pub fn outermost_point(&self) -> Point {
        let centroid = self.centroid();
        let (Some(center), Some(exterior)) = (centroid.coord(), self.exterior_ring()) else {
            return Point::empty();
        };

        let mut max_distance = 0.0;
        let mut outermost = None;
        for p in exterior.points() {
            let distance = center.distance(p);
            if distance > max_distance {
                max_distance = distance;
                outermost = Some(*p);
            }
        }

        outermost.map(Point::from_coord).unwrap_or_default()
    }

    /// Returns true if the position coincides with a vertex of any ring, comparing planar coordinates.
    pub fn point_on_vertex(&self, point: &Coord) -> bool {
        self.rings
            .iter()
            .flat_map(|r| r.points())
            .any(|v| v.equal_2d(point))
    }

    /// Crossing-number test of the position against the exterior ring.
    ///
    /// Holes are not taken into account.
    pub fn point_in_polygon(&self, point: &Coord, options: PointInPolygonOptions) -> bool {
        let Some(exterior) = self.exterior_ring() else {
            return false;
        };
        let vertices = exterior.points();

        if vertices.iter().any(|v| v.equal_2d(point)) {
            return options.on_vertex;
        }

        let mut intersections = 0;
        for edge in vertices.windows(2) {
            let (v1, v2) = (&edge[0], &edge[1]);

            if v1.y == v2.y
                && v1.y == point.y
                && point.x > v1.x.min(v2.x)
                && point.x < v1.x.max(v2.x)
            {
                return options.on_boundary;
            }

            if point.y > v1.y.min(v2.y)
                && point.y <= v1.y.max(v2.y)
                && point.x <= v1.x.max(v2.x)
                && v1.y != v2.y
            {
                let x_inters = (point.y - v1.y) * (v2.x - v1.x) / (v2.y - v1.y) + v1.x;
                if x_inters == point.x {
                    return options.on_boundary;
                }
                if v1.x == v2.x || point.x <= x_inters {
                    intersections += 1;
                }
            }
        }

        intersections % 2 != 0
    }

    /// Returns true if the geometry lies inside the polygon.
    ///
    /// At least one point of the geometry must be inside the exterior ring, and none of its edges may leave the
    /// exterior ring, either by crossing an edge or by passing through a vertex or along an edge. Points on the ring
    /// count as inside. Only points, line strings and polygons are supported, other variants are never contained.
    pub fn contains(&self, geometry: &Geometry) -> bool {
        let Some(exterior) = self.exterior_ring() else {
            return false;
        };

        let edges = match geometry {
            Geometry::Point(_) => &[][..],
            Geometry::LineString(line) => line.points(),
            Geometry::Polygon(polygon) => match polygon.exterior_ring() {
                Some(ring) => ring.points(),
                None => return false,
            },
            _ => return false,
        };

        let Some(bounds) = exterior.bounding_rect() else {
            return false;
        };
        if !geometry.coords().all(|p| bounds.contains(p)) {
            return false;
        }

        let any_inside = geometry
            .coords()
            .any(|p| self.point_in_polygon(p, PointInPolygonOptions::default()));

        any_inside
            && !edges
                .windows(2)
                .any(|edge| self.edge_leaves(exterior.points(), &edge[0], &edge[1]))
    }

    /// Returns true if some part of the edge lies outside of the ring.
    ///
    /// The edge is cut at every ring vertex lying on it, and the middle of each piece is tested against the polygon.
    fn edge_leaves(&self, ring: &[Coord], from: &Coord, to: &Coord) -> bool {
        if from.equal_2d(to) {
            return false;
        }

        let edge = Segment(from, to);
        let direction = to.sub(from);
        let length_sq = direction.norm_squared();

        let mut cuts = vec![0.0, 1.0];
        for boundary in ring.windows(2) {
            if edge.crosses(&Segment(&boundary[0], &boundary[1])) {
                return true;
            }
            if edge.contains_point(&boundary[0]) {
                cuts.push(boundary[0].sub(from).dot(&direction) / length_sq);
            }
        }
        cuts.sort_by(f64::total_cmp);

        cuts.windows(2).filter(|t| t[1] > t[0]).any(|t| {
            let middle = (t[0] + t[1]) / 2.0;
            let sample = Coord::new(from.x + direction.x * middle, from.y + direction.y * middle);
            !self.point_in_polygon(&sample, PointInPolygonOptions::default())
                && !on_ring(ring, &sample)
        })
    }
}

/// Point-in-polygon misses points on sloped edges when the intersection is off by rounding.
fn on_ring(ring: &[Coord], point: &Coord) -> bool {
    ring.windows(2)
        .any(|w| Segment(&w[0], &w[1]).distance_to_point(point) <= ON_RING_TOLERANCE)
}

fn ring_signed_area(points: &[Coord]) -> f64 {
    let n = points.len();
    let sum: f64 = (0..n)
        .map(|k| {
            let (p, q) = (&points[k], &points[(k + 1) % n]);
            p.x * q.y - p.y * q.x
        })
        .sum();
    sum / 2.0
}

/// Unsigned area of the ring and its centroid, `None` for a ring of zero area.
fn ring_centroid_and_area(points: &[Coord]) -> Option<(Coord, f64)> {
    let signed_area = ring_signed_area(points);
    if signed_area == 0.0 {
        return None;
    }

    let n = points.len();
    let (mut x, mut y) = (0.0, 0.0);
    for k in 0..n {
        let (p, q) = (&points[k], &points[(k + 1) % n]);
        let cross = p.x * q.y - p.y * q.x;
        x += (p.x + q.x) * cross;
        y += (p.y + q.y) * cross;
    }

    Some((
        Coord::new(x / (6.0 * signed_area), y / (6.0 * signed_area)),
        signed_area.abs(),
    ))
}

impl_with_meta!(Polygon);

impl GeometryOps for Polygon {
    fn geometry_type(&self) -> GeometryType {
        GeometryType::Polygon
    }

    fn dimension(&self) -> u8 {
        2
    }

    fn is_empty(&self) -> bool {
        self.rings.is_empty()
    }

    fn coords(&self) -> impl Iterator<Item = &Coord> {
        self.rings.iter().flat_map(|r| r.points())
    }

    fn bounding_rect(&self) -> Option<Rect> {
        self.exterior_ring()?.bounding_rect()
    }

    fn centroid(&self) -> Point {
        let mut x = 0.0;
        let mut y = 0.0;
        let mut total_area = 0.0;
        for (i, ring) in self.rings.iter().enumerate() {
            let Some((center, area)) = ring_centroid_and_area(ring.points()) else {
                continue;
            };
            let weight = if i == 0 { area } else { -area };
            total_area += weight;
            x += center.x * weight;
            y += center.y * weight;
        }

        if total_area == 0.0 {
            return Point::empty();
        }

        Point::new(x / total_area, y / total_area)
    }

    fn area(&self) -> f64 {
        self.area_with(AreaOptions::default())
    }

    fn length(&self) -> f64 {
        self.rings.iter().map(|r| r.length()).sum()
    }

    fn is_simple(&self) -> bool {
        if !self.rings.iter().all(|r| is_simple_chain(r.points())) {
            return false;
        }

        self.rings.iter().enumerate().all(|(i, a)| {
            self.rings[i + 1..]
                .iter()
                .all(|b| !chains_cross(a.points(), b.points()))
        })
    }

    fn boundary(&self) -> Result<Geometry, GeolithTypesError> {
        Err(GeolithTypesError::UnsupportedOperation("boundary of a polygon"))
    }

    fn parts(&self) -> Vec<Part<'_>> {
        self.rings.iter().flat_map(|r| r.parts()).collect()
    }
}
