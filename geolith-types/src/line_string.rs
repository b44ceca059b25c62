use serde::{Deserialize, Serialize};

use crate::cartesian::CartesianPoint2d;
use crate::error::GeolithTypesError;
use crate::geo::{great_circle_distance, haversine_distance, vincenty_distance, Datum};
use crate::geometry::Part;
use crate::meta::{impl_with_meta, Meta};
use crate::segment::{is_simple_chain, Segment};
use crate::{Coord, Geometry, GeometryOps, GeometryType, MultiPoint, Point};

/// Ordered sequence of positions connected by straight segments.
///
/// A line string is either empty or has at least two points.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LineString {
    points: Vec<Coord>,
    meta: Meta,
}

impl LineString {
    /// Creates a new line string.
    ///
    /// Fails if exactly one point is given.
    pub fn new(points: Vec<Coord>) -> Result<Self, GeolithTypesError> {
        if points.len() == 1 {
            return Err(GeolithTypesError::InvalidGeometry(
                "cannot construct a line string from a single point".into(),
            ));
        }

        Ok(Self {
            points,
            meta: Meta::default(),
        })
    }

    /// Creates an empty line string.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Points of the line.
    pub fn points(&self) -> &[Coord] {
        &self.points
    }

    /// Number of points.
    pub fn num_points(&self) -> usize {
        self.points.len()
    }

    /// Point by its 1-based index. Negative indices count from the end, `-1` being the last point.
    pub fn point_n(&self, n: isize) -> Option<Point> {
        let index = if n > 0 {
            n as usize - 1
        } else if n < 0 {
            self.points.len().checked_sub(n.unsigned_abs())?
        } else {
            return None;
        };

        self.points.get(index).copied().map(Point::from_coord)
    }

    /// Returns true if the first and the last points are equal in all ordinates.
    pub fn is_closed(&self) -> bool {
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) => first == last,
            _ => false,
        }
    }

    /// Returns true if the line is closed and simple.
    pub fn is_ring(&self) -> bool {
        self.is_closed() && self.is_simple()
    }

    /// Iterates over the segments of the line.
    pub fn segments(&self) -> impl Iterator<Item = Segment<'_, Coord>> {
        self.points.windows(2).map(|w| Segment(&w[0], &w[1]))
    }

    /// Splits the line into two-point line strings, one for each segment.
    pub fn explode(&self) -> Vec<LineString> {
        self.points
            .windows(2)
            .map(|w| Self {
                points: w.to_vec(),
                meta: Meta::default(),
            })
            .collect()
    }

    /// Splits the line into pairs of consecutive points.
    pub fn explode_pairs(&self) -> Vec<[Coord; 2]> {
        self.points.windows(2).map(|w| [w[0], w[1]]).collect()
    }

    /// Returns true if the first segments of the two lines cross each other at a single interior point.
    ///
    /// Meant for two-point lines as produced by [`LineString::explode`].
    pub fn line_segment_intersect(&self, other: &LineString) -> bool {
        match (self.segments().next(), other.segments().next()) {
            (Some(a), Some(b)) => a.crosses(&b),
            _ => false,
        }
    }

    /// Length-weighted centroid of the segments together with the planar length of the line.
    ///
    /// A line of zero length has its start point as the centroid.
    pub fn centroid_and_length(&self) -> (Point, f64) {
        let Some(start) = self.points.first() else {
            return (Point::empty(), 0.0);
        };

        let mut x = 0.0;
        let mut y = 0.0;
        let mut length = 0.0;
        for segment in self.segments() {
            let segment_length = segment.0.distance(segment.1);
            x += (segment.0.x + segment.1.x) / 2.0 * segment_length;
            y += (segment.0.y + segment.1.y) / 2.0 * segment_length;
            length += segment_length;
        }

        if length == 0.0 {
            return (Point::from_coord(*start), 0.0);
        }

        (Point::new(x / length, y / length), length)
    }

    fn elevation_change(&self, tolerance: f64, gain: bool) -> f64 {
        let Some(start) = self.points.first() else {
            return 0.0;
        };

        let last_index = self.points.len() - 1;
        let mut total = 0.0;
        let mut recorded = start.z_or_zero();
        for (i, point) in self.points.iter().enumerate() {
            let z = point.z_or_zero();
            if (z - recorded).abs() > tolerance || i == last_index {
                let delta = if gain { z - recorded } else { recorded - z };
                if delta > 0.0 {
                    total += delta;
                }
                recorded = z;
            }
        }

        total
    }
}

impl_with_meta!(LineString);

impl GeometryOps for LineString {
    fn geometry_type(&self) -> GeometryType {
        GeometryType::LineString
    }

    fn dimension(&self) -> u8 {
        1
    }

    fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    fn coords(&self) -> impl Iterator<Item = &Coord> {
        self.points.iter()
    }

    fn centroid(&self) -> Point {
        self.centroid_and_length().0
    }

    fn length(&self) -> f64 {
        self.segments().map(|s| s.0.distance(s.1)).sum()
    }

    fn length_3d(&self) -> f64 {
        self.segments()
            .map(|s| {
                let dz = s.1.z_or_zero() - s.0.z_or_zero();
                (s.0.distance_sq(s.1) + dz * dz).sqrt()
            })
            .sum()
    }

    fn great_circle_length(&self, radius: f64) -> f64 {
        self.segments()
            .map(|s| great_circle_distance(s.0, s.1, radius))
            .sum()
    }

    fn haversine_length(&self) -> f64 {
        self.segments()
            .map(|s| haversine_distance(s.0, s.1))
            .filter(|d| {
                if d.is_nan() {
                    log::debug!("Skipping segment with undefined haversine distance");
                }
                !d.is_nan()
            })
            .sum()
    }

    fn vincenty_length(&self) -> Option<f64> {
        self.segments()
            .map(|s| vincenty_distance(s.0, s.1, &Datum::WGS84))
            .sum()
    }

    fn z_difference(&self) -> Option<f64> {
        let start = self.points.first()?.z?;
        let end = self.points.last()?.z?;
        Some((start - end).abs())
    }

    fn elevation_gain(&self, tolerance: f64) -> f64 {
        self.elevation_change(tolerance, true)
    }

    fn elevation_loss(&self, tolerance: f64) -> f64 {
        self.elevation_change(tolerance, false)
    }

    fn is_simple(&self) -> bool {
        is_simple_chain(&self.points)
    }

    fn boundary(&self) -> Result<Geometry, GeolithTypesError> {
        if self.is_empty() {
            return Ok(Geometry::LineString(LineString::empty()));
        }

        if self.is_closed() {
            return Ok(Geometry::MultiPoint(MultiPoint::empty()));
        }

        let ends = [self.points.first(), self.points.last()]
            .into_iter()
            .flatten()
            .copied()
            .map(Point::from_coord)
            .collect();
        Ok(Geometry::MultiPoint(MultiPoint::new(ends)))
    }

    fn parts(&self) -> Vec<Part<'_>> {
        if self.is_empty() {
            vec![]
        } else {
            vec![Part::Line(&self.points)]
        }
    }

    fn start_point(&self) -> Option<Point> {
        self.points.first().copied().map(Point::from_coord)
    }

    fn end_point(&self) -> Option<Point> {
        self.points.last().copied().map(Point::from_coord)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::WGS84_SEMI_MAJOR_AXIS;
    use approx::assert_abs_diff_eq;
    use assert_matches::assert_matches;

    fn line(points: &[(f64, f64)]) -> LineString {
        LineString::new(points.iter().map(|&(x, y)| Coord::new(x, y)).collect()).unwrap()
    }

    fn line_3d(points: &[(f64, f64, f64)]) -> LineString {
        LineString::new(
            points
                .iter()
                .map(|&(x, y, z)| Coord::new_3d(x, y, z))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn single_point_is_invalid() {
        assert_matches!(
            LineString::new(vec![Coord::new(1.0, 1.0)]),
            Err(GeolithTypesError::InvalidGeometry(_))
        );
        assert!(LineString::new(vec![]).unwrap().is_empty());
    }

    #[test]
    fn planar_lengths() {
        let l = line(&[(0.0, 0.0), (3.0, 4.0), (3.0, 10.0)]);
        assert_eq!(l.length(), 11.0);
        assert_eq!(l.length_3d(), 11.0);

        let l = line_3d(&[(0.0, 0.0, 0.0), (2.0, 3.0, 6.0)]);
        assert_eq!(l.length_3d(), 7.0);
    }

    #[test]
    fn geodesic_lengths() {
        let meridian = line(&[(0.0, 0.0), (0.0, 1.0)]);
        assert_abs_diff_eq!(
            meridian.great_circle_length(WGS84_SEMI_MAJOR_AXIS),
            111_319.490_793_273_57,
            epsilon = 1e-6
        );
        assert_abs_diff_eq!(
            meridian.haversine_length(),
            111_319.490_793_273_57,
            epsilon = 1e-3
        );

        let climb = line_3d(&[(5.0, 5.0, 0.0), (5.0, 5.0, 100.0)]);
        assert_abs_diff_eq!(
            climb.great_circle_length(WGS84_SEMI_MAJOR_AXIS),
            100.0,
            epsilon = 1e-6
        );
    }

    #[test]
    fn vincenty() {
        let nyc_london_osaka = line(&[
            (-74.006, 40.7128),
            (-0.1278, 51.5074),
            (135.5022, 34.6937),
        ]);
        assert_abs_diff_eq!(
            nyc_london_osaka.vincenty_length().unwrap(),
            15_107_644.0,
            epsilon = 1.0
        );

        let antipodal = line(&[(0.0, 0.0), (2.0, 4.0), (-178.0, -4.0)]);
        assert_eq!(antipodal.vincenty_length(), None);

        let repeated = line(&[(10.0, 10.0), (10.0, 10.0)]);
        assert_eq!(repeated.vincenty_length(), Some(0.0));
    }

    #[test]
    fn centroid() {
        let l = line(&[(0.0, 0.0), (4.0, 0.0), (4.0, 2.0)]);
        let (centroid, length) = l.centroid_and_length();
        assert_eq!(length, 6.0);
        assert_abs_diff_eq!(
            *centroid.coord().unwrap(),
            Coord::new(8.0 / 3.0, 1.0 / 3.0),
            epsilon = 1e-12
        );

        let degenerate = line(&[(2.0, 3.0), (2.0, 3.0)]);
        assert_eq!(degenerate.centroid(), Point::new(2.0, 3.0));

        assert!(LineString::empty().centroid().is_empty());
    }

    #[test]
    fn z_and_m_extremes() {
        let l = LineString::new(vec![
            Coord::new(0.0, 0.0),
            Coord::new_3d(1.0, 0.0, 5.0).with_m(2.0),
            Coord::new_3d(2.0, 0.0, -3.0),
        ])
        .unwrap();

        assert_eq!(l.minimum_z(), Some(-3.0));
        assert_eq!(l.maximum_z(), Some(5.0));
        assert_eq!(l.minimum_m(), Some(2.0));
        assert_eq!(l.maximum_m(), Some(2.0));
        assert_eq!(l.z_difference(), None);

        assert_eq!(line(&[(0.0, 0.0), (1.0, 1.0)]).maximum_z(), None);
    }

    #[test]
    fn elevation_gain_and_loss() {
        let l = line_3d(&[
            (0.0, 0.0, 100.0),
            (1.0, 0.0, 101.0),
            (2.0, 0.0, 100.0),
            (3.0, 0.0, 101.0),
            (4.0, 0.0, 110.0),
        ]);

        assert_eq!(l.elevation_gain(0.0), 11.0);
        assert_eq!(l.elevation_loss(0.0), 1.0);

        // 1 m wiggles stay below the tolerance
        assert_eq!(l.elevation_gain(2.0), 10.0);
        assert_eq!(l.elevation_loss(2.0), 0.0);
        assert_eq!(l.z_difference(), Some(10.0));
    }

    #[test]
    fn accessors() {
        let l = line(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)]);
        assert_eq!(l.num_points(), 3);
        assert_eq!(l.point_n(1), Some(Point::new(0.0, 0.0)));
        assert_eq!(l.point_n(-1), Some(Point::new(2.0, 0.0)));
        assert_eq!(l.point_n(-3), Some(Point::new(0.0, 0.0)));
        assert_eq!(l.point_n(0), None);
        assert_eq!(l.point_n(4), None);
        assert_eq!(l.point_n(-4), None);
        assert_eq!(l.start_point(), Some(Point::new(0.0, 0.0)));
        assert_eq!(l.end_point(), Some(Point::new(2.0, 0.0)));

        let pairs = l.explode_pairs();
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[1], [Coord::new(1.0, 0.0), Coord::new(2.0, 0.0)]);
        assert_eq!(l.explode()[0].num_points(), 2);
    }

    #[test]
    fn rings() {
        let ring = line(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 0.0)]);
        assert!(ring.is_closed());
        assert!(ring.is_ring());

        let bowtie = line(&[(0.0, 0.0), (1.0, 1.0), (1.0, 0.0), (0.0, 1.0), (0.0, 0.0)]);
        assert!(bowtie.is_closed());
        assert!(!bowtie.is_ring());

        let open = line(&[(0.0, 0.0), (1.0, 0.0)]);
        assert!(!open.is_closed());
        assert!(!LineString::empty().is_closed());
    }

    #[test]
    fn boundary() {
        let open = line(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)]);
        let Geometry::MultiPoint(ends) = open.boundary().unwrap() else {
            panic!("expected multipoint");
        };
        assert_eq!(
            ends.components(),
            &[Point::new(0.0, 0.0), Point::new(1.0, 1.0)]
        );

        let closed = line(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 0.0)]);
        assert_matches!(closed.boundary(), Ok(Geometry::MultiPoint(mp)) if mp.is_empty());

        assert_matches!(
            LineString::empty().boundary(),
            Ok(Geometry::LineString(l)) if l.is_empty()
        );
    }

    #[test]
    fn line_segment_intersect() {
        let a = line(&[(0.0, 0.0), (2.0, 2.0)]);
        let b = line(&[(0.0, 2.0), (2.0, 0.0)]);
        let c = line(&[(2.0, 2.0), (3.0, 0.0)]);
        assert!(a.line_segment_intersect(&b));
        assert!(!a.line_segment_intersect(&c));
    }

    #[test]
    fn distance_between_lines() {
        let a = line(&[(0.0, 0.0), (4.0, 0.0)]);
        let crossing = line(&[(2.0, -1.0), (2.0, 1.0)]);
        let above = line(&[(1.0, 3.0), (3.0, 5.0)]);

        assert_eq!(a.distance(&crossing), Some(0.0));
        assert_eq!(a.distance(&above), Some(3.0));
    }
}
