//! Straight line segments and the intersection predicates built on them.

use nalgebra::Vector2;
use num_traits::{Float, One, Zero};

use crate::cartesian::{CartesianPoint2d, Orientation};
use crate::Coord;

/// A straight line segment between two points.
#[derive(Debug, PartialEq)]
pub struct Segment<'a, Point>(pub &'a Point, pub &'a Point);

impl<P> Clone for Segment<'_, P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<P> Copy for Segment<'_, P> {}

impl<'a, P: CartesianPoint2d> Segment<'a, P> {
    /// Shortest euclidean distance (squared) between a point and the segment:
    ///
    /// * if the normal from the point to the segment ends inside the segment, the returned value is the squared length
    ///   of the normal
    /// * if the normal from the point to the segment ends outside of the segment, the returned value is the smaller one
    ///   of the distances between the point and the segment's endpoints
    pub fn distance_to_point_sq<Point: CartesianPoint2d<Num = P::Num>>(
        &self,
        point: &Point,
    ) -> P::Num {
        if self.0.equal_2d(self.1) {
            return self.0.distance_sq(point);
        }

        let ds = self.1.sub(self.0);
        let dp = point.sub(self.0);
        let ds_len = ds.x * ds.x + ds.y * ds.y;

        let r = (dp.x * ds.x + dp.y * ds.y) / ds_len;
        if r <= P::Num::zero() {
            self.0.distance_sq(point)
        } else if r >= P::Num::one() {
            self.1.distance_sq(point)
        } else {
            let s = (dp.y * ds.x - dp.x * ds.y) / ds_len;
            (s * s) * ds_len
        }
    }

    /// Shortest euclidean distance between a point and the segment.
    pub fn distance_to_point<Point: CartesianPoint2d<Num = P::Num>>(&self, point: &Point) -> P::Num {
        self.distance_to_point_sq(point).sqrt()
    }

    /// Returns true, if the segment has at least one common point with the `other` segment.
    ///
    /// Touching endpoints and collinear overlaps count as intersections.
    pub fn intersects<Point: CartesianPoint2d<Num = P::Num>>(
        &self,
        other: &Segment<Point>,
    ) -> bool {
        let o1 = Orientation::triplet(self.0, other.0, self.1);
        let o2 = Orientation::triplet(self.0, other.1, self.1);
        let o3 = Orientation::triplet(other.0, self.0, other.1);
        let o4 = Orientation::triplet(other.0, self.1, other.1);

        if o1 != o2 && o3 != o4 {
            return true;
        }

        (o1 == Orientation::Collinear && on_segment(self.0, other.0, self.1))
            || (o2 == Orientation::Collinear && on_segment(self.0, other.1, self.1))
            || (o3 == Orientation::Collinear && on_segment(other.0, self.0, other.1))
            || (o4 == Orientation::Collinear && on_segment(other.0, self.1, other.1))
    }

    /// Returns true if the segments cross each other at a single point lying strictly inside both of them.
    ///
    /// Unlike [`Segment::intersects`], touching at an endpoint or running along the same line is not a crossing.
    pub fn crosses<Point: CartesianPoint2d<Num = P::Num>>(&self, other: &Segment<Point>) -> bool {
        let o1 = Orientation::triplet(self.0, other.0, self.1);
        let o2 = Orientation::triplet(self.0, other.1, self.1);
        let o3 = Orientation::triplet(other.0, self.0, other.1);
        let o4 = Orientation::triplet(other.0, self.1, other.1);

        [o1, o2, o3, o4]
            .iter()
            .all(|o| *o != Orientation::Collinear)
            && o1 != o2
            && o3 != o4
    }

    /// Returns true if the point lies on the segment, endpoints included.
    pub fn contains_point<Point: CartesianPoint2d<Num = P::Num>>(&self, point: &Point) -> bool {
        Orientation::triplet(self.0, point, self.1) == Orientation::Collinear
            && on_segment(self.0, point, self.1)
    }

    fn direction(&self) -> Vector2<P::Num> {
        self.1.sub(self.0)
    }
}

fn on_segment<Num: Float>(
    p: &impl CartesianPoint2d<Num = Num>,
    q: &impl CartesianPoint2d<Num = Num>,
    r: &impl CartesianPoint2d<Num = Num>,
) -> bool {
    q.x() <= p.x().max(r.x())
        && q.x() >= p.x().min(r.x())
        && q.y() <= p.y().max(r.y())
        && q.y() >= p.y().min(r.y())
}

/// Adjacent segments `a -> b` and `b -> c` overlap if `c` folds back along `a -> b`.
fn folds_back(a: &Coord, b: &Coord, c: &Coord) -> bool {
    if Orientation::triplet(a, b, c) != Orientation::Collinear {
        return false;
    }

    let back = Segment(b, a).direction();
    let forth = Segment(b, c).direction();
    back.dot(&forth) > 0.0
}

/// Checks that no two segments of the chain share a point, except for the common vertex of adjacent segments.
///
/// A chain whose first and last points coincide is treated as a ring: its last and first segments are adjacent too.
/// Repeated consecutive vertices are ignored. The check is quadratic in the number of segments.
pub(crate) fn is_simple_chain(points: &[Coord]) -> bool {
    let mut vertices: Vec<&Coord> = Vec::with_capacity(points.len());
    for p in points {
        if vertices.last().map_or(true, |last| !last.equal_2d(p)) {
            vertices.push(p);
        }
    }

    if vertices.len() < 3 {
        return true;
    }

    let closed = vertices[0].equal_2d(vertices[vertices.len() - 1]);
    let segments: Vec<Segment<Coord>> = vertices.windows(2).map(|w| Segment(w[0], w[1])).collect();
    let n = segments.len();

    for i in 0..n {
        for j in (i + 1)..n {
            if j == i + 1 {
                if folds_back(segments[i].0, segments[i].1, segments[j].1) {
                    return false;
                }
            } else if closed && i == 0 && j == n - 1 {
                if folds_back(segments[j].0, segments[i].0, segments[i].1) {
                    return false;
                }
            } else if segments[i].intersects(&segments[j]) {
                return false;
            }
        }
    }

    true
}

/// Returns true if any segment of the first chain crosses any segment of the second one.
pub(crate) fn chains_cross(a: &[Coord], b: &[Coord]) -> bool {
    a.windows(2).any(|sa| {
        let sa = Segment(&sa[0], &sa[1]);
        b.windows(2)
            .any(|sb| sa.crosses(&Segment(&sb[0], &sb[1])))
    })
}
