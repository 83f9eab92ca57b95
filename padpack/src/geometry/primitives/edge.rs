use anyhow::Result;
use anyhow::ensure;

use crate::geometry::geo_traits::{DistanceTo, Translatable};
use crate::geometry::primitives::Point;

/// Tolerance under which two coordinates are considered equal when classifying edges
pub const AXIS_TOLERANCE: f64 = 1e-9;

/// Line segment between two [`Point`]s
#[derive(Clone, Debug, PartialEq, Copy)]
pub struct Edge {
    pub start: Point,
    pub end: Point,
}

impl Edge {
    pub fn try_new(start: Point, end: Point) -> Result<Self> {
        ensure!(start != end, "degenerate edge, {start:?} == {end:?}");
        Ok(Edge { start, end })
    }

    /// Creates an edge without checking for degeneracy, zero-length edges are valid inputs to most
    /// of the algorithms and are handled as a single point.
    pub const fn new(start: Point, end: Point) -> Self {
        Edge { start, end }
    }

    pub fn x_min(&self) -> f64 {
        f64::min(self.start.0, self.end.0)
    }

    pub fn y_min(&self) -> f64 {
        f64::min(self.start.1, self.end.1)
    }

    pub fn x_max(&self) -> f64 {
        f64::max(self.start.0, self.end.0)
    }

    pub fn y_max(&self) -> f64 {
        f64::max(self.start.1, self.end.1)
    }

    pub fn length(&self) -> f64 {
        self.start.distance(&self.end)
    }

    pub fn centroid(&self) -> Point {
        Point(
            (self.start.0 + self.end.0) / 2.0,
            (self.start.1 + self.end.1) / 2.0,
        )
    }

    /// Point at fraction `t` along the edge, `t = 0` is `start`, `t = 1` is `end`
    pub fn point_at(&self, t: f64) -> Point {
        self.start.lerp(&self.end, t)
    }

    pub fn is_vertical(&self) -> bool {
        (self.start.0 - self.end.0).abs() < AXIS_TOLERANCE
            && (self.start.1 - self.end.1).abs() >= AXIS_TOLERANCE
    }

    pub fn is_horizontal(&self) -> bool {
        (self.start.1 - self.end.1).abs() < AXIS_TOLERANCE
            && (self.start.0 - self.end.0).abs() >= AXIS_TOLERANCE
    }

    pub fn is_degenerate(&self) -> bool {
        self.length() < AXIS_TOLERANCE
    }

    /// Unit normal on the right-hand side of the directed edge, `None` if the edge is degenerate
    pub fn right_normal(&self) -> Option<Point> {
        let d = self.end - self.start;
        Point(d.1, -d.0).normalized()
    }

    /// Unit normal on the left-hand side of the directed edge, `None` if the edge is degenerate
    pub fn left_normal(&self) -> Option<Point> {
        self.right_normal().map(|n| -n)
    }

    /// Returns the closest point which lies on the edge to the given point
    pub fn closest_point(&self, point: &Point) -> Point {
        //from https://stackoverflow.com/a/6853926
        let Point(x1, y1) = self.start;
        let Point(x2, y2) = self.end;
        let Point(x, y) = *point;

        let a = x - x1;
        let b = y - y1;
        let c = x2 - x1;
        let d = y2 - y1;

        let dot = a * c + b * d;
        let len_sq = c * c + d * d;
        let mut param = -1.0;
        if len_sq != 0.0 {
            param = dot / len_sq;
        }
        match param {
            p if p < 0.0 => self.start,
            p if p > 1.0 => self.end,
            _ => Point(x1 + param * c, y1 + param * d),
        }
    }

    /// Returns the pair of closest points between `self` and `other`,
    /// the first point lying on `self` and the second on `other`.
    pub fn closest_points_between(&self, other: &Edge) -> (Point, Point) {
        if let Some(p) = self.intersection(other) {
            return (p, p);
        }
        //without an intersection, one of the four endpoints is part of the closest pair
        [
            (self.start, other.closest_point(&self.start)),
            (self.end, other.closest_point(&self.end)),
            (self.closest_point(&other.start), other.start),
            (self.closest_point(&other.end), other.end),
        ]
        .into_iter()
        .min_by(|(a1, b1), (a2, b2)| a1.sq_distance(b1).total_cmp(&a2.sq_distance(b2)))
        .expect("candidate list is non-empty")
    }

    /// Returns the intersection point of two non-parallel edges, if any
    pub fn intersection(&self, other: &Edge) -> Option<Point> {
        if f64::max(self.x_min(), other.x_min()) > f64::min(self.x_max(), other.x_max())
            || f64::max(self.y_min(), other.y_min()) > f64::min(self.y_max(), other.y_max())
        {
            //bounding boxes do not overlap
            return None;
        }

        //based on: https://en.wikipedia.org/wiki/Line%E2%80%93line_intersection#Given_two_points_on_each_line_segment
        let Point(x1, y1) = self.start;
        let Point(x2, y2) = self.end;
        let Point(x3, y3) = other.start;
        let Point(x4, y4) = other.end;

        let denom = (x1 - x2) * (y3 - y4) - (y1 - y2) * (x3 - x4);
        if denom == 0.0 {
            //parallel edges
            return None;
        }
        let t = ((x1 - x3) * (y3 - y4) - (y1 - y3) * (x3 - x4)) / denom;
        let u = -((x1 - x2) * (y1 - y3) - (y1 - y2) * (x1 - x3)) / denom;

        match (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u) {
            true => Some(Point(x1 + t * (x2 - x1), y1 + t * (y2 - y1))),
            false => None,
        }
    }
}

impl Translatable for Edge {
    fn translate(&mut self, d: Point) -> &mut Self {
        self.start.translate(d);
        self.end.translate(d);
        self
    }
}

impl DistanceTo<Point> for Edge {
    #[inline(always)]
    fn distance_to(&self, point: &Point) -> f64 {
        f64::sqrt(self.sq_distance_to(point))
    }

    #[inline(always)]
    fn sq_distance_to(&self, point: &Point) -> f64 {
        point.sq_distance(&self.closest_point(point))
    }
}

impl DistanceTo<Edge> for Edge {
    fn distance_to(&self, other: &Edge) -> f64 {
        f64::sqrt(self.sq_distance_to(other))
    }

    fn sq_distance_to(&self, other: &Edge) -> f64 {
        let (a, b) = self.closest_points_between(other);
        a.sq_distance(&b)
    }
}
