use anyhow::Result;
use anyhow::ensure;

use crate::geometry::geo_traits::{CollidesWith, DistanceTo, Translatable};
use crate::geometry::primitives::{Edge, Point};

///Axis-aligned rectangle
#[derive(Clone, Debug, PartialEq, Copy)]
pub struct Rect {
    pub x_min: f64,
    pub y_min: f64,
    pub x_max: f64,
    pub y_max: f64,
}

impl Rect {
    /// Creates a new rectangle, zero width or height is allowed (a pad can be infinitely thin).
    pub fn try_new(x_min: f64, y_min: f64, x_max: f64, y_max: f64) -> Result<Self> {
        ensure!(
            x_min <= x_max && y_min <= y_max,
            "invalid rectangle, x_min: {x_min}, x_max: {x_max}, y_min: {y_min}, y_max: {y_max}"
        );
        Ok(Rect {
            x_min,
            y_min,
            x_max,
            y_max,
        })
    }

    /// Rectangle of `width` by `height` centered around `center`
    pub fn from_center(center: Point, width: f64, height: f64) -> Self {
        Rect {
            x_min: center.0 - width / 2.0,
            y_min: center.1 - height / 2.0,
            x_max: center.0 + width / 2.0,
            y_max: center.1 + height / 2.0,
        }
    }

    pub fn from_diagonal_corners(c1: Point, c2: Point) -> Self {
        Rect {
            x_min: f64::min(c1.0, c2.0),
            y_min: f64::min(c1.1, c2.1),
            x_max: f64::max(c1.0, c2.0),
            y_max: f64::max(c1.1, c2.1),
        }
    }

    /// Smallest rectangle containing all `points`, `None` if there are none.
    pub fn bounding_points(points: impl IntoIterator<Item = Point>) -> Option<Rect> {
        points
            .into_iter()
            .map(|p| Rect::from_diagonal_corners(p, p))
            .reduce(Rect::bounding_rect)
    }

    /// Returns a new rectangle with the same centroid as `self` but expanded by `d` in every direction.
    /// Negative values shrink the rectangle, `None` if it would collapse.
    pub fn inflate(self, d: f64) -> Option<Self> {
        self.resize_by(d, d)
    }

    /// Returns a new rectangle with the same centroid as `self` but expanded by `dx` in both x-directions and by `dy` in both y-directions.
    /// If the new rectangle is invalid (x_min > x_max or y_min > y_max), returns None.
    pub fn resize_by(mut self, dx: f64, dy: f64) -> Option<Self> {
        self.x_min -= dx;
        self.y_min -= dy;
        self.x_max += dx;
        self.y_max += dy;

        if self.x_min <= self.x_max && self.y_min <= self.y_max {
            Some(self)
        } else {
            //resizing would lead to invalid rectangle
            None
        }
    }

    /// Returns the four corners of `self`, counter-clockwise starting from the top right.
    pub fn corners(&self) -> [Point; 4] {
        [
            Point(self.x_max, self.y_max),
            Point(self.x_min, self.y_max),
            Point(self.x_min, self.y_min),
            Point(self.x_max, self.y_min),
        ]
    }

    /// Returns the four edges of `self`, counter-clockwise.
    pub fn edges(&self) -> [Edge; 4] {
        let c = self.corners();
        [
            Edge::new(c[0], c[1]),
            Edge::new(c[1], c[2]),
            Edge::new(c[2], c[3]),
            Edge::new(c[3], c[0]),
        ]
    }

    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }

    /// Returns the largest rectangle that is contained in both `a` and `b`.
    pub fn intersection(a: Rect, b: Rect) -> Option<Rect> {
        let x_min = f64::max(a.x_min, b.x_min);
        let y_min = f64::max(a.y_min, b.y_min);
        let x_max = f64::min(a.x_max, b.x_max);
        let y_max = f64::min(a.y_max, b.y_max);
        if x_min <= x_max && y_min <= y_max {
            Some(Rect {
                x_min,
                y_min,
                x_max,
                y_max,
            })
        } else {
            None
        }
    }

    /// Returns the smallest rectangle that contains both `a` and `b`.
    pub fn bounding_rect(a: Rect, b: Rect) -> Rect {
        Rect {
            x_min: f64::min(a.x_min, b.x_min),
            y_min: f64::min(a.y_min, b.y_min),
            x_max: f64::max(a.x_max, b.x_max),
            y_max: f64::max(a.y_max, b.y_max),
        }
    }

    pub fn centroid(&self) -> Point {
        Point(
            (self.x_min + self.x_max) / 2.0,
            (self.y_min + self.y_max) / 2.0,
        )
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// Largest of width and height
    pub fn span(&self) -> f64 {
        f64::max(self.width(), self.height())
    }

    /// `true` if `other` lies entirely within `self`, up to `tolerance`
    pub fn contains_rect(&self, other: &Rect, tolerance: f64) -> bool {
        other.x_min >= self.x_min - tolerance
            && other.y_min >= self.y_min - tolerance
            && other.x_max <= self.x_max + tolerance
            && other.y_max <= self.y_max + tolerance
    }

    /// Chebyshev separation between two rectangles: the largest of the horizontal and vertical gaps.
    /// Negative if the rectangles overlap, in which case the magnitude is the smallest penetration depth.
    pub fn gap_to(&self, other: &Rect) -> f64 {
        let dx = f64::max(self.x_min - other.x_max, other.x_min - self.x_max);
        let dy = f64::max(self.y_min - other.y_max, other.y_min - self.y_max);
        f64::max(dx, dy)
    }

    /// Clamps `point` into `self`
    pub fn clamp(&self, point: Point) -> Point {
        Point(
            point.0.clamp(self.x_min, self.x_max),
            point.1.clamp(self.y_min, self.y_max),
        )
    }
}

impl Translatable for Rect {
    fn translate(&mut self, Point(dx, dy): Point) -> &mut Self {
        self.x_min += dx;
        self.x_max += dx;
        self.y_min += dy;
        self.y_max += dy;
        self
    }
}

impl CollidesWith<Rect> for Rect {
    #[inline(always)]
    fn collides_with(&self, other: &Rect) -> bool {
        f64::max(self.x_min, other.x_min) <= f64::min(self.x_max, other.x_max)
            && f64::max(self.y_min, other.y_min) <= f64::min(self.y_max, other.y_max)
    }
}

impl CollidesWith<Point> for Rect {
    #[inline(always)]
    fn collides_with(&self, point: &Point) -> bool {
        let Point(x, y) = *point;
        x >= self.x_min && x <= self.x_max && y >= self.y_min && y <= self.y_max
    }
}

impl DistanceTo<Point> for Rect {
    #[inline(always)]
    fn distance_to(&self, point: &Point) -> f64 {
        self.sq_distance_to(point).sqrt()
    }

    #[inline(always)]
    fn sq_distance_to(&self, point: &Point) -> f64 {
        let Point(x, y) = *point;
        let mut distance: f64 = 0.0;
        if x < self.x_min {
            distance += (x - self.x_min).powi(2);
        } else if x > self.x_max {
            distance += (x - self.x_max).powi(2);
        }
        if y < self.y_min {
            distance += (y - self.y_min).powi(2);
        } else if y > self.y_max {
            distance += (y - self.y_max).powi(2);
        }
        distance
    }
}

impl DistanceTo<Rect> for Rect {
    /// Euclidean distance between the boundaries of two disjoint rectangles, 0 if they collide.
    fn distance_to(&self, other: &Rect) -> f64 {
        self.sq_distance_to(other).sqrt()
    }

    fn sq_distance_to(&self, other: &Rect) -> f64 {
        if self.collides_with(other) {
            return 0.0;
        }
        self.edges()
            .iter()
            .flat_map(|e1| other.edges().map(|e2| e1.sq_distance_to(&e2)))
            .fold(f64::INFINITY, f64::min)
    }
}
