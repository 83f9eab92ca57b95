use std::hash::{Hash, Hasher};
use std::ops::{Add, Mul, Neg, Sub};

use crate::geometry::geo_traits::{CollidesWith, DistanceTo, Translatable};

/// Geometric primitive representing a point
#[derive(Debug, Clone, PartialEq, Copy, Default)]
pub struct Point(pub f64, pub f64);

impl Point {
    pub const ORIGIN: Point = Point(0.0, 0.0);

    #[inline(always)]
    pub fn x(&self) -> f64 {
        self.0
    }

    #[inline(always)]
    pub fn y(&self) -> f64 {
        self.1
    }

    pub fn distance(&self, other: &Point) -> f64 {
        self.sq_distance(other).sqrt()
    }

    pub fn sq_distance(&self, other: &Point) -> f64 {
        (self.0 - other.0).powi(2) + (self.1 - other.1).powi(2)
    }

    /// Length of the vector from the origin to `self`
    pub fn norm(&self) -> f64 {
        (self.0.powi(2) + self.1.powi(2)).sqrt()
    }

    pub fn dot(&self, other: &Point) -> f64 {
        self.0 * other.0 + self.1 * other.1
    }

    /// Unit vector in the direction of `self`, `None` for the zero vector
    pub fn normalized(&self) -> Option<Point> {
        let n = self.norm();
        match n > 0.0 {
            true => Some(Point(self.0 / n, self.1 / n)),
            false => None,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.0.is_finite() && self.1.is_finite()
    }

    /// Point on the line between `self` (t = 0) and `other` (t = 1)
    pub fn lerp(&self, other: &Point, t: f64) -> Point {
        Point(
            self.0 + (other.0 - self.0) * t,
            self.1 + (other.1 - self.1) * t,
        )
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point(self.0 + rhs.0, self.1 + rhs.1)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point(self.0 - rhs.0, self.1 - rhs.1)
    }
}

impl Mul<f64> for Point {
    type Output = Point;

    fn mul(self, rhs: f64) -> Point {
        Point(self.0 * rhs, self.1 * rhs)
    }
}

impl Neg for Point {
    type Output = Point;

    fn neg(self) -> Point {
        Point(-self.0, -self.1)
    }
}

impl Translatable for Point {
    fn translate(&mut self, d: Point) -> &mut Self {
        self.0 += d.0;
        self.1 += d.1;
        self
    }
}

impl DistanceTo<Point> for Point {
    fn distance_to(&self, other: &Point) -> f64 {
        self.distance(other)
    }

    fn sq_distance_to(&self, other: &Point) -> f64 {
        self.sq_distance(other)
    }
}

impl Eq for Point {}

impl Hash for Point {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let x = self.0.to_bits();
        let y = self.1.to_bits();
        x.hash(state);
        y.hash(state);
    }
}

impl From<Point> for (f64, f64) {
    fn from(p: Point) -> Self {
        (p.0, p.1)
    }
}

impl From<(f64, f64)> for Point {
    fn from(p: (f64, f64)) -> Self {
        Point(p.0, p.1)
    }
}

impl<T> CollidesWith<T> for Point
where
    T: CollidesWith<Point>,
{
    fn collides_with(&self, other: &T) -> bool {
        other.collides_with(self)
    }
}
