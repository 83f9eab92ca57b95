use crate::geometry::primitives::Point;

/// Trait for types that can detect collisions between `Self` and `T`.
pub trait CollidesWith<T> {
    fn collides_with(&self, other: &T) -> bool;
}

/// Trait for types that can compute the minimum distance between `Self` and `T`.
pub trait DistanceTo<T> {
    /// Minimum distance between two primitives. Will be 0 in case of a collision.
    fn distance_to(&self, other: &T) -> f64;

    /// Squared version of [DistanceTo::distance_to]
    fn sq_distance_to(&self, other: &T) -> f64;
}

/// Trait for types that can be moved around in the plane.
pub trait Translatable: Clone {
    fn translate(&mut self, d: Point) -> &mut Self;

    fn translate_clone(&self, d: Point) -> Self {
        let mut clone = self.clone();
        clone.translate(d);
        clone
    }
}
