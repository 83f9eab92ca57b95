use crate::geometry::primitives::{Point, Rect};

/// Normalizes an angle in degrees to the range [0, 360)
pub fn normalize_degrees(degrees: f64) -> f64 {
    let d = degrees.rem_euclid(360.0);
    //rem_euclid can return exactly 360.0 for tiny negative inputs
    if d >= 360.0 { 0.0 } else { d }
}

/// Index of the quarter turn `degrees` corresponds to (0 → 0°, 1 → 90°, ...), if any
pub fn quarter_turn(degrees: f64) -> Option<u8> {
    let d = normalize_degrees(degrees);
    [0.0, 90.0, 180.0, 270.0, 360.0]
        .iter()
        .position(|q| (d - q).abs() < 1e-9)
        .map(|i| (i % 4) as u8)
}

/// Returns `(sin, cos)` of the angle, exact for quarter turns
fn sin_cos_degrees(degrees: f64) -> (f64, f64) {
    match quarter_turn(degrees) {
        Some(0) => (0.0, 1.0),
        Some(1) => (1.0, 0.0),
        Some(2) => (0.0, -1.0),
        Some(3) => (-1.0, 0.0),
        _ => degrees.to_radians().sin_cos(),
    }
}

/// Rotates `p` counter-clockwise around the origin by `degrees`
pub fn rotate_point(p: Point, degrees: f64) -> Point {
    let (sin, cos) = sin_cos_degrees(degrees);
    Point(p.0 * cos - p.1 * sin, p.0 * sin + p.1 * cos)
}

/// Width and height of the axis-aligned bounding box of a `width` x `height` rectangle after rotation.
/// For quarter turns of 90° and 270° this is simply the swapped dimensions.
pub fn rotate_extents(width: f64, height: f64, degrees: f64) -> (f64, f64) {
    match quarter_turn(degrees) {
        Some(0) | Some(2) => (width, height),
        Some(1) | Some(3) => (height, width),
        _ => {
            let (sin, cos) = sin_cos_degrees(degrees);
            let (sin, cos) = (sin.abs(), cos.abs());
            (width * cos + height * sin, width * sin + height * cos)
        }
    }
}

/// Axis-aligned bounding box of `rect` after rotating it around the origin by `degrees`
pub fn rotate_rect(rect: &Rect, degrees: f64) -> Rect {
    Rect::bounding_points(rect.corners().map(|c| rotate_point(c, degrees)))
        .expect("a rectangle has four corners")
}
