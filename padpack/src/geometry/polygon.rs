use crate::geometry::primitives::{Edge, Point};

/// Even–odd containment test of `point` against an unordered set of edges.
///
/// A horizontal ray is cast towards +x and every edge crossing it is counted.
/// Edges are treated half-open in y (`y_min <= y < y_max`) so that vertices are never counted twice.
pub fn point_in_outlines<'a>(point: Point, edges: impl IntoIterator<Item = &'a Edge>) -> bool {
    let Point(px, py) = point;
    let mut inside = false;
    for edge in edges {
        let (Point(x1, y1), Point(x2, y2)) = (edge.start, edge.end);
        if (y1 <= py) == (y2 <= py) {
            //horizontal edges and edges entirely above or below the ray
            continue;
        }
        let x_cross = x1 + (py - y1) * (x2 - x1) / (y2 - y1);
        if x_cross > px {
            inside = !inside;
        }
    }
    inside
}

/// Signed area of a closed loop of edges (shoelace formula), positive for counter-clockwise loops
pub fn signed_area(edges: &[Edge]) -> f64 {
    edges
        .iter()
        .map(|e| e.start.0 * e.end.1 - e.end.0 * e.start.1)
        .sum::<f64>()
        / 2.0
}
