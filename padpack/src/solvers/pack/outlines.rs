use itertools::Itertools;

use crate::entities::PlacedComponent;
use crate::geometry::outline::{Outline, construct_outlines};
use crate::geometry::primitives::Rect;

/// Outlines of the union of every pad and body of the placed components, each inflated by `margin`
pub fn outlines_of_placed(placed: &[PlacedComponent], margin: f64) -> Vec<Outline> {
    let rects = placed
        .iter()
        .flat_map(|pc| pc.shape_rects())
        .filter_map(|r| r.inflate(margin))
        .collect_vec();
    construct_outlines(&rects)
}

/// Outlines of the region in which the center of a component with the given (local) `footprint`
/// would violate `min_gap` to one of the placed components.
///
/// Every shape is grown by the gap plus the extents of the footprint on the opposite side,
/// so a center anywhere on the resulting outline keeps the footprint exactly `min_gap` away.
pub fn center_exclusion_outlines(
    placed: &[PlacedComponent],
    footprint: &Rect,
    min_gap: f64,
) -> Vec<Outline> {
    let rects = placed
        .iter()
        .flat_map(|pc| pc.shape_rects())
        .map(|r| Rect {
            x_min: r.x_min - min_gap - footprint.x_max,
            y_min: r.y_min - min_gap - footprint.y_max,
            x_max: r.x_max + min_gap - footprint.x_min,
            y_max: r.y_max + min_gap - footprint.y_min,
        })
        .collect_vec();
    construct_outlines(&rects)
}
