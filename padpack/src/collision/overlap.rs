use std::fmt::{Display, Formatter};

use crate::entities::PlacedComponent;
use crate::geometry::geo_traits::DistanceTo;
use crate::geometry::primitives::Rect;

/// Clearances are allowed to fall short of the required gap by this much,
/// so that components placed flush against an outline are not rejected due to rounding.
pub const CLEARANCE_TOLERANCE: f64 = 1e-6;

/// Which shape of a component was involved in an overlap
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShapeKind {
    Pad(usize),
    Body,
}

/// Details of the first conflict found between a candidate and a placed component
#[derive(Clone, Debug, PartialEq)]
pub struct OverlapReport {
    /// Index of the conflicting component in the placed list
    pub placed_idx: usize,
    pub candidate_shape: ShapeKind,
    pub placed_shape: ShapeKind,
    /// Euclidean distance between the two shapes, 0 if they intersect
    pub clearance: f64,
}

impl Display for OverlapReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:?} conflicts with {:?} of placed component #{} (clearance {:.4})",
            self.candidate_shape, self.placed_shape, self.placed_idx, self.clearance
        )
    }
}

/// Two rectangles conflict if they intersect, or if they are separated by less than `min_gap`
/// along every axis on which they do not overlap.
#[inline(always)]
pub fn rects_conflict(a: &Rect, b: &Rect, min_gap: f64) -> bool {
    a.gap_to(b) < min_gap - CLEARANCE_TOLERANCE
}

fn tagged_shapes(pc: &PlacedComponent) -> impl Iterator<Item = (ShapeKind, Rect)> + '_ {
    pc.pads()
        .iter()
        .enumerate()
        .map(|(i, p)| (ShapeKind::Pad(i), p.bounds()))
        .chain(pc.body_bounds().map(|b| (ShapeKind::Body, b)))
}

/// Checks `candidate` against every placed component.
/// Pads and bodies are checked pairwise (pad-pad, body-body and body-pad),
/// since a body can extend well beyond the pads of its component.
pub fn find_overlap(
    candidate: &PlacedComponent,
    placed: &[PlacedComponent],
    min_gap: f64,
) -> Option<OverlapReport> {
    let cand_fp = candidate.footprint();
    for (placed_idx, other) in placed.iter().enumerate() {
        if !rects_conflict(&cand_fp, &other.footprint(), min_gap) {
            //footprints are clear of each other, so are all shapes within
            continue;
        }
        for (candidate_shape, c_rect) in tagged_shapes(candidate) {
            for (placed_shape, p_rect) in tagged_shapes(other) {
                if rects_conflict(&c_rect, &p_rect, min_gap) {
                    return Some(OverlapReport {
                        placed_idx,
                        candidate_shape,
                        placed_shape,
                        clearance: c_rect.distance_to(&p_rect),
                    });
                }
            }
        }
    }
    None
}

/// `true` if `candidate` violates the clearance to any of the `placed` components
pub fn component_overlaps(
    candidate: &PlacedComponent,
    placed: &[PlacedComponent],
    min_gap: f64,
) -> bool {
    find_overlap(candidate, placed, min_gap).is_some()
}
