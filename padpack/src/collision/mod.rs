mod overlap;

#[doc(inline)]
pub use overlap::{
    CLEARANCE_TOLERANCE, OverlapReport, ShapeKind, component_overlaps, find_overlap,
    rects_conflict,
};
