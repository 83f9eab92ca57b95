use log::error;

use crate::collision::{component_overlaps, find_overlap};
use crate::entities::PlacedComponent;
use crate::geometry::rotation::{rotate_extents, rotate_point};
use crate::util::FPA;

/// Checks that no two placed components violate the minimum gap.
pub fn placement_is_overlap_free(placed: &[PlacedComponent], min_gap: f64) -> bool {
    let offender = (1..placed.len())
        .find(|&j| component_overlaps(&placed[j], &placed[..j], min_gap));
    match offender {
        None => true,
        Some(j) => {
            if let Some(report) = find_overlap(&placed[j], &placed[..j], min_gap) {
                error!(
                    "{} overlaps with {}: {}",
                    placed[j].component_id(),
                    placed[report.placed_idx].component_id(),
                    report
                );
            }
            false
        }
    }
}

/// Checks that the derived pad state of a placed component matches its center and rotation.
pub fn pads_are_consistent(pc: &PlacedComponent) -> bool {
    pc.component()
        .pads
        .iter()
        .zip(pc.pads())
        .all(|(pad, placed_pad)| {
            let expected_center = pc.center() + rotate_point(pad.offset, pc.rotation());
            let (w, h) = rotate_extents(pad.width, pad.height, pc.rotation());
            FPA(placed_pad.absolute_center.0) == FPA(expected_center.0)
                && FPA(placed_pad.absolute_center.1) == FPA(expected_center.1)
                && FPA(placed_pad.width) == FPA(w)
                && FPA(placed_pad.height) == FPA(h)
        })
        && pc.component().pads.len() == pc.pads().len()
}
