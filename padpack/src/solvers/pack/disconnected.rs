use std::sync::Arc;

use itertools::Itertools;
use log::warn;
use ordered_float::OrderedFloat;

use crate::entities::{Component, DisconnectedPackDirection, PlacedComponent};
use crate::geometry::outline::outline_edges;
use crate::geometry::primitives::Point;
use crate::solvers::pack::candidates::Evaluator;
use crate::solvers::pack::outlines::center_exclusion_outlines;
use crate::util::PackSolverConfig;

/// Outcome of placing a component that shares no network with the placed components
#[derive(Clone, Debug)]
pub enum DisconnectedPlacement {
    /// First candidate, in order of preference, that violates nothing
    Clear(PlacedComponent),
    /// Every candidate was rejected, this is the most preferred one inside the bounds
    Fallback(PlacedComponent),
}

/// Reference point of the placed components: the centroid of their centers
pub fn placed_centroid(placed: &[PlacedComponent]) -> Point {
    match placed.len() {
        0 => Point::ORIGIN,
        n => {
            let sum = placed.iter().fold(Point::ORIGIN, |acc, pc| acc + pc.center());
            sum * (1.0 / n as f64)
        }
    }
}

/// Sort key ordering candidate centers by preference, lowest first.
/// Ties are broken by the distance to the reference point.
fn preference_key(
    direction: DisconnectedPackDirection,
    reference: Point,
    p: Point,
) -> (OrderedFloat<f64>, OrderedFloat<f64>) {
    let dist = OrderedFloat(p.distance(&reference));
    let primary = match direction {
        DisconnectedPackDirection::Left => p.0,
        DisconnectedPackDirection::Right => -p.0,
        DisconnectedPackDirection::Down => p.1,
        DisconnectedPackDirection::Up => -p.1,
        DisconnectedPackDirection::NearestToCenter => dist.0,
    };
    (OrderedFloat(primary), dist)
}

/// Candidate centers of `component` in every rotation, sampled along the boundary of the region
/// its center must stay out of, ordered by preference.
///
/// If the placed components occupy no space at all, a grid around the reference point is sampled instead.
pub fn disconnected_candidates(
    component: &Component,
    placed: &[PlacedComponent],
    min_gap: f64,
    direction: DisconnectedPackDirection,
    config: &PackSolverConfig,
) -> Vec<(Point, f64)> {
    let reference = placed_centroid(placed);
    let n_samples = config.disconnected_samples_per_edge.max(1);
    let mut candidates = vec![];
    for &rotation in component.rotations() {
        let footprint = component.footprint(rotation);
        let outlines = center_exclusion_outlines(placed, &footprint, min_gap);
        if outlines.is_empty() {
            let spacing = footprint.span() + min_gap;
            let n = config.grid_fallback_steps as isize;
            for (i, j) in (-n..=n).cartesian_product(-n..=n) {
                let p = reference + Point(i as f64 * spacing, j as f64 * spacing);
                candidates.push((p, rotation));
            }
        } else {
            for edge in outline_edges(&outlines) {
                for k in 0..n_samples {
                    let t = k as f64 / n_samples as f64;
                    candidates.push((edge.point_at(t), rotation));
                }
            }
        }
    }
    candidates
        .into_iter()
        .sorted_by_cached_key(|(p, _)| preference_key(direction, reference, *p))
        .collect_vec()
}

/// Places a component without shared networks at the most preferred candidate that violates nothing.
/// If `allow_fallback`, the most preferred candidate inside the bounds is returned when every candidate is rejected.
/// Candidates outside the bounds are never returned.
pub fn place_disconnected(
    component: &Arc<Component>,
    evaluator: &Evaluator,
    direction: DisconnectedPackDirection,
    config: &PackSolverConfig,
    allow_fallback: bool,
) -> Option<DisconnectedPlacement> {
    let candidates = disconnected_candidates(
        component,
        evaluator.placed,
        evaluator.min_gap,
        direction,
        config,
    );
    select_disconnected(component, &candidates, evaluator, allow_fallback)
}

/// Picks from `candidates`, ordered by preference, the first one that passes the evaluator.
/// Overlaps are tolerated by the fallback, leaving the bounds is not.
pub fn select_disconnected(
    component: &Arc<Component>,
    candidates: &[(Point, f64)],
    evaluator: &Evaluator,
    allow_fallback: bool,
) -> Option<DisconnectedPlacement> {
    let mut placements = candidates
        .iter()
        .map(|&(center, rotation)| PlacedComponent::new(component.clone(), center, rotation));
    if let Some(pc) = placements.clone().find(|pc| evaluator.check(pc).is_ok()) {
        return Some(DisconnectedPlacement::Clear(pc));
    }
    if !allow_fallback {
        return None;
    }
    let fallback = placements.find(|pc| evaluator.within_bounds(pc))?;
    warn!(
        "[PACK] every candidate for {} is rejected, falling back to ({:.3}, {:.3})",
        component.component_id,
        fallback.center().0,
        fallback.center().1
    );
    Some(DisconnectedPlacement::Fallback(fallback))
}
