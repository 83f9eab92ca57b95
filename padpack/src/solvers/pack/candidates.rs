use std::fmt::{Display, Formatter};

use itertools::Itertools;

use crate::collision::{CLEARANCE_TOLERANCE, OverlapReport, find_overlap};
use crate::entities::{DistanceMode, PlacedComponent};
use crate::geometry::primitives::{Edge, Point, Rect};
use crate::util::RefinementConfig;

/// Directions tried by the local refinement, the four axes followed by the four diagonals
const REFINEMENT_DIRECTIONS: [Point; 8] = [
    Point(1.0, 0.0),
    Point(-1.0, 0.0),
    Point(0.0, 1.0),
    Point(0.0, -1.0),
    Point(std::f64::consts::FRAC_1_SQRT_2, std::f64::consts::FRAC_1_SQRT_2),
    Point(-std::f64::consts::FRAC_1_SQRT_2, std::f64::consts::FRAC_1_SQRT_2),
    Point(std::f64::consts::FRAC_1_SQRT_2, -std::f64::consts::FRAC_1_SQRT_2),
    Point(-std::f64::consts::FRAC_1_SQRT_2, -std::f64::consts::FRAC_1_SQRT_2),
];

/// Point on an outline where a pad of the given network could be anchored
#[derive(Clone, Debug, PartialEq)]
pub struct CandidatePoint {
    pub point: Point,
    /// Network of the pads that may be anchored at the point, `None` for any shared network
    pub network: Option<String>,
    /// Summed (squared) distance from the point to the placed pads of the network
    pub cost: f64,
}

/// A feasible placement of the component being packed
#[derive(Clone, Debug)]
pub struct Candidate {
    pub placed: PlacedComponent,
    pub cost: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub enum RejectReason {
    OutOfBounds,
    Overlap(OverlapReport),
    Infeasible(String),
}

impl Display for RejectReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            RejectReason::OutOfBounds => write!(f, "outside of bounds"),
            RejectReason::Overlap(report) => write!(f, "overlap: {report}"),
            RejectReason::Infeasible(msg) => write!(f, "infeasible: {msg}"),
        }
    }
}

/// A candidate placement that was evaluated and discarded, kept for diagnostics
#[derive(Clone, Debug, PartialEq)]
pub struct RejectedCandidate {
    pub center: Point,
    pub rotation: f64,
    pub reason: RejectReason,
}

/// Absolute centers of every placed pad in `network_id`
pub fn network_targets(placed: &[PlacedComponent], network_id: &str) -> Vec<Point> {
    placed
        .iter()
        .flat_map(|pc| pc.pads())
        .filter(|p| p.network_id == network_id)
        .map(|p| p.absolute_center)
        .collect_vec()
}

/// Summed (squared) distance from `point` to every target
pub fn point_cost(point: Point, targets: &[Point], mode: DistanceMode) -> f64 {
    targets.iter().map(|t| mode.apply(point.distance(t))).sum()
}

/// Connection cost of a placement: for every pad sharing a network with a placed pad,
/// the (squared) distance to the nearest placed pad of that network.
///
/// This ranks the final candidates of a component. The candidate searches themselves minimize
/// [`point_cost`], the sum over every placed pad of the network, so a candidate point that is optimal
/// for the search is not necessarily the one with the lowest connection cost.
pub fn connection_cost(pc: &PlacedComponent, placed: &[PlacedComponent], mode: DistanceMode) -> f64 {
    pc.pads()
        .iter()
        .filter_map(|pad| {
            placed
                .iter()
                .flat_map(|other| other.pads())
                .filter(|other| other.network_id == pad.network_id)
                .map(|other| pad.absolute_center.distance(&other.absolute_center))
                .min_by(f64::total_cmp)
        })
        .map(|d| mode.apply(d))
        .sum()
}

/// Ternary search along `edge` for the point minimizing the summed distance to `targets`.
/// The summed distance is convex along a line, so the search converges to the global minimum of the edge.
pub fn ternary_search_edge(
    edge: &Edge,
    targets: &[Point],
    mode: DistanceMode,
    iterations: usize,
) -> CandidatePoint {
    let cost = |t: f64| point_cost(edge.point_at(t), targets, mode);
    let (mut lo, mut hi) = (0.0, 1.0);
    for _ in 0..iterations {
        let m1 = lo + (hi - lo) / 3.0;
        let m2 = hi - (hi - lo) / 3.0;
        if cost(m1) < cost(m2) {
            hi = m2;
        } else {
            lo = m1;
        }
    }
    let point = edge.point_at((lo + hi) / 2.0);
    CandidatePoint {
        point,
        network: None,
        cost: point_cost(point, targets, mode),
    }
}

/// Points at fixed fractions along `edge`
pub fn sample_edge(
    edge: &Edge,
    fractions: &[f64],
    targets: &[Point],
    mode: DistanceMode,
) -> Vec<CandidatePoint> {
    fractions
        .iter()
        .map(|&t| {
            let point = edge.point_at(t.clamp(0.0, 1.0));
            CandidatePoint {
                point,
                network: None,
                cost: point_cost(point, targets, mode),
            }
        })
        .collect_vec()
}

/// Retains the points within `tolerance` of the lowest cost
pub fn best_points(points: Vec<CandidatePoint>, tolerance: f64) -> Vec<CandidatePoint> {
    let Some(min_cost) = points.iter().map(|p| p.cost).min_by(f64::total_cmp) else {
        return vec![];
    };
    points
        .into_iter()
        .filter(|p| p.cost <= min_cost + tolerance)
        .collect_vec()
}

/// Context in which candidate placements of a single component are evaluated
pub struct Evaluator<'a> {
    pub placed: &'a [PlacedComponent],
    pub min_gap: f64,
    pub bounds: Option<Rect>,
    pub mode: DistanceMode,
    pub refinement: &'a RefinementConfig,
    /// Distance of the first refinement nudge
    pub initial_step: f64,
}

impl Evaluator<'_> {
    /// Checks a placement against the bounds and the placed components, without refinement
    pub fn check(&self, pc: &PlacedComponent) -> Result<(), RejectReason> {
        if !self.within_bounds(pc) {
            return Err(RejectReason::OutOfBounds);
        }
        match find_overlap(pc, self.placed, self.min_gap) {
            Some(report) => Err(RejectReason::Overlap(report)),
            None => Ok(()),
        }
    }

    /// Whether the footprint of a placement lies inside the bounds, if any
    pub fn within_bounds(&self, pc: &PlacedComponent) -> bool {
        self.bounds
            .is_none_or(|b| b.contains_rect(&pc.footprint(), CLEARANCE_TOLERANCE))
    }

    /// Checks a placement and, if feasible, refines it and determines its cost
    pub fn evaluate(&self, pc: PlacedComponent) -> Result<Candidate, RejectedCandidate> {
        match self.check(&pc) {
            Ok(()) => Ok(self.refine(pc)),
            Err(reason) => Err(RejectedCandidate {
                center: pc.center(),
                rotation: pc.rotation(),
                reason,
            }),
        }
    }

    /// Nudges a feasible placement in eight directions as long as it lowers the connection cost,
    /// halving the nudge distance whenever no direction improves.
    /// Every trial position is checked again, the result never drifts beyond the maximum radius.
    pub fn refine(&self, pc: PlacedComponent) -> Candidate {
        let origin = pc.center();
        let mut best_cost = connection_cost(&pc, self.placed, self.mode);
        let mut best = pc;
        let mut step = self.initial_step;
        let mut rounds = 0;
        while step >= self.refinement.min_step && rounds < self.refinement.max_rounds {
            rounds += 1;
            let improvement = REFINEMENT_DIRECTIONS
                .iter()
                .map(|d| best.center() + *d * step)
                .filter(|c| c.distance(&origin) <= self.refinement.max_radius)
                .map(|c| best.moved_to(c))
                .filter(|trial| self.check(trial).is_ok())
                .map(|trial| {
                    let cost = connection_cost(&trial, self.placed, self.mode);
                    (trial, cost)
                })
                .min_by(|(_, c1), (_, c2)| c1.total_cmp(c2))
                .filter(|(_, cost)| *cost < best_cost);
            match improvement {
                Some((trial, cost)) => {
                    best = trial;
                    best_cost = cost;
                }
                None => step /= 2.0,
            }
        }
        Candidate {
            placed: best,
            cost: best_cost,
        }
    }
}
