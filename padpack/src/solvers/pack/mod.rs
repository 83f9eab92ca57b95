//! Incremental placement of all components of a [`PackInput`], one component per cycle.

mod candidates;
mod disconnected;
mod order;
mod outlines;

use std::collections::VecDeque;
use std::rc::Rc;
use std::sync::Arc;

use anyhow::{Result, bail};
use itertools::Itertools;
use log::{debug, info, warn};

#[doc(inline)]
pub use candidates::{
    Candidate, CandidatePoint, Evaluator, RejectReason, RejectedCandidate, best_points,
    connection_cost, network_targets, point_cost, sample_edge, ternary_search_edge,
};
#[doc(inline)]
pub use disconnected::{
    DisconnectedPlacement, disconnected_candidates, place_disconnected, select_disconnected,
};
#[doc(inline)]
pub use order::pack_order;
#[doc(inline)]
pub use outlines::{center_exclusion_outlines, outlines_of_placed};

use crate::entities::{Component, PackInput, PackOutput, PlacedComponent};
use crate::geometry::outline::{Outline, outline_edges};
use crate::geometry::primitives::{Edge, Point};
use crate::geometry::rotation::rotate_point;
use crate::solvers::irls::OffsetTargets;
use crate::solvers::segment_candidate::SegmentCandidateSolver;
use crate::solvers::{Solver, SolverState};
use crate::util::{PackSolverConfig, Visualization, assertions};

/// Phase of the [`PackSolver`] within the cycle of placing a single component
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PackPhase {
    /// Waiting to pick up the next component
    Idle,
    /// Searching the outline of the placed components for candidate points, one segment per step
    ShowCandidatePoints,
    /// Evaluating the candidate points, one rotation per step
    ShowRotations,
    /// Committing the best candidate
    ShowFinalPlacement,
}

/// State of the component currently being placed
struct ComponentJob {
    component: Arc<Component>,
    /// Networks of the component shared with at least one placed component
    shared_networks: Vec<String>,
    /// Outlines of the placed components, inflated so that a pad centered on them is clear
    pad_outlines: Vec<Outline>,
    /// Outlines of the placed components, inflated by the minimum gap
    body_outlines: Rc<Vec<Outline>>,
    pad_edges: Vec<Edge>,
    edge_cursor: usize,
    rotation_cursor: usize,
    searched_points: Vec<CandidatePoint>,
    sampled_points: Vec<CandidatePoint>,
    candidate_points: Vec<CandidatePoint>,
    best: Option<Candidate>,
    rejected: Vec<RejectedCandidate>,
    last_segment_solver: Option<SegmentCandidateSolver>,
}

/// Places the components of a [`PackInput`] one at a time, each as close as possible
/// to the already placed pads of its networks, without violating the minimum gap.
pub struct PackSolver {
    state: SolverState,
    input: PackInput,
    config: PackSolverConfig,
    queue: VecDeque<usize>,
    placed: Vec<PlacedComponent>,
    phase: PackPhase,
    job: Option<ComponentJob>,
    sub_solver_iterations: usize,
    n_rejected: usize,
}

impl PackSolver {
    pub fn new(input: PackInput, config: PackSolverConfig) -> Self {
        let queue: VecDeque<usize> = pack_order(&input).into();
        PackSolver {
            state: SolverState::new(config.max_iterations),
            input,
            config,
            queue,
            placed: vec![],
            phase: PackPhase::Idle,
            job: None,
            sub_solver_iterations: 0,
            n_rejected: 0,
        }
    }

    pub fn phase(&self) -> PackPhase {
        self.phase
    }

    /// Components placed so far, in placement order
    pub fn placed(&self) -> &[PlacedComponent] {
        &self.placed
    }

    /// Snapshot of the placement so far
    pub fn output(&self) -> PackOutput {
        PackOutput {
            input: self.input.clone(),
            placed: self.placed.clone(),
            iterations: self.state.iterations + self.sub_solver_iterations,
            n_rejected_candidates: self.n_rejected,
        }
    }

    fn evaluator(&self) -> Evaluator<'_> {
        let max_half_size = self
            .job
            .as_ref()
            .map_or(0.0, |job| job.component.max_pad_half_size());
        Evaluator {
            placed: &self.placed,
            min_gap: self.input.min_gap,
            bounds: self.input.bounds,
            mode: self.input.placement_strategy.distance_mode(),
            refinement: &self.config.refinement,
            initial_step: self.config.refinement.initial_step_fraction
                * (self.input.min_gap + max_half_size),
        }
    }

    fn commit(&mut self, pc: PlacedComponent, overlap_free: bool) {
        info!(
            "[PACK] placed {} ({}/{}) at ({:.3}, {:.3}) rotated {}°",
            pc.component_id(),
            self.placed.len() + 1,
            self.input.components.len(),
            pc.center().0,
            pc.center().1,
            pc.rotation()
        );
        self.placed.push(pc);
        debug_assert!(self.placed.iter().all(assertions::pads_are_consistent));
        debug_assert!(
            !overlap_free || assertions::placement_is_overlap_free(&self.placed, self.input.min_gap)
        );
    }

    fn place_first(&mut self, component: Arc<Component>) {
        let rotation = component.rotations()[0];
        let mut pc = PlacedComponent::new(component, Point::ORIGIN, rotation);
        if let Some(bounds) = self.input.bounds {
            if self.evaluator().check(&pc).is_err() {
                pc.set_center(bounds.centroid());
            }
        }
        let verdict = self.evaluator().check(&pc);
        match verdict {
            Ok(()) => self.commit(pc, true),
            Err(reason) => self.state.mark_failed(format!(
                "nowhere to fit: {} ({reason})",
                pc.component_id()
            )),
        }
    }

    /// Picks up the next component in the queue and starts the cycle to place it
    fn start_next(&mut self) {
        let Some(idx) = self.queue.pop_front() else {
            info!(
                "[PACK] finished, placed {} components ({} candidates rejected)",
                self.placed.len(),
                self.n_rejected
            );
            self.state.mark_solved();
            return;
        };
        let component = self.input.component(idx).clone();
        if self.placed.is_empty() {
            self.place_first(component);
            return;
        }

        let shared_networks = component
            .networks()
            .into_iter()
            .filter(|n| self.placed.iter().any(|pc| pc.has_network(n)))
            .map(str::to_string)
            .collect_vec();

        if shared_networks.is_empty() {
            debug!(
                "[PACK] {} shares no network with the placed components",
                component.component_id
            );
            let component_id = component.component_id.clone();
            self.job = Some(self.new_job(component, shared_networks));
            if !self.place_disconnected(true) {
                self.state
                    .mark_failed(format!("no valid candidates found for {component_id}"));
            }
            return;
        }

        let job = self.new_job(component, shared_networks);
        debug!(
            "[PACK] searching {} outline segments for {}",
            job.pad_edges.len(),
            job.component.component_id
        );
        self.job = Some(job);
        self.phase = PackPhase::ShowCandidatePoints;
    }

    fn new_job(&self, component: Arc<Component>, shared_networks: Vec<String>) -> ComponentJob {
        let min_gap = self.input.min_gap;
        let pad_outlines =
            outlines_of_placed(&self.placed, min_gap + component.max_pad_half_size());
        let body_outlines = Rc::new(outlines_of_placed(&self.placed, min_gap));
        let pad_edges = outline_edges(&pad_outlines).copied().collect_vec();
        ComponentJob {
            component,
            shared_networks,
            pad_outlines,
            body_outlines,
            pad_edges,
            edge_cursor: 0,
            rotation_cursor: 0,
            searched_points: vec![],
            sampled_points: vec![],
            candidate_points: vec![],
            best: None,
            rejected: vec![],
            last_segment_solver: None,
        }
    }

    /// Places the current component with the disconnected heuristic and ends its cycle.
    /// Returns `false` if no placement was found.
    fn place_disconnected(&mut self, allow_fallback: bool) -> bool {
        let Some(component) = self.job.as_ref().map(|j| j.component.clone()) else {
            return false;
        };
        let placement = place_disconnected(
            &component,
            &self.evaluator(),
            self.input.disconnected_direction,
            &self.config,
            allow_fallback,
        );
        self.phase = PackPhase::Idle;
        match placement {
            Some(DisconnectedPlacement::Clear(pc)) => {
                self.commit(pc, true);
                true
            }
            Some(DisconnectedPlacement::Fallback(pc)) => {
                self.commit(pc, false);
                true
            }
            None => false,
        }
    }

    /// Searches one outline segment for the points closest to every shared network
    fn search_segment(&mut self) {
        let placed = &self.placed;
        let mode = self.input.placement_strategy.distance_mode();
        let config = &self.config;
        let Some(job) = self.job.as_mut() else {
            return;
        };
        let Some(edge) = job.pad_edges.get(job.edge_cursor).copied() else {
            return;
        };
        job.edge_cursor += 1;
        for network in &job.shared_networks {
            let targets = network_targets(placed, network);
            let searched =
                ternary_search_edge(&edge, &targets, mode, config.ternary_search_iterations);
            job.searched_points.push(CandidatePoint {
                network: Some(network.clone()),
                ..searched
            });
            job.sampled_points.extend(
                sample_edge(&edge, &config.segment_sample_fractions, &targets, mode)
                    .into_iter()
                    .map(|p| CandidatePoint {
                        network: Some(network.clone()),
                        ..p
                    }),
            );
        }
    }

    /// Retains the best searched points per network, together with every sampled point
    fn collect_candidate_points(&mut self) {
        let tolerance = self.config.best_point_tolerance;
        let Some(job) = self.job.as_mut() else {
            return;
        };
        let searched = std::mem::take(&mut job.searched_points);
        let sampled = std::mem::take(&mut job.sampled_points);
        let best = searched
            .into_iter()
            .into_group_map_by(|p| p.network.clone())
            .into_iter()
            .sorted_by(|(a, _), (b, _)| a.cmp(b))
            .flat_map(|(_, points)| best_points(points, tolerance));
        job.candidate_points = best
            .chain(sampled)
            .unique_by(|p| (p.point, p.network.clone()))
            .collect_vec();
        debug!(
            "[PACK] {} candidate points for {}",
            job.candidate_points.len(),
            job.component.component_id
        );
    }

    /// Evaluates every candidate point, and optimizes every body outline segment, for one rotation
    fn evaluate_rotation(&mut self) -> Result<()> {
        let Some(job) = self.job.as_ref() else {
            bail!("evaluating rotations without a component");
        };
        let component = job.component.clone();
        let rotation = component.rotations()[job.rotation_cursor];
        let evaluator = self.evaluator();
        let mut accepted = vec![];
        let mut rejected = vec![];

        for cp in &job.candidate_points {
            let anchors = component
                .pads
                .iter()
                .filter(|pad| match &cp.network {
                    Some(n) => &pad.network_id == n,
                    None => job.shared_networks.contains(&pad.network_id),
                });
            for pad in anchors {
                let center = cp.point - rotate_point(pad.offset, rotation);
                let pc = PlacedComponent::new(component.clone(), center, rotation);
                match evaluator.evaluate(pc) {
                    Ok(candidate) => accepted.push(candidate),
                    Err(r) => rejected.push(r),
                }
            }
        }

        let mut sub_iterations = 0;
        let mut last_solver = None;
        if let Some(optimizer) = self.input.placement_strategy.optimizer() {
            let groups = component
                .pads
                .iter()
                .filter(|pad| job.shared_networks.contains(&pad.network_id))
                .map(|pad| {
                    OffsetTargets::new(
                        rotate_point(pad.offset, rotation),
                        network_targets(&self.placed, &pad.network_id),
                    )
                })
                .collect_vec();
            for edge in outline_edges(&job.body_outlines) {
                let mut solver = SegmentCandidateSolver::new(
                    *edge,
                    job.body_outlines.clone(),
                    component.footprint(rotation),
                    groups.clone(),
                    optimizer,
                    self.config.optimizer,
                    self.input.min_gap,
                    self.input.bounds,
                );
                if let Err(e) = solver.solve() {
                    debug!("[SEG] segment solver aborted: {e:#}");
                }
                sub_iterations += solver.iterations();
                match (solver.optimal_position(), solver.error()) {
                    (Some(center), None) => {
                        let pc = PlacedComponent::new(component.clone(), center, rotation);
                        match evaluator.evaluate(pc) {
                            Ok(candidate) => accepted.push(candidate),
                            Err(r) => rejected.push(r),
                        }
                    }
                    (_, err) => {
                        let msg = err.unwrap_or("no position found").to_string();
                        debug!("[SEG] segment rejected for {}: {msg}", component.component_id);
                        rejected.push(RejectedCandidate {
                            center: edge.centroid(),
                            rotation,
                            reason: RejectReason::Infeasible(msg),
                        });
                    }
                }
                last_solver = Some(solver);
            }
        }

        let best_of_rotation = accepted
            .into_iter()
            .min_by(|a, b| a.cost.total_cmp(&b.cost));
        debug!(
            "[PACK] rotation {}° of {}: best cost {:?}, {} rejected",
            rotation,
            component.component_id,
            best_of_rotation.as_ref().map(|c| c.cost),
            rejected.len()
        );

        self.sub_solver_iterations += sub_iterations;
        self.n_rejected += rejected.len();
        let Some(job) = self.job.as_mut() else {
            bail!("component job vanished during evaluation");
        };
        job.rejected.extend(rejected);
        if last_solver.is_some() {
            job.last_segment_solver = last_solver;
        }
        if let Some(candidate) = best_of_rotation {
            if job.best.as_ref().is_none_or(|b| candidate.cost < b.cost) {
                job.best = Some(candidate);
            }
        }
        job.rotation_cursor += 1;
        Ok(())
    }

    /// Commits the best candidate of the current component, or falls back to the disconnected heuristic
    fn finalize(&mut self) {
        let Some(job) = self.job.as_mut() else {
            self.phase = PackPhase::Idle;
            return;
        };
        let component_id = job.component.component_id.clone();
        match job.best.take() {
            Some(best) => {
                debug!("[PACK] best candidate for {component_id} costs {:.4}", best.cost);
                self.phase = PackPhase::Idle;
                self.commit(best.placed, true);
            }
            None => {
                warn!(
                    "[PACK] all {} candidates for {component_id} rejected, trying disconnected placement",
                    job.rejected.len()
                );
                if !self.place_disconnected(false) {
                    self.state
                        .mark_failed(format!("no valid candidates found for {component_id}"));
                }
            }
        }
    }
}

impl Solver for PackSolver {
    fn name(&self) -> &'static str {
        "PackSolver"
    }

    fn state(&self) -> &SolverState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut SolverState {
        &mut self.state
    }

    fn setup_impl(&mut self) -> Result<()> {
        info!(
            "[PACK] packing {} components (order: {:?}, placement: {:?}, min gap: {})",
            self.input.components.len(),
            self.input.order_strategy,
            self.input.placement_strategy,
            self.input.min_gap
        );
        Ok(())
    }

    fn step_impl(&mut self) -> Result<()> {
        match self.phase {
            PackPhase::Idle => self.start_next(),
            PackPhase::ShowCandidatePoints => {
                self.search_segment();
                if self.job.as_ref().is_none_or(|j| j.edge_cursor >= j.pad_edges.len()) {
                    self.collect_candidate_points();
                    self.phase = PackPhase::ShowRotations;
                }
            }
            PackPhase::ShowRotations => {
                self.evaluate_rotation()?;
                let done = self
                    .job
                    .as_ref()
                    .is_none_or(|j| j.rotation_cursor >= j.component.rotations().len());
                if done {
                    self.phase = PackPhase::ShowFinalPlacement;
                }
            }
            PackPhase::ShowFinalPlacement => self.finalize(),
        }
        Ok(())
    }

    fn active_sub_solver(&self) -> Option<&dyn Solver> {
        self.job
            .as_ref()
            .and_then(|j| j.last_segment_solver.as_ref())
            .map(|s| s as &dyn Solver)
    }

    fn visualize(&self) -> Visualization {
        let mut vis = Visualization::with_title(format!("{} ({:?})", self.name(), self.phase));
        for pc in &self.placed {
            draw_placed_component(&mut vis, pc, "rgba(120,120,120,0.5)");
        }
        if let Some(job) = &self.job {
            for e in outline_edges(&job.pad_outlines) {
                vis.add_edge(e, "orange", true);
            }
            for e in outline_edges(&job.body_outlines) {
                vis.add_edge(e, "black", false);
            }
            for cp in &job.candidate_points {
                vis.add_point(cp.point, "purple", None);
            }
            for r in &job.rejected {
                vis.add_point(r.center, "red", None);
            }
            if let Some(best) = &job.best {
                draw_placed_component(&mut vis, &best.placed, "rgba(0,160,0,0.6)");
            }
        }
        vis
    }
}

fn draw_placed_component(vis: &mut Visualization, pc: &PlacedComponent, pad_fill: &str) {
    if let Some(body) = pc.body_bounds() {
        vis.add_rect(&body, None, Some("black"), None);
    }
    for pad in pc.pads() {
        vis.add_rect(&pad.bounds(), Some(pad_fill), None, None);
    }
    vis.add_label(pc.center(), pc.component_id());
}

/// Packs every component of `input` and returns the result.
/// Fails if the solver fails, the partial result is lost in that case, use [`PackSolver`] directly to retain it.
pub fn pack(input: PackInput, config: PackSolverConfig) -> Result<PackOutput> {
    let mut solver = PackSolver::new(input, config);
    solver.solve()?;
    match solver.error() {
        Some(err) => bail!("packing failed after {} components: {err}", solver.placed().len()),
        None => Ok(solver.output()),
    }
}
