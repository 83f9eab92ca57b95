//! Candidate placement of a component flush against one segment of an outline.

use std::rc::Rc;

use anyhow::{Result, bail};
use log::debug;

use crate::entities::{DistanceMode, OptimizerKind};
use crate::geometry::geo_traits::Translatable;
use crate::geometry::outline::{Outline, outline_edges, outlines_bbox};
use crate::geometry::polygon::point_in_outlines;
use crate::geometry::primitives::{Edge, Point, Rect};
use crate::solvers::irls::{
    Constraint, MultiOffsetIrlsSolver, OffsetTargets, TwoPhaseIrlsSolver, total_cost,
};
use crate::solvers::largest_rect::LargestRectSolver;
use crate::solvers::{Solver, SolverState};
use crate::util::{IrlsConfig, Visualization};

/// Distance from a segment's midpoint used to test which side of it is free
pub const OUTWARD_TEST_DISTANCE: f64 = 1e-3;

/// Iteration ceiling of the segment solver, each step advances the nested optimizer by one iteration
const MAX_ITERATIONS: usize = 1_000;

enum Optimizer {
    MultiOffset(MultiOffsetIrlsSolver),
    TwoPhase(TwoPhaseIrlsSolver),
}

impl Optimizer {
    fn as_solver(&self) -> &dyn Solver {
        match self {
            Optimizer::MultiOffset(s) => s,
            Optimizer::TwoPhase(s) => s,
        }
    }

    fn as_solver_mut(&mut self) -> &mut dyn Solver {
        match self {
            Optimizer::MultiOffset(s) => s,
            Optimizer::TwoPhase(s) => s,
        }
    }

    fn position(&self) -> Point {
        match self {
            Optimizer::MultiOffset(s) => s.position(),
            Optimizer::TwoPhase(s) => s.position(),
        }
    }
}

/// Finds the best position for a component (in one fixed rotation) flush against one outline segment.
///
/// The free space next to the segment is bounded with the largest rectangle outside the outline,
/// then an IRLS optimizer moves the component along the segment, pulling its pads towards their targets.
pub struct SegmentCandidateSolver {
    state: SolverState,
    segment: Edge,
    outlines: Rc<Vec<Outline>>,
    /// Footprint of the component in its rotation, relative to its center
    footprint: Rect,
    groups: Vec<OffsetTargets>,
    optimizer_kind: OptimizerKind,
    irls_config: IrlsConfig,
    clearance: f64,
    hard_bounds: Option<Rect>,
    outward_normal: Option<Point>,
    rect_solver: Option<LargestRectSolver>,
    viable_bounds: Option<Rect>,
    clamped_segment: Option<Edge>,
    optimizer: Option<Optimizer>,
    optimal_position: Option<Point>,
    converged: bool,
}

impl SegmentCandidateSolver {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        segment: Edge,
        outlines: Rc<Vec<Outline>>,
        footprint: Rect,
        groups: Vec<OffsetTargets>,
        optimizer_kind: OptimizerKind,
        irls_config: IrlsConfig,
        clearance: f64,
        hard_bounds: Option<Rect>,
    ) -> Self {
        SegmentCandidateSolver {
            state: SolverState::new(MAX_ITERATIONS),
            segment,
            outlines,
            footprint,
            groups,
            optimizer_kind,
            irls_config,
            clearance,
            hard_bounds,
            outward_normal: None,
            rect_solver: None,
            viable_bounds: None,
            clamped_segment: None,
            optimizer: None,
            optimal_position: None,
            converged: false,
        }
    }

    /// Best center found for the component, available once solved
    pub fn optimal_position(&self) -> Option<Point> {
        self.optimal_position
    }

    /// `false` if the nested optimizer failed and the position is its last iterate
    pub fn converged(&self) -> bool {
        self.converged
    }

    /// Connection cost of the optimal position
    pub fn cost(&self, mode: DistanceMode) -> Option<f64> {
        self.optimal_position.map(|p| total_cost(p, &self.groups, mode))
    }

    pub fn viable_bounds(&self) -> Option<Rect> {
        self.viable_bounds
    }

    /// Unit normal of the segment pointing away from the occupied space
    fn find_outward_normal(&self) -> Result<Point> {
        let mid = self.segment.centroid();
        let candidates = [self.segment.right_normal(), self.segment.left_normal()];
        for n in candidates.into_iter().flatten() {
            let outside = mid + n * OUTWARD_TEST_DISTANCE;
            if !point_in_outlines(outside, outline_edges(&self.outlines)) {
                return Ok(n);
            }
        }
        bail!(
            "no outward normal found for segment ({:.4}, {:.4}) -> ({:.4}, {:.4})",
            self.segment.start.0,
            self.segment.start.1,
            self.segment.end.0,
            self.segment.end.1
        )
    }

    /// Distance the center must keep from the segment along `normal` so that the footprint lies entirely on the outward side
    fn snap_distance(&self, normal: Point) -> f64 {
        self.footprint
            .corners()
            .iter()
            .map(|c| -c.dot(&normal))
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Restricts the segment to the part along which the snapped center stays within `viable`.
    /// If there is no such part, the segment collapses to the point closest to `viable`.
    fn clamp_segment(&self, viable: &Rect) -> Edge {
        let seg = self.segment;
        let clamp_axis = |lo: f64, hi: f64, v_lo: f64, v_hi: f64| -> (f64, f64) {
            let (a, b) = (lo.max(v_lo), hi.min(v_hi));
            match a <= b {
                true => (a, b),
                false => {
                    let p = if hi < v_lo { v_lo.min(v_hi) } else { v_hi.max(v_lo) };
                    (p, p)
                }
            }
        };
        if seg.is_horizontal() {
            let (a, b) = clamp_axis(seg.x_min(), seg.x_max(), viable.x_min, viable.x_max);
            let y = seg.start.1;
            Edge::new(Point(a, y), Point(b, y))
        } else if seg.is_vertical() {
            let (a, b) = clamp_axis(seg.y_min(), seg.y_max(), viable.y_min, viable.y_max);
            let x = seg.start.0;
            Edge::new(Point(x, a), Point(x, b))
        } else {
            seg
        }
    }
}

impl Solver for SegmentCandidateSolver {
    fn name(&self) -> &'static str {
        "SegmentCandidateSolver"
    }

    fn state(&self) -> &SolverState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut SolverState {
        &mut self.state
    }

    fn setup_impl(&mut self) -> Result<()> {
        if self.segment.is_degenerate() {
            self.state.mark_failed("zero-length outline segment");
            return Ok(());
        }
        let normal = self.find_outward_normal()?;
        self.outward_normal = Some(normal);

        let margin = 2.0 * self.footprint.span() + self.clearance;
        let global_bounds = outlines_bbox(&self.outlines)
            .and_then(|bb| bb.inflate(margin))
            .map(|bb| match self.hard_bounds {
                Some(hb) => Rect::intersection(bb, hb),
                None => Some(bb),
            });
        let Some(Some(global_bounds)) = global_bounds else {
            self.state.mark_failed("nowhere to fit: no space within bounds");
            return Ok(());
        };

        let origin = self.segment.centroid() + normal * OUTWARD_TEST_DISTANCE;
        let edges = outline_edges(&self.outlines).copied().collect();
        let mut rect_solver = LargestRectSolver::new(edges, origin, global_bounds);
        rect_solver.solve()?;
        let free_rect = rect_solver.result();
        self.rect_solver = Some(rect_solver);
        let Some(free_rect) = free_rect else {
            self.state.mark_failed("nowhere to fit: no free space next to segment");
            return Ok(());
        };

        let fp = self.footprint;
        let viable = Rect {
            x_min: free_rect.x_min - fp.x_min,
            y_min: free_rect.y_min - fp.y_min,
            x_max: free_rect.x_max - fp.x_max,
            y_max: free_rect.y_max - fp.y_max,
        };
        if viable.x_min > viable.x_max || viable.y_min > viable.y_max {
            self.state.mark_failed(format!(
                "nowhere to fit: {:.4}x{:.4} component in {:.4}x{:.4} free space",
                fp.width(),
                fp.height(),
                free_rect.width(),
                free_rect.height()
            ));
            return Ok(());
        }
        self.viable_bounds = Some(viable);

        let clamped = self.clamp_segment(&viable);
        self.clamped_segment = Some(clamped);

        let snap = self.snap_distance(normal);
        let constraint: Constraint = Rc::new(move |p: Point| {
            let on_segment = clamped.closest_point(&p);
            viable.clamp(on_segment + normal * snap)
        });
        let initial = constraint(clamped.centroid());
        self.optimal_position = Some(initial);

        let groups = self.groups.clone();
        self.optimizer = Some(match self.optimizer_kind {
            OptimizerKind::MultiOffset(mode) => Optimizer::MultiOffset(MultiOffsetIrlsSolver::new(
                initial,
                groups,
                mode,
                self.irls_config,
                constraint,
            )),
            OptimizerKind::TwoPhase => Optimizer::TwoPhase(TwoPhaseIrlsSolver::new(
                initial,
                groups,
                self.irls_config,
                constraint,
            )),
        });
        Ok(())
    }

    fn step_impl(&mut self) -> Result<()> {
        let Some(optimizer) = self.optimizer.as_mut() else {
            bail!("segment solver stepped without an optimizer");
        };
        optimizer.as_solver_mut().step()?;
        self.optimal_position = Some(optimizer.position());

        let solver = optimizer.as_solver();
        if solver.solved() {
            self.converged = true;
            self.state.mark_solved();
        } else if let Some(err) = solver.error() {
            debug!(
                "[SEG] optimizer did not converge ({err}), keeping its last position after {} iterations",
                solver.iterations()
            );
            self.state.mark_solved();
        }
        Ok(())
    }

    fn accept_best_effort(&mut self) -> bool {
        self.optimal_position.is_some()
    }

    fn active_sub_solver(&self) -> Option<&dyn Solver> {
        match &self.optimizer {
            Some(o) => Some(o.as_solver()),
            None => self.rect_solver.as_ref().map(|r| r as &dyn Solver),
        }
    }

    fn visualize(&self) -> Visualization {
        let mut vis = Visualization::with_title(self.name());
        for e in outline_edges(&self.outlines) {
            vis.add_edge(e, "black", false);
        }
        vis.add_edge(&self.segment, "blue", false);
        if let Some(r) = self.rect_solver.as_ref().and_then(|r| r.result()) {
            vis.add_rect(&r, Some("rgba(0,200,0,0.2)"), Some("green"), Some("free".to_string()));
        }
        if let Some(vb) = &self.viable_bounds {
            vis.add_rect(vb, None, Some("orange"), Some("viable".to_string()));
        }
        if let Some(c) = &self.clamped_segment {
            vis.add_edge(c, "orange", true);
        }
        if let Some(p) = self.optimal_position {
            let fp = self.footprint.translate_clone(p);
            vis.add_rect(&fp, Some("rgba(0,0,255,0.2)"), Some("blue"), None);
            vis.add_point(p, "blue", Some("optimal".to_string()));
        }
        vis
    }
}
