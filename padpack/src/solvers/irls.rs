//! Iteratively Reweighted Least Squares optimizers (Weiszfeld's algorithm).
//!
//! All variants search for a center position minimizing the (squared) distances between a set of
//! points rigidly attached to that center and their targets.
//! After every update, a caller-supplied constraint projects the new position back onto the feasible set.

use std::rc::Rc;

use anyhow::Result;
use log::trace;

use crate::entities::DistanceMode;
use crate::geometry::primitives::Point;
use crate::solvers::{Solver, SolverState};
use crate::util::{IrlsConfig, Visualization};

/// Weight given to a target (almost) coinciding with its attached point, instead of `1/d`
const COINCIDENT_WEIGHT: f64 = 1e6;

/// Projection applied to every new position
pub type Constraint = Rc<dyn Fn(Point) -> Point>;

/// A constraint which leaves every position as is
pub fn unconstrained() -> Constraint {
    Rc::new(|p| p)
}

/// Point attached to the center at a fixed `offset`, together with the targets it is pulled towards
#[derive(Clone, Debug, PartialEq)]
pub struct OffsetTargets {
    pub offset: Point,
    pub targets: Vec<Point>,
}

impl OffsetTargets {
    pub fn new(offset: Point, targets: Vec<Point>) -> Self {
        OffsetTargets { offset, targets }
    }
}

/// Sum of all (squared) distances between the attached points and their targets for a given center
pub fn total_cost(center: Point, groups: &[OffsetTargets], mode: DistanceMode) -> f64 {
    groups
        .iter()
        .flat_map(|g| {
            let p = center + g.offset;
            g.targets.iter().map(move |t| mode.apply(p.distance(t)))
        })
        .sum()
}

/// A single Weiszfeld update: the weighted centroid of every target, shifted back by its offset.
/// Returns `None` if there are no targets.
pub fn weiszfeld_update(
    center: Point,
    groups: &[OffsetTargets],
    mode: DistanceMode,
    epsilon: f64,
) -> Option<Point> {
    let (mut sum_x, mut sum_y, mut sum_w) = (0.0, 0.0, 0.0);
    for g in groups {
        let p = center + g.offset;
        for t in &g.targets {
            let w = match mode {
                DistanceMode::Squared => 1.0,
                DistanceMode::Linear => {
                    let d = p.distance(t);
                    if d < epsilon { COINCIDENT_WEIGHT } else { 1.0 / d }
                }
            };
            sum_x += w * (t.0 - g.offset.0);
            sum_y += w * (t.1 - g.offset.1);
            sum_w += w;
        }
    }
    match sum_w > 0.0 {
        true => Some(Point(sum_x / sum_w, sum_y / sum_w)),
        false => None,
    }
}

/// IRLS optimizer with multiple points attached to a single free center, each with its own targets.
pub struct MultiOffsetIrlsSolver {
    state: SolverState,
    groups: Vec<OffsetTargets>,
    mode: DistanceMode,
    epsilon: f64,
    constraint: Constraint,
    position: Point,
}

impl MultiOffsetIrlsSolver {
    pub fn new(
        initial: Point,
        groups: Vec<OffsetTargets>,
        mode: DistanceMode,
        config: IrlsConfig,
        constraint: Constraint,
    ) -> Self {
        MultiOffsetIrlsSolver {
            state: SolverState::new(config.max_iterations),
            groups,
            mode,
            epsilon: config.epsilon,
            constraint,
            position: initial,
        }
    }

    /// Current (or, once solved, optimal) center
    pub fn position(&self) -> Point {
        self.position
    }

    pub fn cost(&self) -> f64 {
        total_cost(self.position, &self.groups, self.mode)
    }

    /// The attached offset and target forming the shortest connection at the current position
    pub fn closest_connection(&self) -> Option<(Point, Point)> {
        self.groups
            .iter()
            .flat_map(|g| g.targets.iter().map(move |t| (g.offset, *t)))
            .min_by(|(o1, t1), (o2, t2)| {
                let d1 = (self.position + *o1).sq_distance(t1);
                let d2 = (self.position + *o2).sq_distance(t2);
                d1.total_cmp(&d2)
            })
    }
}

impl Solver for MultiOffsetIrlsSolver {
    fn name(&self) -> &'static str {
        "MultiOffsetIrlsSolver"
    }

    fn state(&self) -> &SolverState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut SolverState {
        &mut self.state
    }

    fn setup_impl(&mut self) -> Result<()> {
        if self.groups.iter().all(|g| g.targets.is_empty()) {
            //nothing pulls on the center, stay where we are
            self.state.mark_solved();
        }
        Ok(())
    }

    fn step_impl(&mut self) -> Result<()> {
        let Some(next) = weiszfeld_update(self.position, &self.groups, self.mode, self.epsilon)
        else {
            self.state.mark_solved();
            return Ok(());
        };
        let next = (self.constraint)(next);
        let moved = next.distance(&self.position);
        self.position = next;
        if moved < self.epsilon {
            trace!(
                "[IRLS] converged after {} iterations at ({:.4}, {:.4})",
                self.state.iterations, next.0, next.1
            );
            self.state.mark_solved();
        }
        Ok(())
    }

    fn visualize(&self) -> Visualization {
        let mut vis = Visualization::with_title(self.name());
        vis.add_point(self.position, "blue", Some("center".to_string()));
        for g in &self.groups {
            let p = self.position + g.offset;
            vis.add_point(p, "orange", None);
            for t in &g.targets {
                vis.add_point(*t, "red", None);
                vis.lines.push(crate::util::VisLine {
                    points: vec![p.into(), (*t).into()],
                    color: Some("gray".to_string()),
                    dashed: true,
                });
            }
        }
        vis
    }
}

/// IRLS optimizer for a single point pulled towards a set of targets.
pub struct IrlsSolver {
    inner: MultiOffsetIrlsSolver,
}

impl IrlsSolver {
    pub fn new(
        initial: Point,
        targets: Vec<Point>,
        mode: DistanceMode,
        config: IrlsConfig,
        constraint: Constraint,
    ) -> Self {
        let groups = vec![OffsetTargets::new(Point::ORIGIN, targets)];
        IrlsSolver {
            inner: MultiOffsetIrlsSolver::new(initial, groups, mode, config, constraint),
        }
    }

    pub fn position(&self) -> Point {
        self.inner.position()
    }

    pub fn cost(&self) -> f64 {
        self.inner.cost()
    }
}

impl Solver for IrlsSolver {
    fn name(&self) -> &'static str {
        "IrlsSolver"
    }

    fn state(&self) -> &SolverState {
        self.inner.state()
    }

    fn state_mut(&mut self) -> &mut SolverState {
        self.inner.state_mut()
    }

    fn setup_impl(&mut self) -> Result<()> {
        self.inner.setup_impl()
    }

    fn step_impl(&mut self) -> Result<()> {
        self.inner.step_impl()
    }

    fn visualize(&self) -> Visualization {
        let mut vis = self.inner.visualize();
        vis.title = Some(self.name().to_string());
        vis
    }
}

enum Phase {
    /// Minimizing the sum of squared distances over all connections
    Sum(MultiOffsetIrlsSolver),
    /// Minimizing the length of the connection that was closest after the first phase
    Closest(MultiOffsetIrlsSolver),
}

/// Two-phase optimizer: first minimizes the summed squared distance over all connections,
/// then retargets on the single closest connection at that optimum and minimizes its (unsquared) length.
pub struct TwoPhaseIrlsSolver {
    state: SolverState,
    phase: Phase,
    config: IrlsConfig,
    constraint: Constraint,
    position: Point,
}

impl TwoPhaseIrlsSolver {
    pub fn new(
        initial: Point,
        groups: Vec<OffsetTargets>,
        config: IrlsConfig,
        constraint: Constraint,
    ) -> Self {
        let sum_solver = MultiOffsetIrlsSolver::new(
            initial,
            groups,
            DistanceMode::Squared,
            config,
            constraint.clone(),
        );
        TwoPhaseIrlsSolver {
            state: SolverState::new(2 * config.max_iterations + 2),
            phase: Phase::Sum(sum_solver),
            config,
            constraint,
            position: initial,
        }
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn in_closest_phase(&self) -> bool {
        matches!(self.phase, Phase::Closest(_))
    }
}

impl Solver for TwoPhaseIrlsSolver {
    fn name(&self) -> &'static str {
        "TwoPhaseIrlsSolver"
    }

    fn state(&self) -> &SolverState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut SolverState {
        &mut self.state
    }

    fn step_impl(&mut self) -> Result<()> {
        let next_phase = match &mut self.phase {
            Phase::Sum(solver) => {
                solver.step()?;
                self.position = solver.position();
                if let Some(err) = solver.error() {
                    self.state.mark_failed(format!("sum phase: {err}"));
                    None
                } else if solver.solved() {
                    match solver.closest_connection() {
                        None => {
                            self.state.mark_solved();
                            None
                        }
                        Some((offset, target)) => Some(Phase::Closest(MultiOffsetIrlsSolver::new(
                            solver.position(),
                            vec![OffsetTargets::new(offset, vec![target])],
                            DistanceMode::Linear,
                            self.config,
                            self.constraint.clone(),
                        ))),
                    }
                } else {
                    None
                }
            }
            Phase::Closest(solver) => {
                solver.step()?;
                self.position = solver.position();
                if let Some(err) = solver.error() {
                    self.state.mark_failed(format!("closest phase: {err}"));
                } else if solver.solved() {
                    self.state.mark_solved();
                }
                None
            }
        };
        if let Some(phase) = next_phase {
            self.phase = phase;
        }
        Ok(())
    }

    fn active_sub_solver(&self) -> Option<&dyn Solver> {
        match &self.phase {
            Phase::Sum(s) | Phase::Closest(s) => Some(s),
        }
    }

    fn visualize(&self) -> Visualization {
        let mut vis = match &self.phase {
            Phase::Sum(s) | Phase::Closest(s) => s.visualize(),
        };
        vis.title = Some(self.name().to_string());
        vis
    }
}
