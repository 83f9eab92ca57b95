use anyhow::Result;

use crate::util::Visualization;

/// Iteration ceiling of a solver unless it specifies its own
pub const DEFAULT_MAX_ITERATIONS: usize = 100_000;

/// Lifecycle status of a [`Solver`]
#[derive(Clone, Debug, PartialEq)]
pub enum SolverStatus {
    Running,
    Solved,
    /// Terminal failure with a description of what went wrong
    Failed(String),
}

/// Bookkeeping shared by every [`Solver`] implementation
#[derive(Clone, Debug)]
pub struct SolverState {
    pub status: SolverStatus,
    pub iterations: usize,
    pub max_iterations: usize,
    setup_done: bool,
}

impl SolverState {
    pub fn new(max_iterations: usize) -> Self {
        SolverState {
            status: SolverStatus::Running,
            iterations: 0,
            max_iterations,
            setup_done: false,
        }
    }

    pub fn mark_solved(&mut self) {
        self.status = SolverStatus::Solved;
    }

    pub fn mark_failed(&mut self, msg: impl Into<String>) {
        self.status = SolverStatus::Failed(msg.into());
    }

    pub fn is_terminal(&self) -> bool {
        self.status != SolverStatus::Running
    }
}

impl Default for SolverState {
    fn default() -> Self {
        SolverState::new(DEFAULT_MAX_ITERATIONS)
    }
}

/// Execution contract shared by every iterative algorithm in this crate.
///
/// A solver is driven by repeatedly calling [`Solver::step`], which performs one unit of work.
/// Setup runs lazily, exactly once, before the first step.
/// Once a solver is solved or failed, further steps are no-ops.
///
/// An `Err` returned by the algorithm-specific work is recorded as a failure and returned to the caller,
/// the solver stays failed afterward.
/// Running out of iterations is a failure as well, unless the solver accepts a best-effort result.
pub trait Solver {
    /// Short name used in logs and diagnostics
    fn name(&self) -> &'static str;

    fn state(&self) -> &SolverState;

    fn state_mut(&mut self) -> &mut SolverState;

    /// One-time initialization, called before the first step
    fn setup_impl(&mut self) -> Result<()> {
        Ok(())
    }

    /// One unit of algorithm-specific work
    fn step_impl(&mut self) -> Result<()>;

    /// Called once when the iteration ceiling is exceeded.
    /// Return `true` to accept the current state as the solution instead of failing.
    fn accept_best_effort(&mut self) -> bool {
        false
    }

    /// The nested solver currently doing the work, if any
    fn active_sub_solver(&self) -> Option<&dyn Solver> {
        None
    }

    /// Diagnostic snapshot of the current state
    fn visualize(&self) -> Visualization {
        Visualization::with_title(self.name())
    }

    fn setup(&mut self) -> Result<()> {
        if self.state().setup_done {
            return Ok(());
        }
        self.state_mut().setup_done = true;
        self.setup_impl().inspect_err(|e| {
            self.state_mut().mark_failed(format!("{e:#}"));
        })
    }

    fn step(&mut self) -> Result<()> {
        self.setup()?;
        if self.state().is_terminal() {
            return Ok(());
        }
        let state = self.state_mut();
        state.iterations += 1;
        if state.iterations > state.max_iterations {
            match self.accept_best_effort() {
                true => self.state_mut().mark_solved(),
                false => self.state_mut().mark_failed("ran out of iterations"),
            }
            return Ok(());
        }
        self.step_impl().inspect_err(|e| {
            self.state_mut().mark_failed(format!("{e:#}"));
        })
    }

    /// Steps until the solver is solved or failed
    fn solve(&mut self) -> Result<()> {
        while !self.state().is_terminal() {
            self.step()?;
        }
        Ok(())
    }

    fn solved(&self) -> bool {
        self.state().status == SolverStatus::Solved
    }

    fn failed(&self) -> bool {
        matches!(self.state().status, SolverStatus::Failed(_))
    }

    fn error(&self) -> Option<&str> {
        match &self.state().status {
            SolverStatus::Failed(msg) => Some(msg),
            _ => None,
        }
    }

    fn iterations(&self) -> usize {
        self.state().iterations
    }

    /// Names of this solver and its chain of active sub-solvers, outermost first
    fn sub_solver_chain(&self) -> Vec<&'static str> {
        let mut chain = vec![self.name()];
        let mut current = self.active_sub_solver();
        while let Some(s) = current {
            chain.push(s.name());
            current = s.active_sub_solver();
        }
        chain
    }
}
