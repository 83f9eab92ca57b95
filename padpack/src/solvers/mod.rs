mod base;
pub mod irls;
pub mod largest_rect;
pub mod pack;
pub mod segment_candidate;

#[doc(inline)]
pub use base::{DEFAULT_MAX_ITERATIONS, Solver, SolverState, SolverStatus};
