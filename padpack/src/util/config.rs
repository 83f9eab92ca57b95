use serde::{Deserialize, Serialize};

/// Configuration of the IRLS (Weiszfeld) optimizers
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct IrlsConfig {
    /// Iterations after which an optimizer gives up, convergence is expected to be fast
    pub max_iterations: usize,
    /// Movement below which the optimizer is considered converged
    pub epsilon: f64,
}

impl Default for IrlsConfig {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            epsilon: 1e-6,
        }
    }
}

/// Configuration of the local translation refinement applied to feasible candidates
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct RefinementConfig {
    /// First nudge distance, as a fraction of the minimum gap plus the largest pad half-size
    pub initial_step_fraction: f64,
    /// Refinement stops once the nudge distance drops below this
    pub min_step: f64,
    /// Maximum distance the refined position may drift from the original candidate
    pub max_radius: f64,
    /// Maximum number of nudge rounds
    pub max_rounds: usize,
}

impl Default for RefinementConfig {
    fn default() -> Self {
        Self {
            initial_step_fraction: 0.5,
            min_step: 1e-3,
            max_radius: 2.0,
            max_rounds: 64,
        }
    }
}

/// Configuration of the [`PackSolver`](crate::solvers::pack::PackSolver)
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PackSolverConfig {
    /// Iteration ceiling of the packing pipeline
    pub max_iterations: usize,
    pub optimizer: IrlsConfig,
    /// Fractions along every outline segment that are always evaluated as candidates
    pub segment_sample_fractions: Vec<f64>,
    /// Number of interval reductions of the ternary search along a segment
    pub ternary_search_iterations: usize,
    /// Candidate points within this cost of the best point are all retained
    pub best_point_tolerance: f64,
    pub refinement: RefinementConfig,
    /// Number of evenly spaced samples per outline edge for components without shared networks
    pub disconnected_samples_per_edge: usize,
    /// Number of grid steps per side of the fallback grid for components without shared networks
    pub grid_fallback_steps: usize,
}

impl Default for PackSolverConfig {
    fn default() -> Self {
        Self {
            max_iterations: 100_000,
            optimizer: IrlsConfig::default(),
            segment_sample_fractions: vec![0.0, 0.2, 0.4, 0.6, 0.8, 1.0],
            ternary_search_iterations: 60,
            best_point_tolerance: 1e-6,
            refinement: RefinementConfig::default(),
            disconnected_samples_per_edge: 8,
            grid_fallback_steps: 10,
        }
    }
}
