use std::sync::LazyLock;
use std::time::Instant;

use anyhow::Result;
use log::{error, info};
use padpack::io::ext_repr::ExtPackInput;
use padpack::io::import::import_pack_input;
use padpack::solvers::Solver;
use padpack::solvers::pack::PackSolver;
use thousands::Separable;

use crate::config::CliConfig;

pub mod config;
pub mod io;

pub static EPOCH: LazyLock<Instant> = LazyLock::new(Instant::now);

/// Imports an instance and packs it, returning the solver in its terminal state.
///
/// Infeasibility does not make this fail: the solver is then failed and holds the components placed so far.
pub fn pack_instance(ext_input: &ExtPackInput, config: &CliConfig) -> Result<PackSolver> {
    let input = import_pack_input(ext_input)?;
    let n_components = input.components.len();
    let start = Instant::now();

    let mut solver = PackSolver::new(input, config.solver.clone());
    solver.solve()?;

    let output = solver.output();
    info!(
        "[MAIN] packing finished in {:.3}ms ({} iterations, {} candidates rejected)",
        start.elapsed().as_secs_f64() * 1000.0,
        output.iterations.separate_with_commas(),
        output.n_rejected_candidates.separate_with_commas()
    );
    match solver.error() {
        None => info!("[MAIN] placed all {n_components} components"),
        Some(err) => error!(
            "[MAIN] placed {}/{n_components} components: {err}",
            output.placed.len()
        ),
    }
    Ok(solver)
}
