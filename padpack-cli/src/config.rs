use padpack::io::svg::svg_util::SvgDrawOptions;
use padpack::util::PackSolverConfig;
use serde::{Deserialize, Serialize};

/// Configuration of the command line driver
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CliConfig {
    /// Configuration of the pack solver
    #[serde(default)]
    pub solver: PackSolverConfig,
    /// Write an SVG rendering of the placement next to the JSON output
    #[serde(default = "default_true")]
    pub write_svg: bool,
    /// Also write the diagnostic snapshot of the pack solver in its final state
    #[serde(default)]
    pub write_diagnostics: bool,
    /// Optional SVG drawing options
    #[serde(default)]
    pub svg_draw_options: SvgDrawOptions,
}

fn default_true() -> bool {
    true
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            solver: PackSolverConfig::default(),
            write_svg: true,
            write_diagnostics: false,
            svg_draw_options: SvgDrawOptions::default(),
        }
    }
}
