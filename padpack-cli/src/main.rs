use std::fs;

use anyhow::{Context, Result, bail};
use clap::Parser as ClapParser;
use log::{info, warn};
use padpack::io::export::export_pack_output;
use padpack::io::svg::{pack_output_to_svg, visualization_to_svg};
use padpack::solvers::Solver;
use padpack_cli::config::CliConfig;
use padpack_cli::io::cli::Cli;
use padpack_cli::io::output::PackRunOutput;
use padpack_cli::{io, pack_instance};

fn main() -> Result<()> {
    let args = Cli::parse();
    io::init_logger(args.log_level)?;

    let config: CliConfig = match &args.config_file {
        None => {
            warn!("[MAIN] No config file provided, use --config-file to provide a custom config");
            CliConfig::default()
        }
        Some(config_file) => io::read_json(config_file).context("incorrect config file format")?,
    };
    info!("[MAIN] Successfully parsed config: {config:?}");

    let input_stem = args
        .input_file
        .file_stem()
        .and_then(|s| s.to_str())
        .with_context(|| format!("invalid input file name: {}", args.input_file.display()))?;

    if !args.output_folder.exists() {
        fs::create_dir_all(&args.output_folder).with_context(|| {
            format!(
                "could not create output folder: {}",
                args.output_folder.display()
            )
        })?;
    }

    let ext_input = io::read_pack_input(&args.input_file)?;
    let solver = pack_instance(&ext_input, &config)?;
    let output = solver.output();

    {
        let run_output = PackRunOutput {
            input: ext_input,
            solution: export_pack_output(&output),
            config: config.clone(),
        };
        let solution_path = args.output_folder.join(format!("sol_{input_stem}.json"));
        io::write_json(&run_output, &solution_path)?;
    }

    if config.write_svg {
        let svg_path = args.output_folder.join(format!("sol_{input_stem}.svg"));
        let svg = pack_output_to_svg(&output, &config.svg_draw_options, input_stem);
        io::write_svg(&svg, &svg_path)?;
    }

    if config.write_diagnostics {
        let vis_path = args.output_folder.join(format!("vis_{input_stem}.svg"));
        io::write_svg(&visualization_to_svg(&solver.visualize()), &vis_path)?;
    }

    match solver.error() {
        Some(err) => bail!("packing of {input_stem} failed: {err}"),
        None => Ok(()),
    }
}
