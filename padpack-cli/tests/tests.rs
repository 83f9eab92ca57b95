#[cfg(test)]
mod tests {
    use std::path::Path;

    use anyhow::Result;
    use test_case::test_case;

    use padpack::io::export::export_pack_output;
    use padpack::solvers::Solver;
    use padpack::util::assertions::{pads_are_consistent, placement_is_overlap_free};
    use padpack_cli::config::CliConfig;
    use padpack_cli::io;
    use padpack_cli::io::output::PackRunOutput;
    use padpack_cli::pack_instance;

    #[test_case("../assets/led_driver.json"; "led_driver")]
    #[test_case("../assets/resistor_chain.json"; "resistor_chain")]
    #[test_case("../assets/squared_decoupling.json"; "squared_decoupling")]
    #[test_case("../assets/closest_connection.json"; "closest_connection")]
    #[test_case("../assets/disconnected.json"; "disconnected")]
    #[test_case("../assets/pack_first_bounded.json"; "pack_first_bounded")]
    fn test_instance(instance_path: &str) -> Result<()> {
        let _ = env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .is_test(true)
            .try_init();

        let ext_input = io::read_pack_input(Path::new(instance_path))?;
        let config = CliConfig::default();
        let solver = pack_instance(&ext_input, &config)?;
        assert!(solver.solved(), "{:?}", solver.error());

        let output = solver.output();
        assert!(output.is_complete());
        assert!(placement_is_overlap_free(&output.placed, output.input.min_gap));
        assert!(output.placed.iter().all(pads_are_consistent));
        if let Some(bounds) = output.input.bounds {
            for pc in &output.placed {
                assert!(bounds.contains_rect(&pc.footprint(), 1e-6));
            }
        }
        if let Some(first) = output.input.pack_first.first() {
            assert_eq!(output.placed[0].component_id(), first);
        }

        //the run output written by the binary is valid json and carries the input alongside the solution
        let run_output = PackRunOutput {
            input: ext_input.clone(),
            solution: export_pack_output(&output),
            config,
        };
        let json = serde_json::to_value(&run_output)?;
        assert_eq!(json["components"], serde_json::to_value(&ext_input.components)?);
        assert_eq!(
            json["solution"]["components"].as_array().map(|c| c.len()),
            Some(ext_input.components.len())
        );
        Ok(())
    }

    #[test]
    fn config_defaults_fill_missing_fields() -> Result<()> {
        let config: CliConfig = serde_json::from_str(r#"{ "write_diagnostics": true }"#)?;
        assert!(config.write_svg);
        assert!(config.write_diagnostics);
        assert_eq!(config.solver, CliConfig::default().solver);
        Ok(())
    }
}
