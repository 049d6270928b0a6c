use std::error::Error;

use log::info;
use trussline::report::{influence_lines, render_summary, write_influence_lines};
use trussline::AnalysisConfig;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    // Read the analysis settings. Without a path the built-in single-span
    // bridge is analysed with a unit load.
    let config = match std::env::args().nth(1) {
        Some(path) => AnalysisConfig::from_path(path)?,
        None => AnalysisConfig::default(),
    };

    // Assemble the bridge and roll the load across the bottom chord.
    let mut bridge = config.build_bridge()?;
    bridge.sweep();

    // Place the lane load on every influence line when one is configured.
    if let Some(pattern) = config.load_pattern()? {
        bridge.search_worst_cases(&pattern)?;
    }

    println!("{}", render_summary(&bridge));

    if let Some(output) = &config.output {
        write_influence_lines(output, &influence_lines(&bridge)?)?;
        info!("influence lines written to {}", output.display());
    }

    Ok(())
}
