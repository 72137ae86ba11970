//! GrahaNav - runs an exploration mission on a simulated planet
//!
//! Usage: `graha-nav <planet.toml> [config.toml]`
//!
//! Without a config argument `graha.toml` in the working directory is used
//! if present, otherwise the built-in defaults.

use std::path::Path;

use graha_nav::exploration::{Explorer, MissionOutcome};
use graha_nav::sim::{PlanetScenario, SimulatedPlanet};
use graha_nav::{GrahaConfig, GrahaError, Result};
use tracing::{error, info, warn};

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("graha_nav=info".parse().map_err(|e| {
                    GrahaError::Config(format!("Invalid log directive: {}", e))
                })?),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();
    let Some(planet_path) = args.get(1) else {
        error!("Usage: graha-nav <planet.toml> [config.toml]");
        return Err(GrahaError::Config("missing planet file".to_string()));
    };

    let config = if let Some(config_path) = args.get(2) {
        info!("Loading configuration from {}", config_path);
        GrahaConfig::load(Path::new(config_path))?
    } else if Path::new("graha.toml").exists() {
        info!("Loading configuration from graha.toml");
        GrahaConfig::load(Path::new("graha.toml"))?
    } else {
        info!("Using default configuration");
        GrahaConfig::default()
    };

    let scenario = PlanetScenario::load(Path::new(planet_path))?;
    let mut planet = SimulatedPlanet::new(scenario, config.robot.clone())?;
    info!("Exploring planet '{}'", planet.name());

    let start = planet.start_pose();
    let first_color = planet.start_color();
    let mut explorer = Explorer::new(config.robot, config.exploration);

    let outcome = explorer.run(&mut planet, start, first_color)?;
    let map = explorer.planet();
    info!(
        "Mission finished after {} cycles: {} nodes explored, {} nodes with known paths",
        explorer.cycles(),
        map.explored_nodes().len(),
        map.get_paths().len()
    );

    match outcome {
        MissionOutcome::TargetReached | MissionOutcome::ExplorationCompleted => {
            info!("Outcome: {:?} at {}", outcome, planet.vehicle_node());
        }
        MissionOutcome::Unconfirmed | MissionOutcome::CycleLimit => {
            warn!("Outcome: {:?} at {}", outcome, planet.vehicle_node());
        }
    }

    Ok(())
}
