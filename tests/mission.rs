//! Mission Tests
//!
//! Complete exploration missions on the bundled example planet, driven
//! through the simulated vehicle and mission control.
//!
//! Run with: `cargo test --test mission`

use std::collections::BTreeSet;
use std::path::Path;

use graha_nav::config::{ExplorationConfig, GrahaConfig, RobotConfig};
use graha_nav::exploration::{Explorer, MissionOutcome};
use graha_nav::planet::{Coordinate, Direction};
use graha_nav::sim::{PlanetScenario, SimulatedPlanet};

// ============================================================================
// Helpers
// ============================================================================

fn c(x: i32, y: i32) -> Coordinate {
    Coordinate::new(x, y)
}

fn example_scenario() -> PlanetScenario {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("planets/example.toml");
    PlanetScenario::load(&path).unwrap()
}

fn run(
    scenario: PlanetScenario,
    exploration: ExplorationConfig,
) -> (Explorer, SimulatedPlanet, MissionOutcome) {
    let robot = RobotConfig::default();
    let mut sim = SimulatedPlanet::new(scenario, robot.clone()).unwrap();
    let mut explorer = Explorer::new(robot, exploration);

    let start = sim.start_pose();
    let color = sim.start_color();
    let outcome = explorer.run(&mut sim, start, color).unwrap();
    (explorer, sim, outcome)
}

// ============================================================================
// Tests
// ============================================================================

#[test]
fn test_full_exploration() {
    let (explorer, sim, outcome) = run(example_scenario(), ExplorationConfig::default());
    assert_eq!(outcome, MissionOutcome::ExplorationCompleted);

    let planet = explorer.planet();
    let explored: BTreeSet<_> = planet.explored_nodes().iter().copied().collect();
    let expected: BTreeSet<_> = [c(0, 0), c(0, 1), c(1, 1), c(2, 1), c(1, 0), c(-1, 2)]
        .into_iter()
        .collect();
    assert_eq!(explored, expected);
    assert!(planet.unveiled_nodes().is_empty());
    assert_eq!(planet.nodes_with_unexplored().count(), 0);

    // every open path was learned with its true weight
    for truth in sim.truth_paths().filter(|p| !p.weight.is_blocked()) {
        let known = planet
            .known_path(truth.start, truth.start_direction)
            .unwrap_or_else(|| panic!("{} {} not learned", truth.start, truth.start_direction));
        assert_eq!(known.coordinate, truth.end);
        assert_eq!(known.direction, truth.end_direction);
        assert_eq!(known.weight, truth.weight);
    }

    // the obstacle was met from (1,0), (2,0) stays unknown
    assert!(planet
        .known_path(c(1, 0), Direction::East)
        .unwrap()
        .weight
        .is_blocked());
    assert!(!planet.is_known(c(2, 0)));

    // the vehicle's own estimate agrees with the ground truth
    assert_eq!(
        explorer.odometry().get_position().unwrap().coordinate,
        sim.vehicle_node()
    );
    assert_eq!(explorer.cycles(), sim.drives());
    // scans sweep counter-clockwise, so (1,0) tries its blocked east exit
    // before heading back west and never has to return
    assert_eq!(explorer.cycles(), 10);
}

#[test]
fn test_target_reached() {
    let mut scenario = example_scenario();
    scenario.target = Some(c(2, 1));

    let (explorer, sim, outcome) = run(scenario, ExplorationConfig::default());
    assert_eq!(outcome, MissionOutcome::TargetReached);
    assert_eq!(sim.vehicle_node(), c(2, 1));
    // (0,0) -> (0,1) -> (1,1) -> (2,1)
    assert_eq!(explorer.cycles(), 3);
}

#[test]
fn test_known_target_uses_shortest_route() {
    let mut scenario = example_scenario();
    scenario.target = Some(c(1, 0));

    let (explorer, sim, outcome) = run(scenario, ExplorationConfig::default());
    assert_eq!(outcome, MissionOutcome::TargetReached);
    assert_eq!(sim.vehicle_node(), c(1, 0));
    assert_eq!(explorer.planet().target(), Some(c(1, 0)));
}

#[test]
fn test_unreachable_target_explores_everything() {
    let mut scenario = example_scenario();
    scenario.target = Some(c(5, 5));

    let (explorer, _, outcome) = run(scenario, ExplorationConfig::default());
    assert_eq!(outcome, MissionOutcome::ExplorationCompleted);
    assert_eq!(explorer.planet().explored_nodes().len(), 6);
}

#[test]
fn test_cycle_limit() {
    let (explorer, _, outcome) = run(example_scenario(), ExplorationConfig { max_cycles: 4 });
    assert_eq!(outcome, MissionOutcome::CycleLimit);
    assert_eq!(explorer.cycles(), 4);
}

#[test]
fn test_bundled_config_matches_defaults() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("graha.toml");
    let config = GrahaConfig::load(&path).unwrap();
    assert_eq!(config.robot, RobotConfig::default());
    assert_eq!(config.exploration.max_cycles, 500);
}
