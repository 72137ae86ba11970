//! Simulated planet for offline missions.
//!
//! A scenario file describes the ground truth: every path with its weight,
//! the start node and, optionally, a target and paths that mission control
//! reveals once the vehicle reaches a given node. `SimulatedPlanet` plays
//! both the vehicle and mission control against that ground truth and
//! produces wheel encoder readings for every drive.
//!
//! ```toml
//! name = "corridor"
//! start = [0, 0]
//! start_direction = "north"
//! start_color = "red"
//!
//! [[paths]]
//! start = [0, 0]
//! start_direction = "north"
//! end = [0, 1]
//! end_direction = "south"
//! weight = 1
//! ```

use std::collections::BTreeMap;
use std::f64::consts::{PI, TAU};
use std::path::Path;

use serde::Deserialize;

use crate::config::RobotConfig;
use crate::error::{GrahaError, Result};
use crate::exploration::{
    KnownPath, MissionControl, MissionUpdate, PathReport, PathStatus, Vehicle,
};
use crate::odometry::{Odometry, Pose};
use crate::planet::{Coordinate, Direction, NodeColor, Weight};

/// Wheel travel per encoder reading while driving straight (cm).
const STRAIGHT_STEP_CM: f64 = 10.0;

/// Encoder readings emitted per in-place turn.
const TURN_STEPS: usize = 4;

/// Ground truth loaded from TOML.
#[derive(Debug, Deserialize)]
pub struct PlanetScenario {
    /// Scenario name (used in logs)
    pub name: String,
    /// First node, reached by following the start line
    pub start: Coordinate,
    /// Heading on arrival at the first node
    #[serde(default = "default_start_direction")]
    pub start_direction: Direction,
    /// Color of the first node
    #[serde(default = "default_start_color")]
    pub start_color: NodeColor,
    /// Target announced by mission control right after the start
    #[serde(default)]
    pub target: Option<Coordinate>,
    #[serde(default)]
    pub paths: Vec<ScenarioPath>,
}

/// One ground truth path.
#[derive(Debug, Deserialize)]
pub struct ScenarioPath {
    pub start: Coordinate,
    pub start_direction: Direction,
    pub end: Coordinate,
    pub end_direction: Direction,
    /// Positive cost, or -1 for a blocked path
    pub weight: i32,
    /// Node whose arrival makes mission control reveal this path
    #[serde(default)]
    pub revealed_at: Option<Coordinate>,
}

fn default_start_direction() -> Direction {
    Direction::North
}

fn default_start_color() -> NodeColor {
    NodeColor::Red
}

impl PlanetScenario {
    /// Load a scenario from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }
}

/// Vehicle and mission control backed by a ground truth planet.
pub struct SimulatedPlanet {
    name: String,
    robot: RobotConfig,
    start: Pose,
    start_color: NodeColor,
    /// Every path keyed by both of its ends
    truth: BTreeMap<(Coordinate, Direction), KnownPath>,
    /// Paths waiting for the vehicle to reach their reveal node
    hidden: Vec<(Coordinate, KnownPath)>,
    pending: Vec<MissionUpdate>,
    target: Option<Coordinate>,
    /// True vehicle node
    at: Coordinate,
    /// True heading in radians, clockwise from north
    heading: f64,
    /// Cumulative wheel rotation in encoder ticks
    encoders: (f64, f64),
    drives: usize,
}

impl SimulatedPlanet {
    pub fn new(scenario: PlanetScenario, robot: RobotConfig) -> Result<Self> {
        robot.validate()?;
        if !scenario.start_color.is_valid() {
            return Err(GrahaError::InvalidNodeColor);
        }

        let mut truth = BTreeMap::new();
        let mut hidden = Vec::new();
        for path in &scenario.paths {
            let weight = Weight::new(path.weight)?;
            let forward = KnownPath {
                start: path.start,
                start_direction: path.start_direction,
                end: path.end,
                end_direction: path.end_direction,
                weight,
            };
            let backward = KnownPath {
                start: path.end,
                start_direction: path.end_direction,
                end: path.start,
                end_direction: path.start_direction,
                weight,
            };
            truth.insert((forward.start, forward.start_direction), forward);
            truth.insert((backward.start, backward.start_direction), backward);

            if let Some(node) = path.revealed_at {
                hidden.push((node, forward));
            }
        }

        let start = Pose::new(scenario.start, scenario.start_direction);
        let mut sim = Self {
            name: scenario.name,
            robot,
            start,
            start_color: scenario.start_color,
            truth,
            hidden,
            pending: Vec::new(),
            target: scenario.target,
            at: start.coordinate,
            heading: start.direction.radians(),
            encoders: (0.0, 0.0),
            drives: 0,
        };

        if let Some(target) = sim.target {
            sim.pending.push(MissionUpdate::Target(target));
        }
        sim.reveal_at(sim.at);

        tracing::info!(
            "Simulated planet '{}': {} paths, start {}",
            sim.name,
            scenario.paths.len(),
            sim.at
        );
        Ok(sim)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn start_pose(&self) -> Pose {
        self.start
    }

    pub fn start_color(&self) -> NodeColor {
        self.start_color
    }

    /// True node the vehicle stands on.
    pub fn vehicle_node(&self) -> Coordinate {
        self.at
    }

    /// Number of drives, blocked ones included.
    pub fn drives(&self) -> usize {
        self.drives
    }

    /// Ground truth path leaving `coord` in `direction`.
    pub fn truth(&self, coord: Coordinate, direction: Direction) -> Option<&KnownPath> {
        self.truth.get(&(coord, direction))
    }

    pub fn truth_paths(&self) -> impl Iterator<Item = &KnownPath> {
        self.truth.values()
    }

    fn color_of(&self, coord: Coordinate) -> NodeColor {
        if coord.parity() == self.start.coordinate.parity() {
            self.start_color
        } else {
            self.start_color.other()
        }
    }

    fn reveal_at(&mut self, node: Coordinate) {
        let (revealed, hidden): (Vec<_>, Vec<_>) = std::mem::take(&mut self.hidden)
            .into_iter()
            .partition(|(at, _)| *at == node);
        self.hidden = hidden;

        for (_, path) in revealed {
            tracing::debug!(
                "Revealing {} {} -> {} {}",
                path.start,
                path.start_direction,
                path.end,
                path.end_direction
            );
            self.pending.push(MissionUpdate::Unveiled(path));
        }
    }

    fn ticks(&self, left_cm: f64, right_cm: f64) -> (f64, f64) {
        let circumference = PI * self.robot.wheel_diameter;
        (
            left_cm * self.robot.counts_per_rotation_left as f64 / circumference,
            right_cm * self.robot.counts_per_rotation_right as f64 / circumference,
        )
    }

    fn emit(&mut self, left_cm: f64, right_cm: f64, odometry: &mut Odometry) {
        let (left, right) = self.ticks(left_cm, right_cm);
        self.encoders.0 += left;
        self.encoders.1 += right;
        odometry.add_motion_sample(self.encoders.0.round() as i32, self.encoders.1.round() as i32);
    }

    /// Turn in place to `heading`, taking the shorter way round.
    fn turn_to(&mut self, heading: f64, odometry: &mut Odometry) {
        let mut delta = (heading - self.heading).rem_euclid(TAU);
        if delta > PI {
            delta -= TAU;
        }
        if delta.abs() < 1e-9 {
            return;
        }

        // clockwise: left wheel forward, right wheel back
        let arc = delta / TURN_STEPS as f64 * self.robot.axle_length / 2.0;
        for _ in 0..TURN_STEPS {
            self.emit(arc, -arc, odometry);
        }
        self.heading = heading;
    }

    fn forward(&mut self, distance_cm: f64, odometry: &mut Odometry) {
        let steps = (distance_cm / STRAIGHT_STEP_CM).ceil().max(1.0) as usize;
        let step = distance_cm / steps as f64;
        for _ in 0..steps {
            self.emit(step, step, odometry);
        }
    }
}

impl Vehicle for SimulatedPlanet {
    /// Sweeps counter-clockwise starting at `heading`.
    fn scan(&mut self, heading: Direction) -> Vec<(Direction, bool)> {
        let order = [
            heading,
            heading.counter_clockwise(),
            heading.opposite(),
            heading.clockwise(),
        ];
        order
            .into_iter()
            .map(|direction| (direction, self.truth.contains_key(&(self.at, direction))))
            .collect()
    }

    fn drive(&mut self, direction: Direction, odometry: &mut Odometry) -> NodeColor {
        self.drives += 1;
        // the vehicle turned on the node before driving off
        self.heading = direction.radians();
        self.emit(0.0, 0.0, odometry);

        let Some(path) = self.truth.get(&(self.at, direction)).copied() else {
            tracing::warn!("No line leaves {} {}, staying put", self.at, direction);
            return NodeColor::Invalid;
        };
        if path.weight.is_blocked() {
            tracing::debug!("Obstacle on {} {}, returning", self.at, direction);
            return NodeColor::Invalid;
        }

        if path.end != self.at {
            let dx = (path.end.x - self.at.x) as f64 * self.robot.grid_spacing;
            let dy = (path.end.y - self.at.y) as f64 * self.robot.grid_spacing;
            self.turn_to(dx.atan2(dy), odometry);
            self.forward(dx.hypot(dy), odometry);
        }
        self.turn_to(path.end_direction.opposite().radians(), odometry);

        self.at = path.end;
        self.color_of(path.end)
    }
}

impl MissionControl for SimulatedPlanet {
    fn report_path(&mut self, report: &PathReport) -> Result<KnownPath> {
        if report.status == PathStatus::Blocked {
            return Ok(KnownPath {
                start: report.start,
                start_direction: report.start_direction,
                end: report.start,
                end_direction: report.start_direction,
                weight: Weight::Blocked,
            });
        }

        let path = self
            .truth
            .get(&(report.start, report.start_direction))
            .copied()
            .ok_or_else(|| {
                GrahaError::Mission(format!(
                    "no path leaves {} {}",
                    report.start, report.start_direction
                ))
            })?;

        if (path.end, path.end_direction) != (report.end, report.end_direction) {
            tracing::warn!(
                "Reported arrival {} {} corrected to {} {}",
                report.end,
                report.end_direction,
                path.end,
                path.end_direction
            );
        }

        self.reveal_at(path.end);
        Ok(path)
    }

    fn select_path(&mut self, at: Coordinate, proposed: Direction) -> Direction {
        tracing::debug!("Path select at {}: {}", at, proposed);
        proposed
    }

    fn poll_updates(&mut self) -> Vec<MissionUpdate> {
        std::mem::take(&mut self.pending)
    }

    fn target_reached(&mut self) -> bool {
        self.target == Some(self.at)
    }

    fn exploration_completed(&mut self) -> bool {
        true
    }
}
