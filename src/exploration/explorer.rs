//! Mission control loop.
//!
//! Ties the planet map, the frontier selector and the position estimator
//! into the per-node cycle: drive, report, apply the confirmation and
//! remote updates, scan, choose the next direction.

use crate::config::{ExplorationConfig, RobotConfig};
use crate::error::{GrahaError, Result};
use crate::odometry::{Odometry, Pose};
use crate::planet::{Coordinate, Direction, NodeColor, Planet, Weight};

/// Whether a driven path led to a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PathStatus {
    Free,
    Blocked,
}

/// Path as driven by the vehicle, before remote confirmation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PathReport {
    pub start: Coordinate,
    pub start_direction: Direction,
    pub end: Coordinate,
    /// Direction at which the path leaves `end`.
    pub end_direction: Direction,
    pub status: PathStatus,
}

/// Confirmed path with its weight.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KnownPath {
    pub start: Coordinate,
    pub start_direction: Direction,
    pub end: Coordinate,
    pub end_direction: Direction,
    pub weight: Weight,
}

/// Information pushed by mission control between cycles.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MissionUpdate {
    /// A path the vehicle has not driven itself.
    Unveiled(KnownPath),
    /// New exploration goal.
    Target(Coordinate),
}

/// How a mission ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MissionOutcome {
    TargetReached,
    ExplorationCompleted,
    /// Nothing left to do but mission control did not confirm completion.
    Unconfirmed,
    /// The configured cycle limit was hit.
    CycleLimit,
}

/// Vehicle-side collaborator: line following, scanning and encoders.
pub trait Vehicle {
    /// Report which of the four directions have a line at the current node.
    ///
    /// The order of the returned entries is the order in which untried
    /// exits will later be chosen.
    fn scan(&mut self, heading: Direction) -> Vec<(Direction, bool)>;

    /// Follow the path leaving in `direction`, feeding encoder readings
    /// into `odometry`. Returns the color of the node reached, or
    /// `NodeColor::Invalid` if the path was blocked and the vehicle is back
    /// at its start node.
    fn drive(&mut self, direction: Direction, odometry: &mut Odometry) -> NodeColor;
}

/// Remote collaborator that owns the authoritative planet.
pub trait MissionControl {
    /// Confirm (and possibly correct) a driven path.
    fn report_path(&mut self, report: &PathReport) -> Result<KnownPath>;

    /// Announce the chosen direction. The returned direction is binding.
    fn select_path(&mut self, at: Coordinate, proposed: Direction) -> Direction;

    /// Updates received since the last poll.
    fn poll_updates(&mut self) -> Vec<MissionUpdate>;

    /// Announce arrival at the target; `true` if acknowledged.
    fn target_reached(&mut self) -> bool;

    /// Announce completed exploration; `true` if acknowledged.
    fn exploration_completed(&mut self) -> bool;
}

/// Autonomous explorer owning one planet map and one position estimator.
pub struct Explorer {
    config: ExplorationConfig,
    planet: Planet,
    odometry: Odometry,
    /// Completed drive cycles
    cycles: usize,
}

impl Explorer {
    pub fn new(robot: RobotConfig, config: ExplorationConfig) -> Self {
        Self {
            config,
            planet: Planet::new(),
            odometry: Odometry::new(robot),
            cycles: 0,
        }
    }

    pub fn planet(&self) -> &Planet {
        &self.planet
    }

    pub fn odometry(&self) -> &Odometry {
        &self.odometry
    }

    pub fn cycles(&self) -> usize {
        self.cycles
    }

    /// Run a complete mission from the first node.
    ///
    /// `world` is both the vehicle and the mission control link.
    pub fn run<W>(
        &mut self,
        world: &mut W,
        start: Pose,
        first_color: NodeColor,
    ) -> Result<MissionOutcome>
    where
        W: Vehicle + MissionControl,
    {
        let mut next = self.begin(world, start, first_color)?;

        while let Some(direction) = next {
            if self.cycles >= self.config.max_cycles {
                tracing::warn!(
                    "Cycle limit of {} reached, stopping",
                    self.config.max_cycles
                );
                return Ok(MissionOutcome::CycleLimit);
            }
            next = self.step(world, direction)?;
        }

        self.finish(world)
    }

    /// Handle the first node: bind it, scan it and choose a direction.
    pub fn begin<W>(
        &mut self,
        world: &mut W,
        start: Pose,
        first_color: NodeColor,
    ) -> Result<Option<Direction>>
    where
        W: Vehicle + MissionControl,
    {
        tracing::info!(
            "Starting at {} facing {} ({:?})",
            start.coordinate,
            start.direction,
            first_color
        );
        self.odometry.set_position(start);
        self.odometry.bind_first_node(start.coordinate, first_color)?;

        let here = start.coordinate;
        let scan = world.scan(start.direction);
        self.planet.add_node_scan(here, scan);
        self.planet.add_explored_node(here);
        // the line we arrived on is not worth exploring
        self.planet
            .remove_unexplored_direction(here, start.direction.opposite());

        self.apply_updates(world);
        Ok(self.choose(world, here))
    }

    /// Drive one path and process the arrival. Returns the next direction.
    pub fn step<W>(
        &mut self,
        world: &mut W,
        direction: Direction,
    ) -> Result<Option<Direction>>
    where
        W: Vehicle + MissionControl,
    {
        let origin = self.odometry.get_position()?.coordinate;
        self.odometry.set_direction(direction)?;

        let color = world.drive(direction, &mut self.odometry);
        let estimate = self.odometry.calculate(color)?;
        self.cycles += 1;

        let report = if color.is_valid() {
            let (end, end_direction) = match self.planet.known_path(origin, direction) {
                Some(known) => (known.coordinate, known.direction),
                None => (estimate.coordinate, estimate.direction.opposite()),
            };
            PathReport {
                start: origin,
                start_direction: direction,
                end,
                end_direction,
                status: PathStatus::Free,
            }
        } else {
            tracing::info!("Path {} {} blocked", origin, direction);
            PathReport {
                start: origin,
                start_direction: direction,
                end: origin,
                end_direction: direction,
                status: PathStatus::Blocked,
            }
        };

        let confirmed = world.report_path(&report)?;
        if confirmed.start != origin {
            return Err(GrahaError::Mission(format!(
                "confirmation starts at {} but vehicle left {}",
                confirmed.start, origin
            )));
        }
        if (confirmed.end, confirmed.end_direction) != (report.end, report.end_direction) {
            tracing::debug!(
                "Mission control corrected arrival to {} {}",
                confirmed.end,
                confirmed.end_direction
            );
        }

        self.planet.add_path(
            confirmed.start,
            confirmed.start_direction,
            confirmed.end,
            confirmed.end_direction,
            confirmed.weight,
        );
        let here = confirmed.end;
        self.odometry
            .set_position(Pose::new(here, confirmed.end_direction.opposite()));

        self.apply_updates(world);

        if self.planet.should_scan(here) {
            let heading = self.odometry.get_position()?.direction;
            let scan = world.scan(heading);
            self.planet.add_node_scan(here, scan);
        }
        self.planet.add_explored_node(here);
        self.planet.remove_unexplored_path(
            confirmed.start,
            confirmed.start_direction,
            here,
            confirmed.end_direction,
        );

        Ok(self.choose(world, here))
    }

    /// Decide how the mission ended once no direction is left.
    pub fn finish<M: MissionControl>(&mut self, control: &mut M) -> Result<MissionOutcome> {
        let here = self.odometry.get_position()?.coordinate;

        if self.planet.on_target(here) && control.target_reached() {
            tracing::info!("Target {} reached after {} cycles", here, self.cycles);
            return Ok(MissionOutcome::TargetReached);
        }

        if self.planet.exploration_completed(here) && control.exploration_completed() {
            tracing::info!(
                "Exploration completed after {} cycles ({} nodes explored)",
                self.cycles,
                self.planet.explored_nodes().len()
            );
            return Ok(MissionOutcome::ExplorationCompleted);
        }

        tracing::warn!("Mission ended at {} without confirmation", here);
        Ok(MissionOutcome::Unconfirmed)
    }

    fn apply_updates<M: MissionControl>(&mut self, control: &mut M) {
        for update in control.poll_updates() {
            match update {
                MissionUpdate::Unveiled(path) => {
                    self.planet.add_unveiled_node(path.start);
                    self.planet.add_unveiled_node(path.end);
                    self.planet.remove_unexplored_path(
                        path.start,
                        path.start_direction,
                        path.end,
                        path.end_direction,
                    );
                    self.planet.add_path(
                        path.start,
                        path.start_direction,
                        path.end,
                        path.end_direction,
                        path.weight,
                    );
                }
                MissionUpdate::Target(target) => self.planet.set_target(target),
            }
        }
    }

    fn choose<M: MissionControl>(&mut self, control: &mut M, here: Coordinate) -> Option<Direction> {
        let proposed = self.planet.smartest_direction(here)?;
        let selected = control.select_path(here, proposed);
        if selected != proposed {
            tracing::info!(
                "Mission control overrode {} with {} at {}",
                proposed,
                selected,
                here
            );
        }
        Some(selected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    /// Straight north/south line with nodes one grid apart. Mission control
    /// confirms every report with weight 1.
    #[derive(Default)]
    struct Script {
        drives: VecDeque<NodeColor>,
        updates: Vec<MissionUpdate>,
        override_with: Option<Direction>,
        reports: Vec<PathReport>,
    }

    impl Script {
        fn new(drives: &[NodeColor]) -> Self {
            Self {
                drives: drives.iter().copied().collect(),
                ..Default::default()
            }
        }
    }

    impl Vehicle for Script {
        fn scan(&mut self, _heading: Direction) -> Vec<(Direction, bool)> {
            vec![
                (Direction::North, true),
                (Direction::East, false),
                (Direction::South, true),
                (Direction::West, false),
            ]
        }

        fn drive(&mut self, _direction: Direction, odometry: &mut Odometry) -> NodeColor {
            let color = self.drives.pop_front().unwrap_or(NodeColor::Invalid);
            if color.is_valid() {
                // 1023 ticks of a 5.6 cm wheel is just under 50 cm
                odometry.add_motion_sample(0, 0);
                odometry.add_motion_sample(1023, 1023);
            }
            color
        }
    }

    impl MissionControl for Script {
        fn report_path(&mut self, report: &PathReport) -> Result<KnownPath> {
            self.reports.push(*report);
            let weight = match report.status {
                PathStatus::Free => Weight::new(1)?,
                PathStatus::Blocked => Weight::Blocked,
            };
            Ok(KnownPath {
                start: report.start,
                start_direction: report.start_direction,
                end: report.end,
                end_direction: report.end_direction,
                weight,
            })
        }

        fn select_path(&mut self, _at: Coordinate, proposed: Direction) -> Direction {
            self.override_with.take().unwrap_or(proposed)
        }

        fn poll_updates(&mut self) -> Vec<MissionUpdate> {
            std::mem::take(&mut self.updates)
        }

        fn target_reached(&mut self) -> bool {
            true
        }

        fn exploration_completed(&mut self) -> bool {
            true
        }
    }

    fn explorer() -> Explorer {
        Explorer::new(RobotConfig::default(), ExplorationConfig::default())
    }

    fn start() -> Pose {
        Pose::new(Coordinate::new(0, 0), Direction::North)
    }

    #[test]
    fn test_begin_drops_arrival_line() {
        let mut explorer = explorer();
        let mut script = Script::new(&[]);

        let next = explorer.begin(&mut script, start(), NodeColor::Red).unwrap();
        assert_eq!(next, Some(Direction::North));
        assert_eq!(
            explorer.planet().unexplored_directions(Coordinate::new(0, 0)),
            &[Direction::North]
        );
        assert!(explorer.planet().explored_nodes().contains(&Coordinate::new(0, 0)));
    }

    #[test]
    fn test_drive_to_new_node() {
        let mut explorer = explorer();
        let mut script = Script::new(&[NodeColor::Blue]);

        explorer.begin(&mut script, start(), NodeColor::Red).unwrap();
        let next = explorer.step(&mut script, Direction::North).unwrap();

        assert_eq!(
            script.reports[0],
            PathReport {
                start: Coordinate::new(0, 0),
                start_direction: Direction::North,
                end: Coordinate::new(0, 1),
                end_direction: Direction::South,
                status: PathStatus::Free,
            }
        );
        assert_eq!(
            explorer.odometry().get_position().unwrap(),
            Pose::new(Coordinate::new(0, 1), Direction::North)
        );
        // only the unknown exit is left to explore
        assert_eq!(
            explorer.planet().unexplored_directions(Coordinate::new(0, 1)),
            &[Direction::North]
        );
        assert!(explorer
            .planet()
            .unexplored_directions(Coordinate::new(0, 0))
            .is_empty());
        assert_eq!(next, Some(Direction::North));
        assert_eq!(explorer.cycles(), 1);
    }

    #[test]
    fn test_blocked_path_is_recorded() {
        let mut explorer = explorer();
        let mut script = Script::new(&[NodeColor::Invalid]);

        let outcome = explorer.run(&mut script, start(), NodeColor::Red).unwrap();
        assert_eq!(outcome, MissionOutcome::ExplorationCompleted);
        assert_eq!(script.reports.len(), 1);
        assert_eq!(script.reports[0].status, PathStatus::Blocked);

        let blocked = explorer
            .planet()
            .known_path(Coordinate::new(0, 0), Direction::North)
            .unwrap();
        assert!(blocked.weight.is_blocked());
        assert_eq!(
            explorer.odometry().get_position().unwrap(),
            Pose::new(Coordinate::new(0, 0), Direction::South)
        );
    }

    #[test]
    fn test_selection_override_is_binding() {
        let mut explorer = explorer();
        let mut script = Script {
            updates: vec![MissionUpdate::Target(Coordinate::new(0, 1))],
            override_with: Some(Direction::East),
            ..Default::default()
        };

        let next = explorer.begin(&mut script, start(), NodeColor::Red).unwrap();
        assert_eq!(next, Some(Direction::East));
        assert_eq!(explorer.planet().target(), Some(Coordinate::new(0, 1)));
    }

    #[test]
    fn test_target_reached() {
        let mut explorer = explorer();
        let mut script = Script::new(&[NodeColor::Blue]);
        script.updates.push(MissionUpdate::Target(Coordinate::new(0, 1)));

        let outcome = explorer.run(&mut script, start(), NodeColor::Red).unwrap();
        assert_eq!(outcome, MissionOutcome::TargetReached);
        assert_eq!(explorer.cycles(), 1);
    }

    #[test]
    fn test_unveiled_path_update() {
        let mut explorer = explorer();
        let mut script = Script {
            updates: vec![MissionUpdate::Unveiled(KnownPath {
                start: Coordinate::new(0, 0),
                start_direction: Direction::North,
                end: Coordinate::new(0, 1),
                end_direction: Direction::South,
                weight: Weight::new(3).unwrap(),
            })],
            ..Default::default()
        };

        explorer.begin(&mut script, start(), NodeColor::Red).unwrap();
        let planet = explorer.planet();
        assert!(planet.unexplored_directions(Coordinate::new(0, 0)).is_empty());
        assert!(planet.unveiled_nodes().contains(&Coordinate::new(0, 1)));
        assert!(!planet.unveiled_nodes().contains(&Coordinate::new(0, 0)));
    }

    #[test]
    fn test_cycle_limit() {
        let mut explorer = Explorer::new(
            RobotConfig::default(),
            ExplorationConfig { max_cycles: 0 },
        );
        let mut script = Script::new(&[]);
        let outcome = explorer.run(&mut script, start(), NodeColor::Red).unwrap();
        assert_eq!(outcome, MissionOutcome::CycleLimit);
    }
}
