//! Dead-reckoning position estimator for a differential drive vehicle.
//!
//! Encoder readings are buffered while the vehicle follows a path. On
//! arrival at a node the batch is integrated into a displacement, added to
//! the last node position, and snapped onto the node lattice using the
//! observed node color. Nodes form a checkerboard: two nodes share a color
//! exactly when their `x + y` parities match.
//!
//! # Example
//!
//! ```rust
//! use graha_nav::config::RobotConfig;
//! use graha_nav::odometry::{Odometry, Pose};
//! use graha_nav::planet::{Coordinate, Direction, NodeColor};
//!
//! let mut odom = Odometry::new(RobotConfig::default());
//! odom.set_position(Pose::new(Coordinate::new(0, 0), Direction::North));
//! odom.bind_first_node(Coordinate::new(0, 0), NodeColor::Red).unwrap();
//!
//! // No movement: the pose is unchanged
//! let pose = odom.calculate(NodeColor::Red).unwrap();
//! assert_eq!(pose.coordinate, Coordinate::new(0, 0));
//! ```

mod lattice;
mod samples;

pub use lattice::snap_to_lattice;
pub use samples::{Displacement, MotionSamples};

use crate::config::RobotConfig;
use crate::error::{GrahaError, Result};
use crate::planet::{Coordinate, Direction, NodeColor};

/// Discrete vehicle pose: the node it stands on and the way it faces.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pose {
    pub coordinate: Coordinate,
    pub direction: Direction,
}

impl Pose {
    pub fn new(coordinate: Coordinate, direction: Direction) -> Self {
        Self {
            coordinate,
            direction,
        }
    }
}

/// Unsnapped working estimate in grid units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ContinuousPose {
    pub x: f64,
    pub y: f64,
    /// Heading in radians, clockwise from north.
    pub heading: f64,
}

/// Dead-reckoning estimator.
#[derive(Clone, Debug)]
pub struct Odometry {
    robot: RobotConfig,
    /// Authoritative discrete pose
    position: Option<Pose>,
    /// First visited node and its color, fixes the color parity of the lattice
    first_node: Option<(Coordinate, NodeColor)>,
    samples: MotionSamples,
    /// Estimate from the last `calculate`, before snapping
    estimate: Option<ContinuousPose>,
}

impl Odometry {
    pub fn new(robot: RobotConfig) -> Self {
        Self {
            robot,
            position: None,
            first_node: None,
            samples: MotionSamples::new(),
            estimate: None,
        }
    }

    pub fn robot(&self) -> &RobotConfig {
        &self.robot
    }

    /// Buffer one cumulative (left, right) encoder reading.
    pub fn add_motion_sample(&mut self, left: i32, right: i32) {
        self.samples.push(left, right);
    }

    /// Number of readings waiting for the next `calculate`.
    pub fn pending_samples(&self) -> usize {
        self.samples.len()
    }

    pub fn set_position(&mut self, pose: Pose) {
        tracing::debug!("Position set to {} facing {}", pose.coordinate, pose.direction);
        self.position = Some(pose);
    }

    pub fn position(&self) -> Option<Pose> {
        self.position
    }

    pub fn get_position(&self) -> Result<Pose> {
        self.position.ok_or(GrahaError::PositionUnset)
    }

    /// Change heading after an in-place turn at the current node.
    pub fn set_direction(&mut self, direction: Direction) -> Result<()> {
        let pose = self.position.as_mut().ok_or(GrahaError::PositionUnset)?;
        pose.direction = direction;
        Ok(())
    }

    /// Remember the first node and its color.
    pub fn bind_first_node(&mut self, coordinate: Coordinate, color: NodeColor) -> Result<()> {
        if !color.is_valid() {
            return Err(GrahaError::InvalidNodeColor);
        }
        self.first_node = Some((coordinate, color));
        Ok(())
    }

    pub fn first_node(&self) -> Option<(Coordinate, NodeColor)> {
        self.first_node
    }

    /// Last unsnapped estimate, if `calculate` has run.
    pub fn estimate(&self) -> Option<ContinuousPose> {
        self.estimate
    }

    /// Lattice parity that nodes of `color` have. `None` for an invalid color.
    fn parity_of(&self, color: NodeColor) -> Result<Option<i32>> {
        if !color.is_valid() {
            return Ok(None);
        }
        let (first_coord, first_color) = self.first_node.ok_or(GrahaError::FirstNodeUnbound)?;
        let first_parity = first_coord.parity();
        Ok(Some(if color == first_color {
            first_parity
        } else {
            1 - first_parity
        }))
    }

    /// Integrate buffered readings and snap onto the node lattice.
    ///
    /// The buffer is consumed. With `NodeColor::Invalid` the estimate snaps
    /// to the nearest node of either color.
    pub fn calculate(&mut self, color: NodeColor) -> Result<Pose> {
        let pose = self.get_position()?;
        let parity = self.parity_of(color)?;

        let displacement = self
            .samples
            .drain_and_integrate(&self.robot, pose.direction.radians());

        tracing::debug!(
            "[Odometry] moved approx. by ({:.3}, {:.3})",
            displacement.dx,
            displacement.dy
        );

        let estimate = ContinuousPose {
            x: pose.coordinate.x as f64 + displacement.dx,
            y: pose.coordinate.y as f64 + displacement.dy,
            heading: displacement.heading,
        };
        let snapped = Pose::new(
            snap_to_lattice(estimate.x, estimate.y, parity),
            Direction::from_radians(estimate.heading),
        );

        tracing::info!(
            "[Odometry] new position: {} heading {}",
            snapped.coordinate,
            snapped.direction
        );

        self.estimate = Some(estimate);
        self.position = Some(snapped);
        Ok(snapped)
    }
}
