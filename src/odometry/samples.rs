//! Buffered encoder readings and differential drive integration.

use crate::config::RobotConfig;

/// Turn angles below this (radians) are integrated as straight motion.
const STRAIGHT_EPSILON: f64 = 1e-9;

/// Displacement accumulated over one batch of samples.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Displacement {
    /// Eastward displacement in grid units.
    pub dx: f64,
    /// Northward displacement in grid units.
    pub dy: f64,
    /// Heading after the batch (radians, clockwise from north).
    pub heading: f64,
}

/// Queue of cumulative (left, right) encoder readings awaiting integration.
///
/// Readings are integrated pairwise, so the first reading of a batch only
/// serves as the baseline for the second.
#[derive(Clone, Debug, Default)]
pub struct MotionSamples {
    readings: Vec<(i32, i32)>,
}

impl MotionSamples {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, left: i32, right: i32) {
        self.readings.push((left, right));
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    /// Integrate all buffered readings starting from `heading` and empty the queue.
    pub fn drain_and_integrate(&mut self, robot: &RobotConfig, heading: f64) -> Displacement {
        let mut displacement = Displacement {
            dx: 0.0,
            dy: 0.0,
            heading,
        };

        for pair in self.readings.windows(2) {
            let (prev_left, prev_right) = pair[0];
            let (left, right) = pair[1];

            let step = integrate_step(
                robot,
                left.wrapping_sub(prev_left),
                right.wrapping_sub(prev_right),
                displacement.heading,
            );
            displacement.dx += step.dx;
            displacement.dy += step.dy;
            displacement.heading = step.heading;
        }

        tracing::trace!(
            "Integrated {} readings: ({:.2}cm, {:.2}cm)",
            self.readings.len(),
            displacement.dx,
            displacement.dy
        );
        self.readings.clear();

        displacement.dx /= robot.grid_spacing;
        displacement.dy /= robot.grid_spacing;
        displacement
    }
}

/// Arc motion for one pair of tick deltas, in centimeters.
fn integrate_step(robot: &RobotConfig, left_ticks: i32, right_ticks: i32, heading: f64) -> Displacement {
    let distance_left = robot.left_distance(left_ticks);
    let distance_right = robot.right_distance(right_ticks);

    // Positive angle turns counter-clockwise, which lowers a compass heading
    let angle = (distance_right - distance_left) / robot.axle_length;
    let half = angle / 2.0;

    let chord = if angle.abs() < STRAIGHT_EPSILON {
        (distance_left + distance_right) / 2.0
    } else {
        (distance_left + distance_right) / -angle * (-half).sin()
    };

    Displacement {
        dx: (heading - half).sin() * chord,
        dy: (heading - half).cos() * chord,
        heading: heading - angle,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::{FRAC_PI_2, PI};

    /// 1 tick = 1 cm on both wheels, 10 cm axle, 1 cm grid.
    fn unit_robot() -> RobotConfig {
        RobotConfig {
            wheel_diameter: 360.0 / PI,
            axle_length: 10.0,
            counts_per_rotation_left: 360,
            counts_per_rotation_right: 360,
            grid_spacing: 1.0,
        }
    }

    #[test]
    fn test_empty_and_single_reading() {
        let robot = unit_robot();
        let mut samples = MotionSamples::new();
        assert_eq!(
            samples.drain_and_integrate(&robot, 1.0),
            Displacement {
                dx: 0.0,
                dy: 0.0,
                heading: 1.0
            }
        );

        samples.push(100, 100);
        let d = samples.drain_and_integrate(&robot, 0.0);
        assert_eq!(d.dx, 0.0);
        assert_eq!(d.dy, 0.0);
        assert!(samples.is_empty());
    }

    #[test]
    fn test_straight_north_and_east() {
        let robot = unit_robot();
        let mut samples = MotionSamples::new();
        samples.push(0, 0);
        samples.push(50, 50);
        samples.push(100, 100);

        let d = samples.drain_and_integrate(&robot, 0.0);
        assert_relative_eq!(d.dx, 0.0, epsilon = 1e-9);
        assert_relative_eq!(d.dy, 100.0, epsilon = 1e-9);
        assert_relative_eq!(d.heading, 0.0, epsilon = 1e-12);

        samples.push(0, 0);
        samples.push(30, 30);
        let d = samples.drain_and_integrate(&robot, FRAC_PI_2);
        assert_relative_eq!(d.dx, 30.0, epsilon = 1e-9);
        assert_relative_eq!(d.dy, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_turn_in_place() {
        let robot = unit_robot();
        let mut samples = MotionSamples::new();
        // quarter turn clockwise: left wheel forward, right wheel back
        let arc = (FRAC_PI_2 * robot.axle_length / 2.0).round() as i32;
        samples.push(0, 0);
        samples.push(arc, -arc);

        let d = samples.drain_and_integrate(&robot, 0.0);
        assert_relative_eq!(d.dx, 0.0, epsilon = 1e-9);
        assert_relative_eq!(d.dy, 0.0, epsilon = 1e-9);
        assert_relative_eq!(d.heading, 2.0 * arc as f64 / robot.axle_length, epsilon = 1e-9);
    }

    #[test]
    fn test_arc_chord() {
        let robot = unit_robot();
        // quarter circle to the right, radius 20 cm around the axle midpoint
        let radius = 20.0;
        let half_axle = robot.axle_length / 2.0;
        let left = ((radius + half_axle) * FRAC_PI_2) as i32;
        let right = ((radius - half_axle) * FRAC_PI_2) as i32;

        let mut samples = MotionSamples::new();
        samples.push(0, 0);
        samples.push(left, right);
        let d = samples.drain_and_integrate(&robot, 0.0);

        let angle = (left - right) as f64 / robot.axle_length;
        let r = (left + right) as f64 / 2.0 / angle;
        // ends up east and north of the start, facing roughly east
        assert_relative_eq!(d.dx, r * (1.0 - angle.cos()), epsilon = 1e-6);
        assert_relative_eq!(d.dy, r * angle.sin(), epsilon = 1e-6);
        assert_relative_eq!(d.heading, angle, epsilon = 1e-9);
    }

    #[test]
    fn test_grid_scaling() {
        let robot = RobotConfig {
            grid_spacing: 50.0,
            ..unit_robot()
        };
        let mut samples = MotionSamples::new();
        samples.push(10, 10);
        samples.push(110, 110);
        let d = samples.drain_and_integrate(&robot, PI);
        assert_relative_eq!(d.dx, 0.0, epsilon = 1e-9);
        assert_relative_eq!(d.dy, -2.0, epsilon = 1e-9);
    }
}
