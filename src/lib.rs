//! GrahaNav - grid planet exploration for a line-following robot
//!
//! The robot drives on a planet of grid nodes joined by weighted paths. It
//! builds a map of the paths it drives or is told about, estimates its node
//! by dead reckoning, and picks the next direction that brings it closer to
//! its target or to the nearest unexplored part of the planet.
//!
//! ## Modules
//!
//! - [`planet`]: path map and exploration state
//! - [`planning`]: shortest paths over the path map
//! - [`exploration`]: frontier selection and the mission loop
//! - [`odometry`]: dead-reckoning position estimate snapped to the node lattice
//! - [`sim`]: simulated planet used for offline missions and tests
//! - [`config`]: TOML configuration

pub mod config;
pub mod error;
pub mod exploration;
pub mod odometry;
pub mod planet;
pub mod planning;
pub mod sim;

pub use config::GrahaConfig;
pub use error::{GrahaError, Result};
pub use exploration::{Explorer, MissionOutcome};
pub use odometry::{Odometry, Pose};
pub use planet::{Coordinate, Direction, NodeColor, Planet, Weight};
