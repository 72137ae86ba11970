//! Autonomous exploration.
//!
//! This module provides:
//! - Frontier selection over the planet map
//! - The mission loop driving a vehicle and talking to mission control

mod explorer;
mod frontier;

pub use explorer::{
    Explorer, KnownPath, MissionControl, MissionOutcome, MissionUpdate, PathReport, PathStatus,
    Vehicle,
};
pub use frontier::{exploration_completed, smartest_direction};
