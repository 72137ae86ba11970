//! Configuration loading for GrahaNav

use crate::error::{GrahaError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct GrahaConfig {
    #[serde(default)]
    pub robot: RobotConfig,
    #[serde(default)]
    pub exploration: ExplorationConfig,
}

/// Robot physical parameters
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RobotConfig {
    /// Wheel diameter in centimeters (default: 5.6)
    #[serde(default = "default_wheel_diameter")]
    pub wheel_diameter: f64,

    /// Distance between the wheel contact points in centimeters (default: 11.6)
    #[serde(default = "default_axle_length")]
    pub axle_length: f64,

    /// Left encoder ticks per wheel revolution (default: 360)
    #[serde(default = "default_counts_per_rotation")]
    pub counts_per_rotation_left: u32,

    /// Right encoder ticks per wheel revolution (default: 360)
    #[serde(default = "default_counts_per_rotation")]
    pub counts_per_rotation_right: u32,

    /// Distance between adjacent grid nodes in centimeters (default: 50.0)
    #[serde(default = "default_grid_spacing")]
    pub grid_spacing: f64,
}

impl RobotConfig {
    /// Distance travelled by the left wheel for `ticks` encoder ticks (cm).
    #[inline]
    pub fn left_distance(&self, ticks: i32) -> f64 {
        ticks as f64 * std::f64::consts::PI * self.wheel_diameter
            / self.counts_per_rotation_left as f64
    }

    /// Distance travelled by the right wheel for `ticks` encoder ticks (cm).
    #[inline]
    pub fn right_distance(&self, ticks: i32) -> f64 {
        ticks as f64 * std::f64::consts::PI * self.wheel_diameter
            / self.counts_per_rotation_right as f64
    }

    /// Check that every parameter is physically meaningful.
    pub fn validate(&self) -> Result<()> {
        if self.wheel_diameter <= 0.0 {
            return Err(GrahaError::Config(
                "wheel_diameter must be positive".to_string(),
            ));
        }
        if self.axle_length <= 0.0 {
            return Err(GrahaError::Config("axle_length must be positive".to_string()));
        }
        if self.counts_per_rotation_left == 0 || self.counts_per_rotation_right == 0 {
            return Err(GrahaError::Config(
                "counts_per_rotation must be positive".to_string(),
            ));
        }
        if self.grid_spacing <= 0.0 {
            return Err(GrahaError::Config("grid_spacing must be positive".to_string()));
        }
        Ok(())
    }
}

impl Default for RobotConfig {
    fn default() -> Self {
        Self {
            wheel_diameter: default_wheel_diameter(),
            axle_length: default_axle_length(),
            counts_per_rotation_left: default_counts_per_rotation(),
            counts_per_rotation_right: default_counts_per_rotation(),
            grid_spacing: default_grid_spacing(),
        }
    }
}

/// Exploration configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExplorationConfig {
    /// Control cycles the mission loop runs before giving up (default: 500)
    #[serde(default = "default_max_cycles")]
    pub max_cycles: usize,
}

impl Default for ExplorationConfig {
    fn default() -> Self {
        Self {
            max_cycles: default_max_cycles(),
        }
    }
}

// Default value functions
fn default_wheel_diameter() -> f64 {
    5.6
}
fn default_axle_length() -> f64 {
    11.6
}
fn default_counts_per_rotation() -> u32 {
    360
}
fn default_grid_spacing() -> f64 {
    50.0
}
fn default_max_cycles() -> usize {
    500
}

impl GrahaConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse and validate configuration from a TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: GrahaConfig = toml::from_str(content)?;
        config.robot.validate()?;
        Ok(config)
    }
}
