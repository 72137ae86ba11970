//! Error types for GrahaNav

use thiserror::Error;

/// GrahaNav error type
#[derive(Error, Debug)]
pub enum GrahaError {
    /// Path weight of zero, or a negative weight other than the blocked sentinel.
    #[error("Invalid path weight: {0} (expected -1 or a positive cost)")]
    InvalidWeight(i32),

    /// Heading in degrees that is not one of the four cardinal directions.
    #[error("Invalid direction: {0} degrees")]
    InvalidDirection(i32),

    #[error("Position has not been set")]
    PositionUnset,

    #[error("First node has not been bound")]
    FirstNodeUnbound,

    /// A node color was required but the sensor reported none.
    #[error("Node color must be red or blue")]
    InvalidNodeColor,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Mission error: {0}")]
    Mission(String),
}

impl From<toml::de::Error> for GrahaError {
    fn from(e: toml::de::Error) -> Self {
        GrahaError::Config(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GrahaError>;
