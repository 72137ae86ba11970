//! Core planet types: coordinates, directions, weights and path entries.

use std::fmt;
use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

use crate::error::{GrahaError, Result};

/// Grid intersection identified by integer (x, y).
///
/// Ordered lexicographically (x first, then y). That ordering is the
/// tie-break used everywhere costs are equal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "[i32; 2]", into = "[i32; 2]")]
pub struct Coordinate {
    pub x: i32,
    pub y: i32,
}

impl Coordinate {
    /// Create a new coordinate
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Checkerboard parity: 0 when x + y is even, 1 when odd.
    #[inline]
    pub fn parity(&self) -> i32 {
        (self.x.rem_euclid(2) + self.y.rem_euclid(2)) % 2
    }

    /// Euclidean distance to a continuous point in grid units.
    #[inline]
    pub fn distance_to(&self, x: f64, y: f64) -> f64 {
        let dx = self.x as f64 - x;
        let dy = self.y as f64 - y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Four orthogonal neighbours in direction order. Wraps at the `i32` bounds.
    pub fn neighbors_4(&self) -> [Coordinate; 4] {
        [
            Coordinate::new(self.x, self.y.wrapping_add(1)),
            Coordinate::new(self.x.wrapping_add(1), self.y),
            Coordinate::new(self.x, self.y.wrapping_sub(1)),
            Coordinate::new(self.x.wrapping_sub(1), self.y),
        ]
    }
}

impl From<(i32, i32)> for Coordinate {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

impl From<[i32; 2]> for Coordinate {
    fn from([x, y]: [i32; 2]) -> Self {
        Self::new(x, y)
    }
}

impl From<Coordinate> for [i32; 2] {
    fn from(c: Coordinate) -> Self {
        [c.x, c.y]
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Cardinal travel heading. North is +y, east is +x.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    /// All directions in clockwise order starting at north.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Heading in degrees (0, 90, 180 or 270).
    #[inline]
    pub fn degrees(self) -> i32 {
        match self {
            Direction::North => 0,
            Direction::East => 90,
            Direction::South => 180,
            Direction::West => 270,
        }
    }

    /// Heading in radians, clockwise from north.
    #[inline]
    pub fn radians(self) -> f64 {
        (self.degrees() as f64).to_radians()
    }

    /// Nearest cardinal direction to a heading in radians (clockwise from north).
    pub fn from_radians(heading: f64) -> Self {
        let degrees = heading.to_degrees().rem_euclid(360.0);
        let quarter = ((degrees / 90.0).round() as i32).rem_euclid(4);
        Self::ALL[quarter as usize]
    }

    /// Rotate by whole quarter turns (positive is clockwise).
    pub fn rotate(self, quarters: i32) -> Self {
        let index = self.degrees() / 90;
        Self::ALL[(index + quarters.rem_euclid(4)).rem_euclid(4) as usize]
    }

    #[inline]
    pub fn opposite(self) -> Self {
        self.rotate(2)
    }

    #[inline]
    pub fn clockwise(self) -> Self {
        self.rotate(1)
    }

    #[inline]
    pub fn counter_clockwise(self) -> Self {
        self.rotate(-1)
    }
}

impl TryFrom<i32> for Direction {
    type Error = GrahaError;

    fn try_from(degrees: i32) -> Result<Self> {
        match degrees.rem_euclid(360) {
            0 => Ok(Direction::North),
            90 => Ok(Direction::East),
            180 => Ok(Direction::South),
            270 => Ok(Direction::West),
            _ => Err(GrahaError::InvalidDirection(degrees)),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::North => "N",
            Direction::East => "E",
            Direction::South => "S",
            Direction::West => "W",
        };
        write!(f, "{}", name)
    }
}

/// Path traversal cost.
///
/// On the wire a weight is a signed integer: `-1` marks a path that is
/// known to be blocked, positive values are costs, `0` never occurs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Weight {
    /// Path exists but can never be traversed.
    Blocked,
    /// Positive traversal cost.
    Cost(NonZeroU32),
}

impl Weight {
    /// Validate a signed wire weight.
    pub fn new(raw: i32) -> Result<Self> {
        match raw {
            -1 => Ok(Weight::Blocked),
            w if w > 0 => NonZeroU32::new(w as u32)
                .map(Weight::Cost)
                .ok_or(GrahaError::InvalidWeight(raw)),
            _ => Err(GrahaError::InvalidWeight(raw)),
        }
    }

    /// Traversal cost, or `None` for a blocked path.
    #[inline]
    pub fn cost(&self) -> Option<u64> {
        match self {
            Weight::Blocked => None,
            Weight::Cost(c) => Some(c.get() as u64),
        }
    }

    #[inline]
    pub fn is_blocked(&self) -> bool {
        matches!(self, Weight::Blocked)
    }

    /// Signed wire value (-1 for blocked).
    pub fn raw(&self) -> i32 {
        match self {
            Weight::Blocked => -1,
            Weight::Cost(c) => c.get() as i32,
        }
    }
}

impl TryFrom<i32> for Weight {
    type Error = GrahaError;

    fn try_from(raw: i32) -> Result<Self> {
        Weight::new(raw)
    }
}

impl fmt::Display for Weight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw())
    }
}

/// Far end of a path entry as seen from its origin.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PathEnd {
    pub coordinate: Coordinate,
    /// Direction at which the path leaves `coordinate`.
    pub direction: Direction,
    pub weight: Weight,
}

/// Color of a node as classified by the vehicle's sensor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeColor {
    Red,
    Blue,
    /// No node detected (the path was blocked).
    Invalid,
}

impl NodeColor {
    /// The other valid color. `Invalid` stays invalid.
    pub fn other(self) -> Self {
        match self {
            NodeColor::Red => NodeColor::Blue,
            NodeColor::Blue => NodeColor::Red,
            NodeColor::Invalid => NodeColor::Invalid,
        }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        !matches!(self, NodeColor::Invalid)
    }
}
