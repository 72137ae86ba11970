//! Planet map: known paths between grid nodes and exploration state.
//!
//! Paths are directed edges between (coordinate, direction) pairs and are
//! always stored together with their reverse. Besides the path map the
//! planet tracks which nodes have been visited, which have only been
//! reported, and which exits of visited nodes are still untried.

mod store;
mod types;

pub use store::{PathMap, Planet};
pub use types::{Coordinate, Direction, NodeColor, PathEnd, Weight};
