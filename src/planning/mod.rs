//! Path planning over the planet's path map.
//!
//! This module provides:
//! - Single-source Dijkstra with predecessor tracking
//! - Shortest hop sequence reconstruction between two nodes

mod dijkstra;

pub use dijkstra::{dijkstra, shortest_path, DijkstraState, ShortestPaths};
