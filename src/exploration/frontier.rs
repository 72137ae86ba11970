//! Frontier selection for autonomous exploration.
//!
//! A frontier is any unveiled node or any explored node that still has an
//! untried exit. The selector prefers an explicit target, then untried
//! exits at the current node, then the cheapest reachable frontier.

use std::collections::BTreeMap;

use crate::planet::{Coordinate, Direction, Planet};

/// Choose the next direction to travel from `coord`.
///
/// Returns `None` when there is nothing left to do from here: the vehicle
/// stands on its target, or no frontier is reachable.
///
/// `coord` is never its own frontier. If it is an unveiled node and the
/// only frontier left, this returns `None` while [`exploration_completed`]
/// still reports `false`; mark the node explored and scan it first.
pub fn smartest_direction(planet: &Planet, coord: Coordinate) -> Option<Direction> {
    if let Some(target) = planet.target() {
        if target == coord {
            tracing::debug!("On target {}", coord);
            return None;
        }

        if let Some(hops) = planet.shortest_path(coord, target) {
            if let Some(&(_, direction)) = hops.first() {
                tracing::debug!("Heading to target {} via {}", target, direction);
                return Some(direction);
            }
        }
    }

    if let Some(&direction) = planet.unexplored_directions(coord).first() {
        tracing::debug!("Taking unexplored direction {} at {}", direction, coord);
        return Some(direction);
    }

    let paths = planet.dijkstra(coord);

    let candidates: BTreeMap<Coordinate, Option<u64>> = planet
        .nodes_with_unexplored()
        .chain(planet.unveiled_nodes().iter().copied())
        .filter(|node| *node != coord)
        .map(|node| (node, paths.cost(node)))
        .collect();

    if candidates.is_empty() {
        tracing::debug!("No frontiers left");
        return None;
    }

    // Ordered map iteration with strict comparison keeps the smallest
    // coordinate among equal costs
    let mut best: Option<(Coordinate, u64)> = None;
    for (&node, &cost) in &candidates {
        let Some(cost) = cost else {
            continue;
        };
        if best.map_or(true, |(_, best_cost)| cost < best_cost) {
            best = Some((node, cost));
        }
    }

    let Some((frontier, cost)) = best else {
        tracing::warn!(
            "No reachable frontiers from {} ({} unreachable)",
            coord,
            candidates.len()
        );
        return None;
    };

    let direction = paths
        .path_to(frontier)
        .and_then(|hops| hops.first().map(|&(_, d)| d))?;

    tracing::debug!(
        "Heading to frontier {} (cost {}) via {}",
        frontier,
        cost,
        direction
    );
    Some(direction)
}

/// Whether no frontier is reachable from `coord`.
///
/// The query coordinate itself counts as reachable.
pub fn exploration_completed(planet: &Planet, coord: Coordinate) -> bool {
    let paths = planet.dijkstra(coord);

    let reachable_unveiled = planet
        .unveiled_nodes()
        .iter()
        .find(|node| paths.is_reachable(**node));
    if let Some(node) = reachable_unveiled {
        tracing::debug!("Exploration incomplete: unveiled node {} reachable", node);
        return false;
    }

    let open_node = planet
        .nodes_with_unexplored()
        .find(|node| paths.is_reachable(*node));
    if let Some(node) = open_node {
        tracing::debug!(
            "Exploration incomplete: {} has unexplored directions",
            node
        );
        return false;
    }

    true
}

impl Planet {
    /// See [`smartest_direction`].
    pub fn smartest_direction(&self, coord: Coordinate) -> Option<Direction> {
        smartest_direction(self, coord)
    }

    /// See [`exploration_completed`].
    pub fn exploration_completed(&self, coord: Coordinate) -> bool {
        exploration_completed(self, coord)
    }
}
