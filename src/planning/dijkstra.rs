//! Dijkstra's shortest path algorithm over the planet's path map.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BinaryHeap};

use crate::planet::{Coordinate, Direction, Planet};

/// State for Dijkstra's algorithm priority queue.
#[derive(Clone, Copy, Debug)]
pub struct DijkstraState {
    /// Current path cost.
    pub cost: u64,
    /// Current node.
    pub node: Coordinate,
}

impl PartialEq for DijkstraState {
    fn eq(&self, other: &Self) -> bool {
        self.cost == other.cost && self.node == other.node
    }
}

impl Eq for DijkstraState {}

impl Ord for DijkstraState {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap (BinaryHeap is max-heap by default),
        // equal costs pop the smaller coordinate first
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for DijkstraState {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Single-source result of a Dijkstra run.
///
/// Coordinates without an entry are unreachable (infinite cost).
#[derive(Clone, Debug)]
pub struct ShortestPaths {
    start: Coordinate,
    costs: BTreeMap<Coordinate, u64>,
    /// Predecessor node and the direction taken from it
    predecessors: BTreeMap<Coordinate, (Coordinate, Direction)>,
}

impl ShortestPaths {
    pub fn start(&self) -> Coordinate {
        self.start
    }

    /// Minimum cost from the start, `None` when unreachable.
    pub fn cost(&self, coord: Coordinate) -> Option<u64> {
        self.costs.get(&coord).copied()
    }

    pub fn is_reachable(&self, coord: Coordinate) -> bool {
        self.costs.contains_key(&coord)
    }

    pub fn predecessor(&self, coord: Coordinate) -> Option<(Coordinate, Direction)> {
        self.predecessors.get(&coord).copied()
    }

    /// All reached coordinates with their costs, the start included.
    pub fn costs(&self) -> &BTreeMap<Coordinate, u64> {
        &self.costs
    }

    /// Hops from the start to `target`, each the node left and the direction taken.
    ///
    /// Empty when `target` is the start, `None` when unreachable.
    pub fn path_to(&self, target: Coordinate) -> Option<Vec<(Coordinate, Direction)>> {
        if !self.is_reachable(target) {
            return None;
        }

        let mut hops = Vec::new();
        let mut current = target;
        while current != self.start {
            let (previous, direction) = self.predecessor(current)?;
            hops.push((previous, direction));
            current = previous;
        }
        hops.reverse();
        Some(hops)
    }
}

/// Compute minimum costs from `start` to every reachable coordinate.
///
/// Blocked paths stay in the map but are never relaxed.
pub fn dijkstra(planet: &Planet, start: Coordinate) -> ShortestPaths {
    let mut result = ShortestPaths {
        start,
        costs: BTreeMap::new(),
        predecessors: BTreeMap::new(),
    };
    result.costs.insert(start, 0);

    let mut heap = BinaryHeap::new();
    heap.push(DijkstraState {
        cost: 0,
        node: start,
    });

    let mut settled = 0usize;

    while let Some(DijkstraState { cost, node }) = heap.pop() {
        // Skip if we've found a better path
        if result.costs.get(&node).is_some_and(|&best| cost > best) {
            continue;
        }
        settled += 1;

        for (direction, end) in planet.paths_from(node) {
            let Some(edge_cost) = end.weight.cost() else {
                continue;
            };
            let new_cost = cost.saturating_add(edge_cost);
            let improves = result
                .costs
                .get(&end.coordinate)
                .map_or(true, |&best| new_cost < best);
            if improves {
                tracing::trace!(
                    "relax {} --{}--> {} cost {}",
                    node,
                    direction,
                    end.coordinate,
                    new_cost
                );
                result.costs.insert(end.coordinate, new_cost);
                result
                    .predecessors
                    .insert(end.coordinate, (node, direction));
                heap.push(DijkstraState {
                    cost: new_cost,
                    node: end.coordinate,
                });
            }
        }
    }

    tracing::trace!(
        "[Dijkstra] from {}: settled {} nodes, {} reachable",
        start,
        settled,
        result.costs.len()
    );

    result
}

/// Shortest hop sequence from `start` to `target`.
///
/// Empty when both are equal. `None` when `target` has no known path at
/// all or no finite-cost route exists.
pub fn shortest_path(
    planet: &Planet,
    start: Coordinate,
    target: Coordinate,
) -> Option<Vec<(Coordinate, Direction)>> {
    if start == target {
        return Some(Vec::new());
    }
    if !planet.is_known(target) {
        return None;
    }
    dijkstra(planet, start).path_to(target)
}

impl Planet {
    /// See [`dijkstra`].
    pub fn dijkstra(&self, start: Coordinate) -> ShortestPaths {
        dijkstra(self, start)
    }

    /// See [`shortest_path`].
    pub fn shortest_path(
        &self,
        start: Coordinate,
        target: Coordinate,
    ) -> Option<Vec<(Coordinate, Direction)>> {
        shortest_path(self, start, target)
    }
}
