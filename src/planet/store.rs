//! Map of known paths and exploration bookkeeping.

use std::collections::{BTreeMap, BTreeSet};

use super::types::{Coordinate, Direction, PathEnd, Weight};

/// All known paths, keyed by origin coordinate and exit direction.
pub type PathMap = BTreeMap<Coordinate, BTreeMap<Direction, PathEnd>>;

/// Graph store for one exploration run.
///
/// Every inserted path is stored in both directions, so the path map is
/// always symmetric. A coordinate is never explored and unveiled at the
/// same time.
#[derive(Clone, Debug, Default)]
pub struct Planet {
    paths: PathMap,
    /// Directions still worth trying, in scan order, per explored node
    unexplored_directions: BTreeMap<Coordinate, Vec<Direction>>,
    explored_nodes: BTreeSet<Coordinate>,
    unveiled_nodes: BTreeSet<Coordinate>,
    target: Option<Coordinate>,
}

impl Planet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a path and its reverse, overwriting earlier entries for both keys.
    ///
    /// Unveiled nodes whose four directions are all known afterwards stop
    /// being unveiled.
    pub fn add_path(
        &mut self,
        start: Coordinate,
        start_dir: Direction,
        end: Coordinate,
        end_dir: Direction,
        weight: Weight,
    ) {
        tracing::trace!(
            "add_path {} {} -> {} {} (weight {})",
            start,
            start_dir,
            end,
            end_dir,
            weight
        );

        self.paths.entry(start).or_default().insert(
            start_dir,
            PathEnd {
                coordinate: end,
                direction: end_dir,
                weight,
            },
        );
        self.paths.entry(end).or_default().insert(
            end_dir,
            PathEnd {
                coordinate: start,
                direction: start_dir,
                weight,
            },
        );

        let paths = &self.paths;
        self.unveiled_nodes.retain(|node| {
            let fully_known = paths.get(node).is_some_and(|exits| exits.len() == 4);
            if fully_known {
                tracing::debug!("Unveiled node {} fully known, dropping", node);
            }
            !fully_known
        });
    }

    /// Record the exits found by a physical scan.
    ///
    /// Only the first scan of a node counts. Exits that are already known
    /// paths are not recorded as unexplored.
    pub fn add_node_scan<I>(&mut self, coord: Coordinate, reachable: I)
    where
        I: IntoIterator<Item = (Direction, bool)>,
    {
        if self.unexplored_directions.contains_key(&coord) {
            return;
        }

        let known = self.paths.get(&coord);
        let mut unexplored: Vec<Direction> = Vec::new();
        for (direction, open) in reachable {
            if !open || unexplored.contains(&direction) {
                continue;
            }
            if known.is_some_and(|exits| exits.contains_key(&direction)) {
                continue;
            }
            unexplored.push(direction);
        }

        tracing::debug!("Scan at {}: unexplored {:?}", coord, unexplored);
        self.unexplored_directions.insert(coord, unexplored);
    }

    pub fn add_explored_node(&mut self, coord: Coordinate) {
        self.explored_nodes.insert(coord);
        self.unveiled_nodes.remove(&coord);
    }

    /// Remember a node reported to exist. Ignored for explored nodes.
    pub fn add_unveiled_node(&mut self, coord: Coordinate) {
        if !self.explored_nodes.contains(&coord) {
            self.unveiled_nodes.insert(coord);
        }
    }

    pub fn remove_unexplored_direction(&mut self, coord: Coordinate, dir: Direction) {
        if let Some(directions) = self.unexplored_directions.get_mut(&coord) {
            directions.retain(|d| *d != dir);
        }
    }

    /// Consume the directions at both ends of a traversed or revealed path.
    pub fn remove_unexplored_path(
        &mut self,
        start: Coordinate,
        start_dir: Direction,
        end: Coordinate,
        end_dir: Direction,
    ) {
        tracing::debug!(
            "Path explored: {} {} -> {} {}",
            start,
            start_dir,
            end,
            end_dir
        );
        self.remove_unexplored_direction(start, start_dir);
        self.remove_unexplored_direction(end, end_dir);
    }

    /// Whether the node at `coord` still needs a physical scan.
    pub fn should_scan(&self, coord: Coordinate) -> bool {
        if self.paths.get(&coord).is_some_and(|exits| exits.len() == 4) {
            return false;
        }
        !self.explored_nodes.contains(&coord)
    }

    pub fn on_target(&self, coord: Coordinate) -> bool {
        self.target == Some(coord)
    }

    pub fn set_target(&mut self, coord: Coordinate) {
        tracing::info!("New target: {}", coord);
        self.target = Some(coord);
    }

    pub fn clear_target(&mut self) {
        self.target = None;
    }

    pub fn target(&self) -> Option<Coordinate> {
        self.target
    }

    pub fn get_paths(&self) -> &PathMap {
        &self.paths
    }

    /// Known exits of `coord`. Unknown coordinates have none.
    pub fn paths_from(&self, coord: Coordinate) -> impl Iterator<Item = (Direction, &PathEnd)> {
        self.paths
            .get(&coord)
            .into_iter()
            .flat_map(|exits| exits.iter().map(|(d, end)| (*d, end)))
    }

    pub fn known_path(&self, coord: Coordinate, dir: Direction) -> Option<&PathEnd> {
        self.paths.get(&coord).and_then(|exits| exits.get(&dir))
    }

    /// Whether `coord` has at least one recorded path.
    pub fn is_known(&self, coord: Coordinate) -> bool {
        self.paths.contains_key(&coord)
    }

    pub fn explored_nodes(&self) -> &BTreeSet<Coordinate> {
        &self.explored_nodes
    }

    pub fn unveiled_nodes(&self) -> &BTreeSet<Coordinate> {
        &self.unveiled_nodes
    }

    /// Unexplored directions of `coord` in scan order (empty if never scanned).
    pub fn unexplored_directions(&self, coord: Coordinate) -> &[Direction] {
        self.unexplored_directions
            .get(&coord)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Nodes that still have at least one unexplored direction.
    pub fn nodes_with_unexplored(&self) -> impl Iterator<Item = Coordinate> + '_ {
        self.unexplored_directions
            .iter()
            .filter(|(_, dirs)| !dirs.is_empty())
            .map(|(coord, _)| *coord)
    }
}
