//! # Route Generation
//!
//! Builds a [`RouteGraph`] between two regions in four passes:
//!
//! 1. Main path: jittered waypoints along the straight line, snapped to the grid
//! 2. Nodes: origin, waypoints, destination
//! 3. Branches: optional side nodes 2-3 cells off the main path
//! 4. Connections: main-path links, then a dense pass linking nearby nodes
//!
//! All randomness comes from the caller's RNG, so a seeded RNG reproduces
//! the same graph.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{RouteError, RouteResult};
use crate::grid::{GridCoord, RegionGrid};
use crate::route::graph::{Direction, NodeId, RouteGraph};

/// Endpoints closer than this are linked directly.
const DIRECT_LINK_DISTANCE: f32 = 1.5;

/// Branch nodes must keep at least this distance from every other node.
const BRANCH_CLEARANCE: f32 = 2.0;

/// Generation knobs.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutePreferences {
    /// Grid distance covered by one main-path segment.
    pub max_segment_distance: f32,
    /// Radius of the random waypoint offset.
    pub route_deviation: f32,
    /// Probability a main-path waypoint spawns a branch.
    pub branch_chance: f32,
    /// Dense pass: link nodes at most this far apart.
    pub max_connection_distance: f32,
    /// Dense pass: outgoing-edge cap per node.
    pub max_connections_per_node: usize,
}

impl Default for RoutePreferences {
    fn default() -> Self {
        Self {
            max_segment_distance: 4.0,
            route_deviation: 1.5,
            branch_chance: 0.3,
            max_connection_distance: 3.0,
            max_connections_per_node: 3,
        }
    }
}

/// Route generator over a region grid.
pub struct RouteGenerator<'a> {
    grid: &'a RegionGrid,
}

impl<'a> RouteGenerator<'a> {
    /// Creates a generator reading `grid`.
    #[must_use]
    pub const fn new(grid: &'a RegionGrid) -> Self {
        Self { grid }
    }

    /// Generates a route from `origin` to `destination`.
    ///
    /// # Errors
    ///
    /// `OutOfBounds` if either endpoint lies outside the grid.
    pub fn generate_route<R: Rng + ?Sized>(
        &self,
        origin: GridCoord,
        destination: GridCoord,
        prefs: &RoutePreferences,
        rng: &mut R,
    ) -> RouteResult<RouteGraph> {
        let origin_region = self
            .grid
            .get(origin)
            .ok_or(RouteError::OutOfBounds { x: origin.x, y: origin.y })?;
        let destination_region = self
            .grid
            .get(destination)
            .ok_or(RouteError::OutOfBounds { x: destination.x, y: destination.y })?;

        let mut graph = RouteGraph::new(origin_region, destination_region);

        for waypoint in self.main_path_waypoints(origin, destination, prefs, rng) {
            if let Some(region) = self.grid.get(waypoint) {
                graph.insert_waypoint(region);
            }
        }

        self.add_branches(&mut graph, prefs, rng);

        let main_path = graph.main_path().to_vec();
        for pair in main_path.windows(2) {
            graph.connect(pair[0], pair[1]);
        }

        add_dense_connections(&mut graph, prefs);

        tracing::debug!(
            "Generated route {} -> {}: {} nodes, {} edges",
            origin,
            destination,
            graph.nodes().len(),
            graph.edge_count()
        );
        Ok(graph)
    }

    /// Intermediate waypoints, excluding both endpoints, in travel order.
    fn main_path_waypoints<R: Rng + ?Sized>(
        &self,
        origin: GridCoord,
        destination: GridCoord,
        prefs: &RoutePreferences,
        rng: &mut R,
    ) -> Vec<GridCoord> {
        let total = origin.distance(destination);
        if total <= DIRECT_LINK_DISTANCE {
            return Vec::new();
        }

        let count = if prefs.max_segment_distance > 0.0 {
            ((total / prefs.max_segment_distance).floor() as usize).max(1)
        } else {
            1
        };

        let start = origin.as_vec2();
        let end = destination.as_vec2();
        let mut waypoints: Vec<GridCoord> = Vec::with_capacity(count);

        for i in 1..=count {
            let progress = i as f32 / (count + 1) as f32;
            let (ox, oy) = random_in_unit_disc(rng);
            let point = start.lerp(end, progress);
            let jittered = GridCoord::new(
                (point.x + ox * prefs.route_deviation).round() as i32,
                (point.y + oy * prefs.route_deviation).round() as i32,
            );
            let snapped = self.grid.clamp(jittered);

            if snapped == origin || snapped == destination || waypoints.contains(&snapped) {
                continue;
            }
            waypoints.push(snapped);
        }

        if waypoints.is_empty() {
            tracing::debug!("Main path {} -> {} collapsed to a direct link", origin, destination);
        }
        waypoints
    }

    fn add_branches<R: Rng + ?Sized>(&self, graph: &mut RouteGraph, prefs: &RoutePreferences, rng: &mut R) {
        let main_path = graph.main_path().to_vec();
        if main_path.len() < 3 {
            return;
        }

        for &id in &main_path[1..main_path.len() - 1] {
            if rng.gen::<f32>() >= prefs.branch_chance {
                continue;
            }
            let Some(anchor) = graph.node(id).map(|node| node.coord) else {
                continue;
            };
            let Some(direction) = Direction::ALL.choose(rng).copied() else {
                continue;
            };
            let length = rng.gen_range(2..=3);
            let step = direction.offset();
            let position = self.grid.clamp(GridCoord::new(anchor.x + step.x * length, anchor.y + step.y * length));

            let crowded = graph
                .nodes()
                .iter()
                .any(|node| node.coord.distance(position) < BRANCH_CLEARANCE);
            if crowded {
                tracing::debug!("Rejected branch at {} off {}: too close to an existing node", position, anchor);
                continue;
            }
            match self.grid.get(position) {
                Some(region) => {
                    graph.add_branch(region);
                }
                None => tracing::debug!("Rejected branch at {}: no region", position),
            }
        }
    }
}

/// Links every node to its nearest unconnected neighbours, up to the cap.
fn add_dense_connections(graph: &mut RouteGraph, prefs: &RoutePreferences) {
    let cap = prefs.max_connections_per_node;
    let ids: Vec<NodeId> = graph.nodes().iter().map(|node| node.id).collect();

    for &id in &ids {
        let existing = graph.outgoing(id).len();
        if existing >= cap {
            continue;
        }
        let Some(coord) = graph.node(id).map(|node| node.coord) else {
            continue;
        };

        let mut candidates: Vec<(f32, NodeId)> = graph
            .nodes()
            .iter()
            .filter(|other| other.id != id && !graph.is_connected(id, other.id))
            .map(|other| (coord.distance(other.coord), other.id))
            .filter(|(distance, _)| *distance <= prefs.max_connection_distance)
            .collect();
        candidates.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

        for (_, target) in candidates.into_iter().take(cap - existing) {
            graph.connect(id, target);
        }
    }
}

/// Uniform point in the unit disc by rejection sampling.
fn random_in_unit_disc<R: Rng + ?Sized>(rng: &mut R) -> (f32, f32) {
    loop {
        let x = rng.gen_range(-1.0f32..=1.0);
        let y = rng.gen_range(-1.0f32..=1.0);
        if x * x + y * y <= 1.0 {
            return (x, y);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::tests::meadow_grid;
    use crate::noise::WorldSeed;
    use crate::route::graph::NodeType;

    fn generate(grid: &RegionGrid, from: (i32, i32), to: (i32, i32), prefs: &RoutePreferences, seed: u64) -> RouteGraph {
        let mut rng = WorldSeed::new(seed).rng();
        RouteGenerator::new(grid)
            .generate_route(GridCoord::new(from.0, from.1), GridCoord::new(to.0, to.1), prefs, &mut rng)
            .unwrap()
    }

    #[test]
    fn test_adjacent_endpoints_link_directly() {
        let grid = meadow_grid(8);
        let graph = generate(&grid, (2, 2), (3, 3), &RoutePreferences::default(), 1);
        assert_eq!(graph.main_path().len(), 2);
        assert!(graph.is_connected(graph.origin(), graph.destination()));
    }

    #[test]
    fn test_endpoints_match_request() {
        let grid = meadow_grid(16);
        for seed in 0..20 {
            let graph = generate(&grid, (1, 14), (12, 2), &RoutePreferences::default(), seed);
            assert_eq!(graph.origin_node().coord, GridCoord::new(1, 14));
            assert_eq!(graph.destination_node().coord, GridCoord::new(12, 2));
            assert_eq!(graph.origin_node().node_type, NodeType::Origin);
            assert_eq!(graph.destination_node().node_type, NodeType::Destination);
        }
    }

    #[test]
    fn test_main_path_is_linked_in_order() {
        let grid = meadow_grid(16);
        let prefs = RoutePreferences { max_connections_per_node: 0, branch_chance: 0.0, ..RoutePreferences::default() };
        let graph = generate(&grid, (0, 0), (15, 15), &prefs, 9);
        for pair in graph.main_path().windows(2) {
            assert!(graph.is_connected(pair[0], pair[1]));
        }
        assert_eq!(graph.edge_count(), graph.main_path().len() - 1);
    }

    #[test]
    fn test_waypoints_unique_and_in_bounds() {
        let grid = meadow_grid(10);
        let prefs = RoutePreferences { route_deviation: 6.0, max_segment_distance: 1.0, ..RoutePreferences::default() };
        for seed in 0..30 {
            let graph = generate(&grid, (0, 0), (9, 9), &prefs, seed);
            let mut seen = std::collections::HashSet::new();
            for id in graph.main_path() {
                let coord = graph.node(*id).unwrap().coord;
                assert!(grid.contains(coord.x, coord.y));
                assert!(seen.insert(coord), "duplicate waypoint {coord}");
            }
        }
    }

    #[test]
    fn test_branches_keep_clearance() {
        let grid = meadow_grid(20);
        let prefs = RoutePreferences { branch_chance: 1.0, ..RoutePreferences::default() };
        for seed in 0..30 {
            let graph = generate(&grid, (0, 10), (19, 10), &prefs, seed);
            for branch in graph.nodes().iter().filter(|n| n.node_type == NodeType::Branch) {
                let nearest = graph
                    .nodes()
                    .iter()
                    .filter(|n| n.id != branch.id && n.node_type != NodeType::Branch)
                    .map(|n| n.coord.distance(branch.coord))
                    .fold(f32::MAX, f32::min);
                assert!(nearest >= BRANCH_CLEARANCE);
            }
        }
    }

    #[test]
    fn test_dense_pass_respects_cap() {
        let grid = meadow_grid(12);
        let prefs = RoutePreferences {
            max_connection_distance: 20.0,
            max_connections_per_node: 2,
            branch_chance: 1.0,
            ..RoutePreferences::default()
        };
        let graph = generate(&grid, (0, 0), (11, 11), &prefs, 4);
        for node in graph.nodes() {
            assert!(node.connections.len() <= 2, "node {} has {} edges", node.name, node.connections.len());
        }
    }

    #[test]
    fn test_same_seed_same_graph() {
        let grid = meadow_grid(16);
        let prefs = RoutePreferences::default();
        assert_eq!(generate(&grid, (0, 0), (14, 9), &prefs, 77), generate(&grid, (0, 0), (14, 9), &prefs, 77));
    }

    #[test]
    fn test_out_of_bounds_endpoint() {
        let grid = meadow_grid(4);
        let mut rng = WorldSeed::new(1).rng();
        let result = RouteGenerator::new(&grid).generate_route(
            GridCoord::new(0, 0),
            GridCoord::new(4, 0),
            &RoutePreferences::default(),
            &mut rng,
        );
        assert_eq!(result.unwrap_err(), RouteError::OutOfBounds { x: 4, y: 0 });
    }
}
