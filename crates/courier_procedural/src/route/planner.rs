//! # Route Planner
//!
//! Stateful traversal over one active [`RouteGraph`].
//!
//! ```text
//! NoRoute --plan_route--> Active --travel_to_exit--> ... --> Active (at destination)
//!    ^                       |
//!    +------ clear_route ----+
//! ```
//!
//! Failing calls return `Err` and leave the planner exactly as it was.

use std::sync::Arc;

use rand_chacha::ChaCha8Rng;

use crate::error::{RouteError, RouteResult};
use crate::grid::{GridCoord, RegionGrid};
use crate::noise::WorldSeed;
use crate::route::generator::{RouteGenerator, RoutePreferences};
use crate::route::graph::{Direction, NodeId, RouteConnection, RouteGraph, RouteNode};

/// Seed purpose for route generation streams.
pub const ROUTE_SEED_PURPOSE: u64 = 0x0A0D_7E00;

/// One way out of the current node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RouteExit {
    /// Compass direction.
    pub direction: Direction,
    /// Index among the exits sharing this direction.
    pub exit_index: usize,
    /// Player-facing label.
    pub label: String,
    /// Node the exit leads to.
    pub target: NodeId,
}

/// Summary of the planner's state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RouteStatus {
    /// Nothing planned.
    NoRoute,
    /// Travelling.
    Active {
        /// Current node name.
        current: String,
        /// Destination name.
        destination: String,
    },
    /// Standing on the destination node.
    AtDestination {
        /// Destination name.
        destination: String,
    },
}

impl std::fmt::Display for RouteStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoRoute => write!(f, "No active route"),
            Self::Active { current, destination } => write!(f, "At {current}, heading to {destination}"),
            Self::AtDestination { destination } => write!(f, "Arrived at {destination}"),
        }
    }
}

struct ActiveRoute {
    graph: RouteGraph,
    current: NodeId,
}

/// Plans routes over a shared grid and tracks progress along one of them.
pub struct RoutePlanner {
    grid: Arc<RegionGrid>,
    rng: ChaCha8Rng,
    route: Option<ActiveRoute>,
}

impl RoutePlanner {
    /// Creates a planner with no active route.
    #[must_use]
    pub fn new(grid: Arc<RegionGrid>, seed: WorldSeed) -> Self {
        Self {
            grid,
            rng: seed.derive(ROUTE_SEED_PURPOSE).rng(),
            route: None,
        }
    }

    /// The grid routes are planned over.
    #[must_use]
    pub fn grid(&self) -> &RegionGrid {
        &self.grid
    }

    /// Generates a route and makes it active, starting at its origin.
    ///
    /// # Errors
    ///
    /// `OutOfBounds` or `MissingRegion` for a bad endpoint. The previous
    /// route, if any, stays active.
    pub fn plan_route(
        &mut self,
        origin: GridCoord,
        destination: GridCoord,
        prefs: &RoutePreferences,
    ) -> RouteResult<&RouteGraph> {
        if let Err(error) = self.validate(origin).and_then(|()| self.validate(destination)) {
            tracing::warn!("Route planning {} -> {} failed: {}", origin, destination, error);
            return Err(error);
        }

        let graph = RouteGenerator::new(&self.grid).generate_route(origin, destination, prefs, &mut self.rng)?;
        tracing::info!(
            "Planned route {} ({} nodes, {} edges)",
            graph.describe(),
            graph.nodes().len(),
            graph.edge_count()
        );
        Ok(self.activate(graph))
    }

    /// Makes an already-built graph the active route, starting at its origin.
    pub fn adopt_route(&mut self, graph: RouteGraph) -> &RouteGraph {
        tracing::debug!("Adopted route {}", graph.describe());
        self.activate(graph)
    }

    fn activate(&mut self, graph: RouteGraph) -> &RouteGraph {
        let current = graph.origin();
        &self.route.insert(ActiveRoute { graph, current }).graph
    }

    fn validate(&self, coord: GridCoord) -> RouteResult<()> {
        if !self.grid.contains(coord.x, coord.y) {
            return Err(RouteError::OutOfBounds { x: coord.x, y: coord.y });
        }
        if self.grid.get(coord).is_none() {
            return Err(RouteError::MissingRegion { x: coord.x, y: coord.y });
        }
        Ok(())
    }

    /// Exits from the current node, grouped by direction (N, E, S, W).
    ///
    /// A direction with one edge yields one exit labelled with the target
    /// name; several edges yield numbered exits, `"<name> (Route k)"`.
    /// Empty when no route is active.
    #[must_use]
    pub fn available_exits(&self) -> Vec<RouteExit> {
        let Some(route) = &self.route else {
            return Vec::new();
        };
        let outgoing = route.graph.outgoing(route.current);

        let mut exits = Vec::with_capacity(outgoing.len());
        for direction in Direction::ALL {
            let edges: Vec<&RouteConnection> = outgoing.iter().filter(|c| c.direction == direction).collect();
            let numbered = edges.len() > 1;
            for (exit_index, edge) in edges.into_iter().enumerate() {
                let name = route.graph.node(edge.to).map_or("", |node| node.name.as_str());
                let label = if numbered {
                    format!("{name} (Route {})", exit_index + 1)
                } else {
                    name.to_string()
                };
                exits.push(RouteExit { direction, exit_index, label, target: edge.to });
            }
        }
        exits
    }

    /// Moves along the `exit_index`-th edge heading `direction`.
    ///
    /// # Errors
    ///
    /// `NoActiveRoute`, `NoExit` or `ExitIndexOutOfRange`; the current
    /// node is unchanged on failure.
    pub fn travel_to_exit(&mut self, direction: Direction, exit_index: usize) -> RouteResult<&RouteNode> {
        let result = self.resolve_exit(direction, exit_index);
        let target = match result {
            Ok(target) => target,
            Err(error) => {
                tracing::warn!("Cannot travel {} via exit {}: {}", direction, exit_index, error);
                return Err(error);
            }
        };

        let route = self.route.as_mut().ok_or(RouteError::NoActiveRoute)?;
        route.current = target;
        let node = route.graph.node(target).ok_or(RouteError::NoActiveRoute)?;
        tracing::debug!("Travelled {} to {}", direction, node.name);
        Ok(node)
    }

    fn resolve_exit(&self, direction: Direction, exit_index: usize) -> RouteResult<NodeId> {
        let route = self.route.as_ref().ok_or(RouteError::NoActiveRoute)?;
        let edges: Vec<&RouteConnection> = route
            .graph
            .outgoing(route.current)
            .iter()
            .filter(|c| c.direction == direction)
            .collect();
        if edges.is_empty() {
            return Err(RouteError::NoExit(direction));
        }
        edges
            .get(exit_index)
            .map(|edge| edge.to)
            .ok_or(RouteError::ExitIndexOutOfRange { direction, index: exit_index, available: edges.len() })
    }

    /// Whether the active route's current node is its destination.
    #[must_use]
    pub fn is_route_complete(&self) -> bool {
        self.current_node().is_some_and(|node| node.is_destination)
    }

    /// Current planner state.
    #[must_use]
    pub fn route_status(&self) -> RouteStatus {
        let Some(route) = &self.route else {
            return RouteStatus::NoRoute;
        };
        let destination = route.graph.destination_node().name.clone();
        match route.graph.node(route.current) {
            Some(node) if node.is_destination => RouteStatus::AtDestination { destination },
            Some(node) => RouteStatus::Active { current: node.name.clone(), destination },
            None => RouteStatus::NoRoute,
        }
    }

    /// Main-path description of the active route.
    #[must_use]
    pub fn route_description(&self) -> Option<String> {
        self.graph().map(RouteGraph::describe)
    }

    /// Drops the active route.
    pub fn clear_route(&mut self) {
        if self.route.take().is_some() {
            tracing::debug!("Route cleared");
        }
    }

    /// Node the traveller stands on.
    #[must_use]
    pub fn current_node(&self) -> Option<&RouteNode> {
        self.route.as_ref().and_then(|route| route.graph.node(route.current))
    }

    /// The active graph.
    #[must_use]
    pub fn graph(&self) -> Option<&RouteGraph> {
        self.route.as_ref().map(|route| &route.graph)
    }
}
