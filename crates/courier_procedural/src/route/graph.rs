//! Route graph: waypoint nodes and directed compass-labelled connections.
//!
//! The graph owns its nodes; everything else refers to them by [`NodeId`].

use serde::{Deserialize, Serialize};

use crate::grid::{GridCoord, Region};
use crate::region::RegionType;

/// Compass direction of a connection, from grid deltas.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    /// +Y
    North,
    /// -Y
    South,
    /// +X
    East,
    /// -X
    West,
}

impl Direction {
    /// All directions, in exit-listing order.
    pub const ALL: [Self; 4] = [Self::North, Self::East, Self::South, Self::West];

    /// Direction of travel from `from` to `to`.
    ///
    /// The dominant axis wins; ties go to the vertical axis.
    #[must_use]
    pub fn between(from: GridCoord, to: GridCoord) -> Self {
        let dx = to.x - from.x;
        let dy = to.y - from.y;
        if dx.abs() > dy.abs() {
            if dx > 0 { Self::East } else { Self::West }
        } else if dy > 0 {
            Self::North
        } else {
            Self::South
        }
    }

    /// Unit grid step.
    #[must_use]
    pub const fn offset(self) -> GridCoord {
        match self {
            Self::North => GridCoord::new(0, 1),
            Self::South => GridCoord::new(0, -1),
            Self::East => GridCoord::new(1, 0),
            Self::West => GridCoord::new(-1, 0),
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::North => "North",
            Self::South => "South",
            Self::East => "East",
            Self::West => "West",
        };
        f.pad(name)
    }
}

/// Index of a node within its graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub usize);

/// Role of a node in the route.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeType {
    /// Start of the route.
    Origin,
    /// End of the route.
    Destination,
    /// Waypoint on the main path.
    MainPath,
    /// Optional side node off the main path.
    Branch,
}

/// A directed edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteConnection {
    /// Source node.
    pub from: NodeId,
    /// Target node.
    pub to: NodeId,
    /// Compass direction from source to target.
    pub direction: Direction,
}

/// One waypoint region in a route.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RouteNode {
    /// This node's id.
    pub id: NodeId,
    /// Region coordinates.
    pub coord: GridCoord,
    /// Region display name.
    pub name: String,
    /// Region biome.
    pub region_type: RegionType,
    /// Outgoing edges.
    pub connections: Vec<RouteConnection>,
    /// Role in the route.
    pub node_type: NodeType,
    /// Start of the route.
    pub is_origin: bool,
    /// End of the route.
    pub is_destination: bool,
}

/// A generated route between two regions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RouteGraph {
    nodes: Vec<RouteNode>,
    main_path: Vec<NodeId>,
    origin: NodeId,
    destination: NodeId,
}

impl RouteGraph {
    /// A graph holding only its endpoints, unconnected.
    ///
    /// When both endpoints are the same region the graph has a single node
    /// that is both origin and destination.
    #[must_use]
    pub fn new(origin: &Region, destination: &Region) -> Self {
        let mut graph = Self {
            nodes: Vec::new(),
            main_path: Vec::new(),
            origin: NodeId(0),
            destination: NodeId(0),
        };
        let origin_id = graph.push_node(origin, NodeType::Origin);
        graph.nodes[origin_id.0].is_origin = true;
        graph.main_path.push(origin_id);

        if origin.coord == destination.coord {
            graph.nodes[origin_id.0].is_destination = true;
        } else {
            let destination_id = graph.push_node(destination, NodeType::Destination);
            graph.nodes[destination_id.0].is_destination = true;
            graph.main_path.push(destination_id);
            graph.destination = destination_id;
        }
        graph
    }

    fn push_node(&mut self, region: &Region, node_type: NodeType) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(RouteNode {
            id,
            coord: region.coord,
            name: region.display_name(),
            region_type: region.region_type,
            connections: Vec::new(),
            node_type,
            is_origin: false,
            is_destination: false,
        });
        id
    }

    /// Adds a main-path waypoint just before the destination.
    pub fn insert_waypoint(&mut self, region: &Region) -> NodeId {
        let id = self.push_node(region, NodeType::MainPath);
        let at = self.main_path.len().saturating_sub(1).max(1);
        self.main_path.insert(at.min(self.main_path.len()), id);
        id
    }

    /// Adds a branch node, off the main path.
    pub fn add_branch(&mut self, region: &Region) -> NodeId {
        self.push_node(region, NodeType::Branch)
    }

    /// Adds a directed edge; the direction comes from grid positions.
    ///
    /// Returns `None` for unknown ids or a self-edge.
    pub fn connect(&mut self, from: NodeId, to: NodeId) -> Option<Direction> {
        if from == to {
            return None;
        }
        let to_coord = self.nodes.get(to.0)?.coord;
        let source = self.nodes.get_mut(from.0)?;
        let direction = Direction::between(source.coord, to_coord);
        source.connections.push(RouteConnection { from, to, direction });
        Some(direction)
    }

    /// Whether `from` already has an edge to `to`.
    #[must_use]
    pub fn is_connected(&self, from: NodeId, to: NodeId) -> bool {
        self.outgoing(from).iter().any(|c| c.to == to)
    }

    /// Node by id.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&RouteNode> {
        self.nodes.get(id.0)
    }

    /// Outgoing edges of a node; empty for unknown ids.
    #[must_use]
    pub fn outgoing(&self, id: NodeId) -> &[RouteConnection] {
        self.nodes.get(id.0).map_or(&[], |node| node.connections.as_slice())
    }

    /// Every node.
    #[must_use]
    pub fn nodes(&self) -> &[RouteNode] {
        &self.nodes
    }

    /// Node at a grid coordinate.
    #[must_use]
    pub fn node_at(&self, coord: GridCoord) -> Option<&RouteNode> {
        self.nodes.iter().find(|node| node.coord == coord)
    }

    /// Main path from origin to destination.
    #[must_use]
    pub fn main_path(&self) -> &[NodeId] {
        &self.main_path
    }

    /// Origin id.
    #[must_use]
    pub const fn origin(&self) -> NodeId {
        self.origin
    }

    /// Destination id.
    #[must_use]
    pub const fn destination(&self) -> NodeId {
        self.destination
    }

    /// Origin node.
    #[must_use]
    pub fn origin_node(&self) -> &RouteNode {
        &self.nodes[self.origin.0]
    }

    /// Destination node.
    #[must_use]
    pub fn destination_node(&self) -> &RouteNode {
        &self.nodes[self.destination.0]
    }

    /// Total number of edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.nodes.iter().map(|node| node.connections.len()).sum()
    }

    /// Main-path names joined with arrows.
    #[must_use]
    pub fn describe(&self) -> String {
        self.main_path
            .iter()
            .filter_map(|id| self.node(*id))
            .map(|node| node.name.as_str())
            .collect::<Vec<_>>()
            .join(" -> ")
    }
}
