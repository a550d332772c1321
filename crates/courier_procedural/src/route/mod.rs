//! # Routes
//!
//! Route graphs between regions: generation, and traversal by a planner.
//!
//! The grid is shared read-only; each planner owns its active graph.

mod generator;
mod graph;
mod planner;

pub use generator::{RouteGenerator, RoutePreferences};
pub use graph::{Direction, NodeId, NodeType, RouteConnection, RouteGraph, RouteNode};
pub use planner::{RouteExit, RoutePlanner, RouteStatus, ROUTE_SEED_PURPOSE};
