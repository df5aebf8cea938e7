//! # Search Nodes
//!
//! Nodes of a single search invocation, stored in an arena and linked to
//! their parents by index. The arena is dropped with the search; nothing is
//! shared between requests or threads.
//!
//! ## Cost Model
//!
//! All costs are integers:
//! - `h_cost = floor(distance(position, goal) * heuristic_scale)`, computed once at creation
//! - a move costs `floor(distance(from, to) * movement_cost_scale)`
//! - `f_cost = g_cost + h_cost`
//!
//! With the default scales (10 and 1) every legal move costs 1 while the
//! heuristic is expressed in tenths of a cell.

use cgmath::{MetricSpace, Point3};

/// Index of a node inside a [`NodeArena`].
pub type NodeId = usize;

/// Scales used to turn euclidean distances into integer costs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostModel {
    /// Multiplier of the distance to the goal.
    pub heuristic_scale: f32,
    /// Multiplier of the length of a move.
    pub movement_cost_scale: f32,
}

impl CostModel {
    /// Estimated cost from `position` to `goal`.
    pub fn heuristic(&self, position: Point3<i32>, goal: Point3<i32>) -> i32 {
        scaled_distance(position, goal, self.heuristic_scale)
    }

    /// Cost of a single move between adjacent cells.
    pub fn movement_cost(&self, from: Point3<i32>, to: Point3<i32>) -> i32 {
        scaled_distance(from, to, self.movement_cost_scale)
    }
}

fn scaled_distance(a: Point3<i32>, b: Point3<i32>, scale: f32) -> i32 {
    let a = Point3::new(a.x as f32, a.y as f32, a.z as f32);
    let b = Point3::new(b.x as f32, b.y as f32, b.z as f32);
    (a.distance(b) * scale).floor() as i32
}

/// A node of the search frontier.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchNode {
    /// Grid cell of the node.
    pub position: Point3<i32>,
    /// Accumulated movement cost from the start.
    pub g_cost: i32,
    /// Heuristic estimate to the goal.
    pub h_cost: i32,
    /// Node this one was reached from. The root is its own parent.
    pub parent: NodeId,
}

impl SearchNode {
    /// Total estimated cost through this node.
    pub fn f_cost(&self) -> i32 {
        self.g_cost + self.h_cost
    }
}

/// Owns every node created during one search.
#[derive(Debug, Default)]
pub struct NodeArena {
    nodes: Vec<SearchNode>,
}

impl NodeArena {
    /// Creates an empty arena.
    pub fn new() -> Self {
        NodeArena { nodes: Vec::new() }
    }

    /// Creates the root node. It is its own parent.
    pub fn push_root(&mut self, position: Point3<i32>, h_cost: i32) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(SearchNode {
            position,
            g_cost: 0,
            h_cost,
            parent: id,
        });
        id
    }

    /// Creates a node reached from `parent`.
    pub fn push(&mut self, position: Point3<i32>, g_cost: i32, h_cost: i32, parent: NodeId) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(SearchNode {
            position,
            g_cost,
            h_cost,
            parent,
        });
        id
    }

    /// The node with the given id. Panics on an id from another arena.
    pub fn get(&self, id: NodeId) -> &SearchNode {
        &self.nodes[id]
    }

    /// Relinks a node to a new parent.
    pub fn set_parent(&mut self, id: NodeId, parent: NodeId) {
        self.nodes[id].parent = parent;
    }

    /// Number of nodes created so far.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether no node was created yet.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Walks parent links from `terminal` back to the root and returns the
    /// positions in root-to-terminal order.
    ///
    /// The walk is bounded by the arena size, so a corrupted chain cannot loop.
    pub fn route_to(&self, terminal: NodeId) -> Vec<Point3<i32>> {
        let mut route = Vec::new();
        let mut current = terminal;
        for _ in 0..self.nodes.len() {
            let node = &self.nodes[current];
            route.push(node.position);
            if node.parent == current {
                break;
            }
            current = node.parent;
        }
        route.reverse();
        route
    }
}
