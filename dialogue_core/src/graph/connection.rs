//! Connection definitions - directed edges between dialogue nodes.

use serde::{Deserialize, Serialize};

use super::NodeId;

/// A directed edge from one node to another.
///
/// Connections are immutable once created; rewiring is delete-and-recreate.
/// The order connections are stored in the tree is the order choices are
/// presented to the player, and it round-trips through save/load unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Connection {
    pub from: NodeId,
    pub to: NodeId,
}

impl Connection {
    pub fn new(from: NodeId, to: NodeId) -> Self {
        Self { from, to }
    }
}

impl std::fmt::Display for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)
    }
}
