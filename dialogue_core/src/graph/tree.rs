//! The per-scene dialogue tree - owns the node and connection sets.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::{Connection, DialogueNode, NodeId};
use crate::error::DialogueError;

/// Hands out node ids, monotonically increasing and never reused.
///
/// One allocator lives per tree and per load session; loading a persisted
/// graph fast-forwards it past the highest loaded id so later edits cannot
/// collide.
#[derive(Debug, Clone, Default)]
pub struct IdAllocator {
    next: u32,
}

impl IdAllocator {
    pub fn allocate(&mut self) -> NodeId {
        let id = NodeId(self.next);
        self.next += 1;
        id
    }

    /// Ensure all future ids are strictly greater than `seen`.
    pub fn adopt(&mut self, seen: NodeId) {
        self.next = self.next.max(seen.0 + 1);
    }
}

/// The dialogue graph for exactly one scene.
///
/// Connection order is choice display order and is preserved exactly through
/// save/load. A tree loaded from disk must pass [`fuse`](DialogueTree::fuse)
/// before traversal starts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DialogueTree {
    nodes: Vec<DialogueNode>,
    connections: Vec<Connection>,

    #[serde(skip)]
    ids: IdAllocator,
}

impl DialogueTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node with a freshly allocated id, configured by the builder.
    ///
    /// Returns the node's id. The builder receives a bare node and may not
    /// change its id.
    pub fn add_node(&mut self, build: impl FnOnce(DialogueNode) -> DialogueNode) -> NodeId {
        let id = self.ids.allocate();
        let mut node = build(DialogueNode::new(id));
        node.id = id;
        self.nodes.push(node);
        id
    }

    /// Connect two existing nodes. The new connection is appended, i.e. it
    /// becomes the last-presented choice out of `from`.
    pub fn connect(&mut self, from: NodeId, to: NodeId) -> Result<(), DialogueError> {
        if from == to {
            return Err(DialogueError::SelfConnection { id: from });
        }
        for id in [from, to] {
            if self.node(id).is_none() {
                return Err(DialogueError::UnknownNode { id });
            }
        }
        self.connections.push(Connection::new(from, to));
        Ok(())
    }

    /// Remove a connection, if present.
    pub fn disconnect(&mut self, from: NodeId, to: NodeId) {
        self.connections
            .retain(|c| !(c.from == from && c.to == to));
    }

    /// Remove a node and every connection touching it.
    pub fn remove_node(&mut self, id: NodeId) -> Option<DialogueNode> {
        let index = self.nodes.iter().position(|n| n.id == id)?;
        self.connections.retain(|c| c.from != id && c.to != id);
        Some(self.nodes.remove(index))
    }

    /// Look up a node by id.
    pub fn node(&self, id: NodeId) -> Option<&DialogueNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// All nodes, in insertion order.
    pub fn nodes(&self) -> &[DialogueNode] {
        &self.nodes
    }

    /// All connections, in display order.
    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    /// Outgoing connections of a node, in display order.
    pub fn outgoing(&self, id: NodeId) -> impl Iterator<Item = &Connection> {
        self.connections.iter().filter(move |c| c.from == id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The scene's entry point: the unique node with no incoming connections.
    ///
    /// Zero or multiple entry candidates is a graph defect and an error.
    pub fn head(&self) -> Result<NodeId, DialogueError> {
        let targets: HashSet<NodeId> = self.connections.iter().map(|c| c.to).collect();
        let mut heads = self.nodes.iter().filter(|n| !targets.contains(&n.id));

        let head = heads.next().ok_or(DialogueError::NoHeadNode)?;
        let extras = heads.count();
        if extras > 0 {
            return Err(DialogueError::MultipleHeadNodes { count: extras + 1 });
        }
        Ok(head.id)
    }

    /// Link and validate a freshly deserialized tree.
    ///
    /// Rejects duplicate node ids and connections whose endpoints do not
    /// resolve to a loaded node, verifies a unique head exists, and
    /// fast-forwards the id allocator past the highest loaded id. Traversal
    /// must not start on a tree that has not fused.
    pub fn fuse(&mut self) -> Result<(), DialogueError> {
        let mut seen = HashSet::with_capacity(self.nodes.len());
        for node in &self.nodes {
            if !seen.insert(node.id) {
                return Err(DialogueError::DuplicateNodeId { id: node.id });
            }
            self.ids.adopt(node.id);
        }

        for connection in &self.connections {
            if !seen.contains(&connection.from) || !seen.contains(&connection.to) {
                return Err(DialogueError::UnresolvedEndpoint {
                    from: connection.from,
                    to: connection.to,
                });
            }
        }

        self.head()?;
        Ok(())
    }
}
