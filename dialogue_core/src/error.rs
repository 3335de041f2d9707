//! Error definitions for the dialogue engine.

use thiserror::Error;

use crate::graph::NodeId;

/// Everything that can go wrong loading, validating, or walking a dialogue
/// scene. None of these are retried; the caller decides whether to re-request.
#[derive(Debug, Error)]
pub enum DialogueError {
    /// No asset exists at the requested scene address.
    #[error("no dialogue scene at {path}")]
    SceneNotFound { path: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed dialogue scene: {0}")]
    Malformed(#[from] serde_json::Error),

    /// Two serialized nodes carry the same id.
    #[error("duplicate node id {id}")]
    DuplicateNodeId { id: NodeId },

    /// A connection endpoint did not resolve to a loaded node during fusion.
    #[error("connection {from} -> {to} references a missing node")]
    UnresolvedEndpoint { from: NodeId, to: NodeId },

    /// No node without incoming connections exists, so there is no entry point.
    #[error("dialogue graph has no head node")]
    NoHeadNode,

    /// More than one candidate entry point exists.
    #[error("dialogue graph has {count} head nodes, expected exactly one")]
    MultipleHeadNodes { count: usize },

    /// Authoring: a connection referenced a node id not in the tree.
    #[error("unknown node id {id}")]
    UnknownNode { id: NodeId },

    /// Authoring: a node may not connect to itself.
    #[error("node {id} cannot connect to itself")]
    SelfConnection { id: NodeId },

    /// Driver resumed with an acknowledgement while no line was pending.
    #[error("traversal is not awaiting an acknowledgement")]
    NotAwaitingAck,

    /// Driver resumed with a choice while no options were pending.
    #[error("traversal is not awaiting a choice")]
    NotAwaitingChoice,

    /// Driver picked an option index outside the presented set.
    #[error("choice index {index} out of range for {options} options")]
    ChoiceOutOfRange { index: usize, options: usize },
}
