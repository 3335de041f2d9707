//! The dialogue graph data model.
//!
//! A scene's graph consists of:
//! - **Nodes**: single beats of dialogue with speaker, text, and side effects
//! - **Connections**: directed edges; multiple edges out of one node are the
//!   player's choices, in stored order
//! - **Tree**: the per-scene store owning both sets

mod connection;
mod node;
mod tree;

pub use connection::*;
pub use node::*;
pub use tree::*;
