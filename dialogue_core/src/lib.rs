//! # Dialogue Core
//!
//! The dialogue graph engine for Overtime. This crate interfaces with
//! `game_state`, owns the branching conversation graphs, and walks them one
//! beat at a time.
//!
//! ## Core Components
//!
//! - **graph**: the dialogue node/connection data model and the per-scene tree
//! - **storage**: scene addressing and JSON save/load with endpoint fusion
//! - **runtime**: the traversal state machine with explicit suspend points
//! - **selection**: the per-character policy that picks which scene to play
//!
//! ## Design Philosophy
//!
//! - **Engine-agnostic**: presentation and input are collaborators behind a
//!   trait; the engine only decides what the next beat is
//! - **Suspend, don't block**: the runtime returns a prompt and waits to be
//!   resumed, so any frame/event loop can drive it
//! - **Fail loudly at load time**: a scene either fuses into a valid graph or
//!   is rejected before traversal ever starts

pub mod error;
pub mod graph;
pub mod runtime;
pub mod selection;
pub mod storage;

pub use error::*;
pub use graph::*;
pub use runtime::*;
pub use selection::*;
pub use storage::*;
