//! # Game State
//!
//! The "world bible" crate for Overtime - the closed character roster, portrait
//! expressions, per-character relationship/info state, the in-game clock, and
//! the authored dialogue profiles that drive conversation selection.
//! This crate is the single source of truth for game state and contains no
//! dialogue traversal logic.

pub mod characters;
pub mod profile;
pub mod stats;

pub use characters::*;
pub use profile::*;
pub use stats::*;
