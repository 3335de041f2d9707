//! The character roster and portrait expressions.

use serde::{Deserialize, Serialize};

/// The characters that exist in the game.
///
/// This is a closed set: dialogue files, stat tables, and storage paths are
/// all keyed by these names. The lowercase form (see [`Display`](std::fmt::Display))
/// is what appears on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Character {
    /// The player character.
    Player,
    Dave,
    Sharon,
    Bill,
    Rosa,
}

impl Character {
    /// All characters, in stable order.
    pub const ALL: [Character; 5] = [
        Character::Player,
        Character::Dave,
        Character::Sharon,
        Character::Bill,
        Character::Rosa,
    ];

    /// The name used in storage paths and logs.
    pub fn name(&self) -> &'static str {
        match self {
            Character::Player => "player",
            Character::Dave => "dave",
            Character::Sharon => "sharon",
            Character::Bill => "bill",
            Character::Rosa => "rosa",
        }
    }
}

impl std::fmt::Display for Character {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The expressions assignable to each character's portrait.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Expression {
    Happy,
    #[default]
    Neutral,
    Sad,
    Anxious,
    Excited,
    Angry,
}
