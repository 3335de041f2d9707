//! Authored dialogue profiles - which scenes each character can deliver.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::characters::Character;

/// Errors from loading a character profile.
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("failed to read profile file: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed profile: {0}")]
    Toml(#[from] toml::de::Error),
}

/// A prerequisite for a locked dialogue: a specific info slot must have been
/// gathered on a specific character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfoRequirement {
    pub character: Character,
    pub index: usize,
}

/// A dialogue scene that only unlocks once all of its info prerequisites are
/// met. Consumed the first time it is selected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockedDialogue {
    /// The main dialogue scene index to deliver.
    pub scene: u32,
    pub requirements: Vec<InfoRequirement>,
}

/// The authored conversation content for one character.
///
/// Scene indices address graph files on disk; which list is consulted depends
/// on the current relationship sign and how much of the day's conversation
/// budget remains.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterProfile {
    pub character: Character,

    /// Main dialogue scenes shown while on good terms, in delivery order.
    pub positive_dialogues: Vec<u32>,

    /// Main dialogue scenes shown while on bad terms, in delivery order.
    pub negative_dialogues: Vec<u32>,

    /// Fallback snippet scenes for good terms.
    #[serde(default)]
    pub positive_snippets: Vec<u32>,

    /// Fallback snippet scenes for bad terms.
    #[serde(default)]
    pub negative_snippets: Vec<u32>,

    /// How many main conversations this character grants per day.
    #[serde(default = "default_conversations_per_day")]
    pub conversations_per_day: u32,

    /// One-shot dialogues gated behind gathered info.
    #[serde(default)]
    pub locked_dialogues: Vec<LockedDialogue>,
}

fn default_conversations_per_day() -> u32 {
    1
}

impl CharacterProfile {
    /// Parse a profile from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ProfileError> {
        Ok(toml::from_str(text)?)
    }

    /// Load a profile from a TOML file on disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ProfileError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}
