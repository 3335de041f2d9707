//! Game stats - relationship scores, gathered info, the office clock.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::characters::Character;

/// Minutes added to the clock when a main dialogue scene starts.
pub const DIALOGUE_START_TIME_INCREMENT: u32 = 30;

/// Minutes added to the clock for longer dialogue choices.
pub const DIALOGUE_LONG_TIME_INCREMENT: u32 = 30;

/// The number of info slots tracked per character.
pub const INFO_SLOTS: usize = 10;

/// The clock value at the start of each work day, in minutes (9:00 AM).
pub const DAY_START_MINUTES: u32 = 9 * 60;

/// Everything the game tracks about one character.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CharacterStanding {
    /// Signed relationship score. Zero or above counts as "good terms".
    pub relationship: i32,
    /// The pieces of information the player has gathered on this character.
    pub info: [bool; INFO_SLOTS],
    /// Whether the player has fired this character.
    pub fired: bool,
    /// How far through this character's main dialogue list the player is.
    pub dialogue_index: usize,
}

impl Default for CharacterStanding {
    fn default() -> Self {
        Self {
            relationship: 0,
            info: [false; INFO_SLOTS],
            fired: false,
            dialogue_index: 0,
        }
    }
}

/// All mutable game state touched by dialogue: per-character standings plus
/// the current day and clock.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameStats {
    standings: HashMap<Character, CharacterStanding>,
    /// The current day, starting at 1.
    pub day: u32,
    /// The current time in minutes since midnight.
    pub clock_minutes: u32,
}

impl Default for GameStats {
    fn default() -> Self {
        Self::new()
    }
}

impl GameStats {
    /// Create stats for a fresh game: day 1, 9:00 AM, everything zeroed.
    pub fn new() -> Self {
        let standings = Character::ALL
            .iter()
            .map(|c| (*c, CharacterStanding::default()))
            .collect();
        Self {
            standings,
            day: 1,
            clock_minutes: DAY_START_MINUTES,
        }
    }

    /// Reset all stats back to a fresh game.
    pub fn reset_all(&mut self) {
        *self = Self::new();
    }

    /// Advance to the next day and reset the clock to 9:00 AM.
    pub fn advance_day(&mut self) {
        self.day += 1;
        self.clock_minutes = DAY_START_MINUTES;
    }

    // Every roster character is seeded in `new`; a character missing from a
    // hand-edited save simply reads as a default standing.
    fn standing(&self, character: Character) -> Option<&CharacterStanding> {
        self.standings.get(&character)
    }

    fn standing_mut(&mut self, character: Character) -> &mut CharacterStanding {
        self.standings.entry(character).or_default()
    }

    /// The relationship score for a character.
    pub fn relationship(&self, character: Character) -> i32 {
        self.standing(character).map_or(0, |s| s.relationship)
    }

    /// Add (or subtract) relationship points for a character.
    pub fn adjust_relationship(&mut self, character: Character, delta: i32) {
        let standing = self.standing_mut(character);
        standing.relationship += delta;
        tracing::info!(%character, bond = standing.relationship, "bond changed");
    }

    /// Whether the character is currently on good terms (score >= 0).
    pub fn on_good_terms(&self, character: Character) -> bool {
        self.relationship(character) >= 0
    }

    /// Whether a given info slot has been gathered on a character.
    /// Out-of-range slots read as not gathered.
    pub fn info_flag(&self, character: Character, index: usize) -> bool {
        self.standing(character)
            .and_then(|s| s.info.get(index))
            .copied()
            .unwrap_or(false)
    }

    /// Mark an info slot as gathered. Out-of-range slots are ignored.
    pub fn set_info_flag(&mut self, character: Character, index: usize) {
        if let Some(slot) = self.standing_mut(character).info.get_mut(index) {
            *slot = true;
            tracing::info!(%character, index, "info gathered");
        }
    }

    /// Whether the player has fired this character.
    pub fn is_fired(&self, character: Character) -> bool {
        self.standing(character).is_some_and(|s| s.fired)
    }

    /// Mark a character as fired.
    pub fn set_fired(&mut self, character: Character) {
        self.standing_mut(character).fired = true;
        tracing::info!(%character, "fired");
    }

    /// The current dialogue index for a character.
    pub fn dialogue_index(&self, character: Character) -> usize {
        self.standing(character).map_or(0, |s| s.dialogue_index)
    }

    /// Advance a character's dialogue index by one.
    pub fn advance_dialogue_index(&mut self, character: Character) {
        self.standing_mut(character).dialogue_index += 1;
    }

    /// Push the clock forward by the given number of minutes.
    pub fn add_clock_minutes(&mut self, minutes: u32) {
        self.clock_minutes += minutes;
    }

    /// The clock as a 12-hour display string, e.g. "9:30 AM".
    pub fn time_display(&self) -> String {
        let hour = self.clock_minutes / 60;
        let minute = self.clock_minutes % 60;
        let display_hour = match hour % 24 {
            0 => 12,
            h if h <= 12 => h,
            h => h - 12,
        };
        let suffix = if self.clock_minutes % (24 * 60) < 12 * 60 {
            "AM"
        } else {
            "PM"
        };
        format!("{display_hour}:{minute:02} {suffix}")
    }
}
