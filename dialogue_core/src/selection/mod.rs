//! Scene selection - which conversation an NPC offers next.
//!
//! Deterministic policy per interaction, in priority order:
//! 1. an unlocked, not-yet-consumed locked dialogue (one-shot);
//! 2. the next indexed main dialogue, while the day's conversation budget and
//!    the terms-matching list both hold out (consumes budget, advances index);
//! 3. a non-consuming snippet chosen by the same positive/negative split.

use game_state::{Character, CharacterProfile, GameStats};

use crate::storage::{SceneAddress, SceneKind};

/// Per-NPC dialogue selection state, wrapping the authored profile with the
/// day's remaining conversation budget and the still-locked dialogue pool.
#[derive(Debug, Clone)]
pub struct NpcController {
    pub character: Character,
    profile: CharacterProfile,
    conversations_remaining: u32,
    pending_locked: Vec<usize>,
}

impl NpcController {
    pub fn new(profile: CharacterProfile) -> Self {
        let conversations_remaining = profile.conversations_per_day;
        let pending_locked = (0..profile.locked_dialogues.len()).collect();
        Self {
            character: profile.character,
            profile,
            conversations_remaining,
            pending_locked,
        }
    }

    /// Refill the conversation budget at the start of a day.
    pub fn new_day(&mut self) {
        self.conversations_remaining = self.profile.conversations_per_day;
    }

    /// How many main conversations remain today.
    pub fn conversations_remaining(&self) -> u32 {
        self.conversations_remaining
    }

    /// Whether the main dialogue list for the current terms still has content
    /// at the current index.
    pub fn has_available_dialogue(&self, stats: &GameStats) -> bool {
        let index = stats.dialogue_index(self.character);
        self.main_list(stats).len() > index
    }

    fn main_list(&self, stats: &GameStats) -> &[u32] {
        if stats.on_good_terms(self.character) {
            &self.profile.positive_dialogues
        } else {
            &self.profile.negative_dialogues
        }
    }

    fn snippet_list(&self, stats: &GameStats) -> &[u32] {
        if stats.on_good_terms(self.character) {
            &self.profile.positive_snippets
        } else {
            &self.profile.negative_snippets
        }
    }

    /// The first pending locked dialogue whose prerequisites are all met.
    fn unlocked_dialogue(&self, stats: &GameStats) -> Option<usize> {
        self.pending_locked.iter().copied().find(|&slot| {
            self.profile.locked_dialogues[slot]
                .requirements
                .iter()
                .all(|req| stats.info_flag(req.character, req.index))
        })
    }

    /// Pick the scene for one interaction and apply its consumption effects.
    pub fn next_scene(&mut self, stats: &mut GameStats) -> SceneAddress {
        if let Some(slot) = self.unlocked_dialogue(stats) {
            self.pending_locked.retain(|&s| s != slot);
            let scene = self.profile.locked_dialogues[slot].scene;
            tracing::info!(character = %self.character, scene, "unlocked dialogue selected");
            return SceneAddress::new(SceneKind::Dialogue, self.character, scene);
        }

        if self.conversations_remaining > 0 && self.has_available_dialogue(stats) {
            let index = stats.dialogue_index(self.character);
            let scene = self.main_list(stats)[index];
            self.conversations_remaining -= 1;
            stats.advance_dialogue_index(self.character);
            return SceneAddress::new(SceneKind::Dialogue, self.character, scene);
        }

        // Fallback: replay the snippet matching the last-delivered tier.
        let snippets = self.snippet_list(stats);
        let index = stats
            .dialogue_index(self.character)
            .saturating_sub(1)
            .min(snippets.len().saturating_sub(1));
        let scene = snippets.get(index).copied().unwrap_or(0);
        SceneAddress::new(SceneKind::Snippet, self.character, scene)
    }
}
