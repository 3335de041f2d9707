//! Dialogue node definitions - one beat of dialogue each.

use game_state::{Character, Expression};
use serde::{Deserialize, Serialize};

/// Unique identifier for dialogue nodes within one scene.
///
/// Ids are assigned by the tree's allocator, increase monotonically, and are
/// never reused, so they stay stable across save/load and later edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Sentinel meaning "no info slot" on [`NodeEffects::info_gathered`].
pub const NO_INFO: i32 = -1;

/// Sentinel meaning "no constraint" on a [`Restriction`] field.
pub const NO_CONSTRAINT: i32 = -1;

/// Side effects applied to game stats when a node is visited.
/// Everything defaults to off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeEffects {
    /// The character whose stats this node touches.
    pub character_affected: Option<Character>,

    /// This choice takes extra in-game time.
    pub long_option: bool,

    /// Improves the affected character's relationship by one point.
    pub positive: bool,

    /// Worsens the affected character's relationship by one point.
    pub negative: bool,

    /// Info slot gathered on the affected character, or [`NO_INFO`].
    /// Values outside the valid slot range are ignored when applied.
    pub info_gathered: i32,

    /// Marks the affected character as fired.
    pub fired: bool,
}

impl Default for NodeEffects {
    fn default() -> Self {
        Self {
            character_affected: None,
            long_option: false,
            positive: false,
            negative: false,
            info_gathered: NO_INFO,
            fired: false,
        }
    }
}

impl NodeEffects {
    /// Whether this node has any effect at all.
    pub fn is_noop(&self) -> bool {
        *self == Self::default()
    }
}

/// A gate on reaching a node, evaluated against current game stats when the
/// node is a candidate successor.
///
/// Semantics (each side independently, all must hold):
/// - `positive_threshold != -1`: requires `relationship >= positive_threshold`
/// - `negative_threshold != -1`: requires `relationship <= -negative_threshold`
/// - `info_index != -1`: requires that info slot gathered on `character`
///
/// A restriction with all three fields at -1 is always satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Restriction {
    /// The character whose relationship/info state is consulted.
    pub character: Character,

    /// Minimum relationship score, or [`NO_CONSTRAINT`].
    pub positive_threshold: i32,

    /// Maximum relationship score as `-negative_threshold`, or [`NO_CONSTRAINT`].
    pub negative_threshold: i32,

    /// Required info slot, or [`NO_CONSTRAINT`].
    pub info_index: i32,
}

impl Restriction {
    /// An always-satisfied restriction on the given character.
    pub fn none(character: Character) -> Self {
        Self {
            character,
            positive_threshold: NO_CONSTRAINT,
            negative_threshold: NO_CONSTRAINT,
            info_index: NO_CONSTRAINT,
        }
    }
}

/// A single beat of dialogue: who speaks, what they say, how they look, and
/// what it does to the world.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DialogueNode {
    pub id: NodeId,

    pub speaker: Character,

    /// The spoken line. May be empty for a pure branch node.
    #[serde(default)]
    pub text: String,

    #[serde(default)]
    pub expression: Expression,

    /// Presentation hint: show this speaker on the left even if not the player.
    #[serde(default)]
    pub force_left_side: bool,

    #[serde(default)]
    pub effects: NodeEffects,

    /// Gate evaluated when this node is a candidate successor.
    #[serde(default)]
    pub restriction: Option<Restriction>,
}

impl DialogueNode {
    /// Create a bare player node with the given id. Trees normally create
    /// nodes through [`DialogueTree::add_node`](crate::graph::DialogueTree::add_node).
    pub fn new(id: NodeId) -> Self {
        Self {
            id,
            speaker: Character::Player,
            text: String::new(),
            expression: Expression::default(),
            force_left_side: false,
            effects: NodeEffects::default(),
            restriction: None,
        }
    }

    /// Set the speaker.
    pub fn with_speaker(mut self, speaker: Character) -> Self {
        self.speaker = speaker;
        self
    }

    /// Set the spoken line.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Set the speaker's expression.
    pub fn with_expression(mut self, expression: Expression) -> Self {
        self.expression = expression;
        self
    }

    /// Present this speaker on the left regardless of who they are.
    pub fn with_force_left(mut self) -> Self {
        self.force_left_side = true;
        self
    }

    /// Set the side effects applied when this node is visited.
    pub fn with_effects(mut self, effects: NodeEffects) -> Self {
        self.effects = effects;
        self
    }

    /// Gate this node behind a restriction.
    pub fn with_restriction(mut self, restriction: Restriction) -> Self {
        self.restriction = Some(restriction);
        self
    }
}

// Node identity is the id; the remaining fields are authored content.
impl PartialEq for DialogueNode {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for DialogueNode {}

impl std::hash::Hash for DialogueNode {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
