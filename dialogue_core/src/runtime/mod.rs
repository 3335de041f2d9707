//! The traversal engine - walks a dialogue graph one beat at a time.
//!
//! The engine is a state machine with two suspend points: after presenting a
//! line (waiting for an acknowledgement) and after presenting options
//! (waiting for a choice). It never blocks; each step returns a [`Prompt`]
//! and the driver resumes it with [`Traversal::acknowledge`] or
//! [`Traversal::choose`] once the player has acted. Everything between two
//! suspend points - side effects, restriction filtering - is atomic.

use game_state::{
    Character, Expression, GameStats, DIALOGUE_LONG_TIME_INCREMENT, DIALOGUE_START_TIME_INCREMENT,
    INFO_SLOTS,
};

use crate::error::DialogueError;
use crate::graph::{DialogueNode, DialogueTree, NodeId, Restriction, NO_CONSTRAINT};
use crate::storage::{load_tree, SceneAddress, SceneKind};

/// Which side of the screen a speaker's portrait goes on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// One line of dialogue, ready for presentation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineView {
    pub speaker: Character,
    pub text: String,
    pub expression: Expression,
    pub side: Side,
}

/// What the engine is waiting on, handed to the driver at each suspend point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prompt {
    /// Display this line, then call [`Traversal::acknowledge`].
    Line(LineView),
    /// Present these option labels in order, then call [`Traversal::choose`].
    Choice(Vec<String>),
    /// The scene is over; resume game flow.
    Finished,
}

#[derive(Debug)]
enum Phase {
    /// A line is on screen; `candidates` are the unpruned successors.
    AwaitingAck { candidates: Vec<NodeId> },
    AwaitingChoice { candidates: Vec<NodeId> },
    Done,
}

/// Presentation collaborator: renders lines and options and collects input.
///
/// Implementations for a real frame loop will usually not implement this
/// trait at all and instead drive [`Traversal`] directly through its resume
/// methods; the trait exists for synchronous drivers and tests.
pub trait Presenter {
    /// Display a line and return once the player has acknowledged it.
    fn display_line(&mut self, line: &LineView);

    /// Present options in order and return the chosen index.
    fn choose(&mut self, labels: &[String]) -> usize;

    /// The scene finished.
    fn finished(&mut self);
}

/// A walk over one dialogue scene.
#[derive(Debug)]
pub struct Traversal {
    tree: DialogueTree,
    current: NodeId,
    phase: Phase,
}

impl Traversal {
    /// Start walking a fused tree from its head node.
    ///
    /// Applies the head node's side effects and returns its line prompt.
    pub fn begin(
        tree: DialogueTree,
        stats: &mut GameStats,
    ) -> Result<(Self, Prompt), DialogueError> {
        let head = tree.head()?;
        let mut traversal = Self {
            tree,
            current: head,
            phase: Phase::Done,
        };
        let prompt = traversal.enter(head, stats)?;
        Ok((traversal, prompt))
    }

    /// The node currently on screen.
    pub fn current(&self) -> NodeId {
        self.current
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.phase, Phase::Done)
    }

    /// Resume after the player acknowledged the current line.
    ///
    /// Zero unpruned successors terminates the scene; one advances without
    /// player input; two or more suspend for a choice.
    pub fn acknowledge(&mut self, stats: &mut GameStats) -> Result<Prompt, DialogueError> {
        let candidates = match std::mem::replace(&mut self.phase, Phase::Done) {
            Phase::AwaitingAck { candidates } => candidates,
            other => {
                self.phase = other;
                return Err(DialogueError::NotAwaitingAck);
            }
        };

        match candidates.as_slice() {
            [] => {
                tracing::info!("ended dialogue");
                self.phase = Phase::Done;
                Ok(Prompt::Finished)
            }
            [only] => {
                let next = *only;
                self.enter(next, stats)
            }
            _ => {
                let labels = candidates
                    .iter()
                    .filter_map(|id| self.tree.node(*id))
                    .map(|node| node.text.clone())
                    .collect();
                self.phase = Phase::AwaitingChoice { candidates };
                Ok(Prompt::Choice(labels))
            }
        }
    }

    /// Resume after the player picked option `index`.
    pub fn choose(
        &mut self,
        index: usize,
        stats: &mut GameStats,
    ) -> Result<Prompt, DialogueError> {
        let candidates = match std::mem::replace(&mut self.phase, Phase::Done) {
            Phase::AwaitingChoice { candidates } => candidates,
            other => {
                self.phase = other;
                return Err(DialogueError::NotAwaitingChoice);
            }
        };

        let Some(next) = candidates.get(index).copied() else {
            let options = candidates.len();
            self.phase = Phase::AwaitingChoice { candidates };
            return Err(DialogueError::ChoiceOutOfRange { index, options });
        };
        tracing::info!(index, "selected option");
        self.enter(next, stats)
    }

    /// Drive this traversal to completion with a synchronous presenter.
    pub fn run_with<P: Presenter>(
        mut self,
        mut prompt: Prompt,
        presenter: &mut P,
        stats: &mut GameStats,
    ) -> Result<(), DialogueError> {
        loop {
            match prompt {
                Prompt::Line(ref line) => {
                    presenter.display_line(line);
                    prompt = self.acknowledge(stats)?;
                }
                Prompt::Choice(ref labels) => {
                    let index = presenter.choose(labels);
                    prompt = self.choose(index, stats)?;
                }
                Prompt::Finished => {
                    presenter.finished();
                    return Ok(());
                }
            }
        }
    }

    /// Make `id` the current node: apply its side effects, filter its
    /// successors, and suspend on its line.
    fn enter(&mut self, id: NodeId, stats: &mut GameStats) -> Result<Prompt, DialogueError> {
        let node = self
            .tree
            .node(id)
            .ok_or(DialogueError::UnknownNode { id })?;

        apply_effects(node, stats);
        tracing::info!(speaker = %node.speaker, text = %node.text, "says");

        let candidates: Vec<NodeId> = self
            .tree
            .outgoing(id)
            .filter_map(|conn| self.tree.node(conn.to))
            .filter(|target| {
                target
                    .restriction
                    .as_ref()
                    .map_or(true, |r| restriction_satisfied(r, stats))
            })
            .map(|target| target.id)
            .collect();

        let view = LineView {
            speaker: node.speaker,
            text: node.text.clone(),
            expression: node.expression,
            side: side_of(node),
        };
        self.current = id;
        self.phase = Phase::AwaitingAck { candidates };
        Ok(Prompt::Line(view))
    }
}

/// The player's lines and force-left nodes go on the left, everyone else on
/// the right.
fn side_of(node: &DialogueNode) -> Side {
    if node.speaker == Character::Player || node.force_left_side {
        Side::Left
    } else {
        Side::Right
    }
}

/// Apply a node's side effects in fixed order: time cost, relationship up,
/// relationship down, fired, info gathered.
fn apply_effects(node: &DialogueNode, stats: &mut GameStats) {
    let effects = &node.effects;
    if effects.long_option {
        stats.add_clock_minutes(DIALOGUE_LONG_TIME_INCREMENT);
    }
    let Some(affected) = effects.character_affected else {
        return;
    };
    if effects.positive {
        stats.adjust_relationship(affected, 1);
    }
    if effects.negative {
        stats.adjust_relationship(affected, -1);
    }
    if effects.fired {
        stats.set_fired(affected);
    }
    // Slots outside the gatherable range are deliberately ignored.
    if (0..INFO_SLOTS as i32).contains(&effects.info_gathered) {
        stats.set_info_flag(affected, effects.info_gathered as usize);
    }
}

/// Whether a restriction passes against current stats. A restriction with
/// every field unconstrained always passes.
fn restriction_satisfied(restriction: &Restriction, stats: &GameStats) -> bool {
    let relationship = stats.relationship(restriction.character);

    let positive_ok = restriction.positive_threshold == NO_CONSTRAINT
        || relationship >= restriction.positive_threshold;
    let negative_ok = restriction.negative_threshold == NO_CONSTRAINT
        || relationship <= -restriction.negative_threshold;
    let info_ok = restriction.info_index == NO_CONSTRAINT
        || usize::try_from(restriction.info_index)
            .map(|index| stats.info_flag(restriction.character, index))
            .unwrap_or(false);

    positive_ok && negative_ok && info_ok
}

/// Resolve a scene address, load its graph, and begin traversal.
///
/// Main `Dialogue` scenes cost [`DIALOGUE_START_TIME_INCREMENT`] minutes of
/// game time; snippets are free. A load failure is returned before any state
/// changes.
pub fn start_scene(
    root: impl AsRef<std::path::Path>,
    address: &SceneAddress,
    stats: &mut GameStats,
) -> Result<(Traversal, Prompt), DialogueError> {
    let tree = load_tree(root, address)?;
    if address.kind == SceneKind::Dialogue {
        stats.add_clock_minutes(DIALOGUE_START_TIME_INCREMENT);
    }
    Traversal::begin(tree, stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::NodeEffects;
    use game_state::DAY_START_MINUTES;

    /// A small branching scene: player "hi" -> dave "hey" -> {"bye", "later"}.
    fn scenario_tree() -> DialogueTree {
        let mut tree = DialogueTree::new();
        let a = tree.add_node(|n| n.with_text("hi"));
        let b = tree.add_node(|n| n.with_speaker(Character::Dave).with_text("hey"));
        let c = tree.add_node(|n| n.with_speaker(Character::Dave).with_text("bye"));
        let d = tree.add_node(|n| n.with_speaker(Character::Dave).with_text("later"));
        tree.connect(a, b).unwrap();
        tree.connect(b, c).unwrap();
        tree.connect(b, d).unwrap();
        tree
    }

    fn line(prompt: &Prompt) -> &LineView {
        match prompt {
            Prompt::Line(view) => view,
            other => panic!("expected a line, got {other:?}"),
        }
    }

    #[test]
    fn test_scenario_walkthrough() {
        let mut stats = GameStats::new();
        let (mut traversal, prompt) = Traversal::begin(scenario_tree(), &mut stats).unwrap();

        let first = line(&prompt);
        assert_eq!(first.text, "hi");
        assert_eq!(first.speaker, Character::Player);
        assert_eq!(first.side, Side::Left);

        // Single successor: no choice suspension.
        let prompt = traversal.acknowledge(&mut stats).unwrap();
        let second = line(&prompt);
        assert_eq!(second.text, "hey");
        assert_eq!(second.side, Side::Right);

        // Two successors: options in stored order.
        let prompt = traversal.acknowledge(&mut stats).unwrap();
        assert_eq!(
            prompt,
            Prompt::Choice(vec!["bye".to_string(), "later".to_string()])
        );

        let prompt = traversal.choose(1, &mut stats).unwrap();
        assert_eq!(line(&prompt).text, "later");

        // Leaf: terminate after display.
        let prompt = traversal.acknowledge(&mut stats).unwrap();
        assert_eq!(prompt, Prompt::Finished);
        assert!(traversal.is_finished());

        // No flags on any node, so stats are untouched.
        let fresh = GameStats::new();
        for c in Character::ALL {
            assert_eq!(stats.relationship(c), fresh.relationship(c));
            assert_eq!(stats.is_fired(c), fresh.is_fired(c));
        }
        assert_eq!(stats.clock_minutes, fresh.clock_minutes);
    }

    #[test]
    fn test_force_left_side() {
        let mut tree = DialogueTree::new();
        tree.add_node(|n| {
            n.with_speaker(Character::Sharon)
                .with_text("over here")
                .with_force_left()
        });

        let mut stats = GameStats::new();
        let (_, prompt) = Traversal::begin(tree, &mut stats).unwrap();
        assert_eq!(line(&prompt).side, Side::Left);
    }

    #[test]
    fn test_positive_effect_adjusts_exactly_one_character() {
        let mut tree = DialogueTree::new();
        tree.add_node(|n| {
            n.with_speaker(Character::Dave).with_effects(NodeEffects {
                character_affected: Some(Character::Dave),
                positive: true,
                ..Default::default()
            })
        });

        let mut stats = GameStats::new();
        let (_, _) = Traversal::begin(tree, &mut stats).unwrap();

        assert_eq!(stats.relationship(Character::Dave), 1);
        for c in Character::ALL {
            if c != Character::Dave {
                assert_eq!(stats.relationship(c), 0);
            }
        }
    }

    #[test]
    fn test_long_option_costs_time() {
        let mut tree = DialogueTree::new();
        tree.add_node(|n| {
            n.with_effects(NodeEffects {
                long_option: true,
                ..Default::default()
            })
        });

        let mut stats = GameStats::new();
        let (_, _) = Traversal::begin(tree, &mut stats).unwrap();
        assert_eq!(
            stats.clock_minutes,
            DAY_START_MINUTES + DIALOGUE_LONG_TIME_INCREMENT
        );
    }

    #[test]
    fn test_info_gathering_is_idempotent() {
        let effects = NodeEffects {
            character_affected: Some(Character::Dave),
            info_gathered: 3,
            ..Default::default()
        };

        let mut stats = GameStats::new();
        for _ in 0..2 {
            let mut tree = DialogueTree::new();
            tree.add_node(|n| n.with_effects(effects));
            let (_, _) = Traversal::begin(tree, &mut stats).unwrap();
            assert!(stats.info_flag(Character::Dave, 3));
        }
    }

    #[test]
    fn test_out_of_range_info_is_a_noop() {
        for index in [-1, -5, INFO_SLOTS as i32, 99] {
            let mut tree = DialogueTree::new();
            tree.add_node(|n| {
                n.with_effects(NodeEffects {
                    character_affected: Some(Character::Dave),
                    info_gathered: index,
                    ..Default::default()
                })
            });

            let mut stats = GameStats::new();
            let (_, _) = Traversal::begin(tree, &mut stats).unwrap();
            assert!((0..INFO_SLOTS).all(|i| !stats.info_flag(Character::Dave, i)));
        }
    }

    #[test]
    fn test_noop_restriction_never_prunes() {
        // Both options carry restrictions with every field unconstrained.
        let mut tree = DialogueTree::new();
        let head = tree.add_node(|n| n.with_speaker(Character::Dave).with_text("so?"));
        let yes = tree.add_node(|n| {
            n.with_text("yes")
                .with_restriction(Restriction::none(Character::Dave))
        });
        let no = tree.add_node(|n| {
            n.with_text("no")
                .with_restriction(Restriction::none(Character::Dave))
        });
        tree.connect(head, yes).unwrap();
        tree.connect(head, no).unwrap();

        let mut stats = GameStats::new();
        let (mut traversal, _) = Traversal::begin(tree, &mut stats).unwrap();
        let prompt = traversal.acknowledge(&mut stats).unwrap();
        assert_eq!(
            prompt,
            Prompt::Choice(vec!["yes".to_string(), "no".to_string()])
        );
    }

    #[test]
    fn test_restriction_pruning() {
        // Head -> gated(high relationship) + open.
        let mut tree = DialogueTree::new();
        let head = tree.add_node(|n| n.with_text("hi"));
        let gated = tree.add_node(|n| {
            n.with_speaker(Character::Dave)
                .with_text("secret")
                .with_restriction(Restriction {
                    character: Character::Dave,
                    positive_threshold: 1,
                    negative_threshold: NO_CONSTRAINT,
                    info_index: NO_CONSTRAINT,
                })
        });
        let open = tree.add_node(|n| n.with_speaker(Character::Dave).with_text("small talk"));
        tree.connect(head, gated).unwrap();
        tree.connect(head, open).unwrap();

        // Relationship 0 < threshold 1: gated option pruned, single successor
        // auto-advances.
        let mut stats = GameStats::new();
        let (mut traversal, _) = Traversal::begin(tree.clone(), &mut stats).unwrap();
        let prompt = traversal.acknowledge(&mut stats).unwrap();
        assert_eq!(line(&prompt).text, "small talk");

        // Relationship 1 satisfies it: both options offered.
        let mut stats = GameStats::new();
        stats.adjust_relationship(Character::Dave, 1);
        let (mut traversal, _) = Traversal::begin(tree, &mut stats).unwrap();
        let prompt = traversal.acknowledge(&mut stats).unwrap();
        assert_eq!(
            prompt,
            Prompt::Choice(vec!["secret".to_string(), "small talk".to_string()])
        );
    }

    #[test]
    fn test_info_restriction() {
        let mut tree = DialogueTree::new();
        let head = tree.add_node(|n| n.with_text("hi"));
        let gated = tree.add_node(|n| {
            n.with_speaker(Character::Dave)
                .with_text("about sharon...")
                .with_restriction(Restriction {
                    character: Character::Sharon,
                    positive_threshold: NO_CONSTRAINT,
                    negative_threshold: NO_CONSTRAINT,
                    info_index: 2,
                })
        });
        tree.connect(head, gated).unwrap();

        let mut stats = GameStats::new();
        let (mut traversal, _) = Traversal::begin(tree.clone(), &mut stats).unwrap();
        // Flag unset: the only successor is pruned, so the scene ends.
        let prompt = traversal.acknowledge(&mut stats).unwrap();
        assert_eq!(prompt, Prompt::Finished);

        stats.set_info_flag(Character::Sharon, 2);
        let (mut traversal, _) = Traversal::begin(tree, &mut stats).unwrap();
        let prompt = traversal.acknowledge(&mut stats).unwrap();
        assert_eq!(line(&prompt).text, "about sharon...");
    }

    #[test]
    fn test_resume_in_wrong_phase_is_an_error() {
        let mut stats = GameStats::new();
        let (mut traversal, _) = Traversal::begin(scenario_tree(), &mut stats).unwrap();

        // Awaiting an ack: choosing is a driver bug.
        assert!(matches!(
            traversal.choose(0, &mut stats),
            Err(DialogueError::NotAwaitingChoice)
        ));

        // Walk to the choice point, then an ack is the bug.
        traversal.acknowledge(&mut stats).unwrap();
        traversal.acknowledge(&mut stats).unwrap();
        assert!(matches!(
            traversal.acknowledge(&mut stats),
            Err(DialogueError::NotAwaitingAck)
        ));

        // Out-of-range choice reports the option count and stays resumable.
        assert!(matches!(
            traversal.choose(5, &mut stats),
            Err(DialogueError::ChoiceOutOfRange {
                index: 5,
                options: 2,
            })
        ));
        assert!(traversal.choose(0, &mut stats).is_ok());
    }

    struct ScriptedPresenter {
        picks: Vec<usize>,
        transcript: Vec<String>,
        finished: bool,
    }

    impl Presenter for ScriptedPresenter {
        fn display_line(&mut self, line: &LineView) {
            self.transcript
                .push(format!("{}: {}", line.speaker, line.text));
        }

        fn choose(&mut self, labels: &[String]) -> usize {
            self.transcript.push(format!("options: {labels:?}"));
            self.picks.remove(0)
        }

        fn finished(&mut self) {
            self.finished = true;
        }
    }

    #[test]
    fn test_run_with_presenter() {
        let mut stats = GameStats::new();
        let (traversal, prompt) = Traversal::begin(scenario_tree(), &mut stats).unwrap();

        let mut presenter = ScriptedPresenter {
            picks: vec![0],
            transcript: Vec::new(),
            finished: false,
        };
        traversal
            .run_with(prompt, &mut presenter, &mut stats)
            .unwrap();

        assert!(presenter.finished);
        assert_eq!(
            presenter.transcript,
            vec![
                "player: hi",
                "dave: hey",
                "options: [\"bye\", \"later\"]",
                "dave: bye",
            ]
        );
    }

    #[test]
    fn test_start_scene_time_cost() {
        let root = tempfile::tempdir().unwrap();
        let dialogue = SceneAddress::new(SceneKind::Dialogue, Character::Dave, 0);
        let snippet = SceneAddress::new(SceneKind::Snippet, Character::Dave, 0);
        crate::storage::save_tree(root.path(), &scenario_tree(), &dialogue).unwrap();
        crate::storage::save_tree(root.path(), &scenario_tree(), &snippet).unwrap();

        let mut stats = GameStats::new();
        start_scene(root.path(), &dialogue, &mut stats).unwrap();
        assert_eq!(
            stats.clock_minutes,
            DAY_START_MINUTES + DIALOGUE_START_TIME_INCREMENT
        );

        let mut stats = GameStats::new();
        start_scene(root.path(), &snippet, &mut stats).unwrap();
        assert_eq!(stats.clock_minutes, DAY_START_MINUTES);
    }

    #[test]
    fn test_start_scene_missing_asset_changes_nothing() {
        let root = tempfile::tempdir().unwrap();
        let address = SceneAddress::new(SceneKind::Dialogue, Character::Sharon, 7);

        let mut stats = GameStats::new();
        let err = start_scene(root.path(), &address, &mut stats).unwrap_err();
        assert!(matches!(err, DialogueError::SceneNotFound { .. }));
        assert_eq!(stats.clock_minutes, DAY_START_MINUTES);
    }
}
