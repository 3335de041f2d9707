//! Scene storage - addressing, saving, and loading dialogue graphs.
//!
//! Scenes are addressed as `{kind}/{character}/{kind}{scene}` under a content
//! root, e.g. `Dialogue/dave/Dialogue3`. The persisted form is JSON: a node
//! list keyed by id and a connection list of `{from, to}` pairs whose order
//! is the choice display order.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use game_state::Character;

use crate::error::DialogueError;
use crate::graph::DialogueTree;

/// The two kinds of scene a character can deliver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SceneKind {
    /// A main conversation; consumes one unit of the day's budget.
    Dialogue,
    /// A short non-consuming fallback once main content is exhausted.
    Snippet,
}

impl SceneKind {
    pub fn name(&self) -> &'static str {
        match self {
            SceneKind::Dialogue => "Dialogue",
            SceneKind::Snippet => "Snippet",
        }
    }
}

impl std::fmt::Display for SceneKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The address of one scene: kind, character, and scene index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SceneAddress {
    pub kind: SceneKind,
    pub character: Character,
    pub scene: u32,
}

impl SceneAddress {
    pub fn new(kind: SceneKind, character: Character, scene: u32) -> Self {
        Self {
            kind,
            character,
            scene,
        }
    }

    /// The directory this scene lives in: `{kind}/{character}`.
    pub fn directory(&self) -> PathBuf {
        Path::new(self.kind.name()).join(self.character.name())
    }

    /// The file name for this scene: `{kind}{scene}` plus the JSON extension.
    pub fn file_name(&self) -> String {
        format!("{}{}.json", self.kind, self.scene)
    }

    /// Path relative to the content root.
    pub fn relative_path(&self) -> PathBuf {
        self.directory().join(self.file_name())
    }
}

impl std::fmt::Display for SceneAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/{}{}", self.kind, self.character, self.kind, self.scene)
    }
}

/// Write a tree to its address under `root`, creating directories as needed.
pub fn save_tree(
    root: impl AsRef<Path>,
    tree: &DialogueTree,
    address: &SceneAddress,
) -> Result<(), DialogueError> {
    let dir = root.as_ref().join(address.directory());
    std::fs::create_dir_all(&dir)?;
    let json = serde_json::to_string_pretty(tree)?;
    std::fs::write(dir.join(address.file_name()), json)?;
    tracing::debug!(%address, nodes = tree.len(), "saved dialogue scene");
    Ok(())
}

/// Load and fuse the tree at an address under `root`.
///
/// A missing file is a fatal [`DialogueError::SceneNotFound`], never a silent
/// empty graph. The returned tree has passed [`DialogueTree::fuse`] and is
/// ready for traversal.
pub fn load_tree(
    root: impl AsRef<Path>,
    address: &SceneAddress,
) -> Result<DialogueTree, DialogueError> {
    let path = root.as_ref().join(address.relative_path());
    let text = match std::fs::read_to_string(&path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Err(DialogueError::SceneNotFound {
                path: path.display().to_string(),
            });
        }
        Err(err) => return Err(err.into()),
    };

    let mut tree: DialogueTree = serde_json::from_str(&text)?;
    tree.fuse()?;
    tracing::debug!(%address, nodes = tree.len(), "loaded dialogue scene");
    Ok(tree)
}
