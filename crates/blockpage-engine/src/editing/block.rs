use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a block
///
/// Generated once when the block is created and never recomputed, so UI
/// references to a block survive reorders and content edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(Uuid);

impl BlockId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for BlockId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for BlockId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Region order of a two-column layout block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    /// Image region on the left, text region on the right
    #[serde(rename = "image-first", alias = "image-text")]
    ImageFirst,
    /// Text region on the left, image region on the right
    #[serde(rename = "text-first", alias = "text-image")]
    TextFirst,
}

impl Orientation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Orientation::ImageFirst => "image-first",
            Orientation::TextFirst => "text-first",
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a block holds. Fixed when the block is created.
///
/// Orientation only exists on the layout variant, so a text block with an
/// orientation (or a layout without one) cannot be constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    Text,
    Image,
    Layout(Orientation),
}

impl BlockKind {
    /// Tag used in the persisted form
    pub fn tag(&self) -> &'static str {
        match self {
            BlockKind::Text => "text",
            BlockKind::Image => "image",
            BlockKind::Layout(_) => "layout",
        }
    }

    pub fn orientation(&self) -> Option<Orientation> {
        match self {
            BlockKind::Layout(orientation) => Some(*orientation),
            BlockKind::Text | BlockKind::Image => None,
        }
    }

    pub fn is_layout(&self) -> bool {
        matches!(self, BlockKind::Layout(_))
    }
}

/// Errors building a block kind from its persisted `(kind, orientation)` pair
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BlockError {
    #[error("Unknown block kind: {0}")]
    UnknownKind(String),
    #[error("Layout block is missing its orientation")]
    MissingOrientation,
    #[error("Orientation is only valid on layout blocks, found on {0} block")]
    UnexpectedOrientation(String),
}

impl BlockKind {
    pub fn from_parts(tag: &str, orientation: Option<Orientation>) -> Result<Self, BlockError> {
        match (tag, orientation) {
            ("text", None) => Ok(BlockKind::Text),
            ("image", None) => Ok(BlockKind::Image),
            ("layout", Some(orientation)) => Ok(BlockKind::Layout(orientation)),
            ("layout", None) => Err(BlockError::MissingOrientation),
            ("text" | "image", Some(_)) => Err(BlockError::UnexpectedOrientation(tag.to_string())),
            (other, _) => Err(BlockError::UnknownKind(other.to_string())),
        }
    }
}

/// The atomic unit of document content
///
/// `content` is an opaque markup fragment. For layout blocks it is the
/// concatenation of the two region fragments in orientation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    id: BlockId,
    kind: BlockKind,
    content: String,
}

impl Block {
    pub(crate) fn new(kind: BlockKind, content: impl Into<String>) -> Self {
        Self {
            id: BlockId::new(),
            kind,
            content: content.into(),
        }
    }

    /// Rebuild a block that already has an identity (used when decoding)
    pub(crate) fn with_id(id: BlockId, kind: BlockKind, content: String) -> Self {
        Self { id, kind, content }
    }

    /// Copy of this block with new content; id and kind are kept
    pub(crate) fn with_content(&self, content: impl Into<String>) -> Self {
        Self {
            id: self.id,
            kind: self.kind,
            content: content.into(),
        }
    }

    pub fn id(&self) -> BlockId {
        self.id
    }

    pub fn kind(&self) -> BlockKind {
        self.kind
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}
