use crate::editing::{Block, BlockId, BlockKind, Cmd, Patch};

/// Ordered sequence of blocks making up a page
///
/// Documents are values: every edit goes through [`Document::apply`] (or one
/// of the convenience wrappers) and produces a new `Document`, leaving the
/// original untouched. The editing session holds the single current value and
/// swaps it for the result.
///
/// Block ids are unique within a document.
///
/// ```rust
/// # use blockpage_engine::editing::{BlockKind, Document, Orientation};
/// let doc = Document::new()
///     .append(BlockKind::Text)
///     .append(BlockKind::Layout(Orientation::ImageFirst));
///
/// let layout = doc.ids()[1];
/// let doc = doc.insert_image("data:image/png;base64,AAAA", Some(layout));
///
/// let html = doc.export_html();
/// # assert!(html.contains("data:image/png;base64,AAAA"));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    blocks: Vec<Block>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Callers guarantee ids are unique
    pub(crate) fn from_blocks(blocks: Vec<Block>) -> Self {
        Self { blocks }
    }

    /// Apply a command, returning the new document and the block it touched
    pub fn apply(&self, cmd: Cmd) -> Patch {
        crate::editing::commands::compile_command(self, &cmd)
    }

    pub fn append(&self, kind: BlockKind) -> Self {
        self.apply(Cmd::Append { kind }).document
    }

    pub fn delete(&self, id: BlockId) -> Self {
        self.apply(Cmd::Delete { id }).document
    }

    pub fn update_content(&self, id: BlockId, content: impl Into<String>) -> Self {
        self.apply(Cmd::UpdateContent {
            id,
            content: content.into(),
        })
        .document
    }

    pub fn reorder(&self, dragged: BlockId, target: BlockId) -> Self {
        self.apply(Cmd::Reorder { dragged, target }).document
    }

    pub fn insert_image(&self, payload: impl Into<String>, target: Option<BlockId>) -> Self {
        self.apply(Cmd::InsertImage {
            payload: payload.into(),
            target,
        })
        .document
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn get(&self, id: BlockId) -> Option<&Block> {
        self.blocks.iter().find(|block| block.id() == id)
    }

    pub fn position(&self, id: BlockId) -> Option<usize> {
        self.blocks.iter().position(|block| block.id() == id)
    }

    pub fn contains(&self, id: BlockId) -> bool {
        self.position(id).is_some()
    }

    /// Block ids in document order
    pub fn ids(&self) -> Vec<BlockId> {
        self.blocks.iter().map(Block::id).collect()
    }
}
