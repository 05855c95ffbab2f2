use crate::editing::image::fill_placeholder;
use crate::editing::layout::{TEXT_STARTER, compose, image_fragment};
use crate::editing::{Block, BlockId, BlockKind, Document, Patch};

/// Edit commands for the block sequence
///
/// Every command is a total function of the current document: unknown ids
/// and unfillable image targets produce an unchanged document rather than an
/// error.
#[derive(Debug, Clone, PartialEq)]
pub enum Cmd {
    /// Add a new block with the default content for its kind at the end
    Append { kind: BlockKind },
    /// Remove a block
    Delete { id: BlockId },
    /// Replace a block's content (kind, id and position are kept)
    UpdateContent { id: BlockId, content: String },
    /// Move `dragged` into the slot currently held by `target`
    Reorder { dragged: BlockId, target: BlockId },
    /// Bind image data to a block, or append a new image block when `target` is `None`
    InsertImage {
        payload: String,
        target: Option<BlockId>,
    },
}

/// Compile a command against the current document into a patch
pub(crate) fn compile_command(doc: &Document, cmd: &Cmd) -> Patch {
    match cmd {
        Cmd::Append { kind } => append(doc, *kind),
        Cmd::Delete { id } => delete(doc, *id),
        Cmd::UpdateContent { id, content } => update_content(doc, *id, content),
        Cmd::Reorder { dragged, target } => reorder(doc, *dragged, *target),
        Cmd::InsertImage { payload, target } => insert_image(doc, payload, *target),
    }
}

fn default_content(kind: BlockKind) -> String {
    match kind {
        BlockKind::Text => TEXT_STARTER.to_string(),
        BlockKind::Image => String::new(),
        BlockKind::Layout(orientation) => compose(orientation),
    }
}

fn push_block(doc: &Document, kind: BlockKind, content: String) -> Patch {
    let mut block = Block::new(kind, content.clone());
    while doc.contains(block.id()) {
        block = Block::new(kind, content.clone());
    }
    let id = block.id();

    let mut blocks = doc.blocks().to_vec();
    blocks.push(block);
    Patch::changed(Document::from_blocks(blocks), id)
}

fn append(doc: &Document, kind: BlockKind) -> Patch {
    push_block(doc, kind, default_content(kind))
}

fn delete(doc: &Document, id: BlockId) -> Patch {
    if !doc.contains(id) {
        log::debug!("delete: no block {id}, leaving document unchanged");
        return Patch::unchanged(doc);
    }

    let blocks = doc
        .blocks()
        .iter()
        .filter(|block| block.id() != id)
        .cloned()
        .collect();
    Patch::changed(Document::from_blocks(blocks), id)
}

fn replace_content(doc: &Document, index: usize, content: impl Into<String>) -> Patch {
    let mut blocks = doc.blocks().to_vec();
    let id = blocks[index].id();
    blocks[index] = blocks[index].with_content(content);
    Patch::changed(Document::from_blocks(blocks), id)
}

fn update_content(doc: &Document, id: BlockId, content: &str) -> Patch {
    match doc.position(id) {
        Some(index) => replace_content(doc, index, content),
        None => {
            log::debug!("update_content: no block {id}, leaving document unchanged");
            Patch::unchanged(doc)
        }
    }
}

fn reorder(doc: &Document, dragged: BlockId, target: BlockId) -> Patch {
    if dragged == target {
        return Patch::unchanged(doc);
    }
    let (Some(from), Some(to)) = (doc.position(dragged), doc.position(target)) else {
        log::debug!("reorder: {dragged} -> {target} names a missing block, leaving document unchanged");
        return Patch::unchanged(doc);
    };

    // The dragged block takes the target's slot: dropping on a block above
    // lands before it, dropping on a block below lands after it.
    let mut blocks = doc.blocks().to_vec();
    let moved = blocks.remove(from);
    blocks.insert(to, moved);
    Patch::changed(Document::from_blocks(blocks), dragged)
}

fn insert_image(doc: &Document, payload: &str, target: Option<BlockId>) -> Patch {
    let Some(target) = target else {
        return push_block(doc, BlockKind::Image, image_fragment(payload));
    };

    let Some(index) = doc.position(target) else {
        log::debug!("insert_image: no block {target}, image not applied");
        return Patch::unchanged(doc);
    };

    let block = &doc.blocks()[index];
    match block.kind() {
        BlockKind::Layout(_) => match fill_placeholder(block.content(), payload) {
            Some(content) => replace_content(doc, index, content),
            None => {
                log::debug!("insert_image: layout {target} has no image placeholder, image not applied");
                Patch::unchanged(doc)
            }
        },
        BlockKind::Text | BlockKind::Image => {
            replace_content(doc, index, image_fragment(payload))
        }
    }
}
