use crate::editing::{BlockId, Document};

/// Result of applying a command
#[derive(Debug, Clone, PartialEq)]
pub struct Patch {
    pub document: Document,
    /// Block created, edited or moved; `None` when the command changed nothing
    pub changed: Option<BlockId>,
}

impl Patch {
    pub(crate) fn changed(document: Document, id: BlockId) -> Self {
        Self {
            document,
            changed: Some(id),
        }
    }

    pub(crate) fn unchanged(document: &Document) -> Self {
        Self {
            document: document.clone(),
            changed: None,
        }
    }

    pub fn is_noop(&self) -> bool {
        self.changed.is_none()
    }
}
