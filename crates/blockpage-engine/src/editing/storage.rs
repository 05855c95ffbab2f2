//! Persisted form of a document.
//!
//! A document is stored as a pretty-printed JSON array of block records:
//!
//! ```json
//! [
//!   { "id": "…", "kind": "text", "content": "<p>Start typing...</p>" },
//!   { "id": "…", "kind": "layout", "content": "…", "orientation": "image-first" }
//! ]
//! ```
//!
//! Files written by the older web editor used `type` / `layout` field names
//! and `image-text` / `text-image` values; those are accepted when loading.
//! Anything that does not decode as a block list is treated as raw markup and
//! loaded as a single text block.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::editing::{Block, BlockError, BlockId, BlockKind, Document, Orientation};

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Invalid stored document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid block {id}: {source}")]
    Block { id: BlockId, source: BlockError },
    #[error("Duplicate block id: {0}")]
    DuplicateId(BlockId),
}

#[derive(Debug, Serialize, Deserialize)]
struct BlockRecord {
    id: BlockId,
    #[serde(alias = "type")]
    kind: String,
    content: String,
    #[serde(default, alias = "layout", skip_serializing_if = "Option::is_none")]
    orientation: Option<Orientation>,
}

impl From<&Block> for BlockRecord {
    fn from(block: &Block) -> Self {
        Self {
            id: block.id(),
            kind: block.kind().tag().to_string(),
            content: block.content().to_string(),
            orientation: block.kind().orientation(),
        }
    }
}

impl TryFrom<BlockRecord> for Block {
    type Error = StorageError;

    fn try_from(record: BlockRecord) -> Result<Self, Self::Error> {
        let kind = BlockKind::from_parts(&record.kind, record.orientation).map_err(|source| {
            StorageError::Block {
                id: record.id,
                source,
            }
        })?;
        Ok(Block::with_id(record.id, kind, record.content))
    }
}

impl Document {
    /// Encode the document in its persisted form
    pub fn to_storage_string(&self) -> Result<String, StorageError> {
        let records: Vec<BlockRecord> = self.blocks().iter().map(BlockRecord::from).collect();
        Ok(serde_json::to_string_pretty(&records)?)
    }

    /// Decode a persisted document, rejecting anything that is not a valid block list
    pub fn try_from_storage_str(stored: &str) -> Result<Self, StorageError> {
        let records: Vec<BlockRecord> = serde_json::from_str(stored)?;

        let mut seen = HashSet::with_capacity(records.len());
        let mut blocks = Vec::with_capacity(records.len());
        for record in records {
            if !seen.insert(record.id) {
                return Err(StorageError::DuplicateId(record.id));
            }
            blocks.push(Block::try_from(record)?);
        }

        Ok(Document::from_blocks(blocks))
    }

    /// Load a stored string, falling back to one text block holding the raw input
    pub fn from_storage_str(stored: &str) -> Self {
        match Self::try_from_storage_str(stored) {
            Ok(doc) => doc,
            Err(e) => {
                log::debug!("Loading content as raw markup: {e}");
                Document::from_blocks(vec![Block::new(BlockKind::Text, stored)])
            }
        }
    }
}
