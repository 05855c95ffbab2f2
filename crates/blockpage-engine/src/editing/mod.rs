/*!
 * # Block Editing Core
 *
 * A page is an ordered sequence of blocks. Each block is plain text, an image,
 * or a two-column layout pairing an image region with a text region.
 *
 * ## Architecture Overview
 *
 * ### 1. Value Documents
 * - `Document` is an immutable value; commands return a new document
 * - Callers never observe a half-applied edit
 * - Unknown ids turn commands into no-ops rather than errors
 *
 * ### 2. Command-Based Editing
 * - All edits are represented as **Commands** (`Cmd` enum)
 * - `Document::apply` compiles a command into a `Patch` holding the new
 *   document and the id of the block that changed
 *
 * ### 3. Layout Composition and Image Binding
 * - New layout blocks hold an image placeholder region and a text region
 * - Inserting an image fills the placeholder region only, byte-for-byte
 *   preserving the sibling region
 *
 * ### 4. Read Side
 * - `storage` round-trips documents through JSON, falling back to a single
 *   text block for anything that is not a stored block list
 * - `export` flattens the blocks into final HTML
 *
 * ## Module Structure
 *
 * - **`block`**: `Block`, `BlockId`, `BlockKind`, `Orientation`
 * - **`document`**: the `Document` value and its read helpers
 * - **`commands`**: `Cmd` enum and its compilation into patches
 * - **`layout`**: fixed markup fragments and the layout composer
 * - **`image`**: structural placeholder matching
 * - **`patch`**: edit result
 * - **`storage`**: persisted form
 * - **`export`**: HTML export
 */

pub mod block;
pub mod commands;
pub mod document;
pub mod export;
pub mod image;
pub mod layout;
pub mod patch;
pub mod storage;

pub use block::{Block, BlockError, BlockId, BlockKind, Orientation};
pub use commands::Cmd;
pub use document::Document;
pub use patch::Patch;
pub use storage::StorageError;
