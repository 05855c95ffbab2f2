pub mod editing;
pub mod io;
pub mod models;

#[cfg(test)]
pub mod tests;

// Re-export key types for easier usage
pub use editing::{
    Block, BlockError, BlockId, BlockKind, Cmd, Document, Orientation, Patch, StorageError,
};
pub use io::*;
pub use models::DocumentFile;
