pub mod document_file;

pub use document_file::DocumentFile;
