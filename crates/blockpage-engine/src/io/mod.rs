use crate::editing::{Document, StorageError};
use crate::models::DocumentFile;
use relative_path::RelativePath;
use std::fs;
use std::path::{Path, PathBuf};

pub mod image;

pub use image::{
    DataUrl, ImageLoaded, encode_data_url, media_type_for_path, parse_data_url,
    read_image_data_url, spawn_image_load,
};

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid documents directory: {0}")]
    InvalidDocumentsDir(String),
    #[error("Could not encode document: {0}")]
    Storage(#[from] StorageError),
}

/// Read a file under the documents root and return its content
pub fn read_file(relative_path: &RelativePath, documents_root: &Path) -> Result<String, IoError> {
    let absolute_path = existing_path(relative_path, documents_root)?;
    fs::read_to_string(&absolute_path).map_err(IoError::Io)
}

fn existing_path(relative_path: &RelativePath, documents_root: &Path) -> Result<PathBuf, IoError> {
    let absolute_path = relative_path.to_path(documents_root);
    if !absolute_path.exists() {
        return Err(IoError::NotFound(absolute_path));
    }
    Ok(absolute_path)
}

/// Write content to a file under the documents root
pub fn write_file(
    relative_path: &RelativePath,
    documents_root: &Path,
    content: &str,
) -> Result<(), IoError> {
    let absolute_path = relative_path.to_path(documents_root);

    // Create parent directories if they don't exist
    if let Some(parent) = absolute_path.parent() {
        fs::create_dir_all(parent).map_err(IoError::Io)?;
    }

    fs::write(&absolute_path, content).map_err(IoError::Io)
}

/// Load a stored document; content that is not a block list becomes one text block
///
/// Bytes that are not valid UTF-8 are decoded lossily rather than rejected.
pub fn load_document(file: &DocumentFile, documents_root: &Path) -> Result<Document, IoError> {
    let absolute_path = existing_path(file.relative_path(), documents_root)?;
    let bytes = fs::read(&absolute_path)?;
    Ok(Document::from_storage_str(&String::from_utf8_lossy(&bytes)))
}

pub fn save_document(
    file: &DocumentFile,
    documents_root: &Path,
    document: &Document,
) -> Result<(), IoError> {
    let stored = document.to_storage_string()?;
    write_file(file.relative_path(), documents_root, &stored)?;
    log::info!(
        "Saved {} blocks to {}",
        document.len(),
        file.relative_path()
    );
    Ok(())
}

/// Write the HTML export next to the document, returning where it went
pub fn export_document(
    file: &DocumentFile,
    documents_root: &Path,
    document: &Document,
) -> Result<PathBuf, IoError> {
    let export_path = file.export_path();
    let page = document.export_page(file.display_name());
    write_file(&export_path, documents_root, &page)?;
    log::info!("Exported {} to {}", file.relative_path(), export_path);
    Ok(export_path.to_path(documents_root))
}

/// Scan for stored documents in the documents directory
pub fn scan_document_files(documents_root: &Path) -> Result<Vec<PathBuf>, IoError> {
    if !documents_root.exists() {
        return Err(IoError::InvalidDocumentsDir(
            "documents directory not found".to_string(),
        ));
    }

    let mut files = Vec::new();
    scan_directory_recursive(documents_root, &mut files)?;
    files.sort();
    Ok(files)
}

fn scan_directory_recursive(dir: &Path, files: &mut Vec<PathBuf>) -> Result<(), IoError> {
    let entries = fs::read_dir(dir).map_err(IoError::Io)?;

    for entry in entries {
        let entry = entry.map_err(IoError::Io)?;
        let path = entry.path();

        if path.is_dir() {
            scan_directory_recursive(&path, files)?;
        } else if let Some(ext) = path.extension()
            && ext == crate::models::document_file::DOCUMENT_EXTENSION
        {
            files.push(path);
        }
    }

    Ok(())
}

pub fn validate_documents_dir(path: &Path) -> Result<(), IoError> {
    if !path.exists() || !path.is_dir() {
        return Err(IoError::InvalidDocumentsDir(
            "Directory does not exist".to_string(),
        ));
    }

    Ok(())
}
