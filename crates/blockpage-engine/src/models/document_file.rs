use relative_path::{RelativePath, RelativePathBuf};

/// Extension of stored documents
pub const DOCUMENT_EXTENSION: &str = "json";

/// Extension of exported pages
pub const EXPORT_EXTENSION: &str = "html";

/// A stored document with a relative path and display-friendly name
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentFile {
    relative_path: RelativePathBuf,
    display_name: String,
    display_path: String,
}

impl DocumentFile {
    /// Create a new DocumentFile from a relative path
    ///
    /// A path without an extension gets `.json` appended.
    pub fn new(relative_path: RelativePathBuf) -> Self {
        let relative_path = if relative_path.extension().is_none() {
            relative_path.with_extension(DOCUMENT_EXTENSION)
        } else {
            relative_path
        };
        let display_name = Self::extract_display_name(&relative_path);
        let display_path = Self::strip_extension(relative_path.as_str()).to_string();

        Self {
            relative_path,
            display_name,
            display_path,
        }
    }

    pub fn from_relative_str(path: &str) -> Self {
        Self::new(RelativePathBuf::from(path))
    }

    pub fn relative_path(&self) -> &RelativePath {
        &self.relative_path
    }

    /// File name without the `.json` extension
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Relative path without the `.json` extension, for titles
    pub fn display_path(&self) -> &str {
        &self.display_path
    }

    /// Where the HTML export of this document is written
    pub fn export_path(&self) -> RelativePathBuf {
        self.relative_path.with_extension(EXPORT_EXTENSION)
    }

    fn strip_extension(name: &str) -> &str {
        name.strip_suffix(".json").unwrap_or(name)
    }

    fn extract_display_name(path: &RelativePath) -> String {
        path.file_name()
            .map(Self::strip_extension)
            .unwrap_or("Untitled")
            .to_string()
    }
}

impl From<RelativePathBuf> for DocumentFile {
    fn from(path: RelativePathBuf) -> Self {
        Self::new(path)
    }
}

impl From<&str> for DocumentFile {
    fn from(path: &str) -> Self {
        Self::from_relative_str(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_strip_extension() {
        let file = DocumentFile::from("pages/home.json");
        assert_eq!(file.display_name(), "home");
        assert_eq!(file.display_path(), "pages/home");
        assert_eq!(file.relative_path().as_str(), "pages/home.json");
    }

    #[test]
    fn test_missing_extension_is_added() {
        let file = DocumentFile::from("drafts/post");
        assert_eq!(file.relative_path().as_str(), "drafts/post.json");
        assert_eq!(file.display_name(), "post");
    }

    #[test]
    fn test_other_extension_is_kept() {
        let file = DocumentFile::from("legacy.html");
        assert_eq!(file.relative_path().as_str(), "legacy.html");
        assert_eq!(file.display_name(), "legacy.html");
    }

    #[test]
    fn test_export_path_swaps_extension() {
        let file = DocumentFile::from("pages/home.json");
        assert_eq!(file.export_path().as_str(), "pages/home.html");
    }
}
