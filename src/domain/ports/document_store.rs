//! DocumentStore port - abstraction over the vault
//!
//! Every scanner and writer talks to the vault through this trait, so the
//! pipeline runs the same against a directory on disk or an in-memory map.
//! Paths are vault-relative, `/`-separated strings.

use serde_yaml_ng::Mapping;

use crate::parser::split_frontmatter;

/// Result type for document store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Document store operation errors
#[derive(Debug)]
pub enum StoreError {
    /// Document not found
    NotFound(String),
    /// Permission denied
    PermissionDenied(String),
    /// Content is not valid UTF-8 text
    NotText(String),
    /// I/O error
    Io(std::io::Error),
    /// Other error
    Other(String),
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => StoreError::NotFound(String::new()),
            std::io::ErrorKind::PermissionDenied => StoreError::PermissionDenied(String::new()),
            std::io::ErrorKind::InvalidData => StoreError::NotText(String::new()),
            _ => StoreError::Io(err),
        }
    }
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::NotFound(path) => write!(f, "Document not found: {}", path),
            StoreError::PermissionDenied(path) => write!(f, "Permission denied: {}", path),
            StoreError::NotText(path) => write!(f, "Not a text document: {}", path),
            StoreError::Io(err) => write!(f, "I/O error: {}", err),
            StoreError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Io(err) => Some(err),
            _ => None,
        }
    }
}

/// Per-document metadata used by scanners and change detection
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentMeta {
    /// Modification fingerprint (milliseconds since the epoch on disk)
    pub fingerprint: u64,
    /// Parsed YAML frontmatter, `None` when the document has none or it
    /// does not parse as a mapping
    pub frontmatter: Option<Mapping>,
}

/// Abstract vault interface
///
/// Implementations:
/// - `LocalVault` - a directory on disk
/// - `MemoryStore` - in-memory, for tests and embedding
pub trait DocumentStore {
    /// Check if a document or folder exists
    fn exists(&self, path: &str) -> bool;

    /// Read document content as text
    fn read(&self, path: &str) -> StoreResult<String>;

    /// Write document content, creating parent folders
    fn write(&self, path: &str, content: &str) -> StoreResult<()>;

    /// All documents (files, not folders) in the vault, sorted
    fn list(&self) -> StoreResult<Vec<String>>;

    /// Delete a document
    fn delete(&self, path: &str) -> StoreResult<()>;

    /// Create a folder and its parents
    fn create_folder(&self, path: &str) -> StoreResult<()>;

    /// Modification fingerprint of a document
    fn fingerprint(&self, path: &str) -> StoreResult<u64>;

    /// Fingerprint plus parsed frontmatter
    fn metadata(&self, path: &str) -> StoreResult<DocumentMeta> {
        let fingerprint = self.fingerprint(path)?;
        let frontmatter = if path.ends_with(".md") {
            let content = self.read(path)?;
            split_frontmatter(&content).and_then(|(yaml, _)| {
                serde_yaml_ng::from_str::<Mapping>(yaml).ok()
            })
        } else {
            None
        };
        Ok(DocumentMeta {
            fingerprint,
            frontmatter,
        })
    }
}

impl<T: DocumentStore + ?Sized> DocumentStore for &T {
    fn exists(&self, path: &str) -> bool {
        (**self).exists(path)
    }

    fn read(&self, path: &str) -> StoreResult<String> {
        (**self).read(path)
    }

    fn write(&self, path: &str, content: &str) -> StoreResult<()> {
        (**self).write(path, content)
    }

    fn list(&self) -> StoreResult<Vec<String>> {
        (**self).list()
    }

    fn delete(&self, path: &str) -> StoreResult<()> {
        (**self).delete(path)
    }

    fn create_folder(&self, path: &str) -> StoreResult<()> {
        (**self).create_folder(path)
    }

    fn fingerprint(&self, path: &str) -> StoreResult<u64> {
        (**self).fingerprint(path)
    }

    fn metadata(&self, path: &str) -> StoreResult<DocumentMeta> {
        (**self).metadata(path)
    }
}
