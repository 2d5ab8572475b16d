//! Local Vault Implementation
//!
//! Implements the DocumentStore port for a vault directory on disk.

use std::io::Write;
use std::path::{Component, Path, PathBuf};
use std::time::UNIX_EPOCH;

use ignore::WalkBuilder;

use crate::domain::ports::{DocumentStore, StoreError, StoreResult};
use crate::infrastructure::lock::LOCK_FILE;

/// A vault rooted at a directory.
///
/// Writes go through a temporary file in the target folder and are
/// renamed into place. Fingerprints are modification times in
/// milliseconds.
#[derive(Debug, Clone)]
pub struct LocalVault {
    root: PathBuf,
}

impl LocalVault {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a vault path onto the disk, refusing anything that escapes the root
    fn resolve(&self, path: &str) -> StoreResult<PathBuf> {
        let relative = Path::new(path);
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
        {
            return Err(StoreError::Other(format!("path escapes the vault: {}", path)));
        }
        Ok(self.root.join(relative))
    }
}

fn with_path(path: &str, err: std::io::Error) -> StoreError {
    match StoreError::from(err) {
        StoreError::NotFound(_) => StoreError::NotFound(path.to_string()),
        StoreError::PermissionDenied(_) => StoreError::PermissionDenied(path.to_string()),
        StoreError::NotText(_) => StoreError::NotText(path.to_string()),
        other => other,
    }
}

impl DocumentStore for LocalVault {
    fn exists(&self, path: &str) -> bool {
        self.resolve(path).map(|p| p.exists()).unwrap_or(false)
    }

    fn read(&self, path: &str) -> StoreResult<String> {
        std::fs::read_to_string(self.resolve(path)?).map_err(|e| with_path(path, e))
    }

    fn write(&self, path: &str, content: &str) -> StoreResult<()> {
        let target = self.resolve(path)?;
        let parent = target
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.root.clone());
        std::fs::create_dir_all(&parent).map_err(|e| with_path(path, e))?;

        let mut tmp = tempfile::NamedTempFile::new_in(&parent).map_err(|e| with_path(path, e))?;
        tmp.write_all(content.as_bytes())
            .map_err(|e| with_path(path, e))?;
        tmp.persist(&target).map_err(|e| with_path(path, e.error))?;
        Ok(())
    }

    fn list(&self) -> StoreResult<Vec<String>> {
        let walker = WalkBuilder::new(&self.root)
            .hidden(false)
            .ignore(false)
            .git_ignore(false)
            .git_global(false)
            .git_exclude(false)
            .parents(false)
            .filter_entry(|entry| entry.file_name() != std::ffi::OsStr::new(".git"))
            .build();

        let mut paths = Vec::new();
        for entry in walker {
            let entry = entry.map_err(|e| StoreError::Other(e.to_string()))?;
            if !entry.file_type().is_some_and(|t| t.is_file()) {
                continue;
            }
            let Ok(relative) = entry.path().strip_prefix(&self.root) else {
                continue;
            };
            let key = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            if key != LOCK_FILE {
                paths.push(key);
            }
        }
        paths.sort();
        Ok(paths)
    }

    fn delete(&self, path: &str) -> StoreResult<()> {
        std::fs::remove_file(self.resolve(path)?).map_err(|e| with_path(path, e))
    }

    fn create_folder(&self, path: &str) -> StoreResult<()> {
        std::fs::create_dir_all(self.resolve(path)?).map_err(|e| with_path(path, e))
    }

    fn fingerprint(&self, path: &str) -> StoreResult<u64> {
        let modified = std::fs::metadata(self.resolve(path)?)
            .and_then(|m| m.modified())
            .map_err(|e| with_path(path, e))?;
        let millis = modified
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or(0);
        Ok(u64::try_from(millis).unwrap_or(u64::MAX))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn write_and_read_create_parent_folders() {
        let dir = tempdir().unwrap();
        let vault = LocalVault::new(dir.path());

        vault.write("_publish/nested/a.md", "hello").unwrap();
        assert_eq!(vault.read("_publish/nested/a.md").unwrap(), "hello");
        assert!(vault.exists("_publish/nested"));
    }

    #[test]
    fn list_includes_hidden_config_but_not_git_or_lock() {
        let dir = tempdir().unwrap();
        let vault = LocalVault::new(dir.path());
        vault.write("Notes/a.md", "a").unwrap();
        vault.write(".obsidian/plugins/zoom-map/data.json", "{}").unwrap();
        vault.write(".git/HEAD", "ref").unwrap();
        vault.write(LOCK_FILE, "").unwrap();

        assert_eq!(
            vault.list().unwrap(),
            vec![".obsidian/plugins/zoom-map/data.json", "Notes/a.md"]
        );
    }

    #[test]
    fn missing_documents_report_their_path() {
        let dir = tempdir().unwrap();
        let vault = LocalVault::new(dir.path());
        match vault.read("Maps/gone.png") {
            Err(StoreError::NotFound(path)) => assert_eq!(path, "Maps/gone.png"),
            other => panic!("unexpected: {:?}", other),
        }
        assert!(vault.fingerprint("Maps/gone.png").is_err());
    }

    #[test]
    fn parent_components_are_rejected() {
        let dir = tempdir().unwrap();
        let vault = LocalVault::new(dir.path().join("vault"));
        assert!(vault.write("../outside.md", "x").is_err());
        assert!(!vault.exists("../vault"));
    }

    #[test]
    fn delete_removes_the_document() {
        let dir = tempdir().unwrap();
        let vault = LocalVault::new(dir.path());
        vault.write("a.md", "x").unwrap();
        vault.delete("a.md").unwrap();
        assert!(!vault.exists("a.md"));
    }

    #[test]
    fn fingerprint_is_modification_time() {
        let dir = tempdir().unwrap();
        let vault = LocalVault::new(dir.path());
        vault.write("a.md", "x").unwrap();
        assert!(vault.fingerprint("a.md").unwrap() > 0);
    }
}
