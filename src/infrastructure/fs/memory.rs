//! In-memory document store for tests and embedding.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::domain::ports::{DocumentStore, StoreError, StoreResult};

#[derive(Debug, Clone)]
struct Entry {
    content: String,
    fingerprint: u64,
}

/// A vault held in memory.
///
/// Every write bumps a logical clock that becomes the document's
/// fingerprint. Mutations under a denied prefix fail, which lets tests
/// exercise write-failure paths.
#[derive(Debug, Default)]
pub struct MemoryStore {
    docs: Mutex<BTreeMap<String, Entry>>,
    folders: Mutex<BTreeSet<String>>,
    denied: Mutex<Vec<String>>,
    clock: AtomicU64,
    writes: AtomicU64,
}

fn guard<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_files<'a, I>(files: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let store = Self::new();
        for (path, content) in files {
            store.insert(path, content);
        }
        store
    }

    /// Add or replace a document without counting it as a write
    pub fn insert(&self, path: &str, content: &str) {
        let fingerprint = self.tick();
        guard(&self.docs).insert(
            path.to_string(),
            Entry {
                content: content.to_string(),
                fingerprint,
            },
        );
    }

    /// Simulate a modification without changing content
    pub fn touch(&self, path: &str) {
        let fingerprint = self.tick();
        if let Some(entry) = guard(&self.docs).get_mut(path) {
            entry.fingerprint = fingerprint;
        }
    }

    /// Make every mutation under `prefix` fail
    pub fn deny_writes(&self, prefix: &str) {
        guard(&self.denied).push(prefix.to_string());
    }

    /// Number of successful `write` calls so far
    pub fn write_count(&self) -> u64 {
        self.writes.load(Ordering::SeqCst)
    }

    /// Content of a document, for assertions
    pub fn content(&self, path: &str) -> Option<String> {
        guard(&self.docs).get(path).map(|e| e.content.clone())
    }

    fn tick(&self) -> u64 {
        self.clock.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_denied(&self, path: &str) -> bool {
        guard(&self.denied).iter().any(|p| path.starts_with(p.as_str()))
    }
}

impl DocumentStore for MemoryStore {
    fn exists(&self, path: &str) -> bool {
        if guard(&self.folders).contains(path) {
            return true;
        }
        let prefix = format!("{}/", path);
        let docs = guard(&self.docs);
        docs.contains_key(path) || docs.keys().any(|k| k.starts_with(&prefix))
    }

    fn read(&self, path: &str) -> StoreResult<String> {
        guard(&self.docs)
            .get(path)
            .map(|e| e.content.clone())
            .ok_or_else(|| StoreError::NotFound(path.to_string()))
    }

    fn write(&self, path: &str, content: &str) -> StoreResult<()> {
        if self.is_denied(path) {
            return Err(StoreError::PermissionDenied(path.to_string()));
        }
        self.insert(path, content);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn list(&self) -> StoreResult<Vec<String>> {
        Ok(guard(&self.docs).keys().cloned().collect())
    }

    fn delete(&self, path: &str) -> StoreResult<()> {
        if self.is_denied(path) {
            return Err(StoreError::PermissionDenied(path.to_string()));
        }
        guard(&self.docs)
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(path.to_string()))
    }

    fn create_folder(&self, path: &str) -> StoreResult<()> {
        if self.is_denied(path) {
            return Err(StoreError::PermissionDenied(path.to_string()));
        }
        guard(&self.folders).insert(path.to_string());
        Ok(())
    }

    fn fingerprint(&self, path: &str) -> StoreResult<u64> {
        guard(&self.docs)
            .get(path)
            .map(|e| e.fingerprint)
            .ok_or_else(|| StoreError::NotFound(path.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_bump_fingerprints() {
        let store = MemoryStore::new();
        store.write("a.md", "one").unwrap();
        let first = store.fingerprint("a.md").unwrap();
        store.write("a.md", "two").unwrap();
        assert!(store.fingerprint("a.md").unwrap() > first);
        assert_eq!(store.write_count(), 2);
    }

    #[test]
    fn folders_exist_implicitly_and_explicitly() {
        let store = MemoryStore::with_files([("Maps/a.png", "")]);
        assert!(store.exists("Maps"));
        assert!(!store.exists("Ma"));
        store.create_folder("_publish").unwrap();
        assert!(store.exists("_publish"));
    }

    #[test]
    fn denied_prefixes_fail() {
        let store = MemoryStore::new();
        store.deny_writes("_publish");
        assert!(matches!(
            store.write("_publish/x.md", ""),
            Err(StoreError::PermissionDenied(_))
        ));
        assert!(store.create_folder("_publish").is_err());
        assert!(store.write("other.md", "").is_ok());
    }

    #[test]
    fn metadata_parses_frontmatter() {
        let store = MemoryStore::with_files([("n.md", "---\npublish: true\n---\nbody")]);
        let meta = store.metadata("n.md").unwrap();
        let fm = meta.frontmatter.unwrap();
        assert_eq!(fm.get("publish").and_then(|v| v.as_bool()), Some(true));
    }
}
