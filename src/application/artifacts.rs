//! Artifact writer
//!
//! Change detection happens here. A generated artifact is rewritten only
//! when its recorded `sourceFingerprint` differs from the current one;
//! plain documents (the assets manifest, the runtime script) are rewritten
//! only when their bytes differ.

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::domain::entities::{ArtifactHeader, GeneratedArtifact};
use crate::domain::ports::{DocumentStore, StoreError};
use crate::error::{PublishError, PublishResult};

use super::report::WriteOutcome;

pub struct ArtifactWriter<'a, S: DocumentStore + ?Sized> {
    store: &'a S,
    generated_at: DateTime<Utc>,
}

impl<'a, S: DocumentStore + ?Sized> ArtifactWriter<'a, S> {
    pub fn new(store: &'a S, generated_at: DateTime<Utc>) -> Self {
        Self {
            store,
            generated_at,
        }
    }

    /// Write `artifact` unless the stored copy already carries its fingerprint
    pub fn write(&self, artifact: &GeneratedArtifact) -> PublishResult<WriteOutcome> {
        let path = artifact.path.as_str();
        let outcome = match self.store.read(path) {
            Ok(existing) => {
                let header = ArtifactHeader::read(&existing);
                let current = header.as_ref().is_some_and(|h| {
                    h.is_generated() && h.source_fingerprint == Some(artifact.source_fingerprint)
                });
                if current {
                    debug!(path, fingerprint = artifact.source_fingerprint, "artifact unchanged");
                    return Ok(WriteOutcome::Unchanged);
                }
                WriteOutcome::Updated
            }
            Err(StoreError::NotFound(_)) => WriteOutcome::Created,
            // unreadable: try to replace it
            Err(_) => WriteOutcome::Updated,
        };

        debug!(path, ?outcome, "writing artifact");
        self.put(path, &artifact.render(self.generated_at))?;
        Ok(outcome)
    }

    /// Write plain text unless the stored copy is byte-identical
    pub fn write_text(&self, path: &str, content: &str) -> PublishResult<WriteOutcome> {
        let outcome = match self.store.read(path) {
            Ok(existing) if existing == content => {
                debug!(path, "document unchanged");
                return Ok(WriteOutcome::Unchanged);
            }
            Ok(_) => WriteOutcome::Updated,
            Err(StoreError::NotFound(_)) => WriteOutcome::Created,
            Err(_) => WriteOutcome::Updated,
        };
        self.put(path, content)?;
        Ok(outcome)
    }

    fn put(&self, path: &str, content: &str) -> PublishResult<()> {
        self.store
            .write(path, content)
            .map_err(|source| PublishError::WriteFailure {
                path: path.to_string(),
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::ArtifactKind;
    use crate::domain::value_objects::NormalizedKey;
    use crate::infrastructure::MemoryStore;
    use chrono::TimeZone;
    use serde_json::json;

    fn artifact(fingerprint: u64) -> GeneratedArtifact {
        GeneratedArtifact::new(
            NormalizedKey::new("_publish/timeline-abc.md"),
            ArtifactKind::Timeline,
            "Main",
            json!({"name": "Main"}),
            fingerprint,
        )
    }

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).single().unwrap()
    }

    #[test]
    fn same_fingerprint_is_not_rewritten() {
        let store = MemoryStore::new();
        assert_eq!(ArtifactWriter::new(&store, at(0)).write(&artifact(7)).unwrap(), WriteOutcome::Created);
        // a later clock would change the bytes, so a rewrite would show
        let writer = ArtifactWriter::new(&store, at(60));
        assert_eq!(writer.write(&artifact(7)).unwrap(), WriteOutcome::Unchanged);
        assert_eq!(store.write_count(), 1);

        assert_eq!(writer.write(&artifact(8)).unwrap(), WriteOutcome::Updated);
        assert_eq!(store.write_count(), 2);
    }

    #[test]
    fn hand_written_document_at_the_path_is_replaced() {
        let store = MemoryStore::with_files([("_publish/timeline-abc.md", "sourceFingerprint: 7\n")]);
        let writer = ArtifactWriter::new(&store, at(0));
        assert_eq!(writer.write(&artifact(7)).unwrap(), WriteOutcome::Updated);
    }

    #[test]
    fn text_writes_are_skipped_when_identical() {
        let store = MemoryStore::new();
        let writer = ArtifactWriter::new(&store, at(0));
        assert_eq!(writer.write_text("m.md", "x").unwrap(), WriteOutcome::Created);
        assert_eq!(writer.write_text("m.md", "x").unwrap(), WriteOutcome::Unchanged);
        assert_eq!(writer.write_text("m.md", "y").unwrap(), WriteOutcome::Updated);
        assert_eq!(store.write_count(), 2);
    }

    #[test]
    fn refused_writes_become_write_failures() {
        let store = MemoryStore::new();
        store.deny_writes("_publish");
        let err = ArtifactWriter::new(&store, at(0)).write(&artifact(1)).unwrap_err();
        assert!(matches!(err, PublishError::WriteFailure { .. }));
    }
}
