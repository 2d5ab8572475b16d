//! Orphan detection
//!
//! Finds generated artifacts that the current pass did not produce. Only
//! files that sit directly in the artifact folder and match the artifact
//! naming convention are candidates; anything else in the folder is left
//! alone. A candidate is only deleted once its content carries the
//! generator signature, which the caller checks through the store.

use std::collections::HashSet;

use crate::domain::entities::{parse_artifact_name, ArtifactKind};
use crate::domain::value_objects::NormalizedKey;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrphanArtifact {
    pub path: NormalizedKey,
    pub kind: ArtifactKind,
    /// Whether the stored document carries the generator header
    pub has_signature: bool,
}

impl OrphanArtifact {
    pub fn is_safe_to_delete(&self) -> bool {
        self.has_signature
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrphanDetectionResult {
    /// Artifacts to delete
    pub orphans: Vec<OrphanArtifact>,
    /// Artifacts in the keep-set that already exist
    pub retained: Vec<NormalizedKey>,
}

pub struct OrphanDetector;

impl OrphanDetector {
    /// Compare existing documents against the keep-set.
    ///
    /// `existing` is any listing of the vault; entries outside `folder` are
    /// ignored.
    pub fn detect<I, S>(existing: I, folder: &str, keep: &HashSet<NormalizedKey>) -> OrphanDetectionResult
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let folder = NormalizedKey::new(folder);
        let mut result = OrphanDetectionResult::default();

        for raw in existing {
            let path = NormalizedKey::new(raw.as_ref());
            if path.parent() != folder.as_str() {
                continue;
            }
            let Some((kind, _id)) = parse_artifact_name(path.file_name()) else {
                continue;
            };
            if keep.contains(&path) {
                result.retained.push(path);
            } else {
                result.orphans.push(OrphanArtifact {
                    path,
                    kind,
                    has_signature: false,
                });
            }
        }
        result
    }
}
