//! Generate Use Case
//!
//! Writes one artifact per marker set, one for the icon library and one
//! per named timeline, then deletes artifacts this pass did not produce.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde_json::json;
use tracing::{debug, info};

use crate::config::Config;
use crate::domain::entities::{
    ArtifactHeader, ArtifactKind, GeneratedArtifact, LibraryDocument, MapBlock, MarkerDocument,
};
use crate::domain::ports::{DocumentStore, LibraryProvider, StoreError};
use crate::domain::services::{aggregate, OrphanDetector};
use crate::domain::value_objects::{ArtifactId, NormalizedKey};
use crate::error::{PublishError, PublishResult};

use super::artifacts::ArtifactWriter;
use super::report::PassReport;
use super::scan::{companion_months, scan_sources, SourceScan};

/// Which source key owns each artifact path in this pass
#[derive(Debug, Default)]
pub struct ArtifactClaims {
    owners: HashMap<NormalizedKey, String>,
}

impl ArtifactClaims {
    /// `Ok(true)` for a new path, `Ok(false)` when `source` already owns
    /// it, and a collision error when another source does
    pub fn claim(&mut self, path: &NormalizedKey, source: &str) -> PublishResult<bool> {
        match self.owners.get(path) {
            Some(owner) if owner == source => Ok(false),
            Some(owner) => Err(PublishError::IdCollision {
                path: path.to_string(),
                first: owner.clone(),
                second: source.to_string(),
            }),
            None => {
                self.owners.insert(path.clone(), source.to_string());
                Ok(true)
            }
        }
    }
}

/// Read a source and its fingerprint. The payload is the parsed JSON,
/// checked by `validate` before it is wrapped.
fn load_json<S, F>(store: &S, path: &str, validate: F) -> PublishResult<(serde_json::Value, u64)>
where
    S: DocumentStore + ?Sized,
    F: FnOnce(&str) -> PublishResult<()>,
{
    let text = store.read(path).map_err(|e| match e {
        StoreError::NotFound(_) => PublishError::missing(path),
        other => PublishError::Store(other),
    })?;
    validate(&text)?;
    let value: serde_json::Value =
        serde_json::from_str(&text).map_err(|e| PublishError::malformed(path, e))?;
    let fingerprint = store.fingerprint(path)?;
    Ok((value, fingerprint))
}

/// Whether the previous artifact of a failed source should survive.
/// A source that is gone takes its artifact with it; anything else is
/// treated as transient.
fn retains_previous(err: &PublishError) -> bool {
    !matches!(err, PublishError::MissingResource { .. })
}

pub struct GenerateUseCase<'a, S: DocumentStore + ?Sized> {
    store: &'a S,
    config: &'a Config,
    provider: Option<&'a dyn LibraryProvider>,
    generated_at: DateTime<Utc>,
}

impl<'a, S: DocumentStore + ?Sized> GenerateUseCase<'a, S> {
    pub fn new(store: &'a S, config: &'a Config) -> Self {
        Self {
            store,
            config,
            provider: None,
            generated_at: Utc::now(),
        }
    }

    pub fn with_provider(mut self, provider: Option<&'a dyn LibraryProvider>) -> Self {
        self.provider = provider;
        self
    }

    pub fn with_clock(mut self, generated_at: DateTime<Utc>) -> Self {
        self.generated_at = generated_at;
        self
    }

    /// Scan the vault and run a full generate pass
    pub fn execute(&self) -> PublishResult<PassReport> {
        let mut report = PassReport::new();
        self.prepare_folder()?;
        let scan = scan_sources(self.store, self.config, &mut report)?;
        self.execute_on(&scan, &mut report)?;
        Ok(report)
    }

    /// Generate from an existing scan
    pub fn execute_on(&self, scan: &SourceScan, report: &mut PassReport) -> PublishResult<()> {
        self.prepare_folder()?;

        let writer = ArtifactWriter::new(self.store, self.generated_at);
        let mut claims = ArtifactClaims::default();
        let mut keep: HashSet<NormalizedKey> = HashSet::new();

        for block in &scan.blocks {
            self.markers_artifact(block, &writer, &mut claims, &mut keep, report);
        }
        self.library_artifact(!scan.blocks.is_empty(), &writer, &mut claims, &mut keep, report);
        self.timeline_artifacts(scan, &writer, &mut claims, &mut keep, report);
        self.collect_orphans(&keep, report)?;

        info!(
            created = report.created.len(),
            updated = report.updated.len(),
            unchanged = report.unchanged.len(),
            deleted = report.deleted.len(),
            skipped = report.skipped,
            "generate pass finished"
        );
        Ok(())
    }

    fn folder(&self) -> NormalizedKey {
        NormalizedKey::new(&self.config.output.artifact_folder)
    }

    fn prepare_folder(&self) -> PublishResult<()> {
        let folder = self.folder();
        self.store
            .create_folder(folder.as_str())
            .map_err(|source| PublishError::ArtifactFolder {
                path: folder.to_string(),
                source,
            })
    }

    fn markers_artifact(
        &self,
        block: &MapBlock,
        writer: &ArtifactWriter<'_, S>,
        claims: &mut ArtifactClaims,
        keep: &mut HashSet<NormalizedKey>,
        report: &mut PassReport,
    ) {
        let source = block.markers_path.as_str();
        let id = ArtifactId::for_path(&block.markers_path);
        let path = ArtifactKind::Markers.artifact_path(&self.config.output.artifact_folder, &id);
        match claims.claim(&path, source) {
            Ok(true) => {}
            Ok(false) => return,
            Err(err) => {
                report.skip(&err);
                return;
            }
        }

        let validate = |text: &str| MarkerDocument::parse(text, source).map(|_| ());
        let built = load_json(self.store, source, validate).map(|(payload, fingerprint)| {
            GeneratedArtifact::new(
                path.clone(),
                ArtifactKind::Markers,
                format!("Markers: {}", block.markers_path.file_name()),
                json!({ "markers": source, "data": payload }),
                fingerprint,
            )
            .with_metadata("markersPath", source)
        });
        self.finish(built, path, writer, keep, report);
    }

    fn library_artifact(
        &self,
        maps_present: bool,
        writer: &ArtifactWriter<'_, S>,
        claims: &mut ArtifactClaims,
        keep: &mut HashSet<NormalizedKey>,
        report: &mut PassReport,
    ) {
        let library = NormalizedKey::new(&self.config.library.path);
        let source = library.as_str();

        if !self.store.exists(source) {
            if let Some(provider) = self.provider {
                debug!(path = source, "asking companion provider for the library");
                match provider.export_library(source) {
                    Ok(()) => {}
                    Err(err @ PublishError::IntegrationUnavailable { .. }) => report.warn(err.to_string()),
                    Err(err) => report.warn(
                        PublishError::IntegrationUnavailable {
                            message: err.to_string(),
                        }
                        .to_string(),
                    ),
                }
            }
        }
        if !self.store.exists(source) {
            if maps_present {
                report.skip(&PublishError::missing(source));
            }
            return;
        }

        let id = ArtifactId::for_path(&library);
        let path = ArtifactKind::Library.artifact_path(&self.config.output.artifact_folder, &id);
        if let Err(err) = claims.claim(&path, source) {
            report.skip(&err);
            return;
        }

        let validate = |text: &str| LibraryDocument::parse(text, source).map(|_| ());
        let built = load_json(self.store, source, validate).map(|(payload, fingerprint)| {
            GeneratedArtifact::new(
                path.clone(),
                ArtifactKind::Library,
                "Icon library",
                json!({ "library": source, "data": payload }),
                fingerprint,
            )
            .with_metadata("libraryPath", source)
        });
        self.finish(built, path, writer, keep, report);
    }

    fn timeline_artifacts(
        &self,
        scan: &SourceScan,
        writer: &ArtifactWriter<'_, S>,
        claims: &mut ArtifactClaims,
        keep: &mut HashSet<NormalizedKey>,
        report: &mut PassReport,
    ) {
        if scan.entries.is_empty() {
            return;
        }
        let months = companion_months(self.store, &self.config.timeline, report);

        for timeline in aggregate(&scan.entries, &months) {
            let id = ArtifactId::for_name(&timeline.name);
            let path = ArtifactKind::Timeline.artifact_path(&self.config.output.artifact_folder, &id);
            let owner = timeline.name.trim().to_lowercase();
            match claims.claim(&path, &owner) {
                Ok(true) => {}
                Ok(false) => continue,
                Err(err) => {
                    report.skip(&err);
                    continue;
                }
            }

            let built = serde_json::to_value(&timeline)
                .map_err(|e| PublishError::malformed(path.as_str(), e))
                .map(|payload| {
                    GeneratedArtifact::new(
                        path.clone(),
                        ArtifactKind::Timeline,
                        format!("Timeline: {}", timeline.name),
                        payload,
                        timeline.fingerprint,
                    )
                    .with_metadata("timeline", timeline.name.as_str())
                });
            self.finish(built, path, writer, keep, report);
        }
    }

    /// Write a built artifact, or record why it could not be built
    fn finish(
        &self,
        built: PublishResult<GeneratedArtifact>,
        path: NormalizedKey,
        writer: &ArtifactWriter<'_, S>,
        keep: &mut HashSet<NormalizedKey>,
        report: &mut PassReport,
    ) {
        match built {
            Ok(artifact) => {
                match writer.write(&artifact) {
                    Ok(outcome) => report.record(path.as_str(), outcome),
                    Err(err) => report.fail(&err),
                }
                keep.insert(path);
            }
            Err(err) => {
                if retains_previous(&err) {
                    keep.insert(path);
                }
                report.skip(&err);
            }
        }
    }

    fn collect_orphans(
        &self,
        keep: &HashSet<NormalizedKey>,
        report: &mut PassReport,
    ) -> PublishResult<()> {
        let listing = self.store.list()?;
        let result = OrphanDetector::detect(&listing, &self.config.output.artifact_folder, keep);
        for mut orphan in result.orphans {
            orphan.has_signature = self
                .store
                .read(orphan.path.as_str())
                .ok()
                .and_then(|content| ArtifactHeader::read(&content))
                .is_some_and(|header| header.is_generated());
            if !orphan.is_safe_to_delete() {
                report.warn(format!(
                    "kept {}: named like an artifact but not generated",
                    orphan.path
                ));
                continue;
            }

            match self.store.delete(orphan.path.as_str()) {
                Ok(()) => {
                    debug!(path = %orphan.path, kind = orphan.kind.as_str(), "deleted orphan");
                    report.record_deleted(orphan.path.as_str());
                }
                Err(source) => report.fail(&PublishError::Store(source)),
            }
        }
        Ok(())
    }
}
