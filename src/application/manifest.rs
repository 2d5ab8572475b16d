//! Manifest Use Case
//!
//! Resolves the asset closure of everything published and writes it as a
//! note of wiki links, so the publish host ships the referenced files.

use std::collections::{BTreeSet, HashSet};

use chrono::Utc;
use tracing::{debug, info};

use crate::config::Config;
use crate::domain::entities::{parse_artifact_name, LibraryDocument, MarkerDocument};
use crate::domain::ports::{DocumentStore, StoreError};
use crate::domain::services::{library_assets, marker_assets, marker_links, AssetSet};
use crate::domain::value_objects::NormalizedKey;
use crate::error::{PublishError, PublishResult};

use super::artifacts::ArtifactWriter;
use super::report::PassReport;
use super::scan::{scan_sources, SourceScan};

/// Render the manifest note for an ordered asset list
pub fn render_manifest(assets: &[NormalizedKey]) -> String {
    let mut out = String::from("---\npublish: true\n---\n\n");
    for asset in assets {
        let target = asset.as_str();
        let target = target.strip_suffix(".md").unwrap_or(target);
        out.push_str(&format!("- [[{}]]\n", target));
    }
    out
}

fn read_source<S: DocumentStore + ?Sized>(store: &S, path: &str) -> PublishResult<String> {
    store.read(path).map_err(|e| match e {
        StoreError::NotFound(_) => PublishError::missing(path),
        other => PublishError::Store(other),
    })
}

pub struct ManifestUseCase<'a, S: DocumentStore + ?Sized> {
    store: &'a S,
    config: &'a Config,
}

impl<'a, S: DocumentStore + ?Sized> ManifestUseCase<'a, S> {
    pub fn new(store: &'a S, config: &'a Config) -> Self {
        Self { store, config }
    }

    /// Scan the vault and write the manifest
    pub fn execute(&self) -> PublishResult<PassReport> {
        let mut report = PassReport::new();
        let scan = scan_sources(self.store, self.config, &mut report)?;
        self.execute_on(&scan, &mut report)?;
        Ok(report)
    }

    /// Write the manifest for an existing scan.
    ///
    /// The store is listed again so artifacts written since the scan are
    /// part of the closure.
    pub fn execute_on(&self, scan: &SourceScan, report: &mut PassReport) -> PublishResult<()> {
        let listing: HashSet<String> = self.store.list()?.into_iter().collect();
        let assets = self.closure(scan, &listing, report);

        let closure = assets.finalize(&self.config.output.config_dir, |p| listing.contains(p));
        for missing in &closure.missing {
            report.skip(&PublishError::missing(missing.as_str()));
        }

        let manifest = NormalizedKey::new(&self.config.output.manifest_path);
        let writer = ArtifactWriter::new(self.store, Utc::now());
        match writer.write_text(manifest.as_str(), &render_manifest(&closure.assets)) {
            Ok(outcome) => report.record(manifest.as_str(), outcome),
            Err(err) => report.fail(&err),
        }
        report.manifest_entries = closure.assets.len();

        info!(
            entries = closure.assets.len(),
            missing = closure.missing.len(),
            path = %manifest,
            "manifest written"
        );
        Ok(())
    }

    fn closure(
        &self,
        scan: &SourceScan,
        listing: &HashSet<String>,
        report: &mut PassReport,
    ) -> AssetSet {
        let mut assets = AssetSet::new();

        let folder = NormalizedKey::new(&self.config.output.artifact_folder);
        assets.extend(
            listing
                .iter()
                .map(|p| NormalizedKey::new(p))
                .filter(|p| p.parent() == folder.as_str())
                .filter(|p| parse_artifact_name(p.file_name()).is_some()),
        );

        for block in &scan.blocks {
            assets.extend(block.direct_asset_paths.iter().cloned());
        }

        let library = self.library(listing, report);
        if let Some(library) = &library {
            assets.extend(library_assets(library));
        }

        let mut seen: BTreeSet<&str> = BTreeSet::new();
        for block in &scan.blocks {
            let source = block.markers_path.as_str();
            if !seen.insert(source) {
                continue;
            }
            let doc = match read_source(self.store, source)
                .and_then(|text| MarkerDocument::parse(&text, source))
            {
                Ok(doc) => doc,
                Err(err) => {
                    report.skip(&err);
                    continue;
                }
            };
            assets.extend(marker_assets(&doc));

            if self.config.links.deep {
                let (resolved, unresolved) =
                    marker_links(&doc, library.as_ref(), &scan.links, &block.source_document);
                debug!(markers = source, links = resolved.len(), "followed marker links");
                assets.extend(resolved);
                for link in unresolved {
                    report.missing(&link.link, link.source.as_str());
                }
            }
        }

        for entry in &scan.entries {
            if let Some(image) = entry.image.as_ref().and_then(|i| i.vault_path()) {
                assets.insert(image.clone());
            }
        }

        assets
    }

    /// The icon library, when present and parseable
    fn library(&self, listing: &HashSet<String>, report: &mut PassReport) -> Option<LibraryDocument> {
        let path = NormalizedKey::new(&self.config.library.path);
        if !listing.contains(path.as_str()) {
            return None;
        }
        match read_source(self.store, path.as_str())
            .and_then(|text| LibraryDocument::parse(&text, path.as_str()))
        {
            Ok(library) => Some(library),
            Err(err) => {
                report.skip(&err);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::MemoryStore;

    const WORLD: &str = "---\npublish: true\n---\n```zoommap\nimage: Maps/world.png\nimageOverlays:\n  - Maps/roads.png\n```\n";

    fn vault() -> MemoryStore {
        MemoryStore::with_files([
            ("Atlas/World.md", WORLD),
            ("Maps/world.png", ""),
            ("Maps/roads.png", ""),
            ("Stickers/ship.png", ""),
            ("Icons/city.png", ""),
            ("Lore/Harbor.md", "harbor"),
            (
                "Maps/world.png.markers.json",
                r#"{"markers": [
                    {"type": "sticker", "stickerPath": "Stickers/ship.png", "link": "[[Harbor]]"},
                    {"type": "sticker", "stickerPath": "Stickers/ship.png", "link": "[[Nowhere]]"}
                ]}"#,
            ),
            (
                "ZoomMap/library.json",
                r#"{"icons": [{"key": "city", "pathOrDataUrl": "Icons/city.png"}]}"#,
            ),
            (".obsidian/plugins/zoommap/icon.png", ""),
            ("_publish/zoommap-markers-abc.md", "generated"),
            ("_publish/README.md", "hand written"),
        ])
    }

    #[test]
    fn render_strips_note_suffix() {
        let text = render_manifest(&[
            NormalizedKey::new("Lore/Harbor.md"),
            NormalizedKey::new("Maps/world 2.png"),
        ]);
        insta::assert_snapshot!(text, @r"
        ---
        publish: true
        ---

        - [[Lore/Harbor]]
        - [[Maps/world 2.png]]
        ");
    }

    #[test]
    fn manifest_lists_the_full_closure() {
        let store = vault();
        let config = Config::default();
        let report = ManifestUseCase::new(&store, &config).execute().unwrap();

        let text = store.content("_publish/assets.md").unwrap();
        let links: Vec<&str> = text.lines().filter(|l| l.starts_with("- ")).collect();
        assert_eq!(
            links,
            vec![
                "- [[_publish/zoommap-markers-abc]]",
                "- [[Icons/city.png]]",
                "- [[Lore/Harbor]]",
                "- [[Maps/roads.png]]",
                "- [[Maps/world.png]]",
                "- [[Stickers/ship.png]]",
            ]
        );
        assert_eq!(report.manifest_entries, 6);
        assert_eq!(report.created, vec!["_publish/assets.md"]);
        assert_eq!(report.missing, vec!["[[Nowhere]]"]);
    }

    #[test]
    fn shallow_links_skip_notes() {
        let store = vault();
        let mut config = Config::default();
        config.links.deep = false;
        ManifestUseCase::new(&store, &config).execute().unwrap();
        let text = store.content("_publish/assets.md").unwrap();
        assert!(!text.contains("Lore/Harbor"));
    }

    #[test]
    fn missing_assets_are_reported_not_listed() {
        let store = vault();
        store.delete("Maps/roads.png").unwrap();
        let report = ManifestUseCase::new(&store, &Config::default()).execute().unwrap();
        assert!(report.missing.contains(&"Maps/roads.png".to_string()));
        assert!(!store.content("_publish/assets.md").unwrap().contains("roads"));
    }

    #[test]
    fn rerun_is_a_no_op() {
        let store = vault();
        let config = Config::default();
        ManifestUseCase::new(&store, &config).execute().unwrap();
        let writes = store.write_count();

        let report = ManifestUseCase::new(&store, &config).execute().unwrap();
        assert_eq!(report.unchanged, vec!["_publish/assets.md"]);
        assert_eq!(store.write_count(), writes);
    }
}
