//! Asset closure
//!
//! Accumulates every file a publish must ship. Callers feed in parsed
//! marker sets and the library; this service knows which fields point at
//! files and how far to follow links.
//!
//! Preset indirection is followed exactly one level:
//! marker -> preset id -> frames -> icon keys -> default links.
//! Presets are never expanded recursively.

use std::collections::BTreeSet;

use super::link_index::{is_external, LinkIndex};
use super::natural_order::natural_cmp;
use crate::domain::entities::{LibraryDocument, MarkerDocument};
use crate::domain::value_objects::NormalizedKey;

/// De-duplicated set of vault paths
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetSet {
    keys: BTreeSet<NormalizedKey>,
}

/// Outcome of [`AssetSet::finalize`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClosureOutput {
    /// Shippable paths in natural order
    pub assets: Vec<NormalizedKey>,
    /// Referenced paths that do not exist
    pub missing: Vec<NormalizedKey>,
}

impl AssetSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: NormalizedKey) -> bool {
        if key.is_empty() || is_external(key.as_str()) {
            return false;
        }
        self.keys.insert(key)
    }

    pub fn extend<I: IntoIterator<Item = NormalizedKey>>(&mut self, keys: I) {
        for key in keys {
            self.insert(key);
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &NormalizedKey> {
        self.keys.iter()
    }

    /// Filter and order the set for publishing.
    ///
    /// JSON payloads and anything under `config_dir` are dropped; paths
    /// for which `exists` is false are reported as missing.
    pub fn finalize<F>(&self, config_dir: &str, exists: F) -> ClosureOutput
    where
        F: Fn(&str) -> bool,
    {
        let mut out = ClosureOutput::default();
        for key in &self.keys {
            if key.has_extension("json") || (!config_dir.is_empty() && key.is_within(config_dir)) {
                continue;
            }
            if exists(key.as_str()) {
                out.assets.push(key.clone());
            } else {
                out.missing.push(key.clone());
            }
        }
        out.assets.sort_by(|a, b| natural_cmp(a.as_str(), b.as_str()));
        out.missing.sort_by(|a, b| natural_cmp(a.as_str(), b.as_str()));
        out
    }
}

/// Image files of one marker set: bases, overlays, stickers, baked drawings
pub fn marker_assets(doc: &MarkerDocument) -> Vec<NormalizedKey> {
    doc.image_paths()
}

/// Local icon images and preset sticker images of the library
pub fn library_assets(library: &LibraryDocument) -> Vec<NormalizedKey> {
    let icons = library.icons().iter().filter_map(|icon| icon.local_image());
    let stickers = library
        .presets()
        .iter()
        .flat_map(|p| p.frames.iter())
        .filter_map(|f| f.sticker_path.as_deref())
        .filter(|p| !crate::domain::entities::is_remote_or_inline(p));

    icons
        .chain(stickers)
        .map(NormalizedKey::new)
        .filter(|k| !k.is_empty())
        .collect()
}

/// A link that could not be resolved while following deep links
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedLink {
    pub link: String,
    pub source: NormalizedKey,
}

/// Notes linked from the markers of one marker set.
///
/// `source` is the document the marker set belongs to; links resolve
/// relative to it. Returns the resolved paths and the links that did not
/// resolve.
pub fn marker_links(
    doc: &MarkerDocument,
    library: Option<&LibraryDocument>,
    links: &LinkIndex,
    source: &NormalizedKey,
) -> (Vec<NormalizedKey>, Vec<UnresolvedLink>) {
    let mut raw: Vec<&str> = Vec::new();

    for marker in doc.markers.iter() {
        if let Some(link) = marker.direct_link() {
            raw.push(link);
        }
        if !marker.is_swap() {
            continue;
        }
        raw.extend(marker.state_links());

        let Some(preset) = marker
            .preset_key()
            .and_then(|id| library.and_then(|lib| lib.preset(id)))
        else {
            continue;
        };
        for frame in &preset.frames {
            if let Some(link) = frame.link.as_deref() {
                raw.push(link);
            }
            let default_link = frame
                .icon_key
                .as_deref()
                .and_then(|key| library.and_then(|lib| lib.icon(key)))
                .and_then(|icon| icon.default_link.as_deref());
            if let Some(link) = default_link {
                raw.push(link);
            }
        }
    }

    let mut resolved = Vec::new();
    let mut unresolved = Vec::new();
    for link in raw {
        if is_external(link) {
            continue;
        }
        match links.resolve(link, source) {
            Some(path) => {
                if !resolved.contains(&path) {
                    resolved.push(path);
                }
            }
            None => {
                let entry = UnresolvedLink {
                    link: link.to_string(),
                    source: source.clone(),
                };
                if !unresolved.contains(&entry) {
                    unresolved.push(entry);
                }
            }
        }
    }
    (resolved, unresolved)
}
