//! MapBlock entity - one map declared in a document
//!
//! A map block is a fenced YAML block inside a note. It names a base image,
//! optional extra bases and overlays, an optional frame, and the marker-set
//! JSON file holding its markers.

use serde::Deserialize;

use super::shape::{Lenient, LenientList, PathRef};
use crate::domain::value_objects::NormalizedKey;

/// Raw block settings as written by users
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MapBlockSpec {
    pub image: Lenient<PathRef>,
    pub image_bases: LenientList<PathRef>,
    pub image_overlays: LenientList<PathRef>,
    pub markers: Lenient<String>,
    pub frame: Lenient<PathRef>,
}

/// A resolved map declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapBlock {
    /// Document that declares the block
    pub source_document: NormalizedKey,
    /// Marker-set JSON path
    pub markers_path: NormalizedKey,
    /// Base image, extra bases, overlays and frame, de-duplicated in order
    pub direct_asset_paths: Vec<NormalizedKey>,
    /// 1-indexed line of the block in its document
    pub line: usize,
}

impl MapBlock {
    /// Build a map block from its settings.
    ///
    /// Returns `None` when no base image can be found: neither `image` nor
    /// a first `imageBases` entry.
    pub fn from_spec(
        source_document: NormalizedKey,
        spec: &MapBlockSpec,
        markers_suffix: &str,
        line: usize,
    ) -> Option<Self> {
        let base = spec
            .image
            .as_option()
            .and_then(PathRef::path)
            .or_else(|| spec.image_bases.iter().find_map(PathRef::path))
            .map(NormalizedKey::new)
            .filter(|k| !k.is_empty())?;

        let markers_path = match spec.markers.non_empty() {
            Some(explicit) => NormalizedKey::new(explicit),
            None => NormalizedKey::new(&format!("{}{}", base, markers_suffix)),
        };

        let mut direct: Vec<NormalizedKey> = vec![base];
        let extra = spec
            .image_bases
            .iter()
            .chain(spec.image_overlays.iter())
            .chain(spec.frame.as_option())
            .filter_map(PathRef::path)
            .map(NormalizedKey::new);
        for key in extra {
            if !key.is_empty() && !direct.contains(&key) {
                direct.push(key);
            }
        }

        Some(Self {
            source_document,
            markers_path,
            direct_asset_paths: direct,
            line,
        })
    }
}
