//! MarkerDocument entity - the JSON marker set behind one map
//!
//! Only the parts that reference other files are modeled; everything else
//! is carried through untouched in the artifact payload.

use std::collections::BTreeMap;

use serde::Deserialize;

use super::shape::{Lenient, LenientList, PathRef};
use crate::domain::value_objects::NormalizedKey;
use crate::error::{PublishError, PublishResult};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MarkerDocument {
    pub bases: LenientList<PathRef>,
    pub overlays: LenientList<PathRef>,
    pub markers: LenientList<MarkerRecord>,
    pub drawings: LenientList<DrawingRecord>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MarkerRecord {
    #[serde(rename = "type")]
    pub kind: Lenient<String>,
    pub link: Lenient<String>,
    pub sticker_path: Lenient<String>,
    pub swap_links: Lenient<StateLinks>,
    pub swap_key: Lenient<String>,
}

/// Per-state links of a swap marker: `{"open": "[[Gate]]"}` or `["[[Gate]]"]`
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum StateLinks {
    ByState(BTreeMap<String, Lenient<String>>),
    Ordered(Vec<Lenient<String>>),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DrawingRecord {
    /// Baked raster output
    pub baked_path: Lenient<String>,
    /// Baked vector output
    pub baked_svg_path: Lenient<String>,
}

impl MarkerDocument {
    /// Parse marker-set JSON. The top level must be an object.
    pub fn parse(text: &str, path: &str) -> PublishResult<Self> {
        let value: serde_json::Value =
            serde_json::from_str(text).map_err(|e| PublishError::malformed(path, e))?;
        if !value.is_object() {
            return Err(PublishError::malformed(path, "marker set is not a JSON object"));
        }
        Self::deserialize(value).map_err(|e| PublishError::malformed(path, e))
    }

    /// Every image file the marker set references, in document order
    pub fn image_paths(&self) -> Vec<NormalizedKey> {
        let bases = self.bases.iter().chain(self.overlays.iter()).filter_map(PathRef::path);
        let stickers = self.markers.iter().filter_map(MarkerRecord::sticker_image);
        let baked = self.drawings.iter().flat_map(DrawingRecord::outputs);

        bases
            .chain(stickers)
            .chain(baked)
            .map(NormalizedKey::new)
            .filter(|k| !k.is_empty())
            .collect()
    }
}

impl MarkerRecord {
    pub fn is_sticker(&self) -> bool {
        self.kind.non_empty() == Some("sticker") || self.sticker_path.non_empty().is_some()
    }

    pub fn is_swap(&self) -> bool {
        self.kind.non_empty() == Some("swap")
            || self.swap_key.non_empty().is_some()
            || self.swap_links.as_option().is_some()
    }

    pub fn sticker_image(&self) -> Option<&str> {
        if self.is_sticker() {
            self.sticker_path.non_empty()
        } else {
            None
        }
    }

    /// Direct note link of a plain marker
    pub fn direct_link(&self) -> Option<&str> {
        self.link.non_empty()
    }

    /// Per-state links of a swap marker
    pub fn state_links(&self) -> Vec<&str> {
        let Some(links) = self.swap_links.as_option() else {
            return Vec::new();
        };
        let values: Box<dyn Iterator<Item = &Lenient<String>> + '_> = match links {
            StateLinks::ByState(map) => Box::new(map.values()),
            StateLinks::Ordered(list) => Box::new(list.iter()),
        };
        values.filter_map(Lenient::non_empty).collect()
    }

    pub fn preset_key(&self) -> Option<&str> {
        self.swap_key.non_empty()
    }
}

impl DrawingRecord {
    pub fn outputs(&self) -> impl Iterator<Item = &str> {
        self.baked_path
            .non_empty()
            .into_iter()
            .chain(self.baked_svg_path.non_empty())
    }
}
