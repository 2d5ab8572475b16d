//! LibraryDocument entity - shared icons and swap presets
//!
//! The library is one JSON document shared by every map. Icons map a key to
//! an image source and a default link; swap presets map a preset id to an
//! ordered list of frames.
//!
//! Both collections are accepted as arrays of objects or as objects keyed
//! by id; presets may also be keyed directly to their frame list.

use std::collections::{BTreeMap, HashMap};

use serde::Deserialize;

use super::shape::{Lenient, LenientList};
use crate::error::{PublishError, PublishResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconDef {
    pub key: String,
    pub image: Option<String>,
    pub default_link: Option<String>,
}

impl IconDef {
    /// Image source that refers to a vault file (not remote, not inline)
    pub fn local_image(&self) -> Option<&str> {
        self.image.as_deref().filter(|src| !is_remote_or_inline(src))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PresetFrame {
    pub icon_key: Option<String>,
    pub link: Option<String>,
    pub sticker_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapPreset {
    pub id: String,
    pub frames: Vec<PresetFrame>,
}

#[derive(Debug, Clone, Default)]
pub struct LibraryDocument {
    icons: Vec<IconDef>,
    presets: Vec<SwapPreset>,
    icon_index: HashMap<String, usize>,
    preset_index: HashMap<String, usize>,
}

impl LibraryDocument {
    pub fn new(icons: Vec<IconDef>, presets: Vec<SwapPreset>) -> Self {
        let icon_index = icons
            .iter()
            .enumerate()
            .map(|(i, icon)| (icon.key.clone(), i))
            .collect();
        let preset_index = presets
            .iter()
            .enumerate()
            .map(|(i, preset)| (preset.id.clone(), i))
            .collect();
        Self {
            icons,
            presets,
            icon_index,
            preset_index,
        }
    }

    /// Parse library JSON. The top level must be an object.
    pub fn parse(text: &str, path: &str) -> PublishResult<Self> {
        let value: serde_json::Value =
            serde_json::from_str(text).map_err(|e| PublishError::malformed(path, e))?;
        if !value.is_object() {
            return Err(PublishError::malformed(path, "library is not a JSON object"));
        }
        let raw = RawLibrary::deserialize(value).map_err(|e| PublishError::malformed(path, e))?;
        Ok(raw.into_library())
    }

    pub fn icons(&self) -> &[IconDef] {
        &self.icons
    }

    pub fn presets(&self) -> &[SwapPreset] {
        &self.presets
    }

    pub fn icon(&self, key: &str) -> Option<&IconDef> {
        self.icon_index.get(key).map(|&i| &self.icons[i])
    }

    pub fn preset(&self, id: &str) -> Option<&SwapPreset> {
        self.preset_index.get(id).map(|&i| &self.presets[i])
    }
}

pub fn is_remote_or_inline(src: &str) -> bool {
    let lower = src.trim_start().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://") || lower.starts_with("data:")
}

// ---------------------------------------------------------------------------
// Raw JSON shapes
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawLibrary {
    icons: Lenient<Keyed<RawIcon>>,
    #[serde(alias = "presets")]
    swap_presets: Lenient<Keyed<RawPreset>>,
}

/// A collection written either as a list or as an object keyed by id
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Keyed<T> {
    List(Vec<Lenient<T>>),
    Map(BTreeMap<String, Lenient<T>>),
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawIcon {
    key: Lenient<String>,
    #[serde(alias = "path", alias = "src", alias = "image")]
    path_or_data_url: Lenient<String>,
    default_link: Lenient<String>,
}

// `Frames` comes first: a struct variant would also accept a sequence
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawPreset {
    Frames(Vec<Lenient<RawFrame>>),
    Object {
        #[serde(default)]
        id: Lenient<String>,
        #[serde(default)]
        frames: LenientList<RawFrame>,
    },
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawFrame {
    icon_key: Lenient<String>,
    link: Lenient<String>,
    sticker_path: Lenient<String>,
}

impl<T> Keyed<T> {
    fn into_entries(self) -> Vec<(Option<String>, T)> {
        match self {
            Keyed::List(items) => items
                .into_iter()
                .filter_map(Lenient::into_option)
                .map(|item| (None, item))
                .collect(),
            Keyed::Map(map) => map
                .into_iter()
                .filter_map(|(k, v)| v.into_option().map(|item| (Some(k), item)))
                .collect(),
        }
    }
}

fn owned(value: &Lenient<String>) -> Option<String> {
    value.non_empty().map(str::to_string)
}

impl RawLibrary {
    fn into_library(self) -> LibraryDocument {
        let icons = self
            .icons
            .into_option()
            .map(Keyed::into_entries)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|(map_key, raw)| {
                let key = owned(&raw.key).or(map_key)?;
                Some(IconDef {
                    key,
                    image: owned(&raw.path_or_data_url),
                    default_link: owned(&raw.default_link),
                })
            })
            .collect();

        let presets = self
            .swap_presets
            .into_option()
            .map(Keyed::into_entries)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|(map_key, raw)| {
                let (id, frames) = match raw {
                    RawPreset::Object { id, frames } => (owned(&id).or(map_key)?, frames.0),
                    RawPreset::Frames(frames) => (
                        map_key?,
                        frames.into_iter().filter_map(Lenient::into_option).collect(),
                    ),
                };
                let frames = frames
                    .iter()
                    .map(|f| PresetFrame {
                        icon_key: owned(&f.icon_key),
                        link: owned(&f.link),
                        sticker_path: owned(&f.sticker_path),
                    })
                    .collect();
                Some(SwapPreset { id, frames })
            })
            .collect();

        LibraryDocument::new(icons, presets)
    }
}
