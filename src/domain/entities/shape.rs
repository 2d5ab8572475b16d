//! Tolerant decoding helpers
//!
//! Marker sets, libraries and map blocks are hand-edited or written by other
//! tools, so any field may hold an unexpected shape. These wrappers decode
//! the expected shape and fall back to "ignored" instead of failing the
//! whole document.

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer};

/// A value that decodes as `T` when it has the expected shape
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Lenient<T> {
    Valid(T),
    Ignored(IgnoredAny),
}

impl<T> Lenient<T> {
    pub fn into_option(self) -> Option<T> {
        match self {
            Lenient::Valid(v) => Some(v),
            Lenient::Ignored(_) => None,
        }
    }

    pub fn as_option(&self) -> Option<&T> {
        match self {
            Lenient::Valid(v) => Some(v),
            Lenient::Ignored(_) => None,
        }
    }
}

impl<T> Default for Lenient<T> {
    fn default() -> Self {
        Lenient::Ignored(IgnoredAny)
    }
}

impl Lenient<String> {
    /// The string value when present and not blank
    pub fn non_empty(&self) -> Option<&str> {
        self.as_option()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
    }
}

/// A list whose malformed items (or a non-list value) are dropped
#[derive(Debug, Clone)]
pub struct LenientList<T>(pub Vec<T>);

impl<T> Default for LenientList<T> {
    fn default() -> Self {
        LenientList(Vec::new())
    }
}

impl<T> LenientList<T> {
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for LenientList<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Lenient::<Vec<Lenient<T>>>::deserialize(deserializer)?;
        Ok(LenientList(
            raw.into_option()
                .unwrap_or_default()
                .into_iter()
                .filter_map(Lenient::into_option)
                .collect(),
        ))
    }
}

/// A path reference: `"a.png"` or `{ "path": "a.png", ... }`
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PathRef {
    Plain(String),
    Object { path: String },
}

impl PathRef {
    pub fn path(&self) -> Option<&str> {
        let p = match self {
            PathRef::Plain(p) => p,
            PathRef::Object { path } => path,
        };
        let p = p.trim();
        (!p.is_empty()).then_some(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize, Default)]
    #[serde(default)]
    struct Sample {
        name: Lenient<String>,
        images: LenientList<PathRef>,
    }

    #[test]
    fn wrong_shapes_are_ignored() {
        let s: Sample = serde_json::from_str(r#"{"name": 42, "images": "a.png"}"#).unwrap();
        assert!(s.name.as_option().is_none());
        assert!(s.images.is_empty());
    }

    #[test]
    fn mixed_lists_keep_valid_items() {
        let s: Sample = serde_json::from_str(
            r#"{"name": "world", "images": ["a.png", {"path": "b.png", "name": "B"}, 3, {"nope": 1}]}"#,
        )
        .unwrap();
        assert_eq!(s.name.non_empty(), Some("world"));
        let paths: Vec<_> = s.images.iter().filter_map(PathRef::path).collect();
        assert_eq!(paths, vec!["a.png", "b.png"]);
    }

    #[test]
    fn blank_strings_are_not_paths() {
        let r: PathRef = serde_json::from_str(r#""  ""#).unwrap();
        assert_eq!(r.path(), None);
        let s: Sample = serde_json::from_str(r#"{"name": "  "}"#).unwrap();
        assert_eq!(s.name.non_empty(), None);
    }
}
