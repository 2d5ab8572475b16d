//! Normalized Key Value Object
//!
//! Canonical form of a vault path or name. Everything that ends up in an
//! artifact id, a keep-set or an asset set goes through this type first.

use std::borrow::Borrow;
use std::fmt;

/// A canonicalized vault path.
///
/// Normalization:
/// - `\` becomes `/`
/// - wiki-link wrapping (`[[...]]`, `![[...]]`) is removed, as is a
///   trailing `|alias` inside it
/// - leading `./` and `/` and trailing `/` are stripped, duplicate
///   slashes collapsed
/// - surrounding whitespace is trimmed
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
#[serde(transparent)]
pub struct NormalizedKey(String);

impl NormalizedKey {
    pub fn new(raw: &str) -> Self {
        Self(normalize(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// File name component (`Maps/world.png` -> `world.png`)
    pub fn file_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }

    /// File name without its last extension
    pub fn stem(&self) -> &str {
        let name = self.file_name();
        match name.rfind('.') {
            Some(0) | None => name,
            Some(idx) => &name[..idx],
        }
    }

    /// Lowercased extension without the dot
    pub fn extension(&self) -> Option<String> {
        let name = self.file_name();
        match name.rfind('.') {
            Some(0) | None => None,
            Some(idx) => Some(name[idx + 1..].to_ascii_lowercase()),
        }
    }

    /// Parent folder, empty string for the vault root
    pub fn parent(&self) -> &str {
        match self.0.rfind('/') {
            Some(idx) => &self.0[..idx],
            None => "",
        }
    }

    /// Join a relative path onto this key's parent folder
    pub fn sibling(&self, relative: &str) -> NormalizedKey {
        let parent = self.parent();
        if parent.is_empty() {
            NormalizedKey::new(relative)
        } else {
            NormalizedKey::new(&format!("{}/{}", parent, relative))
        }
    }

    /// Whether the key lies inside `folder` (at any depth)
    pub fn is_within(&self, folder: &str) -> bool {
        let folder = normalize(folder);
        if folder.is_empty() {
            return true;
        }
        self.0 == folder
            || (self.0.len() > folder.len()
                && self.0.starts_with(&folder)
                && self.0.as_bytes()[folder.len()] == b'/')
    }

    pub fn has_extension(&self, ext: &str) -> bool {
        self.extension().is_some_and(|e| e.eq_ignore_ascii_case(ext))
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for NormalizedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NormalizedKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for NormalizedKey {
    fn from(s: String) -> Self {
        Self::new(&s)
    }
}

impl AsRef<str> for NormalizedKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for NormalizedKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Strip wiki-link decoration from a raw reference.
///
/// `![[Maps/a.png|300]]` -> `Maps/a.png`. Text that is not wrapped is
/// returned trimmed.
pub fn strip_wiki_link(raw: &str) -> &str {
    let mut s = raw.trim();
    if let Some(rest) = s.strip_prefix('!') {
        if rest.starts_with("[[") {
            s = rest;
        }
    }
    if let Some(inner) = s.strip_prefix("[[").and_then(|r| r.strip_suffix("]]")) {
        let inner = inner.split('|').next().unwrap_or(inner);
        return inner.trim();
    }
    s
}

fn normalize(raw: &str) -> String {
    let unwrapped = strip_wiki_link(raw);
    let slashed = unwrapped.replace('\\', "/");

    let mut out = String::with_capacity(slashed.len());
    let mut prev_slash = false;
    for ch in slashed.chars() {
        if ch == '/' {
            if !prev_slash {
                out.push('/');
            }
            prev_slash = true;
        } else {
            out.push(ch);
            prev_slash = false;
        }
    }

    let mut s = out.trim();
    while let Some(rest) = s.strip_prefix("./").or_else(|| s.strip_prefix('/')) {
        s = rest.trim_start();
    }
    loop {
        let trimmed = s.trim_end().trim_end_matches('/');
        if trimmed.len() == s.len() {
            break;
        }
        s = trimmed;
    }
    s.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_separators_and_prefixes() {
        assert_eq!(NormalizedKey::new(".\\Maps\\\\world.png").as_str(), "Maps/world.png");
        assert_eq!(NormalizedKey::new("/Maps//world.png").as_str(), "Maps/world.png");
        assert_eq!(NormalizedKey::new("././Maps/world.png").as_str(), "Maps/world.png");
        assert_eq!(NormalizedKey::new("  Maps/world.png  ").as_str(), "Maps/world.png");
        assert_eq!(NormalizedKey::new("/_publish/").as_str(), "_publish");
    }

    #[test]
    fn whitespace_between_prefixes_is_stripped() {
        assert_eq!(NormalizedKey::new("./ /a").as_str(), "a");
        assert_eq!(NormalizedKey::new(" / ./Maps/world.png / ").as_str(), "Maps/world.png");
        let once = NormalizedKey::new("./ /a");
        assert_eq!(NormalizedKey::new(once.as_str()), once);
    }

    #[test]
    fn strips_wiki_link_brackets() {
        assert_eq!(NormalizedKey::new("[[Maps/world.png]]").as_str(), "Maps/world.png");
        assert_eq!(NormalizedKey::new("![[Maps/world.png|400]]").as_str(), "Maps/world.png");
        assert_eq!(NormalizedKey::new("[[ Notes/Harbor ]]").as_str(), "Notes/Harbor");
    }

    #[test]
    fn preserves_case() {
        assert_eq!(NormalizedKey::new("Maps/World.PNG").as_str(), "Maps/World.PNG");
    }

    #[test]
    fn file_name_stem_extension_parent() {
        let key = NormalizedKey::new("Maps/world.png.markers.json");
        assert_eq!(key.file_name(), "world.png.markers.json");
        assert_eq!(key.stem(), "world.png.markers");
        assert_eq!(key.extension().as_deref(), Some("json"));
        assert_eq!(key.parent(), "Maps");

        let root = NormalizedKey::new("README");
        assert_eq!(root.parent(), "");
        assert_eq!(root.extension(), None);
        assert_eq!(NormalizedKey::new(".hidden").stem(), ".hidden");
    }

    #[test]
    fn sibling_joins_onto_parent() {
        let key = NormalizedKey::new("Lore/Cities/Harbor.md");
        assert_eq!(key.sibling("harbor.png").as_str(), "Lore/Cities/harbor.png");
        assert_eq!(NormalizedKey::new("Harbor.md").sibling("a.png").as_str(), "a.png");
    }

    #[test]
    fn is_within_respects_segment_boundaries() {
        let key = NormalizedKey::new(".obsidian/plugins/x.json");
        assert!(key.is_within(".obsidian"));
        assert!(!NormalizedKey::new(".obsidian-backup/x.json").is_within(".obsidian"));
        assert!(key.is_within(""));
    }
}
