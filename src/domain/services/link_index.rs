//! Link resolution
//!
//! Resolves the link text users write in notes and marker sets
//! (`[[Harbor]]`, `[[Lore/Harbor|the harbor]]`, `Maps/world.png`,
//! `Harbor#History`) to a vault path.
//!
//! Lookup order:
//! 1. exact vault path
//! 2. exact vault path + `.md`
//! 3. file-name match (with or without `.md`); when several files share
//!    the name, the one in the source document's folder wins, then the
//!    shortest path, then natural order

use std::collections::{HashMap, HashSet};

use super::natural_order::natural_cmp;
use crate::domain::value_objects::NormalizedKey;

#[derive(Debug, Clone, Default)]
pub struct LinkIndex {
    paths: HashSet<String>,
    by_name: HashMap<String, Vec<NormalizedKey>>,
}

impl LinkIndex {
    pub fn new<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut index = LinkIndex::default();
        for raw in paths {
            let key = NormalizedKey::new(raw.as_ref());
            if key.is_empty() {
                continue;
            }
            let name = key.file_name().to_lowercase();
            if let Some(stem) = name.strip_suffix(".md") {
                index
                    .by_name
                    .entry(stem.to_string())
                    .or_default()
                    .push(key.clone());
            }
            index.by_name.entry(name).or_default().push(key.clone());
            index.paths.insert(key.into_string());
        }
        for candidates in index.by_name.values_mut() {
            candidates.sort_by(|a, b| {
                a.as_str()
                    .len()
                    .cmp(&b.as_str().len())
                    .then_with(|| natural_cmp(a.as_str(), b.as_str()))
            });
            candidates.dedup();
        }
        index
    }

    pub fn contains(&self, path: &str) -> bool {
        self.paths.contains(path)
    }

    /// Resolve `link` as written inside `source`
    pub fn resolve(&self, link: &str, source: &NormalizedKey) -> Option<NormalizedKey> {
        let target = link_target(link);
        if target.is_empty() {
            return None;
        }
        let key = NormalizedKey::new(&target);

        if self.paths.contains(key.as_str()) {
            return Some(key);
        }
        let with_md = format!("{}.md", key);
        if self.paths.contains(&with_md) {
            return Some(NormalizedKey::new(&with_md));
        }

        // relative to the source folder
        let sibling = source.sibling(key.as_str());
        if self.paths.contains(sibling.as_str()) {
            return Some(sibling);
        }

        let name = key.file_name().to_lowercase();
        let candidates = self.by_name.get(&name)?;
        let wanted_suffix = format!("/{}", key.as_str().to_lowercase());
        let matching: Vec<&NormalizedKey> = if key.as_str().contains('/') {
            // partial paths must match the tail of the candidate
            candidates
                .iter()
                .filter(|c| {
                    let lower = c.as_str().to_lowercase();
                    lower.ends_with(&wanted_suffix)
                        || lower.ends_with(&format!("{}.md", wanted_suffix))
                })
                .collect()
        } else {
            candidates.iter().collect()
        };

        let folder = source.parent();
        matching
            .iter()
            .find(|c| c.parent() == folder)
            .or_else(|| matching.first())
            .map(|c| (*c).clone())
    }
}

/// Extract the target path from link text.
///
/// Handles wiki links with aliases, Markdown links, `#heading` and `^block`
/// anchors and `%20` escapes.
pub fn link_target(link: &str) -> String {
    let mut s = link.trim();

    // [text](target)
    if s.starts_with('[') && !s.starts_with("[[") {
        if let Some(open) = s.find("](") {
            if let Some(inner) = s[open + 2..].strip_suffix(')') {
                s = inner.trim();
            }
        }
    }
    if let Some(inner) = s.strip_prefix('<').and_then(|r| r.strip_suffix('>')) {
        s = inner;
    }

    let s = crate::domain::value_objects::strip_wiki_link(s);
    let s = s.split('|').next().unwrap_or(s);
    let s = s.split('#').next().unwrap_or(s);
    s.trim().replace("%20", " ")
}

/// Whether a reference is an external URL rather than a vault path
pub fn is_external(reference: &str) -> bool {
    let lower = reference.trim().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}
