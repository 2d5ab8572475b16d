//! Artifact Id Value Object
//!
//! Stable, filesystem-safe token derived from a normalized key with a 32-bit
//! FNV-1a hash rendered in base 36. The hash walks UTF-16 code units so the
//! same key yields the same id on every platform.

use std::fmt;

use super::key::NormalizedKey;

const FNV_OFFSET: u32 = 0x811c_9dc5;
const FNV_PRIME: u32 = 0x0100_0193;

/// Short artifact identifier (`[0-9a-z]{1,7}`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArtifactId(String);

impl ArtifactId {
    /// Id for a path-like key (case preserving)
    pub fn for_path(key: &NormalizedKey) -> Self {
        Self(to_base36(fnv1a(key.as_str())))
    }

    /// Id for a name-like key (case-insensitive)
    pub fn for_name(name: &str) -> Self {
        Self(to_base36(fnv1a(&name.trim().to_lowercase())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether `s` could have been produced by this hasher
    pub fn is_valid(s: &str) -> bool {
        !s.is_empty()
            && s.len() <= 7
            && s.bytes().all(|b| b.is_ascii_digit() || b.is_ascii_lowercase())
    }
}

impl fmt::Display for ArtifactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 32-bit FNV-1a over UTF-16 code units
pub fn fnv1a(input: &str) -> u32 {
    input.encode_utf16().fold(FNV_OFFSET, |hash, unit| {
        (hash ^ u32::from(unit)).wrapping_mul(FNV_PRIME)
    })
}

/// Lowercase base-36 rendering
pub fn to_base36(mut value: u32) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value == 0 {
        return "0".to_string();
    }
    let mut buf = Vec::with_capacity(7);
    while value > 0 {
        buf.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    buf.reverse();
    String::from_utf8(buf).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fnv1a_matches_reference_vectors() {
        assert_eq!(fnv1a(""), 0x811c_9dc5);
        assert_eq!(fnv1a("a"), 0xe40c_292c);
        assert_eq!(fnv1a("foobar"), 0xbf9c_f968);
    }

    #[test]
    fn base36_rendering() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "z");
        assert_eq!(to_base36(36), "10");
        assert_eq!(to_base36(u32::MAX), "1z141z3");
    }

    #[test]
    fn equivalent_paths_share_an_id() {
        let a = ArtifactId::for_path(&NormalizedKey::new("./Maps\\world.png.markers.json"));
        let b = ArtifactId::for_path(&NormalizedKey::new("Maps/world.png.markers.json"));
        assert_eq!(a, b);
    }

    #[test]
    fn path_ids_are_case_sensitive_name_ids_are_not() {
        let lower = ArtifactId::for_path(&NormalizedKey::new("maps/a.json"));
        let upper = ArtifactId::for_path(&NormalizedKey::new("Maps/a.json"));
        assert_ne!(lower, upper);

        assert_eq!(ArtifactId::for_name("Age of Sails"), ArtifactId::for_name("age of sails "));
    }

    #[test]
    fn ids_are_valid_tokens() {
        let id = ArtifactId::for_name("Main");
        assert!(ArtifactId::is_valid(id.as_str()));
        assert!(!ArtifactId::is_valid("ABC"));
        assert!(!ArtifactId::is_valid(""));
        assert!(!ArtifactId::is_valid("12345678"));
    }
}
