//! GeneratedArtifact entity - a published JSON payload wrapped in a note
//!
//! Artifacts live in one folder and follow a strict naming convention,
//! `<prefix>-<id>.md`. The convention is what lets the orphan collector
//! tell generated files apart from hand-written ones.
//!
//! Layout:
//!
//! ```text
//! ---
//! publish: true
//! generator: "cartopub"
//! kind: "markers"
//! markersPath: "Maps/world.png.markers.json"
//! sourceFingerprint: 1718000000000
//! generated: "2026-10-17T09:00:00Z"
//! ---
//! # Markers: Maps/world.png.markers.json
//!
//! ```json
//! { ... }
//! ```
//! ```

use chrono::{DateTime, SecondsFormat, Utc};
use serde_yaml_ng::{Mapping, Value};

use crate::domain::value_objects::{ArtifactId, NormalizedKey};
use crate::parser::split_frontmatter;

/// Value of the `generator` header key
pub const GENERATOR: &str = "cartopub";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    Markers,
    Library,
    Timeline,
}

impl ArtifactKind {
    pub const ALL: [ArtifactKind; 3] = [
        ArtifactKind::Markers,
        ArtifactKind::Library,
        ArtifactKind::Timeline,
    ];

    /// File name prefix (before `-<id>.md`)
    pub fn prefix(&self) -> &'static str {
        match self {
            ArtifactKind::Markers => "zoommap-markers",
            ArtifactKind::Library => "zoommap-library",
            ArtifactKind::Timeline => "timeline",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactKind::Markers => "markers",
            ArtifactKind::Library => "library",
            ArtifactKind::Timeline => "timeline",
        }
    }

    /// Conventional path of an artifact inside `folder`
    pub fn artifact_path(&self, folder: &str, id: &ArtifactId) -> NormalizedKey {
        NormalizedKey::new(&format!("{}/{}-{}.md", folder, self.prefix(), id))
    }
}

/// Parse a file name produced by [`ArtifactKind::artifact_path`]
pub fn parse_artifact_name(file_name: &str) -> Option<(ArtifactKind, &str)> {
    let stem = file_name.strip_suffix(".md")?;
    ArtifactKind::ALL.into_iter().find_map(|kind| {
        let id = stem.strip_prefix(kind.prefix())?.strip_prefix('-')?;
        ArtifactId::is_valid(id).then_some((kind, id))
    })
}

/// An artifact ready to be written
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedArtifact {
    pub path: NormalizedKey,
    pub kind: ArtifactKind,
    pub title: String,
    pub payload: serde_json::Value,
    pub source_fingerprint: u64,
    /// Extra header fields, written as quoted strings in this order
    pub key_metadata: Vec<(String, String)>,
}

impl GeneratedArtifact {
    pub fn new(
        path: NormalizedKey,
        kind: ArtifactKind,
        title: impl Into<String>,
        payload: serde_json::Value,
        source_fingerprint: u64,
    ) -> Self {
        Self {
            path,
            kind,
            title: title.into(),
            payload,
            source_fingerprint,
            key_metadata: Vec::new(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.key_metadata.push((key.into(), value.into()));
        self
    }

    /// Render the full document text
    pub fn render(&self, generated_at: DateTime<Utc>) -> String {
        let mut out = String::new();
        out.push_str("---\n");
        out.push_str("publish: true\n");
        out.push_str(&format!("generator: {}\n", quote(GENERATOR)));
        out.push_str(&format!("kind: {}\n", quote(self.kind.as_str())));
        for (key, value) in &self.key_metadata {
            out.push_str(&format!("{}: {}\n", key, quote(value)));
        }
        out.push_str(&format!("sourceFingerprint: {}\n", self.source_fingerprint));
        out.push_str(&format!(
            "generated: {}\n",
            quote(&generated_at.to_rfc3339_opts(SecondsFormat::Secs, true))
        ));
        out.push_str("---\n");
        out.push_str(&format!("# {}\n\n", self.title));
        out.push_str("```json\n");
        out.push_str(
            &serde_json::to_string_pretty(&self.payload).unwrap_or_else(|_| "null".to_string()),
        );
        out.push_str("\n```\n");
        out
    }
}

/// Header fields read back from an existing artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactHeader {
    pub generator: Option<String>,
    pub kind: Option<String>,
    pub source_fingerprint: Option<u64>,
}

impl ArtifactHeader {
    /// Read the header of an artifact document; `None` when the document
    /// has no parseable frontmatter.
    pub fn read(content: &str) -> Option<Self> {
        let (yaml, _) = split_frontmatter(content)?;
        let map: Mapping = serde_yaml_ng::from_str(yaml).ok()?;
        Some(Self {
            generator: map.get("generator").and_then(Value::as_str).map(str::to_string),
            kind: map.get("kind").and_then(Value::as_str).map(str::to_string),
            source_fingerprint: map.get("sourceFingerprint").and_then(|v| match v {
                Value::Number(n) => n.as_u64(),
                Value::String(s) => s.trim().parse().ok(),
                _ => None,
            }),
        })
    }

    pub fn is_generated(&self) -> bool {
        self.generator.as_deref() == Some(GENERATOR)
    }
}

/// JSON string quoting, which is also a valid YAML double-quoted scalar
fn quote(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| format!("\"{}\"", value))
}
