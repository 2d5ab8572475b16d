//! Source scanners
//!
//! Read candidate notes from the store and turn them into map blocks and
//! timeline entries. Scanners keep no state between runs.

mod maps;
mod timeline;

pub use maps::scan_maps;
pub use timeline::{companion_months, scan_timeline};

use serde_yaml_ng::{Mapping, Value};
use tracing::debug;

use crate::config::{Config, ScanMode};
use crate::domain::entities::{MapBlock, TimelineEntry};
use crate::domain::ports::DocumentStore;
use crate::domain::services::LinkIndex;
use crate::domain::value_objects::NormalizedKey;
use crate::error::{PublishError, PublishResult};
use crate::parser::{parse_frontmatter, split_frontmatter};

use super::report::PassReport;

/// A note that passed the scan filters
#[derive(Debug, Clone)]
pub struct Candidate {
    pub path: NormalizedKey,
    pub content: String,
    /// `None` when the note has no frontmatter or it does not parse
    pub frontmatter: Option<Mapping>,
    pub fingerprint: u64,
}

impl Candidate {
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.frontmatter.as_ref().and_then(|fm| fm.get(key))
    }
}

/// A vault listing plus the candidate notes it contains
#[derive(Debug, Clone, Default)]
pub struct VaultSnapshot {
    pub paths: Vec<String>,
    pub notes: Vec<Candidate>,
}

/// List the vault and read every candidate note.
///
/// Candidates are `.md` documents outside the artifact folder and the
/// private configuration folder; in `published` mode the publish flag must
/// be set. Unreadable notes are skipped with a warning. A failed listing
/// aborts the pass.
pub fn snapshot<S: DocumentStore + ?Sized>(
    store: &S,
    config: &Config,
    report: &mut PassReport,
) -> PublishResult<VaultSnapshot> {
    let paths = store.list()?;
    let mut notes = Vec::new();

    for raw in &paths {
        let path = NormalizedKey::new(raw);
        if !path.has_extension("md")
            || path.is_within(&config.output.artifact_folder)
            || path.is_within(&config.output.config_dir)
        {
            continue;
        }

        let content = match store.read(raw) {
            Ok(content) => content,
            Err(source) => {
                report.skip(&PublishError::Store(source));
                continue;
            }
        };
        let fingerprint = match store.fingerprint(raw) {
            Ok(fingerprint) => fingerprint,
            Err(source) => {
                report.warn(format!("no fingerprint for {}: {}", raw, source));
                0
            }
        };

        let frontmatter = match split_frontmatter(&content) {
            Some((yaml, _)) => match parse_frontmatter(yaml, raw) {
                Ok(map) => Some(map),
                Err(err) => {
                    report.warn(err.to_string());
                    None
                }
            },
            None => None,
        };

        let candidate = Candidate {
            path,
            content,
            frontmatter,
            fingerprint,
        };
        if config.scan.mode == ScanMode::Published
            && !is_published(&candidate, &config.scan.publish_key)
        {
            debug!(path = %candidate.path, "not published, skipped");
            continue;
        }
        notes.push(candidate);
    }

    Ok(VaultSnapshot { paths, notes })
}

/// Everything the scanners found in one pass
#[derive(Debug, Clone, Default)]
pub struct SourceScan {
    pub snapshot: VaultSnapshot,
    pub links: LinkIndex,
    pub blocks: Vec<MapBlock>,
    pub entries: Vec<TimelineEntry>,
}

/// Snapshot the vault and run both scanners over it
pub fn scan_sources<S: DocumentStore + ?Sized>(
    store: &S,
    config: &Config,
    report: &mut PassReport,
) -> PublishResult<SourceScan> {
    let snapshot = snapshot(store, config, report)?;
    let links = LinkIndex::new(&snapshot.paths);
    let blocks = scan_maps(&snapshot.notes, &config.scan, report);
    let entries = scan_timeline(
        &snapshot.notes,
        &snapshot.paths,
        &links,
        &config.timeline,
        report,
    );
    debug!(
        notes = snapshot.notes.len(),
        maps = blocks.len(),
        timeline_entries = entries.len(),
        "scan complete"
    );
    Ok(SourceScan {
        snapshot,
        links,
        blocks,
        entries,
    })
}

fn is_published(note: &Candidate, key: &str) -> bool {
    match note.field(key) {
        Some(Value::Bool(flag)) => *flag,
        Some(Value::String(s)) => s.trim().eq_ignore_ascii_case("true"),
        _ => false,
    }
}
