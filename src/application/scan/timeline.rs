//! Timeline scanner: dated notes and the companion month settings

use std::collections::HashMap;

use serde::Deserialize;
use serde_yaml_ng::Value;

use crate::config::TimelineConfig;
use crate::domain::entities::shape::Lenient;
use crate::domain::entities::{EntryImage, TimelineEntry};
use crate::domain::ports::{DocumentStore, StoreError};
use crate::domain::services::{
    body_images, extract_summary, is_external, is_image_path, link_target, natural_cmp, LinkIndex,
    MonthTables,
};
use crate::domain::value_objects::{CalendarDate, NormalizedKey};
use crate::error::PublishError;
use crate::parser::body_of;

use super::super::report::PassReport;
use super::Candidate;

/// Timeline entries for every note that names at least one timeline and
/// has a parseable start date.
///
/// `paths` is the full vault listing, used for the same-folder image
/// fallback.
pub fn scan_timeline(
    notes: &[Candidate],
    paths: &[String],
    links: &LinkIndex,
    config: &TimelineConfig,
    report: &mut PassReport,
) -> Vec<TimelineEntry> {
    let mut entries = Vec::new();
    for note in notes {
        let names = note.field(&config.names_key).map(timeline_names).unwrap_or_default();
        if names.is_empty() {
            continue;
        }

        let Some(start) = note.field(&config.start_key).and_then(CalendarDate::from_yaml) else {
            report.skip(&PublishError::malformed(
                note.path.as_str(),
                format!("'{}' is missing or not a date", config.start_key),
            ));
            continue;
        };
        let end = note.field(&config.end_key).and_then(CalendarDate::from_yaml);

        let title = note
            .field(&config.title_key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| note.path.stem().to_string());

        let summary = match note.frontmatter.as_ref() {
            Some(fm) if fm.contains_key(config.summary_key.as_str()) => {
                fm.get(config.summary_key.as_str()).map(coerce_text).unwrap_or_default()
            }
            _ => extract_summary(body_of(&note.content)),
        };

        let image = entry_image(note, paths, links, config, report);

        entries.push(TimelineEntry {
            note_path: note.path.clone(),
            title,
            summary,
            start,
            end,
            timeline_names: names,
            image,
            fingerprint: note.fingerprint,
        });
    }
    entries
}

/// A single name or a list of names
fn timeline_names(value: &Value) -> Vec<String> {
    let raw: Vec<&str> = match value {
        Value::String(s) => vec![s.as_str()],
        Value::Sequence(items) => items.iter().filter_map(Value::as_str).collect(),
        _ => Vec::new(),
    };
    raw.into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Metadata value as display text; null becomes empty
fn coerce_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => serde_yaml_ng::to_string(other)
            .map(|s| s.trim().to_string())
            .unwrap_or_default(),
    }
}

fn entry_image(
    note: &Candidate,
    paths: &[String],
    links: &LinkIndex,
    config: &TimelineConfig,
    report: &mut PassReport,
) -> Option<EntryImage> {
    if let Some(raw) = note.field(&config.image_key).and_then(Value::as_str) {
        let raw = raw.trim();
        if is_external(raw) {
            return Some(EntryImage::External(raw.to_string()));
        }
        if !raw.is_empty() {
            match links.resolve(raw, &note.path) {
                Some(path) => return Some(EntryImage::Vault(path)),
                None => report.missing(&link_target(raw), note.path.as_str()),
            }
        }
    }

    let found = body_images(body_of(&note.content));
    let from_body = found
        .embedded
        .iter()
        .chain(found.linked.iter())
        .find_map(|target| {
            if is_external(target) {
                Some(EntryImage::External(target.clone()))
            } else {
                links.resolve(target, &note.path).map(EntryImage::Vault)
            }
        });
    if from_body.is_some() {
        return from_body;
    }

    let folder = note.path.parent();
    paths
        .iter()
        .map(|p| NormalizedKey::new(p))
        .filter(|p| p.parent() == folder && is_image_path(p.as_str()))
        .min_by(|a, b| natural_cmp(a.as_str(), b.as_str()))
        .map(EntryImage::Vault)
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawMonthSettings {
    months: Lenient<Vec<String>>,
    timelines: Lenient<HashMap<String, Lenient<RawTimelineSettings>>>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawTimelineSettings {
    Months(Vec<String>),
    Object {
        #[serde(default)]
        months: Lenient<Vec<String>>,
    },
}

/// Month tables from configuration overrides and the companion settings.
///
/// The companion document is optional: missing means English defaults,
/// malformed is reported and then treated as missing.
pub fn companion_months<S: DocumentStore + ?Sized>(
    store: &S,
    config: &TimelineConfig,
    report: &mut PassReport,
) -> MonthTables {
    let tables = MonthTables::new(&config.months);
    let text = match store.read(&config.settings_path) {
        Ok(text) => text,
        Err(StoreError::NotFound(_)) => return tables,
        Err(err) => {
            report.warn(format!("cannot read {}: {}", config.settings_path, err));
            return tables;
        }
    };

    let raw: RawMonthSettings = match serde_json::from_str(&text) {
        Ok(raw) => raw,
        Err(err) => {
            report.warn(PublishError::malformed(config.settings_path.as_str(), err).to_string());
            return tables;
        }
    };

    let per_timeline: HashMap<String, Vec<String>> = raw
        .timelines
        .into_option()
        .unwrap_or_default()
        .into_iter()
        .filter_map(|(name, settings)| {
            let months = match settings.into_option()? {
                RawTimelineSettings::Months(months) => months,
                RawTimelineSettings::Object { months } => months.into_option()?,
            };
            Some((name, months))
        })
        .collect();

    tables.with_companion(&per_timeline, raw.months.into_option())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::MemoryStore;

    fn note(path: &str, content: &str) -> Candidate {
        let frontmatter = crate::parser::split_frontmatter(content)
            .map(|(yaml, _)| serde_yaml_ng::from_str(yaml).unwrap());
        Candidate {
            path: NormalizedKey::new(path),
            content: content.to_string(),
            frontmatter,
            fingerprint: 3,
        }
    }

    fn scan(notes: &[Candidate], paths: &[&str]) -> (Vec<TimelineEntry>, PassReport) {
        let paths: Vec<String> = paths.iter().map(|p| p.to_string()).collect();
        let links = LinkIndex::new(&paths);
        let mut report = PassReport::new();
        let entries = scan_timeline(notes, &paths, &links, &TimelineConfig::default(), &mut report);
        (entries, report)
    }

    #[test]
    fn reads_dates_names_and_title_fallback() {
        let notes = [note(
            "Events/Landing.md",
            "---\ntimelines: [Main, War]\nstart: 1165-03-01\nend: {year: 1165, month: \"3\", day: 3}\n---\nThe fleet landed.",
        )];
        let (entries, report) = scan(&notes, &[]);
        assert_eq!(entries.len(), 1);
        let e = &entries[0];
        assert_eq!(e.title, "Landing");
        assert_eq!(e.timeline_names, vec!["Main", "War"]);
        assert_eq!(e.start, CalendarDate::new(1165, 3, 1));
        assert_eq!(e.end, Some(CalendarDate::new(1165, 3, 3)));
        assert_eq!(e.summary, "The fleet landed.");
        assert_eq!(e.fingerprint, 3);
        assert_eq!(report.skipped, 0);
    }

    #[test]
    fn notes_without_names_are_ignored_and_bad_dates_skipped() {
        let notes = [
            note("A.md", "---\nstart: 1165-03-01\n---\n"),
            note("B.md", "---\ntimelines: Main\nstart: soon\n---\n"),
            note("C.md", "---\ntimelines: Main\nstart: 1165-03-01\nend: later\n---\n"),
        ];
        let (entries, report) = scan(&notes, &[]);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].note_path.as_str(), "C.md");
        assert_eq!(entries[0].end, None);
        assert_eq!(report.skipped, 1);
    }

    #[test]
    fn out_of_range_years_exclude_the_entry() {
        let notes = [
            note("A.md", "---\ntimelines: Main\nstart: 1000000000000000-01-01\n---\n"),
            note("B.md", "---\ntimelines: Main\nstart: {year: -1000000000000000, month: 1, day: 1}\n---\n"),
            note("C.md", "---\ntimelines: Main\nstart: 1165-03-01\n---\n"),
        ];
        let (entries, report) = scan(&notes, &[]);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].note_path.as_str(), "C.md");
        assert_eq!(report.skipped, 2);
    }

    #[test]
    fn summary_key_wins_even_when_empty() {
        let notes = [
            note("A.md", "---\ntimelines: T\nstart: 1-1-1\nsummary: \"\"\n---\nBody text."),
            note("B.md", "---\ntimelines: T\nstart: 1-1-1\nsummary:\n---\nBody text."),
            note("C.md", "---\ntimelines: T\nstart: 1-1-1\nsummary: 42\n---\nBody text."),
        ];
        let (entries, _) = scan(&notes, &[]);
        let summaries: Vec<&str> = entries.iter().map(|e| e.summary.as_str()).collect();
        assert_eq!(summaries, vec!["", "", "42"]);
    }

    #[test]
    fn image_policy_order() {
        let vault = ["Events/a.png", "Events/b.png", "Art/banner.png", "Art/linked.png", "Art/meta.png"];

        let meta = note("Events/M.md", "---\ntimelines: T\nstart: 1-1-1\nimage: \"[[meta.png]]\"\n---\n![[banner.png]]");
        let external = note("Events/X.md", "---\ntimelines: T\nstart: 1-1-1\nimage: https://x.org/i.png\n---\n");
        let embedded = note("Events/E.md", "---\ntimelines: T\nstart: 1-1-1\n---\nSee [[linked.png]] then ![[banner.png]]");
        let linked = note("Events/L.md", "---\ntimelines: T\nstart: 1-1-1\n---\nSee [[linked.png]]");
        let folder = note("Events/F.md", "---\ntimelines: T\nstart: 1-1-1\n---\nNo images.");

        let (entries, _) = scan(&[meta, external, embedded, linked, folder], &vault);
        let images: Vec<Option<EntryImage>> = entries.into_iter().map(|e| e.image).collect();
        assert_eq!(
            images,
            vec![
                Some(EntryImage::Vault(NormalizedKey::new("Art/meta.png"))),
                Some(EntryImage::External("https://x.org/i.png".to_string())),
                Some(EntryImage::Vault(NormalizedKey::new("Art/banner.png"))),
                Some(EntryImage::Vault(NormalizedKey::new("Art/linked.png"))),
                Some(EntryImage::Vault(NormalizedKey::new("Events/a.png"))),
            ]
        );
    }

    #[test]
    fn unresolved_metadata_image_is_reported_and_falls_through() {
        let n = note("Events/M.md", "---\ntimelines: T\nstart: 1-1-1\nimage: gone.png\n---\n");
        let (entries, report) = scan(&[n], &["Events/z.png"]);
        assert_eq!(entries[0].image, Some(EntryImage::Vault(NormalizedKey::new("Events/z.png"))));
        assert_eq!(report.missing, vec!["gone.png"]);
    }

    #[test]
    fn companion_months_are_layered_under_overrides() {
        let store = MemoryStore::with_files([(
            ".obsidian/plugins/timelines/data.json",
            r#"{"months": ["G1", "G2"], "timelines": {"Sea": {"months": ["Tide"]}, "Land": ["Stone"], "Bad": 4}}"#,
        )]);
        let mut config = TimelineConfig::default();
        config.months.insert("Land".to_string(), vec!["Override".to_string()]);

        let tables = companion_months(&store, &config, &mut PassReport::new());
        assert_eq!(tables.resolve("sea"), vec!["Tide"]);
        assert_eq!(tables.resolve("Land"), vec!["Override"]);
        assert_eq!(tables.resolve("Bad"), vec!["G1", "G2"]);
    }

    #[test]
    fn missing_or_broken_companion_falls_back_to_defaults() {
        let config = TimelineConfig::default();
        let mut report = PassReport::new();
        let tables = companion_months(&MemoryStore::new(), &config, &mut report);
        assert_eq!(tables.resolve("Any")[0], "January");
        assert!(report.warnings.is_empty());

        let store = MemoryStore::with_files([(".obsidian/plugins/timelines/data.json", "{oops")]);
        let tables = companion_months(&store, &config, &mut report);
        assert_eq!(tables.resolve("Any")[2], "March");
        assert_eq!(report.warnings.len(), 1);
    }
}
