//! Timeline aggregation
//!
//! Groups entries by timeline name, resolves each timeline's month names,
//! formats display dates and sorts chronologically.

use std::collections::{BTreeMap, HashMap};

use crate::domain::entities::{Timeline, TimelineEntry, TimelineRow};
use crate::domain::value_objects::{fnv1a, CalendarDate};

pub const DEFAULT_MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Month-name lookup in three tiers: explicit override, companion
/// settings, English default. Timeline names match case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct MonthTables {
    overrides: HashMap<String, Vec<String>>,
    companion: HashMap<String, Vec<String>>,
    companion_default: Option<Vec<String>>,
}

impl MonthTables {
    pub fn new(overrides: &HashMap<String, Vec<String>>) -> Self {
        Self {
            overrides: lowercase_keys(overrides),
            ..Self::default()
        }
    }

    /// Add tables read from the companion timeline-settings source
    pub fn with_companion(
        mut self,
        per_timeline: &HashMap<String, Vec<String>>,
        default: Option<Vec<String>>,
    ) -> Self {
        self.companion = lowercase_keys(per_timeline);
        self.companion_default = default.filter(|m| !m.is_empty());
        self
    }

    pub fn resolve(&self, timeline: &str) -> Vec<String> {
        let key = timeline.trim().to_lowercase();
        self.overrides
            .get(&key)
            .or_else(|| self.companion.get(&key))
            .or(self.companion_default.as_ref())
            .cloned()
            .unwrap_or_else(|| DEFAULT_MONTHS.iter().map(|m| m.to_string()).collect())
    }
}

fn lowercase_keys(map: &HashMap<String, Vec<String>>) -> HashMap<String, Vec<String>> {
    map.iter()
        .filter(|(_, months)| !months.is_empty())
        .map(|(k, v)| (k.trim().to_lowercase(), v.clone()))
        .collect()
}

fn month_name(months: &[String], month: u32) -> String {
    months
        .get(month as usize - 1)
        .cloned()
        .unwrap_or_else(|| month.to_string())
}

/// Display string for a date or range.
///
/// - `1 March 1165`
/// - `1–3 March 1165`
/// - `1 March 1165 – 2 April 1165`
pub fn format_display(start: &CalendarDate, end: Option<&CalendarDate>, months: &[String]) -> String {
    let single = |d: &CalendarDate| format!("{} {} {}", d.day, month_name(months, d.month), d.year);

    match end {
        None => single(start),
        Some(end) if end == start => single(start),
        Some(end) if end.year == start.year && end.month == start.month => format!(
            "{}\u{2013}{} {} {}",
            start.day,
            end.day,
            month_name(months, start.month),
            start.year
        ),
        Some(end) => format!("{} \u{2013} {}", single(start), single(end)),
    }
}

/// Group, format and sort entries into one timeline per name.
///
/// Names are compared case-insensitively; the first spelling seen is
/// kept. Output is ordered by timeline name.
pub fn aggregate(entries: &[TimelineEntry], months: &MonthTables) -> Vec<Timeline> {
    let mut groups: BTreeMap<String, (String, Vec<&TimelineEntry>)> = BTreeMap::new();
    for entry in entries {
        for name in &entry.timeline_names {
            let key = name.trim().to_lowercase();
            if key.is_empty() {
                continue;
            }
            let group = groups
                .entry(key)
                .or_insert_with(|| (name.trim().to_string(), Vec::new()));
            if !group.1.iter().any(|e| e.note_path == entry.note_path) {
                group.1.push(entry);
            }
        }
    }

    groups
        .into_values()
        .map(|(name, members)| {
            let table = months.resolve(&name);
            let mut rows: Vec<TimelineRow> = members
                .iter()
                .map(|e| TimelineRow {
                    note: e.note_path.clone(),
                    title: e.title.clone(),
                    summary: e.summary.clone(),
                    start: e.start,
                    end: e.end,
                    display: format_display(&e.start, e.end.as_ref(), &table),
                    image: e.image.clone(),
                    sort_key: e.start.sort_key(),
                })
                .collect();
            rows.sort_by(|a, b| {
                a.sort_key
                    .cmp(&b.sort_key)
                    .then_with(|| a.title.cmp(&b.title))
                    .then_with(|| a.note.cmp(&b.note))
            });

            let fingerprint = combined_fingerprint(&members, &table, &rows);
            Timeline {
                name,
                months: table,
                entries: rows,
                fingerprint,
            }
        })
        .collect()
}

/// Fingerprint of a timeline: every member note's path and fingerprint,
/// the month table and the rendered rows, hashed in a fixed order.
///
/// The rows carry whatever was resolved outside the member notes
/// themselves (images found next to a note, link targets, configured
/// keys), so a change there rewrites the artifact too.
fn combined_fingerprint(members: &[&TimelineEntry], months: &[String], rows: &[TimelineRow]) -> u64 {
    let mut parts: Vec<String> = members
        .iter()
        .map(|e| format!("{}@{}", e.note_path, e.fingerprint))
        .collect();
    parts.sort();
    parts.push(months.join(","));
    parts.push(serde_json::to_string(rows).unwrap_or_default());
    u64::from(fnv1a(&parts.join("\n")))
}
