//! Note body reading
//!
//! Pulls the first plain paragraph out of a note for timeline summaries and
//! finds image references in body text.

use pulldown_cmark::{Event, Options, Parser, Tag};

use super::link_index::link_target;
use crate::domain::value_objects::NormalizedKey;

pub const SUMMARY_LIMIT: usize = 500;

/// File extensions treated as images
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "svg", "bmp", "avif"];

pub fn is_image_path(path: &str) -> bool {
    NormalizedKey::new(path)
        .extension()
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}

/// First top-level plain paragraph of `body` as plain text.
///
/// Headings, quotes, lists, code blocks, tables and raw HTML are passed
/// over. Image embeds are dropped, links keep their visible text, code
/// and emphasis lose their markup. Whitespace is collapsed and the text
/// is capped at [`SUMMARY_LIMIT`] characters with a trailing `…`.
pub fn extract_summary(body: &str) -> String {
    let prepared = flatten_wiki_links(body);
    let parser = Parser::new_ext(&prepared, Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH);

    // one entry per open container; `true` marks an image
    let mut open: Vec<bool> = Vec::new();
    let mut collecting = false;
    let mut text = String::new();

    for event in parser {
        match event {
            Event::Start(tag) => {
                if open.is_empty() && matches!(tag, Tag::Paragraph) {
                    collecting = true;
                    text.clear();
                }
                open.push(matches!(tag, Tag::Image { .. }));
            }
            Event::End(_) => {
                open.pop();
                if collecting && open.is_empty() {
                    collecting = false;
                    let summary = collapse(&text);
                    if !summary.is_empty() {
                        return truncate(summary);
                    }
                }
            }
            Event::Text(t) | Event::Code(t) if collecting && !open.contains(&true) => text.push_str(&t),
            Event::SoftBreak | Event::HardBreak if collecting => text.push(' '),
            _ => {}
        }
    }
    String::new()
}

/// `![[x]]` disappears, `[[a|b]]` becomes `b`, `[[a]]` becomes `a`
fn flatten_wiki_links(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut rest = body;
    while let Some(open) = rest.find("[[") {
        let Some(close) = rest[open + 2..].find("]]") else {
            break;
        };
        let inner = &rest[open + 2..open + 2 + close];
        let embed = rest[..open].ends_with('!');
        let prefix = if embed { &rest[..open - 1] } else { &rest[..open] };
        out.push_str(prefix);
        if !embed {
            let shown = match inner.split_once('|') {
                Some((_, alias)) => alias,
                None => inner.split('#').next().unwrap_or(inner),
            };
            out.push_str(shown.trim());
        }
        rest = &rest[open + 2 + close + 2..];
    }
    out.push_str(rest);
    out
}

fn collapse(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn truncate(text: String) -> String {
    if text.chars().count() <= SUMMARY_LIMIT {
        return text;
    }
    let cut: String = text.chars().take(SUMMARY_LIMIT).collect();
    format!("{}…", cut.trim_end())
}

/// Image references found in a note body, in document order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BodyImages {
    /// `![[x.png]]` and `![alt](x.png)`
    pub embedded: Vec<String>,
    /// `[[x.png]]` and `[text](x.png)`
    pub linked: Vec<String>,
}

pub fn body_images(body: &str) -> BodyImages {
    let mut found: Vec<(usize, String, bool)> = Vec::new();

    let mut from = 0;
    while let Some(open) = body[from..].find("[[").map(|i| i + from) {
        let Some(close) = body[open + 2..].find("]]").map(|i| i + open + 2) else {
            break;
        };
        let embed = body[..open].ends_with('!');
        let target = link_target(&body[open..close + 2]);
        if is_image_path(&target) {
            found.push((open, target, embed));
        }
        from = close + 2;
    }

    for (event, range) in Parser::new(body).into_offset_iter() {
        let (dest, embed) = match event {
            Event::Start(Tag::Image { dest_url, .. }) => (dest_url, true),
            Event::Start(Tag::Link { dest_url, .. }) => (dest_url, false),
            _ => continue,
        };
        let target = link_target(&dest);
        if is_image_path(&target) {
            found.push((range.start, target, embed));
        }
    }

    found.sort_by_key(|(offset, _, _)| *offset);
    let mut images = BodyImages::default();
    for (_, target, embed) in found {
        if embed {
            images.embedded.push(target);
        } else {
            images.linked.push(target);
        }
    }
    images
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_plain_paragraph_wins() {
        let body = "# Landing\n\n> quoted\n\n- item\n\n```\ncode\n```\n\n| a | b |\n|---|---|\n| 1 | 2 |\n\nThe fleet *finally* reached `shore`.\nIt rained.\n\nSecond paragraph.";
        assert_eq!(extract_summary(body), "The fleet finally reached shore. It rained.");
    }

    #[test]
    fn links_keep_text_and_embeds_vanish() {
        let body = "![[banner.png]]\n\nSailed from [[Lore/Harbor|the harbor]] to [[Gate]] past ![map](m.png) [the cliffs](Cliffs.md).";
        assert_eq!(extract_summary(body), "Sailed from the harbor to Gate past the cliffs.");
    }

    #[test]
    fn image_only_paragraph_is_skipped() {
        let body = "![[banner.png]]\n\n![alt](x.png)\n\nReal text.";
        assert_eq!(extract_summary(body), "Real text.");
    }

    #[test]
    fn long_paragraphs_are_capped() {
        let body = "word ".repeat(200);
        let summary = extract_summary(&body);
        assert!(summary.ends_with('…'));
        assert_eq!(summary.chars().count(), SUMMARY_LIMIT);
        assert!(summary.starts_with("word word"));
    }

    #[test]
    fn exactly_the_limit_is_not_truncated() {
        let body = "a".repeat(SUMMARY_LIMIT);
        assert_eq!(extract_summary(&body), body);
    }

    #[test]
    fn empty_body_has_no_summary() {
        assert_eq!(extract_summary(""), "");
        assert_eq!(extract_summary("# Only a heading\n"), "");
    }

    #[test]
    fn body_images_in_document_order() {
        let body = "See [[Maps/plan.png]] and [[Harbor]].\n\n![alt](Art/first.jpg)\n\n![[Art/second.png|300]]\n\n[chart](Charts/c.svg)";
        let images = body_images(body);
        assert_eq!(images.embedded, vec!["Art/first.jpg", "Art/second.png"]);
        assert_eq!(images.linked, vec!["Maps/plan.png", "Charts/c.svg"]);
    }

    #[test]
    fn image_extension_check_is_case_insensitive() {
        assert!(is_image_path("a/B.PNG"));
        assert!(!is_image_path("a/b.md"));
        assert!(!is_image_path("a/b"));
    }
}
