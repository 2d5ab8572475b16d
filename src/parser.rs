//! Source parser for vault documents
//!
//! Handles extraction of YAML frontmatter and fenced configuration blocks
//! from Markdown documents.

use serde_yaml_ng::Mapping;

use crate::error::{PublishError, PublishResult};

/// Delimiter for frontmatter sections
const FRONTMATTER_DELIMITER: &str = "---";

/// A fenced code block found in a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FencedBlock {
    /// First word of the info string (`zoommap` in ```` ```zoommap ````)
    pub language: String,
    /// Block body with block-quote prefixes removed
    pub body: String,
    /// 1-indexed line of the opening fence
    pub line: usize,
}

/// Split a document into its raw frontmatter YAML and body.
///
/// Returns `None` when the document does not start with a `---` line or
/// the frontmatter is never closed.
///
/// # Example
/// ```text
/// ---
/// publish: true
/// ---
/// # Body here
/// ```
pub fn split_frontmatter(content: &str) -> Option<(&str, &str)> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let first_end = content.find('\n')?;
    if content[..first_end].trim() != FRONTMATTER_DELIMITER {
        return None;
    }

    let yaml_start = first_end + 1;
    let mut offset = yaml_start;
    for line in content[yaml_start..].split_inclusive('\n') {
        if line.trim() == FRONTMATTER_DELIMITER {
            let yaml = &content[yaml_start..offset];
            let body = &content[offset + line.len()..];
            return Some((yaml, body));
        }
        offset += line.len();
    }
    None
}

/// The document body with any frontmatter removed
pub fn body_of(content: &str) -> &str {
    match split_frontmatter(content) {
        Some((_, body)) => body,
        None => content,
    }
}

/// Parse frontmatter YAML into a mapping.
///
/// Empty frontmatter yields an empty mapping.
pub fn parse_frontmatter(yaml: &str, file: &str) -> PublishResult<Mapping> {
    if yaml.trim().is_empty() {
        return Ok(Mapping::new());
    }
    serde_yaml_ng::from_str(yaml).map_err(|e| PublishError::MalformedPayload {
        path: file.to_string(),
        message: format_yaml_error(&e),
    })
}

/// Every fenced block in `content` whose language is in `languages`.
///
/// Fences may sit inside block quotes or callouts (`> ```zoommap`); the
/// quote markers are stripped from the body.
pub fn fenced_blocks(content: &str, languages: &[String]) -> Vec<FencedBlock> {
    let mut blocks = Vec::new();
    let mut open: Option<(char, usize, FencedBlock)> = None;

    for (idx, raw_line) in content.lines().enumerate() {
        let line = strip_quote_prefix(raw_line);

        if let Some((fence_char, fence_len, block)) = open.as_mut() {
            if is_closing_fence(line, *fence_char, *fence_len) {
                if let Some((_, _, block)) = open.take() {
                    blocks.push(block);
                }
            } else {
                block.body.push_str(line);
                block.body.push('\n');
            }
            continue;
        }

        if let Some((fence_char, fence_len, info)) = opening_fence(line) {
            let language = info.split_whitespace().next().unwrap_or("").to_string();
            if languages.iter().any(|l| l.eq_ignore_ascii_case(&language)) {
                open = Some((
                    fence_char,
                    fence_len,
                    FencedBlock {
                        language,
                        body: String::new(),
                        line: idx + 1,
                    },
                ));
            } else {
                // skip foreign blocks so their contents never look like fences
                open = Some((
                    fence_char,
                    fence_len,
                    FencedBlock {
                        language: String::new(),
                        body: String::new(),
                        line: 0,
                    },
                ));
            }
        }
    }

    blocks.retain(|b| b.line > 0);
    blocks
}

fn strip_quote_prefix(line: &str) -> &str {
    let mut rest = line;
    loop {
        let trimmed = rest.trim_start_matches([' ', '\t']);
        match trimmed.strip_prefix('>') {
            Some(after) => rest = after.strip_prefix(' ').unwrap_or(after),
            None => return rest,
        }
    }
}

fn opening_fence(line: &str) -> Option<(char, usize, &str)> {
    let trimmed = line.trim_start();
    let fence_char = trimmed.chars().next()?;
    if fence_char != '`' && fence_char != '~' {
        return None;
    }
    let fence_len = trimmed.chars().take_while(|&c| c == fence_char).count();
    if fence_len < 3 {
        return None;
    }
    let info = &trimmed[fence_len..];
    if fence_char == '`' && info.contains('`') {
        return None;
    }
    Some((fence_char, fence_len, info.trim()))
}

fn is_closing_fence(line: &str, fence_char: char, fence_len: usize) -> bool {
    let trimmed = line.trim();
    trimmed.len() >= fence_len && trimmed.chars().all(|c| c == fence_char)
}

fn format_yaml_error(err: &serde_yaml_ng::Error) -> String {
    match err.location() {
        Some(loc) => format!("line {}: invalid YAML - {}", loc.line(), err),
        None => format!("invalid YAML - {}", err),
    }
}
