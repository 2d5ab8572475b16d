//! Sentinel-delimited block upsert
//!
//! Inserts or replaces a managed block inside a document that is otherwise
//! hand-maintained. The block, including its sentinels, is surrounded by
//! exactly one blank line; everything outside it is preserved.

/// Begin/end markers for a managed block
#[derive(Debug, Clone, Copy)]
pub struct Sentinels<'a> {
    pub begin: &'a str,
    pub end: &'a str,
}

impl<'a> Sentinels<'a> {
    pub fn new(begin: &'a str, end: &'a str) -> Self {
        Self { begin, end }
    }

    /// Wrap `body` in the sentinels
    pub fn wrap(&self, body: &str) -> String {
        format!("{}\n{}\n{}", self.begin, body.trim_matches('\n'), self.end)
    }
}

/// Replace the managed block in `document` with `body`, or append it.
///
/// Applying the same body twice yields the same bytes as applying it once.
pub fn upsert_block(document: &str, sentinels: Sentinels<'_>, body: &str) -> String {
    let block = sentinels.wrap(body);

    let span = document.find(sentinels.begin).and_then(|start| {
        let after_begin = start + sentinels.begin.len();
        document[after_begin..]
            .find(sentinels.end)
            .map(|offset| (start, after_begin + offset + sentinels.end.len()))
    });

    match span {
        Some((start, end)) => {
            let before = document[..start].trim_end();
            let after = document[end..].trim_start_matches(['\n', '\r']);

            let mut out = String::with_capacity(document.len() + block.len());
            if !before.is_empty() {
                out.push_str(before);
                out.push_str("\n\n");
            }
            out.push_str(&block);
            out.push('\n');
            if !after.is_empty() {
                out.push('\n');
                out.push_str(after);
            }
            out
        }
        None => {
            let trimmed = document.trim_end();
            if trimmed.is_empty() {
                format!("{}\n", block)
            } else {
                format!("{}\n\n{}\n", trimmed, block)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const S: Sentinels<'static> = Sentinels {
        begin: "/* begin */",
        end: "/* end */",
    };

    #[test]
    fn appends_to_empty_document() {
        assert_eq!(upsert_block("", S, "x();"), "/* begin */\nx();\n/* end */\n");
        assert_eq!(upsert_block("\n\n", S, "x();"), "/* begin */\nx();\n/* end */\n");
    }

    #[test]
    fn appends_after_existing_content_with_one_blank_line() {
        let out = upsert_block("mine();\n\n\n", S, "x();");
        assert_eq!(out, "mine();\n\n/* begin */\nx();\n/* end */\n");
    }

    #[test]
    fn replaces_between_sentinels_and_keeps_surroundings() {
        let doc = "head();\n/* begin */\nold();\n/* end */\n\n\n\ntail();\n";
        let out = upsert_block(doc, S, "new();");
        assert_eq!(out, "head();\n\n/* begin */\nnew();\n/* end */\n\ntail();\n");
    }

    #[test]
    fn applying_twice_equals_applying_once() {
        for doc in [
            "",
            "mine();",
            "a();\n/* begin */\nold\n/* end */",
            "/* begin */\n/* end */\nb();\n",
            "a();\r\n\r\n/* begin */\nold\n/* end */\r\n\r\nb();\r\n",
        ] {
            let once = upsert_block(doc, S, "body();\nmore();");
            let twice = upsert_block(&once, S, "body();\nmore();");
            assert_eq!(once, twice, "not idempotent for {:?}", doc);
        }
    }

    #[test]
    fn unterminated_begin_is_treated_as_absent() {
        let doc = "/* begin */\nhalf";
        let out = upsert_block(doc, S, "x();");
        assert!(out.starts_with("/* begin */\nhalf\n\n/* begin */"));
    }
}
