use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

static HYPHEN_LINE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?P<prefix>\w)-[ \t]*\r?\n[ \t]*(?P<suffix>\w)").unwrap());

/// Light normalization for text pulled out of a PDF layout: NFKC
/// normalization, re-joining of words hyphenated across line breaks, and
/// collapsing of runs of whitespace inside lines. The clause wording itself
/// is left intact.
pub fn sanitize_extracted_text(raw: &str) -> String {
    let normalized: String = raw.nfkc().collect();
    let de_hyphenated = HYPHEN_LINE_BREAK.replace_all(&normalized, "$prefix$suffix");

    let mut result = String::with_capacity(de_hyphenated.len());
    let mut first_line = true;

    for line in de_hyphenated.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if !first_line {
            result.push('\n');
        }
        collapse_internal_whitespace(trimmed, &mut result);
        first_line = false;
    }

    result
}

fn collapse_internal_whitespace(line: &str, out: &mut String) {
    let mut prev_was_space = false;
    for ch in line.chars() {
        if ch.is_whitespace() {
            if !prev_was_space {
                out.push(' ');
                prev_was_space = true;
            }
        } else {
            out.push(ch);
            prev_was_space = false;
        }
    }
}
