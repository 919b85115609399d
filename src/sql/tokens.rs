//! Identifier, list and literal helpers shared by the statement parsers.
//!
//! All helpers are quote-aware: single-quoted literals and double-quoted
//! identifiers are treated as opaque, so commas, dots and parentheses inside
//! them never split or nest anything.

use std::ops::Range;

use compact_str::CompactString;
use unicode_normalization::UnicodeNormalization;

use super::splitter::{flatten, strip_comments};

/// Strip schema qualification and surrounding double quotes.
///
/// ```
/// use lookup_differ::sql::clean_identifier;
///
/// assert_eq!(clean_identifier(r#""BBYNIB"."T1""#), "T1");
/// assert_eq!(clean_identifier("app.lookup_codes"), "lookup_codes");
/// assert_eq!(clean_identifier(r#""Mixed Case""#), "Mixed Case");
/// ```
pub fn clean_identifier(text: &str) -> CompactString {
    let text = text.trim();
    let mut in_quote = false;
    let mut last_dot = None;
    for (i, c) in text.char_indices() {
        match c {
            '"' => in_quote = !in_quote,
            '.' if !in_quote => last_dot = Some(i),
            _ => {}
        }
    }
    let name = match last_dot {
        Some(i) => text[i + 1..].trim(),
        None => text
    };
    let name = if name.len() >= 2 && name.starts_with('"') && name.ends_with('"') {
        &name[1..name.len() - 1]
    } else {
        name
    };
    CompactString::from(name)
}

/// Split on commas that are not nested in parentheses or quotes.
///
/// Segments are trimmed; empty segments are dropped.
pub fn split_top_level_comma(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut quote: Option<char> = None;
    let mut depth = 0usize;
    let mut begin = 0;
    for (i, c) in text.char_indices() {
        if let Some(q) = quote {
            if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '\'' | '"' => quote = Some(c),
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(text[begin..i].trim());
                begin = i + 1;
            }
            _ => {}
        }
    }
    parts.push(text[begin..].trim());
    parts.retain(|p| !p.is_empty());
    parts
}

/// Byte range of the content between the first unquoted `open` and its
/// matching `close`, exclusive of both delimiters.
pub fn balanced_span(text: &str, open: char, close: char) -> Option<Range<usize>> {
    let mut quote: Option<char> = None;
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in text.char_indices() {
        if let Some(q) = quote {
            if c == q {
                quote = None;
            }
            continue;
        }
        if c == '\'' || c == '"' {
            quote = Some(c);
        } else if c == open {
            if depth == 0 {
                start = i + c.len_utf8();
            }
            depth += 1;
        } else if c == close && depth > 0 {
            depth -= 1;
            if depth == 0 {
                return Some(start..i);
            }
        }
    }
    None
}

/// Content between the first unquoted `open` and its matching `close`.
///
/// ```
/// use lookup_differ::sql::first_balanced;
///
/// let sql = "INSERT INTO T (A, B) VALUES (1, f(2, ')'))";
/// assert_eq!(first_balanced(sql, '(', ')'), Some("A, B"));
/// ```
pub fn first_balanced(text: &str, open: char, close: char) -> Option<&str> {
    balanced_span(text, open, close).map(|range| &text[range])
}

/// First token of a clause: a quoted identifier or the text up to the first
/// whitespace or opening parenthesis.
pub fn first_token(text: &str) -> &str {
    let text = text.trim_start();
    if let Some(rest) = text.strip_prefix('"') {
        return match rest.find('"') {
            Some(end) => &text[..end + 2],
            None => text
        };
    }
    let end = text
        .find(|c: char| c.is_whitespace() || c == '(')
        .unwrap_or(text.len());
    &text[..end]
}

/// Strip a leading keyword (ASCII case-insensitive, single spaces between
/// words) and return the remainder, trimmed at the start.
///
/// The keyword must end at a word boundary.
pub fn strip_keyword<'a>(text: &'a str, keyword: &str) -> Option<&'a str> {
    let text = text.trim_start();
    let head = text.get(..keyword.len())?;
    if !head.eq_ignore_ascii_case(keyword) {
        return None;
    }
    let rest = &text[keyword.len()..];
    match rest.chars().next() {
        Some(c) if c.is_alphanumeric() || c == '_' || c == '$' || c == '#' => None,
        _ => Some(rest.trim_start())
    }
}

/// Normalize a literal for value-for-value comparison.
///
/// Trims, collapses whitespace outside quoted literals, applies Unicode NFC
/// and canonicalizes any casing of `NULL`.
///
/// ```
/// use lookup_differ::sql::normalize_value;
///
/// assert_eq!(normalize_value("  null "), "NULL");
/// assert_eq!(normalize_value("TO_DATE( '2024-01-01',\n 'YYYY-MM-DD')"), "TO_DATE( '2024-01-01', 'YYYY-MM-DD')");
/// assert_eq!(normalize_value("'a  b'"), "'a  b'");
/// ```
pub fn normalize_value(text: &str) -> String {
    let flat = flatten(text);
    if flat.eq_ignore_ascii_case("NULL") {
        return String::from("NULL");
    }
    flat.nfc().collect()
}

/// Terminate a statement with exactly one semicolon.
///
/// Comments are dropped first; a `;` after a trailing `--` comment would not
/// end anything.
pub fn terminate(sql: &str) -> String {
    let code = strip_comments(sql);
    let body = code.trim_end().trim_end_matches(';').trim_end();
    format!("{};", body)
}
