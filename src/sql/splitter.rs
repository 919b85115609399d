//! Statement splitting over an immutable script buffer.

use std::borrow::Cow;

/// One top-level statement of a script.
///
/// `text` borrows the original script and excludes the terminator. Comments
/// inside the statement are kept; use [`Statement::code`] for the
/// comment-free, whitespace-flattened form the parsers work on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Statement<'a> {
    /// Raw statement text, trimmed, without the terminating `;` or `/`
    pub text: &'a str,
    /// 1-based line on which the statement starts
    pub line: usize
}

impl Statement<'_> {
    /// Statement text with comments removed and whitespace collapsed outside
    /// quoted regions.
    pub fn code(&self) -> String {
        flatten(&strip_comments(self.text))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LexState {
    Plain,
    SingleQuote,
    DoubleQuote,
    LineComment,
    BlockComment
}

/// Split a script into top-level statements.
///
/// A statement ends at a `;` or at a line holding only `/`, provided the
/// terminator is outside string literals, quoted identifiers and comments.
/// A trailing statement without terminator is still returned. Leading
/// comments and blank lines never belong to a statement.
pub fn split_statements(input: &str) -> Vec<Statement<'_>> {
    let bytes = input.as_bytes();
    let mut statements = Vec::new();
    let mut state = LexState::Plain;
    let mut start: Option<(usize, usize)> = None;
    let mut line = 1;
    let mut at_line_start = true;
    let mut i = 0;

    while i < bytes.len() {
        if at_line_start {
            at_line_start = false;
            if state == LexState::Plain {
                let line_end = input[i..].find('\n').map_or(input.len(), |n| i + n);
                let content = input[i..line_end].trim();
                if content == "/" {
                    push_statement(&mut statements, input, start.take(), i);
                    i = line_end;
                    continue;
                }
                // Directives only count between statements; inside one they are data.
                if start.is_none() && is_sqlplus_directive(content) {
                    i = line_end;
                    continue;
                }
            }
        }

        let c = bytes[i];
        let next = bytes.get(i + 1).copied();
        match state {
            LexState::Plain => match c {
                b'\'' => {
                    start.get_or_insert((i, line));
                    state = LexState::SingleQuote;
                }
                b'"' => {
                    start.get_or_insert((i, line));
                    state = LexState::DoubleQuote;
                }
                b'-' if next == Some(b'-') => {
                    state = LexState::LineComment;
                    i += 2;
                    continue;
                }
                b'/' if next == Some(b'*') => {
                    state = LexState::BlockComment;
                    i += 2;
                    continue;
                }
                b';' => push_statement(&mut statements, input, start.take(), i),
                _ if c.is_ascii_whitespace() => {}
                _ => {
                    start.get_or_insert((i, line));
                }
            },
            LexState::SingleQuote => {
                if c == b'\'' {
                    state = LexState::Plain;
                }
            }
            LexState::DoubleQuote => {
                if c == b'"' {
                    state = LexState::Plain;
                }
            }
            LexState::LineComment => {
                if c == b'\n' {
                    state = LexState::Plain;
                }
            }
            LexState::BlockComment => {
                if c == b'*' && next == Some(b'/') {
                    state = LexState::Plain;
                    i += 2;
                    continue;
                }
            }
        }

        if c == b'\n' {
            line += 1;
            at_line_start = true;
        }
        i += 1;
    }

    push_statement(&mut statements, input, start.take(), input.len());
    statements
}

fn push_statement<'a>(
    statements: &mut Vec<Statement<'a>>,
    input: &'a str,
    start: Option<(usize, usize)>,
    end: usize
) {
    if let Some((offset, line)) = start {
        let text = input[offset..end].trim_end();
        if !text.is_empty() {
            statements.push(Statement {
                text,
                line
            });
        }
    }
}

fn is_sqlplus_directive(line: &str) -> bool {
    let upper = line.get(..7).unwrap_or(line).to_ascii_uppercase();
    upper == "PROMPT"
        || upper == "REM"
        || upper.starts_with("PROMPT ")
        || upper.starts_with("REM ")
        || upper.starts_with("REM\t")
        || upper.starts_with("PROMPT\t")
}

/// Remove `--` and `/* */` comments that occur outside quoted regions.
///
/// Line comments are dropped up to (not including) the line break, block
/// comments are replaced by a single space so adjacent tokens stay apart.
pub fn strip_comments(text: &str) -> Cow<'_, str> {
    if !text.contains("--") && !text.contains("/*") {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len());
    let mut state = LexState::Plain;
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match state {
            LexState::Plain => match c {
                '-' if chars.peek() == Some(&'-') => {
                    chars.next();
                    state = LexState::LineComment;
                }
                '/' if chars.peek() == Some(&'*') => {
                    chars.next();
                    state = LexState::BlockComment;
                    out.push(' ');
                }
                '\'' => {
                    state = LexState::SingleQuote;
                    out.push(c);
                }
                '"' => {
                    state = LexState::DoubleQuote;
                    out.push(c);
                }
                _ => out.push(c)
            },
            LexState::SingleQuote => {
                if c == '\'' {
                    state = LexState::Plain;
                }
                out.push(c);
            }
            LexState::DoubleQuote => {
                if c == '"' {
                    state = LexState::Plain;
                }
                out.push(c);
            }
            LexState::LineComment => match c {
                '\n' => {
                    state = LexState::Plain;
                    out.push(c);
                }
                '\r' if chars.peek() == Some(&'\n') => out.push(c),
                _ => {}
            },
            LexState::BlockComment => {
                if c == '*' && chars.peek() == Some(&'/') {
                    chars.next();
                    state = LexState::Plain;
                }
            }
        }
    }
    Cow::Owned(out)
}

/// Collapse whitespace runs outside quoted regions into one space and trim.
///
/// Content of string literals and quoted identifiers is left untouched.
pub fn flatten(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut quote: Option<char> = None;
    let mut pending_space = false;
    for c in text.chars() {
        match quote {
            Some(q) => {
                out.push(c);
                if c == q {
                    quote = None;
                }
            }
            None if c.is_whitespace() => pending_space = true,
            None => {
                if pending_space && !out.is_empty() {
                    out.push(' ');
                }
                pending_space = false;
                if c == '\'' || c == '"' {
                    quote = Some(c);
                }
                out.push(c);
            }
        }
    }
    out
}
