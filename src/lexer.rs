//! lexer.rs
//!
//! This module provides a simple lexical analyzer (lexer) for template text.
//! It splits the input into a sequence of `Lexeme`s: runs of literal text, and
//! the tokens inside each action, each with its position in the original string.
//!
//! Inside an action the lexer recognizes identifiers, numbers, double-quoted
//! strings, field chains (`.A.B`), the data dot, parentheses and the pipe.

use std::ops::Range;

const DEFAULT_LEFT: &str = "{{";
const DEFAULT_RIGHT: &str = "}}";

/// Delimiter trim marker, written next to a delimiter as `{{- ` or ` -}}`.
const TRIM_MARKER: char = '-';

/// Category of a lexeme.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum LexKind {
    /// Literal text outside any action.
    Text,
    Ident,
    Number,
    /// A double-quoted string, with quotes and escapes still in the text.
    Str,
    /// A field chain such as `.Name.First`.
    Field,
    /// The bare data dot.
    Dot,
    LParen,
    RParen,
    Pipe,
    /// The closing delimiter of an action.
    ActionEnd,
}

/// Represents a single lexeme extracted from the input string.
///
/// A `Lexeme` stores its kind, its text and its span (start..end byte indices)
/// within the original input string.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Lexeme {
    kind: LexKind,
    text: String,
    span: Range<usize>,
}

impl Lexeme {
    pub fn new(kind: LexKind, text: &str, span: Range<usize>) -> Self {
        Self {
            kind,
            text: text.to_string(),
            span
        }
    }

    pub fn kind(&self) -> LexKind {
        self.kind
    }

    /// Returns the text slice of the lexeme.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the start index of the lexeme in the original input string.
    pub fn start(&self) -> usize {
        self.span.start
    }
}

impl std::fmt::Display for Lexeme
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{name} [{start}, {end})", name=self.text, start=self.span.start, end=self.span.end)
    }
}

/// Type alias for a collection of lexemes.
pub(crate) type Lexemes = Vec<Lexeme>;

/// A lexing failure at byte `offset`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct LexError {
    pub message: String,
    pub offset: usize,
    pub unclosed: bool,
}

impl LexError {
    fn at(offset: usize, message: String) -> Self {
        Self { message, offset, unclosed: false }
    }
}

/// Returns the byte length of the identifier at the start of `rest`.
fn ident_len(rest: &str) -> usize
{
    rest.char_indices()
        .find(|&(_, ch)| !(ch.is_alphanumeric() || ch == '_'))
        .map_or(rest.len(), |(idx, _)| idx)
}

/// Returns the byte length of the numeric literal at the start of `rest`.
///
/// Supports an optional sign, decimals and scientific notation.
fn number_len(rest: &str) -> usize
{
    let mut end = 0;
    let mut seen_e = false;
    let mut prev = ' ';

    for (idx, ch) in rest.char_indices() {
        let accept = match ch {
            '+' | '-' => idx == 0 || (seen_e && matches!(prev, 'e' | 'E')),
            d if d.is_ascii_digit() || d == '.' || d == '_' => true,
            'e' | 'E' if !seen_e => { seen_e = true; true },
            _ => false,
        };
        if !accept {
            break;
        }
        end = idx + ch.len_utf8();
        prev = ch;
    }

    end
}

/// Returns the byte length of the quoted string at the start of `rest`,
/// including both quotes, or `None` if it is unterminated.
fn string_len(rest: &str) -> Option<usize>
{
    let mut escaped = false;
    for (idx, ch) in rest.char_indices().skip(1) {
        match ch {
            '\\' if !escaped => escaped = true,
            '"' if !escaped => return Some(idx + 1),
            '\n' => return None,
            _ => escaped = false,
        }
    }
    None
}

/// Splits `input` into text and action lexemes using the given delimiters.
///
/// # Arguments
///
/// * `input` - The template text to lex.
/// * `left` - The left action delimiter, `{{` by default.
/// * `right` - The right action delimiter, `}}` by default.
///
/// An empty delimiter stands for the default one.
pub(crate) fn from(input: &str, left: &str, right: &str) -> Result<Lexemes, LexError>
{
    let left = if left.is_empty() { DEFAULT_LEFT } else { left };
    let right = if right.is_empty() { DEFAULT_RIGHT } else { right };
    let mut lexemes = Lexemes::new();
    let mut pos = 0;
    let mut trim_next_text = false;

    while pos < input.len() {
        let Some(found) = input[pos..].find(left) else {
            push_text(&mut lexemes, input, pos..input.len(), trim_next_text, false);
            break;
        };
        let open = pos + found;
        let mut body = open + left.len();

        let trim_before = input[body..].starts_with(TRIM_MARKER)
            && input[body + 1..].starts_with(char::is_whitespace);
        if trim_before {
            body += TRIM_MARKER.len_utf8();
        }
        push_text(&mut lexemes, input, pos..open, trim_next_text, trim_before);

        let (end, trim_after) = lex_action(input, body, open, right, &mut lexemes)?;
        pos = end;
        trim_next_text = trim_after;
    }

    Ok(lexemes)
}

fn push_text(lexemes: &mut Lexemes, input: &str, span: Range<usize>, trim_start: bool, trim_end: bool)
{
    let mut text = &input[span.clone()];
    let mut start = span.start;
    if trim_start {
        let trimmed = text.trim_start();
        start += text.len() - trimmed.len();
        text = trimmed;
    }
    if trim_end {
        text = text.trim_end();
    }
    if !text.is_empty() {
        lexemes.push(Lexeme::new(LexKind::Text, text, start..start + text.len()));
    }
}

/// Lexes one action body starting at `pos`. Returns the index just past the
/// closing delimiter and whether that delimiter carried a trim marker.
fn lex_action(input: &str, mut pos: usize, open: usize, right: &str, lexemes: &mut Lexemes)
    -> Result<(usize, bool), LexError>
{
    loop {
        let rest = &input[pos..];
        let Some(ch) = rest.chars().next() else {
            return Err(LexError { message: "unclosed action".into(), offset: open, unclosed: true });
        };

        if rest.starts_with(right) {
            lexemes.push(Lexeme::new(LexKind::ActionEnd, right, pos..pos + right.len()));
            return Ok((pos + right.len(), false));
        }
        if ch.is_whitespace() {
            let after = rest.trim_start();
            let skipped = rest.len() - after.len();
            if after.starts_with(TRIM_MARKER) && after[1..].starts_with(right) {
                let close = pos + skipped + 1;
                lexemes.push(Lexeme::new(LexKind::ActionEnd, right, close..close + right.len()));
                return Ok((close + right.len(), true));
            }
            pos += skipped;
            continue;
        }

        let (kind, len) = match ch {
            '(' => (LexKind::LParen, 1),
            ')' => (LexKind::RParen, 1),
            '|' => (LexKind::Pipe, 1),
            '"' => match string_len(rest) {
                Some(len) => (LexKind::Str, len),
                None => return Err(LexError::at(pos, "unterminated quoted string".into())),
            },
            '.' => {
                let mut len = 1;
                while rest[len..].starts_with(|c: char| c.is_alphabetic() || c == '_') {
                    len += ident_len(&rest[len..]);
                    if rest[len..].starts_with('.') && rest[len + 1..].starts_with(|c: char| c.is_alphabetic() || c == '_') {
                        len += 1;
                    }
                }
                if len == 1 { (LexKind::Dot, 1) } else { (LexKind::Field, len) }
            },
            c if c.is_ascii_digit() => (LexKind::Number, number_len(rest)),
            '+' | '-' if rest[1..].starts_with(|c: char| c.is_ascii_digit()) => {
                (LexKind::Number, number_len(rest))
            },
            c if c.is_alphabetic() || c == '_' => (LexKind::Ident, ident_len(rest)),
            c => return Err(LexError::at(pos, format!("unexpected {c:?} in action"))),
        };

        lexemes.push(Lexeme::new(kind, &rest[..len], pos..pos + len));
        pos += len;
    }
}

#[cfg(test)]
mod lexer_tests {
    use super::*;

    fn kinds(input: &str) -> Vec<(LexKind, String)> {
        from(input, "{{", "}}")
            .unwrap()
            .into_iter()
            .map(|lex| (lex.kind(), lex.text().to_string()))
            .collect()
    }

    #[test]
    fn test_plain_text() {
        assert_eq!(kinds("hello"), vec![(LexKind::Text, "hello".into())]);
        assert!(kinds("").is_empty());
    }

    #[test]
    fn test_call_action() {
        assert_eq!(
            kinds("a {{eq 1 \"x\"}} b"),
            vec![
                (LexKind::Text, "a ".into()),
                (LexKind::Ident, "eq".into()),
                (LexKind::Number, "1".into()),
                (LexKind::Str, "\"x\"".into()),
                (LexKind::ActionEnd, "}}".into()),
                (LexKind::Text, " b".into()),
            ]
        );
    }

    #[test]
    fn test_fields_pipes_and_parens() {
        assert_eq!(
            kinds("{{ (len .User.Name) | print . }}"),
            vec![
                (LexKind::LParen, "(".into()),
                (LexKind::Ident, "len".into()),
                (LexKind::Field, ".User.Name".into()),
                (LexKind::RParen, ")".into()),
                (LexKind::Pipe, "|".into()),
                (LexKind::Ident, "print".into()),
                (LexKind::Dot, ".".into()),
                (LexKind::ActionEnd, "}}".into()),
            ]
        );
    }

    #[test]
    fn test_numbers() {
        assert_eq!(
            kinds("{{-1 2.5 1e3 -2.5e-2}}").into_iter().map(|(_, t)| t).collect::<Vec<_>>(),
            vec!["-1", "2.5", "1e3", "-2.5e-2", "}}"]
        );
    }

    #[test]
    fn test_trim_markers() {
        assert_eq!(
            kinds("a  {{- 1 -}}  b"),
            vec![
                (LexKind::Text, "a".into()),
                (LexKind::Number, "1".into()),
                (LexKind::ActionEnd, "}}".into()),
                (LexKind::Text, "b".into()),
            ]
        );
    }

    #[test]
    fn test_string_may_contain_delimiter() {
        assert_eq!(kinds("{{\"}}\"}}")[0], (LexKind::Str, "\"}}\"".into()));
    }

    #[test]
    fn test_custom_delims() {
        let lexemes = from("x [[ html . ]]", "[[", "]]").unwrap();
        assert_eq!(lexemes[1].text(), "html");
        assert_eq!(lexemes.last().unwrap().kind(), LexKind::ActionEnd);
    }

    #[test]
    fn test_empty_delims_mean_defaults() {
        let lexemes = from("a {{ x }} b", "", "").unwrap();
        assert_eq!(lexemes.len(), 4);
        assert_eq!(lexemes[1].text(), "x");
        assert_eq!(from("abc", "", "").unwrap().len(), 1);
        assert_eq!(from("[[ x }}", "[[", "").unwrap()[0].text(), "x");
    }

    #[test]
    fn test_unclosed_action() {
        let err = from("ab {{ eq 1", "{{", "}}").unwrap_err();
        assert!(err.unclosed);
        assert_eq!(err.offset, 3);
    }

    #[test]
    fn test_errors() {
        assert!(from("{{ \"abc }}", "{{", "}}").is_err());
        assert!(from("{{ @ }}", "{{", "}}").is_err());
    }

    #[test]
    fn test_display() {
        let lexemes = from("{{ x }}", "{{", "}}").unwrap();
        assert_eq!(lexemes[0].to_string(), "x [3, 4)");
    }
}
