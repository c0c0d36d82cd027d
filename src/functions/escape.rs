//! # escape.rs
//!
//! Escaping helpers for HTML text, JavaScript strings and URL queries.
//!
//! Each helper first joins its arguments the way `print` does, then escapes
//! the resulting text for its output context.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use super::format;
use crate::value::Value;

/// Characters left as-is in a URL query component.
const QUERY: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Joins the arguments into the text to escape. A single string argument
/// is used directly.
fn text_of(args: &[Value]) -> String
{
    match args {
        [Value::Str(s)] => s.clone(),
        _ => format::sprint(args),
    }
}

pub(crate) fn html(args: &[Value]) -> Value
{
    let text = text_of(args);
    let escaped = html_escape::encode_quoted_attribute(&text);
    Value::Str(escaped.replace('\0', "\u{FFFD}"))
}

pub(crate) fn js(args: &[Value]) -> Value
{
    Value::Str(js_escape(&text_of(args)))
}

pub(crate) fn urlquery(args: &[Value]) -> Value
{
    let text = text_of(args);
    Value::Str(utf8_percent_encode(&text, QUERY).to_string().replace("%20", "+"))
}

/// Escapes `s` for embedding in a JavaScript string literal.
fn js_escape(s: &str) -> String
{
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '"' => out.push_str("\\\""),
            '<' => out.push_str("\\u003C"),
            '>' => out.push_str("\\u003E"),
            '&' => out.push_str("\\u0026"),
            '=' => out.push_str("\\u003D"),
            ch if ch.is_control() => {
                let mut buf = [0u16; 2];
                for unit in ch.encode_utf16(&mut buf) {
                    out.push_str(&format!("\\u{:04X}", unit));
                }
            },
            ch => out.push(ch),
        }
    }
    out
}
