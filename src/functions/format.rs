//! # format.rs
//!
//! Formatting helpers with print, printf and println semantics.

use std::fmt::Write;

use crate::error::FuncError;
use crate::value::Value;

/// Joins the arguments, adding a space between two operands when neither
/// is a string.
pub(crate) fn sprint(args: &[Value]) -> String
{
    let mut out = String::new();
    for (i, arg) in args.iter().enumerate() {
        if i > 0 && !matches!(arg, Value::Str(_)) && !matches!(args[i - 1], Value::Str(_)) {
            out.push(' ');
        }
        let _ = write!(out, "{arg}");
    }
    out
}

pub(crate) fn print(args: &[Value]) -> Value
{
    Value::Str(sprint(args))
}

/// Joins the arguments with spaces and appends a newline.
pub(crate) fn println(args: &[Value]) -> Value
{
    let mut out = args.iter().map(|arg| arg.to_string()).collect::<Vec<_>>().join(" ");
    out.push('\n');
    Value::Str(out)
}

pub(crate) fn printf(args: &[Value]) -> Result<Value, FuncError>
{
    let (format, rest) = match args.split_first() {
        Some((Value::Str(format), rest)) => (format, rest),
        Some((other, _)) => {
            return Err(FuncError::BadArgument(format!("printf format must be a string, got {}", other.kind())));
        },
        None => return Err(FuncError::BadArgument("printf needs a format".into())),
    };
    Ok(Value::Str(sprintf(format, rest)))
}

/// Largest width or precision a directive may ask for.
const MAX_WIDTH: usize = 1_000_000;

/// One parsed `%` directive.
#[derive(Debug, Default)]
struct Spec {
    minus: bool,
    plus: bool,
    zero: bool,
    width: Option<usize>,
    precision: Option<usize>,
}

type CharIter<'a> = std::iter::Peekable<std::str::Chars<'a>>;

fn parse_number(chars: &mut CharIter) -> Option<usize>
{
    let mut n: Option<usize> = None;
    while let Some(d) = chars.peek().and_then(|ch| ch.to_digit(10)) {
        chars.next();
        n = Some(n.unwrap_or(0).saturating_mul(10).saturating_add(d as usize));
    }
    n
}

/// Formats `args` according to `format`.
pub(crate) fn sprintf(format: &str, args: &[Value]) -> String
{
    let mut out = String::with_capacity(format.len());
    let mut chars = format.chars().peekable();
    let mut next_arg = 0;

    while let Some(ch) = chars.next() {
        if ch != '%' {
            out.push(ch);
            continue;
        }

        let mut spec = Spec::default();
        while let Some(&flag) = chars.peek() {
            match flag {
                '-' => spec.minus = true,
                '+' => spec.plus = true,
                '0' => spec.zero = true,
                _ => break,
            }
            chars.next();
        }
        spec.width = parse_number(&mut chars);
        if spec.width.is_some_and(|w| w > MAX_WIDTH) {
            out.push_str("%!(BADWIDTH)");
            spec.width = None;
        }
        if chars.peek() == Some(&'.') {
            chars.next();
            spec.precision = Some(parse_number(&mut chars).unwrap_or(0));
            if spec.precision.is_some_and(|p| p > MAX_WIDTH) {
                out.push_str("%!(BADPREC)");
                spec.precision = None;
            }
        }

        let Some(verb) = chars.next() else {
            out.push_str("%!(NOVERB)");
            break;
        };
        if verb == '%' {
            out.push('%');
            continue;
        }

        match args.get(next_arg) {
            Some(arg) => {
                next_arg += 1;
                let text = format_one(verb, &spec, arg);
                pad(&mut out, &text, &spec, is_numeric_verb(verb));
            },
            None => {
                let _ = write!(out, "%!{verb}(MISSING)");
            },
        }
    }

    if next_arg < args.len() {
        let extra = args[next_arg..]
            .iter()
            .map(|arg| format!("{}={}", arg.kind(), arg))
            .collect::<Vec<_>>()
            .join(", ");
        let _ = write!(out, "%!(EXTRA {extra})");
    }
    out
}

fn is_numeric_verb(verb: char) -> bool
{
    matches!(verb, 'd' | 'f' | 'e' | 'g' | 'x' | 'X')
}

fn signed(text: String, spec: &Spec, negative: bool) -> String
{
    if spec.plus && !negative {
        format!("+{text}")
    } else {
        text
    }
}

fn bad_verb(verb: char, arg: &Value) -> String
{
    format!("%!{verb}({}={})", arg.kind(), arg)
}

fn format_one(verb: char, spec: &Spec, arg: &Value) -> String
{
    match (verb, arg) {
        ('v', _) => match (spec.precision, arg) {
            (Some(p), Value::Float(x)) => format!("{x:.p$}"),
            _ => arg.to_string(),
        },
        ('s', Value::Str(s)) => match spec.precision {
            Some(p) => s.chars().take(p).collect(),
            None => s.clone(),
        },
        ('d', Value::Int(i)) => signed(i.to_string(), spec, *i < 0),
        ('d', Value::Uint(u)) => signed(u.to_string(), spec, false),
        ('f', Value::Float(x)) => {
            let p = spec.precision.unwrap_or(6);
            signed(format!("{x:.p$}"), spec, x.is_sign_negative())
        },
        ('e', Value::Float(x)) => {
            let p = spec.precision.unwrap_or(6);
            signed(format!("{x:.p$e}"), spec, x.is_sign_negative())
        },
        ('g', Value::Float(x)) => signed(x.to_string(), spec, x.is_sign_negative()),
        ('t', Value::Bool(b)) => b.to_string(),
        ('q', Value::Str(s)) => format!("{s:?}"),
        ('x', Value::Int(i)) if *i < 0 => format!("-{:x}", i.unsigned_abs()),
        ('x', Value::Int(i)) => format!("{i:x}"),
        ('X', Value::Int(i)) if *i < 0 => format!("-{:X}", i.unsigned_abs()),
        ('X', Value::Int(i)) => format!("{i:X}"),
        ('x', Value::Uint(u)) => format!("{u:x}"),
        ('X', Value::Uint(u)) => format!("{u:X}"),
        ('x', Value::Str(s)) => s.bytes().map(|b| format!("{b:02x}")).collect(),
        ('X', Value::Str(s)) => s.bytes().map(|b| format!("{b:02X}")).collect(),
        _ => bad_verb(verb, arg),
    }
}

fn pad(out: &mut String, text: &str, spec: &Spec, numeric: bool)
{
    let len = text.chars().count();
    let fill = spec.width.unwrap_or(0).saturating_sub(len);
    if fill == 0 {
        out.push_str(text);
    } else if spec.minus {
        out.push_str(text);
        out.extend(std::iter::repeat(' ').take(fill));
    } else if spec.zero && numeric {
        let (sign, digits) = match text.strip_prefix(['-', '+']) {
            Some(digits) => text.split_at(text.len() - digits.len()),
            None => ("", text),
        };
        out.push_str(sign);
        out.extend(std::iter::repeat('0').take(fill));
        out.push_str(digits);
    } else {
        out.extend(std::iter::repeat(' ').take(fill));
        out.push_str(text);
    }
}

#[cfg(test)]
mod format_tests {
    use super::*;

    #[test]
    fn test_huge_width_is_rejected() {
        assert_eq!(sprintf("%99999999999999999999999d", &[Value::from(1)]), "%!(BADWIDTH)1");
        assert_eq!(sprintf("[%1000001s]", &[Value::from("a")]), "[%!(BADWIDTH)a]");
        assert_eq!(sprintf("%1000000d", &[Value::from(1)]).len(), 1_000_000);
    }

    #[test]
    fn test_huge_precision_is_rejected() {
        assert_eq!(sprintf("%.99999999999f", &[Value::from(1.5)]), "%!(BADPREC)1.500000");
        assert_eq!(sprintf("%5.99999999999s", &[Value::from("ab")]), "%!(BADPREC)   ab");
    }

    #[test]
    fn test_sprint_spacing() {
        assert_eq!(sprint(&[Value::from(1), Value::from(2)]), "1 2");
        assert_eq!(sprint(&[Value::from("a"), Value::from(1), Value::from("b")]), "a1b");
        assert_eq!(sprint(&[Value::from("a"), Value::from("b")]), "ab");
    }

    #[test]
    fn test_println() {
        assert_eq!(println(&[Value::from("a"), Value::from(1)]), Value::from("a 1\n"));
        assert_eq!(println(&[]), Value::from("\n"));
    }

    #[test]
    fn test_printf_verbs() {
        assert_eq!(sprintf("%s is %d", &[Value::from("x"), Value::from(7)]), "x is 7");
        assert_eq!(sprintf("%.2f", &[Value::from(3.14159)]), "3.14");
        assert_eq!(sprintf("%t", &[Value::from(true)]), "true");
        assert_eq!(sprintf("%q", &[Value::from("hi\n")]), "\"hi\\n\"");
        assert_eq!(sprintf("%x %X", &[Value::from(255), Value::from(255u32)]), "ff FF");
        assert_eq!(sprintf("%v", &[Value::list([1, 2])]), "[1 2]");
        assert_eq!(sprintf("100%%", &[]), "100%");
    }

    #[test]
    fn test_printf_width() {
        assert_eq!(sprintf("[%5d]", &[Value::from(42)]), "[   42]");
        assert_eq!(sprintf("[%-5d]", &[Value::from(42)]), "[42   ]");
        assert_eq!(sprintf("[%05d]", &[Value::from(-42)]), "[-0042]");
        assert_eq!(sprintf("[%+d]", &[Value::from(5)]), "[+5]");
    }

    #[test]
    fn test_printf_bad_verb() {
        assert_eq!(sprintf("%d", &[Value::from("x")]), "%!d(string=x)");
    }

    #[test]
    fn test_printf_missing_and_extra() {
        assert_eq!(sprintf("%s %s", &[Value::from("a")]), "a %!s(MISSING)");
        assert_eq!(sprintf("%s", &[Value::from("a"), Value::from(1)]), "a%!(EXTRA int=1)");
        assert_eq!(sprintf("trailing %", &[]), "trailing %!(NOVERB)");
    }

    #[test]
    fn test_printf_requires_string_format() {
        assert!(printf(&[Value::from(1)]).is_err());
        assert_eq!(printf(&[Value::from("n=%d"), Value::from(1)]), Ok(Value::from("n=1")));
    }
}
