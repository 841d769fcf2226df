//! Recursive-descent parser for the near-JSON literal dialect.
//!
//! Accepts what a Python `repr()` of lists, tuples and dicts of strings,
//! numbers and `None`/`True`/`False` looks like, plus JSON itself. Nothing is
//! evaluated: the input is parsed into a [`serde_json::Value`] or rejected.

use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{char, digit0, digit1, multispace0, one_of},
    combinator::{all_consuming, map, not, opt, peek, recognize, value},
    error::{Error, ErrorKind},
    multi::separated_list0,
    sequence::{delimited, pair, terminated, tuple},
    IResult,
};
use serde_json::{Map, Number, Value};
use std::str::CharIndices;

/// Maximum nesting of lists, tuples and dicts.
const MAX_DEPTH: usize = 64;

/// Punctuation permitted by [`is_literal_safe`] besides letters, digits and whitespace.
const ALLOWED_PUNCTUATION: &str = "[]{}():,'\"+-._!?/\\;&%#@*=|~^$<>";

/// Check the character allow-list that guards [`parse_literal`].
pub fn is_literal_safe(input: &str) -> bool {
    input
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c.is_ascii_whitespace() || ALLOWED_PUNCTUATION.contains(c))
}

/// Parse a complete literal. Returns `None` on any syntax error.
pub fn parse_literal(input: &str) -> Option<Value> {
    all_consuming(delimited(multispace0, |i| literal(i, 0), multispace0))(input)
        .ok()
        .map(|(_, v)| v)
}

fn literal(input: &str, depth: usize) -> IResult<&str, Value> {
    if depth > MAX_DEPTH {
        return Err(nom::Err::Failure(Error::new(input, ErrorKind::TooLarge)));
    }

    alt((
        map(quoted_string, Value::String),
        keyword,
        number,
        |i| list(i, depth),
        |i| tuple_literal(i, depth),
        |i| dict(i, depth),
    ))(input)
}

fn keyword(input: &str) -> IResult<&str, Value> {
    terminated(
        alt((
            value(Value::Null, alt((tag("None"), tag("null")))),
            value(Value::Bool(true), alt((tag("True"), tag("true")))),
            value(Value::Bool(false), alt((tag("False"), tag("false")))),
        )),
        not(peek(one_of("_abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789"))),
    )(input)
}

fn number(input: &str) -> IResult<&str, Value> {
    let (rest, text) = recognize(tuple((
        opt(one_of("+-")),
        alt((recognize(pair(digit1, opt(pair(char('.'), digit0)))), recognize(pair(char('.'), digit1)))),
        opt(tuple((one_of("eE"), opt(one_of("+-")), digit1))),
    )))(input)?;

    let digits = text.strip_prefix('+').unwrap_or(text);
    let number = match digits.parse::<i64>() {
        Ok(n) => Some(Number::from(n)),
        Err(_) => digits.parse::<f64>().ok().and_then(Number::from_f64),
    };

    match number {
        Some(n) => Ok((rest, Value::Number(n))),
        None => Err(nom::Err::Error(Error::new(input, ErrorKind::Float))),
    }
}

/// Comma-separated items between `open` and `close`, trailing comma allowed.
fn sequence<'a, T, F>(
    input: &'a str,
    open: char,
    close: char,
    item: F,
) -> IResult<&'a str, Vec<T>>
where
    F: FnMut(&'a str) -> IResult<&'a str, T>,
{
    delimited(
        pair(char(open), multispace0),
        terminated(
            separated_list0(delimited(multispace0, char(','), multispace0), item),
            pair(multispace0, opt(pair(char(','), multispace0))),
        ),
        char(close),
    )(input)
}

fn list(input: &str, depth: usize) -> IResult<&str, Value> {
    map(|i| sequence(i, '[', ']', |j| literal(j, depth + 1)), Value::Array)(input)
}

fn tuple_literal(input: &str, depth: usize) -> IResult<&str, Value> {
    map(|i| sequence(i, '(', ')', |j| literal(j, depth + 1)), Value::Array)(input)
}

fn dict(input: &str, depth: usize) -> IResult<&str, Value> {
    map(
        |i| sequence(i, '{', '}', |j| dict_entry(j, depth + 1)),
        |entries: Vec<(String, Value)>| Value::Object(entries.into_iter().collect::<Map<String, Value>>()),
    )(input)
}

fn dict_entry(input: &str, depth: usize) -> IResult<&str, (String, Value)> {
    let (input, key) = literal(input, depth)?;
    let (input, _) = delimited(multispace0, char(':'), multispace0)(input)?;
    let (input, val) = literal(input, depth)?;
    Ok((input, (key_to_string(key), val)))
}

fn key_to_string(key: Value) -> String {
    match key {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

/// Parse a single- or double-quoted string with backslash escapes.
pub(crate) fn quoted_string(input: &str) -> IResult<&str, String> {
    let mut chars = input.char_indices();
    let quote = match chars.next() {
        Some((_, q @ ('\'' | '"'))) => q,
        _ => return Err(nom::Err::Error(Error::new(input, ErrorKind::Char))),
    };

    let mut out = String::new();
    while let Some((i, c)) = chars.next() {
        if c == quote {
            return Ok((&input[i + c.len_utf8()..], out));
        }
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some((_, escaped)) => push_escape(&mut out, escaped, &mut chars),
            None => break,
        }
    }

    Err(nom::Err::Error(Error::new(input, ErrorKind::Char)))
}

fn push_escape(out: &mut String, escaped: char, chars: &mut CharIndices<'_>) {
    match escaped {
        'n' => out.push('\n'),
        't' => out.push('\t'),
        'r' => out.push('\r'),
        'b' => out.push('\u{8}'),
        'f' => out.push('\u{c}'),
        '0' => out.push('\0'),
        '\\' | '\'' | '"' | '/' => out.push(escaped),
        'x' | 'u' => {
            let width = if escaped == 'x' { 2 } else { 4 };
            let digits: String = chars.clone().take(width).map(|(_, c)| c).collect();
            let decoded = (digits.len() == width && digits.chars().all(|c| c.is_ascii_hexdigit()))
                .then(|| u32::from_str_radix(&digits, 16).ok())
                .flatten()
                .and_then(char::from_u32);
            match decoded {
                Some(c) => {
                    out.push(c);
                    for _ in 0..width {
                        chars.next();
                    }
                }
                None => {
                    out.push('\\');
                    out.push(escaped);
                }
            }
        }
        other => {
            // Unknown escapes stay literal, as in Python.
            out.push('\\');
            out.push(other);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_python_repr_list_of_dicts() {
        let input = "[{'title': 'Foo', 'confidence': 0.5, 'verified': True, 'note': None}]";
        assert_eq!(
            parse_literal(input),
            Some(json!([{"title": "Foo", "confidence": 0.5, "verified": true, "note": null}]))
        );
    }

    #[test]
    fn test_mixed_quotes_and_escapes() {
        assert_eq!(
            parse_literal(r#"["Euler's identity", 'say \'hi\'', 'tab\there', '\x41é']"#),
            Some(json!(["Euler's identity", "say 'hi'", "tab\there", "Aé"]))
        );
    }

    #[test]
    fn test_tuples_and_trailing_commas() {
        assert_eq!(
            parse_literal("( 'a', (1, 2,), {'k': [3,],}, )"),
            Some(json!(["a", [1, 2], {"k": [3]}]))
        );
    }

    #[test]
    fn test_numbers() {
        assert_eq!(
            parse_literal("[1, -2, +3, 4.5, .5, 1e3, -2.5E-2, 7.]"),
            Some(json!([1, -2, 3, 4.5, 0.5, 1000.0, -0.025, 7.0]))
        );
    }

    #[test]
    fn test_non_string_keys() {
        assert_eq!(
            parse_literal("{1: 'a', None: 'b', True: 'c'}"),
            Some(json!({"1": "a", "null": "b", "true": "c"}))
        );
    }

    #[test]
    fn test_keyword_needs_boundary() {
        assert_eq!(parse_literal("[Nonesuch]"), None);
        assert_eq!(parse_literal("[True]"), Some(json!([true])));
    }

    #[test]
    fn test_rejects_expressions() {
        assert_eq!(parse_literal("[1 + 2]"), None);
        assert_eq!(parse_literal("__import__('os')"), None);
        assert_eq!(parse_literal("[1, 2"), None);
        assert_eq!(parse_literal("'unterminated"), None);
        assert_eq!(parse_literal(""), None);
    }

    #[test]
    fn test_depth_limit() {
        let deep = format!("{}{}", "[".repeat(MAX_DEPTH + 10), "]".repeat(MAX_DEPTH + 10));
        assert_eq!(parse_literal(&deep), None);
        let shallow = format!("{}{}", "[".repeat(10), "]".repeat(10));
        assert!(parse_literal(&shallow).is_some());
    }

    #[test]
    fn test_allow_list() {
        assert!(is_literal_safe("[{'title': 'A (B) - C?', 'score': 1e-3}]"));
        assert!(!is_literal_safe("['Poincaré']"));
        assert!(!is_literal_safe("[`x`]"));
    }

    #[test]
    fn test_quoted_string_rest() {
        assert_eq!(quoted_string("'ab' tail"), Ok((" tail", "ab".to_string())));
        assert!(quoted_string("ab").is_err());
    }
}
