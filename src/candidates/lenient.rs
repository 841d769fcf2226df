//! Lexical rewrite of Python-style literals into JSON text.

use super::literal::quoted_string;

/// Rewrite near-JSON text so that a strict JSON parser can read it.
///
/// Outside string literals, the bare words `None`, `True` and `False` become
/// `null`, `true` and `false`. Every quoted string, single- or double-quoted,
/// is decoded and re-emitted as a JSON string, so keys, values and bare list
/// elements all end up double-quoted with JSON escaping. An unterminated
/// string is copied through unchanged and left for the JSON parser to reject.
pub fn rewrite(input: &str) -> String {
    let mut out = String::with_capacity(input.len() + input.len() / 8);
    let mut remaining = input;

    while let Some(c) = remaining.chars().next() {
        if c == '\'' || c == '"' {
            match quoted_string(remaining) {
                Ok((rest, decoded)) => {
                    out.push_str(&json_string(&decoded));
                    remaining = rest;
                }
                Err(_) => {
                    out.push_str(remaining);
                    break;
                }
            }
        } else if c.is_ascii_alphabetic() || c == '_' {
            let end = remaining
                .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
                .unwrap_or(remaining.len());
            let word = &remaining[..end];
            out.push_str(match word {
                "None" => "null",
                "True" => "true",
                "False" => "false",
                other => other,
            });
            remaining = &remaining[end..];
        } else {
            out.push(c);
            remaining = &remaining[c.len_utf8()..];
        }
    }

    out
}

fn json_string(s: &str) -> String {
    serde_json::Value::String(s.to_string()).to_string()
}
